//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    Authenticator, RouteRecommender, SavedRouteCommand, SavedRouteQuery, UserProfileCommand,
    UserProfileQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// One trait object per driving port; the server composes them from either
/// the Redis/geo-engine adapters or the in-memory fixtures.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn Authenticator>,
    pub recommender: Arc<dyn RouteRecommender>,
    pub route_commands: Arc<dyn SavedRouteCommand>,
    pub route_queries: Arc<dyn SavedRouteQuery>,
    pub profiles: Arc<dyn UserProfileQuery>,
    pub profile_commands: Arc<dyn UserProfileCommand>,
}
