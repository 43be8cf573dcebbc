//! Domain ports and supporting types for the hexagonal boundary.

mod authenticator;
mod credential_store;
mod route_recommender;
mod route_repository;
mod route_scorer;
mod saved_routes;
mod session_store;
mod user_profiles;

pub use authenticator::{Authenticator, LoginOutcome};
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use route_recommender::RouteRecommender;
pub use route_repository::{RouteRepository, RouteRepositoryError};
pub use route_scorer::{RouteScorer, ScoringError};
pub use saved_routes::{SaveRoutePayload, SavedRouteCommand, SavedRouteQuery};
pub use session_store::{SessionStore, SessionStoreError};
pub use user_profiles::{UserProfileCommand, UserProfileQuery};
