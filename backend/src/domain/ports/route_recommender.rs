//! Driving port for route recommendation orchestration.

use async_trait::async_trait;

use crate::domain::{Error, RecommendationRequest, RecommendedRoute};

/// Driving port for one orchestrated recommendation call.
#[async_trait]
pub trait RouteRecommender: Send + Sync {
    /// Delegate scoring to the geo-engine and translate its outcome into
    /// the caller-facing contract.
    async fn recommend(&self, request: RecommendationRequest) -> Result<RecommendedRoute, Error>;
}
