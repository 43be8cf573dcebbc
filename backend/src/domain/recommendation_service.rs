//! Route recommendation orchestration.
//!
//! Implements the [`RouteRecommender`] driving port over the geo-engine
//! scoring port. The service owns two translations: caller geometry is
//! normalised before anything leaves the process, and engine failures are
//! mapped onto the stable caller-facing taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{RouteRecommender, RouteScorer, ScoringError};
use crate::domain::{Error, RecommendationRequest, RecommendedRoute, ScoringRequest};

const METRES_PER_KILOMETRE: f64 = 1000.0;

fn map_scoring_error(error: ScoringError) -> Error {
    match error {
        // Engine-authored reason, already user-safe; relay it verbatim.
        ScoringError::InvalidRequest { message } => Error::invalid_request(message),
        ScoringError::Protocol { message } => {
            Error::upstream_protocol(format!("geo-engine protocol violation: {message}"))
        }
        ScoringError::Timeout { message } => {
            Error::upstream_timeout(format!("geo-engine timed out: {message}"))
        }
        ScoringError::Transport { message } => {
            Error::upstream_protocol(format!("geo-engine unreachable: {message}"))
        }
    }
}

/// Orchestrates one scoring round-trip per recommendation request.
#[derive(Clone)]
pub struct RecommendationService<E: ?Sized> {
    scorer: Arc<E>,
}

impl<E: ?Sized> RecommendationService<E> {
    /// Create the service with the geo-engine scoring port.
    pub fn new(scorer: Arc<E>) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl<E> RouteRecommender for RecommendationService<E>
where
    E: RouteScorer + ?Sized,
{
    async fn recommend(&self, request: RecommendationRequest) -> Result<RecommendedRoute, Error> {
        let (origin, destination, distance_km, preferences, geometry) = request.into_parts();

        let scoring = match geometry {
            Some(input) => {
                let canonical = input.normalize()?;
                debug!(points = canonical.len(), "scoring caller-supplied geometry");
                ScoringRequest::ForGeometry {
                    distance_m: distance_km * METRES_PER_KILOMETRE,
                    geometry: canonical,
                    preferences,
                }
            }
            None => ScoringRequest::FromOrigin {
                origin,
                distance_km,
                preferences,
            },
        };

        let scored = self
            .scorer
            .score(scoring)
            .await
            .map_err(map_scoring_error)?;

        Ok(RecommendedRoute {
            origin,
            destination,
            geometry: scored.geometry,
            distance_m: scored.distance_m,
            scores: scored.scores,
        })
    }
}

#[cfg(test)]
#[path = "recommendation_service_tests.rs"]
mod tests;
