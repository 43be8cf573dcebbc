//! Port for saved route persistence.

use async_trait::async_trait;

use crate::domain::{RouteId, RouteName, SavedRoute, SavedRouteDraft, UserId};

/// Errors raised by route repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteRepositoryError {
    /// Repository connection could not be established.
    #[error("route repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("route repository query failed: {message}")]
    Query { message: String },
}

impl RouteRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for the saved route catalog.
///
/// Lookups are id-addressed regardless of owner so the service layer can
/// tell "does not exist" apart from "owned by someone else".
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Persist a draft for an owner, assigning id and creation time.
    async fn add(
        &self,
        owner_id: UserId,
        draft: SavedRouteDraft,
    ) -> Result<SavedRoute, RouteRepositoryError>;

    /// Look up one route by id, whoever owns it.
    async fn find(&self, id: RouteId) -> Result<Option<SavedRoute>, RouteRepositoryError>;

    /// All routes owned by a user, newest first.
    async fn list_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<SavedRoute>, RouteRepositoryError>;

    /// Replace the name on an existing route.
    ///
    /// Returns `None` when the route vanished since it was looked up.
    async fn update_name(
        &self,
        id: RouteId,
        name: &RouteName,
    ) -> Result<Option<SavedRoute>, RouteRepositoryError>;

    /// Delete a route. Returns whether a record was removed.
    async fn remove(&self, id: RouteId) -> Result<bool, RouteRepositoryError>;
}
