//! Driving ports for the saved route catalog.

use async_trait::async_trait;
use geometry::GeometryInput;

use crate::domain::{Error, RouteId, RouteName, SavedRoute, UserId};

/// Caller payload for saving a route.
///
/// Geometry arrives in any accepted input shape; the service normalises it
/// before anything is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRoutePayload {
    pub name: RouteName,
    pub geometry: GeometryInput,
    pub distance_m: f64,
}

/// Driving port for saved route mutations.
///
/// Every operation authorises against the acting user: a route owned by
/// someone else is `ForbiddenError`, an absent route is `NotFoundError`.
#[async_trait]
pub trait SavedRouteCommand: Send + Sync {
    /// Normalise and persist a new route for the acting user.
    async fn save(&self, user_id: UserId, payload: SaveRoutePayload)
    -> Result<SavedRoute, Error>;

    /// Rename a route the acting user owns.
    async fn rename(
        &self,
        user_id: UserId,
        route_id: RouteId,
        name: RouteName,
    ) -> Result<SavedRoute, Error>;

    /// Delete a route the acting user owns.
    async fn delete(&self, user_id: UserId, route_id: RouteId) -> Result<(), Error>;
}

/// Driving port for saved route reads.
#[async_trait]
pub trait SavedRouteQuery: Send + Sync {
    /// The acting user's routes, newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<SavedRoute>, Error>;
}
