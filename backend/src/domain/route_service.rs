//! Saved route catalog services.
//!
//! Implements the saved route driving ports over the route repository.
//! Geometry is normalised on the way in, so the repository only ever holds
//! canonical coordinate order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    RouteRepository, RouteRepositoryError, SaveRoutePayload, SavedRouteCommand, SavedRouteQuery,
};
use crate::domain::{Error, RouteId, RouteName, SavedRoute, SavedRouteDraft, UserId};

fn map_repository_error(error: RouteRepositoryError) -> Error {
    match error {
        RouteRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("route repository unavailable: {message}"))
        }
        RouteRepositoryError::Query { message } => {
            Error::internal(format!("route repository error: {message}"))
        }
    }
}

/// Saved route service implementing the command and query driving ports.
#[derive(Clone)]
pub struct SavedRouteService<R: ?Sized> {
    route_repo: Arc<R>,
}

impl<R: ?Sized> SavedRouteService<R> {
    /// Create the service with the route repository.
    pub fn new(route_repo: Arc<R>) -> Self {
        Self { route_repo }
    }
}

impl<R> SavedRouteService<R>
where
    R: RouteRepository + ?Sized,
{
    /// Fetch a route and check it belongs to the acting user.
    async fn find_owned(&self, user_id: UserId, route_id: RouteId) -> Result<SavedRoute, Error> {
        let route = self
            .route_repo
            .find(route_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("route {route_id} not found")))?;

        if route.owner_id != user_id {
            return Err(Error::forbidden(format!(
                "route {route_id} belongs to another user"
            )));
        }
        Ok(route)
    }
}

#[async_trait]
impl<R> SavedRouteCommand for SavedRouteService<R>
where
    R: RouteRepository + ?Sized,
{
    async fn save(
        &self,
        user_id: UserId,
        payload: SaveRoutePayload,
    ) -> Result<SavedRoute, Error> {
        let canonical = payload.geometry.normalize()?;
        let draft = SavedRouteDraft::try_new(payload.name, canonical, payload.distance_m)
            .map_err(|err| Error::validation(err.to_string()))?;

        let route = self
            .route_repo
            .add(user_id, draft)
            .await
            .map_err(map_repository_error)?;
        info!(route_id = %route.id, user_id = %user_id, "route saved");
        Ok(route)
    }

    async fn rename(
        &self,
        user_id: UserId,
        route_id: RouteId,
        name: RouteName,
    ) -> Result<SavedRoute, Error> {
        self.find_owned(user_id, route_id).await?;

        self.route_repo
            .update_name(route_id, &name)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("route {route_id} not found")))
    }

    async fn delete(&self, user_id: UserId, route_id: RouteId) -> Result<(), Error> {
        self.find_owned(user_id, route_id).await?;

        // Ownership is established; a concurrent delete winning the race is
        // still a successful outcome.
        self.route_repo
            .remove(route_id)
            .await
            .map_err(map_repository_error)?;
        info!(route_id = %route_id, user_id = %user_id, "route deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> SavedRouteQuery for SavedRouteService<R>
where
    R: RouteRepository + ?Sized,
{
    async fn list(&self, user_id: UserId) -> Result<Vec<SavedRoute>, Error> {
        self.route_repo
            .list_for_owner(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "route_service_tests.rs"]
mod tests;
