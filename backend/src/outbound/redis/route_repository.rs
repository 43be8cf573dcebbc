//! Redis-backed saved route repository.
//!
//! Routes live as JSON records in one hash per owner at `routes:<userId>`,
//! keyed by route id. A single `route:owners` hash maps route id to owner so
//! `find` can resolve a bare id without scanning, which is what lets the
//! service layer distinguish "does not exist" from "owned by someone else".
//! Ids come from the `route:id:seq` counter.

use async_trait::async_trait;
use bb8_redis::redis::{self, AsyncCommands};
use chrono::Utc;

use super::pool::{PoolError, RedisPool};
use crate::domain::ports::{RouteRepository, RouteRepositoryError};
use crate::domain::{RouteId, RouteName, SavedRoute, SavedRouteDraft, UserId};

const ROUTE_ID_SEQ: &str = "route:id:seq";
const ROUTE_OWNER_INDEX: &str = "route:owners";

fn routes_key(owner_id: UserId) -> String {
    format!("routes:{owner_id}")
}

fn map_pool_error(error: PoolError) -> RouteRepositoryError {
    RouteRepositoryError::connection(error.to_string())
}

fn map_command_error(error: redis::RedisError) -> RouteRepositoryError {
    if error.is_io_error() {
        RouteRepositoryError::connection(error.to_string())
    } else {
        RouteRepositoryError::query(error.to_string())
    }
}

fn decode_route(payload: &str) -> Result<SavedRoute, RouteRepositoryError> {
    serde_json::from_str(payload)
        .map_err(|err| RouteRepositoryError::query(format!("corrupt route record: {err}")))
}

fn encode_route(route: &SavedRoute) -> Result<String, RouteRepositoryError> {
    serde_json::to_string(route)
        .map_err(|err| RouteRepositoryError::query(format!("unserialisable route record: {err}")))
}

/// Saved route adapter keeping one hash of JSON records per owner.
#[derive(Clone)]
pub struct RedisRouteRepository {
    pool: RedisPool,
}

impl RedisRouteRepository {
    /// Create the adapter over a shared pool.
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn write_route(&self, route: &SavedRoute) -> Result<(), RouteRepositoryError> {
        let payload = encode_route(route)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let _: () = redis::pipe()
            .atomic()
            .hset(routes_key(route.owner_id), route.id.value(), payload)
            .ignore()
            .hset(ROUTE_OWNER_INDEX, route.id.value(), route.owner_id.value())
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;
        Ok(())
    }

    async fn owner_of(&self, id: RouteId) -> Result<Option<UserId>, RouteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner: Option<u64> = conn
            .hget(ROUTE_OWNER_INDEX, id.value())
            .await
            .map_err(map_command_error)?;
        Ok(owner.map(UserId::new))
    }
}

#[async_trait]
impl RouteRepository for RedisRouteRepository {
    async fn add(
        &self,
        owner_id: UserId,
        draft: SavedRouteDraft,
    ) -> Result<SavedRoute, RouteRepositoryError> {
        let id: u64 = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            conn.incr(ROUTE_ID_SEQ, 1).await.map_err(map_command_error)?
        };

        let route = SavedRoute::from_draft(RouteId::new(id), owner_id, draft, Utc::now());
        self.write_route(&route).await?;
        Ok(route)
    }

    async fn find(&self, id: RouteId) -> Result<Option<SavedRoute>, RouteRepositoryError> {
        let Some(owner_id) = self.owner_of(id).await? else {
            return Ok(None);
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payload: Option<String> = conn
            .hget(routes_key(owner_id), id.value())
            .await
            .map_err(map_command_error)?;
        payload.map(|payload| decode_route(&payload)).transpose()
    }

    async fn list_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<SavedRoute>, RouteRepositoryError> {
        let payloads: Vec<String> = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            conn.hvals(routes_key(owner_id))
                .await
                .map_err(map_command_error)?
        };

        let mut routes = payloads
            .iter()
            .map(|payload| decode_route(payload))
            .collect::<Result<Vec<_>, _>>()?;
        routes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(routes)
    }

    async fn update_name(
        &self,
        id: RouteId,
        name: &RouteName,
    ) -> Result<Option<SavedRoute>, RouteRepositoryError> {
        let Some(mut route) = self.find(id).await? else {
            return Ok(None);
        };

        route.name = name.clone();
        self.write_route(&route).await?;
        Ok(Some(route))
    }

    async fn remove(&self, id: RouteId) -> Result<bool, RouteRepositoryError> {
        let Some(owner_id) = self.owner_of(id).await? else {
            return Ok(false);
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (removed,): (u64,) = redis::pipe()
            .atomic()
            .hdel(routes_key(owner_id), id.value())
            .hdel(ROUTE_OWNER_INDEX, id.value())
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;
        Ok(removed > 0)
    }
}
