//! Builders wiring store adapters and services into the HTTP state.
//!
//! Each backing concern picks its adapter from configuration: Redis stores
//! when `REDIS_URL` is set (with a startup ping so a dead cache fails fast),
//! in-memory stores otherwise; the HTTP geo-engine scorer when
//! `GEO_ENGINE_URL` is set, the deterministic fixture otherwise.

use std::sync::Arc;

use tracing::info;

use backend::domain::ports::{CredentialStore, RouteRepository, RouteScorer, SessionStore};
use backend::domain::{
    AuthService, PasswordHasher, RecommendationService, SavedRouteService, UserProfileService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::geo::GeoEngineScorer;
use backend::outbound::memory::{
    FixtureRouteScorer, MemoryCredentialStore, MemoryRouteRepository, MemorySessionStore,
};
use backend::outbound::redis::{
    PoolConfig, RedisCredentialStore, RedisPool, RedisRouteRepository, RedisSessionStore,
};

use super::Config;

/// Store adapters behind the driven ports.
struct Stores {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    routes: Arc<dyn RouteRepository>,
}

/// Connect the stores, verifying Redis reachability before serving traffic.
async fn build_stores(config: &Config) -> std::io::Result<Stores> {
    match &config.redis_url {
        Some(url) => {
            let pool = RedisPool::connect(PoolConfig::new(url.clone()))
                .await
                .map_err(std::io::Error::other)?;
            pool.ping().await.map_err(std::io::Error::other)?;
            info!("connected to redis");
            Ok(Stores {
                credentials: Arc::new(RedisCredentialStore::new(pool.clone())),
                sessions: Arc::new(RedisSessionStore::new(pool.clone())),
                routes: Arc::new(RedisRouteRepository::new(pool)),
            })
        }
        None => {
            info!("no REDIS_URL configured; using in-memory stores");
            Ok(Stores {
                credentials: Arc::new(MemoryCredentialStore::new()),
                sessions: Arc::new(MemorySessionStore::new()),
                routes: Arc::new(MemoryRouteRepository::new()),
            })
        }
    }
}

fn build_scorer(config: &Config) -> std::io::Result<Arc<dyn RouteScorer>> {
    match &config.geo_engine_url {
        Some(url) => {
            info!(endpoint = %url, "using geo-engine route scorer");
            let scorer = GeoEngineScorer::new(url.clone(), config.geo_timeout)
                .map_err(std::io::Error::other)?;
            Ok(Arc::new(scorer))
        }
        None => {
            info!("no GEO_ENGINE_URL configured; using fixture route scorer");
            Ok(Arc::new(FixtureRouteScorer::new()))
        }
    }
}

/// Build the HTTP state from configuration.
///
/// # Errors
///
/// Returns an error when Redis is configured but unreachable, or the
/// geo-engine HTTP client cannot be constructed.
pub async fn build_http_state(config: &Config) -> std::io::Result<HttpState> {
    let stores = build_stores(config).await?;
    let scorer = build_scorer(config)?;

    let auth = Arc::new(AuthService::new(
        Arc::clone(&stores.credentials),
        stores.sessions,
        PasswordHasher::new(),
        config.session_ttl,
    ));
    let recommender = Arc::new(RecommendationService::new(scorer));
    let route_service = Arc::new(SavedRouteService::new(stores.routes));
    let profile_service = Arc::new(UserProfileService::new(stores.credentials));

    Ok(HttpState {
        auth,
        recommender,
        route_commands: Arc::clone(&route_service) as _,
        route_queries: route_service,
        profiles: Arc::clone(&profile_service) as _,
        profile_commands: profile_service,
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use backend::domain::ports::RouteRecommender;

    use super::*;

    fn memory_config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 0,
            redis_url: None,
            geo_engine_url: None,
            session_ttl: std::time::Duration::from_secs(60),
            geo_timeout: std::time::Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn memory_wiring_needs_no_external_services() {
        let state = build_http_state(&memory_config())
            .await
            .expect("in-memory state builds");
        // The recommender is live: the fixture scorer answers without I/O.
        let request = backend::domain::RecommendationRequest::try_new(
            geometry::LatLng::try_from([51.5, -0.12]).expect("valid origin"),
            None,
            5.0,
            backend::domain::RoutePreferences::default(),
            None,
        )
        .expect("valid request");
        let route = state
            .recommender
            .recommend(request)
            .await
            .expect("fixture recommendation");
        assert!(route.distance_m > 0.0);
    }

    #[tokio::test]
    async fn unreachable_redis_fails_startup() {
        let config = Config {
            redis_url: Some("redis://127.0.0.1:1".into()),
            ..memory_config()
        };
        // HttpState carries no Debug impl, so narrow to () before unwrapping.
        let error = build_http_state(&config)
            .await
            .map(|_| ())
            .expect_err("dead redis rejects startup");
        assert!(!error.to_string().is_empty());
    }
}
