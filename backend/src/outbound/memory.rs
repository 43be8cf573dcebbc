//! In-process adapters for the store and repository ports.
//!
//! These back two situations: unit and integration tests, and local
//! development without a Redis instance. They honour the same contracts as
//! the Redis adapters, including TTL expiry on session reads and
//! insert-if-absent registration.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use serde_json::json;

use crate::domain::ports::{
    CredentialStore, CredentialStoreError, RouteRepository, RouteRepositoryError, RouteScorer,
    ScoringError, SessionStore, SessionStoreError,
};
use crate::domain::{
    DisplayName, EmailAddress, NewUser, RouteId, RouteName, SavedRoute, SavedRouteDraft,
    ScoredRoute, ScoringRequest, SessionId, SessionRecord, UserId, UserRecord,
};

fn lock_poisoned<T>(_: T) -> CredentialStoreError {
    CredentialStoreError::query("credential map lock poisoned")
}

/// In-memory credential store keyed by canonical email.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: Mutex<HashMap<EmailAddress, UserRecord>>,
    next_id: Mutex<u64>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> Result<UserId, CredentialStoreError> {
        let mut next = self.next_id.lock().map_err(lock_poisoned)?;
        *next += 1;
        Ok(UserId::new(*next))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialStoreError> {
        let id = self.allocate_id()?;
        let mut records = self.records.lock().map_err(lock_poisoned)?;
        if records.contains_key(&user.email) {
            return Err(CredentialStoreError::duplicate_email(
                user.email.to_string(),
            ));
        }

        let record = UserRecord {
            id,
            email: user.email.clone(),
            display_name: user.display_name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        records.insert(user.email, record.clone());
        Ok(record)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        let records = self.records.lock().map_err(lock_poisoned)?;
        Ok(records.get(email).cloned())
    }

    async fn update_display_name(
        &self,
        email: &EmailAddress,
        display_name: &DisplayName,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        let mut records = self.records.lock().map_err(lock_poisoned)?;
        Ok(records.get_mut(email).map(|record| {
            record.display_name = display_name.clone();
            record.clone()
        }))
    }
}

struct StoredSession {
    record: SessionRecord,
    expires_at: Instant,
}

/// In-memory session store with TTL expiry enforced on read.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn session_lock_poisoned<T>(_: T) -> SessionStoreError {
    SessionStoreError::query("session map lock poisoned")
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.lock().map_err(session_lock_poisoned)?;
        sessions.insert(
            id.to_string(),
            StoredSession {
                record: record.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut sessions = self.sessions.lock().map_err(session_lock_poisoned)?;
        match sessions.get(id.as_ref()) {
            Some(stored) if stored.expires_at > Instant::now() => Ok(Some(stored.record.clone())),
            Some(_) => {
                // Expired entries read as absent, matching store-owned TTL.
                sessions.remove(id.as_ref());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.lock().map_err(session_lock_poisoned)?;
        sessions.remove(id.as_ref());
        Ok(())
    }
}

fn route_lock_poisoned<T>(_: T) -> RouteRepositoryError {
    RouteRepositoryError::query("route map lock poisoned")
}

/// In-memory saved route repository.
#[derive(Debug, Default)]
pub struct MemoryRouteRepository {
    routes: Mutex<HashMap<RouteId, SavedRoute>>,
    next_id: Mutex<u64>,
}

impl MemoryRouteRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> Result<RouteId, RouteRepositoryError> {
        let mut next = self.next_id.lock().map_err(route_lock_poisoned)?;
        *next += 1;
        Ok(RouteId::new(*next))
    }
}

#[async_trait]
impl RouteRepository for MemoryRouteRepository {
    async fn add(
        &self,
        owner_id: UserId,
        draft: SavedRouteDraft,
    ) -> Result<SavedRoute, RouteRepositoryError> {
        let id = self.allocate_id()?;
        let route = SavedRoute::from_draft(id, owner_id, draft, Utc::now());
        let mut routes = self.routes.lock().map_err(route_lock_poisoned)?;
        routes.insert(id, route.clone());
        Ok(route)
    }

    async fn find(&self, id: RouteId) -> Result<Option<SavedRoute>, RouteRepositoryError> {
        let routes = self.routes.lock().map_err(route_lock_poisoned)?;
        Ok(routes.get(&id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<SavedRoute>, RouteRepositoryError> {
        let routes = self.routes.lock().map_err(route_lock_poisoned)?;
        let mut owned: Vec<SavedRoute> = routes
            .values()
            .filter(|route| route.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn update_name(
        &self,
        id: RouteId,
        name: &RouteName,
    ) -> Result<Option<SavedRoute>, RouteRepositoryError> {
        let mut routes = self.routes.lock().map_err(route_lock_poisoned)?;
        Ok(routes.get_mut(&id).map(|route| {
            route.name = name.clone();
            route.clone()
        }))
    }

    async fn remove(&self, id: RouteId) -> Result<bool, RouteRepositoryError> {
        let mut routes = self.routes.lock().map_err(route_lock_poisoned)?;
        Ok(routes.remove(&id).is_some())
    }
}

/// Deterministic scorer standing in for the geo-engine.
///
/// Origin requests get a straight two-point line offset north-east of the
/// origin; geometry requests echo the supplied line. Scores are fixed, so
/// handlers and services can assert on exact values.
#[derive(Debug, Default)]
pub struct FixtureRouteScorer;

impl FixtureRouteScorer {
    /// Stateless scorer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

// Roughly one kilometre of latitude.
const FIXTURE_STEP_DEGREES: f64 = 0.009;

fn fixture_scores() -> std::collections::BTreeMap<String, f64> {
    [
        ("finalScore".to_owned(), 72.5),
        ("crosswalkCount".to_owned(), 2.0),
    ]
    .into_iter()
    .collect()
}

#[async_trait]
impl RouteScorer for FixtureRouteScorer {
    async fn score(&self, request: ScoringRequest) -> Result<ScoredRoute, ScoringError> {
        match request {
            ScoringRequest::FromOrigin {
                origin,
                distance_km,
                ..
            } => {
                let lng = origin.longitude();
                let lat = origin.latitude();
                Ok(ScoredRoute {
                    geometry: json!([
                        [lng, lat],
                        [lng + FIXTURE_STEP_DEGREES, lat + FIXTURE_STEP_DEGREES],
                    ]),
                    distance_m: distance_km * 1000.0,
                    scores: fixture_scores(),
                })
            }
            ScoringRequest::ForGeometry {
                distance_m,
                geometry,
                ..
            } => {
                let geometry = serde_json::to_value(&geometry)
                    .map_err(|err| ScoringError::protocol(err.to_string()))?;
                Ok(ScoredRoute {
                    geometry,
                    distance_m,
                    scores: fixture_scores(),
                })
            }
        }
    }
}
