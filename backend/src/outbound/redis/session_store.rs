//! Redis-backed session store.
//!
//! Canonical session protocol: one hash per session at `session:<uuid-v4>`
//! with fields `userId`, `email`, `displayName`, and `createdAt` (RFC 3339).
//! The TTL is applied with `EXPIRE` in the same pipeline as the write and is
//! never refreshed by reads, so validation stays side-effect free and expiry
//! ownership stays with Redis.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis::{self, AsyncCommands};
use chrono::{DateTime, Utc};

use super::pool::{PoolError, RedisPool};
use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{DisplayName, EmailAddress, SessionId, SessionRecord, UserId};

const USER_ID_FIELD: &str = "userId";
const EMAIL_FIELD: &str = "email";
const DISPLAY_NAME_FIELD: &str = "displayName";
const CREATED_AT_FIELD: &str = "createdAt";

fn session_key(id: &SessionId) -> String {
    format!("session:{id}")
}

fn map_pool_error(error: PoolError) -> SessionStoreError {
    SessionStoreError::connection(error.to_string())
}

fn map_command_error(error: redis::RedisError) -> SessionStoreError {
    if error.is_io_error() {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::query(error.to_string())
    }
}

fn parse_record(
    id: &SessionId,
    mut fields: HashMap<String, String>,
) -> Result<SessionRecord, SessionStoreError> {
    let mut take = |name: &str| {
        fields
            .remove(name)
            .ok_or_else(|| SessionStoreError::query(format!("session {id} missing field {name}")))
    };

    let user_id: u64 = take(USER_ID_FIELD)?
        .parse()
        .map_err(|_| SessionStoreError::query(format!("session {id} has a non-numeric user id")))?;
    let email = EmailAddress::new(take(EMAIL_FIELD)?)
        .map_err(|err| SessionStoreError::query(format!("session {id} has a bad email: {err}")))?;
    let display_name = DisplayName::new(take(DISPLAY_NAME_FIELD)?).map_err(|err| {
        SessionStoreError::query(format!("session {id} has a bad display name: {err}"))
    })?;
    let created_at = DateTime::parse_from_rfc3339(&take(CREATED_AT_FIELD)?)
        .map_err(|err| {
            SessionStoreError::query(format!("session {id} has a bad timestamp: {err}"))
        })?
        .with_timezone(&Utc);

    Ok(SessionRecord {
        user_id: UserId::new(user_id),
        email,
        display_name,
        created_at,
    })
}

/// Session store adapter writing one TTL hash per session.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: RedisPool,
}

impl RedisSessionStore {
    /// Create the adapter over a shared pool.
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let key = session_key(id);
        let fields = [
            (USER_ID_FIELD, record.user_id.to_string()),
            (EMAIL_FIELD, record.email.to_string()),
            (DISPLAY_NAME_FIELD, record.display_name.to_string()),
            (CREATED_AT_FIELD, record.created_at.to_rfc3339()),
        ];
        // Sub-second TTLs round up so a written session is never born dead.
        let ttl_secs = i64::try_from(ttl.as_secs().max(1))
            .map_err(|_| SessionStoreError::query("session TTL out of range"))?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, ttl_secs)
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(map_command_error)?;
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let fields: HashMap<String, String> = conn
            .hgetall(session_key(id))
            .await
            .map_err(map_command_error)?;

        // HGETALL on an absent or expired key yields an empty map.
        if fields.is_empty() {
            return Ok(None);
        }
        parse_record(id, fields).map(Some)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let _: () = conn
            .del(session_key(id))
            .await
            .map_err(map_command_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the hash mapping helpers.
    use super::*;
    use rstest::rstest;

    fn full_fields() -> HashMap<String, String> {
        HashMap::from([
            (USER_ID_FIELD.to_owned(), "7".to_owned()),
            (EMAIL_FIELD.to_owned(), "runner@example.com".to_owned()),
            (DISPLAY_NAME_FIELD.to_owned(), "Runner".to_owned()),
            (
                CREATED_AT_FIELD.to_owned(),
                "2024-05-01T08:30:00+00:00".to_owned(),
            ),
        ])
    }

    #[rstest]
    fn keys_carry_the_session_prefix() {
        let id = SessionId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid UUID");
        assert_eq!(
            session_key(&id),
            "session:3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[rstest]
    fn complete_hashes_parse_into_records() {
        let id = SessionId::random();
        let record = parse_record(&id, full_fields()).expect("record parses");
        assert_eq!(record.user_id.value(), 7);
        assert_eq!(record.email.as_ref(), "runner@example.com");
        assert_eq!(record.display_name.as_ref(), "Runner");
    }

    #[rstest]
    #[case::no_user(USER_ID_FIELD)]
    #[case::no_email(EMAIL_FIELD)]
    #[case::no_name(DISPLAY_NAME_FIELD)]
    #[case::no_timestamp(CREATED_AT_FIELD)]
    fn missing_fields_are_query_errors(#[case] dropped: &str) {
        let id = SessionId::random();
        let mut fields = full_fields();
        fields.remove(dropped);

        let err = parse_record(&id, fields).expect_err("parse must fail");
        assert!(matches!(err, SessionStoreError::Query { .. }));
    }

    #[rstest]
    fn corrupt_user_ids_are_query_errors() {
        let id = SessionId::random();
        let mut fields = full_fields();
        fields.insert(USER_ID_FIELD.to_owned(), "seven".to_owned());

        let err = parse_record(&id, fields).expect_err("parse must fail");
        assert!(err.to_string().contains("non-numeric"));
    }
}
