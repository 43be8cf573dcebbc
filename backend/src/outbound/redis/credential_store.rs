//! Redis-backed credential store.
//!
//! Accounts are JSON records at `user:<email>` written with `SET NX`, so
//! insert-if-absent is a single atomic store operation and email uniqueness
//! holds under concurrent registration. Numeric ids come from the
//! `user:id:seq` counter via `INCR`; a registration that loses the NX race
//! burns its id, which the sequence tolerates. Display-name updates rewrite
//! the record under `WATCH`/`MULTI`, retrying when a concurrent write lands
//! between the read and the transaction.

use async_trait::async_trait;
use bb8_redis::redis::{self, AsyncCommands};
use chrono::Utc;

use super::pool::{PoolError, RedisPool};
use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{DisplayName, EmailAddress, NewUser, UserId, UserRecord};

const USER_ID_SEQ: &str = "user:id:seq";

/// Retries before a contended read-modify-write gives up.
const UPDATE_ATTEMPTS: usize = 3;

fn user_key(email: &EmailAddress) -> String {
    format!("user:{email}")
}

fn map_pool_error(error: PoolError) -> CredentialStoreError {
    CredentialStoreError::connection(error.to_string())
}

fn map_command_error(error: redis::RedisError) -> CredentialStoreError {
    if error.is_io_error() {
        CredentialStoreError::connection(error.to_string())
    } else {
        CredentialStoreError::query(error.to_string())
    }
}

fn decode_record(email: &EmailAddress, payload: &str) -> Result<UserRecord, CredentialStoreError> {
    serde_json::from_str(payload).map_err(|err| {
        CredentialStoreError::query(format!("corrupt account record for {email}: {err}"))
    })
}

fn encode_record(record: &UserRecord) -> Result<String, CredentialStoreError> {
    serde_json::to_string(record).map_err(|err| {
        CredentialStoreError::query(format!("unserialisable account record: {err}"))
    })
}

fn apply_display_name(
    email: &EmailAddress,
    payload: &str,
    display_name: &DisplayName,
) -> Result<(UserRecord, String), CredentialStoreError> {
    let mut record = decode_record(email, payload)?;
    record.display_name = display_name.clone();
    let updated = encode_record(&record)?;
    Ok((record, updated))
}

/// Credential store adapter keeping one JSON record per account.
#[derive(Clone)]
pub struct RedisCredentialStore {
    pool: RedisPool,
}

impl RedisCredentialStore {
    /// Create the adapter over a shared pool.
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: u64 = conn.incr(USER_ID_SEQ, 1).await.map_err(map_command_error)?;
        let record = UserRecord {
            id: UserId::new(id),
            email: user.email,
            display_name: user.display_name,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };

        let payload = encode_record(&record)?;
        let created: bool = conn
            .set_nx(user_key(&record.email), payload)
            .await
            .map_err(map_command_error)?;
        if !created {
            return Err(CredentialStoreError::duplicate_email(
                record.email.to_string(),
            ));
        }
        Ok(record)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payload: Option<String> = conn.get(user_key(email)).await.map_err(map_command_error)?;
        payload
            .map(|payload| decode_record(email, &payload))
            .transpose()
    }

    async fn update_display_name(
        &self,
        email: &EmailAddress,
        display_name: &DisplayName,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = user_key(email);

        // Read-modify-write under WATCH: a concurrent write to the record
        // aborts the EXEC and the update retries against the fresh state.
        for _ in 0..UPDATE_ATTEMPTS {
            let _: () = redis::cmd("WATCH")
                .arg(&key)
                .query_async(&mut *conn)
                .await
                .map_err(map_command_error)?;

            let payload: Option<String> = conn.get(&key).await.map_err(map_command_error)?;
            let Some(payload) = payload else {
                let _: () = redis::cmd("UNWATCH")
                    .query_async(&mut *conn)
                    .await
                    .map_err(map_command_error)?;
                return Ok(None);
            };

            let (record, updated) = match apply_display_name(email, &payload, display_name) {
                Ok(pair) => pair,
                Err(err) => {
                    let _: () = redis::cmd("UNWATCH")
                        .query_async(&mut *conn)
                        .await
                        .map_err(map_command_error)?;
                    return Err(err);
                }
            };

            // A nil EXEC reply means the watched key changed underneath us.
            let committed: Option<()> = redis::pipe()
                .atomic()
                .set(&key, updated)
                .ignore()
                .query_async(&mut *conn)
                .await
                .map_err(map_command_error)?;
            if committed.is_some() {
                return Ok(Some(record));
            }
        }

        Err(CredentialStoreError::query(format!(
            "display name update for {email} kept losing to concurrent writes"
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the record codec helpers.
    use super::*;
    use rstest::rstest;

    fn email() -> EmailAddress {
        EmailAddress::new("runner@example.com").expect("valid email")
    }

    fn record() -> UserRecord {
        UserRecord {
            id: UserId::new(7),
            email: email(),
            display_name: DisplayName::new("Runner").expect("valid name"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn keys_use_the_canonical_email() {
        assert_eq!(user_key(&email()), "user:runner@example.com");
    }

    #[rstest]
    fn records_round_trip_through_the_codec() {
        let original = record();
        let payload = encode_record(&original).expect("record encodes");
        let decoded = decode_record(&email(), &payload).expect("record decodes");
        assert_eq!(decoded, original);
    }

    #[rstest]
    fn display_name_rewrite_keeps_the_rest_of_the_record() {
        let original = record();
        let payload = encode_record(&original).expect("record encodes");
        let renamed = DisplayName::new("Trail Runner").expect("valid name");

        let (updated, updated_payload) =
            apply_display_name(&email(), &payload, &renamed).expect("rewrite succeeds");
        assert_eq!(updated.display_name, renamed);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.password_hash, original.password_hash);
        assert_eq!(
            decode_record(&email(), &updated_payload).expect("updated payload decodes"),
            updated
        );
    }

    #[rstest]
    fn corrupt_payloads_are_query_errors() {
        let err = decode_record(&email(), "{not json").expect_err("decode must fail");
        assert!(matches!(err, CredentialStoreError::Query { .. }));
        assert!(err.to_string().contains("runner@example.com"));
    }
}
