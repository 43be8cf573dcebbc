//! Port for the TTL-backed session store.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{SessionId, SessionRecord};

/// Errors raised by session store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// Store connection could not be established.
    #[error("session store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("session store query failed: {message}")]
    Query { message: String },
}

impl SessionStoreError {
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

/// Port for session state shared across backend processes.
///
/// Expiry ownership lies with the store: the TTL is set when the record is
/// written and reads never refresh it. An expired session is
/// indistinguishable from one that never existed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write a session record under the token with a bounded lifetime.
    async fn put(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Read the record for a token, `None` when absent or expired.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Delete the record for a token. Absent records are not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn query_error_formats_message() {
        let err = SessionStoreError::query("hash read failed");
        assert!(err.to_string().contains("hash read failed"));
    }
}
