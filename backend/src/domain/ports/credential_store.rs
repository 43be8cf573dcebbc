//! Port for account credential persistence.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, NewUser, UserRecord};

/// Errors raised by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// Store connection could not be established.
    #[error("credential store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("credential store query failed: {message}")]
    Query { message: String },
    /// Insert-if-absent lost to an existing record with the same email.
    #[error("an account already exists for {email}")]
    DuplicateEmail { email: String },
}

impl CredentialStoreError {
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

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Port for the user record store keyed by canonical email.
///
/// Uniqueness is the store's invariant: `create` must be insert-if-absent so
/// two concurrent registrations for one email produce exactly one account.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new account, assigning its identifier.
    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialStoreError>;

    /// Look up an account by canonical email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, CredentialStoreError>;

    /// Replace the display name on an existing account.
    ///
    /// Returns `None` when no account exists for the email.
    async fn update_display_name(
        &self,
        email: &EmailAddress,
        display_name: &DisplayName,
    ) -> Result<Option<UserRecord>, CredentialStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_email_error_names_the_address() {
        let err = CredentialStoreError::duplicate_email("runner@example.com");
        assert_eq!(
            err.to_string(),
            "an account already exists for runner@example.com"
        );
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = CredentialStoreError::connection("refused");
        assert!(err.to_string().contains("refused"));
    }
}
