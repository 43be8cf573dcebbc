//! Session-based authentication service.
//!
//! Implements the [`Authenticator`] driving port over a credential store and
//! a TTL-backed session store. Session lifecycle is deliberately minimal:
//! `absent → active (login) → absent (logout or TTL expiry)`, with no
//! intermediate states and no mutation during validation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::domain::ports::{
    Authenticator, CredentialStore, CredentialStoreError, LoginOutcome, SessionStore,
    SessionStoreError,
};
use crate::domain::{
    Credentials, Error, NewUser, PasswordHasher, Registration, SessionId, SessionRecord,
    UserProfile,
};

/// One message for every credential failure so responses never reveal
/// whether the email or the password was wrong.
const BAD_CREDENTIALS: &str = "email or password is incorrect";

fn map_credential_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::store_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
        CredentialStoreError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
        }
    }
}

fn map_session_error(error: SessionStoreError) -> Error {
    match error {
        SessionStoreError::Connection { message } => {
            Error::store_unavailable(format!("session store unavailable: {message}"))
        }
        SessionStoreError::Query { message } => {
            Error::internal(format!("session store error: {message}"))
        }
    }
}

/// Authentication service owning credential verification and session
/// lifecycle.
#[derive(Clone)]
pub struct AuthService<C: ?Sized, S: ?Sized> {
    credential_store: Arc<C>,
    session_store: Arc<S>,
    password_hasher: PasswordHasher,
    session_ttl: Duration,
}

impl<C: ?Sized, S: ?Sized> AuthService<C, S> {
    /// Create the service with explicitly-owned dependencies.
    pub fn new(
        credential_store: Arc<C>,
        session_store: Arc<S>,
        password_hasher: PasswordHasher,
        session_ttl: Duration,
    ) -> Self {
        Self {
            credential_store,
            session_store,
            password_hasher,
            session_ttl,
        }
    }
}

#[async_trait]
impl<C, S> Authenticator for AuthService<C, S>
where
    C: CredentialStore + ?Sized,
    S: SessionStore + ?Sized,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let password_hash = self
            .password_hasher
            .hash(registration.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        let record = self
            .credential_store
            .create(NewUser {
                email: registration.email().clone(),
                display_name: registration.display_name().clone(),
                password_hash,
            })
            .await
            .map_err(map_credential_error)?;

        info!(user_id = %record.id, "account registered");
        Ok(record.into())
    }

    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, Error> {
        let record = self
            .credential_store
            .find_by_email(credentials.email())
            .await
            .map_err(map_credential_error)?
            .ok_or_else(|| Error::invalid_credentials(BAD_CREDENTIALS))?;

        let verified = self
            .password_hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if !verified {
            debug!(user_id = %record.id, "password mismatch at login");
            return Err(Error::invalid_credentials(BAD_CREDENTIALS));
        }

        let session_id = SessionId::random();
        let session = SessionRecord {
            user_id: record.id,
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            created_at: Utc::now(),
        };
        self.session_store
            .put(&session_id, &session, self.session_ttl)
            .await
            .map_err(map_session_error)?;

        info!(user_id = %record.id, "session minted");
        Ok(LoginOutcome {
            session_id,
            profile: record.into(),
        })
    }

    async fn validate(&self, session_id: &SessionId) -> Result<SessionRecord, Error> {
        self.session_store
            .get(session_id)
            .await
            .map_err(map_session_error)?
            .ok_or_else(|| Error::unauthenticated("login required"))
    }

    async fn logout(&self, session_id: &SessionId) -> Result<(), Error> {
        self.session_store
            .delete(session_id)
            .await
            .map_err(map_session_error)?;
        debug!(session_id = %session_id, "session destroyed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
