//! Tests for the authentication service.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{CredentialStore, SessionStore};
use crate::domain::{DisplayName, EmailAddress, ErrorCode, UserRecord};
use crate::outbound::memory::{MemoryCredentialStore, MemorySessionStore};

const TTL: Duration = Duration::from_secs(1800);

fn service_with_ttl(ttl: Duration) -> AuthService<MemoryCredentialStore, MemorySessionStore> {
    AuthService::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemorySessionStore::new()),
        PasswordHasher::new(),
        ttl,
    )
}

#[fixture]
fn service() -> AuthService<MemoryCredentialStore, MemorySessionStore> {
    service_with_ttl(TTL)
}

#[fixture]
fn registration() -> Registration {
    Registration::try_from_parts("runner@example.com", "Runner", "hunter2hunter2")
        .expect("valid registration")
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::try_from_parts(email, password).expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn register_then_login_succeeds(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
) {
    let profile = service
        .register(registration)
        .await
        .expect("registration succeeds");
    assert_eq!(profile.email().as_ref(), "runner@example.com");

    let outcome = service
        .login(credentials("runner@example.com", "hunter2hunter2"))
        .await
        .expect("login succeeds");
    assert!(!outcome.session_id.as_ref().is_empty());
    assert_eq!(outcome.profile.id(), profile.id());
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_conflicts(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
) {
    service
        .register(registration.clone())
        .await
        .expect("first registration succeeds");

    let err = service
        .register(registration)
        .await
        .expect_err("second registration must fail");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::wrong_password("runner@example.com", "not-the-password")]
#[case::unknown_email("nobody@example.com", "hunter2hunter2")]
#[tokio::test]
async fn bad_credentials_always_map_to_one_error(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
    #[case] email: &str,
    #[case] password: &str,
) {
    service
        .register(registration)
        .await
        .expect("registration succeeds");

    let err = service
        .login(credentials(email, password))
        .await
        .expect_err("login must fail");
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert_eq!(err.message(), "email or password is incorrect");
}

#[rstest]
#[tokio::test]
async fn validate_returns_the_identity_minted_at_login(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
) {
    let profile = service
        .register(registration)
        .await
        .expect("registration succeeds");
    let outcome = service
        .login(credentials("runner@example.com", "hunter2hunter2"))
        .await
        .expect("login succeeds");

    let session = service
        .validate(&outcome.session_id)
        .await
        .expect("fresh session validates");
    assert_eq!(session.user_id, profile.id());
    assert_eq!(session.email.as_ref(), "runner@example.com");
}

#[rstest]
#[tokio::test]
async fn validate_after_logout_is_unauthenticated(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
) {
    service
        .register(registration)
        .await
        .expect("registration succeeds");
    let outcome = service
        .login(credentials("runner@example.com", "hunter2hunter2"))
        .await
        .expect("login succeeds");

    service
        .logout(&outcome.session_id)
        .await
        .expect("logout succeeds");

    let err = service
        .validate(&outcome.session_id)
        .await
        .expect_err("destroyed session must not validate");
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
}

#[rstest]
#[tokio::test]
async fn logout_is_idempotent(service: AuthService<MemoryCredentialStore, MemorySessionStore>) {
    let never_issued = SessionId::random();
    service
        .logout(&never_issued)
        .await
        .expect("absent sessions are not an error");
    service
        .logout(&never_issued)
        .await
        .expect("repeat logout succeeds");
}

#[rstest]
#[tokio::test]
async fn concurrent_logins_mint_independent_sessions(
    service: AuthService<MemoryCredentialStore, MemorySessionStore>,
    registration: Registration,
) {
    service
        .register(registration)
        .await
        .expect("registration succeeds");

    let (first, second) = tokio::join!(
        service.login(credentials("runner@example.com", "hunter2hunter2")),
        service.login(credentials("runner@example.com", "hunter2hunter2")),
    );
    let first = first.expect("first login succeeds");
    let second = second.expect("second login succeeds");
    assert_ne!(first.session_id, second.session_id);

    service
        .logout(&first.session_id)
        .await
        .expect("logout succeeds");

    service
        .validate(&second.session_id)
        .await
        .expect("sibling session survives the other's logout");
    let err = service
        .validate(&first.session_id)
        .await
        .expect_err("logged-out session must not validate");
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
}

#[rstest]
#[tokio::test]
async fn expired_sessions_are_unauthenticated(registration: Registration) {
    let service = service_with_ttl(Duration::ZERO);
    service
        .register(registration)
        .await
        .expect("registration succeeds");
    let outcome = service
        .login(credentials("runner@example.com", "hunter2hunter2"))
        .await
        .expect("login succeeds");

    let err = service
        .validate(&outcome.session_id)
        .await
        .expect_err("expired session must not validate");
    assert_eq!(err.code(), ErrorCode::Unauthenticated);
}

struct UnreachableCredentialStore;

#[async_trait]
impl CredentialStore for UnreachableCredentialStore {
    async fn create(&self, _user: NewUser) -> Result<UserRecord, CredentialStoreError> {
        Err(CredentialStoreError::connection("refused"))
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        Err(CredentialStoreError::connection("refused"))
    }

    async fn update_display_name(
        &self,
        _email: &EmailAddress,
        _display_name: &DisplayName,
    ) -> Result<Option<UserRecord>, CredentialStoreError> {
        Err(CredentialStoreError::connection("refused"))
    }
}

struct UnreachableSessionStore;

#[async_trait]
impl SessionStore for UnreachableSessionStore {
    async fn put(
        &self,
        _id: &SessionId,
        _record: &SessionRecord,
        _ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::connection("refused"))
    }

    async fn get(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        Err(SessionStoreError::connection("refused"))
    }

    async fn delete(&self, _id: &SessionId) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::connection("refused"))
    }
}

#[rstest]
#[tokio::test]
async fn store_outages_are_not_credential_failures(registration: Registration) {
    let service = AuthService::new(
        Arc::new(UnreachableCredentialStore),
        Arc::new(UnreachableSessionStore),
        PasswordHasher::new(),
        TTL,
    );

    let err = service
        .register(registration)
        .await
        .expect_err("registration cannot reach the store");
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);

    let err = service
        .login(credentials("runner@example.com", "hunter2hunter2"))
        .await
        .expect_err("login cannot reach the store");
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);

    let err = service
        .validate(&SessionId::random())
        .await
        .expect_err("validation cannot reach the store");
    assert_eq!(
        err.code(),
        ErrorCode::StoreUnavailable,
        "an unreachable store must never read as a missing session",
    );
}
