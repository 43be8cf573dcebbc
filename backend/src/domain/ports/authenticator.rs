//! Driving port for account and session lifecycle operations.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Registration, SessionId, SessionRecord, UserProfile};

/// Result of a successful login: the minted token plus the identity it
/// authorises, so callers can answer the client without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub session_id: SessionId,
    pub profile: UserProfile,
}

/// Driving port covering register, login, validate, and logout.
///
/// Every operation takes its session identifier explicitly; nothing here
/// reads ambient request state.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create a new account. No session is minted as a side effect.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Verify credentials and mint a fresh session.
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, Error>;

    /// Resolve a session token to its identity.
    ///
    /// Side-effect free: validation never refreshes the TTL, so calling it
    /// any number of times leaves the session exactly as it was.
    async fn validate(&self, session_id: &SessionId) -> Result<SessionRecord, Error>;

    /// Destroy a session. Destroying an absent session succeeds.
    async fn logout(&self, session_id: &SessionId) -> Result<(), Error>;
}
