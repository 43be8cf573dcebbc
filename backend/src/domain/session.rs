//! Session identity model.
//!
//! A session is a server-side record keyed by an opaque UUID token. The
//! record carries enough identity for handlers to act without a second
//! account lookup on every request.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{DisplayName, EmailAddress, UserId};

/// Validation errors returned by [`SessionId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "session id must not be empty"),
            Self::InvalidId => write!(f, "session id must be a valid UUID"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Opaque session token stored as a UUID.
///
/// The string form is kept alongside the parsed UUID so store keys and
/// response payloads reuse the exact text the client presented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(Uuid, String);

impl SessionId {
    /// Validate and construct a [`SessionId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, SessionValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`SessionId`].
    #[must_use]
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, SessionValidationError> {
        if id.is_empty() {
            return Err(SessionValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(SessionValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| SessionValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        let SessionId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Identity attached to a live session.
///
/// This is the record the session store persists and the value a successful
/// validation hands back to handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn random_ids_round_trip_as_strings() {
        let id = SessionId::random();
        let text = id.to_string();
        let parsed = SessionId::new(&text).expect("generated ids are valid");
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_uuid(), id.as_uuid());
    }

    #[rstest]
    #[case::empty("", SessionValidationError::EmptyId)]
    #[case::not_a_uuid("not-a-uuid", SessionValidationError::InvalidId)]
    #[case::padded(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ", SessionValidationError::InvalidId)]
    fn invalid_ids_are_rejected(#[case] input: &str, #[case] expected: SessionValidationError) {
        assert_eq!(SessionId::new(input), Err(expected));
    }

    #[rstest]
    fn session_id_serialises_as_its_string_form() {
        let id = SessionId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid UUID");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
    }
}
