//! Session token extraction for HTTP handlers.
//!
//! Clients present their session token either as the `session_id` cookie set
//! at login or as an explicit `X-Session-Id` header; the header wins when
//! both are present. Extraction never fails the request by itself: handlers
//! decide whether a missing token is an error by calling
//! [`SessionToken::required`].

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, SessionId};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Header alternative for clients that do not use cookies.
pub const SESSION_HEADER: &str = "X-Session-Id";

/// Outcome of looking for a session token on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionToken {
    /// No cookie and no header were present.
    Absent,
    /// A token was presented but is not a well-formed session id.
    Invalid,
    /// A well-formed token, not yet checked against the session store.
    Present(SessionId),
}

impl SessionToken {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some(value) if value.trim().is_empty() => Self::Absent,
            Some(value) => SessionId::new(value).map_or(Self::Invalid, Self::Present),
        }
    }

    /// The token, or `UnauthenticatedError` when it is absent or malformed.
    ///
    /// A malformed token gets the same 401 as a missing one: it can never
    /// match a stored session, and the distinction would only help someone
    /// probing the token format.
    pub fn required(&self) -> Result<&SessionId, Error> {
        match self {
            Self::Present(id) => Ok(id),
            Self::Absent => Err(Error::unauthenticated("login required")),
            Self::Invalid => Err(Error::unauthenticated("session is not valid")),
        }
    }

    /// The token when one was well-formed, without demanding it.
    #[must_use]
    pub fn present(&self) -> Option<&SessionId> {
        match self {
            Self::Present(id) => Some(id),
            Self::Absent | Self::Invalid => None,
        }
    }
}

fn token_from_request(req: &HttpRequest) -> SessionToken {
    if let Some(header) = req.headers().get(SESSION_HEADER) {
        return SessionToken::from_raw(header.to_str().ok());
    }
    let cookie = req.cookie(SESSION_COOKIE);
    SessionToken::from_raw(cookie.as_ref().map(actix_web::cookie::Cookie::value))
}

impl FromRequest for SessionToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(token_from_request(req)))
    }
}
