//! Port for the external geo-engine scoring call.

use async_trait::async_trait;

use crate::domain::{ScoredRoute, ScoringRequest};

/// Errors raised by geo-engine adapters.
///
/// The split matters to callers: `InvalidRequest` carries an engine-supplied,
/// user-safe reason; the other three describe the engine itself misbehaving
/// and never leak wire-level detail past their message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// The engine rejected the request; the message is safe to show callers.
    #[error("{message}")]
    InvalidRequest { message: String },
    /// The engine responded outside its contract.
    #[error("geo-engine protocol violation: {message}")]
    Protocol { message: String },
    /// The engine did not respond within the deadline.
    #[error("geo-engine timed out: {message}")]
    Timeout { message: String },
    /// The engine could not be reached at all.
    #[error("geo-engine unreachable: {message}")]
    Transport { message: String },
}

impl ScoringError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Port for one synchronous scoring round-trip to the geo-engine.
///
/// Implementations make exactly one outbound call per invocation; retry
/// policy belongs to the caller because engine scoring is not idempotent.
#[async_trait]
pub trait RouteScorer: Send + Sync {
    /// Score a route request against the engine.
    async fn score(&self, request: ScoringRequest) -> Result<ScoredRoute, ScoringError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn invalid_request_displays_the_engine_message_verbatim() {
        let err = ScoringError::invalid_request("no path found");
        assert_eq!(err.to_string(), "no path found");
    }

    #[rstest]
    fn protocol_error_is_prefixed() {
        let err = ScoringError::protocol("missing 'route' key");
        assert_eq!(
            err.to_string(),
            "geo-engine protocol violation: missing 'route' key"
        );
    }
}
