//! Geo-engine adapter implementing the route scoring port over HTTP.
//!
//! The engine is an external collaborator with a fixed contract: one POST to
//! `/score-route`, a `{route: {...}}` success body, and a `{errorCode, error}`
//! body on 4xx. This module owns transport details only; the orchestration
//! service translates the resulting [`ScoringError`][err] values into the
//! caller-facing taxonomy.
//!
//! [err]: crate::domain::ports::ScoringError

mod dto;
mod http_scorer;

pub use http_scorer::{FALLBACK_REJECTION_MESSAGE, GeoEngineScorer};
