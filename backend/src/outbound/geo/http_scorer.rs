//! Reqwest-backed geo-engine scoring adapter.
//!
//! This adapter owns transport details only: request serialisation, the
//! mandatory response timeout, status classification, and best-effort
//! decoding of the engine's structured 4xx error body. Raw engine bodies are
//! logged (truncated) and never surfaced to callers verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use super::dto::{EngineErrorDto, ScoreResponseDto, ScoringRequestDto};
use crate::domain::ports::{RouteScorer, ScoringError};
use crate::domain::{ScoredRoute, ScoringRequest};

const SCORE_ROUTE_PATH: &str = "score-route";

/// Stable message shown when the engine rejects a request but its error body
/// cannot be decoded.
pub const FALLBACK_REJECTION_MESSAGE: &str =
    "the geo-engine could not fulfil this request; adjust the origin or distance and retry";

/// Geo-engine adapter performing one HTTP POST per scoring call.
pub struct GeoEngineScorer {
    client: Client,
    endpoint: Url,
}

impl GeoEngineScorer {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// The timeout covers the whole round-trip; the engine is a synchronous
    /// collaborator in the tens-of-seconds class, so the caller-supplied
    /// value is mandatory rather than defaulted.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut endpoint = base_url;
        let path = format!(
            "{}/{SCORE_ROUTE_PATH}",
            endpoint.path().trim_end_matches('/')
        );
        endpoint.set_path(&path);
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RouteScorer for GeoEngineScorer {
    async fn score(&self, request: ScoringRequest) -> Result<ScoredRoute, ScoringError> {
        let body = ScoringRequestDto::from_domain(&request);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() {
            return parse_success(bytes.as_ref());
        }
        Err(map_status_error(status, bytes.as_ref()))
    }
}

fn parse_success(body: &[u8]) -> Result<ScoredRoute, ScoringError> {
    let decoded: ScoreResponseDto = serde_json::from_slice(body).map_err(|err| {
        ScoringError::protocol(format!("invalid scoring response payload: {err}"))
    })?;
    let route = decoded
        .route
        .ok_or_else(|| ScoringError::protocol("scoring response is missing 'route'"))?;
    route.into_domain().map_err(ScoringError::protocol)
}

fn map_transport_error(error: reqwest::Error) -> ScoringError {
    if error.is_timeout() {
        ScoringError::timeout(error.to_string())
    } else {
        ScoringError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ScoringError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ScoringError::timeout(format!("status {}", status.as_u16()))
        }
        _ if status.is_client_error() => map_rejection(status, body),
        _ => ScoringError::protocol(format!(
            "status {}: {}",
            status.as_u16(),
            body_preview(body)
        )),
    }
}

/// Decode the engine's `{errorCode, error}` body on a best-effort basis.
///
/// A decodable body surfaces the engine's own message, which is user-safe by
/// contract. Anything else degrades to the stable fallback; the raw body is
/// only ever logged.
fn map_rejection(status: StatusCode, body: &[u8]) -> ScoringError {
    match serde_json::from_slice::<EngineErrorDto>(body) {
        Ok(EngineErrorDto {
            error_code,
            error: Some(message),
        }) if !message.trim().is_empty() => {
            warn!(
                status = status.as_u16(),
                error_code = error_code.as_deref().unwrap_or("-"),
                "geo-engine rejected the scoring request"
            );
            ScoringError::invalid_request(message)
        }
        _ => {
            warn!(
                status = status.as_u16(),
                body = %body_preview(body),
                "geo-engine rejection body was not decodable"
            );
            ScoringError::invalid_request(FALLBACK_REJECTION_MESSAGE)
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
