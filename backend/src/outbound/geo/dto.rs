//! DTOs for the geo-engine wire protocol.
//!
//! The adapter encodes scoring requests into the engine's two request
//! dialects and decodes responses into domain records in one pass. Response
//! decoding is deliberately tolerant: the engine has shipped its geometry
//! under both `geomJson` and `geometry`, and every numeric field outside the
//! known ones is collected as a sub-score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{RoutePreferences, ScoredRoute, ScoringRequest};
use geometry::{LatLng, RouteGeometry};

/// Outbound request body, one variant per engine dialect.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum ScoringRequestDto<'a> {
    #[serde(rename_all = "camelCase")]
    FromOrigin {
        /// `[latitude, longitude]`, the order the engine expects.
        origin: &'a LatLng,
        distance_km: f64,
        prefs: &'a RoutePreferences,
    },
    #[serde(rename_all = "camelCase")]
    ForGeometry {
        distance_m: f64,
        /// Canonical `[longitude, latitude]` point list.
        geometry: &'a RouteGeometry,
        prefs: &'a RoutePreferences,
    },
}

impl<'a> ScoringRequestDto<'a> {
    pub(super) fn from_domain(request: &'a ScoringRequest) -> Self {
        match request {
            ScoringRequest::FromOrigin {
                origin,
                distance_km,
                preferences,
            } => Self::FromOrigin {
                origin,
                distance_km: *distance_km,
                prefs: preferences,
            },
            ScoringRequest::ForGeometry {
                distance_m,
                geometry,
                preferences,
            } => Self::ForGeometry {
                distance_m: *distance_m,
                geometry,
                prefs: preferences,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ScoreResponseDto {
    pub(super) route: Option<RouteDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RouteDto {
    distance_m: f64,
    geom_json: Option<Value>,
    geometry: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl RouteDto {
    /// Map the wire route into a domain record.
    ///
    /// Numeric extras become sub-scores; non-numeric extras (names,
    /// echoed coordinates, timestamps) are dropped.
    pub(super) fn into_domain(self) -> Result<ScoredRoute, String> {
        let geometry = self
            .geom_json
            .or(self.geometry)
            .ok_or_else(|| "route is missing its geometry".to_owned())?;

        let scores = self
            .extra
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|score| (key, score)))
            .collect();

        Ok(ScoredRoute {
            geometry,
            distance_m: self.distance_m,
            scores,
        })
    }
}

/// Structured 4xx error body: `{errorCode, error}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EngineErrorDto {
    pub(super) error_code: Option<String>,
    pub(super) error: Option<String>,
}
