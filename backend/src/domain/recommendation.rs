//! Route recommendation request and result model.
//!
//! A recommendation is one orchestrated call: the caller describes where to
//! run and how far, the geo-engine scores or generates a route, and the
//! result merges engine output with the request fields the engine does not
//! echo back.

use std::collections::BTreeMap;
use std::fmt;

use geometry::{GeometryInput, LatLng, RouteGeometry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended preference bag forwarded verbatim to the geo-engine.
///
/// The orchestrator never interprets these keys; forcing a schema here would
/// couple releases of this service to releases of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePreferences(BTreeMap<String, Value>);

impl RoutePreferences {
    /// Empty preference bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a preference entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// True when no preferences were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validation errors returned by [`RecommendationRequest::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationValidationError {
    /// Target distance was NaN or infinite.
    DistanceNotFinite,
    /// Target distance was zero or negative.
    DistanceNotPositive,
}

impl fmt::Display for RecommendationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistanceNotFinite => write!(f, "target distance must be a finite number"),
            Self::DistanceNotPositive => write!(f, "target distance must be greater than zero"),
        }
    }
}

impl std::error::Error for RecommendationValidationError {}

/// One caller request for a scored route.
///
/// ## Invariants
/// - `distance_km` is finite and strictly positive.
///
/// Geometry, when present, is still in caller form; the orchestrator
/// normalises it before anything reaches the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    origin: LatLng,
    destination: Option<LatLng>,
    distance_km: f64,
    preferences: RoutePreferences,
    geometry: Option<GeometryInput>,
}

impl RecommendationRequest {
    /// Validate and construct a recommendation request.
    pub fn try_new(
        origin: LatLng,
        destination: Option<LatLng>,
        distance_km: f64,
        preferences: RoutePreferences,
        geometry: Option<GeometryInput>,
    ) -> Result<Self, RecommendationValidationError> {
        if !distance_km.is_finite() {
            return Err(RecommendationValidationError::DistanceNotFinite);
        }
        if distance_km <= 0.0 {
            return Err(RecommendationValidationError::DistanceNotPositive);
        }

        Ok(Self {
            origin,
            destination,
            distance_km,
            preferences,
            geometry,
        })
    }

    /// Starting point of the requested run.
    #[must_use]
    pub fn origin(&self) -> LatLng {
        self.origin
    }

    /// Optional end point of the requested run.
    #[must_use]
    pub fn destination(&self) -> Option<LatLng> {
        self.destination
    }

    /// Target distance in kilometres.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Preference bag forwarded to the engine.
    #[must_use]
    pub fn preferences(&self) -> &RoutePreferences {
        &self.preferences
    }

    /// Caller-supplied geometry awaiting normalisation, when present.
    #[must_use]
    pub fn geometry(&self) -> Option<&GeometryInput> {
        self.geometry.as_ref()
    }

    /// Split into the parts the orchestrator consumes.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        LatLng,
        Option<LatLng>,
        f64,
        RoutePreferences,
        Option<GeometryInput>,
    ) {
        (
            self.origin,
            self.destination,
            self.distance_km,
            self.preferences,
            self.geometry,
        )
    }
}

/// Wire-ready scoring request for the geo-engine port.
///
/// The engine speaks two dialects: origin-plus-target-distance in
/// kilometres when it generates the route itself, and metres-plus-canonical
/// geometry when scoring a path the caller supplied. Both carry the opaque
/// preference bag.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringRequest {
    /// Ask the engine to generate and score a route from an origin.
    FromOrigin {
        origin: LatLng,
        distance_km: f64,
        preferences: RoutePreferences,
    },
    /// Ask the engine to score an existing canonical path.
    ForGeometry {
        distance_m: f64,
        geometry: RouteGeometry,
        preferences: RoutePreferences,
    },
}

/// What the geo-engine returns for one scoring call.
///
/// The geometry stays opaque JSON: the engine's shape is its own contract
/// and this service only relays it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    pub geometry: Value,
    pub distance_m: f64,
    pub scores: BTreeMap<String, f64>,
}

/// Final orchestration result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRoute {
    pub origin: LatLng,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<LatLng>,
    pub geometry: Value,
    pub distance_m: f64,
    pub scores: BTreeMap<String, f64>,
}
