//! Canonical route geometry for the Cityrun backend.
//!
//! Route geometry arrives in three shapes: an explicit `[longitude, latitude]`
//! point list, a well-known-text `LINESTRING`, or a bare origin/destination
//! pair in `[latitude, longitude]` order. This crate normalises all of them
//! into one canonical [`RouteGeometry`] whose points are always
//! `[longitude, latitude]`, so coordinate order is never ambiguous downstream.
//!
//! The crate is pure: no I/O, no framework types. Serde impls cover the wire
//! forms used by the HTTP adapter and the stores.

use serde::{Deserialize, Serialize};

/// Failures produced while validating or normalising geometry input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// WKT input without the `LINESTRING(...)` prefix/suffix markers.
    #[error("linestring must be wrapped in LINESTRING( ... )")]
    MissingMarkers,

    /// A comma-separated WKT pair did not split into exactly two tokens.
    #[error("coordinate pair '{pair}' must contain exactly two values")]
    MalformedPair { pair: String },

    /// A coordinate token could not be parsed as a float.
    #[error("coordinate '{token}' is not a number")]
    InvalidNumber { token: String },

    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,

    /// Longitude outside the WGS84 range.
    #[error("longitude {value} must be within [-180, 180]")]
    LongitudeOutOfRange { value: f64 },

    /// Latitude outside the WGS84 range.
    #[error("latitude {value} must be within [-90, 90]")]
    LatitudeOutOfRange { value: f64 },

    /// Fewer than two points were supplied.
    #[error("a route needs at least two points, got {count}")]
    TooFewPoints { count: usize },

    /// All supplied points were identical.
    #[error("a route needs at least two distinct points")]
    DegeneratePath,
}

fn validate_longitude(value: f64) -> Result<(), GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    if !(-180.0..=180.0).contains(&value) {
        return Err(GeometryError::LongitudeOutOfRange { value });
    }
    Ok(())
}

fn validate_latitude(value: f64) -> Result<(), GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    if !(-90.0..=90.0).contains(&value) {
        return Err(GeometryError::LatitudeOutOfRange { value });
    }
    Ok(())
}

/// A `[latitude, longitude]` coordinate pair as submitted by clients.
///
/// Client payloads and the geo-engine protocol carry coordinates latitude
/// first; the canonical form is longitude first. Keeping the inbound order in
/// its own type makes the inversion explicit instead of a silent index swap.
///
/// # Examples
/// ```
/// use geometry::LatLng;
///
/// let seoul = LatLng::new(37.5, 127.0).expect("in range");
/// assert_eq!(seoul.latitude(), 37.5);
/// assert_eq!(seoul.longitude(), 127.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl LatLng {
    /// Validate and construct a pair from latitude-first components.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when either component is non-finite or
    /// outside the WGS84 range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude component in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude component in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The same point in canonical `[longitude, latitude]` order.
    #[must_use]
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl TryFrom<[f64; 2]> for LatLng {
    type Error = GeometryError;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        let [latitude, longitude] = pair;
        Self::new(latitude, longitude)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.latitude, value.longitude]
    }
}

/// Canonical route line: ordered `[longitude, latitude]` points.
///
/// ## Invariants
/// - At least two points, at least two of them distinct.
/// - Every coordinate is finite and within the WGS84 range.
///
/// Serialises as a bare coordinate array, matching the canonical wire form.
///
/// # Examples
/// ```
/// use geometry::RouteGeometry;
///
/// let line = RouteGeometry::from_wkt("LINESTRING(127.0 37.5, 127.1 37.6)")
///     .expect("valid linestring");
/// assert_eq!(line.points(), &[[127.0, 37.5], [127.1, 37.6]]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct RouteGeometry(Vec<[f64; 2]>);

impl RouteGeometry {
    /// Validate an explicit canonical point list.
    ///
    /// Points are `[longitude, latitude]` and pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] for non-finite or out-of-range coordinates,
    /// fewer than two points, or a path whose points are all identical.
    pub fn from_points(points: Vec<[f64; 2]>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                count: points.len(),
            });
        }
        for point in &points {
            let [longitude, latitude] = *point;
            validate_longitude(longitude)?;
            validate_latitude(latitude)?;
        }
        let Some(first) = points.first() else {
            return Err(GeometryError::TooFewPoints { count: 0 });
        };
        if points.iter().all(|point| point == first) {
            return Err(GeometryError::DegeneratePath);
        }
        Ok(Self(points))
    }

    /// Parse a well-known-text linestring such as
    /// `LINESTRING(127.0 37.5, 127.1 37.6)`.
    ///
    /// The text is tokenised on the outer parentheses; each comma-separated
    /// pair must split on whitespace into exactly two float tokens, longitude
    /// first as WKT prescribes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingMarkers`] when the `LINESTRING(`
    /// prefix or closing parenthesis is absent,
    /// [`GeometryError::MalformedPair`] when a pair has the wrong arity,
    /// [`GeometryError::InvalidNumber`] for unparseable tokens, and the
    /// structural errors of [`Self::from_points`] otherwise.
    pub fn from_wkt(text: &str) -> Result<Self, GeometryError> {
        let trimmed = text.trim();
        let rest = trimmed
            .strip_prefix("LINESTRING")
            .ok_or(GeometryError::MissingMarkers)?;
        let inner = rest
            .trim_start()
            .strip_prefix('(')
            .and_then(|value| value.strip_suffix(')'))
            .ok_or(GeometryError::MissingMarkers)?;

        let mut points = Vec::new();
        for pair in inner.split(',') {
            let mut tokens = pair.split_whitespace();
            let (Some(first), Some(second), None) = (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(GeometryError::MalformedPair {
                    pair: pair.trim().to_owned(),
                });
            };
            points.push([parse_coordinate(first)?, parse_coordinate(second)?]);
        }
        Self::from_points(points)
    }

    /// Synthesize a straight two-point line from bare endpoints.
    ///
    /// Endpoints arrive latitude first; the result is canonical longitude
    /// first. The inversion happens here and nowhere else.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegeneratePath`] when origin and destination
    /// are the same point.
    pub fn from_endpoints(origin: LatLng, destination: LatLng) -> Result<Self, GeometryError> {
        Self::from_points(vec![origin.to_lon_lat(), destination.to_lon_lat()])
    }

    /// Canonical `[longitude, latitude]` points in order.
    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.0
    }

    /// First point of the line.
    #[must_use]
    pub fn origin(&self) -> [f64; 2] {
        self.0.first().copied().unwrap_or([0.0, 0.0])
    }

    /// Last point of the line.
    #[must_use]
    pub fn destination(&self) -> [f64; 2] {
        self.0.last().copied().unwrap_or([0.0, 0.0])
    }

    /// Number of points in the line.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed geometry; present for slice parity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<[f64; 2]>> for RouteGeometry {
    type Error = GeometryError;

    fn try_from(points: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<RouteGeometry> for Vec<[f64; 2]> {
    fn from(value: RouteGeometry) -> Self {
        value.0
    }
}

fn parse_coordinate(token: &str) -> Result<f64, GeometryError> {
    let value: f64 = token.parse().map_err(|_| GeometryError::InvalidNumber {
        token: token.to_owned(),
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFiniteCoordinate)
    }
}

/// Caller-supplied geometry before normalisation.
///
/// Deserialises untagged: a JSON array of pairs is an explicit canonical
/// point list, a JSON string is WKT, and an object with `origin` and
/// `destination` pairs (each `[latitude, longitude]`) is the bare endpoint
/// form synthesised via [`RouteGeometry::from_endpoints`].
///
/// # Examples
/// ```
/// use geometry::GeometryInput;
///
/// let wkt: GeometryInput =
///     serde_json::from_str("\"LINESTRING(127.0 37.5, 127.1 37.6)\"").expect("string form");
/// let line = wkt.normalize().expect("valid linestring");
/// assert_eq!(line.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometryInput {
    /// Explicit canonical `[longitude, latitude]` point list.
    Points(Vec<[f64; 2]>),
    /// Well-known-text linestring.
    Wkt(String),
    /// Bare origin/destination endpoints, each `[latitude, longitude]`.
    Endpoints {
        origin: LatLng,
        destination: LatLng,
    },
}

impl GeometryInput {
    /// Normalise this input into the canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the input fails structural or numeric
    /// validation.
    pub fn normalize(self) -> Result<RouteGeometry, GeometryError> {
        match self {
            Self::Points(points) => RouteGeometry::from_points(points),
            Self::Wkt(text) => RouteGeometry::from_wkt(&text),
            Self::Endpoints {
                origin,
                destination,
            } => RouteGeometry::from_endpoints(origin, destination),
        }
    }
}
