//! Saved route catalog model.
//!
//! Saved routes always hold canonical geometry: normalisation happens before
//! anything is persisted, so every record read back is already in the one
//! fixed coordinate order.

use std::fmt;

use chrono::{DateTime, Utc};
use geometry::RouteGeometry;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Maximum allowed length for a route name.
pub const ROUTE_NAME_MAX: usize = 80;

/// Validation errors returned by the saved-route constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteValidationError {
    EmptyName,
    NameTooLong { max: usize },
    InvalidDistance,
}

impl fmt::Display for RouteValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "route name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "route name must be at most {max} characters")
            }
            Self::InvalidDistance => {
                write!(f, "route distance must be a finite, non-negative number")
            }
        }
    }
}

impl std::error::Error for RouteValidationError {}

/// Stable numeric route identifier assigned by the route repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(u64);

impl RouteId {
    /// Wrap an identifier issued by the store's sequence.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Underlying numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RouteId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Display name for a saved route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteName(String);

impl RouteName {
    /// Validate and construct a [`RouteName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, RouteValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, RouteValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RouteValidationError::EmptyName);
        }
        if trimmed.chars().count() > ROUTE_NAME_MAX {
            return Err(RouteValidationError::NameTooLong {
                max: ROUTE_NAME_MAX,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RouteName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RouteName> for String {
    fn from(value: RouteName) -> Self {
        value.0
    }
}

impl TryFrom<String> for RouteName {
    type Error = RouteValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Route draft handed to the repository at creation.
///
/// The repository assigns the identifier and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRouteDraft {
    name: RouteName,
    geometry: RouteGeometry,
    distance_m: f64,
}

impl SavedRouteDraft {
    /// Validate and construct a draft from already-canonical geometry.
    pub fn try_new(
        name: RouteName,
        geometry: RouteGeometry,
        distance_m: f64,
    ) -> Result<Self, RouteValidationError> {
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(RouteValidationError::InvalidDistance);
        }

        Ok(Self {
            name,
            geometry,
            distance_m,
        })
    }

    /// Route display name.
    #[must_use]
    pub fn name(&self) -> &RouteName {
        &self.name
    }

    /// Canonical route line.
    #[must_use]
    pub fn geometry(&self) -> &RouteGeometry {
        &self.geometry
    }

    /// Route length in metres.
    #[must_use]
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }
}

/// Persisted saved route owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub id: RouteId,
    pub owner_id: UserId,
    pub name: RouteName,
    pub geometry: RouteGeometry,
    pub distance_m: f64,
    pub created_at: DateTime<Utc>,
}

impl SavedRoute {
    /// Materialise a draft into a stored record.
    #[must_use]
    pub fn from_draft(
        id: RouteId,
        owner_id: UserId,
        draft: SavedRouteDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let SavedRouteDraft {
            name,
            geometry,
            distance_m,
        } = draft;
        Self {
            id,
            owner_id,
            name,
            geometry,
            distance_m,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn geometry() -> RouteGeometry {
        RouteGeometry::from_points(vec![[127.0, 37.5], [127.1, 37.6]]).expect("valid points")
    }

    #[rstest]
    fn route_names_are_trimmed() {
        let name = RouteName::new("  Riverside loop  ").expect("valid name");
        assert_eq!(name.as_ref(), "Riverside loop");
    }

    #[rstest]
    #[case::blank("   ", RouteValidationError::EmptyName)]
    #[case::too_long(
        &"r".repeat(ROUTE_NAME_MAX + 1),
        RouteValidationError::NameTooLong { max: ROUTE_NAME_MAX }
    )]
    fn invalid_route_names_are_rejected(
        #[case] input: &str,
        #[case] expected: RouteValidationError,
    ) {
        assert_eq!(RouteName::new(input), Err(expected));
    }

    #[rstest]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    fn invalid_distances_are_rejected(#[case] distance_m: f64) {
        let name = RouteName::new("Riverside loop").expect("valid name");
        assert_eq!(
            SavedRouteDraft::try_new(name, geometry(), distance_m),
            Err(RouteValidationError::InvalidDistance)
        );
    }

    #[rstest]
    fn drafts_materialise_with_store_assigned_fields() {
        let name = RouteName::new("Riverside loop").expect("valid name");
        let draft = SavedRouteDraft::try_new(name, geometry(), 5200.0).expect("valid draft");
        let created_at = chrono::Utc::now();
        let route = SavedRoute::from_draft(RouteId::new(3), UserId::new(7), draft, created_at);

        assert_eq!(route.id.value(), 3);
        assert_eq!(route.owner_id.value(), 7);
        assert_eq!(route.created_at, created_at);

        let value = serde_json::to_value(&route).expect("route serialises");
        assert_eq!(value["name"], "Riverside loop");
        assert_eq!(value["distanceM"], 5200.0);
        assert_eq!(value["geometry"][0][0], 127.0);
    }
}
