//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed model for accounts, sessions, and
//! route recommendations, plus the services that implement the driving
//! ports over the driven-port boundary. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod recommendation;
pub mod recommendation_service;
pub mod route_service;
pub mod routes;
pub mod session;
pub mod user;
pub mod user_service;

pub use self::auth::{AuthValidationError, Credentials, PASSWORD_MIN, Registration};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PasswordHashError, PasswordHasher};
pub use self::recommendation::{
    RecommendationRequest, RecommendationValidationError, RecommendedRoute, RoutePreferences,
    ScoredRoute, ScoringRequest,
};
pub use self::recommendation_service::RecommendationService;
pub use self::route_service::SavedRouteService;
pub use self::routes::{
    ROUTE_NAME_MAX, RouteId, RouteName, RouteValidationError, SavedRoute, SavedRouteDraft,
};
pub use self::session::{SessionId, SessionRecord, SessionValidationError};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, NewUser, UserId, UserProfile,
    UserRecord, UserValidationError,
};
pub use self::user_service::UserProfileService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
