//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers:
//!
//! - **Paths**: the `/api/v1` surface (auth, users, routes) and the health
//!   probes
//! - **Schemas**: edge DTOs plus the domain error wrappers ([`ErrorSchema`],
//!   [`ErrorCodeSchema`]) that provide OpenAPI definitions without coupling
//!   domain types to the utoipa framework
//! - **Security**: the session cookie and header schemes
//!
//! The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{LoginRequest, LoginResponse, RegisterRequest, SessionResponse};
use crate::inbound::http::routes::{
    RecommendRequest, RecommendResponse, RenameRouteRequest, SaveRouteRequest, SavedRouteResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session::{SESSION_COOKIE, SESSION_HEADER};
use crate::inbound::http::users::{ProfileResponse, UpdateProfileRequest};

/// Enrich the generated document with the session security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
        components.add_security_scheme(
            "SessionHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                SESSION_HEADER,
                "Session token header for non-browser clients; wins over the cookie.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cityrun backend API",
        description = "HTTP interface for accounts, sessions, route recommendation, and the saved-route catalogue.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("SessionHeader" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::session,
        crate::inbound::http::users::me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::routes::recommend,
        crate::inbound::http::routes::save_route,
        crate::inbound::http::routes::list_mine,
        crate::inbound::http::routes::rename_route,
        crate::inbound::http::routes::delete_route,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        SessionResponse,
        ProfileResponse,
        UpdateProfileRequest,
        RecommendRequest,
        RecommendResponse,
        SaveRouteRequest,
        RenameRouteRequest,
        SavedRouteResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session lifecycle"),
        (name = "users", description = "The acting user's profile"),
        (name = "routes", description = "Route recommendation and the saved-route catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
