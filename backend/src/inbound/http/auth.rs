//! Auth API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"...","displayName":"...","password":"..."}
//! POST /api/v1/auth/login    {"email":"...","password":"..."}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/session
//! ```
//!
//! Login answers with the session token twice: as an HttpOnly cookie for
//! browsers and in the body for clients that prefer the `X-Session-Id`
//! header.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AuthValidationError, Credentials, Error, Registration, SessionRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SESSION_COOKIE, SessionToken};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::ProfileResponse;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the minted token plus the identity it authorises.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session token, also set as the `session_id` cookie.
    pub session_id: String,
    pub profile: ProfileResponse,
}

/// Identity attached to the presented session token.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: u64,
    pub email: String,
    pub display_name: String,
    /// When the session was minted.
    #[schema(value_type = String, example = "2026-08-25T08:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<SessionRecord> for SessionResponse {
    fn from(record: SessionRecord) -> Self {
        Self {
            user_id: record.user_id.value(),
            email: record.email.to_string(),
            display_name: record.display_name.to_string(),
            created_at: record.created_at,
        }
    }
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let field = match &err {
        AuthValidationError::Email(_) => "email",
        AuthValidationError::DisplayName(_) => "displayName",
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordTooShort { .. } => {
            "password"
        }
    };
    Error::validation(err.to_string()).with_details(json!({ "field": field }))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Create a new account.
///
/// Registration never mints a session; clients log in explicitly afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse),
        (status = 400, description = "Invalid registration payload", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Email already registered", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Credential store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from_parts(&payload.email, &payload.display_name, &payload.password)
            .map_err(map_auth_validation_error)?;
    let profile = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(profile)))
}

/// Verify credentials and mint a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid login payload", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unknown email or wrong password", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_auth_validation_error)?;
    let outcome = state.auth.login(credentials).await?;

    let token = outcome.session_id.to_string();
    let body = LoginResponse {
        session_id: token.clone(),
        profile: outcome.profile.into(),
    };
    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(body))
}

/// Destroy the presented session.
///
/// Idempotent: an absent, malformed, or already-destroyed token still gets a
/// 204 and the cookie removal.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session destroyed or already absent"),
        (status = 503, description = "Session store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, token: SessionToken) -> ApiResult<HttpResponse> {
    if let Some(id) = token.present() {
        state.auth.logout(id).await?;
    }
    Ok(HttpResponse::NoContent().cookie(removal_cookie()).finish())
}

/// Resolve the presented session token to its identity.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Session identity", body = SessionResponse),
        (status = 401, description = "Missing, malformed, or expired token", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Session store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn session(
    state: web::Data<HttpState>,
    token: SessionToken,
) -> ApiResult<web::Json<SessionResponse>> {
    let id = token.required()?;
    let record = state.auth.validate(id).await?;
    Ok(web::Json(record.into()))
}
