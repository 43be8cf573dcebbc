//! Users API handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! PUT /api/v1/users/me {"displayName":"..."}
//! ```
//!
//! Both endpoints act on the account behind the presented session token;
//! there is no way to address another user's profile.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{DisplayName, Error, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionToken;
use crate::inbound::http::state::HttpState;

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Stable numeric user identifier.
    pub id: u64,
    /// Canonical account email.
    pub email: String,
    /// Display name shown to other users.
    pub display_name: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id().value(),
            email: profile.email().to_string(),
            display_name: profile.display_name().to_string(),
        }
    }
}

/// Profile update request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

/// The acting user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Account no longer exists", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentProfile"
)]
#[get("/users/me")]
pub async fn me(
    state: web::Data<HttpState>,
    token: SessionToken,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = token.required()?;
    let record = state.auth.validate(id).await?;
    let profile = state.profiles.profile(&record.email).await?;
    Ok(web::Json(profile.into()))
}

/// Replace the acting user's display name.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid display name", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Account no longer exists", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/users/me")]
pub async fn update_me(
    state: web::Data<HttpState>,
    token: SessionToken,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let id = token.required()?;
    let record = state.auth.validate(id).await?;

    let display_name = DisplayName::new(&payload.display_name).map_err(|err| {
        Error::validation(err.to_string()).with_details(json!({ "field": "displayName" }))
    })?;
    let profile = state
        .profile_commands
        .update_display_name(&record.email, display_name)
        .await?;
    Ok(web::Json(profile.into()))
}
