//! Routes API handlers.
//!
//! ```text
//! POST   /api/v1/routes/recommend  Score or generate a route via the geo-engine
//! POST   /api/v1/routes            Save a route to the catalog
//! GET    /api/v1/routes/mine       List the acting user's routes, newest first
//! PUT    /api/v1/routes/{id}       Rename a saved route
//! DELETE /api/v1/routes/{id}       Delete a saved route
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use geometry::{GeometryInput, LatLng};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::ports::SaveRoutePayload;
use crate::domain::{
    Error, RecommendationRequest, RecommendedRoute, RouteId, RouteName, RoutePreferences,
    SavedRoute, SessionRecord,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionToken;
use crate::inbound::http::state::HttpState;

/// Recommendation request body.
///
/// Coordinates are `[latitude, longitude]`; geometry, when present, is a
/// canonical `[longitude, latitude]` point array, a WKT linestring, or an
/// origin/destination endpoint pair.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    /// `[latitude, longitude]` starting point.
    pub origin: [f64; 2],
    /// Optional `[latitude, longitude]` end point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<[f64; 2]>,
    /// Target distance in kilometres.
    pub distance_km: f64,
    /// Opaque preference bag forwarded to the geo-engine.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub preferences: RoutePreferences,
    /// Optional caller-supplied route line to score instead of generating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub geometry: Option<GeometryInput>,
}

/// Recommendation response body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    /// `[latitude, longitude]` echo of the requested origin.
    pub origin: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<[f64; 2]>,
    /// Route line exactly as the geo-engine returned it.
    #[schema(value_type = Object)]
    pub geometry: Value,
    pub distance_m: f64,
    /// Engine sub-scores keyed by name.
    pub scores: std::collections::BTreeMap<String, f64>,
}

impl From<RecommendedRoute> for RecommendResponse {
    fn from(route: RecommendedRoute) -> Self {
        Self {
            origin: route.origin.into(),
            destination: route.destination.map(Into::into),
            geometry: route.geometry,
            distance_m: route.distance_m,
            scores: route.scores,
        }
    }
}

/// Save-route request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteRequest {
    pub name: String,
    /// Canonical point array, WKT linestring, or origin/destination endpoints.
    #[schema(value_type = Object)]
    pub geometry: GeometryInput,
    /// Route length in metres.
    pub distance_m: f64,
}

/// Rename request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameRouteRequest {
    pub name: String,
}

/// Saved route response body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedRouteResponse {
    pub id: u64,
    pub name: String,
    /// Canonical `[longitude, latitude]` points.
    pub geometry: Vec<[f64; 2]>,
    pub distance_m: f64,
    #[schema(value_type = String, example = "2026-08-25T08:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<SavedRoute> for SavedRouteResponse {
    fn from(route: SavedRoute) -> Self {
        Self {
            id: route.id.value(),
            name: route.name.to_string(),
            geometry: route.geometry.points().to_vec(),
            distance_m: route.distance_m,
            created_at: route.created_at,
        }
    }
}

fn parse_coordinate(pair: [f64; 2], field: &str) -> Result<LatLng, Error> {
    LatLng::try_from(pair)
        .map_err(|err| Error::from(err).with_details(json!({ "field": field })))
}

fn parse_route_name(name: &str) -> Result<RouteName, Error> {
    RouteName::new(name)
        .map_err(|err| Error::validation(err.to_string()).with_details(json!({ "field": "name" })))
}

async fn authenticate(state: &HttpState, token: &SessionToken) -> Result<SessionRecord, Error> {
    let id = token.required()?;
    state.auth.validate(id).await
}

/// Request a scored route from the geo-engine.
#[utoipa::path(
    post,
    path = "/api/v1/routes/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Scored route", body = RecommendResponse),
        (status = 400, description = "Invalid request or rejected by the engine", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 502, description = "Engine reply was not interpretable", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 504, description = "Engine did not reply in time", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "recommendRoute"
)]
#[post("/routes/recommend")]
pub async fn recommend(
    state: web::Data<HttpState>,
    token: SessionToken,
    payload: web::Json<RecommendRequest>,
) -> ApiResult<web::Json<RecommendResponse>> {
    authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let origin = parse_coordinate(payload.origin, "origin")?;
    let destination = payload
        .destination
        .map(|pair| parse_coordinate(pair, "destination"))
        .transpose()?;
    let request = RecommendationRequest::try_new(
        origin,
        destination,
        payload.distance_km,
        payload.preferences,
        payload.geometry,
    )
    .map_err(|err| {
        Error::validation(err.to_string()).with_details(json!({ "field": "distanceKm" }))
    })?;

    let route = state.recommender.recommend(request).await?;
    Ok(web::Json(route.into()))
}

/// Save a route to the acting user's catalog.
#[utoipa::path(
    post,
    path = "/api/v1/routes",
    request_body = SaveRouteRequest,
    responses(
        (status = 201, description = "Route saved", body = SavedRouteResponse),
        (status = 400, description = "Invalid name, geometry, or distance", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "saveRoute"
)]
#[post("/routes")]
pub async fn save_route(
    state: web::Data<HttpState>,
    token: SessionToken,
    payload: web::Json<SaveRouteRequest>,
) -> ApiResult<HttpResponse> {
    let record = authenticate(&state, &token).await?;
    let payload = payload.into_inner();

    let name = parse_route_name(&payload.name)?;
    let saved = state
        .route_commands
        .save(
            record.user_id,
            SaveRoutePayload {
                name,
                geometry: payload.geometry,
                distance_m: payload.distance_m,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(SavedRouteResponse::from(saved)))
}

/// List the acting user's saved routes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/routes/mine",
    responses(
        (status = 200, description = "Saved routes", body = [SavedRouteResponse]),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "listMyRoutes"
)]
#[get("/routes/mine")]
pub async fn list_mine(
    state: web::Data<HttpState>,
    token: SessionToken,
) -> ApiResult<web::Json<Vec<SavedRouteResponse>>> {
    let record = authenticate(&state, &token).await?;
    let routes = state.route_queries.list(record.user_id).await?;
    Ok(web::Json(routes.into_iter().map(Into::into).collect()))
}

/// Rename a saved route the acting user owns.
#[utoipa::path(
    put,
    path = "/api/v1/routes/{id}",
    request_body = RenameRouteRequest,
    params(("id" = u64, Path, description = "Route identifier")),
    responses(
        (status = 200, description = "Renamed route", body = SavedRouteResponse),
        (status = 400, description = "Invalid name", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Route belongs to another user", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such route", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "renameRoute"
)]
#[put("/routes/{id}")]
pub async fn rename_route(
    state: web::Data<HttpState>,
    token: SessionToken,
    path: web::Path<u64>,
    payload: web::Json<RenameRouteRequest>,
) -> ApiResult<web::Json<SavedRouteResponse>> {
    let record = authenticate(&state, &token).await?;
    let name = parse_route_name(&payload.name)?;
    let route = state
        .route_commands
        .rename(record.user_id, RouteId::new(path.into_inner()), name)
        .await?;
    Ok(web::Json(route.into()))
}

/// Delete a saved route the acting user owns.
#[utoipa::path(
    delete,
    path = "/api/v1/routes/{id}",
    params(("id" = u64, Path, description = "Route identifier")),
    responses(
        (status = 204, description = "Route deleted"),
        (status = 401, description = "No valid session", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Route belongs to another user", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such route", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["routes"],
    operation_id = "deleteRoute"
)]
#[delete("/routes/{id}")]
pub async fn delete_route(
    state: web::Data<HttpState>,
    token: SessionToken,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let record = authenticate(&state, &token).await?;
    state
        .route_commands
        .delete(record.user_id, RouteId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
