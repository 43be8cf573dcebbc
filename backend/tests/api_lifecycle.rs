//! End-to-end journeys over the public API surface.
//!
//! These tests wire the real domain services over the in-memory adapters
//! through the crate's public API, then drive the HTTP surface the way a
//! client would: register, log in, recommend, save, and manage routes.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use backend::domain::{
    AuthService, PasswordHasher, RecommendationService, SavedRouteService, UserProfileService,
};
use backend::inbound::http::session::{SESSION_COOKIE, SESSION_HEADER};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, routes, users};
use backend::outbound::memory::{
    FixtureRouteScorer, MemoryCredentialStore, MemoryRouteRepository, MemorySessionStore,
};

fn memory_state() -> HttpState {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let route_repo = Arc::new(MemoryRouteRepository::new());
    let scorer = Arc::new(FixtureRouteScorer::new());

    let auth = Arc::new(AuthService::new(
        Arc::clone(&credentials),
        sessions,
        PasswordHasher::new(),
        Duration::from_secs(1800),
    ));
    let recommender = Arc::new(RecommendationService::new(scorer));
    let route_service = Arc::new(SavedRouteService::new(route_repo));
    let profile_service = Arc::new(UserProfileService::new(credentials));

    HttpState {
        auth,
        recommender,
        route_commands: Arc::clone(&route_service) as _,
        route_queries: route_service,
        profiles: Arc::clone(&profile_service) as _,
        profile_commands: profile_service,
    }
}

async fn spawn_app()
-> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new().app_data(web::Data::new(memory_state())).service(
            web::scope("/api/v1")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(auth::session)
                .service(users::me)
                .service(users::update_me)
                .service(routes::recommend)
                .service(routes::save_route)
                .service(routes::list_mine)
                .service(routes::rename_route)
                .service(routes::delete_route),
        ),
    )
    .await
}

async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> String {
    let register = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": email,
            "displayName": "Runner",
            "password": "hunter2hunter2"
        }))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": "hunter2hunter2" }))
        .to_request();
    let response = actix_test::call_service(app, login).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    body["sessionId"]
        .as_str()
        .expect("login returns the session id")
        .to_owned()
}

#[actix_web::test]
async fn full_session_and_route_lifecycle() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "lifecycle@example.com").await;

    // The session is valid and names the account.
    let who = actix_test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header((SESSION_HEADER, token.clone()))
        .to_request();
    let response = actix_test::call_service(&app, who).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "lifecycle@example.com");

    // A recommendation comes back scored with geometry.
    let recommend = actix_test::TestRequest::post()
        .uri("/api/v1/routes/recommend")
        .insert_header((SESSION_HEADER, token.clone()))
        .set_json(json!({ "origin": [51.5074, -0.1278], "distanceKm": 5.2 }))
        .to_request();
    let response = actix_test::call_service(&app, recommend).await;
    assert_eq!(response.status(), StatusCode::OK);
    let recommended: Value = actix_test::read_body_json(response).await;
    assert!(recommended["distanceM"].as_f64().is_some());
    assert!(recommended["geometry"].is_array());

    // Save the recommended geometry, rename it, and see it in the catalogue.
    let save = actix_test::TestRequest::post()
        .uri("/api/v1/routes")
        .insert_header((SESSION_HEADER, token.clone()))
        .set_json(json!({
            "name": "Thames loop",
            "geometry": recommended["geometry"],
            "distanceM": recommended["distanceM"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, save).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved: Value = actix_test::read_body_json(response).await;
    let route_id = saved["id"].as_u64().expect("saved route id");

    let rename = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/routes/{route_id}"))
        .insert_header((SESSION_HEADER, token.clone()))
        .set_json(json!({ "name": "Sunday long run" }))
        .to_request();
    let response = actix_test::call_service(&app, rename).await;
    assert_eq!(response.status(), StatusCode::OK);

    let list = actix_test::TestRequest::get()
        .uri("/api/v1/routes/mine")
        .insert_header((SESSION_HEADER, token.clone()))
        .to_request();
    let body: Value =
        actix_test::read_body_json(actix_test::call_service(&app, list).await).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("route list")
        .iter()
        .filter_map(|route| route["name"].as_str())
        .collect();
    assert_eq!(names, ["Sunday long run"]);

    // Logout invalidates the token for every authenticated endpoint.
    let logout = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((SESSION_HEADER, token.clone()))
        .to_request();
    let response = actix_test::call_service(&app, logout).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let who = actix_test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header((SESSION_HEADER, token))
        .to_request();
    let response = actix_test::call_service(&app, who).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sessions_are_independent_between_accounts() {
    let app = spawn_app().await;
    let first = register_and_login(&app, "first@example.com").await;
    let second = register_and_login(&app, "second@example.com").await;
    assert_ne!(first, second);

    // Logging the first account out leaves the second session live.
    let logout = actix_test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((SESSION_HEADER, first))
        .to_request();
    let response = actix_test::call_service(&app, logout).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let who = actix_test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header((SESSION_HEADER, second))
        .to_request();
    let response = actix_test::call_service(&app, who).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "second@example.com");
}

#[actix_web::test]
async fn the_catalogue_is_scoped_to_its_owner() {
    let app = spawn_app().await;
    let owner = register_and_login(&app, "owner@example.com").await;
    let rival = register_and_login(&app, "rival@example.com").await;

    let save = actix_test::TestRequest::post()
        .uri("/api/v1/routes")
        .insert_header((SESSION_HEADER, owner))
        .set_json(json!({
            "name": "Private loop",
            "geometry": [[-0.1278, 51.5074], [-0.1189, 51.5164]],
            "distanceM": 1500.0
        }))
        .to_request();
    let response = actix_test::call_service(&app, save).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved: Value = actix_test::read_body_json(response).await;
    let route_id = saved["id"].as_u64().expect("saved route id");

    // The rival sees an empty catalogue and cannot touch the owner's route.
    let list = actix_test::TestRequest::get()
        .uri("/api/v1/routes/mine")
        .insert_header((SESSION_HEADER, rival.clone()))
        .to_request();
    let body: Value =
        actix_test::read_body_json(actix_test::call_service(&app, list).await).await;
    assert_eq!(body, json!([]));

    let delete = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/routes/{route_id}"))
        .insert_header((SESSION_HEADER, rival))
        .to_request();
    let response = actix_test::call_service(&app, delete).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "forbidden");
}

#[actix_web::test]
async fn the_cookie_transport_matches_the_header() {
    let app = spawn_app().await;
    let token = register_and_login(&app, "cookie@example.com").await;

    let cookie = actix_web::cookie::Cookie::new(SESSION_COOKIE, token);
    let who = actix_test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, who).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["email"], "cookie@example.com");
}
