//! Shared helpers for HTTP handler tests.
//!
//! Handler tests run the real domain services over the in-memory adapters,
//! so a test exercises the same code path as production short of Redis and
//! the geo-engine.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, web};

use crate::domain::{
    AuthService, PasswordHasher, RecommendationService, SavedRouteService, UserProfileService,
};
use crate::outbound::memory::{
    FixtureRouteScorer, MemoryCredentialStore, MemoryRouteRepository, MemorySessionStore,
};

use super::state::HttpState;

pub(crate) const TEST_SESSION_TTL: Duration = Duration::from_secs(1800);

/// Fully wired state over in-memory adapters and the fixture scorer.
pub(crate) fn memory_state() -> HttpState {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let routes = Arc::new(MemoryRouteRepository::new());
    let scorer = Arc::new(FixtureRouteScorer::new());

    let auth = Arc::new(AuthService::new(
        Arc::clone(&credentials),
        sessions,
        PasswordHasher::new(),
        TEST_SESSION_TTL,
    ));
    let recommender = Arc::new(RecommendationService::new(scorer));
    let route_service = Arc::new(SavedRouteService::new(routes));
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

/// Application with the full `/api/v1` surface over the supplied state.
pub(crate) fn app_with_state(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(super::auth::register)
            .service(super::auth::login)
            .service(super::auth::logout)
            .service(super::auth::session)
            .service(super::users::me)
            .service(super::users::update_me)
            .service(super::routes::recommend)
            .service(super::routes::save_route)
            .service(super::routes::list_mine)
            .service(super::routes::rename_route)
            .service(super::routes::delete_route),
    )
}

/// Application over fresh in-memory state.
pub(crate) fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_state(memory_state())
}

/// Register an account and log it in, returning the session cookie.
pub(crate) async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> actix_web::cookie::Cookie<'static> {
    use actix_web::test as actix_test;
    use serde_json::json;

    let register = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": email,
            "displayName": "Runner",
            "password": "hunter2hunter2"
        }))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert!(response.status().is_success(), "registration failed");

    let login = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": "hunter2hunter2" }))
        .to_request();
    let response = actix_test::call_service(app, login).await;
    assert!(response.status().is_success(), "login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == super::session::SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}
