//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::Config;
pub use state_builders::build_http_state;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::auth::{login, logout, register, session};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::routes::{
    delete_route, list_mine, recommend, rename_route, save_route,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{me, update_me};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the application: `/api/v1` REST surface, health probes at the
/// root, request tracing, and (debug builds only) Swagger UI under `/docs`.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(http_state)
        .service(register)
        .service(login)
        .service(logout)
        .service(session)
        .service(me)
        .service(update_me)
        .service(recommend)
        .service(save_route)
        .service(list_mine)
        .service(rename_route)
        .service(delete_route);

    let app = App::new()
        .app_data(health_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}
