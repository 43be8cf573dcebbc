//! Backend entry-point: wires stores, the REST surface, and OpenAPI docs.

mod server;

use actix_web::{HttpServer, web};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use server::{Config, build_app, build_http_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let http_state = web::Data::new(build_http_state(&config).await?);
    let health_state = web::Data::new(HealthState::new());

    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind((config.host.as_str(), config.port))?;

    // Flip liveness off as soon as a shutdown signal lands so probes report
    // the drain while actix finishes in-flight requests.
    let drain_health_state = health_state.clone();
    tokio::spawn(async move {
        let terminate = async {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(error) => {
                    warn!(%error, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await
                }
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            () = terminate => {}
        }
        drain_health_state.mark_unhealthy();
    });

    info!(host = %config.host, port = config.port, "listening");
    health_state.mark_ready();
    server.run().await
}
