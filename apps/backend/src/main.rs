use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use masjid_backend::config::bootstrap_admin::BootstrapAdmin;
use masjid_backend::config::db::DbProfile;
use masjid_backend::config::server::ServerConfig;
use masjid_backend::infra::state::build_state;
use masjid_backend::middleware::cors::cors_middleware;
use masjid_backend::middleware::request_trace::RequestTrace;
use masjid_backend::middleware::structured_logger::StructuredLogger;
use masjid_backend::middleware::trace_span::TraceSpan;
use masjid_backend::routes;
use masjid_backend::services::bootstrap::ensure_bootstrap_admin;
use masjid_backend::state::security_config::SecurityConfig;
use masjid_backend::telemetry;
use tracing::{error, info};

fn exit_with(message: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("❌ {message}: {err}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let server = ServerConfig::from_env().unwrap_or_else(|e| exit_with("Invalid server config", e));
    let security_config =
        SecurityConfig::from_env().unwrap_or_else(|e| exit_with("Invalid JWT config", e));
    let bootstrap_admin =
        BootstrapAdmin::from_env().unwrap_or_else(|e| exit_with("Invalid bootstrap admin", e));

    let (app_state, worker) = build_state()
        .with_db(DbProfile::Prod)
        .with_security(security_config)
        .with_background_jobs()
        .build()
        .await
        .unwrap_or_else(|e| exit_with("Failed to build application state", e));

    info!("database connected");

    if let Some(admin) = &bootstrap_admin {
        if let Err(e) = ensure_bootstrap_admin(app_state.db(), admin).await {
            exit_with("Failed to create bootstrap admin", e);
        }
    }

    info!(host = %server.host, port = server.port, "starting masjid backend");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);
    let server_data = data.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(server_data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await;

    // Flush queued activity/view jobs before the pool goes away.
    if let Some(worker) = worker {
        worker.shutdown().await;
    }
    match Arc::try_unwrap(data.into_inner()) {
        Ok(state) => state.shutdown().await,
        Err(_) => error!("application state still shared at shutdown; pool left to drop"),
    }
    info!("masjid backend stopped");

    result
}
