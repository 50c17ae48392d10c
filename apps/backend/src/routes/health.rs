use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::http::envelope;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    app_version: &'static str,
    db: &'static str,
    migrations: String,
    #[serde(with = "time::serde::rfc3339")]
    time: OffsetDateTime,
}

/// Liveness plus a cheap database check. Always 200; `db` says whether the
/// check worked and the failure detail only goes to the log.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.db();
    let check = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1 AS health_check".to_string(),
        ))
        .await;

    let (db_status, migrations) = match check {
        Ok(_) => {
            let migrations = match get_latest_migration_version(db).await {
                Ok(Some(version)) => version,
                Ok(None) => "no_migrations".to_string(),
                Err(_) => "unknown".to_string(),
            };
            ("ok", migrations)
        }
        Err(e) => {
            warn!(error = %e, "health check database query failed");
            ("error", "unknown".to_string())
        }
    };

    Ok(envelope::ok(HealthResponse {
        app_version: env!("CARGO_PKG_VERSION"),
        db: db_status,
        migrations,
        time: OffsetDateTime::now_utc(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
