use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::repos::activity::NewActivity;
use crate::state::app_state::AppState;

pub mod activity;
pub mod auth;
pub mod carousel;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod news;
pub mod transactions;
pub mod users;

/// Largest JSON body accepted by [`crate::extractors::ValidatedJson`].
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Configure every route plus the extractor error handlers, so that bad
/// paths, bad query strings and unknown routes all answer with the envelope.
///
/// `main.rs` adds the middleware stack around this; tests call it directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::bad_request(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|_err, _req| AppError::bad_request("Invalid path parameter").into()),
        );

    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Public site: /api/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/news").configure(news::configure_public_routes));
    cfg.service(
        web::scope("/api/donation-programs").configure(donations::configure_public_program_routes),
    );
    cfg.service(web::scope("/api/donations").configure(donations::configure_public_donation_routes));
    cfg.service(web::scope("/api/carousel").configure(carousel::configure_public_routes));

    // Back office: /api/admin/**, each route guarded by its permission
    cfg.service(
        web::scope("/api/admin")
            .service(web::scope("/dashboard").configure(dashboard::configure_routes))
            .service(web::scope("/users").configure(users::configure_routes))
            .service(web::scope("/news").configure(news::configure_admin_routes))
            .service(
                web::scope("/donation-programs").configure(donations::configure_admin_program_routes),
            )
            .service(web::scope("/donations").configure(donations::configure_admin_donation_routes))
            .service(web::scope("/transactions").configure(transactions::configure_routes))
            .service(web::scope("/carousel").configure(carousel::configure_admin_routes))
            .service(web::scope("/activity").configure(activity::configure_routes)),
    );

    cfg.default_service(web::to(not_found));
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Route not found"))
}

/// Queue an activity-log row for an admin write.
pub(crate) fn record_activity(
    state: &AppState,
    user_id: i64,
    action: &'static str,
    entity: &'static str,
    entity_id: Option<i64>,
) {
    state.jobs.record_activity(NewActivity {
        user_id: Some(user_id),
        action,
        entity,
        entity_id,
        detail: None,
    });
}
