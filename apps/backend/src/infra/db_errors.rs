//! SeaORM -> AppError translation.
//!
//! Raw driver messages can contain row values (emails, tokens), so they are
//! only ever logged through [`Redacted`] and never copied into client-facing
//! detail.

use tracing::{error, warn};

use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Unique-index names from the init migration mapped to user-facing detail.
fn unique_violation_detail(error_msg: &str) -> &'static str {
    if error_msg.contains("ux_users_email") {
        "Email already registered"
    } else if error_msg.contains("ux_news_slug") || error_msg.contains("ux_donation_programs_slug")
    {
        "Slug already exists"
    } else {
        "Resource already exists"
    }
}

/// Translate a `DbErr` into an `AppError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> AppError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return AppError::not_found("Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return AppError::db_unavailable();
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return AppError::conflict(unique_violation_detail(&error_msg));
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return AppError::invalid("Referenced record does not exist");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    AppError::db(error_msg)
}
