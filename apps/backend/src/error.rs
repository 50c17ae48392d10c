use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use tracing::error;

use crate::http::envelope;
use crate::infra::db_errors::map_db_err;
use crate::trace_ctx;

/// Message sent for every 401 produced by the auth gate. Deliberately generic:
/// clients never learn which precondition failed.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";
/// Message sent for every 403. Never names the role the route required.
pub const FORBIDDEN_MESSAGE: &str = "Access forbidden";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("Conflict: {detail}")]
    Conflict { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Stable machine-readable code, used in logs only.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Db { .. } => "DB_ERROR",
            AppError::DbUnavailable => "DB_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL",
            AppError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// The message placed in the envelope's `error` field.
    ///
    /// Server-side failures collapse to a single generic message; their
    /// detail goes to the log, never to the client.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation { detail }
            | AppError::BadRequest { detail }
            | AppError::NotFound { detail }
            | AppError::Conflict { detail } => detail.clone(),
            AppError::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AppError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            AppError::Db { .. }
            | AppError::DbUnavailable
            | AppError::Internal { .. }
            | AppError::Config { .. } => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(
                trace_id = %trace_id,
                code = self.code(),
                error = %self,
                "request_failed"
            );
        }

        let mut response = envelope::error_response(self.client_message(), Some(status));
        if let Ok(value) = actix_web::http::header::HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert(
                actix_web::http::header::HeaderName::from_static("x-trace-id"),
                value,
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn unauthorized_renders_generic_envelope() {
        let (status, json) = body_json(AppError::unauthorized()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], UNAUTHORIZED_MESSAGE);
        assert!(json.get("data").is_none());
    }

    #[actix_web::test]
    async fn forbidden_renders_generic_envelope() {
        let (status, json) = body_json(AppError::forbidden()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], FORBIDDEN_MESSAGE);
    }

    #[actix_web::test]
    async fn db_error_detail_is_not_leaked() {
        let (status, json) =
            body_json(AppError::db("relation \"users\" does not exist")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], INTERNAL_MESSAGE);
    }

    #[actix_web::test]
    async fn client_errors_carry_their_detail() {
        let (status, json) = body_json(AppError::conflict("Email already registered")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "Email already registered");

        let (status, _) = body_json(AppError::invalid("Amount must be positive")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_response_sets_trace_header() {
        let resp = AppError::not_found("News not found").error_response();
        assert_eq!(
            resp.headers().get("x-trace-id").unwrap().to_str().unwrap(),
            "unknown"
        );
    }
}
