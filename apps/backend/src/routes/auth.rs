use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::{CurrentUser, Validate, ValidatedJson};
use crate::http::envelope;
use crate::services::auth;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::invalid("Email and password are required"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = auth::login(
        app_state.db(),
        &app_state.security,
        &body.email,
        &body.password,
        SystemTime::now(),
    )
    .await?;

    Ok(envelope::ok_with_message(outcome, "Login successful"))
}

async fn me(current_user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(envelope::ok(current_user.0))
}

async fn change_password(
    current_user: CurrentUser,
    body: ValidatedJson<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::change_password(
        app_state.db(),
        current_user.id,
        &body.current_password,
        &body.new_password,
    )
    .await?;

    Ok(envelope::done("Password updated"))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/me", web::get().to(me))
        .route("/password", web::put().to(change_password));
}
