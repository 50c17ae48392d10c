use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::claims::TokenSubject;
use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password_blocking, validate_new_password, verify_password_blocking};
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{self, AccountChanges, UserView};
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserView,
}

/// Check credentials and issue a token.
///
/// Unknown email, wrong password and deactivated account all produce the
/// same `InvalidCredentials`; only the security log tells them apart.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security_config: &SecurityConfig,
    email: &str,
    password: &str,
    now: SystemTime,
) -> Result<LoginOutcome, AppError> {
    let email = email.trim().to_lowercase();

    let account = users::find_by_email(conn, &email).await?;
    // Unknown emails still pay for an Argon2 verify against a dummy hash.
    let verified = verify_password_blocking(
        password.to_string(),
        account.as_ref().map(|a| a.password_hash.clone()),
    )
    .await?;

    let Some(account) = account else {
        security::login_failed("unknown_email", &email);
        return Err(AppError::invalid_credentials());
    };

    if !verified {
        security::login_failed("wrong_password", &email);
        return Err(AppError::invalid_credentials());
    }

    if !account.is_active {
        security::login_failed("account_inactive", &email);
        return Err(AppError::invalid_credentials());
    }

    let token = issue_token(
        &TokenSubject {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
        },
        now,
        security_config,
    )?;

    let logged_in_at = OffsetDateTime::from(now);
    if let Err(e) = users::touch_last_login(conn, account.id, logged_in_at).await {
        warn!(user_id = account.id, error = %e, "failed to record last login");
    }

    info!(user_id = account.id, email = %Redacted(&account.email), "login succeeded");

    let mut user = UserView::from(&account);
    user.last_login_at = Some(logged_in_at);
    Ok(LoginOutcome { token, user })
}

pub async fn change_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    current_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let account = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let verified =
        verify_password_blocking(current_password.to_string(), Some(account.password_hash)).await?;
    if !verified {
        return Err(AppError::bad_request("Current password is incorrect"));
    }
    validate_new_password(new_password)?;

    users::update(
        conn,
        user_id,
        AccountChanges {
            password_hash: Some(hash_password_blocking(new_password.to_string()).await?),
            ..Default::default()
        },
    )
    .await?;

    info!(user_id, "password changed");
    Ok(())
}
