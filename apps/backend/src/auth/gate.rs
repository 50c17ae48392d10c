//! Per-request authentication and role check.
//!
//! Outcome is one of: pass, 401, 403, or a 500 when the account lookup
//! itself fails. The client only ever sees the generic messages on
//! [`AppError::Unauthorized`] / [`AppError::Forbidden`]; the specific reason
//! goes to the security log.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::debug;

use super::claims::Role;
use super::jwt::verify_token;
use crate::error::AppError;
use crate::logging::security;
use crate::repos::users;
use crate::state::security_config::SecurityConfig;

/// Identity resolved by the gate. `role` is the account's current role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Pull the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

fn deny(reason: &str, user_id: Option<i64>) -> AppError {
    security::access_denied(401, reason, user_id);
    AppError::unauthorized()
}

/// Authenticate the request and, when `allowed_roles` is non-empty, require
/// the account's role to be one of them.
///
/// Issues exactly one read (the account row) and no writes.
pub async fn authorize<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    authorization: Option<&str>,
    allowed_roles: &[Role],
) -> Result<AuthenticatedUser, AppError> {
    let header = authorization.ok_or_else(|| deny("missing_authorization_header", None))?;
    let token = bearer_token(header).ok_or_else(|| deny("malformed_authorization_header", None))?;

    let claim = verify_token(token, security).map_err(|e| {
        debug!(reason = ?e.reason(), "token rejected");
        deny("invalid_token", None)
    })?;

    let account = users::find_by_id(conn, claim.account_id())
        .await?
        .ok_or_else(|| deny("account_not_found", Some(claim.account_id())))?;

    if !account.is_active {
        return Err(deny("account_inactive", Some(account.id)));
    }

    if !allowed_roles.is_empty() && !allowed_roles.contains(&account.role) {
        security::access_denied(403, "role_not_allowed", Some(account.id));
        return Err(AppError::forbidden());
    }

    Ok(AuthenticatedUser {
        id: account.id,
        email: account.email,
        name: account.name,
        role: account.role,
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
    use time::OffsetDateTime;

    use super::*;
    use crate::auth::claims::TokenSubject;
    use crate::auth::jwt::issue_token;
    use crate::entities::users as user_entity;

    const SECRET: &str = "gate-test-secret-0123456789abcdef";

    fn security() -> SecurityConfig {
        SecurityConfig::new(SECRET.as_bytes())
    }

    fn row(id: i64, role: Role, is_active: bool) -> user_entity::Model {
        let now = OffsetDateTime::now_utc();
        user_entity::Model {
            id,
            email: format!("user{id}@masjid.test"),
            name: format!("User {id}"),
            password_hash: "$argon2id$unused".to_string(),
            role,
            is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn db_with(rows: Vec<user_entity::Model>) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection()
    }

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn header_for(id: i64, role: Role) -> String {
        let subject = TokenSubject {
            id,
            email: format!("user{id}@masjid.test"),
            role,
        };
        format!(
            "Bearer {}",
            issue_token(&subject, SystemTime::now(), &security()).unwrap()
        )
    }

    #[test]
    fn bearer_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer a b"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let err = authorize(&empty_db(), &security(), None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn header_without_bearer_prefix_is_401() {
        let header = header_for(1, Role::Admin).replacen("Bearer ", "", 1);
        let err = authorize(&empty_db(), &security(), Some(&header), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn malformed_token_is_401() {
        let err = authorize(&empty_db(), &security(), Some("Bearer not.a.jwt"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let short = security().with_token_ttl(Duration::from_secs(1));
        let subject = TokenSubject {
            id: 1,
            email: "user1@masjid.test".to_string(),
            role: Role::Admin,
        };
        let token = issue_token(
            &subject,
            SystemTime::now() - Duration::from_secs(3600),
            &short,
        )
        .unwrap();

        let err = authorize(&empty_db(), &short, Some(&format!("Bearer {token}")), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn deleted_account_is_401() {
        let header = header_for(7, Role::Admin);
        let err = authorize(&db_with(vec![]), &security(), Some(&header), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn inactive_account_is_401_not_403() {
        let header = header_for(7, Role::SuperAdmin);
        let err = authorize(
            &db_with(vec![row(7, Role::SuperAdmin, false)]),
            &security(),
            Some(&header),
            &[Role::Viewer],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn role_outside_allow_list_is_403() {
        let header = header_for(3, Role::Admin);
        let err = authorize(
            &db_with(vec![row(3, Role::Admin, true)]),
            &security(),
            Some(&header),
            &[Role::SuperAdmin],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(err.client_message(), crate::error::FORBIDDEN_MESSAGE);
    }

    #[tokio::test]
    async fn empty_allow_list_admits_any_active_role() {
        let header = header_for(5, Role::Viewer);
        let user = authorize(
            &db_with(vec![row(5, Role::Viewer, true)]),
            &security(),
            Some(&header),
            &[],
        )
        .await
        .unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.name, "User 5");
    }

    #[tokio::test]
    async fn current_role_wins_over_token_role() {
        // Token still says SUPER_ADMIN but the account was demoted.
        let header = header_for(9, Role::SuperAdmin);
        let err = authorize(
            &db_with(vec![row(9, Role::Viewer, true)]),
            &security(),
            Some(&header),
            &[Role::SuperAdmin],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn lookup_failure_is_500() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let header = header_for(2, Role::Admin);

        let err = authorize(&db, &security(), Some(&header), &[])
            .await
            .unwrap_err();
        assert!(err.status().is_server_error());
    }
}
