use sea_orm::ConnectionTrait;
use tracing::info;

use super::users::{create_user, CreateUser};
use crate::auth::claims::Role;
use crate::config::bootstrap_admin::BootstrapAdmin;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::users;

/// Create the configured super admin unless an account with that email
/// already exists. Returns whether an account was created.
pub async fn ensure_bootstrap_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    admin: &BootstrapAdmin,
) -> Result<bool, AppError> {
    if users::find_by_email(conn, &admin.email).await?.is_some() {
        return Ok(false);
    }

    let account = create_user(
        conn,
        CreateUser {
            email: admin.email.clone(),
            name: admin.name.clone(),
            password: admin.password.clone(),
            role: Role::SuperAdmin,
        },
    )
    .await?;

    info!(user_id = account.id, email = %Redacted(&account.email), "bootstrap super admin created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use time::OffsetDateTime;

    use super::*;
    use crate::entities::users as user_entity;

    #[tokio::test]
    async fn existing_account_is_left_alone() {
        let now = OffsetDateTime::now_utc();
        let existing = user_entity::Model {
            id: 1,
            email: "admin@masjid.test".into(),
            name: "Administrator".into(),
            password_hash: "$argon2id$unused".into(),
            role: Role::Admin,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();
        let admin = BootstrapAdmin {
            email: "admin@masjid.test".into(),
            name: "Administrator".into(),
            password: "change-me-now".into(),
        };

        assert!(!ensure_bootstrap_admin(&db, &admin).await.unwrap());
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
