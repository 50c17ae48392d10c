//! User administration rules layered over the users repository.

use sea_orm::ConnectionTrait;

use crate::auth::claims::Role;
use crate::auth::password::{hash_password_blocking, validate_new_password};
use crate::error::AppError;
use crate::repos::users::{self, Account, AccountChanges, NewAccount};

pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check only: one `@`, something before it and a dot after it.
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("Name is required"));
    }
    Ok(name.to_string())
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CreateUser,
) -> Result<Account, AppError> {
    let email = normalize_email(&input.email);
    if !is_plausible_email(&email) {
        return Err(AppError::invalid("A valid email is required"));
    }
    let name = required_name(&input.name)?;
    validate_new_password(&input.password)?;

    if users::find_by_email(conn, &email).await?.is_some() {
        return Err(AppError::conflict("Email already registered"));
    }

    users::create(
        conn,
        NewAccount {
            email,
            name,
            password_hash: hash_password_blocking(input.password).await?,
            role: input.role,
        },
    )
    .await
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    acting_user_id: i64,
    target_id: i64,
    input: UpdateUser,
) -> Result<Account, AppError> {
    if acting_user_id == target_id && input.is_active == Some(false) {
        return Err(AppError::bad_request("You cannot deactivate your own account"));
    }
    // Only super admins manage users, so any other role is a self-demotion.
    if acting_user_id == target_id && input.role.is_some_and(|role| role != Role::SuperAdmin) {
        return Err(AppError::bad_request("You cannot change your own role"));
    }

    let name = input.name.as_deref().map(required_name).transpose()?;
    let password_hash = match input.password.as_deref() {
        Some(password) => {
            validate_new_password(password)?;
            Some(hash_password_blocking(password.to_string()).await?)
        }
        None => None,
    };

    users::update(
        conn,
        target_id,
        AccountChanges {
            name,
            role: input.role,
            is_active: input.is_active,
            password_hash,
        },
    )
    .await
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    acting_user_id: i64,
    target_id: i64,
) -> Result<(), AppError> {
    if acting_user_id == target_id {
        return Err(AppError::bad_request("You cannot delete your own account"));
    }
    if !users::delete(conn, target_id).await? {
        return Err(AppError::not_found("User not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_plausible_email("takmir@masjid.or.id"));
        assert!(!is_plausible_email("takmir"));
        assert!(!is_plausible_email("@masjid.org"));
        assert!(!is_plausible_email("a@b@c.org"));
        assert!(!is_plausible_email("a@localhost"));
        assert_eq!(normalize_email("  Admin@Masjid.ORG "), "admin@masjid.org");
    }

    #[tokio::test]
    async fn cannot_delete_self() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = delete_user(&db, 4, 4).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn cannot_deactivate_self() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = update_user(
            &db,
            4,
            4,
            UpdateUser {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn cannot_demote_self() {
        for role in [Role::Admin, Role::Viewer] {
            let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
            let err = update_user(
                &db,
                4,
                4,
                UpdateUser {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
            match err {
                AppError::BadRequest { detail } => {
                    assert_eq!(detail, "You cannot change your own role")
                }
                other => panic!("expected bad request, got {other:?}"),
            }
            assert!(db.into_transaction_log().is_empty());
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_input_before_touching_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_user(
            &db,
            CreateUser {
                email: "not-an-email".into(),
                name: "Imam".into(),
                password: "long-enough".into(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = create_user(
            &db,
            CreateUser {
                email: "imam@masjid.org".into(),
                name: "Imam".into(),
                password: "short".into(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
