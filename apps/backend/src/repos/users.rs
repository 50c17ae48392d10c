//! User repository functions (generic over ConnectionTrait).

use sea_orm::sea_query::{Condition, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::entities::users::{self, Role};
use crate::error::AppError;
use crate::http::pagination::Pagination;

/// Account as seen by the rest of the backend. The password hash stays here.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Public projection of an account, safe to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Account>, AppError> {
    let user = users::Entity::find_by_id(id).one(conn).await?;
    Ok(user.map(Account::from))
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<Account>, AppError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(user.map(Account::from))
}

/// One page of accounts, newest first, optionally filtered by a
/// case-insensitive match on name or email.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
    page: &Pagination,
) -> Result<(Vec<Account>, u64), AppError> {
    let mut query = users::Entity::find();
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", term.to_lowercase());
        query = query.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(users::Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(users::Column::Email))).like(pattern)),
        );
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(users::Column::CreatedAt)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;

    Ok((rows.into_iter().map(Account::from).collect(), total))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewAccount,
) -> Result<Account, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = users::ActiveModel {
        id: NotSet,
        email: Set(new.email),
        name: Set(new.name),
        password_hash: Set(new.password_hash),
        role: Set(new.role),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(Account::from(active.insert(conn).await?))
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    changes: AccountChanges,
) -> Result<Account, AppError> {
    let existing = users::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: users::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(role) = changes.role {
        active.role = Set(role);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(hash) = changes.password_hash {
        active.password_hash = Set(hash);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    Ok(Account::from(active.update(conn).await?))
}

/// Stamp `last_login_at` without reading the row back.
pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    at: OffsetDateTime,
) -> Result<(), AppError> {
    users::Entity::update_many()
        .col_expr(users::Column::LastLoginAt, Expr::value(Some(at)))
        .filter(users::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Returns false when no row matched.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, AppError> {
    let result = users::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            role: model.role,
            is_active: model.is_active,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Account> for UserView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            is_active: account.is_active,
            last_login_at: account.last_login_at,
            created_at: account.created_at,
        }
    }
}
