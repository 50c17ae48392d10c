use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::{Date, OffsetDateTime};

use crate::entities::donation_programs;
use crate::error::AppError;
use crate::http::pagination::Pagination;

pub struct NewProgram {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub target_amount: i64,
    pub is_active: bool,
    pub starts_on: Option<Date>,
    pub ends_on: Option<Date>,
}

#[derive(Default)]
pub struct ProgramChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub target_amount: Option<i64>,
    pub is_active: Option<bool>,
    pub starts_on: Option<Option<Date>>,
    pub ends_on: Option<Option<Date>>,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
    page: &Pagination,
) -> Result<(Vec<donation_programs::Model>, u64), AppError> {
    let mut query = donation_programs::Entity::find();
    if active_only {
        query = query.filter(donation_programs::Column::IsActive.eq(true));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(donation_programs::Column::CreatedAt)
        .order_by_desc(donation_programs::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<donation_programs::Model>, AppError> {
    Ok(donation_programs::Entity::find_by_id(id).one(conn).await?)
}

pub async fn slugs_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    base: &str,
    except: Option<i64>,
) -> Result<Vec<String>, AppError> {
    let mut query = donation_programs::Entity::find().filter(
        Condition::any()
            .add(donation_programs::Column::Slug.eq(base))
            .add(donation_programs::Column::Slug.starts_with(format!("{base}-"))),
    );
    if let Some(id) = except {
        query = query.filter(donation_programs::Column::Id.ne(id));
    }
    Ok(query.all(conn).await?.into_iter().map(|p| p.slug).collect())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewProgram,
) -> Result<donation_programs::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = donation_programs::ActiveModel {
        id: NotSet,
        title: Set(new.title),
        slug: Set(new.slug),
        description: Set(new.description),
        image_url: Set(new.image_url),
        target_amount: Set(new.target_amount),
        collected_amount: Set(0),
        is_active: Set(new.is_active),
        starts_on: Set(new.starts_on),
        ends_on: Set(new.ends_on),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: donation_programs::Model,
    changes: ProgramChanges,
) -> Result<donation_programs::Model, AppError> {
    let mut active: donation_programs::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(slug) = changes.slug {
        active.slug = Set(slug);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(image_url) = changes.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(target) = changes.target_amount {
        active.target_amount = Set(target);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(starts_on) = changes.starts_on {
        active.starts_on = Set(starts_on);
    }
    if let Some(ends_on) = changes.ends_on {
        active.ends_on = Set(ends_on);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, AppError> {
    let result = donation_programs::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

/// `collected_amount += amount`, done in SQL so concurrent verifications
/// don't overwrite each other. A bigint overflow fails the statement
/// (SQLSTATE 22003) rather than wrapping, so the review rolls back.
pub async fn add_collected<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    amount: i64,
) -> Result<(), AppError> {
    donation_programs::Entity::update_many()
        .col_expr(
            donation_programs::Column::CollectedAmount,
            Expr::col(donation_programs::Column::CollectedAmount).add(amount),
        )
        .col_expr(
            donation_programs::Column::UpdatedAt,
            Expr::value(OffsetDateTime::now_utc()),
        )
        .filter(donation_programs::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn count_active<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, AppError> {
    Ok(donation_programs::Entity::find()
        .filter(donation_programs::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}
