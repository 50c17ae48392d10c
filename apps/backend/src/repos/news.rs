use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::news;
use crate::error::AppError;
use crate::http::pagination::Pagination;

pub struct NewNews {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_published: bool,
    pub author_id: Option<i64>,
}

/// Partial update. `Some(None)` clears a nullable column.
#[derive(Default)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub is_published: Option<bool>,
}

/// Published items, newest first.
pub async fn list_published<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    category: Option<&str>,
    page: &Pagination,
) -> Result<(Vec<news::Model>, u64), AppError> {
    let mut query = news::Entity::find().filter(news::Column::IsPublished.eq(true));
    if let Some(category) = category {
        query = query.filter(news::Column::Category.eq(category));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(news::Column::PublishedAt)
        .order_by_desc(news::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

/// Everything, optionally only published (`Some(true)`) or drafts (`Some(false)`).
pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    published: Option<bool>,
    page: &Pagination,
) -> Result<(Vec<news::Model>, u64), AppError> {
    let mut query = news::Entity::find();
    if let Some(published) = published {
        query = query.filter(news::Column::IsPublished.eq(published));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(news::Column::CreatedAt)
        .order_by_desc(news::Column::Id)
        .offset(page.skip())
        .limit(page.limit())
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<news::Model>, AppError> {
    Ok(news::Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_published_by_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: &str,
) -> Result<Option<news::Model>, AppError> {
    Ok(news::Entity::find()
        .filter(news::Column::Slug.eq(slug))
        .filter(news::Column::IsPublished.eq(true))
        .one(conn)
        .await?)
}

/// Slugs equal to `base` or shaped like `base-…`, excluding row `except`.
pub async fn slugs_like<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    base: &str,
    except: Option<i64>,
) -> Result<Vec<String>, AppError> {
    let mut query = news::Entity::find().filter(
        Condition::any()
            .add(news::Column::Slug.eq(base))
            .add(news::Column::Slug.starts_with(format!("{base}-"))),
    );
    if let Some(id) = except {
        query = query.filter(news::Column::Id.ne(id));
    }
    Ok(query.all(conn).await?.into_iter().map(|n| n.slug).collect())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewNews,
) -> Result<news::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = news::ActiveModel {
        id: NotSet,
        title: Set(new.title),
        slug: Set(new.slug),
        excerpt: Set(new.excerpt),
        content: Set(new.content),
        image_url: Set(new.image_url),
        category: Set(new.category),
        is_published: Set(new.is_published),
        published_at: Set(new.is_published.then_some(now)),
        view_count: Set(0),
        author_id: Set(new.author_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

/// Apply `changes` to an already-loaded row. `published_at` is stamped the
/// first time the item is published and kept afterwards.
pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: news::Model,
    changes: NewsChanges,
) -> Result<news::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let first_publish = changes.is_published == Some(true) && existing.published_at.is_none();

    let mut active: news::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(slug) = changes.slug {
        active.slug = Set(slug);
    }
    if let Some(excerpt) = changes.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(content) = changes.content {
        active.content = Set(content);
    }
    if let Some(image_url) = changes.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(category) = changes.category {
        active.category = Set(category);
    }
    if let Some(is_published) = changes.is_published {
        active.is_published = Set(is_published);
    }
    if first_publish {
        active.published_at = Set(Some(now));
    }
    active.updated_at = Set(now);

    Ok(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, AppError> {
    let result = news::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

pub async fn increment_views<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), AppError> {
    news::Entity::update_many()
        .col_expr(
            news::Column::ViewCount,
            Expr::col(news::Column::ViewCount).add(1),
        )
        .filter(news::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn count_published<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, AppError> {
    Ok(news::Entity::find()
        .filter(news::Column::IsPublished.eq(true))
        .count(conn)
        .await?)
}
