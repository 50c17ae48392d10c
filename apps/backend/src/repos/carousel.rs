use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::carousel_slides;
use crate::error::AppError;

pub struct NewSlide {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Default)]
pub struct SlideChanges {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub image_url: Option<String>,
    pub link_url: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Slides in display order; `active_only` for the public site.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<carousel_slides::Model>, AppError> {
    let mut query = carousel_slides::Entity::find();
    if active_only {
        query = query.filter(carousel_slides::Column::IsActive.eq(true));
    }
    Ok(query
        .order_by_asc(carousel_slides::Column::SortOrder)
        .order_by_asc(carousel_slides::Column::Id)
        .all(conn)
        .await?)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<carousel_slides::Model>, AppError> {
    Ok(carousel_slides::Entity::find_by_id(id).one(conn).await?)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewSlide,
) -> Result<carousel_slides::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let active = carousel_slides::ActiveModel {
        id: NotSet,
        title: Set(new.title),
        subtitle: Set(new.subtitle),
        image_url: Set(new.image_url),
        link_url: Set(new.link_url),
        sort_order: Set(new.sort_order),
        is_active: Set(new.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(active.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: carousel_slides::Model,
    changes: SlideChanges,
) -> Result<carousel_slides::Model, AppError> {
    let mut active: carousel_slides::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(subtitle) = changes.subtitle {
        active.subtitle = Set(subtitle);
    }
    if let Some(image_url) = changes.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(link_url) = changes.link_url {
        active.link_url = Set(link_url);
    }
    if let Some(sort_order) = changes.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    Ok(active.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, AppError> {
    let result = carousel_slides::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
