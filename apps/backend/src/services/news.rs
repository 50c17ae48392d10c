use sea_orm::ConnectionTrait;

use super::{optional_text, required_text};
use crate::entities::news::Model as NewsItem;
use crate::error::AppError;
use crate::repos::news::{self, NewNews, NewsChanges};
use crate::services::jobs::{BackgroundJob, JobDispatcher};
use crate::utils::slug::{slugify, unique_slug};

pub struct CreateNews {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_published: bool,
}

#[derive(Default)]
pub struct UpdateNews {
    pub title: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub is_published: Option<bool>,
}

/// Slug for `title` that no other news row (other than `except`) uses.
pub async fn unique_news_slug<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    title: &str,
    except: Option<i64>,
) -> Result<String, AppError> {
    let base = slugify(title);
    let taken = news::slugs_like(conn, &base, except).await?;
    Ok(unique_slug(&base, &taken))
}

pub async fn create_news<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    author_id: i64,
    input: CreateNews,
) -> Result<NewsItem, AppError> {
    let title = required_text("Title", &input.title)?;
    let content = required_text("Content", &input.content)?;
    let slug = unique_news_slug(conn, &title, None).await?;

    news::create(
        conn,
        NewNews {
            title,
            slug,
            excerpt: optional_text(input.excerpt),
            content,
            image_url: optional_text(input.image_url),
            category: optional_text(input.category),
            is_published: input.is_published,
            author_id: Some(author_id),
        },
    )
    .await
}

pub async fn update_news<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    input: UpdateNews,
) -> Result<NewsItem, AppError> {
    let existing = news::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("News not found"))?;

    let mut changes = NewsChanges {
        excerpt: input.excerpt.map(optional_text),
        image_url: input.image_url.map(optional_text),
        category: input.category.map(optional_text),
        is_published: input.is_published,
        ..Default::default()
    };

    if let Some(title) = input.title.as_deref() {
        let title = required_text("Title", title)?;
        if title != existing.title {
            changes.slug = Some(unique_news_slug(conn, &title, Some(id)).await?);
        }
        changes.title = Some(title);
    }
    if let Some(content) = input.content.as_deref() {
        changes.content = Some(required_text("Content", content)?);
    }

    news::update(conn, existing, changes).await
}

pub async fn delete_news<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<(), AppError> {
    if !news::delete(conn, id).await? {
        return Err(AppError::not_found("News not found"));
    }
    Ok(())
}

/// Public read by slug. Counts the view in the background.
pub async fn read_published<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    jobs: &JobDispatcher,
    slug: &str,
) -> Result<NewsItem, AppError> {
    let item = news::find_published_by_slug(conn, slug)
        .await?
        .ok_or_else(|| AppError::not_found("News not found"))?;
    jobs.dispatch(BackgroundJob::IncrementNewsViews { news_id: item.id });
    Ok(item)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use time::OffsetDateTime;

    use super::*;

    fn item(id: i64, slug: &str) -> NewsItem {
        let now = OffsetDateTime::now_utc();
        NewsItem {
            id,
            title: "Kajian Subuh".into(),
            slug: slug.into(),
            excerpt: None,
            content: "Isi".into(),
            image_url: None,
            category: None,
            is_published: true,
            published_at: Some(now),
            view_count: 0,
            author_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn slug_gets_next_free_suffix() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![item(1, "kajian-subuh"), item(2, "kajian-subuh-2")]])
            .into_connection();

        let slug = unique_news_slug(&db, "Kajian Subuh", None).await.unwrap();
        assert_eq!(slug, "kajian-subuh-3");
    }

    #[tokio::test]
    async fn free_slug_is_used_as_is() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<NewsItem>::new()])
            .into_connection();

        let slug = unique_news_slug(&db, "Buka Puasa Bersama", None).await.unwrap();
        assert_eq!(slug, "buka-puasa-bersama");
    }

    #[tokio::test]
    async fn missing_slug_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<NewsItem>::new()])
            .into_connection();

        let err = read_published(&db, &JobDispatcher::disabled(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create_news(
            &db,
            1,
            CreateNews {
                title: "  ".into(),
                excerpt: None,
                content: "x".into(),
                image_url: None,
                category: None,
                is_published: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
