use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;

use super::record_activity;
use crate::auth::permissions::ManageContent;
use crate::entities::news::Model as NewsItem;
use crate::error::AppError;
use crate::extractors::{Authorized, Validate, ValidatedJson};
use crate::http::{envelope, parse_pagination, PaginationQuery};
use crate::repos::news;
use crate::services::news::{self as news_service, CreateNews, UpdateNews};
use crate::state::app_state::AppState;
use crate::utils::relative_time::relative_time;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsView {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_published: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub view_count: i64,
    pub author_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// "3 hours ago", measured from publication (or creation for drafts).
    pub relative_time: String,
}

impl NewsView {
    fn new(item: NewsItem, now: OffsetDateTime) -> Self {
        let relative_time = relative_time(item.published_at.unwrap_or(item.created_at), now);
        Self {
            id: item.id,
            title: item.title,
            slug: item.slug,
            excerpt: item.excerpt,
            content: item.content,
            image_url: item.image_url,
            category: item.category,
            is_published: item.is_published,
            published_at: item.published_at,
            view_count: item.view_count,
            author_id: item.author_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
            relative_time,
        }
    }

    fn many(items: Vec<NewsItem>) -> Vec<Self> {
        let now = OffsetDateTime::now_utc();
        items.into_iter().map(|item| Self::new(item, now)).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct PublicNewsFilter {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Published,
    Draft,
}

#[derive(Debug, Deserialize)]
pub struct AdminNewsFilter {
    pub status: Option<PublicationStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl Validate for CreateNewsRequest {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    #[serde(default)]
    pub title: Option<String>,
    // None = not provided, Some(None) = explicit null (clear)
    #[serde(default, with = "double_option")]
    pub excerpt: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl Validate for UpdateNewsRequest {}

async fn list_published(
    filter: web::Query<PublicNewsFilter>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let category = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let (items, total) = news::list_published(app_state.db(), category, &page).await?;
    Ok(envelope::paginated(NewsView::many(items), total, &page))
}

async fn read_published(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let item = news_service::read_published(app_state.db(), &app_state.jobs, &path).await?;
    Ok(envelope::ok(NewsView::new(item, OffsetDateTime::now_utc())))
}

async fn list_all(
    _user: Authorized<ManageContent>,
    filter: web::Query<AdminNewsFilter>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let published = filter
        .status
        .map(|status| status == PublicationStatus::Published);
    let (items, total) = news::list_all(app_state.db(), published, &page).await?;
    Ok(envelope::paginated(NewsView::many(items), total, &page))
}

async fn get_news(
    _user: Authorized<ManageContent>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let item = news::find_by_id(app_state.db(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("News not found"))?;
    Ok(envelope::ok(NewsView::new(item, OffsetDateTime::now_utc())))
}

async fn create_news(
    user: Authorized<ManageContent>,
    body: ValidatedJson<CreateNewsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let item = news_service::create_news(
        app_state.db(),
        user.id,
        CreateNews {
            title: body.title,
            excerpt: body.excerpt,
            content: body.content,
            image_url: body.image_url,
            category: body.category,
            is_published: body.is_published,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "create", "news", Some(item.id));
    Ok(envelope::created(
        NewsView::new(item, OffsetDateTime::now_utc()),
        "News created",
    ))
}

async fn update_news(
    user: Authorized<ManageContent>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateNewsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let item = news_service::update_news(
        app_state.db(),
        id,
        UpdateNews {
            title: body.title,
            excerpt: body.excerpt,
            content: body.content,
            image_url: body.image_url,
            category: body.category,
            is_published: body.is_published,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "update", "news", Some(id));
    Ok(envelope::ok_with_message(
        NewsView::new(item, OffsetDateTime::now_utc()),
        "News updated",
    ))
}

async fn delete_news(
    user: Authorized<ManageContent>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    news_service::delete_news(app_state.db(), id).await?;

    record_activity(&app_state, user.id, "delete", "news", Some(id));
    Ok(envelope::done("News deleted"))
}

pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_published))
        .route("/{slug}", web::get().to(read_published));
}

pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_all))
            .route(web::post().to(create_news)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_news))
            .route(web::put().to(update_news))
            .route(web::delete().to(delete_news)),
    );
}
