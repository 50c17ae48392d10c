use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;

use super::record_activity;
use crate::auth::permissions::ManageContent;
use crate::entities::carousel_slides::Model as CarouselSlide;
use crate::error::AppError;
use crate::extractors::{Authorized, Validate, ValidatedJson};
use crate::http::envelope;
use crate::repos::carousel::{self, NewSlide, SlideChanges};
use crate::services::{optional_text, required_text};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideView {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<CarouselSlide> for SlideView {
    fn from(s: CarouselSlide) -> Self {
        Self {
            id: s.id,
            title: s.title,
            subtitle: s.subtitle,
            image_url: s.image_url,
            link_url: s.link_url,
            sort_order: s.sort_order,
            is_active: s.is_active,
            updated_at: s.updated_at,
        }
    }
}

fn views(slides: Vec<CarouselSlide>) -> Vec<SlideView> {
    slides.into_iter().map(SlideView::from).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlideRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Validate for CreateSlideRequest {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlideRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    pub subtitle: Option<Option<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, with = "double_option")]
    pub link_url: Option<Option<String>>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for UpdateSlideRequest {}

async fn list_active(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let slides = carousel::list(app_state.db(), true).await?;
    Ok(envelope::ok(views(slides)))
}

async fn list_all(
    _user: Authorized<ManageContent>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let slides = carousel::list(app_state.db(), false).await?;
    Ok(envelope::ok(views(slides)))
}

async fn create_slide(
    user: Authorized<ManageContent>,
    body: ValidatedJson<CreateSlideRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let slide = carousel::create(
        app_state.db(),
        NewSlide {
            title: required_text("Title", &body.title)?,
            subtitle: optional_text(body.subtitle),
            image_url: required_text("Image URL", &body.image_url)?,
            link_url: optional_text(body.link_url),
            sort_order: body.sort_order,
            is_active: body.is_active,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "create", "carousel_slide", Some(slide.id));
    Ok(envelope::created(SlideView::from(slide), "Slide created"))
}

async fn update_slide(
    user: Authorized<ManageContent>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateSlideRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let changes = SlideChanges {
        title: body
            .title
            .as_deref()
            .map(|t| required_text("Title", t))
            .transpose()?,
        subtitle: body.subtitle.map(optional_text),
        image_url: body
            .image_url
            .as_deref()
            .map(|u| required_text("Image URL", u))
            .transpose()?,
        link_url: body.link_url.map(optional_text),
        sort_order: body.sort_order,
        is_active: body.is_active,
    };
    let existing = carousel::find_by_id(app_state.db(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Slide not found"))?;
    let slide = carousel::update(app_state.db(), existing, changes).await?;

    record_activity(&app_state, user.id, "update", "carousel_slide", Some(id));
    Ok(envelope::ok_with_message(SlideView::from(slide), "Slide updated"))
}

async fn delete_slide(
    user: Authorized<ManageContent>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !carousel::delete(app_state.db(), id).await? {
        return Err(AppError::not_found("Slide not found"));
    }

    record_activity(&app_state, user.id, "delete", "carousel_slide", Some(id));
    Ok(envelope::done("Slide deleted"))
}

pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_active));
}

pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_all))
            .route(web::post().to(create_slide)),
    )
    .service(
        web::resource("/{id}")
            .route(web::put().to(update_slide))
            .route(web::delete().to(delete_slide)),
    );
}
