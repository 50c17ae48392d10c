use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::record_activity;
use crate::auth::claims::Role;
use crate::auth::permissions::ManageUsers;
use crate::error::AppError;
use crate::extractors::{Authorized, Validate, ValidatedJson};
use crate::http::{envelope, parse_pagination, PaginationQuery};
use crate::repos::users::{self, UserView};
use crate::services::users::{self as user_service, CreateUser, UpdateUser};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

impl Validate for CreateUserRequest {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.password.is_none()
        {
            return Err(AppError::invalid("Nothing to update"));
        }
        Ok(())
    }
}

async fn list_users(
    _user: Authorized<ManageUsers>,
    filter: web::Query<UserFilter>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let (accounts, total) = users::list(app_state.db(), filter.search.as_deref(), &page).await?;
    let views: Vec<UserView> = accounts.iter().map(UserView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

async fn get_user(
    _user: Authorized<ManageUsers>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let account = users::find_by_id(app_state.db(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(envelope::ok(UserView::from(&account)))
}

async fn create_user(
    user: Authorized<ManageUsers>,
    body: ValidatedJson<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let account = user_service::create_user(
        app_state.db(),
        CreateUser {
            email: body.email,
            name: body.name,
            password: body.password,
            role: body.role,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "create", "user", Some(account.id));
    Ok(envelope::created(UserView::from(&account), "User created"))
}

async fn update_user(
    user: Authorized<ManageUsers>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target_id = path.into_inner();
    let body = body.into_inner();
    let account = user_service::update_user(
        app_state.db(),
        user.id,
        target_id,
        UpdateUser {
            name: body.name,
            role: body.role,
            is_active: body.is_active,
            password: body.password,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "update", "user", Some(target_id));
    Ok(envelope::ok_with_message(UserView::from(&account), "User updated"))
}

async fn delete_user(
    user: Authorized<ManageUsers>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target_id = path.into_inner();
    user_service::delete_user(app_state.db(), user.id, target_id).await?;

    record_activity(&app_state, user.id, "delete", "user", Some(target_id));
    Ok(envelope::done("User deleted"))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
