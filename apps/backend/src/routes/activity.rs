use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::auth::permissions::ViewActivity;
use crate::error::AppError;
use crate::extractors::Authorized;
use crate::http::{envelope, parse_pagination, PaginationQuery};
use crate::repos::activity::{self, ActivityEntry};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i64>,
    pub detail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ActivityEntry> for ActivityView {
    fn from(entry: ActivityEntry) -> Self {
        let log = entry.log;
        Self {
            id: log.id,
            user_id: log.user_id,
            user_name: entry.user_name,
            action: log.action,
            entity: log.entity,
            entity_id: log.entity_id,
            detail: log.detail,
            created_at: log.created_at,
        }
    }
}

async fn list_activity(
    _user: Authorized<ViewActivity>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let (entries, total) = activity::list(app_state.db(), &page).await?;
    let views: Vec<ActivityView> = entries.into_iter().map(ActivityView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_activity));
}
