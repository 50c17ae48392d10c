use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use super::transactions::TransactionView;
use crate::auth::permissions::ViewDashboard;
use crate::error::AppError;
use crate::extractors::Authorized;
use crate::http::envelope;
use crate::services::dashboard;
use crate::services::finance::{Totals, YearSummary};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    total_income: i64,
    total_expense: i64,
    balance: i64,
    verified_donations: i64,
    pending_donations: u64,
    published_news: u64,
    active_programs: u64,
    monthly: YearSummary,
    recent_transactions: Vec<TransactionView>,
}

async fn overview(
    _user: Authorized<ViewDashboard>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let year = OffsetDateTime::now_utc().year();
    let stats = dashboard::stats(app_state.db(), year).await?;
    let Totals {
        income,
        expense,
        balance,
    } = stats.totals;

    Ok(envelope::ok(DashboardResponse {
        total_income: income,
        total_expense: expense,
        balance,
        verified_donations: stats.verified_donations,
        pending_donations: stats.pending_donations,
        published_news: stats.published_news,
        active_programs: stats.active_programs,
        monthly: stats.year,
        recent_transactions: stats
            .recent_transactions
            .into_iter()
            .map(TransactionView::from)
            .collect(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(overview));
}
