use sea_orm::ConnectionTrait;

use super::add_amount;
use super::finance::{self, Totals, YearSummary};
use crate::entities::transactions::Model as Transaction;
use crate::error::AppError;
use crate::repos::{donation_programs, donations, news, transactions};

const RECENT_TRANSACTIONS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub totals: Totals,
    pub verified_donations: i64,
    pub pending_donations: u64,
    pub published_news: u64,
    pub active_programs: u64,
    pub year: YearSummary,
    pub recent_transactions: Vec<Transaction>,
}

/// Everything the admin landing page shows, for `year`'s monthly chart.
pub async fn stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    year: i32,
) -> Result<DashboardStats, AppError> {
    let totals = Totals::from_amounts(transactions::all_amounts(conn).await?)?;
    let verified_donations = donations::verified_amounts(conn)
        .await?
        .into_iter()
        .try_fold(0, add_amount)?;
    let pending_donations = donations::count_pending(conn).await?;
    let published_news = news::count_published(conn).await?;
    let active_programs = donation_programs::count_active(conn).await?;
    let year = finance::year_summary(conn, year).await?;
    let recent_transactions = transactions::recent(conn, RECENT_TRANSACTIONS).await?;

    Ok(DashboardStats {
        totals,
        verified_donations,
        pending_donations,
        published_news,
        active_programs,
        year,
        recent_transactions,
    })
}
