use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::{Date, OffsetDateTime};

use super::record_activity;
use crate::auth::permissions::{ManageFinance, ReadFinance};
use crate::entities::transactions::{Model as Transaction, TransactionKind};
use crate::error::AppError;
use crate::extractors::{Authorized, Validate, ValidatedJson};
use crate::http::{envelope, parse_pagination, PaginationQuery};
use crate::repos::transactions;
use crate::services::finance::{self, CreateTransaction, UpdateTransaction};
use crate::state::app_state::AppState;
use crate::utils::date_format::iso_date;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: i64,
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
    pub created_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Transaction> for TransactionView {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            category: t.category,
            amount: t.amount,
            description: t.description,
            transaction_date: t.transaction_date,
            created_by: t.created_by,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// `YYYY-MM`
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
}

impl Validate for CreateTransactionRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.amount <= 0 {
            return Err(AppError::invalid("Amount must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "iso_date::option")]
    pub transaction_date: Option<Date>,
}

impl Validate for UpdateTransactionRequest {}

async fn list_transactions(
    _user: Authorized<ReadFinance>,
    filter: web::Query<TransactionFilter>,
    page: web::Query<PaginationQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = parse_pagination(&page);
    let range = filter
        .month
        .as_deref()
        .map(finance::month_range)
        .transpose()?;
    let (rows, total) = transactions::list(app_state.db(), filter.kind, range, &page).await?;
    let views: Vec<TransactionView> = rows.into_iter().map(TransactionView::from).collect();
    Ok(envelope::paginated(views, total, &page))
}

async fn summary(
    _user: Authorized<ReadFinance>,
    query: web::Query<YearQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let year = query
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());
    let summary = finance::year_summary(app_state.db(), year).await?;
    Ok(envelope::ok(summary))
}

async fn get_transaction(
    _user: Authorized<ReadFinance>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let row = transactions::find_by_id(app_state.db(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(envelope::ok(TransactionView::from(row)))
}

async fn create_transaction(
    user: Authorized<ManageFinance>,
    body: ValidatedJson<CreateTransactionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let row = finance::create_transaction(
        app_state.db(),
        user.id,
        CreateTransaction {
            kind: body.kind,
            category: body.category,
            amount: body.amount,
            description: body.description,
            transaction_date: body.transaction_date,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "create", "transaction", Some(row.id));
    Ok(envelope::created(TransactionView::from(row), "Transaction recorded"))
}

async fn update_transaction(
    user: Authorized<ManageFinance>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateTransactionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let row = finance::update_transaction(
        app_state.db(),
        id,
        UpdateTransaction {
            kind: body.kind,
            category: body.category,
            amount: body.amount,
            description: body.description,
            transaction_date: body.transaction_date,
        },
    )
    .await?;

    record_activity(&app_state, user.id, "update", "transaction", Some(id));
    Ok(envelope::ok_with_message(
        TransactionView::from(row),
        "Transaction updated",
    ))
}

async fn delete_transaction(
    user: Authorized<ManageFinance>,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    finance::delete_transaction(app_state.db(), id).await?;

    record_activity(&app_state, user.id, "delete", "transaction", Some(id));
    Ok(envelope::done("Transaction deleted"))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // `/summary` before `/{id}` so it isn't parsed as an id.
    cfg.route("/summary", web::get().to(summary))
        .service(
            web::resource("")
                .route(web::get().to(list_transactions))
                .route(web::post().to(create_transaction)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_transaction))
                .route(web::put().to(update_transaction))
                .route(web::delete().to(delete_transaction)),
        );
}
