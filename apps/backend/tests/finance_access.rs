#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, read_success_data};
use common::{bearer_for, state, user_row};
use masjid_backend::entities::transactions::{self as tx_entity, TransactionKind};
use masjid_backend::error::FORBIDDEN_MESSAGE;
use masjid_backend::Role;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use time::macros::date;
use time::{Date, OffsetDateTime};

fn tx(id: i64, kind: TransactionKind, amount: i64, on: Date) -> tx_entity::Model {
    let now = OffsetDateTime::now_utc();
    tx_entity::Model {
        id,
        kind,
        category: "Infaq".to_string(),
        amount,
        description: None,
        transaction_date: on,
        created_by: Some(1),
        created_at: now,
        updated_at: now,
    }
}

#[actix_web::test]
async fn viewer_can_read_the_yearly_summary() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(5, Role::Viewer, true)]])
        .append_query_results([vec![
            tx(1, TransactionKind::Income, 500_000, date!(2025-01-10)),
            tx(2, TransactionKind::Expense, 200_000, date!(2025-01-20)),
            tx(3, TransactionKind::Income, 300_000, date!(2025-03-05)),
        ]])
        .into_connection();
    let app = test_app!(state(db));

    let req = test::TestRequest::get()
        .uri("/api/admin/transactions/summary?year=2025")
        .insert_header(("Authorization", bearer_for(5, Role::Viewer)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let data = read_success_data(resp, StatusCode::OK).await;

    assert_eq!(data["year"], 2025);
    assert_eq!(data["months"].as_array().map(Vec::len), Some(12));
    assert_eq!(
        data["months"][0],
        json!({ "month": 1, "income": 500000, "expense": 200000, "balance": 300000 })
    );
    assert_eq!(
        data["totals"],
        json!({ "income": 800000, "expense": 200000, "balance": 600000 })
    );
}

#[actix_web::test]
async fn viewer_cannot_record_a_transaction() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(5, Role::Viewer, true)]])
        .into_connection();
    let app = test_app!(state(db));

    let req = test::TestRequest::post()
        .uri("/api/admin/transactions")
        .insert_header(("Authorization", bearer_for(5, Role::Viewer)))
        .set_json(json!({
            "type": "INCOME",
            "category": "Infaq",
            "amount": 100000,
            "transactionDate": "2025-01-10"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_envelope(resp, StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).await;
}
