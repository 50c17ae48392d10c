#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::{assert_error_envelope, read_envelope};
use common::state;
use masjid_backend::entities::donations::{self as donation_entity, DonationStatus};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use time::OffsetDateTime;

fn pending_donation(id: i64) -> donation_entity::Model {
    let now = OffsetDateTime::now_utc();
    donation_entity::Model {
        id,
        program_id: None,
        donor_name: "Hamba Allah".to_string(),
        donor_email: Some("donor@example.test".to_string()),
        donor_phone: Some("08123456789".to_string()),
        amount: 150_000,
        payment_method: "TRANSFER".to_string(),
        status: DonationStatus::Pending,
        is_anonymous: false,
        message: None,
        verified_by: None,
        verified_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[actix_web::test]
async fn public_donation_is_accepted_as_pending() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending_donation(12)]])
        .into_connection();
    let app = test_app!(state(db));

    let req = test::TestRequest::post()
        .uri("/api/donations")
        .set_json(json!({
            "donorName": "Hamba Allah",
            "donorEmail": "donor@example.test",
            "amount": 150000,
            "paymentMethod": "TRANSFER"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = read_envelope(resp, StatusCode::CREATED).await;

    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
    assert_eq!(body["data"]["id"], 12);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["amount"], 150000);
    assert!(body["data"].get("donorEmail").is_none());
}

#[actix_web::test]
async fn zero_amount_is_rejected_before_any_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = test_app!(state(db));

    let req = test::TestRequest::post()
        .uri("/api/donations")
        .set_json(json!({
            "donorName": "Hamba Allah",
            "amount": 0,
            "paymentMethod": "TRANSFER"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_envelope(resp, StatusCode::BAD_REQUEST, "Amount must be greater than zero").await;
}
