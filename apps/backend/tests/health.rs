#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::envelope::read_success_data;
use common::state;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

#[actix_web::test]
async fn health_reports_unreachable_database_without_failing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".into())])
        .into_connection();
    let app = test_app!(state(db));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let data = read_success_data(resp, StatusCode::OK).await;

    assert_eq!(data["db"], "error");
    assert_eq!(data["appVersion"], env!("CARGO_PKG_VERSION"));
    assert!(data["time"].is_string());
}
