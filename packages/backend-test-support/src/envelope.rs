//! Response envelope assertions for backend integration tests.
//!
//! These helpers parse the wire shape directly instead of depending on the
//! backend's own envelope type, so a serialization regression in the backend
//! shows up here as a failing assertion.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde_json::Value;

/// Read a response body as JSON, asserting the status first.
pub async fn read_envelope(resp: ServiceResponse<BoxBody>, expected_status: StatusCode) -> Value {
    let status = resp.status();
    let body = actix_web::test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).expect("Response body should be valid UTF-8");

    assert_eq!(
        status, expected_status,
        "unexpected status {status}, body: {text}"
    );

    serde_json::from_str(&text).expect("Response body should be valid JSON")
}

/// Assert a failure envelope: `{success:false, error:<message>}` with no `data`,
/// and an `x-trace-id` header on the response.
pub async fn assert_error_envelope(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_error: &str,
) -> Value {
    assert!(
        resp.headers().get("x-trace-id").is_some(),
        "x-trace-id header should be present on error responses"
    );

    let json = read_envelope(resp, expected_status).await;

    assert_eq!(json["success"], Value::Bool(false));
    assert_eq!(json["error"], Value::String(expected_error.to_string()));
    assert!(
        json.get("data").is_none(),
        "error envelope must not carry data: {json}"
    );

    json
}

/// Assert a success envelope and return its `data` payload.
pub async fn read_success_data(resp: ServiceResponse<BoxBody>, expected_status: StatusCode) -> Value {
    let json = read_envelope(resp, expected_status).await;

    assert_eq!(json["success"], Value::Bool(true));
    assert!(
        json.get("error").is_none(),
        "success envelope must not carry error: {json}"
    );

    json.get("data").cloned().unwrap_or(Value::Null)
}
