use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::{debug, warn};

use super::current_user::PendingGate;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Field-level checks run after a body deserializes.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// JSON body extractor: malformed JSON and failed [`Validate`] checks both
/// come back as a 400 envelope instead of actix's plain-text error.
///
/// Declared after `Authorized`/`CurrentUser`, a body error is only reported
/// once the gate has passed; a 401/403 always wins over a 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        let gate = req.extensions().get::<PendingGate>().cloned();

        Box::pin(async move {
            match read_body::<T>(body).await {
                Ok(parsed) => Ok(ValidatedJson(parsed)),
                Err(body_err) => {
                    if let Some(PendingGate(gate)) = gate {
                        gate.await?;
                    }
                    Err(body_err)
                }
            }
        })
    }
}

async fn read_body<T>(body: <web::Bytes as FromRequest>::Future) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let trace_id = trace_ctx::trace_id();

    let body = body.await.map_err(|e| {
        warn!(trace_id = %trace_id, error = %e, "Failed to read request body");
        AppError::bad_request("Failed to read request body")
    })?;

    let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
        debug!(
            trace_id = %trace_id,
            error = %Redacted(&e.to_string()),
            body_size = body.len(),
            "JSON parsing failed"
        );
        AppError::bad_request(classify_json_error(&e))
    })?;

    parsed.validate()?;
    Ok(parsed)
}

/// Client-safe summary of a serde_json failure.
fn classify_json_error(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        Category::Data => "Invalid JSON: missing or wrong-typed fields".to_string(),
        Category::Io => "Invalid JSON: could not read body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use futures_util::FutureExt;
    use serde::Deserialize;

    use super::*;
    use crate::auth::claims::Role;
    use crate::auth::gate::AuthenticatedUser;

    #[derive(Debug, Deserialize)]
    struct Donation {
        amount: i64,
    }

    impl Validate for Donation {
        fn validate(&self) -> Result<(), AppError> {
            if self.amount <= 0 {
                return Err(AppError::invalid("Amount must be greater than zero"));
            }
            Ok(())
        }
    }

    async fn extract(body: &'static str) -> Result<ValidatedJson<Donation>, AppError> {
        let (req, mut payload) = TestRequest::post()
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_http_parts();
        ValidatedJson::<Donation>::from_request(&req, &mut payload).await
    }

    #[actix_web::test]
    async fn valid_body_passes() {
        let json = extract(r#"{"amount": 50000}"#).await.unwrap();
        assert_eq!(json.amount, 50000);
    }

    #[actix_web::test]
    async fn syntax_error_is_400() {
        let err = extract(r#"{"amount": }"#).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
        assert!(err.client_message().contains("Invalid JSON"));
    }

    #[actix_web::test]
    async fn wrong_type_is_400() {
        let err = extract(r#"{"amount": "lots"}"#).await.unwrap_err();
        assert!(err.client_message().contains("wrong-typed"));
    }

    #[actix_web::test]
    async fn validation_runs_after_parse() {
        let err = extract(r#"{"amount": 0}"#).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    fn gate_that_settles_late(outcome: Result<AuthenticatedUser, AppError>) -> PendingGate {
        PendingGate(
            async move {
                // Still pending when the body is already parsed.
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                outcome
            }
            .boxed_local()
            .shared(),
        )
    }

    async fn extract_behind_gate(
        body: &'static str,
        gate: PendingGate,
    ) -> Result<ValidatedJson<Donation>, AppError> {
        let (req, mut payload) = TestRequest::post()
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_http_parts();
        req.extensions_mut().insert(gate);
        ValidatedJson::<Donation>::from_request(&req, &mut payload).await
    }

    #[actix_web::test]
    async fn auth_failure_wins_over_malformed_body() {
        let gate = gate_that_settles_late(Err(AppError::unauthorized()));
        let err = extract_behind_gate(r#"{"amount": }"#, gate).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let gate = gate_that_settles_late(Err(AppError::forbidden()));
        let err = extract_behind_gate(r#"{"amount": 0}"#, gate).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[actix_web::test]
    async fn body_error_reported_once_gate_passes() {
        let user = AuthenticatedUser {
            id: 1,
            email: "takmir@masjid.test".into(),
            name: "Takmir".into(),
            role: Role::Admin,
        };
        let err = extract_behind_gate(r#"{"amount": }"#, gate_that_settles_late(Ok(user.clone())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let ok = extract_behind_gate(r#"{"amount": 5}"#, gate_that_settles_late(Ok(user)))
            .await
            .unwrap();
        assert_eq!(ok.amount, 5);
    }

    #[test]
    fn eof_is_classified() {
        let e = serde_json::from_str::<Donation>(r#"{"amount": 1"#).unwrap_err();
        assert!(classify_json_error(&e).contains("unexpected end"));
    }
}
