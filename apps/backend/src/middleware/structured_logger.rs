use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;

/// One `request_completed` event per request; level follows the status class.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req.extensions().get::<TraceId>().map(|t| t.0.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // Matched pattern once routing has run, so slugs and ids stay out of the log.
            let (status, route) = match &result {
                Ok(res) => (res.status(), res.request().match_pattern().unwrap_or(path)),
                Err(err) => (err.as_response_error().status_code(), path),
            };

            Completed {
                method,
                route,
                status,
                duration_ms: start.elapsed().as_millis() as u64,
                trace_id: trace_id.unwrap_or_else(|| "unknown".to_string()),
            }
            .log();

            result
        })
    }
}

struct Completed {
    method: String,
    route: String,
    status: StatusCode,
    duration_ms: u64,
    trace_id: String,
}

impl Completed {
    fn log(&self) {
        macro_rules! completed {
            ($level:ident) => {
                $level!(
                    http.method = %self.method,
                    http.route = %self.route,
                    http.status_code = self.status.as_u16(),
                    duration_ms = self.duration_ms,
                    trace_id = %self.trace_id,
                    "request_completed"
                )
            };
        }

        if self.status.is_server_error() {
            completed!(error);
        } else if self.status.is_client_error() {
            completed!(warn);
        } else {
            completed!(info);
        }
    }
}
