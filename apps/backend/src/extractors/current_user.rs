use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;

use crate::auth::claims::Role;
use crate::auth::gate::{authorize, AuthenticatedUser};
use crate::error::AppError;
use crate::state::app_state::AppState;

pub(crate) type GateFuture = Shared<LocalBoxFuture<'static, Result<AuthenticatedUser, AppError>>>;

/// The gate outcome for this request, left in the request extensions so a
/// body extractor can let an auth failure win over a malformed body.
#[derive(Clone)]
pub(crate) struct PendingGate(pub(crate) GateFuture);

/// Start the gate for `req` and register it as the request's [`PendingGate`].
///
/// The future owns only the state handle and the header value, never the
/// request itself, since it is stored inside that request.
pub(crate) fn start_gate(req: &HttpRequest, allowed_roles: &'static [Role]) -> GateFuture {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    // A header that isn't valid UTF-8 is just another malformed header.
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    let gate = async move {
        let state = state.ok_or_else(|| AppError::internal("AppState not available"))?;
        authorize(state.db(), &state.security, authorization.as_deref(), allowed_roles).await
    }
    .boxed_local()
    .shared();
    req.extensions_mut().insert(PendingGate(gate.clone()));
    gate
}

/// Any active account, whatever its role.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let gate = start_gate(req, &[]);
        Box::pin(async move { gate.await.map(CurrentUser) })
    }
}
