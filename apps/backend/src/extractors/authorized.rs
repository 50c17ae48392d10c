use std::future::Future;
use std::marker::PhantomData;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::current_user::start_gate;
use crate::auth::gate::AuthenticatedUser;
use crate::auth::permissions::RoutePermission;
use crate::error::AppError;

/// An active account whose current role holds permission `P`.
///
/// ```ignore
/// async fn delete_user(user: Authorized<ManageUsers>, ...) -> Result<HttpResponse, AppError>
/// ```
pub struct Authorized<P> {
    user: AuthenticatedUser,
    _permission: PhantomData<P>,
}

impl<P> Authorized<P> {
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    pub fn into_inner(self) -> AuthenticatedUser {
        self.user
    }
}

impl<P> Deref for Authorized<P> {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<P> std::fmt::Debug for Authorized<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized").field("user", &self.user).finish()
    }
}

impl<P: RoutePermission + 'static> FromRequest for Authorized<P> {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let gate = start_gate(req, P::PERMISSION.allowed_roles());
        Box::pin(async move {
            let user = gate.await?;
            Ok(Authorized {
                user,
                _permission: PhantomData,
            })
        })
    }
}
