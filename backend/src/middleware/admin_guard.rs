//! Session guard for admin-only routes.
//!
//! [`RequireAdmin`] reads the admin id from the cookie session before the
//! handler runs. Without one the request is answered with
//! `303 See Other` to the login page and never reaches the handler. With one,
//! the id is placed in the request extensions where handlers pick it up
//! through the [`AuthenticatedAdmin`] extractor.
//!
//! Must be wrapped inside the session middleware.

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{AdminId, Error};
use crate::inbound::http::session::SessionContext;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Admin id established by [`RequireAdmin`] for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAdmin(pub AdminId);

impl AuthenticatedAdmin {
    pub fn id(self) -> AdminId {
        self.0
    }
}

impl FromRequest for AuthenticatedAdmin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Self>()
                .copied()
                .ok_or_else(|| Error::unauthorized("login required")),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    AllMethods,
    MutatingMethods,
}

impl Policy {
    fn guards(self, method: &Method) -> bool {
        match self {
            Self::AllMethods => true,
            Self::MutatingMethods => {
                !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
            }
        }
    }
}

/// Guard middleware factory.
///
/// # Examples
/// ```
/// use actix_web::{web, App, HttpResponse};
/// use anjoman::middleware::RequireAdmin;
///
/// let _app = App::new().service(
///     web::resource("/admin")
///         .wrap(RequireAdmin::all_methods())
///         .route(web::get().to(HttpResponse::Ok)),
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin {
    policy: Policy,
}

impl RequireAdmin {
    /// Guard every request.
    pub const fn all_methods() -> Self {
        Self {
            policy: Policy::AllMethods,
        }
    }

    /// Guard everything except `GET`, `HEAD` and `OPTIONS`.
    pub const fn mutating_methods() -> Self {
        Self {
            policy: Policy::MutatingMethods,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireAdminMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminMiddleware {
            service,
            policy: self.policy,
        }))
    }
}

/// Service produced by [`RequireAdmin`].
pub struct RequireAdminMiddleware<S> {
    service: S,
    policy: Policy,
}

fn session_admin(req: &ServiceRequest) -> Option<AdminId> {
    match SessionContext::new(req.get_session()).admin_id() {
        Ok(id) => id,
        Err(error) => {
            warn!(error = %error, "unreadable admin session; treating as logged out");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for RequireAdminMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.policy.guards(req.method()) {
            match session_admin(&req) {
                Some(admin_id) => {
                    req.extensions_mut().insert(AuthenticatedAdmin(admin_id));
                }
                None => {
                    debug!(method = %req.method(), path = req.path(), "redirecting to login");
                    let response = HttpResponse::SeeOther()
                        .insert_header((header::LOCATION, LOGIN_PATH))
                        .finish()
                        .map_into_right_body();
                    return Box::pin(ready(Ok(req.into_response(response))));
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
