//! Token authentication middleware for protecting API endpoints.
//!
//! The middleware reads the `Authorization` header, validates the token with
//! the application's [`TokenService`](wd_core::TokenService), asks the
//! session authority to accept the subject, and injects an [`AuthContext`]
//! into the request. Rejected requests get a plain-text `401` and never
//! reach the wrapped service.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::{ContentType, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::error;
use wd_core::{Payload, Principal, SubjectId};

use crate::app::AppState;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject resolved from the token
    pub subject_id: SubjectId,
    /// Validated token payload
    pub payload: Payload,
}

impl From<Principal> for AuthContext {
    fn from(principal: Principal) -> Self {
        Self {
            subject_id: principal.subject,
            payload: principal.payload,
        }
    }
}

/// Authentication middleware factory
///
/// Requires `web::Data<AppState>` to be registered on the app.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!(path = %req.path(), "authentication middleware mounted without application state");
                let response = HttpResponse::InternalServerError().finish();
                return Ok(req.into_response(response).map_into_right_body());
            };

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            match state.tokens.authorize_session(header, state.sessions.as_ref()) {
                Ok(principal) => {
                    req.extensions_mut().insert(AuthContext::from(principal));
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(reason) => {
                    state.api_logger.warning(
                        "Unauthorized request",
                        json!({
                            "method": req.method().as_str(),
                            "path": req.path(),
                            "reason": reason.error_code(),
                        }),
                    );

                    let response = HttpResponse::Unauthorized()
                        .content_type(ContentType::plaintext())
                        .body(reason.message());
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
