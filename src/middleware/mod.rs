//! HTTP middleware: bearer-token authentication.
//!
//! `JwtAuth` validates the `Authorization: Bearer` header on every request
//! in the scope it wraps and stashes the caller's id in the request
//! extensions; handlers receive it through the `UserId` extractor.
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::security::jwt::JwtKeys;

/// Authenticated caller id, inserted by `JwtAuth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

#[derive(Clone)]
pub struct JwtAuth {
    keys: Arc<JwtKeys>,
}

impl JwtAuth {
    pub fn new(keys: Arc<JwtKeys>) -> Self {
        Self { keys }
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
    type Transform = JwtAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    keys: Arc<JwtKeys>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            // Failures go through AppError so the 401 carries the same JSON
            // envelope as every handler error.
            let rejection = 'auth: {
                let Some(auth_header) = req
                    .headers()
                    .get("Authorization")
                    .and_then(|h| h.to_str().ok())
                else {
                    break 'auth AppError::Authentication(
                        "missing Authorization header".to_string(),
                    );
                };

                let Some(token) = auth_header.strip_prefix("Bearer ") else {
                    break 'auth AppError::Authentication(
                        "invalid Authorization scheme".to_string(),
                    );
                };

                let Ok(user_id) = keys.validate_access_token(token) else {
                    break 'auth AppError::Authentication(
                        "invalid or expired token".to_string(),
                    );
                };

                req.extensions_mut().insert(UserId(user_id));

                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            };

            let (req, _) = req.into_parts();
            let res = rejection.error_response().map_into_right_body();
            Ok(ServiceResponse::new(req, res))
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| {
                    AppError::Authentication("missing authenticated caller".to_string()).into()
                }),
        )
    }
}
