//! Bearer token verification middleware for protected routes.
//!
//! Each request ends either admitted, with an `AuthContext` stored in the
//! request extensions, or rejected with the uniform 401 body. Handlers
//! behind this middleware read the identity through the `AuthContext`
//! extractor and never look at the token themselves.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use sh_core::domain::entities::{AuthenticatedIdentity, Role};
use sh_core::errors::TokenError;
use sh_core::repositories::RevocationRepository;
use sh_core::services::TokenService;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::{debug, warn};

use crate::handlers::error::ApiError;

/// Verified identity attached to an admitted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject_id: String,
    pub role: Role,
}

impl From<AuthenticatedIdentity> for AuthContext {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            subject_id: identity.subject_id,
            role: identity.role,
        }
    }
}

/// Verification step run by the middleware
///
/// Object-safe so the middleware does not carry the repository type.
#[async_trait]
pub trait RequestVerifier: Send + Sync {
    async fn verify(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, TokenError>;
}

#[async_trait]
impl<R> RequestVerifier for TokenService<R>
where
    R: RevocationRepository + ?Sized + 'static,
{
    async fn verify(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, TokenError> {
        TokenService::verify(self, token).await
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    verifier: Arc<dyn RequestVerifier>,
}

impl JwtAuth {
    pub fn new(verifier: Arc<dyn RequestVerifier>) -> Self {
        Self { verifier }
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
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn RequestVerifier>,
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

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let token = extract_bearer_token(req.headers());

            match verifier.verify(token.as_deref()).await {
                Ok(identity) => {
                    debug!(
                        subject_id = %identity.subject_id,
                        role = %identity.role,
                        path = %req.path(),
                        "Request admitted"
                    );
                    req.extensions_mut().insert(AuthContext::from(identity));

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(reason) => {
                    warn!(
                        reason = reason.reason_code(),
                        path = %req.path(),
                        "Request rejected"
                    );
                    let response = ApiError::Unauthorized(reason).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts the Bearer token from the Authorization header
///
/// Returns `None` for a missing header, a non-Bearer scheme or an empty
/// credential.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, credential) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then(|| credential.to_string())
}

/// Extractor for the identity admitted by `JwtAuth`
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(TokenError::MissingToken).into());

        ready(result)
    }
}
