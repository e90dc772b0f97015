//! Session authentication middleware for protecting API endpoints.
//!
//! `SessionAuth` locates a session token (Authorization header first, then
//! the session cookie), decodes it through the session token codec, and
//! injects the recovered identity into the request extensions. `RequireRole`
//! is the optional second gate that rejects authenticated identities whose
//! role is not allowed.

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorUnauthorized},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use uuid::Uuid;

use th_core::domain::entities::account::Role;
use th_core::domain::entities::session::SessionClaims;
use th_core::services::session::SessionTokenCodec;

/// Authenticated identity injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account ID recovered from the session token
    pub account_id: Uuid,
    /// Email recovered from the session token
    pub email: String,
    /// Role recovered from the session token
    pub role: Role,
}

impl AuthContext {
    /// Creates an authentication context from decoded claims
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            account_id: claims.account_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = req.extensions().get::<AuthContext>().cloned();
        ready(context.ok_or_else(|| ErrorUnauthorized("Not authorized, no token")))
    }
}

/// Session authentication middleware factory
pub struct SessionAuth {
    codec: Arc<SessionTokenCodec>,
    session_cookie_name: String,
}

impl SessionAuth {
    /// Creates a session authentication middleware
    pub fn new(codec: Arc<SessionTokenCodec>, session_cookie_name: impl Into<String>) -> Self {
        Self {
            codec,
            session_cookie_name: session_cookie_name.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
            session_cookie_name: self.session_cookie_name.clone(),
        }))
    }
}

/// Session authentication middleware service
pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<SessionTokenCodec>,
    session_cookie_name: String,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = self.codec.clone();
        let cookie_name = self.session_cookie_name.clone();

        Box::pin(async move {
            // Header first, then the session cookie
            let token = extract_bearer_token(&req).or_else(|| {
                req.request()
                    .cookie(&cookie_name)
                    .map(|c| c.value().to_string())
            });

            let token = match token {
                Some(token) => token,
                None => return Err(ErrorUnauthorized("Not authorized, no token")),
            };

            // Tampered and expired both land here; the response does not say which
            let claims = match codec.decode(&token) {
                Ok(claims) => claims,
                Err(_) => return Err(ErrorUnauthorized("Not authorized, token failed")),
            };

            req.extensions_mut().insert(AuthContext::from_claims(claims));

            service.call(req).await
        })
    }
}

/// Extracts a Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Role-authorization middleware factory.
///
/// Runs after `SessionAuth`; a request whose attached identity is missing
/// counts as unauthenticated, one whose role is not allowed is forbidden.
pub struct RequireRole {
    allowed: Rc<Vec<Role>>,
}

impl RequireRole {
    /// Allow only the given roles
    pub fn new(allowed: Vec<Role>) -> Self {
        Self {
            allowed: Rc::new(allowed),
        }
    }

    /// Allow administrators only
    pub fn administrator() -> Self {
        Self::new(vec![Role::Administrator])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

/// Role-authorization middleware service
pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let role = req.extensions().get::<AuthContext>().map(|ctx| ctx.role);

            match role {
                None => Err(ErrorUnauthorized("Not authorized, no token")),
                Some(role) if !allowed.contains(&role) => Err(ErrorForbidden(
                    "Forbidden: you do not have the required role",
                )),
                Some(_) => service.call(req).await,
            }
        })
    }
}
