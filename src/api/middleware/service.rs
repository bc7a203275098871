//! Session Middleware Service
//!
//! Actix-web middleware that attaches the authenticated identity to each
//! request. It never short-circuits: authorization decisions belong to the
//! handlers, which is what lets the read endpoints stay anonymous.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, Ready};

use super::auth::{extract_session_token, SessionVerifier};

/// Middleware factory for session identity extraction
pub struct SessionMiddleware {
    verifier: SessionVerifier,
}

impl SessionMiddleware {
    pub fn new(verifier: SessionVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service,
            verifier: self.verifier.clone(),
        })
    }
}

/// The actual middleware service
pub struct SessionMiddlewareService<S> {
    service: S,
    verifier: SessionVerifier,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(
        &self,
        ctx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = extract_session_token(&req) {
            if let Some(user) = self.verifier.verify(&token) {
                req.extensions_mut().insert(user);
            }
        }

        self.service.call(req)
    }
}
