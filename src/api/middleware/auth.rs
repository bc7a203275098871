//! Session Token Verification
//!
//! The identity provider issues HS256-signed session tokens; this module
//! verifies them locally and exposes the authenticated user id through
//! request extensions. An absent or invalid token leaves the request
//! anonymous instead of rejecting it: reads accept anonymous callers and
//! mutating handlers answer 401 themselves.

use actix_web::{dev::ServiceRequest, http::header::AUTHORIZATION, HttpMessage};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::warn;

use crate::config::AuthSettings;

/// Header name for the raw session token
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// Claims carried by a provider-issued session token
#[derive(Debug, Deserialize)]
pub struct SessionClaims {
    /// Provider-side user id
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iss: Option<String>,
}

/// Authenticated identity stored in request extensions
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
}

/// Verifies provider-issued session tokens
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        SessionVerifier {
            key: DecodingKey::from_secret(settings.session_secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token; `None` means the caller stays anonymous.
    pub fn verify(&self, token: &str) -> Option<SessionUser> {
        match decode::<SessionClaims>(token, &self.key, &self.validation) {
            Ok(data) => Some(SessionUser {
                user_id: data.claims.sub,
            }),
            Err(e) => {
                warn!(error = %e, "Session token rejected");
                None
            }
        }
    }
}

/// Extract the raw session token from request headers
pub fn extract_session_token(req: &ServiceRequest) -> Option<String> {
    // First try the dedicated header
    if let Some(token) = req.headers().get(SESSION_TOKEN_HEADER) {
        if let Ok(token_str) = token.to_str() {
            return Some(token_str.to_string());
        }
    }

    // Then try Authorization: Bearer <token>
    if let Some(auth) = req.headers().get(AUTHORIZATION) {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Trait for reading the authenticated identity off a request
pub trait SessionExt {
    fn session_user(&self) -> Option<SessionUser>;
}

impl<T: HttpMessage> SessionExt for T {
    fn session_user(&self) -> Option<SessionUser> {
        self.extensions().get::<SessionUser>().cloned()
    }
}
