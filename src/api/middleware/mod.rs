//! API Middleware Module
//!
//! Session identity extraction for the store admin API.

pub mod auth;
pub mod service;

pub use auth::{
    extract_session_token, SessionClaims, SessionExt, SessionUser, SessionVerifier,
    SESSION_TOKEN_HEADER,
};
pub use service::SessionMiddleware;
