//! HTTP request handlers

pub mod billboards;
pub mod health;
pub mod images;

#[cfg(test)]
pub(crate) mod test_support;

use serde::Serialize;
use utoipa::ToSchema;

/// Error envelope returned by every endpoint
///
/// Downstream failure detail is logged server-side; the body stays generic.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        ErrorResponse {
            success: false,
            error: ApiError {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}
