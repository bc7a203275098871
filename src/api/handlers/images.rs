//! Image upload and delete proxy endpoints
//!
//! Thin proxy in front of blob storage: POST forwards raw request bytes
//! under a collision-free key and returns the resulting descriptor, DELETE
//! removes a blob by its public URL. Both require a session identity; the
//! DELETE performs no ownership check on the URL.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{error, info};

use crate::api::middleware::SessionExt;
use crate::storage::BlobDescriptor;
use crate::AppState;

use super::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub url: Option<String>,
}

/// POST /api/images?filename=<name> - Upload raw bytes to blob storage
#[utoipa::path(
    post,
    path = "/api/images",
    tag = "images",
    params(
        ("filename" = String, Query, description = "Name of the uploaded file")
    ),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Descriptor of the stored blob", body = BlobDescriptor),
        (status = 400, description = "Missing filename or body", body = ErrorResponse),
        (status = 401, description = "No session identity", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let Some(user) = req.session_user() else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("unauthenticated", "Session token required"));
    };

    let Some(filename) = query.filename.as_deref().filter(|f| !f.is_empty()) else {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Filename is required"));
    };

    if body.is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Request body is required"));
    }

    if body.len() > state.settings.uploads.max_bytes {
        return HttpResponse::PayloadTooLarge().json(ErrorResponse::new(
            "payload_too_large",
            "Upload exceeds the size limit",
        ));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    match state.blob.put(filename, body, content_type).await {
        Ok(descriptor) => {
            info!(
                user_id = %user.user_id,
                pathname = %descriptor.pathname,
                size = descriptor.size,
                "Image uploaded"
            );
            HttpResponse::Ok().json(descriptor)
        }
        Err(e) => {
            error!(error = %e, filename = %filename, "Image upload failed");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"))
        }
    }
}

/// DELETE /api/images?url=<url> - Delete a blob by its public URL
#[utoipa::path(
    delete,
    path = "/api/images",
    tag = "images",
    params(
        ("url" = String, Query, description = "Public URL of the blob to delete")
    ),
    responses(
        (status = 200, description = "Blob deleted"),
        (status = 400, description = "Missing url parameter", body = ErrorResponse),
        (status = 401, description = "No session identity", body = ErrorResponse),
        (status = 500, description = "Deletion failed", body = ErrorResponse)
    )
)]
pub async fn delete_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> HttpResponse {
    let Some(user) = req.session_user() else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("unauthenticated", "Session token required"));
    };

    let Some(url) = query.url.as_deref().filter(|u| !u.is_empty()) else {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Url is required"));
    };

    match state.blob.delete(url).await {
        Ok(()) => {
            info!(user_id = %user.user_id, url = %url, "Image deleted");
            HttpResponse::Ok().finish()
        }
        Err(e) => {
            error!(error = %e, url = %url, "Image deletion failed");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"))
        }
    }
}
