//! Billboard route handlers
//!
//! CRUD for a store's promotional billboards. Reads are anonymous; mutations
//! require a session identity that owns the store. Image bytes live in blob
//! storage and the record only carries the public URL: replacing an image
//! uploads the new blob, commits the record, then clears the old blob.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::middleware::SessionExt;
use crate::db::models::{Billboard, MutationCount};
use crate::AppState;

use super::ErrorResponse;

/// JSON body for billboard creation
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillboardRequest {
    pub label: String,
    pub image_url: String,
}

/// One file part of a multipart form
#[derive(Debug)]
struct UploadPart {
    filename: String,
    content_type: String,
    data: Bytes,
}

/// Parsed PATCH form: label plus either a URL passthrough or file bytes
#[derive(Debug, Default)]
struct BillboardForm {
    label: Option<String>,
    image_url: Option<String>,
    image_file: Option<UploadPart>,
}

enum ImageSource {
    Url(String),
    File(UploadPart),
}

enum FormError {
    TooLarge,
    Malformed(String),
}

async fn read_field_bytes(
    field: &mut actix_multipart::Field,
    max_bytes: usize,
) -> Result<Bytes, FormError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| FormError::Malformed(e.to_string()))?
    {
        if buf.len() + chunk.len() > max_bytes {
            return Err(FormError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

async fn read_text_field(
    field: &mut actix_multipart::Field,
    max_bytes: usize,
) -> Result<String, FormError> {
    let bytes = read_field_bytes(field, max_bytes).await?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| FormError::Malformed("Field is not valid UTF-8".to_string()))
}

async fn read_billboard_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<BillboardForm, FormError> {
    let mut form = BillboardForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| FormError::Malformed(e.to_string()))?
    {
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or("")
            .to_string();

        match name.as_str() {
            "label" => form.label = Some(read_text_field(&mut field, max_bytes).await?),
            "imageUrl" => form.image_url = Some(read_text_field(&mut field, max_bytes).await?),
            "imageFile" => {
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .unwrap_or("upload.bin")
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = read_field_bytes(&mut field, max_bytes).await?;
                form.image_file = Some(UploadPart {
                    filename,
                    content_type,
                    data,
                });
            }
            _ => {
                // Unknown fields are drained and ignored
                read_field_bytes(&mut field, max_bytes).await?;
            }
        }
    }

    Ok(form)
}

/// Confirms the session user owns the store before a mutation proceeds.
///
/// `Err` carries the response to send: 403 when the store is absent or owned
/// by someone else, 500 when the lookup itself fails.
async fn ensure_store_owner(
    state: &AppState,
    store_id: &str,
    user_id: &str,
) -> Result<(), HttpResponse> {
    match state.stores.find_for_user(store_id, user_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::Forbidden().json(ErrorResponse::new(
            "forbidden",
            "Store does not belong to the authenticated user",
        ))),
        Err(e) => {
            error!(error = %e, store_id = %store_id, "Store ownership lookup failed");
            Err(HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error")))
        }
    }
}

/// GET /api/{store_id}/billboards - List billboards of a store
#[utoipa::path(
    get,
    path = "/api/{store_id}/billboards",
    tag = "billboards",
    params(
        ("store_id" = String, Path, description = "Store identifier")
    ),
    responses(
        (status = 200, description = "Billboards of the store, newest first", body = [Billboard]),
        (status = 500, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn list_billboards(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let store_id = path.into_inner();

    match state.billboards.list_for_store(&store_id).await {
        Ok(billboards) => HttpResponse::Ok().json(billboards),
        Err(e) => {
            error!(error = %e, store_id = %store_id, "Failed to list billboards");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"))
        }
    }
}

/// POST /api/{store_id}/billboards - Create a billboard
#[utoipa::path(
    post,
    path = "/api/{store_id}/billboards",
    tag = "billboards",
    params(
        ("store_id" = String, Path, description = "Store identifier")
    ),
    request_body = CreateBillboardRequest,
    responses(
        (status = 201, description = "Billboard created", body = Billboard),
        (status = 400, description = "Missing label or image URL", body = ErrorResponse),
        (status = 401, description = "No session identity", body = ErrorResponse),
        (status = 403, description = "Store owned by another user", body = ErrorResponse),
        (status = 500, description = "Creation failed", body = ErrorResponse)
    )
)]
pub async fn create_billboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateBillboardRequest>,
) -> HttpResponse {
    let store_id = path.into_inner();

    let Some(user) = req.session_user() else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("unauthenticated", "Session token required"));
    };

    if body.label.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Label is required"));
    }

    if body.image_url.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Image URL is required"));
    }

    if let Err(response) = ensure_store_owner(&state, &store_id, &user.user_id).await {
        return response;
    }

    match state
        .billboards
        .create(&store_id, body.label.trim(), body.image_url.trim())
        .await
    {
        Ok(billboard) => HttpResponse::Created().json(billboard),
        Err(e) => {
            error!(error = %e, store_id = %store_id, "Failed to create billboard");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"))
        }
    }
}

/// GET /api/{store_id}/billboards/{billboard_id} - Fetch one billboard
///
/// Anonymous read. Answers JSON `null` when the billboard does not exist
/// within the store.
#[utoipa::path(
    get,
    path = "/api/{store_id}/billboards/{billboard_id}",
    tag = "billboards",
    params(
        ("store_id" = String, Path, description = "Store identifier"),
        ("billboard_id" = String, Path, description = "Billboard identifier")
    ),
    responses(
        (status = 200, description = "The billboard, or null when absent", body = Billboard),
        (status = 400, description = "Missing billboard id", body = ErrorResponse),
        (status = 500, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn get_billboard(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (store_id, billboard_id) = path.into_inner();

    if billboard_id.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Billboard id is required"));
    }

    match state.billboards.find_in_store(&billboard_id, &store_id).await {
        Ok(billboard) => HttpResponse::Ok().json(billboard),
        Err(e) => {
            error!(error = %e, billboard_id = %billboard_id, "Failed to fetch billboard");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"))
        }
    }
}

/// PATCH /api/{store_id}/billboards/{billboard_id} - Update label and image
///
/// Multipart form: `label` plus either `imageUrl` (existing URL passthrough)
/// or `imageFile` (binary upload). The passthrough path never touches blob
/// storage. The binary path uploads the new blob first; the replaced blob is
/// deleted only after the record commit, best-effort.
#[utoipa::path(
    patch,
    path = "/api/{store_id}/billboards/{billboard_id}",
    tag = "billboards",
    params(
        ("store_id" = String, Path, description = "Store identifier"),
        ("billboard_id" = String, Path, description = "Billboard identifier")
    ),
    responses(
        (status = 200, description = "Affected row count", body = MutationCount),
        (status = 400, description = "Missing label or image", body = ErrorResponse),
        (status = 401, description = "No session identity", body = ErrorResponse),
        (status = 403, description = "Store owned by another user", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Update failed", body = ErrorResponse)
    )
)]
pub async fn patch_billboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: Multipart,
) -> HttpResponse {
    let (store_id, billboard_id) = path.into_inner();

    let Some(user) = req.session_user() else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("unauthenticated", "Session token required"));
    };

    let form = match read_billboard_form(payload, state.settings.uploads.max_bytes).await {
        Ok(form) => form,
        Err(FormError::TooLarge) => {
            return HttpResponse::PayloadTooLarge().json(ErrorResponse::new(
                "payload_too_large",
                "Upload exceeds the size limit",
            ));
        }
        Err(FormError::Malformed(detail)) => {
            warn!(detail = %detail, "Rejected malformed multipart form");
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("validation", "Malformed form payload"));
        }
    };

    let label = match form.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => label.to_string(),
        None => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("validation", "Label is required"));
        }
    };

    let source = if let Some(url) = form.image_url.filter(|u| !u.is_empty()) {
        ImageSource::Url(url)
    } else if let Some(part) = form.image_file {
        ImageSource::File(part)
    } else {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Image is required"));
    };

    if billboard_id.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Billboard id is required"));
    }

    if let Err(response) = ensure_store_owner(&state, &store_id, &user.user_id).await {
        return response;
    }

    match source {
        // The image already lives in blob storage; only the record changes
        ImageSource::Url(image_url) => {
            match state.billboards.update(&billboard_id, &label, &image_url).await {
                Ok(count) => {
                    info!(billboard_id = %billboard_id, count = count, "Billboard updated");
                    HttpResponse::Ok().json(MutationCount { count })
                }
                Err(e) => {
                    error!(error = %e, billboard_id = %billboard_id, "Failed to update billboard");
                    HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("internal_error", "Internal error"))
                }
            }
        }
        ImageSource::File(part) => {
            let uploaded = match state
                .blob
                .put(&part.filename, part.data, &part.content_type)
                .await
            {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    error!(error = %e, billboard_id = %billboard_id, "Image upload failed");
                    return HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("internal_error", "Internal error"));
                }
            };

            let previous = match state.billboards.image_url(&billboard_id).await {
                Ok(url) => url,
                Err(e) => {
                    error!(error = %e, billboard_id = %billboard_id, "Failed to read current image URL");
                    return HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("internal_error", "Internal error"));
                }
            };

            let count = match state
                .billboards
                .update(&billboard_id, &label, &uploaded.url)
                .await
            {
                Ok(count) => count,
                Err(e) => {
                    error!(error = %e, billboard_id = %billboard_id, "Failed to update billboard");
                    return HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("internal_error", "Internal error"));
                }
            };

            // The replaced blob goes away only after the record commit
            if let Some(old) = previous.filter(|u| !u.is_empty() && *u != uploaded.url) {
                if let Err(e) = state.blob.delete(&old).await {
                    warn!(error = %e, url = %old, "Failed to delete replaced image blob");
                }
            }

            info!(billboard_id = %billboard_id, count = count, "Billboard image replaced");
            HttpResponse::Ok().json(MutationCount { count })
        }
    }
}

/// DELETE /api/{store_id}/billboards/{billboard_id} - Delete a billboard
///
/// The record goes first; its blob is deleted afterwards, best-effort. A
/// blob store failure leaves at worst an orphaned object, never a record
/// pointing at nothing.
#[utoipa::path(
    delete,
    path = "/api/{store_id}/billboards/{billboard_id}",
    tag = "billboards",
    params(
        ("store_id" = String, Path, description = "Store identifier"),
        ("billboard_id" = String, Path, description = "Billboard identifier")
    ),
    responses(
        (status = 200, description = "Affected row count", body = MutationCount),
        (status = 400, description = "Missing store or billboard id", body = ErrorResponse),
        (status = 401, description = "No session identity", body = ErrorResponse),
        (status = 403, description = "Store owned by another user", body = ErrorResponse),
        (status = 500, description = "Deletion failed", body = ErrorResponse)
    )
)]
pub async fn delete_billboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (store_id, billboard_id) = path.into_inner();

    let Some(user) = req.session_user() else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("unauthenticated", "Session token required"));
    };

    if store_id.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Store id is required"));
    }

    if billboard_id.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation", "Billboard id is required"));
    }

    if let Err(response) = ensure_store_owner(&state, &store_id, &user.user_id).await {
        return response;
    }

    let previous = match state.billboards.image_url(&billboard_id).await {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, billboard_id = %billboard_id, "Failed to read current image URL");
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"));
        }
    };

    let count = match state.billboards.delete(&billboard_id).await {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, billboard_id = %billboard_id, "Failed to delete billboard");
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Internal error"));
        }
    };

    if let Some(old) = previous.filter(|u| !u.is_empty()) {
        if let Err(e) = state.blob.delete(&old).await {
            warn!(error = %e, url = %old, "Failed to delete billboard image blob");
        }
    }

    info!(billboard_id = %billboard_id, count = count, "Billboard deleted");
    HttpResponse::Ok().json(MutationCount { count })
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;
    use actix_web::{test, App};
    use serde_json::Value;

    use super::super::test_support::*;
    use crate::api::middleware::{SessionMiddleware, SessionVerifier};

    macro_rules! init_app {
        ($ctx:expr) => {
            test::init_service(
                App::new()
                    .app_data($ctx.state.clone())
                    .wrap(SessionMiddleware::new(SessionVerifier::new(
                        &$ctx.state.settings.auth,
                    )))
                    .configure(crate::api::configure_routes),
            )
            .await
        };
    }

    fn patch_form(label: Option<&str>, image_url: Option<&str>) -> Vec<u8> {
        let mut parts = Vec::new();
        if let Some(label) = label {
            parts.push(text_part("label", label));
        }
        if let Some(url) = image_url {
            parts.push(text_part("imageUrl", url));
        }
        multipart_body(parts)
    }

    fn multipart_content_type() -> (header::HeaderName, String) {
        (
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
    }

    fn bearer(user_id: &str) -> (header::HeaderName, String) {
        (
            header::AUTHORIZATION,
            format!("Bearer {}", session_token(user_id)),
        )
    }

    #[actix_web::test]
    async fn get_billboard_is_scoped_to_store() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/s1/billboards/b1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["label"], "Old");

        // Same billboard id under a different store resolves to null
        let req = test::TestRequest::get()
            .uri("/api/s2/billboards/b1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn get_rejects_blank_billboard_id() {
        let ctx = test_state(vec![store("s1", "u1")], vec![]);
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/s1/billboards/%20")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn patch_requires_session() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .set_payload(patch_form(Some("Summer Sale"), Some("https://x/new.png")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(ctx.billboards.rows()[0].label, "Old");
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn patch_requires_label_and_image() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(patch_form(None, Some("https://x/new.png")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(patch_form(Some("Summer Sale"), None))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // Nothing changed, nothing touched blob storage
        assert_eq!(ctx.billboards.rows()[0].label, "Old");
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn patch_by_non_owner_is_forbidden() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u2"))
            .set_payload(patch_form(Some("Summer Sale"), Some("https://x/new.png")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 403);
        assert_eq!(ctx.billboards.rows()[0].label, "Old");
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn patch_with_url_passthrough_skips_blob_storage() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/stale.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(patch_form(Some("Summer Sale"), Some("https://x/old.png")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        let rows = ctx.billboards.rows();
        assert_eq!(rows[0].label, "Summer Sale");
        assert_eq!(rows[0].image_url, "https://x/old.png");
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn patch_with_file_uploads_then_commits_then_deletes_old() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let body = multipart_body(vec![
            text_part("label", "Summer Sale"),
            file_part("imageFile", "sale.png", "image/png", b"png-bytes"),
        ]);
        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(body)
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["count"], 1);
        assert_eq!(
            ctx.blob.calls(),
            vec![
                BlobCall::Put("sale.png".to_string()),
                BlobCall::Delete("https://x/old.png".to_string()),
            ]
        );
        let rows = ctx.billboards.rows();
        assert_eq!(rows[0].label, "Summer Sale");
        assert_eq!(rows[0].image_url, "https://blobs.test/sale.png");
    }

    #[actix_web::test]
    async fn patch_with_file_and_no_prior_image_skips_delete() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "")],
        );
        let app = init_app!(ctx);

        let body = multipart_body(vec![
            text_part("label", "Summer Sale"),
            file_part("imageFile", "sale.png", "image/png", b"png-bytes"),
        ]);
        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(ctx.blob.calls(), vec![BlobCall::Put("sale.png".to_string())]);
    }

    #[actix_web::test]
    async fn patch_rejects_oversized_file() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let oversized = vec![0u8; ctx.state.settings.uploads.max_bytes + 1];
        let body = multipart_body(vec![
            text_part("label", "Summer Sale"),
            file_part("imageFile", "sale.png", "image/png", &oversized),
        ]);
        let req = test::TestRequest::patch()
            .uri("/api/s1/billboards/b1")
            .insert_header(multipart_content_type())
            .insert_header(bearer("u1"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 413);
        assert!(ctx.blob.calls().is_empty());
        assert_eq!(ctx.billboards.rows()[0].label, "Old");
    }

    #[actix_web::test]
    async fn delete_removes_row_then_blob() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::delete()
            .uri("/api/s1/billboards/b1")
            .insert_header(bearer("u1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        assert!(ctx.billboards.rows().is_empty());
        assert_eq!(
            ctx.blob.calls(),
            vec![BlobCall::Delete("https://x/old.png".to_string())]
        );
    }

    #[actix_web::test]
    async fn delete_without_stored_image_skips_blob() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::delete()
            .uri("/api/s1/billboards/b1")
            .insert_header(bearer("u1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        assert!(ctx.billboards.rows().is_empty());
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn delete_by_non_owner_is_forbidden() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![billboard("b1", "s1", "Old", "https://x/old.png")],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::delete()
            .uri("/api/s1/billboards/b1")
            .insert_header(bearer("u2"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 403);
        assert_eq!(ctx.billboards.rows().len(), 1);
        assert!(ctx.blob.calls().is_empty());
    }

    #[actix_web::test]
    async fn create_billboard_inserts_record() {
        let ctx = test_state(vec![store("s1", "u1")], vec![]);
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/s1/billboards")
            .insert_header(bearer("u1"))
            .set_json(serde_json::json!({
                "label": "Summer Sale",
                "imageUrl": "https://x/new.png"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let rows = ctx.billboards.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Summer Sale");
        assert_eq!(rows[0].store_id, "s1");
    }

    #[actix_web::test]
    async fn create_requires_session() {
        let ctx = test_state(vec![store("s1", "u1")], vec![]);
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/s1/billboards")
            .set_json(serde_json::json!({
                "label": "Summer Sale",
                "imageUrl": "https://x/new.png"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert!(ctx.billboards.rows().is_empty());
    }

    #[actix_web::test]
    async fn list_returns_store_billboards_only() {
        let ctx = test_state(
            vec![store("s1", "u1")],
            vec![
                billboard("b1", "s1", "One", "https://x/1.png"),
                billboard("b2", "s2", "Two", "https://x/2.png"),
            ],
        );
        let app = init_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/s1/billboards")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "b1");
    }
}
