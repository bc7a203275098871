//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    billboards::CreateBillboardRequest, health::HealthResponse, ApiError, ErrorResponse,
};
use crate::db::models::{Billboard, MutationCount};
use crate::storage::BlobDescriptor;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Admin API",
        version = "1.0.0",
        description = "Administrative API for e-commerce store billboards and image assets",
        contact(
            name = "API Support",
            email = "support@example.com"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "billboards", description = "Billboard management endpoints"),
        (name = "images", description = "Image blob upload and deletion endpoints")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::billboards::list_billboards,
        crate::api::handlers::billboards::create_billboard,
        crate::api::handlers::billboards::get_billboard,
        crate::api::handlers::billboards::patch_billboard,
        crate::api::handlers::billboards::delete_billboard,
        crate::api::handlers::images::upload_image,
        crate::api::handlers::images::delete_image,
    ),
    components(
        schemas(
            // System schemas
            HealthResponse,
            ErrorResponse,
            ApiError,
            // Billboard schemas
            Billboard,
            MutationCount,
            CreateBillboardRequest,
            // Image schemas
            BlobDescriptor,
        )
    )
)]
pub struct ApiDoc;
