//! API module - HTTP routes and handlers

pub mod handlers;
pub mod middleware;
pub mod openapi;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // More specific routes first: /api/images must not be captured
            // by the {store_id} scope below
            .service(
                web::scope("/images")
                    .route("", web::post().to(handlers::images::upload_image))
                    .route("", web::delete().to(handlers::images::delete_image)),
            )
            .service(
                web::scope("/{store_id}/billboards")
                    .route("", web::get().to(handlers::billboards::list_billboards))
                    .route("", web::post().to(handlers::billboards::create_billboard))
                    .route("/{billboard_id}", web::get().to(handlers::billboards::get_billboard))
                    .route("/{billboard_id}", web::patch().to(handlers::billboards::patch_billboard))
                    .route("/{billboard_id}", web::delete().to(handlers::billboards::delete_billboard)),
            ),
    )
    .route("/health", web::get().to(handlers::health::health_check))
    // Swagger UI and OpenAPI spec
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
