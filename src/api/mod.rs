//! API module - HTTP routes and handlers

pub mod handlers;
pub mod openapi;
pub mod sessions;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;

pub use sessions::SessionStore;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/packing-lists", web::post().to(handlers::packing::create_packing_list))
            .route("/theme-cards", web::post().to(handlers::theme::create_theme_card))
            .service(
                web::scope("/sheets")
                    // More specific routes first
                    .route("/alignment-test", web::post().to(handlers::sheets::alignment_test))
                    .route("", web::post().to(handlers::sheets::create_sheet))
                    .route("/{id}", web::get().to(handlers::sheets::get_sheet))
                    .route("/{id}", web::delete().to(handlers::sheets::delete_sheet))
                    .route("/{id}/slots", web::post().to(handlers::sheets::add_slot))
                    .route("/{id}/slots", web::delete().to(handlers::sheets::clear_slots))
                    .route("/{id}/slots/{slot_id}", web::delete().to(handlers::sheets::remove_slot))
                    .route("/{id}/moves", web::post().to(handlers::sheets::move_card))
                    .route("/{id}/detach", web::post().to(handlers::sheets::detach_card))
                    .route("/{id}/pdf", web::post().to(handlers::sheets::render_sheet))
            )
    )
    .route("/health", web::get().to(handlers::health::health_check))
    // Swagger UI and OpenAPI spec
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", ApiDoc::openapi())
    );
}
