//! Theme card endpoint

use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::AppState;
use crate::domain::ManaColor;
use crate::engine::renderer::replay_crop;
use crate::engine::{png_file_name, CropOp, CropRect, ImageSource, RenderError, THEME_CARD_STEM};
use super::{error_response, Dimensions, ErrorResponse};

/// Size of the crop viewport the operations were recorded in
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Request body for a theme card
#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeCardRequest {
    pub image: ImageSource,
    /// Defaults to the 745 x 1040 card canvas
    #[serde(default)]
    pub viewport: Option<Viewport>,
    /// Interactions replayed in order onto the initial cover crop
    #[serde(default)]
    pub crop_ops: Vec<CropOp>,
    #[serde(default)]
    pub colors: Vec<ManaColor>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for a rendered theme card
#[derive(Serialize, ToSchema)]
pub struct ThemeCardResponse {
    pub success: bool,
    pub image_url: String,
    /// Suggested download name, e.g. `elves-theme-card.png`
    pub file_name: String,
    /// Region of the source photo that fills the card
    pub crop: CropRect,
    pub dimensions: Dimensions,
    pub generation_time_ms: u64,
}

fn render_error_response(e: &RenderError) -> HttpResponse {
    let (status, code) = match e {
        RenderError::Base64(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE_DATA"),
        RenderError::Crop(_) => (StatusCode::BAD_REQUEST, "INVALID_CROP"),
        RenderError::FetchFailed(_) | RenderError::Http(_) => (StatusCode::UNPROCESSABLE_ENTITY, "IMAGE_FETCH_FAILED"),
        RenderError::Image(_) => (StatusCode::UNPROCESSABLE_ENTITY, "IMAGE_DECODE_FAILED"),
    };
    error_response(status, code, e.to_string())
}

/// POST /api/v1/theme-cards - Render a theme card
#[utoipa::path(
    post,
    path = "/api/v1/theme-cards",
    tag = "cards",
    request_body = ThemeCardRequest,
    responses(
        (status = 200, description = "Theme card rendered", body = ThemeCardResponse),
        (status = 400, description = "Invalid image data or crop", body = ErrorResponse),
        (status = 422, description = "Source image could not be loaded", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_theme_card(
    state: web::Data<AppState>,
    body: web::Json<ThemeCardRequest>,
) -> HttpResponse {
    let start = Instant::now();
    let request = body.into_inner();

    info!(
        name = request.name.as_deref().unwrap_or(""),
        colors = request.colors.len(),
        crop_ops = request.crop_ops.len(),
        "Processing theme card request"
    );

    let source = match state.renderer.load_source(&request.image).await {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, "Theme card source image unavailable");
            return render_error_response(&e);
        }
    };

    let viewport = request.viewport.map(|v| (v.width, v.height));
    let crop = match replay_crop(source.dimensions(), viewport, &request.crop_ops) {
        Ok(crop) => crop,
        Err(e) => return render_error_response(&e),
    };

    match state
        .renderer
        .theme_card(&source, crop, &request.colors, request.name.as_deref())
        .await
    {
        Ok(image) => HttpResponse::Ok().json(ThemeCardResponse {
            success: true,
            image_url: image.url,
            file_name: png_file_name(request.name.as_deref(), THEME_CARD_STEM),
            crop,
            dimensions: Dimensions {
                width: image.width,
                height: image.height,
            },
            generation_time_ms: start.elapsed().as_millis() as u64,
        }),
        Err(e) => {
            error!(error = %e, "Theme card rendering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED", e.to_string())
        }
    }
}
