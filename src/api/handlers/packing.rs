//! Packing list endpoint

use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::AppState;
use crate::domain::Card;
use crate::engine::{png_file_name, PackingOptions, PACKING_LIST_STEM};
use super::{error_response, Dimensions, ErrorResponse};

/// Request body for a packing list
#[derive(Debug, Deserialize, ToSchema)]
pub struct PackingListRequest {
    /// Deck name shown at the top
    #[serde(default)]
    pub title: String,
    /// Consolidated decklist, one entry per card name
    pub cards: Vec<Card>,
    #[serde(default = "default_show_title")]
    pub show_title: bool,
}

fn default_show_title() -> bool { true }

/// Response for a rendered packing list
#[derive(Serialize, ToSchema)]
pub struct PackingListResponse {
    pub success: bool,
    /// PNG as a data URL
    pub image_url: String,
    /// Suggested download name, e.g. `elves-packing-list.png`
    pub file_name: String,
    /// Some cards did not fit and were left off
    pub overflow: bool,
    /// Chosen scale step, 0 (1.0x) to 10 (2.0x)
    pub size_offset: u32,
    pub scale: f32,
    pub groups: usize,
    pub dimensions: Dimensions,
    pub generation_time_ms: u64,
}

/// POST /api/v1/packing-lists - Render a packing list card
#[utoipa::path(
    post,
    path = "/api/v1/packing-lists",
    tag = "cards",
    request_body = PackingListRequest,
    responses(
        (status = 200, description = "Packing list rendered", body = PackingListResponse),
        (status = 400, description = "Invalid decklist", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_packing_list(
    state: web::Data<AppState>,
    body: web::Json<PackingListRequest>,
) -> HttpResponse {
    let start = Instant::now();
    let request = body.into_inner();

    if let Some(card) = request.cards.iter().find(|c| c.qty == 0 || c.name.trim().is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_CARD",
            format!("Card '{}' needs a name and a quantity of at least 1", card.name),
        );
    }

    info!(
        title = %request.title,
        cards = request.cards.len(),
        "Processing packing list request"
    );

    let options = PackingOptions { show_title: request.show_title };
    match state.renderer.packing_list(request.cards, &request.title, options).await {
        Ok(render) => {
            let elapsed = start.elapsed().as_millis() as u64;
            HttpResponse::Ok().json(PackingListResponse {
                success: true,
                image_url: render.image.url,
                file_name: png_file_name(Some(request.title.as_str()), PACKING_LIST_STEM),
                overflow: render.outcome.overflow,
                size_offset: render.outcome.size_offset,
                scale: render.outcome.scale(),
                groups: render.group_count,
                dimensions: Dimensions {
                    width: render.image.width,
                    height: render.image.height,
                },
                generation_time_ms: elapsed,
            })
        }
        Err(e) => {
            error!(error = %e, "Packing list rendering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED", e.to_string())
        }
    }
}
