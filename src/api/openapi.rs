//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    ErrorResponse, ApiError, Dimensions,
    health::HealthResponse,
    packing::{PackingListRequest, PackingListResponse},
    theme::{ThemeCardRequest, ThemeCardResponse, Viewport},
    sheets::{
        AddSlotRequest, SlotImageInput, MoveCardRequest, DetachRequest, PdfOptions,
        SheetResponse, SlotView, SlotImageView, SlotChangeResponse,
    },
};
use crate::domain::{Card, ManaColor, PaperPreset, SlotSide};
use crate::engine::{CropOp, CropRect, ImageSource};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "deckprint API",
        version = "0.1.0",
        description = "Packing list and theme card rendering with print-ready sheet layout",
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
        (name = "cards", description = "Card image rendering endpoints"),
        (name = "sheets", description = "Print sheet sessions and PDF output")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::packing::create_packing_list,
        crate::api::handlers::theme::create_theme_card,
        crate::api::handlers::sheets::create_sheet,
        crate::api::handlers::sheets::get_sheet,
        crate::api::handlers::sheets::delete_sheet,
        crate::api::handlers::sheets::add_slot,
        crate::api::handlers::sheets::clear_slots,
        crate::api::handlers::sheets::remove_slot,
        crate::api::handlers::sheets::move_card,
        crate::api::handlers::sheets::detach_card,
        crate::api::handlers::sheets::render_sheet,
        crate::api::handlers::sheets::alignment_test,
    ),
    components(
        schemas(
            // Shared schemas
            ErrorResponse,
            ApiError,
            Dimensions,
            HealthResponse,
            // Card rendering schemas
            PackingListRequest,
            PackingListResponse,
            ThemeCardRequest,
            ThemeCardResponse,
            Viewport,
            ImageSource,
            CropOp,
            CropRect,
            // Sheet schemas
            AddSlotRequest,
            SlotImageInput,
            MoveCardRequest,
            DetachRequest,
            PdfOptions,
            SheetResponse,
            SlotView,
            SlotImageView,
            SlotChangeResponse,
            // Domain schemas
            Card,
            ManaColor,
            PaperPreset,
            SlotSide,
        )
    )
)]
pub struct ApiDoc;
