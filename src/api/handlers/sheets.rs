//! Print sheet endpoints
//!
//! A sheet session queues front/back card images and renders them to PDF.

use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::domain::{CardImage, PaperPreset, SheetConfig, SheetSlot, SlotSide};
use crate::engine::renderer::decode_base64_image;
use crate::engine::sheet::{render_alignment_pdf, render_sheet_pdf};
use crate::engine::{SheetError, SheetPdf, SheetQueue};
use super::{error_response, ErrorResponse};

/// An image to queue, as base64 or a PNG data URL
#[derive(Debug, Deserialize, ToSchema)]
pub struct SlotImageInput {
    pub data: String,
    #[serde(default)]
    pub label: String,
}

/// Request body for adding a slot
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddSlotRequest {
    #[serde(default)]
    pub front: Option<SlotImageInput>,
    #[serde(default)]
    pub back: Option<SlotImageInput>,
}

/// Request body for swapping two slot sides
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveCardRequest {
    pub from_slot: u64,
    pub from_side: SlotSide,
    pub to_slot: u64,
    pub to_side: SlotSide,
}

/// Request body for detaching one side into a new slot
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetachRequest {
    pub slot_id: u64,
    pub side: SlotSide,
}

/// PDF options; anything left out falls back to the server defaults
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PdfOptions {
    pub paper: Option<PaperPreset>,
    pub duplex: Option<bool>,
    pub crop_marks: Option<bool>,
    pub back_offset_mm: Option<f32>,
}

impl PdfOptions {
    /// An empty body means server defaults; anything else must parse
    fn from_body(body: &[u8]) -> Result<Self, HttpResponse> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(PdfOptions::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, "INVALID_PDF_OPTIONS", format!("Invalid PDF options: {}", e))
        })
    }

    fn resolve(&self, defaults: SheetConfig) -> SheetConfig {
        SheetConfig {
            paper: self.paper.unwrap_or(defaults.paper),
            duplex: self.duplex.unwrap_or(defaults.duplex),
            crop_marks: self.crop_marks.unwrap_or(defaults.crop_marks),
            back_offset_mm: self.back_offset_mm.unwrap_or(defaults.back_offset_mm),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SlotImageView {
    pub label: String,
    pub bytes: usize,
}

#[derive(Serialize, ToSchema)]
pub struct SlotView {
    pub id: u64,
    pub front: Option<SlotImageView>,
    pub back: Option<SlotImageView>,
}

impl From<&SheetSlot> for SlotView {
    fn from(slot: &SheetSlot) -> Self {
        let view = |image: &CardImage| SlotImageView {
            label: image.label.clone(),
            bytes: image.raster.len(),
        };
        SlotView {
            id: slot.id,
            front: slot.front.as_ref().map(view),
            back: slot.back.as_ref().map(view),
        }
    }
}

/// Current contents of a sheet session
#[derive(Serialize, ToSchema)]
pub struct SheetResponse {
    pub success: bool,
    pub id: Uuid,
    pub slots: Vec<SlotView>,
    pub image_count: usize,
}

impl SheetResponse {
    fn from_queue(id: Uuid, queue: &SheetQueue) -> Self {
        SheetResponse {
            success: true,
            id,
            slots: queue.slots().iter().map(SlotView::from).collect(),
            image_count: queue.image_count(),
        }
    }
}

/// Result of a slot mutation
#[derive(Serialize, ToSchema)]
pub struct SlotChangeResponse {
    pub success: bool,
    /// Id of the slot created by the change, if any
    pub slot_id: Option<u64>,
    /// False when the change was a no-op
    pub changed: bool,
    pub sheet: SheetResponse,
}

fn sheet_not_found(id: &Uuid) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "SHEET_NOT_FOUND", format!("Sheet '{}' does not exist", id))
}

fn decode_slot_image(input: Option<SlotImageInput>) -> Result<Option<CardImage>, HttpResponse> {
    let Some(input) = input else {
        return Ok(None);
    };
    match decode_base64_image(&input.data) {
        Ok(bytes) => Ok(Some(CardImage::new(bytes, input.label))),
        Err(e) => Err(error_response(StatusCode::BAD_REQUEST, "INVALID_IMAGE_DATA", e.to_string())),
    }
}

fn pdf_response(pdf: SheetPdf) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.file_name),
        ))
        .insert_header(("X-Sheet-Pages", pdf.summary.pages.to_string()))
        .body(pdf.bytes)
}

fn sheet_error_response(e: &SheetError) -> HttpResponse {
    match e {
        SheetError::Empty => error_response(StatusCode::UNPROCESSABLE_ENTITY, "SHEET_EMPTY", e.to_string()),
        _ => {
            error!(error = %e, "Sheet PDF generation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "PDF_FAILED", e.to_string())
        }
    }
}

/// Render a PDF on the blocking pool
async fn render_blocking<F>(render: F) -> Result<SheetPdf, SheetError>
where
    F: FnOnce() -> Result<SheetPdf, SheetError> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| SheetError::Task(e.to_string()))?
}

/// POST /api/v1/sheets - Start a sheet session
#[utoipa::path(
    post,
    path = "/api/v1/sheets",
    tag = "sheets",
    responses(
        (status = 201, description = "Sheet session created", body = SheetResponse)
    )
)]
pub async fn create_sheet(state: web::Data<AppState>) -> HttpResponse {
    let id = state.sessions.create();
    info!(sheet_id = %id, "Sheet session created");
    HttpResponse::Created().json(SheetResponse::from_queue(id, &SheetQueue::new()))
}

/// GET /api/v1/sheets/{id} - Get a sheet session
#[utoipa::path(
    get,
    path = "/api/v1/sheets/{id}",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    responses(
        (status = 200, description = "Sheet contents", body = SheetResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn get_sheet(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();
    match state.sessions.with(&id, |queue| SheetResponse::from_queue(id, queue)) {
        Some(response) => HttpResponse::Ok().json(response),
        None => sheet_not_found(&id),
    }
}

/// DELETE /api/v1/sheets/{id} - End a sheet session
#[utoipa::path(
    delete,
    path = "/api/v1/sheets/{id}",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    responses(
        (status = 204, description = "Sheet deleted"),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn delete_sheet(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();
    if state.sessions.remove(&id) {
        info!(sheet_id = %id, "Sheet session deleted");
        HttpResponse::NoContent().finish()
    } else {
        sheet_not_found(&id)
    }
}

/// POST /api/v1/sheets/{id}/slots - Queue a front/back pair
#[utoipa::path(
    post,
    path = "/api/v1/sheets/{id}/slots",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    request_body = AddSlotRequest,
    responses(
        (status = 201, description = "Slot added", body = SlotChangeResponse),
        (status = 400, description = "No image given or invalid image data", body = ErrorResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn add_slot(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddSlotRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let request = body.into_inner();

    let front = match decode_slot_image(request.front) {
        Ok(image) => image,
        Err(response) => return response,
    };
    let back = match decode_slot_image(request.back) {
        Ok(image) => image,
        Err(response) => return response,
    };
    if front.is_none() && back.is_none() {
        return error_response(StatusCode::BAD_REQUEST, "EMPTY_SLOT", "A slot needs a front or a back image");
    }

    let result = state.sessions.with(&id, |queue| {
        let slot_id = queue.add_slot(front, back);
        SlotChangeResponse {
            success: true,
            slot_id,
            changed: slot_id.is_some(),
            sheet: SheetResponse::from_queue(id, queue),
        }
    });

    match result {
        Some(response) => {
            info!(sheet_id = %id, slot_id = ?response.slot_id, "Slot added");
            HttpResponse::Created().json(response)
        }
        None => sheet_not_found(&id),
    }
}

/// DELETE /api/v1/sheets/{id}/slots - Remove every slot
#[utoipa::path(
    delete,
    path = "/api/v1/sheets/{id}/slots",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    responses(
        (status = 200, description = "Sheet cleared", body = SheetResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn clear_slots(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let id = path.into_inner();
    let result = state.sessions.with(&id, |queue| {
        queue.clear();
        SheetResponse::from_queue(id, queue)
    });
    match result {
        Some(response) => HttpResponse::Ok().json(response),
        None => sheet_not_found(&id),
    }
}

/// DELETE /api/v1/sheets/{id}/slots/{slot_id} - Remove one slot
#[utoipa::path(
    delete,
    path = "/api/v1/sheets/{id}/slots/{slot_id}",
    tag = "sheets",
    params(
        ("id" = Uuid, Path, description = "Sheet session ID"),
        ("slot_id" = u64, Path, description = "Slot ID")
    ),
    responses(
        (status = 200, description = "Slot removed", body = SheetResponse),
        (status = 404, description = "Sheet or slot not found", body = ErrorResponse)
    )
)]
pub async fn remove_slot(state: web::Data<AppState>, path: web::Path<(Uuid, u64)>) -> HttpResponse {
    let (id, slot_id) = path.into_inner();
    let result = state.sessions.with(&id, |queue| {
        queue.remove_slot(slot_id).then(|| SheetResponse::from_queue(id, queue))
    });
    match result {
        Some(Some(response)) => HttpResponse::Ok().json(response),
        Some(None) => error_response(
            StatusCode::NOT_FOUND,
            "SLOT_NOT_FOUND",
            format!("Slot {} does not exist", slot_id),
        ),
        None => sheet_not_found(&id),
    }
}

/// POST /api/v1/sheets/{id}/moves - Swap two slot sides
#[utoipa::path(
    post,
    path = "/api/v1/sheets/{id}/moves",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    request_body = MoveCardRequest,
    responses(
        (status = 200, description = "Move applied, or ignored when it was a no-op", body = SlotChangeResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn move_card(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<MoveCardRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let m = body.into_inner();
    let result = state.sessions.with(&id, |queue| {
        let changed = queue.move_card(m.from_slot, m.from_side, m.to_slot, m.to_side);
        SlotChangeResponse {
            success: true,
            slot_id: None,
            changed,
            sheet: SheetResponse::from_queue(id, queue),
        }
    });
    match result {
        Some(response) => HttpResponse::Ok().json(response),
        None => sheet_not_found(&id),
    }
}

/// POST /api/v1/sheets/{id}/detach - Move one side into a new slot
#[utoipa::path(
    post,
    path = "/api/v1/sheets/{id}/detach",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    request_body = DetachRequest,
    responses(
        (status = 200, description = "Image detached, or ignored when the side was empty", body = SlotChangeResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse)
    )
)]
pub async fn detach_card(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<DetachRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let request = body.into_inner();
    let result = state.sessions.with(&id, |queue| {
        let slot_id = queue.move_to_new_slot(request.slot_id, request.side);
        SlotChangeResponse {
            success: true,
            slot_id,
            changed: slot_id.is_some(),
            sheet: SheetResponse::from_queue(id, queue),
        }
    });
    match result {
        Some(response) => HttpResponse::Ok().json(response),
        None => sheet_not_found(&id),
    }
}

/// POST /api/v1/sheets/{id}/pdf - Render the sheet to PDF
#[utoipa::path(
    post,
    path = "/api/v1/sheets/{id}/pdf",
    tag = "sheets",
    params(("id" = Uuid, Path, description = "Sheet session ID")),
    request_body = PdfOptions,
    responses(
        (status = 200, description = "PDF document (application/pdf)"),
        (status = 400, description = "Malformed PDF options", body = ErrorResponse),
        (status = 404, description = "Sheet not found", body = ErrorResponse),
        (status = 422, description = "Sheet has no images", body = ErrorResponse),
        (status = 500, description = "PDF generation failed", body = ErrorResponse)
    )
)]
pub async fn render_sheet(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> HttpResponse {
    let id = path.into_inner();
    let options = match PdfOptions::from_body(&body) {
        Ok(options) => options,
        Err(response) => return response,
    };
    let config = options.resolve(state.settings.sheet.to_config());

    let Some(slots) = state.sessions.snapshot(&id) else {
        return sheet_not_found(&id);
    };

    info!(
        sheet_id = %id,
        slots = slots.len(),
        paper = config.paper.label(),
        duplex = config.duplex,
        "Rendering sheet PDF"
    );

    match render_blocking(move || render_sheet_pdf(&slots, &config)).await {
        Ok(pdf) => {
            if pdf.summary.images_skipped > 0 {
                warn!(sheet_id = %id, skipped = pdf.summary.images_skipped, "Some sheet images were left blank");
            }
            pdf_response(pdf)
        }
        Err(e) => sheet_error_response(&e),
    }
}

/// POST /api/v1/sheets/alignment-test - Render the duplex alignment test
#[utoipa::path(
    post,
    path = "/api/v1/sheets/alignment-test",
    tag = "sheets",
    request_body = PdfOptions,
    responses(
        (status = 200, description = "PDF document (application/pdf)"),
        (status = 400, description = "Malformed PDF options", body = ErrorResponse),
        (status = 500, description = "PDF generation failed", body = ErrorResponse)
    )
)]
pub async fn alignment_test(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> HttpResponse {
    let options = match PdfOptions::from_body(&body) {
        Ok(options) => options,
        Err(response) => return response,
    };
    let config = options.resolve(state.settings.sheet.to_config());

    match render_blocking(move || render_alignment_pdf(&config)).await {
        Ok(pdf) => pdf_response(pdf),
        Err(e) => sheet_error_response(&e),
    }
}
