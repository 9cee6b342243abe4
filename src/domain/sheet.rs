//! Print sheet domain types
//!
//! Slots hold already-rendered card images. The sheet engine treats the
//! image bytes as opaque until it places them on a page.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Card size on the printed sheet, in millimeters
pub const CARD_WIDTH_MM: f32 = 63.0;
pub const CARD_HEIGHT_MM: f32 = 88.0;

/// Grid shape per page
pub const SHEET_COLS: usize = 3;
pub const SHEET_ROWS: usize = 3;
pub const CARDS_PER_PAGE: usize = SHEET_COLS * SHEET_ROWS;

/// A rendered card image queued for printing
#[derive(Debug, Clone, PartialEq)]
pub struct CardImage {
    /// Encoded raster (PNG or JPEG)
    pub raster: Bytes,
    pub label: String,
}

impl CardImage {
    pub fn new(raster: impl Into<Bytes>, label: impl Into<String>) -> Self {
        CardImage {
            raster: raster.into(),
            label: label.into(),
        }
    }
}

/// Which face of a slot an image sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotSide {
    Front,
    Back,
}

/// One physical card position: a front and an optional back
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSlot {
    pub id: u64,
    pub front: Option<CardImage>,
    pub back: Option<CardImage>,
}

impl SheetSlot {
    #[cfg(test)]
    pub fn side(&self, side: SlotSide) -> Option<&CardImage> {
        match side {
            SlotSide::Front => self.front.as_ref(),
            SlotSide::Back => self.back.as_ref(),
        }
    }

    pub fn side_mut(&mut self, side: SlotSide) -> &mut Option<CardImage> {
        match side {
            SlotSide::Front => &mut self.front,
            SlotSide::Back => &mut self.back,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }
}

/// Supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaperPreset {
    #[default]
    Letter,
    A4,
}

impl PaperPreset {
    /// (width, height) in millimeters, portrait
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperPreset::Letter => (215.9, 279.4),
            PaperPreset::A4 => (210.0, 297.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaperPreset::Letter => "Letter",
            PaperPreset::A4 => "A4",
        }
    }
}

/// Options for one PDF generation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SheetConfig {
    #[serde(default)]
    pub paper: PaperPreset,
    #[serde(default)]
    pub duplex: bool,
    #[serde(default)]
    pub crop_marks: bool,
    /// Vertical shift applied to back pages only, in millimeters
    #[serde(default)]
    pub back_offset_mm: f32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            paper: PaperPreset::Letter,
            duplex: false,
            crop_marks: false,
            back_offset_mm: 0.0,
        }
    }
}
