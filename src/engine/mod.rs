//! Card rendering and print layout engine
//!
//! This module contains the rendering core:
//! - Crop viewport math for theme card photos
//! - Packing list and theme card layout on a raster surface
//! - Print sheet queueing and PDF layout

use thiserror::Error;

pub mod crop;
pub mod document;
pub mod export;
pub mod fonts;
pub mod packing;
pub mod renderer;
pub mod sheet;
pub mod surface;
pub mod symbols;
pub mod text;
pub mod theme;

pub use crop::{CropError, CropOp, CropRect, CropTransform};
pub use export::{encode_png, png_file_name, RenderedImage, PACKING_LIST_STEM, THEME_CARD_STEM};
pub use fonts::{FontBook, FontError};
pub use packing::{PackingOptions, PackingOutcome};
pub use renderer::{ImageSource, PackingRender, Renderer};
pub use sheet::{SheetError, SheetPdf, SheetQueue, SheetSummary};
pub use symbols::{DirSymbolSource, HttpSymbolSource, SymbolResolver, SymbolSource};

/// Card canvas size in pixels
pub const CARD_WIDTH: u32 = 745;
pub const CARD_HEIGHT: u32 = 1040;
/// Black frame width in pixels
pub const BORDER: f32 = 32.0;

/// Card render errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to fetch source image: {0}")]
    FetchFailed(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid crop: {0}")]
    Crop(#[from] CropError),
}
