//! Render orchestration
//!
//! Gathers what a render needs (symbol icons, the source photo, the crop)
//! and then draws synchronously onto a fresh raster surface.

use std::sync::Arc;

use base64::Engine;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::domain::{group_by_type, Card, ManaColor};
use super::crop::{CropOp, CropRect, CropTransform};
use super::export::RenderedImage;
use super::fonts::FontBook;
use super::packing::{render_packing_list, PackingOptions, PackingOutcome};
use super::surface::RasterSurface;
use super::symbols::SymbolResolver;
use super::theme::render_theme_card;
use super::{RenderError, CARD_HEIGHT, CARD_WIDTH};

/// Where a theme card's photo comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Raw base64 or a `data:` URL
    Base64 { data: String },
    Url { url: String },
}

/// A rendered packing list
#[derive(Debug, Clone)]
pub struct PackingRender {
    pub image: RenderedImage,
    pub outcome: PackingOutcome,
    pub group_count: usize,
}

/// Replay recorded crop interactions on a fresh transform
///
/// The viewport defaults to the card canvas.
pub fn replay_crop(
    natural: (u32, u32),
    viewport: Option<(f64, f64)>,
    ops: &[CropOp],
) -> Result<CropRect, RenderError> {
    let (vw, vh) = viewport.unwrap_or((CARD_WIDTH as f64, CARD_HEIGHT as f64));
    let mut transform = CropTransform::new();
    transform.initialize(natural.0 as f64, natural.1 as f64, vw, vh)?;
    for op in ops {
        transform.apply(*op);
    }
    Ok(transform.crop_rect()?)
}

/// Shared rendering front end
pub struct Renderer {
    fonts: Arc<FontBook>,
    symbols: Arc<SymbolResolver>,
    http_client: reqwest::Client,
}

impl Renderer {
    pub fn new(fonts: Arc<FontBook>, symbols: Arc<SymbolResolver>) -> Result<Self, RenderError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("deckprint/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Renderer {
            fonts,
            symbols,
            http_client,
        })
    }

    pub fn symbols(&self) -> &SymbolResolver {
        &self.symbols
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Group `cards` by type and render the packing list
    pub async fn packing_list(
        &self,
        cards: Vec<Card>,
        title: &str,
        options: PackingOptions,
    ) -> Result<PackingRender, RenderError> {
        let groups = group_by_type(cards);
        let symbols = self.symbols.preload(&groups).await;
        debug!(groups = groups.len(), symbols = symbols.len(), "Symbols ready for packing list");

        let mut surface = RasterSurface::new(CARD_WIDTH, CARD_HEIGHT, Arc::clone(&self.fonts));
        let outcome = render_packing_list(&mut surface, &groups, title, &symbols, options);
        if outcome.overflow {
            warn!(title = %title, groups = groups.len(), "Packing list does not fit, content truncated");
        }

        let image = RenderedImage::from_image(surface.pixels())?;
        info!(
            title = %title,
            size_offset = outcome.size_offset,
            bytes = image.bytes.len(),
            "Packing list rendered"
        );

        Ok(PackingRender {
            image,
            outcome,
            group_count: groups.len(),
        })
    }

    /// Render a theme card from an already-decoded photo
    pub async fn theme_card(
        &self,
        source: &RgbaImage,
        crop: CropRect,
        colors: &[ManaColor],
        name: Option<&str>,
    ) -> Result<RenderedImage, RenderError> {
        let keys: Vec<&str> = ManaColor::ordered(colors).iter().map(|c| c.symbol_key()).collect();
        let symbols = self.symbols.resolve(keys).await;

        let mut surface = RasterSurface::new(CARD_WIDTH, CARD_HEIGHT, Arc::clone(&self.fonts));
        render_theme_card(&mut surface, source, crop, colors, name, &symbols);

        let image = RenderedImage::from_image(surface.pixels())?;
        info!(
            name = name.unwrap_or(""),
            colors = colors.len(),
            bytes = image.bytes.len(),
            "Theme card rendered"
        );
        Ok(image)
    }

    /// Fetch and decode a theme card photo
    pub async fn load_source(&self, source: &ImageSource) -> Result<RgbaImage, RenderError> {
        let bytes = match source {
            ImageSource::Base64 { data } => decode_base64_image(data)?,
            ImageSource::Url { url } => {
                debug!(url = %url, "Fetching source image");
                let response = self.http_client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(RenderError::FetchFailed(format!(
                        "HTTP {}: {}",
                        response.status(),
                        url
                    )));
                }
                response.bytes().await?.to_vec()
            }
        };

        let image = image::load_from_memory(&bytes)?.to_rgba8();
        debug!(width = image.width(), height = image.height(), "Source image decoded");
        Ok(image)
    }
}

/// Decode raw base64 or a base64 `data:` URL
pub fn decode_base64_image(data: &str) -> Result<Vec<u8>, RenderError> {
    let payload = match data.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => payload,
        _ => data,
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::crop::CropError;
    use crate::engine::export::png_data_url;
    use crate::engine::encode_png;

    #[test]
    fn test_replay_crop_defaults_to_card_viewport() {
        // same aspect as the card, so the cover crop is the whole image
        let rect = replay_crop((1490, 2080), None, &[]).unwrap();
        assert!((rect.x).abs() < 1e-6 && (rect.y).abs() < 1e-6);
        assert!((rect.w - 1490.0).abs() < 1e-6);
        assert!((rect.h - 2080.0).abs() < 1e-6);
    }

    #[test]
    fn test_replay_crop_applies_ops() {
        let ops = [CropOp::ZoomAt { x: 0.0, y: 0.0, factor: 2.0 }];
        let rect = replay_crop((745, 1040), None, &ops).unwrap();
        assert!((rect.w - 372.5).abs() < 1e-6);
        assert!(rect.x.abs() < 1e-6);
    }

    #[test]
    fn test_replay_crop_rejects_empty_image() {
        assert!(matches!(
            replay_crop((0, 10), None, &[]),
            Err(RenderError::Crop(CropError::InvalidDimensions(..)))
        ));
    }

    #[test]
    fn test_decode_base64_forms() {
        let png = encode_png(&RgbaImage::new(1, 1)).unwrap();
        let url = png_data_url(&png);
        assert_eq!(decode_base64_image(&url).unwrap(), png);
        let raw = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(decode_base64_image(raw).unwrap(), png);
        assert!(matches!(decode_base64_image("not base64!"), Err(RenderError::Base64(_))));
    }
}
