//! Raster export

use base64::Engine;
use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError, RgbaImage};

/// An encoded card image ready to return to a client
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// `data:image/png;base64,...`
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Bytes,
}

impl RenderedImage {
    pub fn from_image(image: &RgbaImage) -> Result<Self, ImageError> {
        let png = encode_png(image)?;
        let (width, height) = image.dimensions();
        Ok(RenderedImage {
            url: png_data_url(&png),
            width,
            height,
            bytes: Bytes::from(png),
        })
    }
}

/// Encode to PNG, keeping the alpha channel
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)?;
    Ok(buffer)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

pub const PACKING_LIST_STEM: &str = "packing-list";
pub const THEME_CARD_STEM: &str = "theme-card";

/// Lowercase, collapse every run of non `[a-z0-9]` into one `-`, trim the ends
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Download name for a rendered card, `<name>-<stem>.png` or `<stem>.png`
pub fn png_file_name(name: Option<&str>, stem: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{}.png", slugify(&format!("{}-{}", name, stem))),
        None => format!("{}.png", stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_keeps_alpha() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
        let png = encode_png(&img).unwrap();
        let back = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(2, 1), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_rendered_image() {
        let rendered = RenderedImage::from_image(&RgbaImage::new(4, 5)).unwrap();
        assert_eq!((rendered.width, rendered.height), (4, 5));
        assert!(rendered.url.starts_with("data:image/png;base64,iVBOR"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Elves & Friends!"), "elves-friends");
        assert_eq!(slugify("  --Goblin  Horde 2--"), "goblin-horde-2");
        assert_eq!(slugify("Élan"), "lan");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_png_file_names() {
        assert_eq!(png_file_name(Some("Elves & Friends!"), PACKING_LIST_STEM), "elves-friends-packing-list.png");
        assert_eq!(png_file_name(Some("Dragons"), THEME_CARD_STEM), "dragons-theme-card.png");
        assert_eq!(png_file_name(None, PACKING_LIST_STEM), "packing-list.png");
        assert_eq!(png_file_name(Some("   "), THEME_CARD_STEM), "theme-card.png");
        // A name with no usable characters still yields the bare stem
        assert_eq!(png_file_name(Some("???"), THEME_CARD_STEM), "theme-card.png");
    }
}
