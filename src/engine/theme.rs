//! Theme card renderer
//!
//! A theme card is a cropped photo under a black frame, with an optional
//! name bar and a row of color identity icons in a dark gradient along the
//! bottom edge.

use image::RgbaImage;
use tracing::debug;

use crate::domain::ManaColor;
use super::crop::CropRect;
use super::fonts::{FontFace, FontSpec};
use super::surface::{hex, rgba, Rect, Surface, TextAlign, TextBaseline, TextStyle};
use super::symbols::SymbolMap;
use super::text::shrink_font_to_fit;
use super::{BORDER, CARD_HEIGHT, CARD_WIDTH};

/// Share of the inner height taken by each of the bar and gradient zones
const ZONE_RATIO: f32 = 2.0 / 13.0;
/// Horizontal room kept free around the name
const NAME_PAD: f32 = 60.0;
const MIN_NAME_SIZE: f32 = 16.0;
const NAME_SHRINK_STEP: f32 = 2.0;
const SHADOW_OFFSET: f32 = 2.0;
const SYM_SIZE: f32 = 40.0;
const SYM_GAP: f32 = 8.0;
/// Icon row top, as a fraction of the gradient height
const SYM_TOP_RATIO: f32 = 0.15;

/// Bottom zones of the card, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeZones {
    pub bar_top: f32,
    pub bar_h: f32,
    pub grad_top: f32,
    pub grad_h: f32,
}

impl ThemeZones {
    pub fn for_card() -> Self {
        let inner_h = CARD_HEIGHT as f32 - BORDER * 2.0;
        let bar_h = (inner_h * ZONE_RATIO).round();
        let grad_bottom = CARD_HEIGHT as f32 - BORDER;
        let grad_top = grad_bottom - bar_h;
        ThemeZones {
            bar_top: grad_top - bar_h,
            bar_h,
            grad_top,
            grad_h: bar_h,
        }
    }
}

/// Draw a theme card
///
/// `crop` is the region of `source` that fills the card. A blank `name`
/// omits the bar and lightens the top of the gradient. Colors are drawn in
/// canonical order regardless of the order given; colors whose icon is not
/// in `symbols` leave a gap.
pub fn render_theme_card<S: Surface + ?Sized>(
    surface: &mut S,
    source: &RgbaImage,
    crop: CropRect,
    colors: &[ManaColor],
    name: Option<&str>,
    symbols: &SymbolMap,
) {
    let card_w = CARD_WIDTH as f32;
    let card_h = CARD_HEIGHT as f32;

    surface.draw_image(
        source,
        Rect::new(crop.x as f32, crop.y as f32, crop.w as f32, crop.h as f32),
        Rect::new(0.0, 0.0, card_w, card_h),
    );
    draw_frame(surface, card_w, card_h);

    let zones = ThemeZones::for_card();
    // Blank names count as absent, but a present name is drawn as given
    let name = name.filter(|n| !n.trim().is_empty());

    let grad_top_color = if name.is_some() { rgba(0, 0, 0, 0.45) } else { rgba(0, 0, 0, 0.0) };
    if name.is_some() {
        surface.fill_rect(
            Rect::new(BORDER, zones.bar_top, card_w - BORDER * 2.0, zones.bar_h),
            rgba(0, 0, 0, 0.55),
        );
    }
    surface.fill_vertical_gradient(
        Rect::new(BORDER, zones.grad_top, card_w - BORDER * 2.0, zones.grad_h),
        grad_top_color,
        rgba(0, 0, 0, 0.85),
    );

    if let Some(name) = name {
        draw_name(surface, &name.to_uppercase(), &zones);
    }

    let ordered = ManaColor::ordered(colors);
    if !ordered.is_empty() {
        let n = ordered.len() as f32;
        let total_w = n * SYM_SIZE + (n - 1.0) * SYM_GAP;
        let mut x = (card_w - total_w) / 2.0;
        let y = zones.grad_top + (zones.grad_h * SYM_TOP_RATIO).round();
        for color in &ordered {
            if let Some(Some(icon)) = symbols.get(color.symbol_key()) {
                let (iw, ih) = icon.dimensions();
                surface.draw_image(
                    icon,
                    Rect::new(0.0, 0.0, iw as f32, ih as f32),
                    Rect::new(x, y, SYM_SIZE, SYM_SIZE),
                );
            }
            x += SYM_SIZE + SYM_GAP;
        }
    }

    debug!(
        named = name.is_some(),
        colors = ordered.len(),
        crop_w = crop.w,
        crop_h = crop.h,
        "Rendered theme card"
    );
}

fn draw_frame<S: Surface + ?Sized>(surface: &mut S, card_w: f32, card_h: f32) {
    let black = hex(0x000000);
    surface.fill_rect(Rect::new(0.0, 0.0, card_w, BORDER), black);
    surface.fill_rect(Rect::new(0.0, card_h - BORDER, card_w, BORDER), black);
    surface.fill_rect(Rect::new(0.0, BORDER, BORDER, card_h - BORDER * 2.0), black);
    surface.fill_rect(Rect::new(card_w - BORDER, BORDER, BORDER, card_h - BORDER * 2.0), black);
}

fn draw_name<S: Surface + ?Sized>(surface: &mut S, name: &str, zones: &ThemeZones) {
    let card_w = CARD_WIDTH as f32;
    let max_w = card_w - BORDER * 2.0 - NAME_PAD;
    let start = (zones.bar_h / 2.0).round();
    let size = shrink_font_to_fit(start, MIN_NAME_SIZE, NAME_SHRINK_STEP, |size| {
        surface.measure_text_width(name, FontSpec::new(FontFace::HeadingBold, size)) <= max_w
    });

    let font = FontSpec::new(FontFace::HeadingBold, size);
    let cx = card_w / 2.0;
    let cy = zones.bar_top + zones.bar_h / 2.0;
    surface.draw_text(
        name,
        cx + SHADOW_OFFSET,
        cy + SHADOW_OFFSET,
        TextStyle::new(font, rgba(0, 0, 0, 0.7))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle),
    );
    surface.draw_text(
        name,
        cx,
        cy,
        TextStyle::new(font, hex(0xffffff))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::engine::surface::testing::{DrawOp, RecordingSurface};

    fn crop() -> CropRect {
        CropRect { x: 10.0, y: 20.0, w: 745.0, h: 1040.0 }
    }

    fn all_symbols() -> SymbolMap {
        ManaColor::ALL
            .iter()
            .map(|c| (c.symbol_key().to_string(), Some(Arc::new(RgbaImage::new(8, 8)))))
            .collect()
    }

    #[test]
    fn test_zone_geometry() {
        let z = ThemeZones::for_card();
        assert_eq!(z.bar_h, 150.0);
        assert_eq!(z.grad_top, 1040.0 - 32.0 - 150.0);
        assert_eq!(z.bar_top, z.grad_top - 150.0);
    }

    #[test]
    fn test_named_card_draws_bar_shadow_and_name() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(1000, 1400);
        render_theme_card(&mut s, &source, crop(), &[], Some("Dinosaurs"), &HashMap::new());

        let first = &s.ops[0];
        assert!(matches!(first, DrawOp::Image { src, .. } if src.x == 10.0 && src.y == 20.0));

        let z = ThemeZones::for_card();
        assert!(s.ops.iter().any(|op| matches!(
            op,
            DrawOp::FillRect(r, c) if r.y == z.bar_top && *c == rgba(0, 0, 0, 0.55)
        )));
        assert!(s.ops.iter().any(|op| matches!(
            op,
            DrawOp::Gradient(_, top, _) if *top == rgba(0, 0, 0, 0.45)
        )));
        assert_eq!(s.texts(), vec!["DINOSAURS", "DINOSAURS"]);
    }

    #[test]
    fn test_unnamed_card_has_no_bar() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        render_theme_card(&mut s, &source, crop(), &[], Some("   "), &HashMap::new());

        assert!(s.texts().is_empty());
        assert!(!s.ops.iter().any(|op| matches!(op, DrawOp::FillRect(_, c) if *c == rgba(0, 0, 0, 0.55))));
        assert!(s.ops.iter().any(|op| matches!(
            op,
            DrawOp::Gradient(_, top, _) if top.0[3] == 0
        )));
    }

    #[test]
    fn test_name_drawn_untrimmed() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        render_theme_card(&mut s, &source, crop(), &[], Some(" Elves "), &HashMap::new());
        assert_eq!(s.texts(), vec![" ELVES ", " ELVES "]);
    }

    #[test]
    fn test_long_name_shrinks_to_floor() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        let name = "A".repeat(200);
        render_theme_card(&mut s, &source, crop(), &[], Some(&name), &HashMap::new());
        let sizes: Vec<f32> = s
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { style, .. } => Some(style.font.size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![MIN_NAME_SIZE, MIN_NAME_SIZE]);
    }

    #[test]
    fn test_short_name_keeps_start_size() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        render_theme_card(&mut s, &source, crop(), &[], Some("Elves"), &HashMap::new());
        match s.ops.iter().find(|op| matches!(op, DrawOp::Text { .. })) {
            Some(DrawOp::Text { style, .. }) => assert_eq!(style.font.size, 75.0),
            _ => panic!("no name drawn"),
        }
    }

    #[test]
    fn test_color_icons_centered_in_canonical_order() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        let colors = [ManaColor::G, ManaColor::W, ManaColor::B];
        render_theme_card(&mut s, &source, crop(), &colors, None, &all_symbols());

        // first image is the photo itself
        let icons: Vec<Rect> = s.images().into_iter().skip(1).collect();
        assert_eq!(icons.len(), 3);
        let total_w = 3.0 * SYM_SIZE + 2.0 * SYM_GAP;
        assert_eq!(icons[0].x, (CARD_WIDTH as f32 - total_w) / 2.0);
        assert_eq!(icons[2].x + icons[2].w, (CARD_WIDTH as f32 + total_w) / 2.0);

        let z = ThemeZones::for_card();
        assert_eq!(icons[0].y, z.grad_top + (z.grad_h * SYM_TOP_RATIO).round());
    }

    #[test]
    fn test_missing_color_icon_leaves_gap() {
        let mut s = RecordingSurface::new(CARD_WIDTH, CARD_HEIGHT);
        let source = RgbaImage::new(745, 1040);
        let mut symbols = all_symbols();
        symbols.insert("U".into(), None);
        render_theme_card(&mut s, &source, crop(), &[ManaColor::W, ManaColor::U, ManaColor::B], None, &symbols);

        let icons: Vec<Rect> = s.images().into_iter().skip(1).collect();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[1].x - icons[0].x, 2.0 * (SYM_SIZE + SYM_GAP));
    }
}
