//! Drawing surfaces
//!
//! Renderers draw through the [`Surface`] trait: a small canvas-like set of
//! primitives. [`RasterSurface`] backs it with an in-memory RGBA image.

use std::sync::Arc;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use rusttype::point;

use super::fonts::{em_scale, FontBook, FontSpec};

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }
}

/// Horizontal anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Vertical anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

/// How a text run is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Rgba<u8>,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(font: FontSpec, color: Rgba<u8>) -> Self {
        TextStyle {
            font,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Canvas-like drawing primitives the renderers need
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Linear gradient from `top` at the rect's top edge to `bottom` at its bottom edge
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba<u8>, bottom: Rgba<u8>);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba<u8>);

    /// Draw the `src` region of `image` scaled into `dest`
    fn draw_image(&mut self, image: &RgbaImage, src: Rect, dest: Rect);

    fn measure_text_width(&self, text: &str, font: FontSpec) -> f32;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

/// Build a color from CSS-style components, alpha in 0..=1
pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Rgba<u8> {
    Rgba([r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
}

/// Opaque color from a 0xRRGGBB literal
pub fn hex(rgb: u32) -> Rgba<u8> {
    Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
}

/// Source-over compositing of `src` onto `dst`, scaled by `coverage`
fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src.0[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src.0[i] as f32 * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    *dst = Rgba(out);
}

/// Pixel range covered by [start, start + len), clipped to [0, limit)
fn pixel_span(start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
    let a = start.round().max(0.0);
    let b = (start + len).round().min(limit as f32);
    if b <= a {
        None
    } else {
        Some((a as u32, b as u32))
    }
}

/// RGBA raster with text support from a shared font book
pub struct RasterSurface {
    pixels: RgbaImage,
    fonts: Arc<FontBook>,
}

impl RasterSurface {
    /// Fully transparent surface
    pub fn new(width: u32, height: u32, fonts: Arc<FontBook>) -> Self {
        RasterSurface {
            pixels: RgbaImage::new(width, height),
            fonts,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    fn blend_rows(&mut self, rect: Rect, mut color_at: impl FnMut(u32) -> Rgba<u8>) {
        let (w, h) = self.pixels.dimensions();
        let (Some((x0, x1)), Some((y0, y1))) = (pixel_span(rect.x, rect.w, w), pixel_span(rect.y, rect.h, h)) else {
            return;
        };
        for y in y0..y1 {
            let color = color_at(y);
            for x in x0..x1 {
                blend_pixel(self.pixels.get_pixel_mut(x, y), color, 1.0);
            }
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.blend_rows(rect, |_| color);
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba<u8>, bottom: Rgba<u8>) {
        if rect.h <= 0.0 {
            return;
        }
        self.blend_rows(rect, |y| {
            // sample at pixel centers
            let t = ((y as f32 + 0.5 - rect.y) / rect.h).clamp(0.0, 1.0);
            let mut c = [0u8; 4];
            for i in 0..4 {
                c[i] = (top.0[i] as f32 + (bottom.0[i] as f32 - top.0[i] as f32) * t).round() as u8;
            }
            Rgba(c)
        });
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba<u8>) {
        let half = width / 2.0;
        if from.1 == to.1 {
            let x = from.0.min(to.0);
            self.fill_rect(Rect::new(x, from.1 - half, (to.0 - from.0).abs(), width), color);
        } else if from.0 == to.0 {
            let y = from.1.min(to.1);
            self.fill_rect(Rect::new(from.0 - half, y, width, (to.1 - from.1).abs()), color);
        } else {
            draw_line_segment_mut(&mut self.pixels, from, to, color);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, src: Rect, dest: Rect) {
        let (iw, ih) = image.dimensions();
        let (Some((sx0, sx1)), Some((sy0, sy1))) = (pixel_span(src.x, src.w, iw), pixel_span(src.y, src.h, ih)) else {
            return;
        };
        let dw = dest.w.round();
        let dh = dest.h.round();
        if dw < 1.0 || dh < 1.0 {
            return;
        }

        let region = imageops::crop_imm(image, sx0, sy0, sx1 - sx0, sy1 - sy0).to_image();
        let scaled = if region.dimensions() == (dw as u32, dh as u32) {
            region
        } else {
            imageops::resize(&region, dw as u32, dh as u32, imageops::FilterType::Lanczos3)
        };
        imageops::overlay(&mut self.pixels, &scaled, dest.x.round() as i64, dest.y.round() as i64);
    }

    fn measure_text_width(&self, text: &str, font: FontSpec) -> f32 {
        let Some(face) = self.fonts.get(font.face) else {
            return 0.0;
        };
        let scale = em_scale(face, font.size);
        face.layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let fonts = Arc::clone(&self.fonts);
        let Some(face) = fonts.get(style.font.face) else {
            return;
        };
        let scale = em_scale(face, style.font.size);

        let width = self.measure_text_width(text, style.font);
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
        };
        let baseline = match style.baseline {
            TextBaseline::Alphabetic => y,
            TextBaseline::Middle => {
                let vm = face.v_metrics(scale);
                y + (vm.ascent + vm.descent) / 2.0
            }
        };

        let (w, h) = self.pixels.dimensions();
        for glyph in face.layout(text, scale, point(left, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < h {
                    blend_pixel(self.pixels.get_pixel_mut(px as u32, py as u32), style.color, coverage);
                }
            });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fonts::FontFace;

    const DEJAVU_SANS: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans.ttf"));

    fn surface(w: u32, h: u32) -> RasterSurface {
        RasterSurface::new(w, h, Arc::new(FontBook::empty()))
    }

    fn surface_with_font(w: u32, h: u32) -> RasterSurface {
        let mut book = FontBook::empty();
        book.insert(FontFace::Body, DEJAVU_SANS.to_vec()).unwrap();
        RasterSurface::new(w, h, Arc::new(book))
    }

    /// (min, max) rows holding any ink
    fn ink_rows(s: &RasterSurface) -> Option<(u32, u32)> {
        let rows: Vec<u32> = s
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 64)
            .map(|(_, y, _)| y)
            .collect();
        Some((*rows.iter().min()?, *rows.iter().max()?))
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(hex(0xe83411), Rgba([0xe8, 0x34, 0x11, 255]));
        assert_eq!(rgba(0, 0, 0, 0.55), Rgba([0, 0, 0, 140]));
        assert_eq!(rgba(0, 0, 0, 2.0).0[3], 255);
    }

    #[test]
    fn test_fill_rect_clips_and_blends() {
        let mut s = surface(4, 4);
        s.fill_rect(Rect::new(-2.0, -2.0, 10.0, 10.0), hex(0xffffff));
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), rgba(0, 0, 0, 0.5));
        assert_eq!(s.pixels().get_pixel(3, 3), &Rgba([255, 255, 255, 255]));
        let half = s.pixels().get_pixel(0, 0);
        assert_eq!(half.0[3], 255);
        assert!((half.0[0] as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_gradient_runs_top_to_bottom() {
        let mut s = surface(1, 10);
        s.fill_vertical_gradient(Rect::new(0.0, 0.0, 1.0, 10.0), hex(0x000000), hex(0xffffff));
        let top = s.pixels().get_pixel(0, 0).0[0];
        let bottom = s.pixels().get_pixel(0, 9).0[0];
        assert!(top < 30 && bottom > 225);
    }

    #[test]
    fn test_horizontal_line_thickness() {
        let mut s = surface(10, 10);
        s.draw_line((1.0, 5.0), (9.0, 5.0), 2.0, hex(0x333333));
        assert_eq!(s.pixels().get_pixel(4, 4).0[3], 255);
        assert_eq!(s.pixels().get_pixel(4, 5).0[3], 255);
        assert_eq!(s.pixels().get_pixel(4, 6).0[3], 0);
        assert_eq!(s.pixels().get_pixel(0, 5).0[3], 0);
    }

    #[test]
    fn test_draw_image_scales_region() {
        let mut src = RgbaImage::new(4, 4);
        for (x, _, p) in src.enumerate_pixels_mut() {
            *p = if x < 2 { hex(0xff0000) } else { hex(0x0000ff) };
        }
        let mut s = surface(8, 8);
        // right half of the source stretched over the whole surface
        s.draw_image(&src, Rect::new(2.0, 0.0, 2.0, 4.0), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(s.pixels().get_pixel(0, 0).0[2] > 250);
        assert!(s.pixels().get_pixel(7, 7).0[2] > 250);
        assert!(s.pixels().get_pixel(3, 3).0[0] < 5);
    }

    #[test]
    fn test_text_without_fonts_is_inert() {
        let mut s = surface(10, 10);
        let font = FontSpec::new(FontFace::Body, 12.0);
        assert_eq!(s.measure_text_width("hello", font), 0.0);
        s.draw_text("hello", 0.0, 5.0, TextStyle::new(font, hex(0x000000)));
        assert!(s.pixels().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_measure_uses_em_size() {
        let s = surface_with_font(10, 10);
        // DejaVu Sans: M advances 1767 of 2048 units per em
        let m = s.measure_text_width("M", FontSpec::new(FontFace::Body, 100.0));
        assert!((m - 86.3).abs() < 1.0, "M measured {}", m);

        let doubled = s.measure_text_width("MM", FontSpec::new(FontFace::Body, 100.0));
        assert!((doubled - 2.0 * m).abs() < 0.5);
        let half = s.measure_text_width("M", FontSpec::new(FontFace::Body, 50.0));
        assert!((half * 2.0 - m).abs() < 0.5);
    }

    #[test]
    fn test_centered_middle_text_straddles_anchor() {
        let mut s = surface_with_font(200, 100);
        let style = TextStyle::new(FontSpec::new(FontFace::Body, 40.0), hex(0x000000))
            .align(TextAlign::Center)
            .baseline(TextBaseline::Middle);
        s.draw_text("H", 100.0, 50.0, style);

        let (top, bottom) = ink_rows(&s).unwrap();
        let center = (top + bottom) as f32 / 2.0;
        assert!((center - 50.0).abs() <= 3.0, "ink rows {}..{}", top, bottom);

        let cols: Vec<u32> = s
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 64)
            .map(|(x, _, _)| x)
            .collect();
        let left = *cols.iter().min().unwrap() as f32;
        let right = *cols.iter().max().unwrap() as f32;
        assert!(((left + right) / 2.0 - 100.0).abs() <= 3.0);
    }

    #[test]
    fn test_alphabetic_text_sits_on_baseline() {
        let mut s = surface_with_font(100, 100);
        s.draw_text("H", 10.0, 60.0, TextStyle::new(FontSpec::new(FontFace::Body, 40.0), hex(0x000000)));
        let (top, bottom) = ink_rows(&s).unwrap();
        assert!(bottom <= 60 && bottom >= 58, "bottom {}", bottom);
        // Cap height is about 0.73 em
        assert!((60 - top) as f32 > 25.0);
    }
}
