//! Paged document output
//!
//! The sheet engine lays pages out in millimeters from the top-left corner
//! of each page. [`PdfSurface`] converts that into PDF space, where the
//! origin is the bottom-left corner.

use std::io::BufWriter;

use image::{Rgb as RgbPixel, RgbImage, RgbaImage};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px, Rgb,
};
use thiserror::Error;

/// Document output errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Nothing can be drawn before the first page is added")]
    NoPage,
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Resolution images are embedded at before scaling to their box
const EMBED_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;

/// Paged drawing target in top-left millimeter coordinates
pub trait DocumentSurface {
    /// Start a new page; later calls draw on it
    fn add_page(&mut self, width_mm: f32, height_mm: f32) -> Result<(), DocumentError>;

    /// Place `image` stretched into the box at (x, y) sized w x h
    fn place_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) -> Result<(), DocumentError>;

    /// Straight line; `gray` is 0 (black) to 255 (white)
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width_mm: f32, gray: u8) -> Result<(), DocumentError>;

    /// Rectangle outline in black
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width_mm: f32) -> Result<(), DocumentError>;

    /// Bold label centered on (cx, cy)
    fn draw_label(&mut self, text: &str, cx: f32, cy: f32, size_pt: f32) -> Result<(), DocumentError>;

    fn page_count(&self) -> usize;

    /// Serialize the finished document
    fn finish(self) -> Result<Vec<u8>, DocumentError>
    where
        Self: Sized;
}

struct OpenDocument {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page_height: f32,
}

/// PDF output backed by printpdf
pub struct PdfSurface {
    title: String,
    open: Option<OpenDocument>,
    pages: usize,
}

impl PdfSurface {
    pub fn new(title: impl Into<String>) -> Self {
        PdfSurface {
            title: title.into(),
            open: None,
            pages: 0,
        }
    }

    fn current(&self) -> Result<&OpenDocument, DocumentError> {
        self.open.as_ref().ok_or(DocumentError::NoPage)
    }

    fn point(page_height: f32, x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(page_height - y))
    }
}

/// Flatten transparency onto white; PDF image XObjects here carry no alpha
fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    let (w, h) = image.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let p = image.get_pixel(x, y).0;
        let a = p[3] as f32 / 255.0;
        let mix = |c: u8| (c as f32 * a + 255.0 * (1.0 - a)).round() as u8;
        RgbPixel([mix(p[0]), mix(p[1]), mix(p[2])])
    })
}

impl DocumentSurface for PdfSurface {
    fn add_page(&mut self, width_mm: f32, height_mm: f32) -> Result<(), DocumentError> {
        match self.open.as_mut() {
            Some(open) => {
                let (page, layer) = open.doc.add_page(Mm(width_mm), Mm(height_mm), "Layer 1");
                open.layer = open.doc.get_page(page).get_layer(layer);
                open.page_height = height_mm;
            }
            None => {
                let (doc, page, layer) = PdfDocument::new(&self.title, Mm(width_mm), Mm(height_mm), "Layer 1");
                let font = doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| DocumentError::Pdf(e.to_string()))?;
                let layer = doc.get_page(page).get_layer(layer);
                self.open = Some(OpenDocument {
                    doc,
                    layer,
                    font,
                    page_height: height_mm,
                });
            }
        }
        self.pages += 1;
        Ok(())
    }

    fn place_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) -> Result<(), DocumentError> {
        let open = self.current()?;
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 || px_h == 0 {
            return Ok(());
        }

        let xobject = ImageXObject {
            width: Px(px_w as usize),
            height: Px(px_h as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: flatten_on_white(image).into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        // natural size at EMBED_DPI, then scaled to the box
        let natural_w = px_w as f32 / EMBED_DPI * MM_PER_INCH;
        let natural_h = px_h as f32 / EMBED_DPI * MM_PER_INCH;
        Image::from(xobject).add_to_layer(
            open.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(open.page_height - (y + h))),
                dpi: Some(EMBED_DPI),
                scale_x: Some(w / natural_w),
                scale_y: Some(h / natural_h),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), width_mm: f32, gray: u8) -> Result<(), DocumentError> {
        let open = self.current()?;
        let level = gray as f32 / 255.0;
        open.layer.set_outline_color(Color::Rgb(Rgb::new(level, level, level, None)));
        open.layer.set_outline_thickness(width_mm * PT_PER_MM);
        open.layer.add_line(Line {
            points: vec![
                (Self::point(open.page_height, from.0, from.1), false),
                (Self::point(open.page_height, to.0, to.1), false),
            ],
            is_closed: false,
        });
        Ok(())
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width_mm: f32) -> Result<(), DocumentError> {
        let open = self.current()?;
        let ph = open.page_height;
        open.layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        open.layer.set_outline_thickness(width_mm * PT_PER_MM);
        open.layer.add_line(Line {
            points: vec![
                (Self::point(ph, x, y), false),
                (Self::point(ph, x + w, y), false),
                (Self::point(ph, x + w, y + h), false),
                (Self::point(ph, x, y + h), false),
            ],
            is_closed: true,
        });
        Ok(())
    }

    fn draw_label(&mut self, text: &str, cx: f32, cy: f32, size_pt: f32) -> Result<(), DocumentError> {
        let open = self.current()?;
        // Helvetica Bold averages a little over half an em per glyph
        let width_mm = text.chars().count() as f32 * size_pt * 0.6 / PT_PER_MM;
        let cap_mm = size_pt * 0.7 / PT_PER_MM;
        open.layer.use_text(
            text,
            size_pt,
            Mm(cx - width_mm / 2.0),
            Mm(open.page_height - cy - cap_mm / 2.0),
            &open.font,
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn finish(self) -> Result<Vec<u8>, DocumentError> {
        let open = self.open.ok_or(DocumentError::NoPage)?;
        let mut writer = BufWriter::new(Vec::new());
        open.doc
            .save(&mut writer)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        writer.into_inner().map_err(|e| DocumentError::Pdf(e.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_flatten_on_white() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let flat = flatten_on_white(&img);
        assert_eq!(flat.get_pixel(0, 0), &RgbPixel([255, 255, 255]));
        assert_eq!(flat.get_pixel(1, 0), &RgbPixel([0, 0, 0]));
    }

    #[test]
    fn test_drawing_before_page_fails() {
        let mut pdf = PdfSurface::new("test");
        assert!(matches!(
            pdf.draw_line((0.0, 0.0), (1.0, 1.0), 0.2, 180),
            Err(DocumentError::NoPage)
        ));
        assert!(matches!(PdfSurface::new("empty").finish(), Err(DocumentError::NoPage)));
    }

    #[test]
    fn test_pdf_output() {
        let mut pdf = PdfSurface::new("test");
        pdf.add_page(215.9, 279.4).unwrap();
        pdf.place_image(&RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])), 10.0, 10.0, 63.0, 88.0)
            .unwrap();
        pdf.stroke_rect(10.0, 10.0, 63.0, 88.0, 0.3).unwrap();
        pdf.draw_label("1 FRONT", 41.5, 54.0, 14.0).unwrap();
        pdf.add_page(215.9, 279.4).unwrap();
        assert_eq!(pdf.page_count(), 2);

        let bytes = pdf.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
