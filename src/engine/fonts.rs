//! Font loading and metrics
//!
//! All faces are parsed once at startup. Text measurement is only valid
//! after the book is built, so renderers take the book by reference and
//! never measure against a half-loaded set.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use rusttype::{Font, Scale};
use thiserror::Error;
use tracing::info;

use crate::config::FontSettings;

/// Font-related errors
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Not a usable TrueType/OpenType font: {0}")]
    Parse(String),
}

/// The faces the renderers draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Condensed bold for titles, headings and theme names
    HeadingBold,
    Body,
    BodyBold,
}

/// A face at a CSS-style pixel size (em size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub face: FontFace,
    pub size: f32,
}

impl FontSpec {
    pub fn new(face: FontFace, size: f32) -> Self {
        FontSpec { face, size }
    }
}

/// Parsed faces keyed by role
#[derive(Default)]
pub struct FontBook {
    faces: HashMap<FontFace, Font<'static>>,
}

impl FontBook {
    /// A book with no faces; text draws nothing and measures zero
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every configured face from disk
    pub fn load(settings: &FontSettings) -> Result<Self, FontError> {
        let mut book = FontBook::empty();
        book.load_face(FontFace::HeadingBold, &settings.heading_bold)?;
        book.load_face(FontFace::Body, &settings.body)?;
        book.load_face(FontFace::BodyBold, &settings.body_bold)?;
        Ok(book)
    }

    fn load_face(&mut self, face: FontFace, path: &Path) -> Result<(), FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.insert(face, bytes)
            .map_err(|_| FontError::Parse(path.display().to_string()))?;
        info!(face = ?face, path = %path.display(), "Loaded font");
        Ok(())
    }

    /// Register a face from raw font bytes
    pub fn insert(&mut self, face: FontFace, bytes: Vec<u8>) -> Result<(), FontError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| FontError::Parse(format!("{:?}", face)))?;
        self.faces.insert(face, font);
        Ok(())
    }

    pub fn get(&self, face: FontFace) -> Option<&Font<'static>> {
        self.faces.get(&face)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// rusttype scale for an em size in pixels
///
/// rusttype scales by ascent-to-descent height while canvas sizes are em
/// sizes, so convert through the font's own vertical metrics.
pub fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let vm = font.v_metrics_unscaled();
    let upem = font.units_per_em() as f32;
    let height = vm.ascent - vm.descent;
    if upem <= 0.0 || height <= 0.0 {
        return Scale::uniform(size);
    }
    Scale::uniform(size * height / upem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_font_file() {
        let settings = FontSettings {
            heading_bold: PathBuf::from("/nonexistent/heading.ttf"),
            body: PathBuf::from("/nonexistent/body.ttf"),
            body_bold: PathBuf::from("/nonexistent/body-bold.ttf"),
        };
        assert!(matches!(FontBook::load(&settings), Err(FontError::Io { .. })));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let mut book = FontBook::empty();
        assert!(matches!(
            book.insert(FontFace::Body, vec![0u8; 16]),
            Err(FontError::Parse(_))
        ));
        assert_eq!(book.face_count(), 0);
        assert!(book.get(FontFace::Body).is_none());
    }
}
