//! Crop viewport transform
//!
//! Keeps a scale + offset pair mapping source image pixels into a fixed
//! viewport. The image always covers the whole viewport: the scale never
//! drops below the cover scale and offsets are clamped after every change.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Maximum zoom relative to the cover scale
const MAX_ZOOM: f64 = 4.0;

/// Per-notch wheel zoom factors
const WHEEL_ZOOM_OUT: f64 = 0.95;
const WHEEL_ZOOM_IN: f64 = 1.05;

/// Crop errors
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    #[error("No image loaded")]
    NotLoaded,
    #[error("Invalid dimensions: image {0}x{1}, viewport {2}x{3}")]
    InvalidDimensions(f64, f64, f64, f64),
}

/// Source-space rectangle visible in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Scale bounds and current transform for a loaded image
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    natural_w: f64,
    natural_h: f64,
    min_scale: f64,
    max_scale: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Scale and offset captured when a pinch gesture starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Pan/zoom state for one loaded image
#[derive(Debug, Clone, Default)]
pub struct CropTransform {
    viewport_w: f64,
    viewport_h: f64,
    fit: Option<Fit>,
    pinch: Option<PinchBaseline>,
}

impl CropTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image of the given natural size into a viewport
    ///
    /// Starts at the cover scale with the image centered.
    pub fn initialize(
        &mut self,
        natural_w: f64,
        natural_h: f64,
        viewport_w: f64,
        viewport_h: f64,
    ) -> Result<(), CropError> {
        let valid = [natural_w, natural_h, viewport_w, viewport_h]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !valid {
            return Err(CropError::InvalidDimensions(natural_w, natural_h, viewport_w, viewport_h));
        }

        let min_scale = (viewport_w / natural_w).max(viewport_h / natural_h);
        self.viewport_w = viewport_w;
        self.viewport_h = viewport_h;
        self.pinch = None;
        self.fit = Some(Fit {
            natural_w,
            natural_h,
            min_scale,
            max_scale: min_scale * MAX_ZOOM,
            scale: min_scale,
            offset_x: (viewport_w - natural_w * min_scale) / 2.0,
            offset_y: (viewport_h - natural_h * min_scale) / 2.0,
        });
        Ok(())
    }

    /// Drop the loaded image
    pub fn reset(&mut self) {
        self.fit = None;
        self.pinch = None;
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.fit.is_some()
    }

    pub fn scale(&self) -> Option<f64> {
        self.fit.map(|f| f.scale)
    }

    /// (min, max) allowed scale
    pub fn scale_bounds(&self) -> Option<(f64, f64)> {
        self.fit.map(|f| (f.min_scale, f.max_scale))
    }

    #[cfg(test)]
    pub fn offset(&self) -> Option<(f64, f64)> {
        self.fit.map(|f| (f.offset_x, f.offset_y))
    }

    /// Move the image by a pointer delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (vw, vh) = (self.viewport_w, self.viewport_h);
        if let Some(fit) = self.fit.as_mut() {
            fit.offset_x += dx;
            fit.offset_y += dy;
            fit.clamp(vw, vh);
        }
    }

    /// Zoom by `factor` keeping the viewport point under the anchor fixed
    pub fn zoom_at(&mut self, anchor_x: f64, anchor_y: f64, factor: f64) {
        if let Some(fit) = self.fit {
            self.zoom_to(anchor_x, anchor_y, fit.scale * factor);
        }
    }

    /// Mouse wheel: positive delta zooms out, anything else zooms in
    pub fn wheel(&mut self, anchor_x: f64, anchor_y: f64, delta_y: f64) {
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        self.zoom_at(anchor_x, anchor_y, factor);
    }

    /// Zoom slider, 0 = cover scale, 100 = max scale; anchored at the center
    pub fn set_slider(&mut self, value: f64) {
        if let Some(fit) = self.fit {
            let value = value.clamp(0.0, 100.0);
            let target = fit.min_scale + (value / 100.0) * (fit.max_scale - fit.min_scale);
            self.zoom_to(self.viewport_w / 2.0, self.viewport_h / 2.0, target);
        }
    }

    /// Current scale as a slider position
    pub fn slider_value(&self) -> Option<f64> {
        self.fit
            .map(|f| (f.scale - f.min_scale) / (f.max_scale - f.min_scale) * 100.0)
    }

    /// Capture the baseline for a pinch gesture
    pub fn begin_pinch(&mut self) {
        self.pinch = self.fit.map(|f| PinchBaseline {
            scale: f.scale,
            offset_x: f.offset_x,
            offset_y: f.offset_y,
        });
    }

    /// Apply a pinch relative to the gesture baseline
    ///
    /// `distance_ratio` is current finger distance over the distance at
    /// gesture start, so repeated move events never compound.
    pub fn pinch(&mut self, distance_ratio: f64, mid_x: f64, mid_y: f64) {
        if self.pinch.is_none() {
            self.begin_pinch();
        }
        let (Some(base), Some(fit)) = (self.pinch, self.fit.as_mut()) else {
            return;
        };

        let new_scale = (base.scale * distance_ratio).clamp(fit.min_scale, fit.max_scale);
        let ratio = new_scale / base.scale;
        fit.offset_x = mid_x - (mid_x - base.offset_x) * ratio;
        fit.offset_y = mid_y - (mid_y - base.offset_y) * ratio;
        fit.scale = new_scale;
        fit.clamp(self.viewport_w, self.viewport_h);
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    /// The viewport changed size; re-derive the bounds and re-clamp
    pub fn resize_viewport(&mut self, viewport_w: f64, viewport_h: f64) {
        if !(viewport_w.is_finite() && viewport_h.is_finite() && viewport_w > 0.0 && viewport_h > 0.0) {
            return;
        }
        self.viewport_w = viewport_w;
        self.viewport_h = viewport_h;
        if let Some(fit) = self.fit.as_mut() {
            fit.min_scale = (viewport_w / fit.natural_w).max(viewport_h / fit.natural_h);
            fit.max_scale = fit.min_scale * MAX_ZOOM;
            fit.scale = fit.scale.clamp(fit.min_scale, fit.max_scale);
            fit.clamp(viewport_w, viewport_h);
        }
    }

    /// Source-space rectangle currently visible
    pub fn crop_rect(&self) -> Result<CropRect, CropError> {
        let fit = self.fit.ok_or(CropError::NotLoaded)?;
        Ok(CropRect {
            x: -fit.offset_x / fit.scale,
            y: -fit.offset_y / fit.scale,
            w: self.viewport_w / fit.scale,
            h: self.viewport_h / fit.scale,
        })
    }

    fn zoom_to(&mut self, anchor_x: f64, anchor_y: f64, target_scale: f64) {
        let (vw, vh) = (self.viewport_w, self.viewport_h);
        if let Some(fit) = self.fit.as_mut() {
            let old = fit.scale;
            let new_scale = target_scale.clamp(fit.min_scale, fit.max_scale);
            let ratio = new_scale / old;
            fit.offset_x = anchor_x - (anchor_x - fit.offset_x) * ratio;
            fit.offset_y = anchor_y - (anchor_y - fit.offset_y) * ratio;
            fit.scale = new_scale;
            fit.clamp(vw, vh);
        }
    }
}

impl Fit {
    /// Keep the image edges outside the viewport edges
    fn clamp(&mut self, viewport_w: f64, viewport_h: f64) {
        let w = self.natural_w * self.scale;
        let h = self.natural_h * self.scale;
        self.offset_x = self.offset_x.max(viewport_w - w).min(0.0);
        self.offset_y = self.offset_y.max(viewport_h - h).min(0.0);
    }
}

/// One recorded user interaction, replayed onto a [`CropTransform`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CropOp {
    Pan { dx: f64, dy: f64 },
    ZoomAt { x: f64, y: f64, factor: f64 },
    Wheel { x: f64, y: f64, delta_y: f64 },
    Slider { value: f64 },
    BeginPinch,
    Pinch { ratio: f64, x: f64, y: f64 },
    EndPinch,
    ResizeViewport { width: f64, height: f64 },
}

impl CropTransform {
    /// Apply a recorded interaction
    pub fn apply(&mut self, op: CropOp) {
        match op {
            CropOp::Pan { dx, dy } => self.pan(dx, dy),
            CropOp::ZoomAt { x, y, factor } => self.zoom_at(x, y, factor),
            CropOp::Wheel { x, y, delta_y } => self.wheel(x, y, delta_y),
            CropOp::Slider { value } => self.set_slider(value),
            CropOp::BeginPinch => self.begin_pinch(),
            CropOp::Pinch { ratio, x, y } => self.pinch(ratio, x, y),
            CropOp::EndPinch => self.end_pinch(),
            CropOp::ResizeViewport { width, height } => self.resize_viewport(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn loaded(nw: f64, nh: f64, vw: f64, vh: f64) -> CropTransform {
        let mut crop = CropTransform::new();
        crop.initialize(nw, nh, vw, vh).unwrap();
        crop
    }

    fn assert_contained(crop: &CropTransform, nw: f64, nh: f64) {
        let r = crop.crop_rect().unwrap();
        assert!(r.x >= -EPS, "x {} < 0", r.x);
        assert!(r.y >= -EPS, "y {} < 0", r.y);
        assert!(r.x + r.w <= nw + EPS, "right {} > {}", r.x + r.w, nw);
        assert!(r.y + r.h <= nh + EPS, "bottom {} > {}", r.y + r.h, nh);
    }

    fn assert_scale_in_bounds(crop: &CropTransform) {
        let (min, max) = crop.scale_bounds().unwrap();
        let s = crop.scale().unwrap();
        assert!(s >= min - EPS && s <= max + EPS, "scale {} outside [{}, {}]", s, min, max);
    }

    #[test]
    fn test_initialize_centers_at_cover_scale() {
        let crop = loaded(2000.0, 1000.0, 400.0, 400.0);
        assert!((crop.scale().unwrap() - 0.4).abs() < EPS);
        let (min, max) = crop.scale_bounds().unwrap();
        assert!((min - 0.4).abs() < EPS && (max - 1.6).abs() < EPS);
        let (ox, oy) = crop.offset().unwrap();
        assert!((ox - (-200.0)).abs() < EPS);
        assert!(oy.abs() < EPS);
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut crop = CropTransform::new();
        assert!(matches!(
            crop.initialize(0.0, 100.0, 10.0, 10.0),
            Err(CropError::InvalidDimensions(..))
        ));
        assert!(!crop.is_loaded());
    }

    #[test]
    fn test_not_loaded_is_noop_and_crop_rect_fails() {
        let mut crop = CropTransform::new();
        crop.pan(10.0, 10.0);
        crop.zoom_at(5.0, 5.0, 2.0);
        crop.pinch(2.0, 5.0, 5.0);
        assert_eq!(crop.crop_rect(), Err(CropError::NotLoaded));
    }

    #[test]
    fn test_pan_clamps_to_edges() {
        let mut crop = loaded(2000.0, 1000.0, 400.0, 400.0);
        crop.pan(1000.0, 50.0);
        assert_eq!(crop.offset(), Some((0.0, 0.0)));
        crop.pan(-5000.0, -50.0);
        // image is 800 wide at cover scale: leftmost offset is 400 - 800
        assert_eq!(crop.offset(), Some((-400.0, 0.0)));
        assert_contained(&crop, 2000.0, 1000.0);
    }

    #[test]
    fn test_zoom_preserves_anchor_point() {
        let mut crop = loaded(1200.0, 1600.0, 300.0, 400.0);
        crop.zoom_at(150.0, 200.0, 2.0);
        crop.pan(-37.0, 12.0);

        let (ax, ay) = (90.0, 310.0);
        let before = crop.crop_rect().unwrap();
        let s0 = crop.scale().unwrap();
        let src_before = (before.x + ax / s0, before.y + ay / s0);

        crop.zoom_at(ax, ay, 1.5);
        let after = crop.crop_rect().unwrap();
        let s1 = crop.scale().unwrap();
        let src_after = (after.x + ax / s1, after.y + ay / s1);

        assert!((src_before.0 - src_after.0).abs() < 1e-6);
        assert!((src_before.1 - src_after.1).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_clamps_scale() {
        let mut crop = loaded(1000.0, 1000.0, 250.0, 250.0);
        crop.zoom_at(0.0, 0.0, 100.0);
        assert!((crop.scale().unwrap() - 1.0).abs() < EPS);
        crop.zoom_at(0.0, 0.0, 0.001);
        assert!((crop.scale().unwrap() - 0.25).abs() < EPS);
        assert_contained(&crop, 1000.0, 1000.0);
    }

    #[test]
    fn test_pinch_uses_gesture_baseline() {
        let mut crop = loaded(1000.0, 1000.0, 200.0, 200.0);
        crop.begin_pinch();
        crop.pinch(1.5, 100.0, 100.0);
        crop.pinch(2.0, 100.0, 100.0);
        // ratios are relative to the start, not compounded
        assert!((crop.scale().unwrap() - 0.4).abs() < EPS);
        crop.end_pinch();

        crop.pinch(1.5, 100.0, 100.0);
        assert!((crop.scale().unwrap() - 0.6).abs() < EPS);
        assert_contained(&crop, 1000.0, 1000.0);
    }

    #[test]
    fn test_slider_round_trip() {
        let mut crop = loaded(800.0, 600.0, 400.0, 300.0);
        crop.set_slider(50.0);
        assert!((crop.slider_value().unwrap() - 50.0).abs() < 1e-9);
        assert!((crop.scale().unwrap() - 1.25).abs() < EPS);
    }

    #[test]
    fn test_resize_viewport_keeps_coverage() {
        let mut crop = loaded(1000.0, 500.0, 200.0, 100.0);
        crop.pan(-300.0, 0.0);
        crop.resize_viewport(400.0, 400.0);
        assert_scale_in_bounds(&crop);
        assert_contained(&crop, 1000.0, 500.0);
        let r = crop.crop_rect().unwrap();
        assert!((r.h - 500.0).abs() < EPS);
    }

    #[test]
    fn test_random_walk_invariants() {
        let sizes = [
            (4000.0, 3000.0, 745.0, 1040.0),
            (300.0, 300.0, 745.0, 1040.0),
            (1040.0, 745.0, 320.0, 448.0),
            (64.0, 2048.0, 200.0, 200.0),
        ];
        for (nw, nh, vw, vh) in sizes {
            let mut crop = loaded(nw, nh, vw, vh);
            let ops = [
                CropOp::ZoomAt { x: 10.0, y: 20.0, factor: 1.7 },
                CropOp::Pan { dx: -120.0, dy: 75.0 },
                CropOp::Wheel { x: vw, y: vh, delta_y: -3.0 },
                CropOp::Pinch { ratio: 3.3, x: vw / 3.0, y: vh / 4.0 },
                CropOp::Pan { dx: 9999.0, dy: -9999.0 },
                CropOp::EndPinch,
                CropOp::Slider { value: 100.0 },
                CropOp::ZoomAt { x: vw, y: 0.0, factor: 0.1 },
                CropOp::Pan { dx: -9999.0, dy: 9999.0 },
                CropOp::ResizeViewport { width: vw * 0.5, height: vh * 0.7 },
                CropOp::Wheel { x: 0.0, y: 0.0, delta_y: 1.0 },
            ];
            for op in ops {
                crop.apply(op);
                assert_scale_in_bounds(&crop);
                assert_contained(&crop, nw, nh);
            }
        }
    }

    #[test]
    fn test_crop_op_json() {
        let op: CropOp = serde_json::from_str(r#"{"op":"zoom_at","x":1.0,"y":2.0,"factor":1.5}"#).unwrap();
        assert_eq!(op, CropOp::ZoomAt { x: 1.0, y: 2.0, factor: 1.5 });
    }
}
