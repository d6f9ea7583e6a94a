//! Rubber-band selection geometry and zoom.
//!
//! The view shows the current page scaled by [`Zoom::scale`]. A drag in view
//! coordinates becomes a [`ViewRect`], which maps back to image pixels as a
//! [`CropRect`].

use serde::{Deserialize, Serialize};

use crate::config::{SelectionLimits, ZoomConfig};

/// Rectangle in view (scaled) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    /// Normalize a drag from `start` to `end`; negative coordinates are
    /// clamped to the view origin.
    pub fn from_drag(start: (f64, f64), end: (f64, f64)) -> Self {
        let x0 = start.0.min(end.0).max(0.0);
        let y0 = start.1.min(end.1).max(0.0);
        let x1 = start.0.max(end.0).max(0.0);
        let y1 = start.1.max(end.1).max(0.0);
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Map to image pixels at `scale`. Returns `None` when the selection is
    /// smaller than `limits` once unscaled.
    pub fn to_crop(&self, scale: f64, limits: &SelectionLimits) -> Option<CropRect> {
        if scale <= 0.0 || !scale.is_finite() {
            return None;
        }
        let width = self.width / scale;
        let height = self.height / scale;
        if width < f64::from(limits.min_width) || height < f64::from(limits.min_height) {
            return None;
        }
        let x = (self.x / scale) as u32;
        let y = (self.y / scale) as u32;
        let x2 = (f64::from(x) + width) as u32;
        let y2 = (f64::from(y) + height) as u32;
        Some(CropRect {
            x,
            y,
            width: x2 - x,
            height: y2 - y,
        })
    }
}

impl CropRect {
    /// Intersect with an image of `width` x `height`; `None` if nothing
    /// remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<CropRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(CropRect {
            x: self.x,
            y: self.y,
            width: w,
            height: h,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
    config: ZoomConfig,
}

impl Zoom {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            scale: config.default,
            config,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Add `delta / wheel_delta` to the scale, clamped to the configured
    /// range.
    pub fn apply_wheel(&mut self, delta: f64) -> f64 {
        self.scale = (self.scale + delta / self.config.wheel_delta)
            .clamp(self.config.min, self.config.max);
        self.scale
    }

    pub fn reset(&mut self) {
        self.scale = self.config.default;
    }

    /// Displayed size of an image at the current scale.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            (self.scale * f64::from(width)) as u32,
            (self.scale * f64::from(height)) as u32,
        )
    }
}
