//! Viewport geometry: raw frame bounds and the visible-intersection math
//! that turns them into a capturable rect.

use serde::{Deserialize, Serialize};

/// How a frame is scrolled into view.
///
/// Capture uses `Instant` because it must not wait out a smooth animation;
/// hover highlighting uses `Smooth` for a less jarring page jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Instant,
    Smooth,
}

/// Unclipped bounding box of a frame in CSS pixels, relative to the
/// viewport origin. Any component may be negative or extend past the
/// viewport when the frame is partially off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RawBounds {
    /// True when two reads of the same frame are close enough to call the
    /// layout settled. Sub-pixel jitter below half a CSS pixel is noise.
    pub fn approx_eq(&self, other: &RawBounds) -> bool {
        const TOLERANCE: f64 = 0.5;
        (self.left - other.left).abs() < TOLERANCE
            && (self.top - other.top).abs() < TOLERANCE
            && (self.width - other.width).abs() < TOLERANCE
            && (self.height - other.height).abs() < TOLERANCE
    }
}

/// The visible portion of a frame within the current viewport, in CSS
/// pixels, plus the frame's unclipped full size and the display's device
/// pixel ratio.
///
/// Invariants: `width` and `height` are never negative; a zero width or
/// height means the frame is not capturable right now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Full (possibly clipped) frame width, for UI sizing.
    pub full_width: f64,
    /// Full (possibly clipped) frame height, for UI sizing.
    pub full_height: f64,
    /// Ratio of raster pixels to CSS pixels, >= 1 on real displays.
    pub device_pixel_ratio: f64,
}

impl ViewportRect {
    /// Clamp a raw bounding box to the viewport.
    ///
    /// Off-screen extents clamp to zero, never negative, so callers can
    /// treat `width == 0 || height == 0` uniformly as "nothing visible".
    pub fn visible_intersection(
        bounds: RawBounds,
        viewport_width: f64,
        viewport_height: f64,
        device_pixel_ratio: f64,
    ) -> Self {
        let x = bounds.left.max(0.0);
        let y = bounds.top.max(0.0);
        let right = (bounds.left + bounds.width).min(viewport_width);
        let bottom = (bounds.top + bounds.height).min(viewport_height);

        Self {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
            full_width: bounds.width,
            full_height: bounds.height,
            device_pixel_ratio,
        }
    }

    /// Whether the rect encloses any pixels at all.
    pub fn is_capturable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
