//! Zoom-and-pan transform state for inspecting a cropped image.
//!
//! Pure 2D affine state (scale + translate) over one image at a time.
//! Screen point `p` shows image point `(p - translate) / scale`.

/// Smallest permitted zoom scale.
pub const MIN_SCALE: f64 = 0.05;
/// Largest permitted zoom scale.
pub const MAX_SCALE: f64 = 10.0;
/// Multiplicative zoom step for one wheel tick.
pub const WHEEL_STEP: f64 = 1.12;

/// The affine view transform, mutated only through [`ZoomPanEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

/// Maintains the view transform over the active image for a container of
/// known size.
#[derive(Debug, Clone)]
pub struct ZoomPanEngine {
    viewport_width: f64,
    viewport_height: f64,
    image_width: f64,
    image_height: f64,
    transform: ViewTransform,
    fit_scale: f64,
}

impl ZoomPanEngine {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            image_width: 0.0,
            image_height: 0.0,
            transform: ViewTransform {
                scale: 1.0,
                translate_x: 0.0,
                translate_y: 0.0,
            },
            fit_scale: 1.0,
        }
    }

    /// Install a new image and fit it to the container. Called whenever a
    /// capture becomes ready.
    pub fn reset(&mut self, image_width: u32, image_height: u32) {
        self.image_width = image_width as f64;
        self.image_height = image_height as f64;
        self.fit();
    }

    /// Convenience for the capture data flow: install a freshly cropped
    /// image and fit it.
    pub fn reset_image(&mut self, image: &crate::RasterImage) {
        self.reset(image.width, image.height);
    }

    /// Container resize; the transform is left alone until the next `fit`.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Scale the image to fully fit the container, centered, never
    /// upscaling past 1:1. Bound to double-click as the recovery action
    /// after free panning.
    pub fn fit(&mut self) {
        if self.image_width <= 0.0 || self.image_height <= 0.0 {
            self.fit_scale = 1.0;
            self.transform = ViewTransform {
                scale: 1.0,
                translate_x: 0.0,
                translate_y: 0.0,
            };
            return;
        }
        let scale = (self.viewport_width / self.image_width)
            .min(self.viewport_height / self.image_height)
            .min(1.0);
        self.fit_scale = scale;
        self.transform = ViewTransform {
            scale,
            translate_x: (self.viewport_width - self.image_width * scale) / 2.0,
            translate_y: (self.viewport_height - self.image_height * scale) / 2.0,
        };
    }

    /// Zoom by a factor anchored at the container center.
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_at_point(
            self.transform.scale * factor,
            self.viewport_width / 2.0,
            self.viewport_height / 2.0,
        );
    }

    /// One wheel tick at the cursor position.
    pub fn wheel_zoom(&mut self, zoom_in: bool, px: f64, py: f64) {
        let factor = if zoom_in { WHEEL_STEP } else { 1.0 / WHEEL_STEP };
        self.zoom_at_point(self.transform.scale * factor, px, py);
    }

    /// Set the scale while keeping the image point currently under
    /// `(px, py)` fixed at `(px, py)`.
    pub fn zoom_at_point(&mut self, new_scale: f64, px: f64, py: f64) {
        let new_scale = new_scale.clamp(MIN_SCALE, MAX_SCALE);
        // Anchor in image space, read with the old scale.
        let img_x = (px - self.transform.translate_x) / self.transform.scale;
        let img_y = (py - self.transform.translate_y) / self.transform.scale;
        self.transform = ViewTransform {
            scale: new_scale,
            translate_x: px - img_x * new_scale,
            translate_y: py - img_y * new_scale,
        };
    }

    /// Drag pan by a cursor delta. Unclamped: the image can be pushed fully
    /// off the container, with `fit` as the way back.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn fit_scale(&self) -> f64 {
        self.fit_scale
    }
}
