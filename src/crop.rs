//! Lossless crop of a frame's pixels out of a full-viewport capture.
//!
//! The captured raster is produced at `device_pixel_ratio` times the CSS
//! viewport size, so the CSS-pixel rect is scaled into raster space before
//! the pixel copy. No resampling or filtering happens anywhere on this
//! path; the output PNG is pixel-exact for re-display and export.

use crate::error::{Error, Result};
use crate::geometry::ViewportRect;
use crate::RasterImage;

/// Crop the region described by `rect` out of an encoded full-viewport
/// capture.
///
/// Fails with [`Error::Decode`] if the payload is not a decodable image and
/// with [`Error::OutOfBounds`] if the rect, after scaling and clamping,
/// covers no pixels of the source. The crop never reads outside the source
/// image: requested extents are clamped down to what is available.
pub fn crop(png_data: &[u8], rect: &ViewportRect) -> Result<RasterImage> {
    let decoded = image::load_from_memory(png_data).map_err(|e| Error::Decode(e.to_string()))?;
    let source = decoded.to_rgba8();

    let dpr = rect.device_pixel_ratio;
    let src_x = (rect.x * dpr).round().max(0.0) as u32;
    let src_y = (rect.y * dpr).round().max(0.0) as u32;
    let want_w = (rect.width * dpr).round().max(0.0) as u32;
    let want_h = (rect.height * dpr).round().max(0.0) as u32;

    let width = want_w.min(source.width().saturating_sub(src_x));
    let height = want_h.min(source.height().saturating_sub(src_y));
    if width == 0 || height == 0 {
        return Err(Error::OutOfBounds);
    }

    let cropped = image::imageops::crop_imm(&source, src_x, src_y, width, height).to_image();

    let mut png = Vec::new();
    cropped
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::Other(format!("failed to encode cropped image: {}", e)))?;

    Ok(RasterImage {
        width,
        height,
        png_data: png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Deterministic gradient so pixel identity survives the round trip.
    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        png
    }

    fn rect(x: f64, y: f64, w: f64, h: f64, dpr: f64) -> ViewportRect {
        ViewportRect {
            x,
            y,
            width: w,
            height: h,
            full_width: w,
            full_height: h,
            device_pixel_ratio: dpr,
        }
    }

    #[test]
    fn crop_scales_css_rect_by_device_pixel_ratio() {
        // 200x100 CSS rect at (10, 20) with dpr 2 inside a 1600x1200 capture
        // must come out as 400x200 raster pixels taken at offset (20, 40).
        let png = gradient_png(1600, 1200);
        let out = crop(&png, &rect(10.0, 20.0, 200.0, 100.0, 2.0)).unwrap();
        assert_eq!((out.width, out.height), (400, 200));

        let pixels = image::load_from_memory(&out.png_data).unwrap().to_rgba8();
        // Top-left of the crop is source pixel (20, 40).
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([20, 40, 60, 255]));
        // An interior pixel maps back by the same offset.
        assert_eq!(pixels.get_pixel(100, 50), &Rgba([120, 90, 210, 255]));
    }

    #[test]
    fn crop_preserves_pixels_at_dpr_one() {
        let png = gradient_png(300, 200);
        let out = crop(&png, &rect(50.0, 60.0, 40.0, 30.0, 1.0)).unwrap();
        assert_eq!((out.width, out.height), (40, 30));
        let pixels = image::load_from_memory(&out.png_data).unwrap().to_rgba8();
        for (x, y) in [(0u32, 0u32), (39, 29), (17, 11)] {
            assert_eq!(pixels.get_pixel(x, y), &Rgba([((50 + x) % 256) as u8, ((60 + y) % 256) as u8, ((110 + x + y) % 256) as u8, 255]));
        }
    }

    #[test]
    fn crop_clamps_to_source_bounds() {
        // Rect extends 100 CSS px past the right edge of a 400x300 capture.
        let png = gradient_png(400, 300);
        let out = crop(&png, &rect(350.0, 250.0, 150.0, 150.0, 1.0)).unwrap();
        assert_eq!((out.width, out.height), (50, 50));
    }

    #[test]
    fn crop_entirely_outside_fails_with_out_of_bounds() {
        let png = gradient_png(400, 300);
        let err = crop(&png, &rect(500.0, 0.0, 50.0, 50.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds));
    }

    #[test]
    fn zero_extent_rect_fails_with_out_of_bounds() {
        let png = gradient_png(400, 300);
        let err = crop(&png, &rect(10.0, 10.0, 0.0, 40.0, 2.0)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds));
    }

    #[test]
    fn garbage_payload_fails_with_decode_error() {
        let err = crop(b"not a png", &rect(0.0, 0.0, 10.0, 10.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn fractional_css_coordinates_round_to_nearest_raster_pixel() {
        let png = gradient_png(200, 200);
        let out = crop(&png, &rect(10.4, 10.6, 20.3, 20.5, 1.0)).unwrap();
        assert_eq!((out.width, out.height), (20, 21));
        let pixels = image::load_from_memory(&out.png_data).unwrap().to_rgba8();
        assert_eq!(pixels.get_pixel(0, 0), &Rgba([10, 11, 21, 255]));
    }
}
