//! Shared test host: a scripted page with synthetic frames and a
//! deterministic gradient capture.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use frameshot::error::Result;
use frameshot::{Error, PageHost, RawBounds, ScrollMode, SettleConfig};

/// Everything the pipeline did to the host, for assertions.
#[derive(Default)]
pub struct Recorder {
    pub scrolls: Vec<(usize, ScrollMode)>,
    pub captures: usize,
    pub applied: Vec<usize>,
    pub cleared: usize,
}

pub struct MockHost {
    /// Bounding box per frame ordinal; `None` marks a vanished frame.
    pub frames: Vec<Option<RawBounds>>,
    pub sources: Vec<Option<String>>,
    pub viewport: (f64, f64),
    pub dpr: f64,
    /// Payload for `capture_viewport`, or the verbatim failure message.
    pub capture_result: std::result::Result<Vec<u8>, String>,
    pub recorder: Arc<Mutex<Recorder>>,
}

impl MockHost {
    /// A host with one fully visible 200x100 frame at (10, 20) on a 2x
    /// display, backed by a 1600x1200 gradient capture.
    pub fn two_x_display() -> Self {
        Self {
            frames: vec![Some(RawBounds {
                left: 10.0,
                top: 20.0,
                width: 200.0,
                height: 100.0,
            })],
            sources: vec![Some("https://player.example.com/embed".to_string())],
            viewport: (800.0, 600.0),
            dpr: 2.0,
            capture_result: Ok(gradient_png(1600, 1200)),
            recorder: Arc::new(Mutex::new(Recorder::default())),
        }
    }
}

impl PageHost for MockHost {
    fn frame_count(&mut self) -> Result<usize> {
        Ok(self.frames.len())
    }

    fn frame_source(&mut self, frame: usize) -> Result<Option<String>> {
        Ok(self.sources.get(frame).cloned().flatten())
    }

    fn scroll_to_frame(&mut self, frame: usize, mode: ScrollMode) -> Result<bool> {
        self.recorder.lock().unwrap().scrolls.push((frame, mode));
        Ok(self.frames.get(frame).map(|f| f.is_some()).unwrap_or(false))
    }

    fn frame_bounds(&mut self, frame: usize) -> Result<Option<RawBounds>> {
        Ok(self.frames.get(frame).copied().flatten())
    }

    fn viewport_size(&mut self) -> Result<(f64, f64)> {
        Ok(self.viewport)
    }

    fn device_pixel_ratio(&mut self) -> Result<f64> {
        Ok(self.dpr)
    }

    fn capture_viewport(&mut self) -> Result<Vec<u8>> {
        self.recorder.lock().unwrap().captures += 1;
        match &self.capture_result {
            Ok(png) => Ok(png.clone()),
            Err(message) => Err(Error::Capture(message.clone())),
        }
    }

    fn apply_highlight(&mut self, frame: usize) -> Result<()> {
        self.recorder.lock().unwrap().applied.push(frame);
        Ok(())
    }

    fn clear_highlight(&mut self) -> Result<()> {
        self.recorder.lock().unwrap().cleared += 1;
        Ok(())
    }
}

/// Deterministic gradient image so crops can be checked pixel for pixel.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// Settle timing short enough for tests.
pub fn fast_settle() -> SettleConfig {
    SettleConfig {
        frame_interval_ms: 1,
        settle_delay_ms: 5,
        max_wait_ms: 100,
    }
}
