//! frameshot
//!
//! Locates an embedded frame inside a rendered page, scrolls it into view,
//! captures the visible viewport as a raster image, and losslessly crops out
//! exactly the frame's pixels, compensating for device pixel ratio, partial
//! off-screen clipping, and asynchronous scroll/layout settling. A zoom/pan
//! transform engine supports inspecting the cropped result at any scale.
//!
//! # Features
//!
//! - **CDP Backend** (`cdp`): drives a real page through headless Chrome
//! - **Host Seam**: everything page-side sits behind the [`PageHost`] trait,
//!   so the pipeline runs against any backend, including test doubles
//!
//! # Example
//!
//! ```no_run
//! use frameshot::{Session, SettleConfig};
//!
//! # async fn demo(host: impl frameshot::PageHost + Send + 'static) -> frameshot::Result<()> {
//! let session = Session::new(host, SettleConfig::default());
//! let image = session.capture(0).await?;
//! println!("captured {}x{} frame", image.width, image.height);
//! session.teardown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod geometry;
pub use geometry::{RawBounds, ScrollMode, ViewportRect};

pub mod crop;
pub mod export;
pub mod overlay;
pub mod resolver;
pub mod viewer;

pub mod orchestrator;
pub use orchestrator::{CaptureOrchestrator, CaptureState, Session};

// CDP-backed host (requires a Chrome installation at runtime)
#[cfg(feature = "cdp")]
pub mod cdp;
#[cfg(feature = "cdp")]
pub use cdp::CdpHost;

/// Viewport dimensions for host backends that create their own window
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Configuration for host backends
///
/// The defaults are conservative: a short page-load bound (8 s) so an
/// embedded page that never finishes loading surfaces as a failure instead
/// of hanging the session.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// User agent string the backend identifies as
    pub user_agent: String,
    /// Viewport dimensions for the backend's window
    pub viewport: Viewport,
    /// Wall-clock bound for page loads in milliseconds
    pub timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 frameshot/0.1"
                .to_string(),
            viewport: Viewport::default(),
            timeout_ms: 8000,
        }
    }
}

/// Timing knobs for the post-scroll settle wait
///
/// Scroll completion and the following layout/paint are not synchronously
/// observable, so the resolver waits `settle_delay_ms`, then polls the
/// target's bounding box once per `frame_interval_ms` until two consecutive
/// reads agree, giving up after `max_wait_ms`.
#[derive(Debug, Clone, Copy)]
pub struct SettleConfig {
    /// Approximate duration of one rendering frame
    pub frame_interval_ms: u64,
    /// Minimum wait after issuing a scroll before reading geometry
    pub settle_delay_ms: u64,
    /// Upper bound on the whole settle wait
    pub max_wait_ms: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            settle_delay_ms: 200,
            max_wait_ms: 1000,
        }
    }
}

/// An immutable cropped or captured raster image
///
/// `png_data` holds the lossless encoded form used for re-display and file
/// export; `width`/`height` are its pixel dimensions (always >= 1).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// One embedded frame discovered in the host page
///
/// The ordinal is stable only within one scan session; a page mutation can
/// change what it resolves to, or make it resolve to nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInfo {
    pub ordinal: usize,
    /// The frame's source URL, if the host exposes one
    pub source: Option<String>,
}

/// Host-page collaborator interface consumed by the capture pipeline
///
/// All geometry is read live on every call; implementations must not cache
/// bounds across calls, because the page can mutate between them. The
/// highlight operations are cosmetic and must be idempotent both ways.
pub trait PageHost {
    /// Number of embedded frames currently in the page
    fn frame_count(&mut self) -> Result<usize>;

    /// Source URL of a frame, `None` if the frame no longer exists
    fn frame_source(&mut self, frame: usize) -> Result<Option<String>>;

    /// Scroll a frame into view, centered both axes.
    /// Returns `false` when the frame no longer exists.
    fn scroll_to_frame(&mut self, frame: usize, mode: ScrollMode) -> Result<bool>;

    /// Unclipped bounding box of a frame relative to the viewport,
    /// `None` if the frame no longer exists
    fn frame_bounds(&mut self, frame: usize) -> Result<Option<RawBounds>>;

    /// Current viewport size in CSS pixels
    fn viewport_size(&mut self) -> Result<(f64, f64)>;

    /// Ratio of raster pixels to CSS pixels for the current display
    fn device_pixel_ratio(&mut self) -> Result<f64>;

    /// Capture the entire currently visible viewport as an encoded image.
    /// Single opaque call; a failure is surfaced verbatim, with no retry.
    fn capture_viewport(&mut self) -> Result<Vec<u8>>;

    /// Paint (or re-position) the visual marker over a frame
    fn apply_highlight(&mut self, frame: usize) -> Result<()>;

    /// Remove the visual marker; must succeed when nothing is shown
    fn clear_highlight(&mut self) -> Result<()>;
}

/// Cooperative cancellation shared by the orchestrator and the overlay.
///
/// Cancellation is best-effort: in-flight host calls run to completion, but
/// pending work is dropped at the next suspension point and nothing further
/// is published.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_host_config() {
        let config = HostConfig::default();
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 720);
        assert_eq!(config.timeout_ms, 8000);
        assert!(config.user_agent.contains("frameshot"));
    }

    #[test]
    fn test_default_settle_config() {
        let settle = SettleConfig::default();
        assert_eq!(settle.settle_delay_ms, 200);
        assert!(settle.max_wait_ms >= settle.settle_delay_ms);
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
