//! Debounced hover highlight over a frame in the host page.
//!
//! Cosmetic and independent of the capture pipeline: every host failure on
//! this path is logged and swallowed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::geometry::ScrollMode;
use crate::{CancelToken, PageHost};

const DEBOUNCE_MS: u64 = 80;
const REPOSITION_DELAY_MS: u64 = 200;

/// Paints and removes a transient visual marker over a frame.
///
/// `show` is debounced on a single pending generation: rapid hover
/// transitions across many frames result in at most one host mutation, for
/// the most recent frame.
pub struct HighlightOverlay<H: PageHost + Send + 'static> {
    host: Arc<Mutex<H>>,
    generation: Arc<AtomicU64>,
    cancel: CancelToken,
    debounce: Duration,
    reposition_delay: Duration,
}

impl<H: PageHost + Send + 'static> Clone for HighlightOverlay<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            generation: self.generation.clone(),
            cancel: self.cancel.clone(),
            debounce: self.debounce,
            reposition_delay: self.reposition_delay,
        }
    }
}

impl<H: PageHost + Send + 'static> HighlightOverlay<H> {
    pub fn new(host: Arc<Mutex<H>>, cancel: CancelToken) -> Self {
        Self {
            host,
            generation: Arc::new(AtomicU64::new(0)),
            cancel,
            debounce: Duration::from_millis(DEBOUNCE_MS),
            reposition_delay: Duration::from_millis(REPOSITION_DELAY_MS),
        }
    }

    /// Shorter timers for tests.
    #[cfg(test)]
    fn with_timing(mut self, debounce: Duration, reposition_delay: Duration) -> Self {
        self.debounce = debounce;
        self.reposition_delay = reposition_delay;
        self
    }

    /// Request the marker over `frame` after the debounce window.
    ///
    /// Only the most recent `show` within the window executes. The frame is
    /// smooth-scrolled into view and the marker is positioned after an
    /// additional settle wait so it lands on the post-scroll bounds.
    /// Must be called from within a tokio runtime.
    pub fn show(&self, frame: usize) {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let this = self.clone();
        tokio::spawn(async move {
            sleep(this.debounce).await;
            if this.is_stale(token) {
                return;
            }
            {
                let mut host = this.host.lock().await;
                match host.scroll_to_frame(frame, ScrollMode::Smooth) {
                    Ok(true) => {}
                    Ok(false) => return,
                    Err(e) => {
                        debug!("highlight scroll failed: {}", e);
                        return;
                    }
                }
            }
            // Let the smooth scroll land before positioning the marker.
            sleep(this.reposition_delay).await;
            if this.is_stale(token) {
                return;
            }
            let mut host = this.host.lock().await;
            if let Err(e) = host.apply_highlight(frame) {
                debug!("highlight apply failed: {}", e);
            }
        });
    }

    /// Remove the marker and invalidate any pending `show`.
    ///
    /// Idempotent; safe to call with nothing shown, and called on teardown
    /// so no marker outlives its controller.
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut host = self.host.lock().await;
        if let Err(e) = host.clear_highlight() {
            debug!("highlight clear failed: {}", e);
        }
    }

    fn is_stale(&self, token: u64) -> bool {
        self.cancel.is_cancelled() || self.generation.load(Ordering::SeqCst) != token
    }
}
