//! Geometry resolution: force a frame into view, wait for layout to settle,
//! and read its visible intersection with the viewport.

use std::time::Duration;

use log::{debug, warn};
use tokio::time::{sleep, Instant};

use crate::error::{Error, Result};
use crate::geometry::{RawBounds, ScrollMode, ViewportRect};
use crate::{PageHost, SettleConfig};

/// Resolves a frame ordinal to its visible rect in the current viewport.
///
/// One resolution attempt per call, no retries. Resolving mutates the host
/// page's scroll position as a side effect.
#[derive(Debug, Clone, Copy)]
pub struct GeometryResolver {
    config: SettleConfig,
}

impl GeometryResolver {
    pub fn new(config: SettleConfig) -> Self {
        Self { config }
    }

    /// Scroll `frame` into view, wait until its bounding box stops moving,
    /// and return the visible intersection plus full size and device pixel
    /// ratio.
    ///
    /// The settle wait is a heuristic, not a guarantee: the box is polled
    /// once per frame interval until two consecutive reads agree, bounded
    /// by `max_wait_ms`. A page that keeps animating past the bound is
    /// read as-is, with a warning.
    pub async fn resolve<H: PageHost + ?Sized>(
        &self,
        host: &mut H,
        frame: usize,
        mode: ScrollMode,
    ) -> Result<ViewportRect> {
        if !host.scroll_to_frame(frame, mode)? {
            return Err(Error::NotFound);
        }

        let bounds = self.settle(host, frame).await?;

        let (viewport_width, viewport_height) = host.viewport_size()?;
        let dpr = host.device_pixel_ratio()?;
        let rect =
            ViewportRect::visible_intersection(bounds, viewport_width, viewport_height, dpr);
        debug!(
            "resolved frame {}: {}x{} at ({}, {}), dpr {}",
            frame, rect.width, rect.height, rect.x, rect.y, rect.device_pixel_ratio
        );
        Ok(rect)
    }

    /// Wait out the scroll and any follow-on layout, then return the
    /// settled bounding box.
    async fn settle<H: PageHost + ?Sized>(&self, host: &mut H, frame: usize) -> Result<RawBounds> {
        let frame_interval = Duration::from_millis(self.config.frame_interval_ms);
        let max_wait = Duration::from_millis(self.config.max_wait_ms);
        let started = Instant::now();

        // One frame boundary for the scroll to take effect, then the
        // configured floor before the first comparison.
        sleep(frame_interval).await;
        sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let mut prev = host.frame_bounds(frame)?.ok_or(Error::NotFound)?;
        loop {
            sleep(frame_interval).await;
            let next = host.frame_bounds(frame)?.ok_or(Error::NotFound)?;
            if next.approx_eq(&prev) {
                return Ok(next);
            }
            if started.elapsed() >= max_wait {
                warn!(
                    "frame {} bounding box still moving after {}ms, reading anyway",
                    frame, self.config.max_wait_ms
                );
                return Ok(next);
            }
            prev = next;
        }
    }
}
