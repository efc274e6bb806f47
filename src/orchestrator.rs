//! Capture orchestration: sequences geometry resolution, viewport capture
//! and cropping, and publishes observable state.
//!
//! Overlapping `capture()` calls are resolved last-write-wins: every call
//! takes a fresh request token, the token is re-checked after each
//! suspension point, and a call that is no longer the newest drops its
//! result silently instead of publishing it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use tokio::sync::{watch, Mutex};

use crate::crop;
use crate::error::{Error, Result};
use crate::geometry::ScrollMode;
use crate::overlay::HighlightOverlay;
use crate::resolver::GeometryResolver;
use crate::{CancelToken, FrameInfo, PageHost, RasterImage, SettleConfig};

/// Observable state of the capture pipeline.
///
/// Owned by the orchestrator; observers read it through a watch channel and
/// never mutate it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Locating,
    Capturing,
    Ready(RasterImage),
    Failed(String),
}

/// Sequences one capture at a time: resolve geometry, capture the viewport,
/// crop the frame's pixels out.
pub struct CaptureOrchestrator<H: PageHost> {
    host: Arc<Mutex<H>>,
    resolver: GeometryResolver,
    state_tx: watch::Sender<CaptureState>,
    counter: Arc<AtomicU64>,
    cancel: CancelToken,
}

impl<H: PageHost> Clone for CaptureOrchestrator<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            resolver: self.resolver,
            state_tx: self.state_tx.clone(),
            counter: self.counter.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<H: PageHost> CaptureOrchestrator<H> {
    pub fn new(host: Arc<Mutex<H>>, settle: SettleConfig, cancel: CancelToken) -> Self {
        let (state_tx, _) = watch::channel(CaptureState::Idle);
        Self {
            host,
            resolver: GeometryResolver::new(settle),
            state_tx,
            counter: Arc::new(AtomicU64::new(0)),
            cancel,
        }
    }

    /// Subscribe to pipeline state transitions.
    pub fn state(&self) -> watch::Receiver<CaptureState> {
        self.state_tx.subscribe()
    }

    /// Capture one frame: geometry, viewport capture, crop, in that strict
    /// order (the capture must reflect the already-scrolled page).
    ///
    /// Any step's failure short-circuits the rest and is published as
    /// `Failed` with a human-readable reason; a call superseded by a newer
    /// one returns [`Error::Superseded`] and publishes nothing further.
    /// Re-triggerable from `Ready` and `Failed`.
    pub async fn capture(&self, frame: usize) -> Result<RasterImage> {
        let token = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(token, CaptureState::Locating)?;

        let resolved = {
            let mut host = self.host.lock().await;
            match self.guard(token) {
                Ok(()) => {
                    self.resolver
                        .resolve(&mut *host, frame, ScrollMode::Instant)
                        .await
                }
                Err(e) => Err(e),
            }
        };
        let rect = match resolved {
            Ok(rect) => rect,
            Err(e) => return self.fail(token, e),
        };
        if !rect.is_capturable() {
            return self.fail(token, Error::ZeroSize);
        }

        self.publish(token, CaptureState::Capturing)?;
        let captured = {
            let mut host = self.host.lock().await;
            match self.guard(token) {
                Ok(()) => host.capture_viewport(),
                Err(e) => Err(e),
            }
        };
        let png = match captured {
            Ok(png) => png,
            Err(e) => return self.fail(token, e),
        };
        self.guard(token)?;

        // Decode and crop; the decode must complete before the crop can
        // read pixel dimensions.
        let image = match crop::crop(&png, &rect) {
            Ok(image) => image,
            Err(e) => return self.fail(token, e),
        };
        self.publish(token, CaptureState::Ready(image.clone()))?;
        Ok(image)
    }

    /// Err when this request is no longer the newest, or the session is
    /// tearing down.
    fn guard(&self, token: u64) -> Result<()> {
        if self.cancel.is_cancelled() || self.counter.load(Ordering::SeqCst) != token {
            debug!("dropping stale capture work (token {})", token);
            return Err(Error::Superseded);
        }
        Ok(())
    }

    fn publish(&self, token: u64, state: CaptureState) -> Result<()> {
        self.guard(token)?;
        self.state_tx.send_replace(state);
        Ok(())
    }

    fn fail(&self, token: u64, err: Error) -> Result<RasterImage> {
        if !matches!(err, Error::Superseded) {
            let _ = self.publish(token, CaptureState::Failed(err.to_string()));
        }
        Err(err)
    }
}

/// One capture session over a host page: an orchestrator and a highlight
/// overlay sharing the host and a single cancellation token.
pub struct Session<H: PageHost + Send + 'static> {
    host: Arc<Mutex<H>>,
    orchestrator: CaptureOrchestrator<H>,
    overlay: HighlightOverlay<H>,
    cancel: CancelToken,
}

impl<H: PageHost + Send + 'static> Session<H> {
    pub fn new(host: H, settle: SettleConfig) -> Self {
        let host = Arc::new(Mutex::new(host));
        let cancel = CancelToken::new();
        let orchestrator = CaptureOrchestrator::new(host.clone(), settle, cancel.clone());
        let overlay = HighlightOverlay::new(host.clone(), cancel.clone());
        Self {
            host,
            orchestrator,
            overlay,
            cancel,
        }
    }

    /// Enumerate the embedded frames currently in the page.
    pub async fn frames(&self) -> Result<Vec<FrameInfo>> {
        let mut host = self.host.lock().await;
        let count = host.frame_count()?;
        let mut frames = Vec::with_capacity(count);
        for ordinal in 0..count {
            frames.push(FrameInfo {
                ordinal,
                source: host.frame_source(ordinal)?,
            });
        }
        Ok(frames)
    }

    /// See [`CaptureOrchestrator::capture`].
    pub async fn capture(&self, frame: usize) -> Result<RasterImage> {
        self.orchestrator.capture(frame).await
    }

    /// Subscribe to capture pipeline state.
    pub fn capture_state(&self) -> watch::Receiver<CaptureState> {
        self.orchestrator.state()
    }

    /// Debounced hover highlight; see [`HighlightOverlay::show`].
    pub fn highlight(&self, frame: usize) {
        self.overlay.show(frame);
    }

    /// Remove the hover highlight. Safe when nothing is shown.
    pub async fn clear_highlight(&self) {
        self.overlay.clear().await;
    }

    /// Cancel pending work in both subsystems and clear any visible
    /// highlight so nothing leaks once the controller is gone.
    pub async fn teardown(&self) {
        self.cancel.cancel();
        self.overlay.clear().await;
    }
}
