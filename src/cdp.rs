//! Chrome DevTools Protocol host backend (uses the `headless_chrome` crate)
//!
//! Implements [`PageHost`] over a real page: frame geometry is read with
//! small JS evaluations, the viewport raster comes from the CDP screenshot
//! command, and the highlight marker is a fixed-position element injected
//! into the page.

use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;

use crate::error::{Error, Result};
use crate::geometry::{RawBounds, ScrollMode};
use crate::{HostConfig, PageHost};

const MARKER_ID: &str = "__frameshot_highlight";

/// CDP-backed page host.
///
/// Launches a headless Chrome instance, manages a single tab, and exposes
/// the frame enumeration/geometry/capture surface the pipeline needs.
pub struct CdpHost {
    _browser: Browser,
    tab: Arc<Tab>,
    config: HostConfig,
}

impl CdpHost {
    pub fn new(config: HostConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("failed to create tab: {}", e)))?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| Error::InitializationError(format!("failed to set user agent: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        Ok(Self {
            _browser: browser,
            tab,
            config,
        })
    }

    /// Navigate the tab and wait for the page, bounded by
    /// `HostConfig::timeout_ms`.
    pub fn load_url(&mut self, url: &str) -> Result<()> {
        let started = Instant::now();

        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("navigation failed: {}", e)))?;

        self.tab.wait_until_navigated().map_err(|e| {
            if started.elapsed() >= Duration::from_millis(self.config.timeout_ms) {
                Error::Timeout(self.config.timeout_ms)
            } else {
                Error::LoadError(format!("wait for navigation failed: {}", e))
            }
        })?;

        Ok(())
    }

    fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| Error::Other(format!("script evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn eval_f64(&self, script: &str) -> Result<f64> {
        self.eval(script)?
            .as_f64()
            .ok_or_else(|| Error::Other("expected a numeric evaluation result".into()))
    }
}

impl PageHost for CdpHost {
    fn frame_count(&mut self) -> Result<usize> {
        Ok(self.eval_f64("document.querySelectorAll('iframe').length")? as usize)
    }

    fn frame_source(&mut self, frame: usize) -> Result<Option<String>> {
        let value = self.eval(&format!(
            "(() => {{ const f = document.querySelectorAll('iframe')[{}]; \
             return f ? (f.src || '') : null; }})()",
            frame
        ))?;
        Ok(value.as_str().filter(|s| !s.is_empty()).map(str::to_string))
    }

    fn scroll_to_frame(&mut self, frame: usize, mode: ScrollMode) -> Result<bool> {
        let behavior = match mode {
            ScrollMode::Instant => "instant",
            ScrollMode::Smooth => "smooth",
        };
        let value = self.eval(&format!(
            "(() => {{ const f = document.querySelectorAll('iframe')[{}]; \
             if (!f) return false; \
             f.scrollIntoView({{behavior: '{}', block: 'center', inline: 'center'}}); \
             return true; }})()",
            frame, behavior
        ))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn frame_bounds(&mut self, frame: usize) -> Result<Option<RawBounds>> {
        let value = self.eval(&format!(
            "(() => {{ const f = document.querySelectorAll('iframe')[{}]; \
             if (!f) return null; const r = f.getBoundingClientRect(); \
             return JSON.stringify({{left: r.left, top: r.top, width: r.width, height: r.height}}); }})()",
            frame
        ))?;
        match value.as_str() {
            Some(json) => {
                let bounds: RawBounds = serde_json::from_str(json)
                    .map_err(|e| Error::Other(format!("malformed bounds payload: {}", e)))?;
                Ok(Some(bounds))
            }
            None => Ok(None),
        }
    }

    fn viewport_size(&mut self) -> Result<(f64, f64)> {
        let width = self.eval_f64("window.innerWidth")?;
        let height = self.eval_f64("window.innerHeight")?;
        Ok((width, height))
    }

    fn device_pixel_ratio(&mut self) -> Result<f64> {
        self.eval_f64("window.devicePixelRatio")
    }

    fn capture_viewport(&mut self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::Capture(format!("screenshot failed: {}", e)))
    }

    fn apply_highlight(&mut self, frame: usize) -> Result<()> {
        let value = self.eval(&format!(
            "(() => {{ const f = document.querySelectorAll('iframe')[{ordinal}]; \
             if (!f) return false; \
             let m = document.getElementById('{id}'); \
             if (!m) {{ m = document.createElement('div'); m.id = '{id}'; \
               m.style.position = 'fixed'; m.style.pointerEvents = 'none'; \
               m.style.border = '2px solid #ff5722'; m.style.zIndex = '2147483647'; \
               document.body.appendChild(m); }} \
             const r = f.getBoundingClientRect(); \
             m.style.left = r.left + 'px'; m.style.top = r.top + 'px'; \
             m.style.width = r.width + 'px'; m.style.height = r.height + 'px'; \
             return true; }})()",
            ordinal = frame,
            id = MARKER_ID
        ))?;
        if value.as_bool() != Some(true) {
            debug!("highlight target {} gone, marker not applied", frame);
        }
        Ok(())
    }

    fn clear_highlight(&mut self) -> Result<()> {
        self.eval(&format!(
            "(() => {{ const m = document.getElementById('{id}'); \
             if (m) m.remove(); return true; }})()",
            id = MARKER_ID
        ))?;
        Ok(())
    }
}
