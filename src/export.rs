//! File export: filename convention and persistence for captured frames.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use url::Url;

use crate::error::{Error, Result};
use crate::RasterImage;

/// Build the export filename: `<ordinal>_<domain-or-"iframe">_<timestamp>.png`.
///
/// The domain comes from the frame's source URL when one is present and
/// parseable; otherwise the literal `iframe` stands in.
pub fn export_filename(
    frame: usize,
    source_url: Option<&str>,
    timestamp: DateTime<Local>,
) -> String {
    let label = source_url
        .and_then(|s| Url::parse(s).ok())
        .and_then(|u| u.host_str().map(sanitize_label))
        .unwrap_or_else(|| "iframe".to_string());
    format!("{}_{}_{}.png", frame, label, timestamp.format("%Y%m%d-%H%M%S"))
}

/// Filesystem-safe label: anything outside alphanumerics and dots becomes
/// a dash.
fn sanitize_label(host: &str) -> String {
    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
        .collect()
}

/// Persist an exported image under `dir`, returning the written path.
pub fn save(dir: &Path, filename: &str, image: &RasterImage) -> Result<PathBuf> {
    let path = dir.join(filename);
    std::fs::write(&path, &image.png_data)
        .map_err(|e| Error::Other(format!("failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}
