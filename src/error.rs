//! Error types for the capture pipeline

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, capturing or cropping a frame
#[derive(Error, Debug)]
pub enum Error {
    /// The frame vanished between the scan and the action
    #[error("target not found")]
    NotFound,

    /// The resolved rect has zero width or height, nothing visible to capture
    #[error("target has zero visible size")]
    ZeroSize,

    /// The capture collaborator failed or returned no payload
    #[error("{0}")]
    Capture(String),

    /// The computed crop rectangle does not fit inside the captured image
    #[error("crop region outside captured image")]
    OutOfBounds,

    /// The raster payload could not be decoded before cropping
    #[error("failed to decode captured image: {0}")]
    Decode(String),

    /// Operation timed out
    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    /// The host backend could not be initialized
    #[error("host initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a URL into the host page
    #[error("failed to load URL: {0}")]
    LoadError(String),

    /// A newer capture request superseded this one before it finished
    #[error("capture superseded by a newer request")]
    Superseded,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Capture(err.to_string())
    }
}
