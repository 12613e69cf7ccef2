//! # Scanner Error Types

use thiserror::Error;

/// Result type alias for scanner operations.
pub type ScannerResult<T> = Result<T, ScannerError>;

/// Scanner failures.
///
/// The `Display` text of these errors is what the terminal shows in the
/// scanner panel, so messages are written for the operator.
#[derive(Debug, Error)]
pub enum ScannerError {
    /// Enumeration succeeded but no video input exists.
    #[error("No camera found")]
    NoCamera,

    /// The platform refused to list devices (permissions, no media stack).
    #[error("Could not list cameras: {0}")]
    Enumeration(String),

    /// The selected camera could not be opened.
    #[error("Could not open camera {device}: {reason}")]
    Open { device: String, reason: String },

    /// The video stream failed while running.
    #[error("Camera stream failed: {0}")]
    Stream(String),

    /// Stopping the camera failed. Logged, never surfaced.
    #[error("Camera cleanup failed: {0}")]
    Cleanup(String),

    /// I/O error (scripted camera file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
