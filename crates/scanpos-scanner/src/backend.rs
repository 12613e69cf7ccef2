//! # Camera and Decoder Traits
//!
//! The external collaborators of the scanner. Camera access and barcode
//! decoding are provided by platform / third-party code; the adapter only
//! drives them.

use async_trait::async_trait;
use thiserror::Error;

use crate::device::CameraDevice;
use crate::error::ScannerResult;

// =============================================================================
// Frames
// =============================================================================

/// Layout of [`Frame::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit grayscale, row-major, `width * height` bytes.
    Luma8,

    /// UTF-8 payload; the bytes are the barcode text.
    Text,
}

/// One captured video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Frame {
    /// A grayscale frame.
    pub fn luma(data: Vec<u8>, width: u32, height: u32) -> Self {
        Frame {
            data,
            width,
            height,
            format: PixelFormat::Luma8,
        }
    }

    /// An all-white grayscale frame (camera pointed at nothing).
    pub fn blank(width: u32, height: u32) -> Self {
        Self::luma(vec![u8::MAX; width as usize * height as usize], width, height)
    }

    /// A single-row frame whose payload is UTF-8 text.
    pub fn from_text(text: &str) -> Self {
        Frame {
            data: text.as_bytes().to_vec(),
            width: text.len() as u32,
            height: 1,
            format: PixelFormat::Text,
        }
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Media device access.
#[async_trait]
pub trait CameraBackend: Send + Sync {
    /// Lists every media device the platform exposes (not only cameras).
    async fn enumerate_devices(&self) -> ScannerResult<Vec<CameraDevice>>;

    /// Opens a video stream on the given device.
    async fn open(&self, device_id: &str) -> ScannerResult<Box<dyn VideoStream>>;
}

/// A running camera stream.
#[async_trait]
pub trait VideoStream: Send {
    /// Waits for the next frame. `Ok(None)` means the stream ended.
    async fn next_frame(&mut self) -> ScannerResult<Option<Frame>>;

    /// Releases the camera.
    async fn stop(&mut self) -> ScannerResult<()>;
}

// =============================================================================
// Decoder
// =============================================================================

/// Why a frame produced no code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// No barcode in this frame. Expected on most frames.
    #[error("No barcode found in frame")]
    NotFound,

    /// A barcode was located but failed its checksum.
    #[error("Checksum mismatch")]
    Checksum,

    /// A barcode was located but could not be read.
    #[error("Format error: {0}")]
    Format(String),
}

/// Barcode decoder for single frames.
pub trait FrameDecoder: Send + Sync {
    /// Returns the decoded text of the first barcode in `frame`.
    fn decode(&self, frame: &Frame) -> Result<String, DecodeError>;
}
