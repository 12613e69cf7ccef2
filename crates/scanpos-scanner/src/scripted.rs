//! # Scripted Camera
//!
//! A camera backend that replays text frames, for running the terminal
//! without camera hardware and for tests.
//!
//! ## Script Format
//! ```text
//! # one frame per line; blank line = frame with no barcode
//! 4901234567054
//!
//!
//! 4902102072618
//! ```
//! Lines starting with `#` are skipped. Once the script is exhausted the
//! stream keeps producing empty frames until stopped, like a camera pointed
//! at nothing.
//!
//! ## Frame Styles
//! - [`FrameStyle::Text`]: the line itself is the frame payload, read back by
//!   [`TextFrameDecoder`].
//! - [`FrameStyle::Rendered`]: the line is drawn as a barcode image (blank
//!   lines as a white frame), read back by an image decoder such as
//!   [`ZxingDecoder`](crate::zxing::ZxingDecoder).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{CameraBackend, DecodeError, Frame, FrameDecoder, VideoStream};
use crate::device::CameraDevice;
use crate::error::{ScannerError, ScannerResult};
use crate::zxing::render_barcode;

/// Device id of the single scripted camera.
pub const SCRIPTED_DEVICE_ID: &str = "scripted-0";

/// Size of rendered frames.
const RENDER_WIDTH: u32 = 320;
const RENDER_HEIGHT: u32 = 120;

/// How script lines become frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameStyle {
    #[default]
    Text,
    Rendered,
}

/// File- or vector-backed camera.
#[derive(Debug, Clone)]
pub struct ScriptedCamera {
    devices: Vec<CameraDevice>,
    frames: Arc<Vec<String>>,
    interval: Duration,
    style: FrameStyle,
    enumeration_error: Option<String>,
}

impl ScriptedCamera {
    /// Creates a camera that replays `frames`, one every `interval`.
    pub fn new(frames: Vec<String>, interval: Duration) -> Self {
        ScriptedCamera {
            devices: vec![CameraDevice::video(SCRIPTED_DEVICE_ID, "Scripted camera (back)")],
            frames: Arc::new(frames),
            interval,
            style: FrameStyle::Text,
            enumeration_error: None,
        }
    }

    /// Loads frames from a script file.
    pub async fn from_file(path: impl AsRef<Path>, interval: Duration) -> ScannerResult<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let frames: Vec<String> = contents
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .map(|line| line.trim().to_string())
            .collect();
        debug!(path = ?path.as_ref(), frames = frames.len(), "Loaded scan script");
        Ok(Self::new(frames, interval))
    }

    /// Replaces the advertised device list.
    pub fn with_devices(mut self, devices: Vec<CameraDevice>) -> Self {
        self.devices = devices;
        self
    }

    /// Sets how script lines become frames.
    pub fn with_style(mut self, style: FrameStyle) -> Self {
        self.style = style;
        self
    }

    /// Makes enumeration fail with `reason`.
    pub fn with_enumeration_error(mut self, reason: impl Into<String>) -> Self {
        self.enumeration_error = Some(reason.into());
        self
    }
}

#[async_trait]
impl CameraBackend for ScriptedCamera {
    async fn enumerate_devices(&self) -> ScannerResult<Vec<CameraDevice>> {
        match &self.enumeration_error {
            Some(reason) => Err(ScannerError::Enumeration(reason.clone())),
            None => Ok(self.devices.clone()),
        }
    }

    async fn open(&self, device_id: &str) -> ScannerResult<Box<dyn VideoStream>> {
        if !self.devices.iter().any(|d| d.device_id == device_id) {
            return Err(ScannerError::Open {
                device: device_id.to_string(),
                reason: "unknown device".to_string(),
            });
        }
        Ok(Box::new(ScriptedStream {
            frames: self.frames.clone(),
            position: 0,
            interval: self.interval,
            style: self.style,
        }))
    }
}

struct ScriptedStream {
    frames: Arc<Vec<String>>,
    position: usize,
    interval: Duration,
    style: FrameStyle,
}

#[async_trait]
impl VideoStream for ScriptedStream {
    async fn next_frame(&mut self) -> ScannerResult<Option<Frame>> {
        tokio::time::sleep(self.interval).await;
        let text = self.frames.get(self.position).map(String::as_str).unwrap_or("");
        self.position += 1;
        let frame = match self.style {
            FrameStyle::Text => Frame::from_text(text),
            FrameStyle::Rendered if text.is_empty() => {
                Frame::blank(RENDER_WIDTH, RENDER_HEIGHT)
            }
            FrameStyle::Rendered => render_barcode(text, RENDER_WIDTH, RENDER_HEIGHT)?,
        };
        Ok(Some(frame))
    }

    async fn stop(&mut self) -> ScannerResult<()> {
        debug!(replayed = self.position.min(self.frames.len()), "Scripted stream stopped");
        Ok(())
    }
}

// =============================================================================
// Text Decoder
// =============================================================================

/// Decoder for text frames: the frame payload *is* the barcode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFrameDecoder;

impl FrameDecoder for TextFrameDecoder {
    fn decode(&self, frame: &Frame) -> Result<String, DecodeError> {
        let text = std::str::from_utf8(&frame.data)
            .map_err(|e| DecodeError::Format(e.to_string()))?
            .trim();
        if text.is_empty() {
            Err(DecodeError::NotFound)
        } else {
            Ok(text.to_string())
        }
    }
}
