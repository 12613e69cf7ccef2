//! # scanpos-scanner: Camera Barcode Scanner Adapter
//!
//! Thin adapter around an external frame decoder. It picks a camera, runs one
//! long-lived decode loop, and hands every decoded string to a callback.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Scanner Adapter                                   │
//! │                                                                         │
//! │   Scanner::spawn(camera, decoder, options, on_decode)                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────────┐   enumerate    ┌────────────────┐                    │
//! │   │ decode task │ ─────────────► │ CameraBackend  │                    │
//! │   │ (tokio)     │   open(id)     │ (device list,  │                    │
//! │   │             │ ◄───────────── │  VideoStream)  │                    │
//! │   │             │                └────────────────┘                    │
//! │   │  frame ───────────────────►  ┌────────────────┐                    │
//! │   │             │   decode       │ FrameDecoder   │                    │
//! │   │             │ ◄─────────────  └────────────────┘                    │
//! │   │  Ok(text) ──┼──► on_decode(text)    (once per frame with a code)   │
//! │   │  NotFound ──┼──► (suppressed)                                       │
//! │   │  other    ──┼──► warn!                                              │
//! │   └─────────────┘                                                       │
//! │        │                                                                │
//! │   ScannerHandle: status (watch), stop()                                │
//! │                                                                         │
//! │   Status: Uninitialized → Starting → Streaming → (Error | Stopped)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`adapter`] - `Scanner`, `ScannerHandle`, `ScannerStatus`
//! - [`backend`] - Camera and decoder traits
//! - [`device`] - Camera device descriptions and selection
//! - [`scripted`] - File-driven camera and text decoder (no hardware)
//! - [`zxing`] - Image decoder backed by rxing
//! - [`error`] - Scanner error types

pub mod adapter;
pub mod backend;
pub mod device;
pub mod error;
pub mod scripted;
pub mod zxing;

pub use adapter::{Scanner, ScannerHandle, ScannerOptions, ScannerStatus};
pub use backend::{CameraBackend, DecodeError, Frame, FrameDecoder, PixelFormat, VideoStream};
pub use device::{select_camera, CameraDevice, DeviceKind, DEFAULT_BACK_CAMERA_KEYWORDS};
pub use error::{ScannerError, ScannerResult};
pub use scripted::{FrameStyle, ScriptedCamera, TextFrameDecoder};
pub use zxing::{render_barcode, ZxingDecoder};
