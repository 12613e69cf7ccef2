//! # Client Error Types
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backend Failure Classes                              │
//! │                                                                         │
//! │  Response received?                                                     │
//! │  ├── no  ──► Unreachable     (connect refused, timeout)                │
//! │  └── yes                                                               │
//! │       ├── 404 / null body ──► NotFound                                 │
//! │       ├── other non-2xx   ──► Status { status, body }                  │
//! │       └── 2xx, bad JSON   ──► InvalidResponse                          │
//! │                                                                         │
//! │  Anything else (builder, redirect, body read) ──► Request              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Backend call errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend has no product with this code.
    ///
    /// ## When This Occurs
    /// - `GET /item/{code}` returned 404
    /// - `GET /item/{code}` returned 2xx with an empty or `null` body
    #[error("Item not found: {code}")]
    NotFound { code: String },

    /// No response was received from the backend.
    ///
    /// ## When This Occurs
    /// - Backend not running (connection refused)
    /// - DNS failure
    /// - Request timed out
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 2xx but the body could not be decoded.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// The configured base URL is unusable.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Any other request failure.
    #[error("Request failed: {0}")]
    Request(String),
}

impl ClientError {
    /// Creates a NotFound error for a code.
    pub fn not_found(code: impl Into<String>) -> Self {
        ClientError::NotFound { code: code.into() }
    }

    /// True when the failure happened before any response arrived.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable(_))
    }
}

/// Convert reqwest errors to ClientError.
///
/// ## Error Mapping
/// ```text
/// connect / timeout  → ClientError::Unreachable
/// decode             → ClientError::InvalidResponse
/// builder (bad URL)  → ClientError::InvalidUrl
/// Other              → ClientError::Request
/// ```
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ClientError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

/// Result type for backend operations.
pub type ClientResult<T> = Result<T, ClientError>;
