//! # Terminal Error Type
//!
//! Translates every failure into the single user-facing string shown in the
//! error banner.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Scan POS                               │
//! │                                                                         │
//! │  Command (lookup_product / submit_purchase)                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ─────────────────┐                                     │
//! │  ClientError (backend) ───────────┼──► ApiError { code, message }       │
//! │  CoreError (purchase refused) ────┘            │                        │
//! │                                                ▼                        │
//! │                          Checkout.error = Some(message)                 │
//! │                          (replaced on every attempt,                    │
//! │                           cleared on success)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanpos_client::ClientError;
use scanpos_core::{CoreError, ValidationError};

/// Banner text for a non-numeric barcode.
pub const MSG_INVALID_BARCODE: &str = "Invalid barcode";
/// Banner text when the backend does not know the code.
pub const MSG_NOT_FOUND: &str = "Product not found";
/// Banner text when no response was received.
pub const MSG_UNREACHABLE: &str = "Cannot reach the server. Check that the backend is running.";
/// Banner text when the backend answered `success: false`.
pub const MSG_PURCHASE_FAILED: &str = "Purchase failed";

/// A command failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Machine-readable class, used for logging and branching.
    pub code: ErrorCode,

    /// Human-readable message for the banner.
    pub message: String,
}

/// Failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Code failed numeric validation (no request sent)
    InvalidBarcode,

    /// 404 or empty lookup body
    NotFound,

    /// No response from the backend
    Unreachable,

    /// Backend answered with a non-success status
    Http,

    /// Backend refused the purchase
    PurchaseRejected,

    /// Anything else
    Unexpected,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an unexpected-failure error with the standard prefix.
    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        ApiError::new(
            ErrorCode::Unexpected,
            format!("An error occurred: {}", detail),
        )
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        tracing::debug!(error = %err, "Barcode rejected");
        ApiError::new(ErrorCode::InvalidBarcode, MSG_INVALID_BARCODE)
    }
}

/// Converts backend errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, MSG_NOT_FOUND),
            ClientError::Unreachable(e) => {
                tracing::error!("Backend unreachable: {}", e);
                ApiError::new(ErrorCode::Unreachable, MSG_UNREACHABLE)
            }
            ClientError::Status { status, body } => {
                tracing::error!(status, "Backend returned an error status");
                ApiError::new(ErrorCode::Http, format!("Error: {} - {}", status, body))
            }
            ClientError::InvalidResponse(e)
            | ClientError::InvalidUrl(e)
            | ClientError::Request(e) => {
                tracing::error!("Backend call failed: {}", e);
                ApiError::unexpected(e)
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PurchaseRejected => {
                ApiError::new(ErrorCode::PurchaseRejected, MSG_PURCHASE_FAILED)
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
