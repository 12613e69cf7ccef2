//! # Validation Module
//!
//! Barcode input rules.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Barcode Input Path                                 │
//! │                                                                         │
//! │  Layer 1: Keystrokes (manual entry)                                    │
//! │  └── sanitize_manual_input(): non-digits are dropped as typed          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Before lookup (manual entry AND camera)                      │
//! │  └── parse_barcode(): trimmed, digits only, fits in u64                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── 404 when the code is unknown                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanpos_core::validation::{lookup_key, sanitize_manual_input};
//!
//! assert_eq!(sanitize_manual_input("49-0123 4567054"), "4901234567054");
//! assert_eq!(lookup_key(" 0042 ").unwrap(), "42");
//! assert!(lookup_key("abc").is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_BARCODE_DIGITS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const FIELD: &str = "barcode";

/// Strips every character that is not an ASCII digit.
///
/// Applied to manual entry on every change, so the input field can only ever
/// hold digits.
pub fn sanitize_manual_input(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parses a scanned or typed barcode into its numeric value.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must not be empty
/// - Must be ASCII digits only, at most [`MAX_BARCODE_DIGITS`] long
/// - Must fit in a `u64`
pub fn parse_barcode(raw: &str) -> ValidationResult<u64> {
    let code = raw.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: FIELD.to_string(),
        });
    }

    if code.len() > MAX_BARCODE_DIGITS {
        return Err(ValidationError::TooLong {
            field: FIELD.to_string(),
            max: MAX_BARCODE_DIGITS,
        });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: FIELD.to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    code.parse::<u64>()
        .map_err(|e| ValidationError::InvalidFormat {
            field: FIELD.to_string(),
            reason: e.to_string(),
        })
}

/// Returns the path segment used for `GET /item/{code}`.
///
/// The numeric value is sent, so leading zeros are dropped.
pub fn lookup_key(raw: &str) -> ValidationResult<String> {
    parse_barcode(raw).map(|n| n.to_string())
}
