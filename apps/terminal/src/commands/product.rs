//! # Product Commands
//!
//! Barcode lookup, from the camera or the manual entry field.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Lookup Flow                                  │
//! │                                                                         │
//! │  Camera decode "4901234567054"     Manual entry "4901-2345-67054"      │
//! │       │                                  │                              │
//! │       │                                  ▼                              │
//! │       │                       manual_input_changed() strips non-digits │
//! │       │                                  │                              │
//! │       │                       submit_manual_entry() trims, skips ""    │
//! │       ▼                                  ▼                              │
//! │  ┌───────────────────────────────────────────────────────────┐         │
//! │  │ lookup_product(code)                                      │         │
//! │  │   1. close scanner view, clear error banner               │         │
//! │  │   2. parse as integer ──invalid──► "Invalid barcode"      │         │
//! │  │   3. GET /item/{n}    ──404──────► product = None,        │         │
//! │  │                                    "Product not found"    │         │
//! │  │                       ──other────► network error banner   │         │
//! │  │   4. product = Some(p)                                    │         │
//! │  └───────────────────────────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use scanpos_core::validation::{lookup_key, sanitize_manual_input};
use scanpos_core::Product;
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// Looks up a scanned or typed barcode and loads the product.
///
/// An invalid code never reaches the backend.
pub async fn lookup_product(state: &AppState, code: &str) -> Result<Product, ApiError> {
    debug!(code, "lookup_product command");
    let start = Instant::now();

    state.scanner.close();
    state.checkout.with_mut(|c| c.error = None);

    let result = match lookup_key(code) {
        Ok(key) => state
            .backend
            .lookup_item(&key)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(ApiError::from(e)),
    };

    match result {
        Ok(product) => {
            info!(
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                prd_id = product.prd_id,
                name = %product.name,
                price = product.price.yen(),
                "Product loaded"
            );
            state.checkout.with_mut(|c| c.product = Some(product.clone()));
            Ok(product)
        }
        Err(err) => {
            state.checkout.with_mut(|c| {
                if err.code == ErrorCode::NotFound {
                    c.product = None;
                }
                c.error = Some(err.message.clone());
            });
            Err(err)
        }
    }
}

/// Stores new manual entry text, keeping digits only.
pub fn manual_input_changed(state: &AppState, text: &str) {
    let sanitized = sanitize_manual_input(text);
    state.checkout.with_mut(|c| c.manual_input = sanitized);
}

/// Submits the manual entry field.
///
/// Blank input is ignored (`Ok(None)`). The field is cleared once the lookup
/// has finished, whatever its outcome.
pub async fn submit_manual_entry(state: &AppState) -> Result<Option<Product>, ApiError> {
    let code = state.checkout.with(|c| c.manual_input.trim().to_string());
    if code.is_empty() {
        return Ok(None);
    }

    let result = lookup_product(state, &code).await;
    state.checkout.with_mut(|c| c.manual_input.clear());
    result.map(Some)
}
