//! # Scanner Commands
//!
//! Opening and closing the camera view, and what happens to decoded codes.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Requests the camera view; it opens after the configured delay.
pub fn open_scanner(state: &AppState) {
    debug!("open_scanner command");
    state.checkout.with_mut(|c| c.scanner_error = None);
    state.scanner.open();
}

/// Closes the camera view.
pub fn close_scanner(state: &AppState) {
    debug!("close_scanner command");
    state.scanner.close();
}

/// Handles a code delivered by the scanner.
///
/// Codes that arrive after the view was closed are dropped.
pub async fn handle_decoded(state: &AppState, code: &str) -> Option<Result<(), ApiError>> {
    if !state.scanner.is_open() {
        debug!(code, "Ignoring code decoded while scanner is closed");
        return None;
    }
    Some(super::lookup_product(state, code).await.map(|_| ()))
}

/// Records why the scanner could not run.
pub fn scanner_failed(state: &AppState, message: &str) {
    warn!(error = message, "Scanner unavailable");
    state
        .checkout
        .with_mut(|c| c.scanner_error = Some(message.to_string()));
}
