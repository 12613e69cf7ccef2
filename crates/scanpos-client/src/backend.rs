//! # Backend Trait
//!
//! The seam between the terminal and the checkout backend. The terminal only
//! sees this trait, so tests swap in an in-memory implementation.

use async_trait::async_trait;
use scanpos_core::{Product, PurchaseRequest, PurchaseResult};

use crate::error::ClientResult;

/// Item lookup and purchase submission.
///
/// Calls are single-shot: implementations do not retry, de-duplicate or
/// cancel in-flight requests.
#[async_trait]
pub trait ProductBackend: Send + Sync {
    /// Resolves a numeric barcode to a product.
    ///
    /// `code` is the already-validated lookup key (digits, no leading zeros).
    /// Returns [`ClientError::NotFound`](crate::ClientError::NotFound) when
    /// the backend does not know the code.
    async fn lookup_item(&self, code: &str) -> ClientResult<Product>;

    /// Submits the cart. All-or-nothing from the caller's viewpoint.
    async fn purchase(&self, request: &PurchaseRequest) -> ClientResult<PurchaseResult>;
}
