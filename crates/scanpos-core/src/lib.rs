//! # scanpos-core: Pure Business Logic for Scan POS
//!
//! This crate holds the checkout domain as pure data and functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scan POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal (apps/terminal)                     │   │
//! │  │   Scan / manual entry ──► Product fields ──► Cart ──► Popup     │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │                                 │                    │
//! │  ┌───────────────▼──────────────┐   ┌──────────────▼──────────────┐    │
//! │  │  scanpos-client (HTTP)       │   │  scanpos-scanner (camera)   │    │
//! │  │  GET /item, POST /purchase   │   │  decode loop → callback     │    │
//! │  └───────────────┬──────────────┘   └─────────────────────────────┘    │
//! │                  │                                                      │
//! │  ┌───────────────▼─────────────────────────────────────────────────┐   │
//! │  │               ★ scanpos-core (THIS CRATE) ★                     │   │
//! │  │   types: Product, PurchaseRequest, PurchaseResult               │   │
//! │  │   money: Money (whole yen)     cart: Cart, CartItem             │   │
//! │  │   validation: barcode rules    error: CoreError                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire and domain types (Product, purchase DTOs)
//! - [`money`] - Integer yen amounts and their display formats
//! - [`cart`] - The ordered, append-only cart
//! - [`error`] - Domain error types
//! - [`validation`] - Barcode input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use scanpos_core::{Cart, Money, Product};
//!
//! let product = Product::new(1, "4901234567054", "Green Tea", 150);
//! let mut cart = Cart::new();
//! cart.push(&product);
//!
//! let line = &cart.items()[0];
//! assert_eq!(line.line_total(), Money::from_yen(150));
//! assert_eq!(line.line_total().to_string(), "150円");
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Employee code sent with purchases when none is configured.
pub const DEFAULT_EMPLOYEE_CODE: &str = "EMP001";

/// Quantity recorded for every cart line.
///
/// Each scan adds one unit; repeated scans of the same product add new lines.
pub const LINE_QUANTITY: i64 = 1;

/// Longest barcode accepted from manual entry or the camera.
///
/// `u64::MAX` has 20 digits; anything longer cannot be a lookup key.
pub const MAX_BARCODE_DIGITS: usize = 20;
