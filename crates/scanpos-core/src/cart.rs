//! # Cart
//!
//! The ordered list of products pending purchase.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Terminal Action          Controller              Cart Change           │
//! │  ───────────────          ──────────              ───────────           │
//! │                                                                         │
//! │  "add" ──────────────────► add_to_cart() ───────► items.push(line)     │
//! │                                                                         │
//! │  "purchase" (success) ───► submit_purchase() ───► items.clear()        │
//! │                                                                         │
//! │  "clear" ────────────────► clear_cart() ────────► items.clear()        │
//! │                                                                         │
//! │  NOTE: Append-only between clears. Scanning the same product twice     │
//! │        produces two lines, each with quantity 1.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;
use crate::LINE_QUANTITY;

/// A line in the cart.
///
/// Holds a frozen copy of the product as it was when added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product snapshot.
    #[serde(flatten)]
    pub product: Product,

    /// Always [`LINE_QUANTITY`].
    pub qty: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a single-unit line from a product.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product: product.clone(),
            qty: LINE_QUANTITY,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price * self.qty
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Appends a single-unit line for `product`.
    pub fn push(&mut self, product: &Product) {
        self.items.push(CartItem::from_product(product));
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
