//! # Checkout State
//!
//! Everything the checkout screen shows, behind one lock.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout State Changes                               │
//! │                                                                         │
//! │  Operator Action          Command                 State Change          │
//! │  ───────────────          ───────                 ────────────          │
//! │                                                                         │
//! │  Scan / type code ───────► lookup_product() ────► product = Some(p)    │
//! │                                                   error   = None       │
//! │                                                                         │
//! │  Press "add" ────────────► add_to_cart() ───────► cart.push(p)         │
//! │                                                   product = None       │
//! │                                                                         │
//! │  Press "buy" ────────────► submit_purchase() ───► popup = Some(totals) │
//! │                                                   cart.clear()         │
//! │                                                                         │
//! │  Press "ok" ─────────────► close_popup() ───────► popup = None         │
//! │                                                   product = None       │
//! │                                                   manual_input = ""    │
//! │                                                                         │
//! │  NOTE: The lock is taken in short sections and never held across a    │
//! │        backend call.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use scanpos_core::{Cart, Product, PurchaseSummary};

/// Screen state of one checkout.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    /// Product from the last successful lookup.
    pub product: Option<Product>,

    /// Lines waiting to be purchased.
    pub cart: Cart,

    /// Totals of the last completed purchase, until dismissed.
    pub popup: Option<PurchaseSummary>,

    /// Current error banner.
    pub error: Option<String>,

    /// Manual entry field (digits only).
    pub manual_input: String,

    /// Why the camera scanner could not start.
    pub scanner_error: Option<String>,
}

impl Checkout {
    /// True when a product is loaded and can be added.
    pub fn can_add(&self) -> bool {
        self.product.is_some()
    }

    /// True when there is something to purchase.
    pub fn can_purchase(&self) -> bool {
        !self.cart.is_empty()
    }
}

/// Thread-safe wrapper around [`Checkout`].
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    inner: Arc<Mutex<Checkout>>,
}

impl CheckoutState {
    /// Creates an empty checkout.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Checkout> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Executes a function with read access to the checkout.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Checkout) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the checkout.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_mut(|c| c.error = None);
    /// ```
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Checkout) -> R,
    {
        f(&mut self.lock())
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> Checkout {
        self.lock().clone()
    }
}
