//! # Checkout View
//!
//! Derives what the screen shows from the checkout state.
//!
//! ## Screen Layout
//! ```text
//! ┌──────────────────────────────────────┐
//! │ ! Product not found                  │  ◄── error banner
//! │ [ Scan (camera) ]                    │
//! │ Manual entry : 4901                  │
//! │ Barcode      : 4901234567054         │
//! │ Name         : Green Tea             │
//! │ Price        : 150円                 │
//! │ [ Add ]                              │
//! │ ── Cart ──                           │
//! │ Green Tea x1 150円 150円             │
//! │ [ Purchase ]                         │
//! └──────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use scanpos_core::{Money, Product, PurchaseSummary};
use serde::Serialize;

use crate::state::{AppState, Checkout};

/// Placeholder line for an empty cart.
pub const EMPTY_CART: &str = "No items";

/// Totals popup text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupView {
    /// e.g. `Total (excl. tax): 1,350円`
    pub total_ex_tax: String,
    /// e.g. `Total: 1,485円`
    pub total: String,
}

impl From<&PurchaseSummary> for PopupView {
    fn from(summary: &PurchaseSummary) -> Self {
        PopupView {
            total_ex_tax: format!("Total (excl. tax): {}", summary.total_ex_tax.grouped()),
            total: format!("Total: {}", summary.total.grouped()),
        }
    }
}

/// Snapshot of everything the screen displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub manual_input: String,
    pub barcode: String,
    pub name: String,
    pub price: String,
    /// One entry per cart line, or [`EMPTY_CART`].
    pub cart_lines: Vec<String>,
    pub error: Option<String>,
    pub popup: Option<PopupView>,
    pub can_add: bool,
    pub can_purchase: bool,
    pub scanner_open: bool,
    pub scanner_error: Option<String>,
}

/// Price field text: empty when there is no product or the price is zero.
fn price_field(product: Option<&Product>) -> String {
    match product {
        Some(p) if !p.price.is_zero() => p.price.to_string(),
        _ => String::new(),
    }
}

fn cart_line(name: &str, unit: Money, total: Money) -> String {
    format!("{} x1 {} {}", name, unit, total)
}

impl ViewModel {
    pub fn new(checkout: &Checkout, scanner_open: bool) -> Self {
        let product = checkout.product.as_ref();

        let cart_lines = if checkout.cart.is_empty() {
            vec![EMPTY_CART.to_string()]
        } else {
            checkout
                .cart
                .items()
                .iter()
                .map(|item| cart_line(&item.product.name, item.product.price, item.line_total()))
                .collect()
        };

        ViewModel {
            manual_input: checkout.manual_input.clone(),
            barcode: product.map(|p| p.code.clone()).unwrap_or_default(),
            name: product.map(|p| p.name.clone()).unwrap_or_default(),
            price: price_field(product),
            cart_lines,
            error: checkout.error.clone(),
            popup: checkout.popup.as_ref().map(PopupView::from),
            can_add: checkout.can_add(),
            can_purchase: checkout.can_purchase(),
            scanner_open,
            scanner_error: checkout.scanner_error.clone(),
        }
    }

    /// Renders the screen as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let enabled = |on: bool| if on { "" } else { " (disabled)" };

        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {}", error);
        }
        if self.scanner_open {
            let _ = writeln!(out, "[ Scanner open ] 'close' to cancel");
        }
        if let Some(error) = &self.scanner_error {
            let _ = writeln!(out, "! Scanner: {}", error);
        }
        let _ = writeln!(out, "Manual entry : {}", self.manual_input);
        let _ = writeln!(out, "Barcode      : {}", self.barcode);
        let _ = writeln!(out, "Name         : {}", self.name);
        let _ = writeln!(out, "Price        : {}", self.price);
        let _ = writeln!(out, "[ Add ]{}", enabled(self.can_add));
        let _ = writeln!(out, "-- Cart --");
        for line in &self.cart_lines {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, "[ Purchase ]{}", enabled(self.can_purchase));

        if let Some(popup) = &self.popup {
            let _ = writeln!(out, "== Purchase complete ==");
            let _ = writeln!(out, "{}", popup.total_ex_tax);
            let _ = writeln!(out, "{}", popup.total);
            let _ = writeln!(out, "[ OK ]");
        }
        out
    }
}

/// Builds the view model for the current state.
pub fn view(state: &AppState) -> ViewModel {
    let scanner_open = state.scanner.is_open();
    state.checkout.with(|c| ViewModel::new(c, scanner_open))
}
