//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Purchase │────►│  Popup   │       │
//! │  │  Cart    │     │          │     │ (sale.rs)│     │  totals  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           (qty 1, one line per add)               │             │
//! │       │                │                                  │             │
//! │       └── clear_cart ──┘◄──── cart emptied on success ────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::state::AppState;

/// Appends the loaded product to the cart and clears it from the display.
///
/// Returns `false` (and changes nothing) when no product is loaded.
pub fn add_to_cart(state: &AppState) -> bool {
    state.checkout.with_mut(|c| match c.product.take() {
        Some(product) => {
            c.cart.push(&product);
            debug!(prd_id = product.prd_id, lines = c.cart.len(), "add_to_cart command");
            true
        }
        None => false,
    })
}

/// Removes every line from the cart.
pub fn clear_cart(state: &AppState) {
    debug!("clear_cart command");
    state.checkout.with_mut(|c| c.cart.clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::app;
    use crate::commands::lookup_product;
    use scanpos_core::LINE_QUANTITY;

    #[test]
    fn test_add_without_product_is_noop() {
        let (state, _) = app();
        assert!(!add_to_cart(&state));
        assert!(state.checkout.snapshot().cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_enables_purchase() {
        let (state, _) = app();
        assert!(!state.checkout.with(|c| c.can_purchase()));

        lookup_product(&state, "4901234567054").await.unwrap();
        assert!(add_to_cart(&state));

        let checkout = state.checkout.snapshot();
        assert!(checkout.product.is_none());
        assert!(checkout.can_purchase());
        assert_eq!(checkout.cart.items()[0].qty, LINE_QUANTITY);
    }

    #[tokio::test]
    async fn test_same_product_twice_makes_two_lines() {
        let (state, _) = app();
        for _ in 0..2 {
            lookup_product(&state, "4901234567054").await.unwrap();
            add_to_cart(&state);
        }
        let checkout = state.checkout.snapshot();
        assert_eq!(checkout.cart.len(), 2);
        assert!(checkout.cart.items().iter().all(|i| i.product.prd_id == 1));

        clear_cart(&state);
        assert!(state.checkout.snapshot().cart.is_empty());
    }
}
