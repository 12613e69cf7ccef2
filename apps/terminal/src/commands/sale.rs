//! # Sale Commands
//!
//! Purchase submission and the completion popup.
//!
//! ```text
//!   submit_purchase()
//!        │  error = None
//!        │  POST /purchase { emp_cd, items }
//!        ├── success: true  ──► popup = totals, cart emptied
//!        ├── success: false ──► "Purchase failed", cart kept
//!        └── call failed    ──► network error banner, cart kept
//!
//!   close_popup() ──► popup, product and manual entry cleared
//! ```

use scanpos_core::{CoreError, PurchaseRequest, PurchaseSummary};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Posts the cart to the backend.
///
/// The cart is not checked for emptiness here; the screen disables the
/// action while there is nothing to buy.
pub async fn submit_purchase(state: &AppState) -> Result<PurchaseSummary, ApiError> {
    let request = state.checkout.with_mut(|c| {
        c.error = None;
        PurchaseRequest::from_cart(state.employee_code.as_str(), &c.cart)
    });
    debug!(items = request.items.len(), emp_cd = %request.emp_cd, "submit_purchase command");

    let result = state
        .backend
        .purchase(&request)
        .await
        .map_err(ApiError::from)
        .and_then(|result| {
            result
                .summary()
                .ok_or_else(|| ApiError::from(CoreError::PurchaseRejected))
        });

    match result {
        Ok(summary) => {
            info!(
                items = request.items.len(),
                total = summary.total.yen(),
                total_ex_tax = summary.total_ex_tax.yen(),
                "Purchase completed"
            );
            state.checkout.with_mut(|c| {
                c.popup = Some(summary);
                c.cart.clear();
            });
            Ok(summary)
        }
        Err(err) => {
            warn!(error = %err, "Purchase not completed");
            state.checkout.with_mut(|c| c.error = Some(err.message.clone()));
            Err(err)
        }
    }
}

/// Dismisses the completion popup and resets the entry fields.
pub fn close_popup(state: &AppState) {
    debug!("close_popup command");
    state.checkout.with_mut(|c| {
        c.popup = None;
        c.product = None;
        c.manual_input.clear();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{app, app_with, FakeBackend, PurchaseReply};
    use crate::commands::{add_to_cart, lookup_product, manual_input_changed};
    use crate::error::{ErrorCode, MSG_PURCHASE_FAILED, MSG_UNREACHABLE};
    use scanpos_client::ClientError;
    use scanpos_core::Money;

    async fn fill_cart(state: &AppState) {
        for code in ["4901234567054", "4902102072618"] {
            lookup_product(state, code).await.unwrap();
            add_to_cart(state);
        }
    }

    #[tokio::test]
    async fn test_success_shows_totals_and_empties_cart() {
        let (state, backend) = app();
        fill_cart(&state).await;

        let summary = submit_purchase(&state).await.unwrap();
        assert_eq!(summary.total, Money::from_yen(1485));

        let checkout = state.checkout.snapshot();
        assert!(checkout.cart.is_empty());
        assert_eq!(checkout.popup, Some(summary));
        assert!(checkout.error.is_none());

        let sent = backend.purchases();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].emp_cd, "EMP001");
        let ids: Vec<i64> = sent[0].items.iter().map(|i| i.prd_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_refused_purchase_keeps_cart() {
        let mut backend = FakeBackend::new();
        backend.purchase_reply = PurchaseReply::Refuse;
        let (state, _) = app_with(backend);
        fill_cart(&state).await;

        let err = submit_purchase(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PurchaseRejected);

        let checkout = state.checkout.snapshot();
        assert_eq!(checkout.error.as_deref(), Some(MSG_PURCHASE_FAILED));
        assert_eq!(checkout.cart.len(), 2);
        assert!(checkout.popup.is_none());
    }

    #[tokio::test]
    async fn test_backend_failures() {
        let mut backend = FakeBackend::new();
        backend.purchase_reply =
            PurchaseReply::Fail(|| ClientError::Unreachable("timed out".into()));
        let (state, _) = app_with(backend);
        fill_cart(&state).await;

        submit_purchase(&state).await.unwrap_err();
        assert_eq!(state.checkout.snapshot().error.as_deref(), Some(MSG_UNREACHABLE));

        let mut backend = FakeBackend::new();
        backend.purchase_reply = PurchaseReply::Fail(|| ClientError::Status {
            status: 404,
            body: "Not Found".into(),
        });
        let (state, _) = app_with(backend);
        submit_purchase(&state).await.unwrap_err();
        assert_eq!(
            state.checkout.snapshot().error.as_deref(),
            Some("Error: 404 - Not Found")
        );
    }

    #[tokio::test]
    async fn test_close_popup_resets_fields() {
        let (state, _) = app();
        fill_cart(&state).await;
        submit_purchase(&state).await.unwrap();
        lookup_product(&state, "123").await.unwrap();
        manual_input_changed(&state, "42");

        close_popup(&state);
        let checkout = state.checkout.snapshot();
        assert!(checkout.popup.is_none());
        assert!(checkout.product.is_none());
        assert_eq!(checkout.manual_input, "");
    }
}
