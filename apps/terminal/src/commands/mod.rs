//! # Checkout Commands
//!
//! Every operator action is a function over [`AppState`](crate::state::AppState).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, test fakes)
//! ├── product.rs  ◄─── Barcode lookup, manual entry
//! ├── cart.rs     ◄─── Add to cart, clear cart
//! ├── sale.rs     ◄─── Purchase submission, completion popup
//! └── scanner.rs  ◄─── Scanner open/close, decoded codes
//! ```
//!
//! ## Error Reporting
//! Commands never return errors to the caller for display. A failure is
//! written to `Checkout.error` (the banner) and also returned so the event
//! loop can log it.

pub mod cart;
pub mod product;
pub mod sale;
pub mod scanner;

pub use cart::{add_to_cart, clear_cart};
pub use product::{lookup_product, manual_input_changed, submit_manual_entry};
pub use sale::{close_popup, submit_purchase};
pub use scanner::{close_scanner, handle_decoded, open_scanner, scanner_failed};

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory backend for command tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use scanpos_client::{ClientError, ClientResult, ProductBackend};
    use scanpos_core::{Money, Product, PurchaseRequest, PurchaseResult};

    use crate::state::{AppState, TerminalConfig};

    /// How the fake answers purchases.
    #[derive(Debug, Clone)]
    pub enum PurchaseReply {
        Accept { total: i64, total_ex_tax: i64 },
        Refuse,
        Fail(fn() -> ClientError),
    }

    pub struct FakeBackend {
        pub products: HashMap<String, Product>,
        pub lookup_failure: Option<fn() -> ClientError>,
        pub purchase_reply: PurchaseReply,
        pub lookups: AtomicUsize,
        pub purchases: Mutex<Vec<PurchaseRequest>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            let mut products = HashMap::new();
            for p in [
                Product::new(1, "4901234567054", "Green Tea", 150),
                Product::new(2, "4902102072618", "Rice Ball", 1200),
                Product::new(3, "123", "Free Sample", 0),
            ] {
                products.insert(p.code.clone(), p);
            }
            FakeBackend {
                products,
                lookup_failure: None,
                purchase_reply: PurchaseReply::Accept {
                    total: 1485,
                    total_ex_tax: 1350,
                },
                lookups: AtomicUsize::new(0),
                purchases: Mutex::new(Vec::new()),
            }
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        pub fn purchases(&self) -> Vec<PurchaseRequest> {
            self.purchases.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductBackend for FakeBackend {
        async fn lookup_item(&self, code: &str) -> ClientResult<Product> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(failure) = self.lookup_failure {
                return Err(failure());
            }
            self.products
                .get(code)
                .cloned()
                .ok_or_else(|| ClientError::not_found(code))
        }

        async fn purchase(&self, request: &PurchaseRequest) -> ClientResult<PurchaseResult> {
            self.purchases.lock().unwrap().push(request.clone());
            match &self.purchase_reply {
                PurchaseReply::Accept { total, total_ex_tax } => Ok(PurchaseResult {
                    success: true,
                    total: Money::from_yen(*total),
                    total_ex_tax: Money::from_yen(*total_ex_tax),
                }),
                PurchaseReply::Refuse => Ok(PurchaseResult {
                    success: false,
                    total: Money::zero(),
                    total_ex_tax: Money::zero(),
                }),
                PurchaseReply::Fail(make) => Err(make()),
            }
        }
    }

    /// Builds app state around `backend`, returning both.
    pub fn app_with(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let state = AppState::new(backend.clone(), &TerminalConfig::default());
        (state, backend)
    }

    pub fn app() -> (AppState, Arc<FakeBackend>) {
        app_with(FakeBackend::new())
    }
}
