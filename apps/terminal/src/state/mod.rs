//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                          AppState                                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │          │                  │                   │                      │
//! │          ▼                  ▼                   ▼                      │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────────┐            │
//! │  │CheckoutState │  │ ScannerToggle  │  │ ProductBackend   │            │
//! │  │              │  │                │  │                  │            │
//! │  │ Arc<Mutex<   │  │ watch<bool> +  │  │ HttpBackend, or  │            │
//! │  │  Checkout>>  │  │ delay task     │  │ a fake in tests  │            │
//! │  └──────────────┘  └────────────────┘  └──────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod config;
mod scanner;

use std::sync::Arc;

use scanpos_client::ProductBackend;

pub use checkout::{Checkout, CheckoutState};
pub use config::{ConfigError, ConfigResult, DecoderKind, TerminalConfig};
pub use scanner::ScannerToggle;

/// Everything a command needs.
pub struct AppState {
    pub checkout: CheckoutState,
    pub scanner: ScannerToggle,
    pub backend: Arc<dyn ProductBackend>,
    /// Sent as `emp_cd` with every purchase.
    pub employee_code: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn ProductBackend>, config: &TerminalConfig) -> Self {
        AppState {
            checkout: CheckoutState::new(),
            scanner: ScannerToggle::new(config.open_delay()),
            backend,
            employee_code: config.api.employee_code.clone(),
        }
    }
}
