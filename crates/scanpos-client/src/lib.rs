//! # scanpos-client: Backend Access for Scan POS
//!
//! This crate talks to the checkout backend. It is the only place in the
//! workspace that performs network I/O against the item and purchase API.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scan POS Data Flow                               │
//! │                                                                         │
//! │  Terminal command (lookup_product / submit_purchase)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  scanpos-client (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────┐         ┌─────────────────────────┐     │   │
//! │  │   │  ProductBackend  │◄────────│  HttpBackend (reqwest)  │     │   │
//! │  │   │  (backend.rs)    │         │  (http.rs)              │     │   │
//! │  │   │  lookup_item     │         │  GET  /item/{code}      │     │   │
//! │  │   │  purchase        │         │  POST /purchase         │     │   │
//! │  │   └──────────────────┘         └─────────────────────────┘     │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Checkout backend (HTTP/JSON)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - The `ProductBackend` trait the terminal depends on
//! - [`http`] - reqwest implementation and its configuration
//! - [`error`] - Client error types and their classification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scanpos_client::{ClientConfig, HttpBackend, ProductBackend};
//!
//! let backend = HttpBackend::new(ClientConfig::new("http://localhost:8000"))?;
//! let product = backend.lookup_item("4901234567054").await?;
//! ```

pub mod backend;
pub mod error;
pub mod http;

pub use backend::ProductBackend;
pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, HttpBackend};
