//! # Domain Types
//!
//! Types exchanged with the checkout backend.
//!
//! ## Wire Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Backend Payloads                                │
//! │                                                                         │
//! │  GET /item/{code}                 POST /purchase                       │
//! │  ┌─────────────────┐              ┌─────────────────────────────────┐  │
//! │  │    Product      │              │        PurchaseRequest          │  │
//! │  │  ─────────────  │              │  ─────────────────────────────  │  │
//! │  │  prd_id         │              │  emp_cd                         │  │
//! │  │  code           │   ──────►    │  items: [PurchaseItem]          │  │
//! │  │  name           │              └───────────────┬─────────────────┘  │
//! │  │  price          │                              ▼                    │
//! │  └─────────────────┘              ┌─────────────────────────────────┐  │
//! │                                   │        PurchaseResult           │  │
//! │                                   │  success, total, total_ex_tax   │  │
//! │                                   └─────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::cart::Cart;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the item lookup endpoint.
///
/// Transient on the terminal: replaced by every successful lookup and cleared
/// once it is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend product identifier.
    pub prd_id: i64,

    /// Barcode digits. Some backends send this as a JSON number.
    #[serde(deserialize_with = "code_from_string_or_number")]
    pub code: String,

    /// Display name.
    pub name: String,

    /// Unit price in whole yen.
    pub price: Money,
}

impl Product {
    /// Creates a product.
    pub fn new(prd_id: i64, code: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Product {
            prd_id,
            code: code.into(),
            name: name.into(),
            price: Money::from_yen(price),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Number(u64),
}

fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CodeRepr::deserialize(deserializer)? {
        CodeRepr::Text(s) => s,
        CodeRepr::Number(n) => n.to_string(),
    })
}

// =============================================================================
// Purchase Request
// =============================================================================

/// One line of a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub prd_id: i64,
    /// Always sent as a string.
    pub code: String,
    pub name: String,
    pub price: Money,
}

impl From<&Product> for PurchaseItem {
    fn from(p: &Product) -> Self {
        PurchaseItem {
            prd_id: p.prd_id,
            code: p.code.clone(),
            name: p.name.clone(),
            price: p.price,
        }
    }
}

/// Body of `POST /purchase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Employee code of the operator.
    pub emp_cd: String,

    /// Cart lines in the order they were added.
    pub items: Vec<PurchaseItem>,
}

impl PurchaseRequest {
    /// Builds the request body from the current cart.
    pub fn from_cart(emp_cd: impl Into<String>, cart: &Cart) -> Self {
        PurchaseRequest {
            emp_cd: emp_cd.into(),
            items: cart
                .items()
                .iter()
                .map(|item| PurchaseItem::from(&item.product))
                .collect(),
        }
    }
}

// =============================================================================
// Purchase Result
// =============================================================================

/// Response of `POST /purchase`.
///
/// Totals may be absent when `success` is false. A reply without
/// `success` counts as refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub total_ex_tax: Money,
}

impl PurchaseResult {
    /// Returns the totals to display, or `None` if the backend refused.
    pub fn summary(&self) -> Option<PurchaseSummary> {
        self.success.then_some(PurchaseSummary {
            total: self.total,
            total_ex_tax: self.total_ex_tax,
        })
    }
}

/// Totals shown in the completion popup, displayed once then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseSummary {
    /// Total including tax.
    pub total: Money,
    /// Total excluding tax.
    pub total_ex_tax: Money,
}
