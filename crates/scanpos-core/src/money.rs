//! # Money Module
//!
//! Provides the `Money` type for prices and totals.
//!
//! ## Whole Yen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The backend prices everything in whole yen (no minor unit).           │
//! │                                                                         │
//! │    price: 150          → Money(150)  → "150円"                          │
//! │    total: 12345        → Money(12345) → "12,345円" (popup)              │
//! │                                                                         │
//! │  Amounts are i64 so arithmetic never touches floating point, and it     │
//! │  saturates instead of overflowing on out-of-range backend prices.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanpos_core::money::Money;
//!
//! let price = Money::from_yen(1200);
//! assert_eq!((price * 2).yen(), 2400);
//! assert_eq!(price.to_string(), "1200円");
//! assert_eq!(price.grouped(), "1,200円");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// Suffix appended to every rendered amount.
pub const CURRENCY_SUFFIX: &str = "円";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole yen.
///
/// Serializes transparently as a plain JSON integer so it can sit directly
/// in backend DTOs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole yen.
    #[inline]
    pub const fn from_yen(yen: i64) -> Self {
        Money(yen)
    }

    /// Returns the value in whole yen.
    #[inline]
    pub const fn yen(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Renders the amount with thousands separators, e.g. `12,345円`.
    ///
    /// Used for the purchase totals popup. Product fields and cart lines use
    /// the plain [`fmt::Display`] rendering instead.
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);

        if self.0 < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out.push_str(CURRENCY_SUFFIX);
        out
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, CURRENCY_SUFFIX)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

/// Multiplies by a quantity, saturating at the `i64` bounds; prices come
/// from the backend unchecked.
impl Mul<i64> for Money {
    type Output = Money;

    #[inline]
    fn mul(self, qty: i64) -> Money {
        Money(self.0.saturating_mul(qty))
    }
}
