//! # Quick Markup Quote
//!
//! The back-of-the-envelope calculator: one base cost, one margin, one
//! quantity. No materials breakdown, no overhead spreading. Useful for a
//! fast "what would I charge" answer before building a full estimate.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::estimation::quick::{calculate, QuickQuoteInput};
//! use costeo_core::numeric::FieldValue;
//!
//! let input = QuickQuoteInput {
//!     base_cost: FieldValue::from(50.0),
//!     margin_percent: FieldValue::from(20.0),
//!     quantity: FieldValue::from("3"),
//! };
//!
//! let result = calculate(&input);
//! assert_eq!(result.unit_price, 60.0);
//! assert_eq!(result.total, 180.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::numeric::{round_money, FieldValue};

/// Input parameters for a quick quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuickQuoteInput {
    /// What one unit costs to make or buy
    #[serde(default)]
    pub base_cost: FieldValue,
    /// Desired markup over the base cost, in percent
    #[serde(default)]
    pub margin_percent: FieldValue,
    /// How many units the quote covers (whole units; fractions truncate)
    #[serde(default)]
    pub quantity: FieldValue,
}

/// Results from a quick quote, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickQuoteResult {
    /// Base cost with the margin applied
    pub unit_price: f64,
    /// Unit price times quantity
    pub total: f64,
}

/// Compute a quick quote. Total over any input, like the full estimate.
///
/// A blank quantity quotes zero units, so `total` is 0 until one is entered.
pub fn calculate(input: &QuickQuoteInput) -> QuickQuoteResult {
    let base_cost = input.base_cost.parse_or(0.0);
    let margin_percent = input.margin_percent.parse_or(0.0);
    let quantity = input.quantity.parse_or(0.0).trunc();

    let unit_price = base_cost + (base_cost * margin_percent) / 100.0;
    let total = unit_price * quantity;

    QuickQuoteResult {
        unit_price: round_money(unit_price),
        total: round_money(total),
    }
}
