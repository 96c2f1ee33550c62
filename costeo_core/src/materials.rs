//! # Material Rows
//!
//! Raw materials (insumos) as entered on the costing form. A material is
//! bought in lots (a 900 g bag of flour, a 1 L bottle of dye) and consumed
//! in fractions of a lot per production run. The row derives what one run's
//! worth of the material costs.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::materials::{LotUnit, MaterialRow};
//! use costeo_core::numeric::FieldValue;
//!
//! let flour = MaterialRow {
//!     name: "Flour".to_string(),
//!     unit_price: FieldValue::from(38.0),   // price of the whole bag
//!     lot_size: FieldValue::from(900.0),    // grams per bag
//!     lot_unit: LotUnit::Gram,
//!     quantity_used: FieldValue::from(450.0),
//! };
//!
//! assert_eq!(flour.cost_per_use(), 19.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::numeric::{round_money, FieldValue};

// ============================================================================
// LOT UNITS
// ============================================================================

/// Unit the lot size of a material is expressed in.
///
/// Informational only; the cost math never converts between units, it just
/// divides price by lot size in whatever unit the row uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotUnit {
    /// Countable pieces
    #[default]
    Piece,
    /// Weight in grams
    Gram,
    /// Volume in liters
    Liter,
    /// Anything else (unknown strings in stored data land here)
    #[serde(other)]
    Other,
}

impl LotUnit {
    /// All lot unit variants for UI selection
    pub const ALL: [LotUnit; 4] = [LotUnit::Piece, LotUnit::Gram, LotUnit::Liter, LotUnit::Other];

    /// Short code as stored in JSON
    pub fn code(&self) -> &'static str {
        match self {
            LotUnit::Piece => "piece",
            LotUnit::Gram => "gram",
            LotUnit::Liter => "liter",
            LotUnit::Other => "other",
        }
    }

    /// Parse from common string representations (unknown strings become `Other`)
    pub fn from_str_flexible(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "piece" | "pieces" | "pc" | "pza" | "pieza" | "piezas" => LotUnit::Piece,
            "gram" | "grams" | "g" | "gr" | "gramo" | "gramos" => LotUnit::Gram,
            "liter" | "liters" | "litre" | "l" | "lt" | "litro" | "litros" => LotUnit::Liter,
            _ => LotUnit::Other,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LotUnit::Piece => "Piece",
            LotUnit::Gram => "Gram",
            LotUnit::Liter => "Liter",
            LotUnit::Other => "Other",
        }
    }
}

impl std::fmt::Display for LotUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// MATERIAL ROWS
// ============================================================================

/// One raw-material line on the costing form.
///
/// Numeric fields hold raw form values; blank or junk entries coerce to safe
/// defaults when the cost is derived, so a half-filled row never poisons the
/// totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialRow {
    /// Display name ("Flour", "Red dye"); not used in arithmetic
    #[serde(default)]
    pub name: String,
    /// Price paid for one purchased lot
    #[serde(default)]
    pub unit_price: FieldValue,
    /// How much the lot contains, in `lot_unit` (falls back to 1)
    #[serde(default)]
    pub lot_size: FieldValue,
    /// Unit of `lot_size`
    #[serde(default)]
    pub lot_unit: LotUnit,
    /// How much of the lot one production run consumes
    #[serde(default)]
    pub quantity_used: FieldValue,
}

impl MaterialRow {
    /// Create an empty row with just a name
    pub fn new(name: impl Into<String>) -> Self {
        MaterialRow {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Cost of this material for one production run, rounded to 2 decimals.
    ///
    /// `(unit_price / lot_size) * quantity_used`, where a blank or zero lot
    /// size falls back to 1 so the quotient stays defined.
    pub fn cost_per_use(&self) -> f64 {
        let price = self.unit_price.parse_or(0.0);
        let lot = self.lot_size.parse_or(1.0);
        let quantity = self.quantity_used.parse_or(0.0);
        // parse_or never yields 0 here; the guard keeps the result defined
        // for rows built around the coercion
        if lot == 0.0 {
            return 0.0;
        }
        round_money((price / lot) * quantity)
    }

    /// Price of a single unit of the lot (`unit_price / lot_size`), unrounded.
    ///
    /// Persisted alongside estimates so a stored row can show "per gram"
    /// pricing without re-deriving it.
    pub fn lot_unit_cost(&self) -> f64 {
        let price = self.unit_price.parse_or(0.0);
        let lot = self.lot_size.parse_or(1.0);
        if lot == 0.0 {
            return 0.0;
        }
        price / lot
    }
}

/// Total per-run materials cost over a list of rows, rounded to 2 decimals.
///
/// Sums the already-rounded per-row costs; an empty list is 0.0.
pub fn total_cost_per_use(rows: &[MaterialRow]) -> f64 {
    round_money(rows.iter().map(MaterialRow::cost_per_use).sum())
}
