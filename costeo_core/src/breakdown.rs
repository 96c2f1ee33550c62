//! # Cost Breakdown Slices
//!
//! Label/amount pairs ready for a pie chart or a share table. Rendering is
//! the shell's job; this module only shapes the rows. One slice per input
//! row, junk amounts become 0.0 and nameless rows are labeled "Unnamed".

use serde::{Deserialize, Serialize};

use crate::materials::MaterialRow;
use crate::overhead::PlantExpense;

/// Label used for rows saved without a name
pub const UNNAMED_LABEL: &str = "Unnamed";

/// One labeled share of a cost total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSlice {
    /// Row name, or "Unnamed"
    pub label: String,
    /// The row's cost contribution
    pub amount: f64,
}

impl CostSlice {
    /// Create a slice, substituting the fallback label for blank names
    pub fn new(label: &str, amount: f64) -> Self {
        let label = if label.trim().is_empty() {
            UNNAMED_LABEL.to_string()
        } else {
            label.to_string()
        };
        CostSlice { label, amount }
    }

    /// This slice's share of `total`, as a percentage (0.0 when the total is 0)
    pub fn share_percent(&self, total: f64) -> f64 {
        if total == 0.0 {
            0.0
        } else {
            (self.amount / total) * 100.0
        }
    }
}

/// One slice per material row, amounts from the per-run cost of each row.
pub fn material_slices(rows: &[MaterialRow]) -> Vec<CostSlice> {
    rows.iter()
        .map(|row| CostSlice::new(&row.name, row.cost_per_use()))
        .collect()
}

/// One slice per plant expense, amounts from the parsed monthly cost.
pub fn plant_expense_slices(expenses: &[PlantExpense]) -> Vec<CostSlice> {
    expenses
        .iter()
        .map(|e| CostSlice::new(&e.name, e.monthly_cost.parse_or(0.0)))
        .collect()
}

/// Sum of slice amounts, for share calculations.
pub fn slice_total(slices: &[CostSlice]) -> f64 {
    slices.iter().map(|s| s.amount).sum()
}
