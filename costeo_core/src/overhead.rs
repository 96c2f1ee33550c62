//! # Plant Overhead
//!
//! Fixed monthly plant expenses (rent, electricity, water) and the operating
//! schedule that spreads them over working days. These feed the fixed-cost
//! side of an estimate; materials cover the variable side.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::overhead::{cost_per_work_day, total_plant_cost, PlantExpense};
//!
//! let expenses = vec![
//!     PlantExpense::new("Rent", 300.0),
//!     PlantExpense::new("Electricity", 200.0),
//! ];
//!
//! let total = total_plant_cost(&expenses);
//! assert_eq!(total, 500.0);
//! assert_eq!(cost_per_work_day(total, 25.0), 20.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::numeric::FieldValue;

/// One fixed monthly plant expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlantExpense {
    /// Display name ("Rent", "Electricity")
    #[serde(default)]
    pub name: String,
    /// Cost per month as entered on the form
    #[serde(default)]
    pub monthly_cost: FieldValue,
}

impl PlantExpense {
    /// Create an expense line with a known monthly cost
    pub fn new(name: impl Into<String>, monthly_cost: f64) -> Self {
        PlantExpense {
            name: name.into(),
            monthly_cost: FieldValue::Number(monthly_cost),
        }
    }
}

/// How the plant operates: days worked, daily throughput, and any flat cost
/// added per produced unit.
///
/// All fields are optional form values; a blank field simply disables the
/// derivation that needs it (no work days means fixed costs stay unspread).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkSchedule {
    /// Days worked in the month
    #[serde(default)]
    pub work_days: FieldValue,
    /// Average units produced per working day
    #[serde(default)]
    pub daily_average_output: FieldValue,
    /// Extra cost per unit (packaging, delivery) outside the fixed-cost spread
    #[serde(default)]
    pub extra_unit_cost: FieldValue,
}

/// Sum of all monthly plant expenses; blank or junk rows contribute 0.
///
/// Unrounded, so downstream per-day and per-period math keeps full precision.
pub fn total_plant_cost(expenses: &[PlantExpense]) -> f64 {
    expenses.iter().map(|e| e.monthly_cost.parse_or(0.0)).sum()
}

/// Spread the monthly plant total over working days.
///
/// Divides only when both arguments are nonzero; otherwise the total passes
/// through unchanged (no schedule entered means costs stay monthly).
pub fn cost_per_work_day(total_plant_cost: f64, work_days: f64) -> f64 {
    if work_days != 0.0 && total_plant_cost != 0.0 {
        total_plant_cost / work_days
    } else {
        total_plant_cost
    }
}
