//! # Product Cost Estimate
//!
//! Derives what one unit of a product costs to make and what it should sell
//! for. Materials contribute a variable cost per production run, plant
//! expenses contribute a fixed cost spread over the schedule and time frame,
//! and the margin turns unit cost into a sale price.
//!
//! ## How the numbers flow
//!
//! 1. Sum per-run material costs (each row rounded to cents first).
//! 2. Sum monthly plant expenses, spread them over the days worked, then
//!    scale to the estimate's time frame (7 / 14 / 30 days).
//! 3. Split materials + period fixed cost across the units produced in that
//!    time frame, add any flat per-unit extra.
//! 4. Apply the margin percentage for the sale price; profit is the spread.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::estimation::estimate::{calculate, EstimateInput, ProductInfo, TimeFrame};
//! use costeo_core::materials::MaterialRow;
//! use costeo_core::numeric::FieldValue;
//! use costeo_core::overhead::PlantExpense;
//!
//! let input = EstimateInput {
//!     product: ProductInfo {
//!         product_name: "Candle 250g".to_string(),
//!         produced_units: FieldValue::from(40.0),
//!         time_frame: TimeFrame::Week,
//!         margin_percent: FieldValue::from(15.0),
//!     },
//!     materials: vec![MaterialRow {
//!         name: "Wax".to_string(),
//!         unit_price: FieldValue::from(100.0),
//!         lot_size: FieldValue::from(10.0),
//!         quantity_used: FieldValue::from(2.0),
//!         ..Default::default()
//!     }],
//!     plant_expenses: vec![
//!         PlantExpense::new("Rent", 300.0),
//!         PlantExpense::new("Electricity", 200.0),
//!     ],
//!     schedule: Default::default(),
//! };
//!
//! let result = calculate(&input);
//! assert_eq!(result.materials_cost, 20.0);
//! assert_eq!(result.plant_cost, 500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CostError, CostResult};
use crate::materials::{self, MaterialRow};
use crate::numeric::{round_money, FieldValue};
use crate::overhead::{self, PlantExpense, WorkSchedule};

// ============================================================================
// TIME FRAMES
// ============================================================================

/// Period an estimate's fixed costs are amortized over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeFrame {
    /// 7 days
    #[default]
    Week,
    /// 14 days
    TwoWeeks,
    /// 30 days
    Month,
    /// No period chosen; fixed costs are taken per single day
    #[serde(other)]
    Unspecified,
}

impl TimeFrame {
    /// All time frame variants for UI selection
    pub const ALL: [TimeFrame; 4] = [
        TimeFrame::Week,
        TimeFrame::TwoWeeks,
        TimeFrame::Month,
        TimeFrame::Unspecified,
    ];

    /// Factor applied to the per-work-day cost to cover the whole period
    pub fn multiplier(&self) -> f64 {
        match self {
            TimeFrame::Week => 7.0,
            TimeFrame::TwoWeeks => 14.0,
            TimeFrame::Month => 30.0,
            TimeFrame::Unspecified => 1.0,
        }
    }

    /// The period length in days
    pub fn days(&self) -> u32 {
        match self {
            TimeFrame::Week => 7,
            TimeFrame::TwoWeeks => 14,
            TimeFrame::Month => 30,
            TimeFrame::Unspecified => 1,
        }
    }

    /// Short code as stored in JSON
    pub fn code(&self) -> &'static str {
        match self {
            TimeFrame::Week => "week",
            TimeFrame::TwoWeeks => "twoWeeks",
            TimeFrame::Month => "month",
            TimeFrame::Unspecified => "unspecified",
        }
    }

    /// Parse from common string representations (unknown strings become
    /// `Unspecified`)
    pub fn from_str_flexible(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "week" | "1week" | "7" | "semana" => TimeFrame::Week,
            "twoweeks" | "2weeks" | "14" | "quincena" => TimeFrame::TwoWeeks,
            "month" | "30" | "mes" => TimeFrame::Month,
            _ => TimeFrame::Unspecified,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeFrame::Week => "One week",
            TimeFrame::TwoWeeks => "Two weeks",
            TimeFrame::Month => "One month",
            TimeFrame::Unspecified => "Unspecified",
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// What is being produced, how much of it, and the margin expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductInfo {
    /// Display name of the product; not used in arithmetic
    #[serde(default)]
    pub product_name: String,
    /// Units expected over the time frame (falls back to 1)
    #[serde(default)]
    pub produced_units: FieldValue,
    /// Period the fixed costs cover
    #[serde(default)]
    pub time_frame: TimeFrame,
    /// Desired markup over unit cost, in percent
    #[serde(default)]
    pub margin_percent: FieldValue,
}

/// Input parameters for a full product estimate.
///
/// All numeric fields are raw form values; `calculate` coerces blanks and
/// junk to safe defaults, so any `EstimateInput` produces a result.
///
/// ## JSON Example
///
/// ```json
/// {
///   "product": {
///     "product_name": "Candle 250g",
///     "produced_units": "40",
///     "time_frame": "week",
///     "margin_percent": 15
///   },
///   "materials": [
///     { "name": "Wax", "unit_price": 100, "lot_size": 10, "lot_unit": "piece", "quantity_used": 2 }
///   ],
///   "plant_expenses": [
///     { "name": "Rent", "monthly_cost": 300 },
///     { "name": "Electricity", "monthly_cost": 200 }
///   ],
///   "schedule": { "work_days": 25, "daily_average_output": "", "extra_unit_cost": "" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EstimateInput {
    /// Product identity, volume and margin
    #[serde(default)]
    pub product: ProductInfo,

    /// Raw-material rows consumed per production run
    #[serde(default)]
    pub materials: Vec<MaterialRow>,

    /// Fixed monthly plant expense rows
    #[serde(default)]
    pub plant_expenses: Vec<PlantExpense>,

    /// Operating schedule spreading fixed costs over days and units
    #[serde(default)]
    pub schedule: WorkSchedule,
}

impl EstimateInput {
    /// Validate that the entered numbers describe a sensible estimate.
    ///
    /// `calculate` never calls this; it exists for shells that want to warn
    /// before computing. Blank and junk fields pass (they coerce to safe
    /// defaults); negative money and a margin at or below -100% do not.
    pub fn validate(&self) -> CostResult<()> {
        for (i, row) in self.materials.iter().enumerate() {
            if row.unit_price.parse_or(0.0) < 0.0 {
                return Err(CostError::invalid_input(
                    format!("materials[{i}].unit_price"),
                    row.unit_price.parse_or(0.0).to_string(),
                    "Price cannot be negative",
                ));
            }
            if row.lot_size.parse_or(1.0) < 0.0 {
                return Err(CostError::invalid_input(
                    format!("materials[{i}].lot_size"),
                    row.lot_size.parse_or(1.0).to_string(),
                    "Lot size cannot be negative",
                ));
            }
            if row.quantity_used.parse_or(0.0) < 0.0 {
                return Err(CostError::invalid_input(
                    format!("materials[{i}].quantity_used"),
                    row.quantity_used.parse_or(0.0).to_string(),
                    "Quantity used cannot be negative",
                ));
            }
        }

        for (i, expense) in self.plant_expenses.iter().enumerate() {
            if expense.monthly_cost.parse_or(0.0) < 0.0 {
                return Err(CostError::invalid_input(
                    format!("plant_expenses[{i}].monthly_cost"),
                    expense.monthly_cost.parse_or(0.0).to_string(),
                    "Monthly cost cannot be negative",
                ));
            }
        }

        if self.schedule.work_days.parse_or(0.0) < 0.0 {
            return Err(CostError::invalid_input(
                "schedule.work_days",
                self.schedule.work_days.parse_or(0.0).to_string(),
                "Work days cannot be negative",
            ));
        }
        if self.schedule.daily_average_output.parse_or(0.0) < 0.0 {
            return Err(CostError::invalid_input(
                "schedule.daily_average_output",
                self.schedule.daily_average_output.parse_or(0.0).to_string(),
                "Daily output cannot be negative",
            ));
        }
        if self.schedule.extra_unit_cost.parse_or(0.0) < 0.0 {
            return Err(CostError::invalid_input(
                "schedule.extra_unit_cost",
                self.schedule.extra_unit_cost.parse_or(0.0).to_string(),
                "Extra unit cost cannot be negative",
            ));
        }

        if self.product.produced_units.parse_or(1.0) < 0.0 {
            return Err(CostError::invalid_input(
                "product.produced_units",
                self.product.produced_units.parse_or(1.0).to_string(),
                "Produced units cannot be negative",
            ));
        }
        let margin = self.product.margin_percent.parse_or(0.0);
        if margin <= -100.0 {
            return Err(CostError::invalid_input(
                "product.margin_percent",
                margin.to_string(),
                "Margin must be greater than -100%",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Results from a product estimate.
///
/// Monetary fields are rounded to 2 decimals; `produced_units` and
/// `margin_percent` echo the parsed inputs unrounded.
///
/// ## JSON Example
///
/// ```json
/// {
///   "materials_cost": 20.0,
///   "plant_cost": 500.0,
///   "cost_per_work_day": 20.0,
///   "fixed_cost_for_period": 140.0,
///   "daily_unit_cost": 20.0,
///   "produced_units": 40.0,
///   "unit_cost": 4.0,
///   "margin_percent": 15.0,
///   "sale_price": 4.6,
///   "profit_per_unit": 0.6,
///   "combined_cost": 520.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Materials consumed by one production run (sum of the rounded rows)
    pub materials_cost: f64,
    /// All monthly plant expenses combined
    pub plant_cost: f64,
    /// Plant cost spread over the days worked (monthly total if no schedule)
    pub cost_per_work_day: f64,
    /// Per-work-day cost scaled to the estimate's time frame
    pub fixed_cost_for_period: f64,
    /// Fixed cost carried by each unit of a single day's output
    pub daily_unit_cost: f64,
    /// Units the estimate spreads its costs across (parsed, fallback 1)
    pub produced_units: f64,
    /// What one unit costs to make
    pub unit_cost: f64,
    /// Margin applied on top of unit cost (parsed, fallback 0)
    pub margin_percent: f64,
    /// Suggested sale price per unit
    pub sale_price: f64,
    /// Earnings per unit at the suggested price
    pub profit_per_unit: f64,
    /// Monthly plant expenses plus one run of materials
    pub combined_cost: f64,
}

impl EstimateResult {
    /// True when the estimate earns money at the suggested price
    pub fn is_profitable(&self) -> bool {
        self.profit_per_unit > 0.0
    }
}

// ============================================================================
// CALCULATION
// ============================================================================

/// Compute a full product estimate.
///
/// Total over any input: blank, junk and zero fields coerce to defaults
/// (divisors fall back to 1) and there is no error path.
pub fn calculate(input: &EstimateInput) -> EstimateResult {
    let materials_cost = materials::total_cost_per_use(&input.materials);

    let plant_total = overhead::total_plant_cost(&input.plant_expenses);
    let work_days = input.schedule.work_days.parse_or(0.0);
    let per_day = overhead::cost_per_work_day(plant_total, work_days);
    let fixed_for_period = per_day * input.product.time_frame.multiplier();

    let produced_units = input.product.produced_units.parse_or(1.0);
    let extra_unit_cost = input.schedule.extra_unit_cost.parse_or(0.0);
    let unit_cost = (materials_cost + fixed_for_period) / produced_units + extra_unit_cost;

    let margin_percent = input.product.margin_percent.parse_or(0.0);
    let sale_price = unit_cost * (1.0 + margin_percent / 100.0);
    let profit_per_unit = sale_price - unit_cost;

    // the per-day-per-unit view needs both schedule numbers to mean anything
    let daily_output = input.schedule.daily_average_output.parse_or(0.0);
    let daily_unit_cost = if work_days != 0.0 && daily_output != 0.0 {
        per_day / daily_output
    } else {
        per_day
    };

    EstimateResult {
        materials_cost,
        plant_cost: round_money(plant_total),
        cost_per_work_day: round_money(per_day),
        fixed_cost_for_period: round_money(fixed_for_period),
        daily_unit_cost: round_money(daily_unit_cost),
        produced_units,
        unit_cost: round_money(unit_cost),
        margin_percent,
        sale_price: round_money(sale_price),
        profit_per_unit: round_money(profit_per_unit),
        combined_cost: round_money(plant_total + materials_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::LotUnit;

    fn base_input() -> EstimateInput {
        EstimateInput {
            product: ProductInfo {
                product_name: "Candle 250g".to_string(),
                produced_units: FieldValue::Empty,
                time_frame: TimeFrame::Week,
                margin_percent: FieldValue::from(15.0),
            },
            materials: vec![MaterialRow {
                name: "Wax".to_string(),
                unit_price: FieldValue::from(100.0),
                lot_size: FieldValue::from(10.0),
                lot_unit: LotUnit::Piece,
                quantity_used: FieldValue::from(2.0),
            }],
            plant_expenses: vec![
                PlantExpense::new("Rent", 300.0),
                PlantExpense::new("Electricity", 200.0),
            ],
            schedule: WorkSchedule {
                work_days: FieldValue::from(25.0),
                daily_average_output: FieldValue::Empty,
                extra_unit_cost: FieldValue::Empty,
            },
        }
    }

    #[test]
    fn test_full_flow() {
        let result = calculate(&base_input());

        assert_eq!(result.materials_cost, 20.0);
        assert_eq!(result.plant_cost, 500.0);
        assert_eq!(result.cost_per_work_day, 20.0);
        assert_eq!(result.fixed_cost_for_period, 140.0);
        // produced_units blank -> 1, so the whole period cost lands on one unit
        assert_eq!(result.produced_units, 1.0);
        assert_eq!(result.unit_cost, 160.0);
        assert_eq!(result.sale_price, 184.0);
        assert_eq!(result.profit_per_unit, 24.0);
        assert_eq!(result.combined_cost, 520.0);
        assert!(result.is_profitable());
    }

    #[test]
    fn test_produced_units_split_cost() {
        let mut input = base_input();
        input.product.produced_units = FieldValue::from(40.0);

        let result = calculate(&input);
        assert_eq!(result.unit_cost, 4.0); // 160 / 40
        assert_eq!(result.sale_price, 4.6);
        assert_eq!(result.profit_per_unit, 0.6);
    }

    #[test]
    fn test_extra_unit_cost_added_after_split() {
        let mut input = base_input();
        input.product.produced_units = FieldValue::from(10.0);
        input.schedule.extra_unit_cost = FieldValue::from(2.5);

        let result = calculate(&input);
        // 160 / 10 + 2.50, the extra is per unit and not divided
        assert_eq!(result.unit_cost, 18.5);
    }

    #[test]
    fn test_time_frame_multipliers() {
        assert_eq!(TimeFrame::Week.multiplier(), 7.0);
        assert_eq!(TimeFrame::TwoWeeks.multiplier(), 14.0);
        assert_eq!(TimeFrame::Month.multiplier(), 30.0);
        assert_eq!(TimeFrame::Unspecified.multiplier(), 1.0);

        let mut input = base_input();
        input.product.time_frame = TimeFrame::Month;
        assert_eq!(calculate(&input).fixed_cost_for_period, 600.0);
    }

    #[test]
    fn test_time_frame_serde() {
        assert_eq!(serde_json::to_string(&TimeFrame::TwoWeeks).unwrap(), "\"twoWeeks\"");
        let parsed: TimeFrame = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(parsed, TimeFrame::Month);
        // unknown strings in stored data land on Unspecified
        let unknown: TimeFrame = serde_json::from_str("\"fortnight\"").unwrap();
        assert_eq!(unknown, TimeFrame::Unspecified);
    }

    #[test]
    fn test_time_frame_from_str_flexible() {
        assert_eq!(TimeFrame::from_str_flexible("Week"), TimeFrame::Week);
        assert_eq!(TimeFrame::from_str_flexible("two weeks"), TimeFrame::TwoWeeks);
        assert_eq!(TimeFrame::from_str_flexible("14"), TimeFrame::TwoWeeks);
        assert_eq!(TimeFrame::from_str_flexible("mes"), TimeFrame::Month);
        assert_eq!(TimeFrame::from_str_flexible("???"), TimeFrame::Unspecified);
    }

    #[test]
    fn test_daily_unit_cost_needs_both_schedule_numbers() {
        // days and output present: 500 / 25 = 20 per day, / 5 = 4 per unit
        let mut input = base_input();
        input.schedule.daily_average_output = FieldValue::from(5.0);
        assert_eq!(calculate(&input).daily_unit_cost, 4.0);

        // no work days: the unspread monthly total passes through
        input.schedule.work_days = FieldValue::Empty;
        assert_eq!(calculate(&input).daily_unit_cost, 500.0);

        // no output either: same passthrough
        input.schedule.daily_average_output = FieldValue::from("n/a");
        assert_eq!(calculate(&input).daily_unit_cost, 500.0);
    }

    #[test]
    fn test_empty_input_is_all_zeros() {
        let result = calculate(&EstimateInput::default());

        assert_eq!(result.materials_cost, 0.0);
        assert_eq!(result.plant_cost, 0.0);
        assert_eq!(result.unit_cost, 0.0);
        assert_eq!(result.sale_price, 0.0);
        assert_eq!(result.profit_per_unit, 0.0);
        assert_eq!(result.produced_units, 1.0);
        assert!(!result.is_profitable());
    }

    #[test]
    fn test_junk_fields_never_poison_results() {
        let mut input = base_input();
        input.materials.push(MaterialRow {
            name: "Mystery".to_string(),
            unit_price: FieldValue::from("call supplier"),
            lot_size: FieldValue::from(""),
            lot_unit: LotUnit::Other,
            quantity_used: FieldValue::from("???"),
        });
        input.schedule.work_days = FieldValue::from("25 days");

        let result = calculate(&input);
        assert!(result.unit_cost.is_finite());
        assert_eq!(result.materials_cost, 20.0);
        // "25 days" does not parse, so the plant total stays unspread
        assert_eq!(result.cost_per_work_day, 500.0);
    }

    #[test]
    fn test_identical_input_identical_result() {
        let input = base_input();
        assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn test_validate_accepts_reasonable_input() {
        assert!(base_input().validate().is_ok());
        // blanks and junk coerce, they are not validation errors
        assert!(EstimateInput::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut input = base_input();
        input.materials[0].unit_price = FieldValue::from(-4.5);

        let err = input.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        match err {
            CostError::InvalidInput { field, .. } => {
                assert_eq!(field, "materials[0].unit_price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_margin_at_or_below_minus_100() {
        let mut input = base_input();
        input.product.margin_percent = FieldValue::from(-100.0);
        assert!(input.validate().is_err());

        input.product.margin_percent = FieldValue::from(-150.0);
        assert!(input.validate().is_err());

        // a discount margin above -100% is allowed
        input.product.margin_percent = FieldValue::from(-50.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_never_gates_calculate() {
        let mut input = base_input();
        input.materials[0].unit_price = FieldValue::from(-4.5);
        assert!(input.validate().is_err());

        // negative flows through the math untouched
        let result = calculate(&input);
        assert_eq!(result.materials_cost, -0.9);
    }

    #[test]
    fn test_input_deserializes_from_partial_json() {
        let json = r#"{
            "product": { "product_name": "Soap", "produced_units": "30" },
            "materials": [ { "name": "Oil", "unit_price": 80, "lot_size": 4, "quantity_used": 1 } ]
        }"#;
        let input: EstimateInput = serde_json::from_str(json).unwrap();

        let result = calculate(&input);
        assert_eq!(result.materials_cost, 20.0);
        assert_eq!(result.plant_cost, 0.0);
        assert_eq!(result.produced_units, 30.0);
    }

    #[test]
    fn test_result_roundtrip() {
        let result = calculate(&base_input());
        let json = serde_json::to_string(&result).unwrap();
        let parsed: EstimateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, parsed);
    }
}
