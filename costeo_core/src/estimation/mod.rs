//! # Cost Estimation
//!
//! The calculation engines. Each calculator follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> *Result` - Pure calculation function
//!
//! The engines are total: blank or malformed form values coerce to safe
//! defaults inside the math, so `calculate` never fails. The stricter
//! "does this look like a sensible estimate" checks live on
//! [`EstimateInput::validate`] and are the caller's choice to run.
//!
//! ## Available Calculators
//!
//! - [`estimate`] - Full product estimate (materials + overhead + margin)
//! - [`quick`] - Quick markup quote (base cost + margin + quantity)

pub mod estimate;
pub mod quick;

// Re-export commonly used types
pub use estimate::{EstimateInput, EstimateResult, ProductInfo, TimeFrame};
pub use quick::{QuickQuoteInput, QuickQuoteResult};
