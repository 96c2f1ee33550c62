//! # costeo_core - Small-Business Cost Estimation Engine
//!
//! `costeo_core` is the computational heart of Costeo: it turns the numbers a
//! small producer knows (what materials cost, what the plant costs per month,
//! how much gets made) into the numbers they need (unit cost, sale price,
//! profit). All inputs and outputs are JSON-serializable, so any form layer
//! or API can sit on top.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Total**: Blank or malformed form fields coerce to safe defaults;
//!   the calculators never fail
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types for everything around the math
//!
//! ## Quick Start
//!
//! ```rust
//! use costeo_core::estimation::estimate::{calculate, EstimateInput};
//! use costeo_core::materials::MaterialRow;
//! use costeo_core::numeric::FieldValue;
//!
//! let mut input = EstimateInput::default();
//! input.product.margin_percent = FieldValue::from(15.0);
//! input.materials.push(MaterialRow {
//!     name: "Wax".to_string(),
//!     unit_price: FieldValue::from(100.0),
//!     lot_size: FieldValue::from(10.0),
//!     quantity_used: FieldValue::from(2.0),
//!     ..Default::default()
//! });
//!
//! let result = calculate(&input);
//! assert_eq!(result.unit_cost, 20.0);
//! assert_eq!(result.sale_price, 23.0);
//! ```
//!
//! ## Modules
//!
//! - [`numeric`] - Tolerant form-field values and money rounding
//! - [`materials`] - Raw-material rows and per-run cost derivation
//! - [`overhead`] - Plant expenses and the operating schedule
//! - [`estimation`] - The estimate and quick-quote calculators
//! - [`breakdown`] - Chart-ready cost slices
//! - [`business`] - Business container with saved estimates
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod breakdown;
pub mod business;
pub mod errors;
pub mod estimation;
pub mod file_io;
pub mod materials;
pub mod numeric;
pub mod overhead;

// Re-export commonly used types at crate root for convenience
pub use business::{Business, BusinessMetadata, Currency, EstimateDefaults, SavedEstimate};
pub use errors::{CostError, CostResult};
pub use estimation::{EstimateInput, EstimateResult, QuickQuoteInput, QuickQuoteResult};
pub use file_io::{load_business, save_business, FileLock};
