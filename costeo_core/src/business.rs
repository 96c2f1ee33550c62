//! # Business Data Structures
//!
//! The `Business` struct is the root container for a user's saved estimates.
//! Businesses serialize to `.cst` (Costeo) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Business
//! ├── meta: BusinessMetadata (version, name, owner, timestamps)
//! ├── defaults: EstimateDefaults (currency, margin, time frame)
//! └── estimates: HashMap<Uuid, SavedEstimate> (inputs + computed results)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::business::Business;
//!
//! let mut business = Business::new("Velas Aurora", "Maria Lopez");
//!
//! // Serialize to JSON
//! let json = serde_json::to_string_pretty(&business).unwrap();
//!
//! // Save to file (see file_io module for atomic saves)
//! std::fs::write("business.cst", &json).unwrap();
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimation::estimate::{self, EstimateInput, EstimateResult, TimeFrame};

/// Current schema version for .cst files
pub const SCHEMA_VERSION: &str = "0.1.0";

// ============================================================================
// CURRENCIES
// ============================================================================

/// Currency a business quotes in.
///
/// A display label carried on snapshots; the engine's arithmetic is
/// dimensionless and never converts between currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Mexican peso
    #[default]
    MXN,
    /// US dollar
    USD,
    /// Canadian dollar
    CAD,
    /// Euro
    EUR,
    /// Argentine peso
    ARS,
    /// Brazilian real
    BRL,
    /// Chilean peso
    CLP,
    /// Colombian peso
    COP,
}

impl Currency {
    /// All currency variants for UI selection
    pub const ALL: [Currency; 8] = [
        Currency::MXN,
        Currency::USD,
        Currency::CAD,
        Currency::EUR,
        Currency::ARS,
        Currency::BRL,
        Currency::CLP,
        Currency::COP,
    ];

    /// ISO 4217 code, also the JSON representation
    pub fn code(&self) -> &'static str {
        match self {
            Currency::MXN => "MXN",
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::ARS => "ARS",
            Currency::BRL => "BRL",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::MXN => "Mexican peso",
            Currency::USD => "US dollar",
            Currency::CAD => "Canadian dollar",
            Currency::EUR => "Euro",
            Currency::ARS => "Argentine peso",
            Currency::BRL => "Brazilian real",
            Currency::CLP => "Chilean peso",
            Currency::COP => "Colombian peso",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// BUSINESS CONTAINER
// ============================================================================

/// Root business container.
///
/// This is the top-level struct that gets serialized to `.cst` files.
/// Estimates are stored in a flat UUID-keyed map for O(1) lookups and
/// stable ids across reorderings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    /// Business metadata (version, name, owner, timestamps)
    pub meta: BusinessMetadata,

    /// Seed values for new estimates
    pub defaults: EstimateDefaults,

    /// All saved estimates, keyed by UUID
    pub estimates: HashMap<Uuid, SavedEstimate>,
}

impl Business {
    /// Create a new empty business.
    ///
    /// # Example
    ///
    /// ```rust
    /// use costeo_core::business::Business;
    ///
    /// let business = Business::new("Velas Aurora", "Maria Lopez");
    /// assert_eq!(business.meta.name, "Velas Aurora");
    /// assert_eq!(business.estimate_count(), 0);
    /// ```
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Business {
            meta: BusinessMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                owner: owner.into(),
                created: now,
                modified: now,
            },
            defaults: EstimateDefaults::default(),
            estimates: HashMap::new(),
        }
    }

    /// Save an estimate under a fresh UUID.
    ///
    /// Returns the UUID assigned to the estimate.
    pub fn add_estimate(&mut self, estimate: SavedEstimate) -> Uuid {
        let id = Uuid::new_v4();
        self.estimates.insert(id, estimate);
        self.touch();
        id
    }

    /// Compute and save an estimate from raw input, using the business
    /// defaults for the currency label.
    pub fn add_estimate_from_input(&mut self, input: EstimateInput) -> Uuid {
        let estimate = SavedEstimate::new(input, self.defaults.currency);
        self.add_estimate(estimate)
    }

    /// Remove an estimate by UUID.
    ///
    /// Returns the removed estimate if it existed.
    pub fn remove_estimate(&mut self, id: &Uuid) -> Option<SavedEstimate> {
        let estimate = self.estimates.remove(id);
        if estimate.is_some() {
            self.touch();
        }
        estimate
    }

    /// Get an estimate by UUID.
    pub fn get_estimate(&self, id: &Uuid) -> Option<&SavedEstimate> {
        self.estimates.get(id)
    }

    /// Get a mutable reference to an estimate by UUID.
    ///
    /// Note: This method updates the modified timestamp when an estimate is
    /// found. Getting a mutable reference marks the business as modified.
    pub fn get_estimate_mut(&mut self, id: &Uuid) -> Option<&mut SavedEstimate> {
        if self.estimates.contains_key(id) {
            self.meta.modified = Utc::now();
            self.estimates.get_mut(id)
        } else {
            None
        }
    }

    /// Number of saved estimates.
    pub fn estimate_count(&self) -> usize {
        self.estimates.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Business {
    fn default() -> Self {
        Business::new("", "")
    }
}

/// Business metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Business name
    pub name: String,

    /// Owner's name
    pub owner: String,

    /// When the business file was created
    pub created: DateTime<Utc>,

    /// When it was last modified
    pub modified: DateTime<Utc>,
}

/// Seed values applied to new estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateDefaults {
    /// Currency label for new estimates
    pub currency: Currency,

    /// Starting margin percentage
    pub margin_percent: f64,

    /// Starting amortization period
    pub time_frame: TimeFrame,
}

impl Default for EstimateDefaults {
    fn default() -> Self {
        EstimateDefaults {
            currency: Currency::MXN,
            margin_percent: 15.0,
            time_frame: TimeFrame::Week,
        }
    }
}

// ============================================================================
// SAVED ESTIMATES
// ============================================================================

/// One saved estimate: the form input and the results computed from it.
///
/// Results are stored alongside inputs so a loaded file can list prices
/// without recomputing; [`SavedEstimate::recalculate`] refreshes them after
/// the input is edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedEstimate {
    /// Currency the figures are quoted in
    pub currency: Currency,

    /// The form input as entered
    pub input: EstimateInput,

    /// Results computed from `input`
    pub result: EstimateResult,

    /// When the estimate was first saved
    pub created: DateTime<Utc>,

    /// When it was last recomputed or edited
    pub modified: DateTime<Utc>,
}

impl SavedEstimate {
    /// Compute and snapshot an estimate from raw input.
    pub fn new(input: EstimateInput, currency: Currency) -> Self {
        let now = Utc::now();
        let result = estimate::calculate(&input);
        SavedEstimate {
            currency,
            input,
            result,
            created: now,
            modified: now,
        }
    }

    /// Recompute the stored result from the stored input.
    pub fn recalculate(&mut self) {
        self.result = estimate::calculate(&self.input);
        self.modified = Utc::now();
    }

    /// The product this estimate prices.
    pub fn product_name(&self) -> &str {
        &self.input.product.product_name
    }
}
