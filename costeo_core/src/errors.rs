//! # Error Types
//!
//! Structured error types for costeo_core. The estimation engine itself is
//! total (malformed numeric input coerces to defaults and never raises), so
//! these errors cover everything around it: the optional strict-validation
//! layer, snapshot file I/O, and serialization.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::errors::{CostError, CostResult};
//!
//! fn check_margin(margin_percent: f64) -> CostResult<()> {
//!     if margin_percent <= -100.0 {
//!         return Err(CostError::InvalidInput {
//!             field: "margin_percent".to_string(),
//!             value: margin_percent.to_string(),
//!             reason: "Margin must be greater than -100%".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for costeo_core operations
pub type CostResult<T> = Result<T, CostError>;

/// Structured error type for operations around the estimation engine.
///
/// Each variant provides specific context about what went wrong, enabling
/// programmatic handling by API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CostError {
    /// An input value fails the caller-side sanity checks
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CostError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CostError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CostError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CostError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CostError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CostError::InvalidInput { .. } => "INVALID_INPUT",
            CostError::FileError { .. } => "FILE_ERROR",
            CostError::FileLocked { .. } => "FILE_LOCKED",
            CostError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CostError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CostError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CostError::invalid_input("unit_price", "-4.50", "Price cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CostError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CostError::invalid_input("f", "v", "r").error_code(),
            "INVALID_INPUT"
        );
        assert_eq!(
            CostError::file_locked("book.cst", "user", "now").error_code(),
            "FILE_LOCKED"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(CostError::file_locked("book.cst", "user", "now").is_recoverable());
        assert!(!CostError::invalid_input("f", "v", "r").is_recoverable());
    }
}
