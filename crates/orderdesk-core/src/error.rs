//! # Error Types
//!
//! Domain-specific error types for orderdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderdesk-core errors (this file)                                     │
//! │  ├── CoreError        - Pricing and lookup failures                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  orderdesk-db errors (separate crate)                                  │
//! │  └── DbError          - Storage and transaction failures               │
//! │                                                                         │
//! │  orderdesk app errors                                                  │
//! │  └── ApiError         - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError ← DbError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A requested discount above the ceiling is NOT an error. It is a normal
//! branch of the sale workflow that produces an approval request.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing and domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order line references a SKU the catalog does not know.
    ///
    /// ## When This Occurs
    /// - Typo in the SKU
    /// - Product was never registered
    ///
    /// The whole order is rejected; no line is priced in isolation.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A monetary computation left the representable range.
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any pricing or persistence runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., bad characters in a SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// An order must contain at least one line.
    #[error("order must contain at least one line")]
    EmptyOrder,

    /// A specific order line failed validation.
    #[error("line {index}: {source}")]
    Line {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Wraps this error with the position of the order line it came from.
    pub fn at_line(self, index: usize) -> Self {
        ValidationError::Line {
            index,
            source: Box::new(self),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("MUG-01".to_string());
        assert_eq!(err.to_string(), "Product not found: MUG-01");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("customer").to_string(),
            "customer is required"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_line_error_includes_position() {
        let err = ValidationError::required("sku").at_line(2);
        assert_eq!(err.to_string(), "line 2: sku is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyOrder.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
