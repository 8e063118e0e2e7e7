//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - Document operation failures                    │
//! │  └── ValidationError  - Submit-time validation failures                │
//! │                                                                         │
//! │  meridian-engine errors (separate crate)                               │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! │                                                                         │
//! │  NOT errors: stock clamping. Exceeding available stock CORRECTS the    │
//! │  quantity in place and raises a StockWarning signal instead.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (row index, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::{DocumentKind, PaymentStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Document operation errors.
///
/// These represent business rule violations; they abort the operation
/// and leave the document unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A mutation referenced a line row that does not exist.
    #[error("Line {index} does not exist")]
    RowNotFound { index: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Submit-time and input validation errors.
///
/// Submission is aborted on the FIRST failure; no partial state is
/// persisted and the endpoint collaborator is never called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Status is not in the legal set for this document kind.
    #[error("{status:?} is not a valid status for a {kind:?} document")]
    StatusNotAllowed {
        status: PaymentStatus,
        kind: DocumentKind,
    },

    /// A populated row lost its item selection (or a quantity was entered
    /// on a row with no item).
    #[error("Line {row} has no item selected")]
    ItemNotSelected { row: usize },

    /// Received amount exceeds the computed total.
    ///
    /// Live editing clamps/resets where the reconciliation table says so,
    /// but submit independently re-checks and rejects instead of
    /// correcting.
    #[error("Received amount {received_cents} exceeds total {total_cents}")]
    ReceivedExceedsTotal {
        received_cents: i64,
        total_cents: i64,
    },

    /// The required counterpart (supplier for purchases, staff member for
    /// sales) is missing.
    #[error("{field} must be selected before submitting")]
    MissingCounterpart { field: String },
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
        let err = CoreError::RowNotFound { index: 3 };
        assert_eq!(err.to_string(), "Line 3 does not exist");

        let err = ValidationError::ReceivedExceedsTotal {
            received_cents: 3000,
            total_cents: 2420,
        };
        assert_eq!(err.to_string(), "Received amount 3000 exceeds total 2420");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "supplier".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_status_not_allowed_message() {
        let err = ValidationError::StatusNotAllowed {
            status: PaymentStatus::Pending,
            kind: DocumentKind::Purchase,
        };
        assert!(err.to_string().contains("Pending"));
        assert!(err.to_string().contains("Purchase"));
    }
}
