//! # API Error Type
//!
//! Unified error type surfaced to the form layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in Meridian POS                             │
//! │                                                                         │
//! │  Frontend                     Rust Backend                              │
//! │  ────────                     ────────────                              │
//! │                                                                         │
//! │  submit / scan / edit                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Session method                                                  │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation failed? ── ValidationError ──────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Collaborator failed? ── lookup/submit error ── ApiError ──────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR", "message": "supplier must be..." }       │
//! │                                                                         │
//! │  NOT HERE: stock warnings. Those ride on success responses             │
//! │  (the edit happened, corrected) — see DocumentResponse.warning.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use meridian_core::{CoreError, ValidationError};

/// API error returned to the form layer.
///
/// ## Serialization
/// This is what the frontend receives when an operation fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "supplier must be selected before submitting"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced row/entity does not exist
    NotFound,

    /// Submit-time validation failed (400)
    ValidationError,

    /// Catalog lookup collaborator failed (the distinct barcode
    /// "not found" outcome is NOT this — see ScanOutcome::NotFound)
    LookupFailed,

    /// Submission endpoint collaborator failed
    SubmissionFailed,

    /// A submission is already outstanding for this session
    SubmitInProgress,

    /// Business rule violation (422)
    BusinessLogic,

    /// Anything unexpected (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RowNotFound { index } => {
                ApiError::new(ErrorCode::NotFound, format!("Line {} does not exist", index))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts validation errors to API errors (submission aborts).
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
