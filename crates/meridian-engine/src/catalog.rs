//! # Catalog Lookup Collaborator
//!
//! The seam between document editing and the product catalog. The engine
//! never touches storage; whoever hosts it (server action, test double)
//! implements [`CatalogLookup`].

use async_trait::async_trait;
use thiserror::Error;

use meridian_core::CatalogItem;

use crate::error::{ApiError, ErrorCode};

// =============================================================================
// Lookup Trait
// =============================================================================

/// Resolves identifiers and barcodes to catalog entries.
///
/// ## Contract
/// - `Ok(Some(item))`: entry found
/// - `Ok(None)`: the DISTINCT not-found signal. Callers use it to offer
///   creating a new catalog entry; it never aborts the open document
/// - `Err(_)`: the collaborator itself failed (network, backend)
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Looks up an entry by scanned/typed barcode.
    async fn find_by_barcode(&self, code: &str) -> Result<Option<CatalogItem>, LookupError>;

    /// Looks up an entry by its catalog id.
    async fn find_by_id(&self, id: &str) -> Result<Option<CatalogItem>, LookupError>;
}

/// Failure of the lookup collaborator (not "no such item").
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("catalog lookup failed: {0}")]
    Backend(String),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::new(ErrorCode::LookupFailed, err.to_string())
    }
}

// =============================================================================
// Barcode Detection
// =============================================================================

/// Checks if a query looks like a barcode (8-13 numeric digits).
///
/// ## Barcode Formats Detected
/// - EAN-8: 8 digits
/// - UPC-A: 12 digits
/// - EAN-13: 13 digits
///
/// ## Why This Matters
/// Barcode scanners "type" the full code in under 50ms. Detecting the
/// pattern lets the form route scanner input straight to the exact
/// lookup instead of the debounced name search.
pub fn is_barcode_query(query: &str) -> bool {
    let len = query.len();
    (8..=13).contains(&len) && query.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_barcode_query() {
        assert!(is_barcode_query("40063813")); // EAN-8
        assert!(is_barcode_query("036000291452")); // UPC-A
        assert!(is_barcode_query("4006381333931")); // EAN-13

        assert!(!is_barcode_query("coke"));
        assert!(!is_barcode_query("1234567")); // too short
        assert!(!is_barcode_query("12345678901234")); // too long
        assert!(!is_barcode_query("40063813a"));
        assert!(!is_barcode_query(""));
    }

    #[test]
    fn test_lookup_error_maps_to_api_error() {
        let err: ApiError = LookupError::Backend("timeout".to_string()).into();
        assert_eq!(err.code, ErrorCode::LookupFailed);
        assert!(err.message.contains("timeout"));
    }
}
