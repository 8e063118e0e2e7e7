//! # Validation Module
//!
//! Submit-time validation for documents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Enforcement Styles                             │
//! │                                                                         │
//! │  LIVE (while editing)            SUBMIT (this module)                   │
//! │  ────────────────────            ────────────────────                   │
//! │  coerce: negative → 0            reject: structured ValidationError     │
//! │  clamp:  qty → stock             abort:  endpoint never called,         │
//! │  reset:  credit received                 no partial state persisted     │
//! │                                                                         │
//! │  Live editing CORRECTS input so the form never blocks typing.          │
//! │  Submission REJECTS so nothing inconsistent reaches the server.        │
//! │  Both run: submit re-checks received ≤ total even though the           │
//! │  reconciler maintains it, because Credit forms historically let        │
//! │  stale values slip through between recomputes.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::document::Document;
use crate::error::ValidationError;
use crate::types::DocumentKind;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Document Validation
// =============================================================================

/// Validates a document for submission.
///
/// Checks, in order:
/// 1. At least one populated row
/// 2. No numeric input stranded on a row without an item selection
/// 3. Every populated row has a positive quantity
/// 4. `received ≤ total`
/// 5. Purchases name a supplier
///
/// The first failure aborts; the caller surfaces it as a structured
/// `{code, message}` to the form.
pub fn validate_for_submit(doc: &Document) -> ValidationResult<()> {
    if doc.populated_lines().next().is_none() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for (row, line) in doc.lines.iter().enumerate() {
        if line.is_empty() {
            // A price typed into the ready slot means the user forgot to
            // pick the item; the trailing untouched slot passes through.
            if line.unit_price_cents > 0 {
                return Err(ValidationError::ItemNotSelected { row });
            }
            continue;
        }

        if line.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("quantity (line {})", row + 1),
            });
        }
    }

    let totals = doc.totals();
    if totals.received_cents > totals.total_cents {
        return Err(ValidationError::ReceivedExceedsTotal {
            received_cents: totals.received_cents,
            total_cents: totals.total_cents,
        });
    }

    if doc.kind == DocumentKind::Purchase && doc.counterparty_id.is_none() {
        return Err(ValidationError::MissingCounterpart {
            field: "supplier".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogItem, ItemKind, PaymentStatus};

    fn product() -> CatalogItem {
        CatalogItem {
            id: "p1".to_string(),
            name: "Cola".to_string(),
            kind: ItemKind::Product,
            barcode: None,
            price_cents: 1000,
            wholesale_price_cents: None,
            stock: Some(50),
        }
    }

    fn populated_sale() -> Document {
        let mut doc = Document::new(DocumentKind::Sale);
        doc.select_item(0, &product()).unwrap();
        doc
    }

    #[test]
    fn test_empty_document_rejected() {
        let doc = Document::new(DocumentKind::Sale);
        assert!(matches!(
            validate_for_submit(&doc),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_populated_sale_passes() {
        assert!(validate_for_submit(&populated_sale()).is_ok());
    }

    #[test]
    fn test_price_on_empty_row_rejected() {
        let mut doc = populated_sale();
        let slot = doc.lines.len() - 1;
        doc.set_line_price(slot, 500).unwrap();
        assert!(matches!(
            validate_for_submit(&doc),
            Err(ValidationError::ItemNotSelected { row }) if row == slot
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut doc = populated_sale();
        doc.set_line_quantity(0, 0).unwrap();
        assert!(matches!(
            validate_for_submit(&doc),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_untouched_ready_slot_passes() {
        let doc = populated_sale();
        assert!(doc.lines.last().unwrap().is_empty());
        assert!(validate_for_submit(&doc).is_ok());
    }

    #[test]
    fn test_received_exceeding_total_rejected() {
        let mut doc = populated_sale();
        doc.set_status(PaymentStatus::Credit).unwrap();
        doc.set_received(500);
        // Simulate a stale value that slipped past a recompute
        doc.received_cents = 99_999;
        assert!(matches!(
            validate_for_submit(&doc),
            Err(ValidationError::ReceivedExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_purchase_requires_supplier() {
        let mut doc = Document::new(DocumentKind::Purchase);
        doc.select_item(0, &product()).unwrap();

        assert!(matches!(
            validate_for_submit(&doc),
            Err(ValidationError::MissingCounterpart { .. })
        ));

        doc.set_counterparty(Some("supplier-1".to_string()));
        assert!(validate_for_submit(&doc).is_ok());
    }
}
