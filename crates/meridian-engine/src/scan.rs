//! # Barcode Resolution
//!
//! Maps a scanned (or typed) code to a cart mutation.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Barcode Scan Flow                                  │
//! │                                                                         │
//! │  Scanner input "4006381333931"                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogLookup::find_by_barcode  (async, outside the document lock)    │
//! │       │                                                                 │
//! │       ├── Ok(None) ──► ScanOutcome::NotFound                           │
//! │       │                (UI offers creating the catalog entry;          │
//! │       │                 the open document is untouched)                 │
//! │       ▼                                                                 │
//! │  apply_scan(document, item)  (sync, under the lock)                    │
//! │       │                                                                 │
//! │       ├── line already holds the item ──► quantity += 1, re-clamp      │
//! │       │                                                                 │
//! │       └── otherwise ──► populate first empty row (append if none),     │
//! │                         clamp qty 1 against the stock snapshot         │
//! │                                                                         │
//! │  Either mutation may carry a StockWarning on the success path.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use meridian_core::{CatalogItem, CoreResult, Document, StockWarning};

// =============================================================================
// Scan Outcome
// =============================================================================

/// Result of resolving one scan against the open document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScanOutcome {
    /// The code matched a line already in the document; its quantity was
    /// incremented (and possibly clamped back).
    Incremented {
        row: usize,
        warning: Option<StockWarning>,
    },

    /// The item was placed on an empty row (appended if none was free).
    Added {
        row: usize,
        warning: Option<StockWarning>,
    },

    /// No catalog entry carries this code. The caller offers creating
    /// one; nothing in the document changed.
    NotFound { code: String },
}

// =============================================================================
// Scan Application
// =============================================================================

/// Applies a resolved catalog entry to the document.
///
/// Synchronous on purpose: the async lookup happens before the document
/// lock is taken (see `DocumentSession::scan_barcode`).
pub fn apply_scan(doc: &mut Document, item: &CatalogItem) -> CoreResult<ScanOutcome> {
    // Rescan of an item already on the document: bump that line.
    if let Some(row) = doc.lines.iter().position(|l| l.matches_item(&item.id)) {
        let warning = doc.increment_line(row)?;
        return Ok(ScanOutcome::Incremented { row, warning });
    }

    // Otherwise fill the first empty row, appending one if every row is
    // taken.
    let row = match doc.lines.iter().position(|l| l.is_empty()) {
        Some(row) => row,
        None => {
            doc.add_row();
            doc.lines.len() - 1
        }
    };
    doc.select_item(row, item)?;
    // Selection sets quantity 1 unclamped; re-apply so an out-of-stock
    // product scans in as 0 with a warning instead of overselling.
    let warning = doc.set_line_quantity(row, 1)?;
    Ok(ScanOutcome::Added { row, warning })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{DocumentKind, ItemKind};

    fn item(id: &str, stock: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            kind: ItemKind::Product,
            barcode: Some("4006381333931".to_string()),
            price_cents: 299,
            wholesale_price_cents: None,
            stock: Some(stock),
        }
    }

    #[test]
    fn test_first_scan_populates_empty_row() {
        let mut doc = Document::new(DocumentKind::Sale);
        let outcome = apply_scan(&mut doc, &item("p1", 10)).unwrap();

        assert!(matches!(
            outcome,
            ScanOutcome::Added { row: 0, warning: None }
        ));
        assert_eq!(doc.lines[0].quantity, 1);
        assert_eq!(doc.subtotal().cents(), 299);
    }

    #[test]
    fn test_rescan_increments_existing_line() {
        let mut doc = Document::new(DocumentKind::Sale);
        apply_scan(&mut doc, &item("p1", 10)).unwrap();
        let outcome = apply_scan(&mut doc, &item("p1", 10)).unwrap();

        assert!(matches!(
            outcome,
            ScanOutcome::Incremented { row: 0, warning: None }
        ));
        assert_eq!(doc.lines[0].quantity, 2);
        // No second line was created for the same item
        assert_eq!(doc.populated_lines().count(), 1);
    }

    #[test]
    fn test_rescan_clamps_at_stock() {
        let mut doc = Document::new(DocumentKind::Sale);
        apply_scan(&mut doc, &item("p1", 1)).unwrap();

        let outcome = apply_scan(&mut doc, &item("p1", 1)).unwrap();
        match outcome {
            ScanOutcome::Incremented { warning, .. } => {
                let warning = warning.expect("clamped rescan must warn");
                assert_eq!(warning.available, 1);
            }
            other => panic!("expected Incremented, got {:?}", other),
        }
        assert_eq!(doc.lines[0].quantity, 1);
    }

    #[test]
    fn test_scan_out_of_stock_item_warns() {
        let mut doc = Document::new(DocumentKind::Sale);
        let outcome = apply_scan(&mut doc, &item("p1", 0)).unwrap();

        match outcome {
            ScanOutcome::Added { row, warning } => {
                assert_eq!(row, 0);
                assert!(warning.is_some());
            }
            other => panic!("expected Added, got {:?}", other),
        }
        assert_eq!(doc.lines[0].quantity, 0);
    }

    #[test]
    fn test_scan_appends_when_no_empty_row() {
        let mut doc = Document::new(DocumentKind::Sale);
        apply_scan(&mut doc, &item("p1", 10)).unwrap();
        // A restored document may arrive without a ready slot
        doc.lines.retain(|l| !l.is_empty());
        assert_eq!(doc.lines.len(), 1);

        let outcome = apply_scan(&mut doc, &item("p2", 10)).unwrap();
        match outcome {
            ScanOutcome::Added { row, .. } => assert_eq!(row, 1),
            other => panic!("expected Added, got {:?}", other),
        }
        assert!(doc.lines.iter().any(|l| l.matches_item("p2")));
    }
}
