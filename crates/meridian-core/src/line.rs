//! # Line Items
//!
//! A single product/service row within a sale or purchase document,
//! plus the stock-clamp policy applied to quantity edits.
//!
//! ## Row Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Line Item Lifecycle                                │
//! │                                                                         │
//! │  ┌──────────┐  select_item   ┌───────────┐   remove_row  ┌─────────┐   │
//! │  │  Empty   │───────────────►│ Populated │──────────────►│ Removed │   │
//! │  │  (slot)  │                │           │               │         │   │
//! │  └──────────┘                └───────────┘               └─────────┘   │
//! │       ▲                            │                                    │
//! │       │     the document appends a fresh empty row after a row          │
//! │       └──── becomes populated, so there is always one ready slot        │
//! │                                                                         │
//! │  Empty rows price at 0 and contribute 0 to the subtotal.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Clamp
//! Exceeding available stock is NOT an error: the quantity is corrected
//! to the available amount and a [`StockWarning`] is returned for the UI
//! to surface. Services carry the 999 sentinel and never clamp.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{CatalogItem, ItemKind};

// =============================================================================
// Selected Item Snapshot
// =============================================================================

/// The frozen slice of a catalog entry captured when a row selects it.
///
/// ## Why a Snapshot?
/// The document must display and total consistently even if the catalog
/// entry is edited (or restocked) while the form is open. Stock is a
/// snapshot too: the server re-checks on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    /// Catalog entry id (UUID).
    pub item_id: String,

    /// Name at time of selection (frozen).
    pub name: String,

    /// Product (stock-tracked) or Service (unlimited).
    pub kind: ItemKind,
}

// =============================================================================
// Stock Warning
// =============================================================================

/// Non-blocking signal raised when a quantity edit was clamped to the
/// available stock. The edit succeeds; the UI shows the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockWarning {
    pub item_name: String,
    pub available: i64,
}

impl fmt::Display for StockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Only {} units available for {}",
            self.available, self.item_name
        )
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a sale or purchase document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable row id (UUID v4) so the frontend can key rows across edits.
    pub id: String,

    /// Selected catalog entry; `None` while the row is an empty slot.
    pub item: Option<SelectedItem>,

    /// Quantity; defaults to 1, coerced to 0 on invalid input, clamped
    /// against `available_stock` for stock-tracked items.
    pub quantity: i64,

    /// Unit price in cents. Defaults from the catalog entry at selection
    /// time but remains user-editable.
    pub unit_price_cents: i64,

    /// Unit cost in cents, margin bookkeeping only (never charged).
    pub unit_cost_cents: Option<i64>,

    /// Stock snapshot captured at selection time. Services hold the 999
    /// sentinel; empty rows hold 0.
    pub available_stock: i64,
}

impl LineItem {
    /// Creates an empty row (the ready slot appended by the document).
    pub fn empty() -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            item: None,
            quantity: 1,
            unit_price_cents: 0,
            unit_cost_cents: None,
            available_stock: 0,
        }
    }

    /// Whether the row has no item selected yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// Whether the row is backed by tracked inventory.
    ///
    /// Empty rows and services are not; only populated Product rows
    /// participate in stock clamping.
    pub fn is_stock_tracked(&self) -> bool {
        matches!(
            self.item,
            Some(SelectedItem {
                kind: ItemKind::Product,
                ..
            })
        )
    }

    /// Populates the row from a catalog entry, freezing the snapshot.
    ///
    /// `default_price_cents` is chosen by the document (retail price for
    /// sales, wholesale price for purchases). Quantity resets to 1.
    pub fn select(&mut self, item: &CatalogItem, default_price_cents: i64) {
        self.item = Some(SelectedItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind,
        });
        self.quantity = 1;
        self.unit_price_cents = default_price_cents;
        self.unit_cost_cents = item.wholesale_price_cents;
        self.available_stock = item.stock_snapshot();
    }

    /// Whether this row matches a catalog entry (for barcode rescans).
    pub fn matches_item(&self, item_id: &str) -> bool {
        self.item
            .as_ref()
            .is_some_and(|selected| selected.item_id == item_id)
    }

    /// Sets the quantity, applying coercion and the stock clamp.
    ///
    /// ## Behavior
    /// - Negative input coerces to 0 (never errors; submit-time
    ///   validation rejects non-positive quantities on populated rows)
    /// - Stock-tracked rows clamp to `available_stock` and return exactly
    ///   one [`StockWarning`]
    /// - Services (999 sentinel) and empty rows never clamp
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::line::LineItem;
    /// use meridian_core::types::{CatalogItem, ItemKind};
    ///
    /// let cola = CatalogItem {
    ///     id: "p1".into(),
    ///     name: "Cola".into(),
    ///     kind: ItemKind::Product,
    ///     barcode: None,
    ///     price_cents: 299,
    ///     wholesale_price_cents: None,
    ///     stock: Some(3),
    /// };
    /// let mut line = LineItem::empty();
    /// line.select(&cola, cola.price_cents);
    ///
    /// let warning = line.set_quantity(5).unwrap();
    /// assert_eq!(line.quantity, 3); // corrected, not rejected
    /// assert_eq!(warning.to_string(), "Only 3 units available for Cola");
    /// ```
    pub fn set_quantity(&mut self, quantity: i64) -> Option<StockWarning> {
        let requested = quantity.max(0);

        if self.is_stock_tracked() && requested > self.available_stock {
            self.quantity = self.available_stock;
            let name = self
                .item
                .as_ref()
                .map(|i| i.name.clone())
                .unwrap_or_default();
            return Some(StockWarning {
                item_name: name,
                available: self.available_stock,
            });
        }

        self.quantity = requested;
        None
    }

    /// Increments the quantity by 1 (barcode rescan of an existing line)
    /// and re-applies the stock clamp.
    pub fn increment_quantity(&mut self) -> Option<StockWarning> {
        self.set_quantity(self.quantity + 1)
    }

    /// Sets the unit price; negative input coerces to 0.
    pub fn set_unit_price(&mut self, cents: i64) {
        self.unit_price_cents = cents.max(0);
    }

    /// Line total: `quantity × unit_price`. Derived, never settable.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }

    /// Line cost: `quantity × unit_cost` (zero when no cost is recorded).
    /// Feeds margin bookkeeping, never the charged total.
    pub fn line_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents.unwrap_or(0)) * self.quantity
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
