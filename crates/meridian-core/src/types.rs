//! # Domain Types
//!
//! Core domain types used throughout Meridian POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CatalogItem   │   │  DocumentKind   │   │  PaymentStatus  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Sale           │   │  Completed      │       │
//! │  │  name           │   │  Purchase       │   │  Paid           │       │
//! │  │  kind           │   └─────────────────┘   │  Credit         │       │
//! │  │  price_cents    │                         │  Pending        │       │
//! │  │  stock          │   ┌─────────────────┐   │  Cancelled      │       │
//! │  └─────────────────┘   │    TaxRate      │   └─────────────────┘       │
//! │                        │  bps (u32)      │                             │
//! │                        │  825 = 8.25%    │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Status Enum, Two Legal Subsets
//! Sales and purchases use overlapping but distinct status sets
//! (sales: Completed/Credit/Pending/Cancelled, purchases:
//! Paid/Credit/Cancelled). We keep a single `PaymentStatus` enum and let
//! `PaymentStatus::allowed_for` enforce the per-kind subset, because the
//! reconciliation engine is one shared module parameterized by
//! `DocumentKind` rather than six copy-pasted forms.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::SERVICE_STOCK_SENTINEL;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%; the forms enter percentages, the engine stores bps
/// so rate math stays in integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (form input convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

// =============================================================================
// Document Kind
// =============================================================================

/// Whether a document records a sale (to a customer) or a purchase
/// (from a supplier).
///
/// The kind selects the totals strategy and the payment-status table.
/// The two totals formulas differ deliberately (see `totals.rs`) and
/// MUST NOT be unified: historical invoice totals depend on each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Sale,
    Purchase,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of a document.
///
/// Governs how the received amount is derived or constrained; see
/// `reconcile.rs` for the full table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Sale fully paid at the counter.
    Completed,
    /// Purchase fully paid to the supplier.
    Paid,
    /// Partially paid; received amount is user-editable.
    Credit,
    /// Sale recorded but nothing collected yet.
    Pending,
    /// Document cancelled.
    Cancelled,
}

impl PaymentStatus {
    /// Checks whether this status is legal for the given document kind.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::types::{DocumentKind, PaymentStatus};
    ///
    /// assert!(PaymentStatus::Completed.allowed_for(DocumentKind::Sale));
    /// assert!(!PaymentStatus::Completed.allowed_for(DocumentKind::Purchase));
    /// assert!(!PaymentStatus::Pending.allowed_for(DocumentKind::Purchase));
    /// assert!(PaymentStatus::Credit.allowed_for(DocumentKind::Purchase));
    /// ```
    pub fn allowed_for(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Sale => matches!(
                self,
                PaymentStatus::Completed
                    | PaymentStatus::Credit
                    | PaymentStatus::Pending
                    | PaymentStatus::Cancelled
            ),
            DocumentKind::Purchase => matches!(
                self,
                PaymentStatus::Paid | PaymentStatus::Credit | PaymentStatus::Cancelled
            ),
        }
    }

    /// Default status for a fresh document of the given kind.
    pub fn default_for(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Sale => PaymentStatus::Completed,
            DocumentKind::Purchase => PaymentStatus::Paid,
        }
    }
}

// =============================================================================
// Cancelled Policy (sales only)
// =============================================================================

/// What happens to the received amount when a SALE is cancelled.
///
/// The two sale forms historically disagree: the new-sale tab forces the
/// received amount to the full total, the new-sale modal forces it to
/// zero. Both behaviors are kept as named variants selected per
/// call-site; picking one silently would change recorded documents.
/// Purchases always force zero and do not consult this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CancelledPolicy {
    /// Cancelled keeps received == total (new-sale tab behavior).
    ForceTotal,
    /// Cancelled zeroes the received amount (new-sale modal behavior).
    ForceZero,
}

impl Default for CancelledPolicy {
    fn default() -> Self {
        CancelledPolicy::ForceTotal
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// Products hold physical inventory; services are unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Service,
}

/// A catalog entry as returned by the lookup collaborator.
///
/// ## Snapshot Semantics
/// When a line item selects a catalog entry, price and stock are frozen
/// into the line at that moment. Later catalog edits do not reach into
/// open documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the form and on receipts.
    pub name: String,

    /// Product (stock-tracked) or Service (unlimited).
    pub kind: ItemKind,

    /// Barcode (EAN-13, UPC-A, etc.), if assigned.
    pub barcode: Option<String>,

    /// Retail price in cents.
    pub price_cents: i64,

    /// Wholesale/cost price in cents, for margin bookkeeping only.
    pub wholesale_price_cents: Option<i64>,

    /// Current stock level. `None` for services.
    pub stock: Option<i64>,
}

impl CatalogItem {
    /// The stock snapshot a line item captures at selection time.
    ///
    /// Services report the 999 sentinel (effectively unlimited, never
    /// clamped); a product with no recorded stock level counts as zero.
    pub fn stock_snapshot(&self) -> i64 {
        match self.kind {
            ItemKind::Service => SERVICE_STOCK_SENTINEL,
            ItemKind::Product => self.stock.unwrap_or(0),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
