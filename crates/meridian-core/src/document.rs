//! # Document Model
//!
//! A sale or purchase document under edit: an ordered collection of line
//! items plus the scalar adjustments (discount, tax rate) and the payment
//! state. This is the shared engine behind every sale/purchase form.
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mutation → Recompute Pipeline                       │
//! │                                                                         │
//! │  UI edit (qty/price/row/discount/rate/status/received)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Document mutation method                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  recompute()  ── reconciles the received amount against the fresh      │
//! │       │          total for the current status (reconcile.rs)           │
//! │       ▼                                                                 │
//! │  totals()     ── subtotal / tax / total / remaining derived on read    │
//! │                  through ONE totals strategy (totals.rs)               │
//! │                                                                         │
//! │  No UI reactivity system: recompute() is an explicit, synchronous      │
//! │  call made by every mutating method.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Invariants
//! - The document always holds at least one row; removing the last
//!   remaining row is a no-op
//! - After any row becomes populated, an empty trailing row is appended
//!   so there is always one ready slot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::line::{LineItem, StockWarning};
use crate::money::Money;
use crate::reconcile::{clamp_received_input, reconcile_received, remaining};
use crate::totals::{compute_totals, TotalsBreakdown};
use crate::types::{CancelledPolicy, CatalogItem, DocumentKind, PaymentStatus, TaxRate};
use crate::MAX_TAX_RATE_BPS;

// =============================================================================
// Document Totals
// =============================================================================

/// Read-only derived amounts exposed to the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub received_cents: i64,
    pub remaining_cents: i64,
    /// Σ line costs (margin bookkeeping; never charged).
    pub cost_cents: i64,
    /// `subtotal − cost`; informational only.
    pub margin_cents: i64,
}

// =============================================================================
// Document
// =============================================================================

/// A sale or purchase document being edited by one client session.
///
/// All mutation goes through the methods below; each one ends in
/// [`Document::recompute`], so the reconciliation invariants hold between
/// any two calls.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document id (UUID v4), assigned client-side; the submission
    /// endpoint may return its own server-assigned id.
    pub id: String,

    /// Sale or Purchase; selects the totals strategy and status table.
    pub kind: DocumentKind,

    /// Cancelled-status behavior for sales (per call-site variant).
    pub cancelled_policy: CancelledPolicy,

    /// Ordered rows; never empty (see row invariants above).
    pub lines: Vec<LineItem>,

    /// Flat discount in cents, non-negative.
    pub discount_cents: i64,

    /// Tax rate in basis points.
    pub tax_rate: TaxRate,

    /// Payment status; constrained to the kind's legal subset.
    pub status: PaymentStatus,

    /// Received amount; derived or user-editable depending on status.
    pub received_cents: i64,

    /// Customer (sale) or supplier (purchase) id, required for purchases
    /// at submit time.
    pub counterparty_id: Option<String>,

    /// When the document was opened.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Opens a fresh document of the given kind with one empty row.
    pub fn new(kind: DocumentKind) -> Self {
        Document::with_policy(kind, CancelledPolicy::default())
    }

    /// Opens a fresh document with an explicit cancelled policy
    /// (the modal sale form passes [`CancelledPolicy::ForceZero`]).
    pub fn with_policy(kind: DocumentKind, cancelled_policy: CancelledPolicy) -> Self {
        Document {
            id: Uuid::new_v4().to_string(),
            kind,
            cancelled_policy,
            lines: vec![LineItem::empty()],
            discount_cents: 0,
            tax_rate: TaxRate::zero(),
            status: PaymentStatus::default_for(kind),
            received_cents: 0,
            counterparty_id: None,
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Subtotal: Σ line totals (empty rows contribute 0).
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Tax and total through the kind's strategy.
    pub fn breakdown(&self) -> TotalsBreakdown {
        compute_totals(
            self.kind,
            self.subtotal(),
            Money::from_cents(self.discount_cents),
            self.tax_rate,
        )
    }

    /// Full derived surface for the form layer.
    pub fn totals(&self) -> DocumentTotals {
        let breakdown = self.breakdown();
        let received = Money::from_cents(self.received_cents);
        let cost: Money = self.lines.iter().map(|l| l.line_cost()).sum();
        DocumentTotals {
            subtotal_cents: breakdown.subtotal.cents(),
            tax_cents: breakdown.tax.cents(),
            total_cents: breakdown.total.cents(),
            received_cents: received.cents(),
            remaining_cents: remaining(breakdown.total, received).cents(),
            cost_cents: cost.cents(),
            margin_cents: (breakdown.subtotal - cost).cents(),
        }
    }

    /// Rows with an item selected (what submission actually sends).
    pub fn populated_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(|l| !l.is_empty())
    }

    // -------------------------------------------------------------------------
    // Row mutations
    // -------------------------------------------------------------------------

    /// Appends an empty row and returns its id.
    pub fn add_row(&mut self) -> String {
        let row = LineItem::empty();
        let id = row.id.clone();
        self.lines.push(row);
        id
    }

    /// Removes the row at `index`.
    ///
    /// Removing the last remaining row is a no-op: the document never
    /// holds fewer than one row.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.lines.len() {
            return Err(CoreError::RowNotFound { index });
        }
        if self.lines.len() > 1 {
            self.lines.remove(index);
            self.ensure_ready_slot();
        }
        self.recompute();
        Ok(())
    }

    /// Populates the row at `index` from a catalog entry.
    ///
    /// Sales default the unit price to the retail price; purchases to the
    /// wholesale price when one is recorded.
    pub fn select_item(&mut self, index: usize, item: &CatalogItem) -> CoreResult<()> {
        let default_price = match self.kind {
            DocumentKind::Sale => item.price_cents,
            DocumentKind::Purchase => item.wholesale_price_cents.unwrap_or(item.price_cents),
        };
        self.line_mut(index)?.select(item, default_price);
        self.ensure_ready_slot();
        self.recompute();
        Ok(())
    }

    /// Sets a row's quantity; the stock clamp may correct it and warn.
    pub fn set_line_quantity(
        &mut self,
        index: usize,
        quantity: i64,
    ) -> CoreResult<Option<StockWarning>> {
        let warning = self.line_mut(index)?.set_quantity(quantity);
        self.recompute();
        Ok(warning)
    }

    /// Increments a row's quantity by 1 (barcode rescan), re-clamping.
    pub fn increment_line(&mut self, index: usize) -> CoreResult<Option<StockWarning>> {
        let warning = self.line_mut(index)?.increment_quantity();
        self.recompute();
        Ok(warning)
    }

    /// Sets a row's unit price (negative input coerces to 0).
    pub fn set_line_price(&mut self, index: usize, cents: i64) -> CoreResult<()> {
        self.line_mut(index)?.set_unit_price(cents);
        self.recompute();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Scalar mutations
    // -------------------------------------------------------------------------

    /// Sets the flat discount (negative input coerces to 0).
    pub fn set_discount(&mut self, cents: i64) {
        self.discount_cents = cents.max(0);
        self.recompute();
    }

    /// Sets the tax rate, capping at 100%.
    pub fn set_tax_rate(&mut self, rate: TaxRate) {
        self.tax_rate = TaxRate::from_bps(rate.bps().min(MAX_TAX_RATE_BPS));
        self.recompute();
    }

    /// Transitions the payment status, re-applying the reconciliation
    /// table immediately.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::document::Document;
    /// use meridian_core::types::{DocumentKind, PaymentStatus};
    ///
    /// let mut doc = Document::new(DocumentKind::Purchase);
    /// // Pending is a sale-only status
    /// assert!(doc.set_status(PaymentStatus::Pending).is_err());
    /// assert!(doc.set_status(PaymentStatus::Credit).is_ok());
    /// ```
    pub fn set_status(&mut self, status: PaymentStatus) -> CoreResult<()> {
        if !status.allowed_for(self.kind) {
            return Err(ValidationError::StatusNotAllowed {
                status,
                kind: self.kind,
            }
            .into());
        }
        self.status = status;
        self.recompute();
        Ok(())
    }

    /// Sets the received amount.
    ///
    /// Only Credit documents take manual input (clamped to
    /// `[0, total]`); for every other status the reconciliation table
    /// immediately overwrites whatever was passed.
    pub fn set_received(&mut self, cents: i64) {
        if self.status == PaymentStatus::Credit {
            let total = self.breakdown().total;
            self.received_cents =
                clamp_received_input(total, Money::from_cents(cents)).cents();
        }
        self.recompute();
    }

    /// Sets the customer/supplier reference.
    pub fn set_counterparty(&mut self, id: Option<String>) {
        self.counterparty_id = id;
    }

    // -------------------------------------------------------------------------
    // Recompute
    // -------------------------------------------------------------------------

    /// Re-enforces the payment reconciliation invariant against the
    /// current total. Every mutating method above ends here; the derived
    /// amounts themselves are computed on read and need no refresh.
    pub fn recompute(&mut self) {
        let total = self.breakdown().total;
        self.received_cents = reconcile_received(
            self.kind,
            self.status,
            self.cancelled_policy,
            total,
            Money::from_cents(self.received_cents),
        )
        .cents();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut LineItem> {
        self.lines
            .get_mut(index)
            .ok_or(CoreError::RowNotFound { index })
    }

    /// Appends an empty trailing row unless one is already waiting.
    fn ensure_ready_slot(&mut self) {
        let has_empty_tail = self.lines.last().is_some_and(|l| l.is_empty());
        if !has_empty_tail {
            self.lines.push(LineItem::empty());
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
