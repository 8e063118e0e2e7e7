//! # Totals Strategies
//!
//! Derives tax and total amounts from a subtotal, a flat discount, and a
//! tax rate. There is exactly ONE implementation of each formula here;
//! every sale and purchase form computes through this module.
//!
//! ## Two Formulas, Kept Apart On Purpose
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SALE                              PURCHASE                             │
//! │  ────                              ────────                             │
//! │  after = max(0, subtotal − disc)   tax   = subtotal × rate              │
//! │  tax   = after × rate              total = subtotal + tax − disc        │
//! │  total = after + tax                                                    │
//! │                                                                         │
//! │  Discount BEFORE tax, clamped.     Discount AFTER tax, NOT clamped      │
//! │                                    (total can go negative when the      │
//! │                                    discount exceeds the taxed subtotal).│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The divergence is almost certainly a historical accident, but every
//! recorded invoice total depends on it. Unifying the formulas would
//! silently change amounts on re-opened documents, so both are kept as
//! named strategies pending a product-owner decision.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DocumentKind, TaxRate};

// =============================================================================
// Totals Breakdown
// =============================================================================

/// The derived amounts for one document, before payment reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBreakdown {
    /// Σ line totals over all rows (empty rows contribute 0).
    pub subtotal: Money,

    /// Derived tax amount (base differs by strategy).
    pub tax: Money,

    /// Final charged amount.
    pub total: Money,
}

/// Computes tax and total for the given document kind.
///
/// Pure and total: any `(subtotal, discount, rate)` input produces a
/// breakdown, never an error.
///
/// ## Example
/// ```rust
/// use meridian_core::money::Money;
/// use meridian_core::totals::compute_totals;
/// use meridian_core::types::{DocumentKind, TaxRate};
///
/// let subtotal = Money::from_cents(2500);
/// let discount = Money::from_cents(300);
/// let rate = TaxRate::from_bps(1000); // 10%
///
/// let sale = compute_totals(DocumentKind::Sale, subtotal, discount, rate);
/// assert_eq!(sale.tax.cents(), 220); // on 2200 after discount
/// assert_eq!(sale.total.cents(), 2420);
///
/// let purchase = compute_totals(DocumentKind::Purchase, subtotal, discount, rate);
/// assert_eq!(purchase.tax.cents(), 250); // on pre-discount 2500
/// assert_eq!(purchase.total.cents(), 2450);
/// ```
pub fn compute_totals(
    kind: DocumentKind,
    subtotal: Money,
    discount: Money,
    rate: TaxRate,
) -> TotalsBreakdown {
    match kind {
        DocumentKind::Sale => {
            let after_discount = (subtotal - discount).floor_zero();
            let tax = after_discount.apply_rate(rate);
            TotalsBreakdown {
                subtotal,
                tax,
                total: after_discount + tax,
            }
        }
        DocumentKind::Purchase => {
            let tax = subtotal.apply_rate(rate);
            TotalsBreakdown {
                subtotal,
                tax,
                total: subtotal + tax - discount,
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(v: i64) -> Money {
        Money::from_cents(v)
    }

    #[test]
    fn test_sale_formula_reference_example() {
        // items [{qty 2, $10.00}, {qty 1, $5.00}], discount $3.00, tax 10%
        let t = compute_totals(
            DocumentKind::Sale,
            cents(2500),
            cents(300),
            TaxRate::from_bps(1000),
        );
        assert_eq!(t.subtotal.cents(), 2500);
        assert_eq!(t.tax.cents(), 220);
        assert_eq!(t.total.cents(), 2420);
    }

    #[test]
    fn test_purchase_formula_reference_example() {
        // same inputs, purchase strategy: tax pre-discount, discount post-tax
        let t = compute_totals(
            DocumentKind::Purchase,
            cents(2500),
            cents(300),
            TaxRate::from_bps(1000),
        );
        assert_eq!(t.subtotal.cents(), 2500);
        assert_eq!(t.tax.cents(), 250);
        assert_eq!(t.total.cents(), 2450);
    }

    #[test]
    fn test_sale_discount_clamps_at_zero() {
        // Discount larger than subtotal: taxable base floors at 0
        let t = compute_totals(
            DocumentKind::Sale,
            cents(1000),
            cents(1500),
            TaxRate::from_bps(1000),
        );
        assert_eq!(t.tax, Money::zero());
        assert_eq!(t.total, Money::zero());
    }

    #[test]
    fn test_purchase_discount_not_clamped() {
        // Purchase totals may go negative; this is recorded behavior
        let t = compute_totals(
            DocumentKind::Purchase,
            cents(1000),
            cents(1500),
            TaxRate::from_bps(1000),
        );
        assert_eq!(t.tax.cents(), 100);
        assert_eq!(t.total.cents(), -400);
        assert!(t.total.is_negative());
    }

    #[test]
    fn test_zero_inputs() {
        for kind in [DocumentKind::Sale, DocumentKind::Purchase] {
            let t = compute_totals(kind, Money::zero(), Money::zero(), TaxRate::zero());
            assert_eq!(t.subtotal, Money::zero());
            assert_eq!(t.tax, Money::zero());
            assert_eq!(t.total, Money::zero());
        }
    }

    #[test]
    fn test_strategies_agree_without_discount() {
        // With no discount the two formulas coincide
        let sale = compute_totals(
            DocumentKind::Sale,
            cents(2500),
            Money::zero(),
            TaxRate::from_bps(825),
        );
        let purchase = compute_totals(
            DocumentKind::Purchase,
            cents(2500),
            Money::zero(),
            TaxRate::from_bps(825),
        );
        assert_eq!(sale.total, purchase.total);
    }
}
