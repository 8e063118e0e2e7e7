//! # Payment Reconciliation
//!
//! Derives and constrains the received amount as the payment status or
//! the computed total changes, and exposes the remaining balance.
//!
//! ## The Status Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SALES                                                                  │
//! │  ─────                                                                  │
//! │  Completed  → received forced to total                                  │
//! │  Pending    → received forced to 0                                      │
//! │  Cancelled  → per call-site policy: ForceTotal (tab form) or            │
//! │               ForceZero (modal form)                                    │
//! │  Credit     → user-editable; input clamps to [0, total]; a recompute    │
//! │               that leaves the prior value above the new total RESETS    │
//! │               it to 0                                                   │
//! │                                                                         │
//! │  PURCHASES                                                              │
//! │  ─────────                                                              │
//! │  Paid       → received forced to total                                  │
//! │  Cancelled  → received forced to 0                                      │
//! │  Credit     → user-editable; clamps to [0, total] on set AND on         │
//! │               recompute                                                 │
//! │                                                                         │
//! │  Always: remaining = max(0, total − received)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Changing the status immediately re-applies the table; changing the
//! total re-applies it for the current status. Submit-time validation
//! independently rejects `received > total` (see `validation.rs`).

use crate::money::Money;
use crate::types::{CancelledPolicy, DocumentKind, PaymentStatus};

// =============================================================================
// Reconciliation
// =============================================================================

/// Returns the received amount enforced by the status table, given the
/// current total and the previously held received amount.
///
/// Called by `Document::recompute` after every mutation and by
/// `Document::set_status` on transitions, so the invariant
/// `0 ≤ received ≤ max(0, total)` holds after any recompute.
pub fn reconcile_received(
    kind: DocumentKind,
    status: PaymentStatus,
    policy: CancelledPolicy,
    total: Money,
    current: Money,
) -> Money {
    match (kind, status) {
        (DocumentKind::Sale, PaymentStatus::Completed) => total,
        (DocumentKind::Sale, PaymentStatus::Pending) => Money::zero(),
        (DocumentKind::Sale, PaymentStatus::Cancelled) => match policy {
            CancelledPolicy::ForceTotal => total,
            CancelledPolicy::ForceZero => Money::zero(),
        },
        // A sale on credit whose total dropped below what was already
        // entered resets to 0 (the cashier re-enters the payment);
        // negative entries floor at 0.
        (DocumentKind::Sale, PaymentStatus::Credit) => {
            if current > total {
                Money::zero()
            } else {
                current.floor_zero()
            }
        }

        (DocumentKind::Purchase, PaymentStatus::Paid) => total,
        (DocumentKind::Purchase, PaymentStatus::Cancelled) => Money::zero(),
        // Purchase credit clamps instead of resetting.
        (DocumentKind::Purchase, PaymentStatus::Credit) => clamp_received_input(total, current),

        // Statuses outside the kind's legal subset are rejected by
        // set_status before reaching here; treat defensively as forced-0.
        _ => Money::zero(),
    }
}

/// Clamps a user-entered received amount to `[0, max(0, total)]`.
///
/// Only Credit documents accept manual input; all other statuses derive
/// the amount. The upper bound floors at zero so a negative purchase
/// total (discount exceeding the taxed subtotal) cannot invert the range.
pub fn clamp_received_input(total: Money, input: Money) -> Money {
    input.clamp(Money::zero(), total.floor_zero())
}

/// Outstanding balance: `max(0, total − received)`.
pub fn remaining(total: Money, received: Money) -> Money {
    (total - received).floor_zero()
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
    fn test_completed_and_paid_force_total() {
        // Prior manual edits are irrelevant: received == total always
        for (kind, status) in [
            (DocumentKind::Sale, PaymentStatus::Completed),
            (DocumentKind::Purchase, PaymentStatus::Paid),
        ] {
            let received = reconcile_received(
                kind,
                status,
                CancelledPolicy::default(),
                cents(2420),
                cents(1000),
            );
            assert_eq!(received.cents(), 2420);
        }
    }

    #[test]
    fn test_pending_and_purchase_cancelled_force_zero() {
        let received = reconcile_received(
            DocumentKind::Sale,
            PaymentStatus::Pending,
            CancelledPolicy::default(),
            cents(2420),
            cents(1000),
        );
        assert_eq!(received, Money::zero());

        let received = reconcile_received(
            DocumentKind::Purchase,
            PaymentStatus::Cancelled,
            CancelledPolicy::default(),
            cents(2450),
            cents(2450),
        );
        assert_eq!(received, Money::zero());
    }

    #[test]
    fn test_sale_cancelled_follows_policy() {
        let total = cents(2420);
        let received = reconcile_received(
            DocumentKind::Sale,
            PaymentStatus::Cancelled,
            CancelledPolicy::ForceTotal,
            total,
            cents(0),
        );
        assert_eq!(received, total);

        let received = reconcile_received(
            DocumentKind::Sale,
            PaymentStatus::Cancelled,
            CancelledPolicy::ForceZero,
            total,
            cents(2420),
        );
        assert_eq!(received, Money::zero());
    }

    #[test]
    fn test_sale_credit_resets_when_total_drops() {
        // received 1000 on total 2420: kept
        let kept = reconcile_received(
            DocumentKind::Sale,
            PaymentStatus::Credit,
            CancelledPolicy::default(),
            cents(2420),
            cents(1000),
        );
        assert_eq!(kept.cents(), 1000);

        // total recomputed down to 800: prior 1000 resets to 0, not 800
        let reset = reconcile_received(
            DocumentKind::Sale,
            PaymentStatus::Credit,
            CancelledPolicy::default(),
            cents(800),
            cents(1000),
        );
        assert_eq!(reset, Money::zero());
    }

    #[test]
    fn test_purchase_credit_clamps_when_total_drops() {
        let clamped = reconcile_received(
            DocumentKind::Purchase,
            PaymentStatus::Credit,
            CancelledPolicy::default(),
            cents(800),
            cents(1000),
        );
        assert_eq!(clamped.cents(), 800);
    }

    #[test]
    fn test_clamp_received_input() {
        let total = cents(2420);
        assert_eq!(clamp_received_input(total, cents(5000)), total);
        assert_eq!(clamp_received_input(total, cents(-10)), Money::zero());
        assert_eq!(clamp_received_input(total, cents(1000)).cents(), 1000);

        // Negative purchase total: range floors at zero instead of
        // inverting
        assert_eq!(clamp_received_input(cents(-400), cents(100)), Money::zero());
    }

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(remaining(cents(2420), cents(1000)).cents(), 1420);
        assert_eq!(remaining(cents(2420), cents(2420)), Money::zero());
        assert_eq!(remaining(cents(1000), cents(2000)), Money::zero());
    }
}
