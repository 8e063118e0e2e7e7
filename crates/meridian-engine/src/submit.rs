//! # Submission
//!
//! The seam between a validated document and whatever persists it, plus
//! the duplicate-submit latch.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Submission Flow                                   │
//! │                                                                         │
//! │  submit() called                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  latch already set? ──► yes ──► SUBMIT_IN_PROGRESS error               │
//! │       │ no (set it)                                                     │
//! │       ▼                                                                 │
//! │  validate_for_submit + staff check                                     │
//! │       │ fail ──► structured ValidationError, endpoint NEVER called     │
//! │       ▼                                                                 │
//! │  build DocumentPayload (fully computed: lines, totals, status)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SubmissionEndpoint::submit(payload).await                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SubmitReceipt (server id + itemized echo → receipt printing)          │
//! │                                                                         │
//! │  The latch clears when the guard drops — success, error, or panic.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use meridian_core::{Document, DocumentKind, DocumentTotals, PaymentStatus};

use crate::context::SessionContext;
use crate::error::{ApiError, ErrorCode};

// =============================================================================
// Payload
// =============================================================================

/// One populated line as sent to the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLine {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub unit_cost_cents: Option<i64>,
    pub line_total_cents: i64,
}

/// The fully-computed document handed to the submission endpoint.
///
/// Totals are computed client-side and sent along; the endpoint re-checks
/// stock and may reprice, but the document as displayed is what gets
/// recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub document_id: String,
    pub kind: DocumentKind,
    pub lines: Vec<PayloadLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: PaymentStatus,
    pub received_cents: i64,
    pub counterparty_id: Option<String>,
    pub staff_id: Option<String>,
    pub device_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl DocumentPayload {
    /// Builds the payload from a document and its session context.
    /// Only populated rows are sent; the ready slot stays client-side.
    pub fn build(doc: &Document, totals: &DocumentTotals, ctx: &SessionContext) -> Self {
        let lines = doc
            .populated_lines()
            .filter_map(|line| {
                line.item.as_ref().map(|item| PayloadLine {
                    item_id: item.item_id.clone(),
                    name: item.name.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    unit_cost_cents: line.unit_cost_cents,
                    line_total_cents: line.line_total().cents(),
                })
            })
            .collect();

        DocumentPayload {
            document_id: doc.id.clone(),
            kind: doc.kind,
            lines,
            subtotal_cents: totals.subtotal_cents,
            discount_cents: doc.discount_cents,
            tax_rate_bps: doc.tax_rate.bps(),
            tax_cents: totals.tax_cents,
            total_cents: totals.total_cents,
            status: doc.status,
            received_cents: totals.received_cents,
            counterparty_id: doc.counterparty_id.clone(),
            staff_id: ctx.staff_id.clone(),
            device_id: ctx.device_id.clone(),
            submitted_at: Utc::now(),
        }
    }
}

// =============================================================================
// Endpoint Trait
// =============================================================================

/// Acknowledgement from the submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAck {
    /// Server-assigned identifier, when the backend mints its own.
    pub server_id: Option<String>,
}

/// Accepts a fully-computed document for persistence.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(&self, payload: DocumentPayload) -> Result<SubmitAck, SubmitError>;
}

/// Failure of the submission collaborator.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// The backend refused the document (e.g., stock re-check failed).
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or crashed.
    #[error("submission failed: {0}")]
    Backend(String),
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        ApiError::new(ErrorCode::SubmissionFailed, err.to_string())
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// What the form needs to print a receipt after a successful submit.
///
/// Echoes the submitted lines so printing never re-reads the (already
/// cleared) form state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub document_id: String,
    pub server_id: Option<String>,
    pub store_name: String,
    pub timestamp: String,
    pub lines: Vec<PayloadLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub received_cents: i64,
    pub remaining_cents: i64,
}

impl SubmitReceipt {
    pub(crate) fn assemble(
        payload: DocumentPayload,
        ack: SubmitAck,
        totals: &DocumentTotals,
        ctx: &SessionContext,
    ) -> Self {
        SubmitReceipt {
            document_id: payload.document_id,
            server_id: ack.server_id,
            store_name: ctx.store_name.clone(),
            timestamp: payload.submitted_at.to_rfc3339(),
            lines: payload.lines,
            subtotal_cents: payload.subtotal_cents,
            discount_cents: payload.discount_cents,
            tax_cents: payload.tax_cents,
            total_cents: payload.total_cents,
            received_cents: totals.received_cents,
            remaining_cents: totals.remaining_cents,
        }
    }
}

// =============================================================================
// Duplicate-Submit Latch
// =============================================================================

/// Boolean latch guarding against double submission.
///
/// Set synchronously before the endpoint call; cleared when the guard
/// drops (the finally-equivalent), so an endpoint error or panic cannot
/// wedge the session.
#[derive(Debug, Default)]
pub struct SubmitLatch {
    in_flight: AtomicBool,
}

impl SubmitLatch {
    pub fn new() -> Self {
        SubmitLatch::default()
    }

    /// Attempts to take the latch. `None` means a submission is already
    /// outstanding and this attempt must be rejected.
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }

    /// Whether a submission is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Clears the latch on drop.
#[derive(Debug)]
pub struct LatchGuard<'a> {
    latch: &'a SubmitLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.in_flight.store(false, Ordering::Release);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
