//! # Document Session
//!
//! One open sale/purchase document, edited by exactly one client
//! session. This is the surface the form layer calls; every mutation
//! returns the refreshed lines and totals so the UI re-renders from the
//! response instead of keeping its own copy of the math.
//!
//! ## Thread Safety
//! The document is wrapped in `Arc<Mutex<T>>` because:
//! 1. Scan handling and form edits may arrive on different tasks
//! 2. Only one operation should mutate the document at a time
//! 3. The lock is never held across an await (lookups and submission
//!    run outside it)
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Document Session Operations                            │
//! │                                                                         │
//! │  Form Action            Session Method           Document Change        │
//! │  ───────────            ──────────────           ───────────────        │
//! │                                                                         │
//! │  Pick item ────────────► select_item() ────────► row populated + slot  │
//! │  Edit qty ─────────────► set_quantity() ───────► clamp + recompute     │
//! │  Edit price ───────────► set_price() ──────────► coerce + recompute    │
//! │  Scan code ────────────► scan_barcode() ───────► increment / populate  │
//! │  Change status ────────► set_status() ─────────► reconcile received   │
//! │  Click submit ─────────► submit() ─────────────► validate + endpoint   │
//! │                                                                         │
//! │  Every response carries DocumentTotals; warnings ride along on the     │
//! │  success path (a clamped edit is a SUCCESS with a warning).            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info, warn};

use meridian_core::validation::validate_for_submit;
use meridian_core::{
    CancelledPolicy, CatalogItem, Document, DocumentKind, DocumentTotals, LineItem,
    PaymentStatus, StockWarning, TaxRate, ValidationError,
};

use crate::catalog::CatalogLookup;
use crate::context::SessionContext;
use crate::error::{ApiError, ErrorCode};
use crate::scan::{apply_scan, ScanOutcome};
use crate::submit::{
    DocumentPayload, SubmissionEndpoint, SubmitLatch, SubmitReceipt,
};

// =============================================================================
// Response DTO
// =============================================================================

/// Session response: the rows, the derived totals, and any stock warning
/// raised by the operation that produced this response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub lines: Vec<LineItem>,
    pub totals: DocumentTotals,
    pub warning: Option<StockWarning>,
}

impl DocumentResponse {
    fn of(doc: &Document, warning: Option<StockWarning>) -> Self {
        DocumentResponse {
            lines: doc.lines.clone(),
            totals: doc.totals(),
            warning,
        }
    }
}

// =============================================================================
// Document Session
// =============================================================================

/// An editing session over one document.
pub struct DocumentSession {
    document: Arc<Mutex<Document>>,
    context: SessionContext,
    latch: SubmitLatch,
}

impl DocumentSession {
    /// Opens a session for a fresh document, seeding the tax rate from
    /// the session context.
    pub fn new(kind: DocumentKind, context: SessionContext) -> Self {
        Self::with_policy(kind, CancelledPolicy::default(), context)
    }

    /// Opens a session with an explicit cancelled policy (the modal sale
    /// form passes `ForceZero`).
    pub fn with_policy(
        kind: DocumentKind,
        policy: CancelledPolicy,
        context: SessionContext,
    ) -> Self {
        let mut doc = Document::with_policy(kind, policy);
        doc.set_tax_rate(TaxRate::from_bps(context.default_tax_rate_bps));
        DocumentSession {
            document: Arc::new(Mutex::new(doc)),
            context,
            latch: SubmitLatch::new(),
        }
    }

    /// The session's ambient context.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Whether a submission is currently outstanding.
    pub fn is_submitting(&self) -> bool {
        self.latch.is_in_flight()
    }

    /// Executes a function with read access to the document.
    pub fn with_document<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Document) -> R,
    {
        let doc = self.document.lock().expect("Document mutex poisoned");
        f(&doc)
    }

    /// Executes a function with write access to the document.
    pub fn with_document_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Document) -> R,
    {
        let mut doc = self.document.lock().expect("Document mutex poisoned");
        f(&mut doc)
    }

    // -------------------------------------------------------------------------
    // Form operations
    // -------------------------------------------------------------------------

    /// Current rows and totals.
    pub fn snapshot(&self) -> DocumentResponse {
        self.with_document(|doc| DocumentResponse::of(doc, None))
    }

    /// Appends an empty row.
    pub fn add_row(&self) -> DocumentResponse {
        debug!("add_row");
        self.with_document_mut(|doc| {
            doc.add_row();
            DocumentResponse::of(doc, None)
        })
    }

    /// Removes a row (no-op on the last remaining one).
    pub fn remove_row(&self, index: usize) -> Result<DocumentResponse, ApiError> {
        debug!(index, "remove_row");
        self.with_document_mut(|doc| {
            doc.remove_row(index)?;
            Ok(DocumentResponse::of(doc, None))
        })
    }

    /// Populates a row from a catalog entry.
    pub fn select_item(
        &self,
        index: usize,
        item: &CatalogItem,
    ) -> Result<DocumentResponse, ApiError> {
        debug!(index, item_id = %item.id, "select_item");
        self.with_document_mut(|doc| {
            doc.select_item(index, item)?;
            Ok(DocumentResponse::of(doc, None))
        })
    }

    /// Sets a row's quantity; a clamped edit succeeds with a warning.
    pub fn set_quantity(&self, index: usize, quantity: i64) -> Result<DocumentResponse, ApiError> {
        debug!(index, quantity, "set_quantity");
        self.with_document_mut(|doc| {
            let warning = doc.set_line_quantity(index, quantity)?;
            if let Some(w) = &warning {
                warn!(%w, "quantity clamped to stock");
            }
            Ok(DocumentResponse::of(doc, warning))
        })
    }

    /// Sets a row's unit price.
    pub fn set_price(&self, index: usize, cents: i64) -> Result<DocumentResponse, ApiError> {
        debug!(index, cents, "set_price");
        self.with_document_mut(|doc| {
            doc.set_line_price(index, cents)?;
            Ok(DocumentResponse::of(doc, None))
        })
    }

    /// Sets the flat discount.
    pub fn set_discount(&self, cents: i64) -> DocumentResponse {
        debug!(cents, "set_discount");
        self.with_document_mut(|doc| {
            doc.set_discount(cents);
            DocumentResponse::of(doc, None)
        })
    }

    /// Sets the tax rate.
    pub fn set_tax_rate(&self, rate: TaxRate) -> DocumentResponse {
        debug!(bps = rate.bps(), "set_tax_rate");
        self.with_document_mut(|doc| {
            doc.set_tax_rate(rate);
            DocumentResponse::of(doc, None)
        })
    }

    /// Transitions the payment status (rejects statuses outside the
    /// document kind's legal subset).
    pub fn set_status(&self, status: PaymentStatus) -> Result<DocumentResponse, ApiError> {
        debug!(?status, "set_status");
        self.with_document_mut(|doc| {
            doc.set_status(status)?;
            Ok(DocumentResponse::of(doc, None))
        })
    }

    /// Sets the received amount (effective only on Credit documents).
    pub fn set_received(&self, cents: i64) -> DocumentResponse {
        debug!(cents, "set_received");
        self.with_document_mut(|doc| {
            doc.set_received(cents);
            DocumentResponse::of(doc, None)
        })
    }

    /// Sets the customer/supplier reference.
    pub fn set_counterparty(&self, id: Option<String>) -> DocumentResponse {
        debug!(?id, "set_counterparty");
        self.with_document_mut(|doc| {
            doc.set_counterparty(id);
            DocumentResponse::of(doc, None)
        })
    }

    // -------------------------------------------------------------------------
    // Barcode scanning
    // -------------------------------------------------------------------------

    /// Resolves a scanned/typed code against the catalog and applies it
    /// to the document.
    ///
    /// The async lookup runs OUTSIDE the document lock; only the
    /// resulting mutation takes it.
    pub async fn scan_barcode(
        &self,
        lookup: &dyn CatalogLookup,
        code: &str,
    ) -> Result<ScanOutcome, ApiError> {
        debug!(code, "scan_barcode");

        let Some(item) = lookup.find_by_barcode(code).await? else {
            info!(code, "barcode not found in catalog");
            return Ok(ScanOutcome::NotFound {
                code: code.to_string(),
            });
        };

        self.with_document_mut(|doc| {
            let outcome = apply_scan(doc, &item)?;
            Ok(outcome)
        })
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Validates and submits the document.
    ///
    /// On success the session resets to a fresh document of the same
    /// kind (the form starts over) and the caller receives the receipt
    /// echo for printing. On any failure the document is left untouched
    /// for correction.
    pub async fn submit(
        &self,
        endpoint: &dyn SubmissionEndpoint,
    ) -> Result<SubmitReceipt, ApiError> {
        debug!("submit");

        let _guard = self.latch.try_acquire().ok_or_else(|| {
            ApiError::new(
                ErrorCode::SubmitInProgress,
                "A submission is already in progress",
            )
        })?;

        // Validate and build the payload under the lock, then release it
        // before awaiting the endpoint.
        let (payload, totals) = self.with_document_mut(|doc| {
            doc.recompute();
            validate_for_submit(doc)?;
            if doc.kind == DocumentKind::Sale && self.context.staff_id.is_none() {
                return Err(ApiError::from(ValidationError::MissingCounterpart {
                    field: "staff".to_string(),
                }));
            }
            let totals = doc.totals();
            Ok((DocumentPayload::build(doc, &totals, &self.context), totals))
        })?;

        let echo = payload.clone();
        let ack = endpoint.submit(payload).await?;

        info!(
            document_id = %echo.document_id,
            total = echo.total_cents,
            lines = echo.lines.len(),
            "document submitted"
        );

        // Fresh document for the next entry; the receipt carries
        // everything printing needs.
        self.with_document_mut(|doc| {
            let mut fresh = Document::with_policy(doc.kind, doc.cancelled_policy);
            fresh.set_tax_rate(TaxRate::from_bps(self.context.default_tax_rate_bps));
            *doc = fresh;
        });

        Ok(SubmitReceipt::assemble(echo, ack, &totals, &self.context))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use meridian_core::ItemKind;

    use crate::catalog::LookupError;
    use crate::submit::{SubmitAck, SubmitError};

    fn item(id: &str, barcode: &str, price_cents: i64, stock: i64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            kind: ItemKind::Product,
            barcode: Some(barcode.to_string()),
            price_cents,
            wholesale_price_cents: Some(price_cents / 2),
            stock: Some(stock),
        }
    }

    /// Catalog lookup backed by an in-memory map.
    struct MapCatalog {
        by_barcode: HashMap<String, CatalogItem>,
    }

    impl MapCatalog {
        fn with(items: &[CatalogItem]) -> Self {
            let by_barcode = items
                .iter()
                .filter_map(|i| i.barcode.clone().map(|b| (b, i.clone())))
                .collect();
            MapCatalog { by_barcode }
        }
    }

    #[async_trait]
    impl CatalogLookup for MapCatalog {
        async fn find_by_barcode(&self, code: &str) -> Result<Option<CatalogItem>, LookupError> {
            Ok(self.by_barcode.get(code).cloned())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<CatalogItem>, LookupError> {
            Ok(self
                .by_barcode
                .values()
                .find(|i| i.id == id)
                .cloned())
        }
    }

    /// Endpoint that records how many submissions reached it.
    struct CountingEndpoint {
        calls: AtomicUsize,
    }

    impl CountingEndpoint {
        fn new() -> Self {
            CountingEndpoint {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SubmissionEndpoint for CountingEndpoint {
        async fn submit(&self, payload: DocumentPayload) -> Result<SubmitAck, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmitAck {
                server_id: Some(format!("srv-{}", payload.document_id)),
            })
        }
    }

    fn staffed_context() -> SessionContext {
        SessionContext {
            staff_id: Some("staff-1".to_string()),
            ..SessionContext::default()
        }
    }

    #[tokio::test]
    async fn test_scan_found_then_not_found() {
        let session = DocumentSession::new(DocumentKind::Sale, staffed_context());
        let catalog = MapCatalog::with(&[item("p1", "4006381333931", 299, 10)]);

        let outcome = session
            .scan_barcode(&catalog, "4006381333931")
            .await
            .unwrap();
        assert!(matches!(outcome, ScanOutcome::Added { row: 0, .. }));
        assert_eq!(session.snapshot().totals.subtotal_cents, 299);

        let outcome = session.scan_barcode(&catalog, "00000000").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::NotFound { .. }));
        // The open document is untouched by a miss
        assert_eq!(session.snapshot().totals.subtotal_cents, 299);
    }

    #[tokio::test]
    async fn test_submit_success_resets_document() {
        let session = DocumentSession::new(DocumentKind::Sale, staffed_context());
        session.select_item(0, &item("p1", "40063813", 1000, 10)).unwrap();
        session.set_quantity(0, 2).unwrap();
        session.set_discount(300);
        session.set_tax_rate(TaxRate::from_bps(1000));

        let endpoint = CountingEndpoint::new();
        let receipt = session.submit(&endpoint).await.unwrap();

        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 1);
        assert_eq!(receipt.lines.len(), 1);
        // sale formula: (2000 - 300) × 1.10 = 1870
        assert_eq!(receipt.total_cents, 1870);
        assert!(receipt.server_id.as_deref().unwrap().starts_with("srv-"));
        assert_eq!(receipt.store_name, "Meridian Dev Store");

        // Session starts over with a fresh empty document
        let snap = session.snapshot();
        assert_eq!(snap.totals.subtotal_cents, 0);
        assert_eq!(snap.lines.len(), 1);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_empty_document_never_reaches_endpoint() {
        let session = DocumentSession::new(DocumentKind::Sale, staffed_context());
        let endpoint = CountingEndpoint::new();

        let err = session.submit(&endpoint).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_sale_requires_staff() {
        let session = DocumentSession::new(DocumentKind::Sale, SessionContext::default());
        session.select_item(0, &item("p1", "40063813", 1000, 10)).unwrap();

        let endpoint = CountingEndpoint::new();
        let err = session.submit(&endpoint).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("staff"));
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_purchase_requires_supplier() {
        let session = DocumentSession::new(DocumentKind::Purchase, staffed_context());
        session.select_item(0, &item("p1", "40063813", 1000, 10)).unwrap();

        let endpoint = CountingEndpoint::new();
        let err = session.submit(&endpoint).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("supplier"));

        session.set_counterparty(Some("supplier-1".to_string()));
        assert!(session.submit(&endpoint).await.is_ok());
    }

    /// Endpoint that parks until released, so a second submit can race.
    struct BlockingEndpoint {
        gate: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl SubmissionEndpoint for BlockingEndpoint {
        async fn submit(&self, _payload: DocumentPayload) -> Result<SubmitAck, SubmitError> {
            self.gate.notified().await;
            Ok(SubmitAck { server_id: None })
        }
    }

    #[tokio::test]
    async fn test_duplicate_submit_rejected_while_outstanding() {
        let session = Arc::new(DocumentSession::new(DocumentKind::Sale, staffed_context()));
        session.select_item(0, &item("p1", "40063813", 1000, 10)).unwrap();

        let gate = Arc::new(tokio::sync::Notify::new());
        let endpoint = Arc::new(BlockingEndpoint { gate: gate.clone() });

        let first = {
            let session = session.clone();
            let endpoint = endpoint.clone();
            tokio::spawn(async move { session.submit(endpoint.as_ref()).await })
        };

        // Wait for the first submit to take the latch
        while !session.is_submitting() {
            tokio::task::yield_now().await;
        }

        let err = session.submit(endpoint.as_ref()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmitInProgress);

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_endpoint_failure_leaves_document_intact() {
        struct FailingEndpoint;

        #[async_trait]
        impl SubmissionEndpoint for FailingEndpoint {
            async fn submit(&self, _p: DocumentPayload) -> Result<SubmitAck, SubmitError> {
                Err(SubmitError::Backend("connection refused".to_string()))
            }
        }

        let session = DocumentSession::new(DocumentKind::Sale, staffed_context());
        session.select_item(0, &item("p1", "40063813", 1000, 10)).unwrap();

        let err = session.submit(&FailingEndpoint).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmissionFailed);

        // Nothing cleared, latch released: the user can retry
        assert_eq!(session.snapshot().totals.subtotal_cents, 1000);
        assert!(!session.is_submitting());
    }
}
