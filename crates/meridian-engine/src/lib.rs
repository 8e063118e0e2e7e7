//! # meridian-engine: Document Sessions for Meridian POS
//!
//! Hosts open sale/purchase documents and the collaborator seams the
//! pure core cannot own: catalog lookups, submission endpoints, and the
//! per-session ambient context.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web Frontend (forms + store)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON DTOs                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ meridian-engine (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │  │ session │ │  scan   │ │ catalog  │ │ submit  │ │ context │  │   │
//! │  │  │ locked  │ │ outcome │ │ lookup   │ │ latch + │ │ staff + │  │   │
//! │  │  │ document│ │ mapping │ │ trait    │ │ receipt │ │ currency│  │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │  async at the seams, synchronous mutations under one lock      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                meridian-core (pure business logic)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - The document session: one open document per form
//! - [`scan`] - Barcode resolution and the scan outcome DTO
//! - [`catalog`] - The catalog lookup collaborator trait
//! - [`submit`] - Payloads, the submission endpoint trait, the latch
//! - [`context`] - Per-session ambient state (staff, device, currency)
//! - [`error`] - The unified API error surfaced to forms

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod context;
pub mod error;
pub mod scan;
pub mod session;
pub mod submit;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{is_barcode_query, CatalogLookup, LookupError};
pub use context::SessionContext;
pub use error::{ApiError, ErrorCode};
pub use scan::{apply_scan, ScanOutcome};
pub use session::{DocumentResponse, DocumentSession};
pub use submit::{
    DocumentPayload, PayloadLine, SubmissionEndpoint, SubmitAck, SubmitError, SubmitLatch,
    SubmitReceipt,
};
