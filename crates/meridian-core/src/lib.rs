//! # meridian-core: Pure Business Logic for Meridian POS
//!
//! This crate is the **heart** of Meridian POS. It contains the totals
//! and payment logic shared by every sale and purchase form, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Meridian POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web Frontend (forms + store)                   │   │
//! │  │    Sale Tab ── Sale Modal ── Purchase Form ── Barcode Scanner   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON DTOs                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  meridian-engine (sessions)                     │   │
//! │  │    scan barcodes, edit documents, validate + submit             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────┐ ┌────────────┐  │   │
//! │  │  │ money  │ │ line   │ │ totals │ │reconcile │ │ document   │  │   │
//! │  │  │ Money  │ │LineItem│ │ 2 kept │ │ status   │ │ mutations+ │  │   │
//! │  │  │TaxRate │ │ clamp  │ │formulas│ │ table    │ │ recompute  │  │   │
//! │  │  └────────┘ └────────┘ └────────┘ └──────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, PaymentStatus, TaxRate, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`line`] - Line items and the stock clamp policy
//! - [`totals`] - The two totals strategies (sale vs purchase)
//! - [`reconcile`] - Status-driven received/remaining derivation
//! - [`document`] - The document model and its mutation/recompute cycle
//! - [`validation`] - Submit-time business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **One engine, many forms**: the six historical sale/purchase forms
//!    all compute through this crate, so their logic cannot drift
//! 2. **Explicit recompute**: no reactivity framework; every mutation
//!    ends in a synchronous `recompute()` call
//! 3. **Integer Money**: all monetary values are cents (i64); rounding
//!    happens once per derived amount, never mid-computation
//! 4. **Correct, don't reject**: live edits coerce and clamp; only
//!    submission returns typed errors

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod line;
pub mod money;
pub mod reconcile;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use document::{Document, DocumentTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use line::{LineItem, SelectedItem, StockWarning};
pub use money::Money;
pub use totals::{compute_totals, TotalsBreakdown};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock sentinel for services: effectively unlimited, never clamped.
///
/// ## Why 999?
/// The historical forms encode "no inventory tracking" as a literal 999
/// snapshot rather than an optional field, and recorded documents carry
/// it. The clamp policy additionally checks the item kind, so even a
/// quantity above 999 on a service row is left alone.
pub const SERVICE_STOCK_SENTINEL: i64 = 999;

/// Maximum tax rate: 10000 bps = 100%.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;
