//! # vendia-export: Report Exporters for Vendia
//!
//! Deterministic CSV/PDF rendering over vendia-core types.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendia Report Flow                               │
//! │                                                                         │
//! │  vendia-db fetch ──► vendia-core settle() ──► Settlement               │
//! │                                                   │                     │
//! │                          ┌────────────────────────┤                     │
//! │                          ▼                        ▼                     │
//! │                 ┌─────────────────┐     ┌─────────────────┐            │
//! │                 │  csv module     │     │  pdf module     │            │
//! │                 │  sales_csv      │     │  settlement_pdf │            │
//! │                 │  settlement_csv │     │  (genpdf)       │            │
//! │                 └────────┬────────┘     └────────┬────────┘            │
//! │                          ▼                       ▼                     │
//! │                  String (UTF-8)           Vec<u8> (PDF bytes)          │
//! │                                                                         │
//! │  Offering the artifact for download is the UI's job; this crate        │
//! │  only produces bytes.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Identical input data ⇒ identical output bytes
//! - Empty inputs ⇒ valid header-only artifact, never an error
//! - Dates `dd/mm/yyyy`, amounts as plain decimals (`123.45`)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod csv;
pub mod error;
pub mod format;
pub mod pdf;

// =============================================================================
// Re-exports
// =============================================================================

pub use crate::csv::{sales_csv, settlement_csv, SALES_HEADER};
pub use crate::pdf::{settlement_pdf, SettlementReport};
pub use error::{ExportError, ExportResult};
