//! # vendia-core: Pure Business Logic for Vendia
//!
//! This crate is the **heart** of Vendia. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendia Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (React)                            │   │
//! │  │   Dashboard ──► Caixa UI ──► Sales Forms ──► Report Downloads  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ API layer                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendia-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │   money   │  │ settlement │  │ validation│ │   │
//! │  │   │   Sale    │  │   Money   │  │  totals    │  │   rules   │ │   │
//! │  │   │CashSession│  │ rate math │  │ commission │  │   checks  │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        vendia-db (store)        vendia-export (CSV/PDF)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, Seller, CashSession, AccountContext, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`settlement`] - Totals, commission, theoretical balance, discrepancy
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use vendia_core::money::Money;
//! use vendia_core::settlement::compute_commission;
//! use vendia_core::types::CommissionRate;
//!
//! // Create money from centavos (never from floats!)
//! let total_sold = Money::from_cents(10_000); // R$ 100,00
//!
//! // Commission at 10%
//! let rate = CommissionRate::from_bps(1000);
//! let owed = compute_commission(total_sold, rate).unwrap();
//!
//! assert_eq!(owed.cents(), 1000); // R$ 10,00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendia_core::Money` instead of
// `use vendia_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use settlement::{SaleTotals, Settlement};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single sale line
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 10000 instead of 10).
/// Configurable per-tenant in future versions.
pub const MAX_SALE_QUANTITY: i64 = 9_999;

/// Maximum length of free-text descriptions (expenses, movement reasons)
pub const MAX_DESCRIPTION_LEN: usize = 500;
