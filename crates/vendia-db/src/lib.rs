//! # vendia-db: Database Layer for Vendia
//!
//! This crate provides database access for Vendia.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendia Data Flow                                │
//! │                                                                         │
//! │  API handler (open caixa, close caixa, dashboard totals)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vendia-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │  Repositories  │   │ SessionManager│  │   │
//! │  │   │   (pool.rs)   │◄──│  sale/expense/ │◄──│  (session.rs) │  │   │
//! │  │   │   SqlitePool  │   │  seller/caixa  │   │  open / close │  │   │
//! │  │   └───────────────┘   └────────────────┘   └───────┬───────┘  │   │
//! │  │                                                    │          │   │
//! │  │                          settlement math lives in ─┘          │   │
//! │  │                          vendia-core (pure functions)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, embedded migrations)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (sale, expense, seller, caixa)
//! - [`session`] - Cash-session manager (open/close lifecycle)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendia_db::{CashSessionManager, Database, DbConfig};
//! use vendia_core::AccountContext;
//!
//! let db = Database::new(DbConfig::new("path/to/vendia.db")).await?;
//! let manager = CashSessionManager::new(db.clone());
//!
//! let ctx = AccountContext::Solo { user_id: "u-1".into() };
//! let session = manager.open(&ctx, 10_000).await?;
//! let summary = manager.close(&session.id, 12_500).await?;
//! println!("discrepancy: {:?}", summary.settlement.discrepancy);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use session::{CashSessionManager, CloseSummary, NewSale, SessionError};

// Repository re-exports for convenience
pub use repository::cash_session::CashSessionRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::sale::{SaleRepository, SalesFilter};
pub use repository::seller::SellerRepository;
