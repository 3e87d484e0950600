//! # Repositories
//!
//! One repository struct per aggregate, each owning its SQL.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRepository         sales: insert, filter queries, confirm/cancel  │
//! │  ExpenseRepository      expenses: insert, period queries, month totals │
//! │  SellerRepository       sellers: commission rates, soft delete         │
//! │  CashSessionRepository  caixa rows + manual movements                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are cheap to construct (they hold a pool clone) and are
//! handed out by [`crate::Database`] accessor methods.

pub mod cash_session;
pub mod expense;
pub mod sale;
pub mod seller;
