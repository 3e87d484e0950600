//! # Sale Repository
//!
//! Database operations for sale rows.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. REGISTER                                                           │
//! │     └── insert() → Sale { status: Pending }                            │
//! │         (or directly Confirmed when registered at the counter)         │
//! │                                                                         │
//! │  2. CONFIRM                                                            │
//! │     └── confirm() → Sale { status: Confirmed }                         │
//! │         Now it counts toward totals, commission, and the caixa         │
//! │                                                                         │
//! │  3. (OPTIONAL) CANCEL                                                  │
//! │     └── cancel() → Sale { status: Cancelled }                          │
//! │         Kept for audit, excluded from every aggregate                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation happens in vendia-core over rows returned by [`SaleRepository::query`];
//! this module never sums money itself.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vendia_core::{AccountContext, Sale, SaleStatus};

/// Column list shared by every SELECT so FromRow always sees the same shape.
const SALE_COLUMNS: &str = "id, company_id, seller_id, product_id, product_name, \
     quantity, unit_price_cents, payment_method, status, sold_at, created_at, updated_at";

// =============================================================================
// Sales Filter
// =============================================================================

/// Filter for sale queries: who, when, and which statuses.
///
/// Optional fields left as `None` do not constrain the query. Build one from
/// an [`AccountContext`] so the owner/seller/solo dispatch happens in exactly
/// one place.
#[derive(Debug, Clone)]
pub struct SalesFilter {
    pub seller_id: Option<String>,
    pub company_id: Option<String>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub status: Option<SaleStatus>,
}

impl SalesFilter {
    /// Builds the filter for an account context over a date range.
    ///
    /// ## Dispatch
    /// - Owner   → all sales of the company
    /// - Seller  → that seller's sales within the company
    /// - Solo    → the user's own sales (no company)
    pub fn for_context(ctx: &AccountContext, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let (seller_id, company_id) = match ctx {
            AccountContext::Owner { company_id } => (None, Some(company_id.clone())),
            AccountContext::Seller {
                seller_id,
                company_id,
            } => (Some(seller_id.clone()), Some(company_id.clone())),
            AccountContext::Solo { user_id } => (Some(user_id.clone()), None),
        };

        SalesFilter {
            seller_id,
            company_id,
            from,
            to,
            status: None,
        }
    }

    /// Restricts the filter to confirmed sales (the aggregation default).
    pub fn confirmed(mut self) -> Self {
        self.status = Some(SaleStatus::Confirmed);
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Inserts a sale row.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, seller_id = %sale.seller_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, company_id, seller_id, product_id, product_name,
                quantity, unit_price_cents, payment_method, status,
                sold_at, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12
            )
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.company_id)
        .bind(&sale.seller_id)
        .bind(&sale.product_id)
        .bind(&sale.product_name)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.payment_method)
        .bind(sale.status)
        .bind(sale.sold_at)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Queries sales matching a filter, oldest first.
    ///
    /// One static statement serves every filter combination: optional fields
    /// collapse via `(?N IS NULL OR col = ?N)`.
    pub async fn query(&self, filter: &SalesFilter) -> DbResult<Vec<Sale>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE (?1 IS NULL OR seller_id = ?1)
              AND (?2 IS NULL OR company_id = ?2)
              AND sold_at >= ?3
              AND sold_at <= ?4
              AND (?5 IS NULL OR status = ?5)
            ORDER BY sold_at
            "#
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(&filter.seller_id)
            .bind(&filter.company_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Confirms a pending sale.
    ///
    /// Guarded transition: only `pending` rows are updated, so a cancelled
    /// or already-confirmed sale is never silently re-confirmed.
    pub async fn confirm(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET status = 'confirmed', updated_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale (pending)", id));
        }

        Ok(())
    }

    /// Cancels a sale.
    ///
    /// Confirmed sales are immutable except for this transition; cancelled
    /// rows stay for audit.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE sales SET status = 'cancelled', updated_at = ?2
            WHERE id = ?1 AND status IN ('pending', 'confirmed')
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
