//! # Seller Repository
//!
//! Database operations for sellers. Commission rates live here as basis
//! points; the session manager reads them when settling a seller's caixa.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vendia_core::{CommissionRate, Seller};

const SELLER_COLUMNS: &str = "id, company_id, name, commission_rate_bps, active";

/// Repository for seller database operations.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    pool: SqlitePool,
}

impl SellerRepository {
    /// Creates a new SellerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SellerRepository { pool }
    }

    /// Inserts a seller row.
    pub async fn insert(&self, seller: &Seller) -> DbResult<()> {
        debug!(id = %seller.id, company_id = %seller.company_id, "Inserting seller");

        sqlx::query(
            r#"
            INSERT INTO sellers (id, company_id, name, commission_rate_bps, active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&seller.id)
        .bind(&seller.company_id)
        .bind(&seller.name)
        .bind(seller.commission_rate_bps)
        .bind(seller.active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a seller by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Seller>> {
        let sql = format!("SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?1");

        let seller = sqlx::query_as::<_, Seller>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seller)
    }

    /// Lists a company's active sellers, by name.
    pub async fn list_active(&self, company_id: &str) -> DbResult<Vec<Seller>> {
        let sql = format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE company_id = ?1 AND active = 1 ORDER BY name"
        );

        let sellers = sqlx::query_as::<_, Seller>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sellers)
    }

    /// Activates or deactivates a seller (soft delete).
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE sellers SET active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Seller", id));
        }

        Ok(())
    }

    /// Updates a seller's default commission rate.
    ///
    /// Takes a [`CommissionRate`] so an out-of-range value cannot reach the
    /// store; conversion from the UI's fraction happens at the boundary.
    pub async fn set_commission_rate(&self, id: &str, rate: CommissionRate) -> DbResult<()> {
        debug!(id = %id, bps = rate.bps(), "Updating commission rate");

        let result = sqlx::query("UPDATE sellers SET commission_rate_bps = ?2 WHERE id = ?1")
            .bind(id)
            .bind(rate.bps())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Seller", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
