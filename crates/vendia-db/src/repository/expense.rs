//! # Expense Repository
//!
//! Database operations for company expenses. Expenses only ever feed
//! aggregate monthly totals; there is no per-expense lifecycle beyond
//! owner edits in the UI.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vendia_core::{Expense, Money};

const EXPENSE_COLUMNS: &str = "id, company_id, description, amount_cents, category, date, paid";

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts an expense row.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(id = %expense.id, company_id = %expense.company_id, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, company_id, description, amount_cents, category, date, paid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.company_id)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .bind(expense.date)
        .bind(expense.paid)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Queries a company's expenses inside a date range, oldest first.
    pub async fn query(
        &self,
        company_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<Expense>> {
        let sql = format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE company_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date
            "#
        );

        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .bind(company_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Total expenses of a company for one calendar month.
    ///
    /// The month key matches SQLite's `strftime('%Y-%m', date)`.
    pub async fn monthly_total(&self, company_id: &str, year: i32, month: u32) -> DbResult<Money> {
        let month_key = format!("{year:04}-{month:02}");

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM expenses
            WHERE company_id = ?1 AND strftime('%Y-%m', date) = ?2
            "#,
        )
        .bind(company_id)
        .bind(&month_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn expense(company_id: &str, amount_cents: i64, date: NaiveDate) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            description: "Aluguel do ponto".to_string(),
            amount_cents,
            category: "fixed".to_string(),
            date,
            paid: true,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_query() {
        let db = setup().await;
        let repo = db.expenses();

        repo.insert(&expense("c-1", 120_000, date(2026, 3, 5)))
            .await
            .unwrap();
        repo.insert(&expense("c-1", 4_500, date(2026, 3, 20)))
            .await
            .unwrap();
        repo.insert(&expense("c-2", 9_900, date(2026, 3, 10)))
            .await
            .unwrap();

        let rows = repo
            .query("c-1", date(2026, 3, 1), date(2026, 3, 31))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount_cents, 120_000);
        assert!(rows[0].paid);
    }

    #[tokio::test]
    async fn test_monthly_total() {
        let db = setup().await;
        let repo = db.expenses();

        repo.insert(&expense("c-1", 120_000, date(2026, 3, 5)))
            .await
            .unwrap();
        repo.insert(&expense("c-1", 4_500, date(2026, 3, 20)))
            .await
            .unwrap();
        repo.insert(&expense("c-1", 7_700, date(2026, 4, 1)))
            .await
            .unwrap();

        let total = repo.monthly_total("c-1", 2026, 3).await.unwrap();
        assert_eq!(total.cents(), 124_500);

        let empty = repo.monthly_total("c-1", 2026, 1).await.unwrap();
        assert_eq!(empty.cents(), 0);
    }
}
