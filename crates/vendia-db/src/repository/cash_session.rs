//! # Cash Session Repository
//!
//! Database operations for caixa rows and their manual movements.
//!
//! ## The One-Open-Session Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two tabs press "Abrir caixa" at the same moment                       │
//! │                                                                         │
//! │  Tab A: INSERT (status='open') ──► ok                                  │
//! │  Tab B: INSERT (status='open') ──► UNIQUE constraint failed            │
//! │                                     on idx_cash_sessions_one_open      │
//! │                                                                         │
//! │  The store is the arbiter. This process holds no cross-request         │
//! │  state, so a check-then-insert in Rust alone could never be atomic.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Closing follows the same guarded-update discipline as sale transitions:
//! `WHERE status = 'open'` means a second close writes nothing.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vendia_core::{CashMovement, CashScope, CashSession};

const SESSION_COLUMNS: &str = "id, owner_ref, scope, status, opening_balance_cents, \
     closing_counted_balance_cents, theoretical_balance_cents, discrepancy_cents, \
     opened_at, closed_at";

const MOVEMENT_COLUMNS: &str = "id, session_id, kind, amount_cents, reason, created_at";

/// Repository for cash-session database operations.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    pool: SqlitePool,
}

impl CashSessionRepository {
    /// Creates a new CashSessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashSessionRepository { pool }
    }

    /// Inserts a session row.
    ///
    /// A concurrent open for the same (owner_ref, scope) surfaces here as
    /// `DbError::UniqueViolation`; the session manager translates that into
    /// the already-open domain error.
    pub async fn insert(&self, session: &CashSession) -> DbResult<()> {
        debug!(id = %session.id, owner_ref = %session.owner_ref, "Inserting cash session");

        sqlx::query(
            r#"
            INSERT INTO cash_sessions (
                id, owner_ref, scope, status, opening_balance_cents,
                closing_counted_balance_cents, theoretical_balance_cents,
                discrepancy_cents, opened_at, closed_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7,
                ?8, ?9, ?10
            )
            "#,
        )
        .bind(&session.id)
        .bind(&session.owner_ref)
        .bind(session.scope)
        .bind(session.status)
        .bind(session.opening_balance_cents)
        .bind(session.closing_counted_balance_cents)
        .bind(session.theoretical_balance_cents)
        .bind(session.discrepancy_cents)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CashSession>> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE id = ?1");

        let session = sqlx::query_as::<_, CashSession>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    /// Finds the open session for an owner and scope, if any.
    pub async fn find_open(
        &self,
        owner_ref: &str,
        scope: CashScope,
    ) -> DbResult<Option<CashSession>> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM cash_sessions
            WHERE owner_ref = ?1 AND scope = ?2 AND status = 'open'
            LIMIT 1
            "#
        );

        let session = sqlx::query_as::<_, CashSession>(&sql)
            .bind(owner_ref)
            .bind(scope)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    /// Writes the close figures and flips the session to closed.
    ///
    /// Guarded on `status = 'open'`: returns `false` (and writes nothing)
    /// when the session was already closed, so a double close can never
    /// overwrite the first counted balance.
    pub async fn mark_closed(
        &self,
        id: &str,
        counted_cents: i64,
        theoretical_cents: i64,
        discrepancy_cents: i64,
        closed_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cash_sessions SET
                status = 'closed',
                closing_counted_balance_cents = ?2,
                theoretical_balance_cents = ?3,
                discrepancy_cents = ?4,
                closed_at = ?5
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(counted_cents)
        .bind(theoretical_cents)
        .bind(discrepancy_cents)
        .bind(closed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records a manual movement (suprimento/sangria) against a session.
    pub async fn add_movement(&self, movement: &CashMovement) -> DbResult<()> {
        debug!(
            session_id = %movement.session_id,
            amount = movement.amount_cents,
            "Recording cash movement"
        );

        sqlx::query(
            r#"
            INSERT INTO cash_movements (id, session_id, kind, amount_cents, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.session_id)
        .bind(movement.kind)
        .bind(movement.amount_cents)
        .bind(&movement.reason)
        .bind(movement.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets all movements for a session, oldest first.
    pub async fn movements(&self, session_id: &str) -> DbResult<Vec<CashMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movements WHERE session_id = ?1 ORDER BY created_at"
        );

        let movements = sqlx::query_as::<_, CashMovement>(&sql)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;
    use vendia_core::{MovementKind, SessionStatus};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn session(owner_ref: &str, scope: CashScope) -> CashSession {
        CashSession {
            id: Uuid::new_v4().to_string(),
            owner_ref: owner_ref.to_string(),
            scope,
            status: SessionStatus::Open,
            opening_balance_cents: 10_000,
            closing_counted_balance_cents: None,
            theoretical_balance_cents: None,
            discrepancy_cents: None,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_open() {
        let db = setup().await;
        let repo = db.cash_sessions();

        let s = session("v-1", CashScope::Seller);
        repo.insert(&s).await.unwrap();

        let open = repo.find_open("v-1", CashScope::Seller).await.unwrap();
        assert_eq!(open.unwrap().id, s.id);

        // Different scope is a different caixa
        assert!(repo
            .find_open("v-1", CashScope::Solo)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_second_open_insert_hits_unique_index() {
        let db = setup().await;
        let repo = db.cash_sessions();

        repo.insert(&session("v-1", CashScope::Seller)).await.unwrap();

        let err = repo
            .insert(&session("v-1", CashScope::Seller))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_closed_session_frees_the_slot() {
        let db = setup().await;
        let repo = db.cash_sessions();

        let s = session("v-1", CashScope::Seller);
        repo.insert(&s).await.unwrap();
        assert!(repo
            .mark_closed(&s.id, 12_500, 13_000, -500, Utc::now())
            .await
            .unwrap());

        // The partial index only covers open rows; a new caixa can open.
        repo.insert(&session("v-1", CashScope::Seller)).await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_closed_guarded() {
        let db = setup().await;
        let repo = db.cash_sessions();

        let s = session("c-1", CashScope::Company);
        repo.insert(&s).await.unwrap();

        let written = repo
            .mark_closed(&s.id, 12_500, 13_000, -500, Utc::now())
            .await
            .unwrap();
        assert!(written);

        let closed = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(closed.status, SessionStatus::Closed);
        assert_eq!(closed.closing_counted_balance_cents, Some(12_500));
        assert_eq!(closed.theoretical_balance_cents, Some(13_000));
        assert_eq!(closed.discrepancy_cents, Some(-500));
        assert!(closed.closed_at.is_some());

        // Second close writes nothing and leaves the first figures intact
        let written = repo
            .mark_closed(&s.id, 99_999, 0, 99_999, Utc::now())
            .await
            .unwrap();
        assert!(!written);

        let still = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(still.closing_counted_balance_cents, Some(12_500));
    }

    #[tokio::test]
    async fn test_movements_roundtrip() {
        let db = setup().await;
        let repo = db.cash_sessions();

        let s = session("u-1", CashScope::Solo);
        repo.insert(&s).await.unwrap();

        repo.add_movement(&CashMovement {
            id: Uuid::new_v4().to_string(),
            session_id: s.id.clone(),
            kind: MovementKind::Withdrawal,
            amount_cents: 2_000,
            reason: "Sangria para troco".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let movements = repo.movements(&s.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Withdrawal);
        assert_eq!(movements[0].amount_cents, 2_000);
    }

    #[tokio::test]
    async fn test_movement_requires_session() {
        let db = setup().await;
        let repo = db.cash_sessions();

        let err = repo
            .add_movement(&CashMovement {
                id: Uuid::new_v4().to_string(),
                session_id: "missing".to_string(),
                kind: MovementKind::Deposit,
                amount_cents: 1_000,
                reason: "Suprimento".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
