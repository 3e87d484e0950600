//! # Cash Session Manager
//!
//! Orchestrates the caixa lifecycle: repositories in, settlement math in
//! vendia-core, guarded writes out.
//!
//! ## Close Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  close(session_id, counted_balance)                                    │
//! │       │                                                                 │
//! │       ├── counted < 0?            → InvalidAmount                      │
//! │       ├── session missing?        → SessionNotFound                    │
//! │       ├── session closed?         → SessionAlreadyClosed               │
//! │       │                             (no recomputation, no write)       │
//! │       ▼                                                                 │
//! │  fetch confirmed sales in [opened_at, now] + manual movements          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  settle() in vendia-core → theoretical balance, commission, breakdown  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  guarded UPDATE (WHERE status = 'open') persists counted /             │
//! │  theoretical / discrepancy / closed_at in one statement                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CloseSummary { session, settlement } → UI shows the discrepancy       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries happen here: every failure is a typed error and the caller
//! decides. Closing is terminal; corrections are adjustment records, never a
//! reopen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::sale::SalesFilter;
use vendia_core::settlement::{compute_discrepancy, settle, Settlement};
use vendia_core::{
    validation, AccountContext, CashMovement, CashScope, CashSession, CommissionRate, CoreError,
    Money, MovementKind, PaymentMethod, Sale, SaleStatus, SessionStatus, ValidationError,
};

// =============================================================================
// Error & Result Types
// =============================================================================

/// Errors surfaced by the session manager.
///
/// Domain failures (already open, already closed, bad amounts) arrive as
/// `Core`; storage failures as `Db`. Callers branch on the variant to pick
/// the user message.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result of a successful close, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct CloseSummary {
    /// The session row as persisted (status = Closed).
    pub session: CashSession,
    /// The full settlement, discrepancy included.
    pub settlement: Settlement,
}

/// Input for registering a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

// =============================================================================
// Manager
// =============================================================================

/// Coordinates cash sessions, sales registration, and settlement reads.
#[derive(Debug, Clone)]
pub struct CashSessionManager {
    db: Database,
}

impl CashSessionManager {
    /// Creates a manager over a database handle.
    pub fn new(db: Database) -> Self {
        CashSessionManager { db }
    }

    /// Opens a caixa for the given account context.
    ///
    /// ## Errors
    /// - `InvalidAmount` - negative opening balance
    /// - `SessionAlreadyOpen` - an open session exists for this owner+scope,
    ///   whether found by the pre-check or by racing into the unique index
    pub async fn open(
        &self,
        ctx: &AccountContext,
        opening_balance_cents: i64,
    ) -> Result<CashSession, SessionError> {
        if opening_balance_cents < 0 {
            return Err(CoreError::InvalidAmount {
                field: "opening_balance".to_string(),
                cents: opening_balance_cents,
            }
            .into());
        }

        let owner_ref = ctx.owner_ref().to_string();
        let scope = ctx.scope();
        let sessions = self.db.cash_sessions();

        if sessions.find_open(&owner_ref, scope).await?.is_some() {
            return Err(CoreError::SessionAlreadyOpen { owner_ref, scope }.into());
        }

        let session = CashSession {
            id: Uuid::new_v4().to_string(),
            owner_ref: owner_ref.clone(),
            scope,
            status: SessionStatus::Open,
            opening_balance_cents,
            closing_counted_balance_cents: None,
            theoretical_balance_cents: None,
            discrepancy_cents: None,
            opened_at: Utc::now(),
            closed_at: None,
        };

        // The pre-check above is advisory; the partial unique index is the
        // real arbiter when two opens race.
        match sessions.insert(&session).await {
            Ok(()) => {
                info!(
                    session_id = %session.id,
                    owner_ref = %owner_ref,
                    opening = %session.opening_balance(),
                    "Cash session opened"
                );
                Ok(session)
            }
            Err(DbError::UniqueViolation { .. }) => {
                Err(CoreError::SessionAlreadyOpen { owner_ref, scope }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Closes a caixa against a counted balance. Terminal transition.
    ///
    /// ## Errors
    /// - `InvalidAmount` - negative counted balance
    /// - `SessionNotFound` - no such session
    /// - `SessionAlreadyClosed` - second close; nothing is recomputed or
    ///   written, the first figures stand
    pub async fn close(
        &self,
        session_id: &str,
        counted_balance_cents: i64,
    ) -> Result<CloseSummary, SessionError> {
        if counted_balance_cents < 0 {
            return Err(CoreError::InvalidAmount {
                field: "counted_balance".to_string(),
                cents: counted_balance_cents,
            }
            .into());
        }

        let sessions = self.db.cash_sessions();
        let session = sessions
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound {
                id: session_id.to_string(),
            })?;

        session.ensure_open()?;

        let rate = self.commission_rate_for(&session).await?;
        let now = Utc::now();
        let counted = Money::from_cents(counted_balance_cents);

        let sales = self.db.sales().query(&session_window(&session, now)).await?;
        let movements = sessions.movements(session_id).await?;

        debug!(
            session_id = %session_id,
            sales = sales.len(),
            movements = movements.len(),
            "Settling cash session"
        );

        let mut settlement = settle(&sales, rate, session.opening_balance(), &movements)?;
        let discrepancy = compute_discrepancy(counted, settlement.theoretical_balance);
        settlement.discrepancy = Some(discrepancy);

        let written = sessions
            .mark_closed(
                session_id,
                counted_balance_cents,
                settlement.theoretical_balance.cents(),
                discrepancy.cents(),
                now,
            )
            .await?;

        // A close racing this one already flipped the row; the guard saw
        // status != 'open' and wrote nothing.
        if !written {
            return Err(CoreError::SessionAlreadyClosed {
                id: session_id.to_string(),
            }
            .into());
        }

        info!(
            session_id = %session_id,
            counted = %counted,
            theoretical = %settlement.theoretical_balance,
            discrepancy = %discrepancy,
            "Cash session closed"
        );

        let session = CashSession {
            status: SessionStatus::Closed,
            closing_counted_balance_cents: Some(counted_balance_cents),
            theoretical_balance_cents: Some(settlement.theoretical_balance.cents()),
            discrepancy_cents: Some(discrepancy.cents()),
            closed_at: Some(now),
            ..session
        };

        Ok(CloseSummary {
            session,
            settlement,
        })
    }

    /// Records a manual drawer movement (suprimento/sangria) on an open
    /// session.
    pub async fn record_movement(
        &self,
        session_id: &str,
        kind: MovementKind,
        amount_cents: i64,
        reason: &str,
    ) -> Result<CashMovement, SessionError> {
        validation::validate_movement_amount(amount_cents).map_err(CoreError::from)?;
        validation::validate_description(reason).map_err(CoreError::from)?;

        let sessions = self.db.cash_sessions();
        let session = sessions
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound {
                id: session_id.to_string(),
            })?;

        session.ensure_open()?;

        let movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            kind,
            amount_cents,
            reason: reason.trim().to_string(),
            created_at: Utc::now(),
        };

        sessions.add_movement(&movement).await?;

        info!(
            session_id = %session_id,
            kind = ?kind,
            amount = %movement.amount(),
            "Cash movement recorded"
        );

        Ok(movement)
    }

    /// Registers a sale for the acting seller identity.
    ///
    /// Owners pick a seller in the UI first and call with a Seller context;
    /// a bare Owner context has no seller to attribute the sale to.
    pub async fn register_sale(
        &self,
        ctx: &AccountContext,
        input: NewSale,
    ) -> Result<Sale, SessionError> {
        validation::validate_quantity(input.quantity).map_err(CoreError::from)?;
        validation::validate_amount_cents("unit_price", input.unit_price_cents)
            .map_err(CoreError::from)?;

        let seller_id = match ctx {
            AccountContext::Seller { seller_id, .. } => seller_id.clone(),
            AccountContext::Solo { user_id } => user_id.clone(),
            AccountContext::Owner { .. } => {
                return Err(CoreError::Validation(ValidationError::Required {
                    field: "seller".to_string(),
                })
                .into());
            }
        };

        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            company_id: ctx.company_id().map(str::to_string),
            seller_id,
            product_id: input.product_id,
            product_name: input.product_name,
            quantity: input.quantity,
            unit_price_cents: input.unit_price_cents,
            payment_method: input.payment_method,
            status: input.status,
            sold_at: now,
            created_at: now,
            updated_at: now,
        };

        self.db.sales().insert(&sale).await?;

        info!(
            sale_id = %sale.id,
            seller_id = %sale.seller_id,
            total = %sale.line_total(),
            "Sale registered"
        );

        Ok(sale)
    }

    /// Settles a period for dashboard display: confirmed sales only, no
    /// drawer figures.
    ///
    /// Fetch once, aggregate once; callers memoize the result per data set
    /// instead of recomputing per render.
    pub async fn settle_period(
        &self,
        ctx: &AccountContext,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Settlement, SessionError> {
        let rate = match ctx {
            AccountContext::Seller { seller_id, .. } => self.seller_rate(seller_id).await?,
            AccountContext::Owner { .. } | AccountContext::Solo { .. } => CommissionRate::zero(),
        };

        let filter = SalesFilter::for_context(ctx, from, to).confirmed();
        let sales = self.db.sales().query(&filter).await?;

        let settlement = settle(&sales, rate, Money::zero(), &[])?;
        Ok(settlement)
    }

    /// The commission rate a session settles with.
    ///
    /// Seller caixas owe commission at the seller's rate; solo sellers and
    /// the company caixa keep the full value.
    async fn commission_rate_for(
        &self,
        session: &CashSession,
    ) -> Result<CommissionRate, SessionError> {
        match session.scope {
            CashScope::Seller => self.seller_rate(&session.owner_ref).await,
            CashScope::Solo | CashScope::Company => Ok(CommissionRate::zero()),
        }
    }

    async fn seller_rate(&self, seller_id: &str) -> Result<CommissionRate, SessionError> {
        let seller = self
            .db
            .sellers()
            .get_by_id(seller_id)
            .await?
            .ok_or_else(|| CoreError::SellerNotFound(seller_id.to_string()))?;
        Ok(seller.commission_rate())
    }
}

/// The sales window a session settles over: the owner's confirmed sales
/// between open and close.
fn session_window(session: &CashSession, now: DateTime<Utc>) -> SalesFilter {
    let (seller_id, company_id) = match session.scope {
        CashScope::Company => (None, Some(session.owner_ref.clone())),
        CashScope::Seller | CashScope::Solo => (Some(session.owner_ref.clone()), None),
    };

    SalesFilter {
        seller_id,
        company_id,
        from: session.opened_at,
        to: now,
        status: Some(SaleStatus::Confirmed),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use vendia_core::Seller;

    async fn setup() -> (Database, CashSessionManager) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let manager = CashSessionManager::new(db.clone());
        (db, manager)
    }

    fn solo_ctx() -> AccountContext {
        AccountContext::Solo {
            user_id: "u-1".to_string(),
        }
    }

    fn new_sale(method: PaymentMethod, cents: i64) -> NewSale {
        NewSale {
            product_id: Uuid::new_v4().to_string(),
            product_name: "Brigadeiro".to_string(),
            quantity: 1,
            unit_price_cents: cents,
            payment_method: method,
            status: SaleStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn test_open_rejects_negative_balance() {
        let (_db, manager) = setup().await;

        let err = manager.open(&solo_ctx(), -100).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_twice_fails() {
        let (_db, manager) = setup().await;

        manager.open(&solo_ctx(), 10_000).await.unwrap();

        let err = manager.open(&solo_ctx(), 5_000).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::SessionAlreadyOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_different_scopes_coexist() {
        let (_db, manager) = setup().await;

        manager.open(&solo_ctx(), 10_000).await.unwrap();
        manager
            .open(
                &AccountContext::Owner {
                    company_id: "c-1".to_string(),
                },
                0,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_scenario_with_breakdown() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        // Opening 100.00; sales pix 50.00, cash 30.00, card 20.00
        let session = manager.open(&ctx, 10_000).await.unwrap();
        manager
            .register_sale(&ctx, new_sale(PaymentMethod::Pix, 5_000))
            .await
            .unwrap();
        manager
            .register_sale(&ctx, new_sale(PaymentMethod::Cash, 3_000))
            .await
            .unwrap();
        manager
            .register_sale(&ctx, new_sale(PaymentMethod::Card, 2_000))
            .await
            .unwrap();

        // Counted 125.00 → theoretical 130.00, shortage of 5.00
        let summary = manager.close(&session.id, 12_500).await.unwrap();

        assert_eq!(summary.settlement.totals.total_sold.cents(), 10_000);
        assert_eq!(
            summary
                .settlement
                .totals
                .method_total(PaymentMethod::Cash)
                .cents(),
            3_000
        );
        assert_eq!(summary.settlement.theoretical_balance.cents(), 13_000);
        assert_eq!(summary.settlement.discrepancy.unwrap().cents(), -500);

        assert_eq!(summary.session.status, SessionStatus::Closed);
        assert_eq!(summary.session.closing_counted_balance_cents, Some(12_500));
        assert_eq!(summary.session.discrepancy_cents, Some(-500));
    }

    #[tokio::test]
    async fn test_close_applies_seller_commission() {
        let (db, manager) = setup().await;

        db.sellers()
            .insert(&Seller {
                id: "v-1".to_string(),
                company_id: "c-1".to_string(),
                name: "Maria".to_string(),
                commission_rate_bps: 1000, // 10%
                active: true,
            })
            .await
            .unwrap();

        let ctx = AccountContext::Seller {
            seller_id: "v-1".to_string(),
            company_id: "c-1".to_string(),
        };

        let session = manager.open(&ctx, 0).await.unwrap();
        manager
            .register_sale(&ctx, new_sale(PaymentMethod::Pix, 10_000))
            .await
            .unwrap();

        let summary = manager.close(&session.id, 0).await.unwrap();
        assert_eq!(summary.settlement.commission_owed.cents(), 1_000);
    }

    #[tokio::test]
    async fn test_close_twice_preserves_first_figures() {
        let (db, manager) = setup().await;
        let ctx = solo_ctx();

        let session = manager.open(&ctx, 10_000).await.unwrap();
        manager.close(&session.id, 9_000).await.unwrap();

        let err = manager.close(&session.id, 50_000).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::SessionAlreadyClosed { .. })
        ));

        let row = db
            .cash_sessions()
            .get_by_id(&session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.closing_counted_balance_cents, Some(9_000));
    }

    #[tokio::test]
    async fn test_close_missing_session() {
        let (_db, manager) = setup().await;

        let err = manager.close("no-such-id", 0).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::SessionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_rejects_negative_counted() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        let session = manager.open(&ctx, 0).await.unwrap();
        let err = manager.close(&session.id, -1).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_movements_affect_theoretical_balance() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        let session = manager.open(&ctx, 10_000).await.unwrap();
        manager
            .record_movement(&session.id, MovementKind::Deposit, 2_000, "Suprimento")
            .await
            .unwrap();
        manager
            .record_movement(&session.id, MovementKind::Withdrawal, 500, "Sangria")
            .await
            .unwrap();

        // 100.00 + 20.00 − 5.00 = 115.00
        let summary = manager.close(&session.id, 11_500).await.unwrap();
        assert_eq!(summary.settlement.theoretical_balance.cents(), 11_500);
        assert_eq!(summary.settlement.discrepancy.unwrap().cents(), 0);
    }

    #[tokio::test]
    async fn test_movement_rejected_on_closed_session() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        let session = manager.open(&ctx, 0).await.unwrap();
        manager.close(&session.id, 0).await.unwrap();

        let err = manager
            .record_movement(&session.id, MovementKind::Deposit, 1_000, "Suprimento")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::SessionAlreadyClosed { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_sale_validates_input() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        let mut bad = new_sale(PaymentMethod::Pix, 1_000);
        bad.quantity = 0;
        assert!(manager.register_sale(&ctx, bad).await.is_err());

        let mut bad = new_sale(PaymentMethod::Pix, -1);
        bad.quantity = 1;
        assert!(manager.register_sale(&ctx, bad).await.is_err());
    }

    #[tokio::test]
    async fn test_register_sale_needs_a_seller_identity() {
        let (_db, manager) = setup().await;

        let err = manager
            .register_sale(
                &AccountContext::Owner {
                    company_id: "c-1".to_string(),
                },
                new_sale(PaymentMethod::Pix, 1_000),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_settle_period_confirmed_only() {
        let (_db, manager) = setup().await;
        let ctx = solo_ctx();

        manager.open(&ctx, 0).await.unwrap();
        manager
            .register_sale(&ctx, new_sale(PaymentMethod::Pix, 5_000))
            .await
            .unwrap();

        let mut pending = new_sale(PaymentMethod::Cash, 9_900);
        pending.status = SaleStatus::Pending;
        manager.register_sale(&ctx, pending).await.unwrap();

        let now = Utc::now();
        let settlement = manager
            .settle_period(&ctx, now - chrono::Duration::hours(1), now)
            .await
            .unwrap();

        assert_eq!(settlement.totals.total_sold.cents(), 5_000);
        assert_eq!(settlement.totals.sale_count, 1);
        assert_eq!(settlement.average_ticket().cents(), 5_000);
    }
}
