//! # Domain Types
//!
//! Core domain types used throughout Vendia.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │     Seller      │   │   CashSession   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  seller_id      │   │  company_id     │   │  owner_ref      │       │
//! │  │  quantity       │   │  rate (bps)     │   │  scope          │       │
//! │  │  unit_price     │   │  active         │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ CommissionRate  │   │   SaleStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Pending        │   │  Pix            │       │
//! │  │  1000 = 10%     │   │  Confirmed      │   │  Card           │       │
//! │  └─────────────────┘   │  Cancelled      │   │  Cash           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Ownership keys: (company_id, seller_id, owner_ref) - tenant scoping

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Commission Rate
// =============================================================================

/// Commission rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (a common seller commission)
///
/// The fraction-in-[0,1] form used by the frontend is converted exactly once
/// at the boundary via [`CommissionRate::try_from_fraction`]; everything
/// downstream stays in integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Creates a commission rate from a fraction in [0, 1].
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::types::CommissionRate;
    ///
    /// let rate = CommissionRate::try_from_fraction(0.10).unwrap();
    /// assert_eq!(rate.bps(), 1000);
    ///
    /// assert!(CommissionRate::try_from_fraction(1.5).is_err());
    /// assert!(CommissionRate::try_from_fraction(-0.1).is_err());
    /// ```
    pub fn try_from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::OutOfRange {
                field: "commission_rate".to_string(),
                min: 0,
                max: 1,
            });
        }
        Ok(CommissionRate((fraction * 10_000.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero commission rate.
    #[inline]
    pub const fn zero() -> Self {
        CommissionRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate::zero()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// Only `Cash` moves physical money through the caixa drawer; `Pix` and
/// `Card` settle electronically and never affect the counted balance.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer (Pix).
    Pix,
    /// Card payment on an external terminal.
    Card,
    /// Physical cash payment.
    Cash,
}

impl PaymentMethod {
    /// Wire/storage form of the method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }

    /// All methods, in breakdown display order.
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Pix, PaymentMethod::Card, PaymentMethod::Cash];
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale transaction.
///
/// Only `Confirmed` sales count toward totals and commission. A confirmed
/// sale is immutable except for the transition to `Cancelled`.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Registered but not yet confirmed by the seller/owner.
    Pending,
    /// Counts toward totals, commission, and the caixa.
    Confirmed,
    /// Cancelled; kept for audit, excluded from every aggregate.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A single sale transaction line.
/// Uses snapshot pattern to freeze the product name at time of sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Tenant the sale belongs to; `None` for solo accounts.
    pub company_id: Option<String>,
    /// The seller (or solo user) who registered the sale.
    pub seller_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Units sold (positive).
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    /// When the sale happened (business timestamp, drives date-range queries).
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (quantity × unit price) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Checks whether this sale counts toward aggregates.
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.status == SaleStatus::Confirmed
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A company expense. Feeds aggregate monthly totals only.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub company_id: String,
    pub description: String,
    /// Amount in centavos (non-negative).
    pub amount_cents: i64,
    pub category: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub paid: bool,
}

impl Expense {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Seller
// =============================================================================

/// A seller belonging to a company, with a default commission rate.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Seller {
    pub id: String,
    pub company_id: String,
    pub name: String,
    /// Default commission in basis points (0..=10000).
    pub commission_rate_bps: u32,
    /// Whether the seller is active (soft delete).
    pub active: bool,
}

impl Seller {
    /// Returns the seller's default commission rate.
    #[inline]
    pub fn commission_rate(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_rate_bps)
    }
}

// =============================================================================
// Cash Session (Caixa)
// =============================================================================

/// Which kind of account a cash session is accountable to.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashScope {
    /// Autonomous seller with no company entity.
    Solo,
    /// A seller inside a company.
    Seller,
    /// The company-wide caixa operated by the owner.
    Company,
}

impl CashScope {
    /// Wire/storage form of the scope.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CashScope::Solo => "solo",
            CashScope::Seller => "seller",
            CashScope::Company => "company",
        }
    }
}

/// Lifecycle state of a cash session.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Closed,
}

/// A cash session (caixa): a bounded period of cash-handling accountability.
///
/// ## Lifecycle
/// ```text
/// NoSession ──open(opening_balance)──► Open ──close(counted)──► Closed
///                                                                  │
///                                      terminal: corrections are   │
///                                      adjustment records, never ◄─┘
///                                      a reopen
/// ```
///
/// Invariant: at most one `Open` session per (owner_ref, scope). The store
/// enforces this atomically with a partial unique index, since concurrent
/// open attempts can race from multiple tabs/devices.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashSession {
    pub id: String,
    /// Seller id, owner's company id, or solo user id - per `scope`.
    pub owner_ref: String,
    pub scope: CashScope,
    pub status: SessionStatus,
    /// Counted drawer money at open, in centavos.
    pub opening_balance_cents: i64,
    /// Counted drawer money at close; None until closed.
    pub closing_counted_balance_cents: Option<i64>,
    /// Computed expected balance at close; None until closed.
    pub theoretical_balance_cents: Option<i64>,
    /// counted − theoretical; negative = shortage. None until closed.
    pub discrepancy_cents: Option<i64>,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashSession {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_cents(self.opening_balance_cents)
    }

    /// Returns the counted closing balance, if closed.
    #[inline]
    pub fn counted_balance(&self) -> Option<Money> {
        self.closing_counted_balance_cents.map(Money::from_cents)
    }

    /// Returns the theoretical balance computed at close, if closed.
    #[inline]
    pub fn theoretical_balance(&self) -> Option<Money> {
        self.theoretical_balance_cents.map(Money::from_cents)
    }

    /// Returns the close discrepancy, if closed.
    #[inline]
    pub fn discrepancy(&self) -> Option<Money> {
        self.discrepancy_cents.map(Money::from_cents)
    }

    /// Checks whether the session is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// Guards the close transition: a closed session stays closed.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::SessionAlreadyClosed {
                id: self.id.clone(),
            })
        }
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// Direction of a manual drawer movement.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Cash added to the drawer (suprimento).
    Deposit,
    /// Cash removed from the drawer (sangria).
    Withdrawal,
}

/// A manual cash movement inside an open session.
///
/// Deposits raise and withdrawals lower the theoretical balance; sales made
/// by Pix/Card never appear here.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashMovement {
    pub id: String,
    pub session_id: String,
    pub kind: MovementKind,
    /// Amount in centavos (always positive; `kind` carries the direction).
    pub amount_cents: i64,
    pub reason: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CashMovement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Account Context
// =============================================================================

/// Who is asking: the tagged replacement for role-string branching.
///
/// ## Dispatch
/// ```text
/// Owner  { company_id }            ──► company-wide aggregates
/// Seller { seller_id, company_id } ──► one seller inside a company
/// Solo   { user_id }               ──► autonomous seller, no company
/// ```
///
/// Resolved once at the boundary (the auth layer) and passed explicitly into
/// every repository and calculator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountContext {
    Owner { company_id: String },
    Seller { seller_id: String, company_id: String },
    Solo { user_id: String },
}

impl AccountContext {
    /// The identity a cash session for this context is keyed on.
    pub fn owner_ref(&self) -> &str {
        match self {
            AccountContext::Owner { company_id } => company_id,
            AccountContext::Seller { seller_id, .. } => seller_id,
            AccountContext::Solo { user_id } => user_id,
        }
    }

    /// The cash-session scope this context opens.
    pub fn scope(&self) -> CashScope {
        match self {
            AccountContext::Owner { .. } => CashScope::Company,
            AccountContext::Seller { .. } => CashScope::Seller,
            AccountContext::Solo { .. } => CashScope::Solo,
        }
    }

    /// The company the context belongs to, if any.
    pub fn company_id(&self) -> Option<&str> {
        match self {
            AccountContext::Owner { company_id } => Some(company_id),
            AccountContext::Seller { company_id, .. } => Some(company_id),
            AccountContext::Solo { .. } => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(quantity: i64, unit_price_cents: i64) -> Sale {
        let now = Utc::now();
        Sale {
            id: "s-1".to_string(),
            company_id: Some("c-1".to_string()),
            seller_id: "v-1".to_string(),
            product_id: "p-1".to_string(),
            product_name: "Brigadeiro".to_string(),
            quantity,
            unit_price_cents,
            payment_method: PaymentMethod::Cash,
            status: SaleStatus::Confirmed,
            sold_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_commission_rate_from_fraction() {
        let rate = CommissionRate::try_from_fraction(0.10).unwrap();
        assert_eq!(rate.bps(), 1000);
        assert!((rate.fraction() - 0.10).abs() < 1e-9);
        assert!((rate.percentage() - 10.0).abs() < 1e-9);

        assert_eq!(CommissionRate::try_from_fraction(0.0).unwrap().bps(), 0);
        assert_eq!(
            CommissionRate::try_from_fraction(1.0).unwrap().bps(),
            10_000
        );
    }

    #[test]
    fn test_commission_rate_rejects_out_of_range() {
        assert!(CommissionRate::try_from_fraction(-0.01).is_err());
        assert!(CommissionRate::try_from_fraction(1.01).is_err());
        assert!(CommissionRate::try_from_fraction(f64::NAN).is_err());
        assert!(CommissionRate::try_from_fraction(f64::INFINITY).is_err());
    }

    #[test]
    fn test_sale_line_total() {
        let s = sale(3, 299);
        assert_eq!(s.line_total().cents(), 897);
        assert!(s.is_confirmed());
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pending);
    }

    #[test]
    fn test_session_ensure_open() {
        let now = Utc::now();
        let mut session = CashSession {
            id: "cx-1".to_string(),
            owner_ref: "v-1".to_string(),
            scope: CashScope::Seller,
            status: SessionStatus::Open,
            opening_balance_cents: 10_000,
            closing_counted_balance_cents: None,
            theoretical_balance_cents: None,
            discrepancy_cents: None,
            opened_at: now,
            closed_at: None,
        };

        assert!(session.ensure_open().is_ok());

        session.status = SessionStatus::Closed;
        let err = session.ensure_open().unwrap_err();
        assert!(matches!(err, CoreError::SessionAlreadyClosed { .. }));
    }

    #[test]
    fn test_account_context_dispatch() {
        let owner = AccountContext::Owner {
            company_id: "c-1".to_string(),
        };
        assert_eq!(owner.owner_ref(), "c-1");
        assert_eq!(owner.scope(), CashScope::Company);
        assert_eq!(owner.company_id(), Some("c-1"));

        let seller = AccountContext::Seller {
            seller_id: "v-1".to_string(),
            company_id: "c-1".to_string(),
        };
        assert_eq!(seller.owner_ref(), "v-1");
        assert_eq!(seller.scope(), CashScope::Seller);

        let solo = AccountContext::Solo {
            user_id: "u-1".to_string(),
        };
        assert_eq!(solo.owner_ref(), "u-1");
        assert_eq!(solo.scope(), CashScope::Solo);
        assert_eq!(solo.company_id(), None);
    }

    #[test]
    fn test_payment_method_as_str() {
        assert_eq!(PaymentMethod::Pix.as_str(), "pix");
        assert_eq!(PaymentMethod::Card.as_str(), "card");
        assert_eq!(PaymentMethod::Cash.as_str(), "cash");
    }

    /// The JSON wire form must match the TEXT values stored in the database
    /// CHECK constraints.
    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
        assert_eq!(
            serde_json::to_string(&SaleStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        assert_eq!(
            serde_json::to_string(&CashScope::Company).unwrap(),
            "\"company\""
        );
        assert_eq!(
            serde_json::to_string(&MovementKind::Withdrawal).unwrap(),
            "\"withdrawal\""
        );

        let solo: AccountContext =
            serde_json::from_str(r#"{"kind":"solo","user_id":"u-1"}"#).unwrap();
        assert_eq!(solo.owner_ref(), "u-1");
    }
}
