//! # Settlement Module
//!
//! Pure aggregation of sale/movement rows into settlement figures.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Settlement Pipeline                               │
//! │                                                                         │
//! │  rows fetched by vendia-db (already in memory)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_totals(&[Sale]) ──► SaleTotals                                │
//! │       │                        ├── total_sold                          │
//! │       │                        ├── sale_count / average_ticket         │
//! │       │                        └── by_method breakdown                 │
//! │       ▼                                                                 │
//! │  compute_commission(total, rate) ──► commission owed                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_theoretical_balance(opening, cash in, cash out)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Settlement ──► UI dashboard / caixa close / CSV / PDF                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! All sums are integer centavos, so results are invariant under permutation
//! of the input rows. Compute once per fetched data set; there is nothing to
//! cache beyond that.
//!
//! ## Failure Model
//! A malformed row (negative quantity or unit price) fails the WHOLE
//! aggregation with `CoreError::DataIntegrity`. Reconciliation totals are
//! worthless if bad rows are silently skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CashMovement, CommissionRate, MovementKind, PaymentMethod, Sale};
use crate::validation;

// =============================================================================
// Sale Totals
// =============================================================================

/// Aggregated figures over a set of confirmed sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTotals {
    /// Sum of line totals over confirmed sales.
    pub total_sold: Money,
    /// Number of confirmed sales.
    pub sale_count: u64,
    /// Per-payment-method sums. Methods with no sales are absent.
    pub by_method: BTreeMap<PaymentMethod, Money>,
}

impl SaleTotals {
    /// Empty totals (zero everything).
    pub fn empty() -> Self {
        SaleTotals {
            total_sold: Money::zero(),
            sale_count: 0,
            by_method: BTreeMap::new(),
        }
    }

    /// Average value per sale. Zero when there are no sales.
    #[inline]
    pub fn average_ticket(&self) -> Money {
        self.total_sold.divide_count(self.sale_count)
    }

    /// Sum for one payment method (zero if absent).
    #[inline]
    pub fn method_total(&self, method: PaymentMethod) -> Money {
        self.by_method
            .get(&method)
            .copied()
            .unwrap_or_else(Money::zero)
    }

    /// Sum of cash-paid sales; the only sales bucket that moves the drawer.
    #[inline]
    pub fn cash_total(&self) -> Money {
        self.method_total(PaymentMethod::Cash)
    }
}

impl Default for SaleTotals {
    fn default() -> Self {
        SaleTotals::empty()
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The full settlement picture for a seller/company over a period.
///
/// Derived, never persisted as its own entity: the caixa row stores the
/// counted/theoretical/discrepancy figures at close, everything else is
/// recomputed from rows on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub totals: SaleTotals,
    /// total_sold × commission rate, half-up rounded.
    pub commission_owed: Money,
    /// opening + cash inflows − cash outflows.
    pub theoretical_balance: Money,
    /// counted − theoretical; None until a counted balance exists.
    pub discrepancy: Option<Money>,
}

impl Settlement {
    /// Average value per sale. Zero when there are no sales.
    #[inline]
    pub fn average_ticket(&self) -> Money {
        self.totals.average_ticket()
    }

    /// Records the counted balance, fixing the discrepancy.
    ///
    /// Sign is preserved: positive = surplus, negative = shortage. Never
    /// clamped; the user sees the real difference.
    pub fn with_counted_balance(mut self, counted: Money) -> Self {
        self.discrepancy = Some(compute_discrepancy(counted, self.theoretical_balance));
        self
    }
}

// =============================================================================
// Calculator Functions
// =============================================================================

/// Aggregates confirmed sales into totals and a per-method breakdown.
///
/// ## Rules
/// - Only `Confirmed` sales are summed; pending and cancelled are skipped.
/// - EVERY row in the batch is integrity-checked first: a negative quantity
///   or unit price anywhere fails the aggregation with no partial totals.
///
/// ## Example
/// ```rust
/// use vendia_core::settlement::compute_totals;
///
/// let totals = compute_totals(&[]).unwrap();
/// assert_eq!(totals.total_sold.cents(), 0);
/// assert_eq!(totals.average_ticket().cents(), 0);
/// ```
pub fn compute_totals(sales: &[Sale]) -> CoreResult<SaleTotals> {
    let mut totals = SaleTotals::empty();

    for sale in sales {
        check_sale_integrity(sale)?;

        if !sale.is_confirmed() {
            continue;
        }

        let line = sale.line_total();
        totals.total_sold += line;
        totals.sale_count += 1;
        *totals
            .by_method
            .entry(sale.payment_method)
            .or_insert_with(Money::zero) += line;
    }

    Ok(totals)
}

/// Commission owed on a sales total.
///
/// The rate must lie in 0..=10000 bps ([0, 1] as a fraction) and the total
/// must be non-negative; both are input errors, not silent coercions.
///
/// ## Example
/// ```rust
/// use vendia_core::money::Money;
/// use vendia_core::settlement::compute_commission;
/// use vendia_core::types::CommissionRate;
///
/// let owed = compute_commission(Money::from_cents(10_000), CommissionRate::from_bps(1000));
/// assert_eq!(owed.unwrap().cents(), 1000); // R$ 10,00 on R$ 100,00 at 10%
/// ```
pub fn compute_commission(total_sold: Money, rate: CommissionRate) -> CoreResult<Money> {
    validation::validate_commission_rate_bps(rate.bps())?;

    if total_sold.is_negative() {
        return Err(CoreError::InvalidAmount {
            field: "total_sold".to_string(),
            cents: total_sold.cents(),
        });
    }

    Ok(total_sold.apply_rate(rate))
}

/// Expected physical cash at close.
///
/// Only cash-paid sales and manual movements count: Pix and Card inflows
/// never change what is sitting in the drawer.
#[inline]
pub fn compute_theoretical_balance(
    opening_balance: Money,
    cash_inflows: Money,
    cash_outflows: Money,
) -> Money {
    opening_balance + cash_inflows - cash_outflows
}

/// Signed difference between counted and expected cash.
///
/// Positive = surplus, negative = shortage. Any real value is valid and is
/// surfaced as-is.
#[inline]
pub fn compute_discrepancy(counted_balance: Money, theoretical_balance: Money) -> Money {
    counted_balance - theoretical_balance
}

/// Splits manual movements into (deposits, withdrawals) sums.
pub fn movement_flows(movements: &[CashMovement]) -> (Money, Money) {
    let mut deposits = Money::zero();
    let mut withdrawals = Money::zero();

    for movement in movements {
        match movement.kind {
            MovementKind::Deposit => deposits += movement.amount(),
            MovementKind::Withdrawal => withdrawals += movement.amount(),
        }
    }

    (deposits, withdrawals)
}

/// The single aggregation step: rows in, settlement out.
///
/// This is the memoization boundary - call it once per fetched data set,
/// not once per render.
pub fn settle(
    sales: &[Sale],
    rate: CommissionRate,
    opening_balance: Money,
    movements: &[CashMovement],
) -> CoreResult<Settlement> {
    let totals = compute_totals(sales)?;
    let commission_owed = compute_commission(totals.total_sold, rate)?;

    let (deposits, withdrawals) = movement_flows(movements);
    let theoretical_balance = compute_theoretical_balance(
        opening_balance,
        totals.cash_total() + deposits,
        withdrawals,
    );

    Ok(Settlement {
        totals,
        commission_owed,
        theoretical_balance,
        discrepancy: None,
    })
}

/// The best-selling product of a period, by confirmed revenue.
///
/// Used by report headers ("produto destaque"). Ties break on product name
/// so the result is stable across row orderings.
pub fn top_product(sales: &[Sale]) -> Option<(String, Money)> {
    let mut revenue: BTreeMap<&str, Money> = BTreeMap::new();

    for sale in sales {
        if sale.is_confirmed() {
            *revenue
                .entry(sale.product_name.as_str())
                .or_insert_with(Money::zero) += sale.line_total();
        }
    }

    revenue
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
        .map(|(name, total)| (name.to_string(), total))
}

/// Fails on rows that would poison reconciliation totals.
fn check_sale_integrity(sale: &Sale) -> CoreResult<()> {
    if sale.quantity < 0 {
        return Err(CoreError::DataIntegrity {
            sale_id: sale.id.clone(),
            reason: format!("negative quantity {}", sale.quantity),
        });
    }

    if sale.unit_price_cents < 0 {
        return Err(CoreError::DataIntegrity {
            sale_id: sale.id.clone(),
            reason: format!("negative unit price {}", sale.unit_price_cents),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
