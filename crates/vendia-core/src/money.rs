//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a commission settlement:                                            │
//! │    R$ 10.00 × 3 sellers at 33.33% each → fractions of a centavo lost   │
//! │    silently, and the caixa never reconciles                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1000 centavos / 3 = 333 centavos (×3 = 999 centavos)                │
//! │    We KNOW we lost 1 centavo, and handle it explicitly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendia_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(1099); // R$ 10,99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // R$ 21,98
//! let total = price + Money::from_cents(500);  // R$ 15,99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::CommissionRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for discrepancies, withdrawals
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale.unit_price_cents ──► line total ──► SaleTotals.total_sold        │
/// │                                                                         │
/// │  SaleTotals ──► commission ──► SettlementResult ──► CSV / PDF export   │
/// │                                                                         │
/// │  CashSession.opening_balance ──► theoretical balance ──► discrepancy   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    ///
    /// ## Why Centavos?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and exports all use centavos.
    /// Only the UI converts to reais for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    ///
    /// let shortage = Money::from_major_minor(-5, 50); // -R$ 5,50
    /// assert_eq!(shortage.cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -R$ 5,50, not -R$ 4,50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.reais(), 10);
    ///
    /// let shortage = Money::from_cents(-550);
    /// assert_eq!(shortage.reais(), -5);
    /// ```
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let shortage = Money::from_cents(-550);
    /// assert_eq!(shortage.abs().cents(), 550);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a fractional rate (commission) with half-up rounding.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    /// use vendia_core::types::CommissionRate;
    ///
    /// let total = Money::from_cents(10000);      // R$ 100,00
    /// let rate = CommissionRate::from_bps(1000); // 10%
    ///
    /// let commission = total.apply_rate(rate);
    /// assert_eq!(commission.cents(), 1000);      // R$ 10,00
    /// ```
    ///
    /// ## Settlement Workflow
    /// ```text
    /// Total sold: R$ 100,00
    ///      │
    ///      ▼
    /// apply_rate(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Commission owed: R$ 10,00
    /// ```
    pub fn apply_rate(&self, rate: CommissionRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 1000 = 10%
        // Formula: amount_cents * bps / 10000
        // With rounding: (amount_cents * bps + 5000) / 10000
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // R$ 2,99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);     // R$ 8,97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Divides evenly by a count, returning zero when the count is zero.
    ///
    /// Used for average-ticket calculations where an empty period must
    /// yield R$ 0,00 rather than a division panic.
    ///
    /// ## Example
    /// ```rust
    /// use vendia_core::money::Money;
    ///
    /// let total = Money::from_cents(10000);
    /// assert_eq!(total.divide_count(4).cents(), 2500);
    /// assert_eq!(total.divide_count(0).cents(), 0);
    /// ```
    #[inline]
    pub const fn divide_count(&self, count: u64) -> Self {
        if count == 0 {
            Money(0)
        } else {
            Money(self.0 / count as i64)
        }
    }

    /// Renders as a plain decimal string with two fraction digits (`123.45`).
    ///
    /// This is the canonical form for CSV exports; `Display` is the
    /// human-facing pt-BR form.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in pt-BR format (`R$ 10,99`).
///
/// ## Note
/// This is for logs and debugging. Exports use `to_decimal_string`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation of Money iterators (used by settlement aggregation).
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display_pt_br() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$ 10,99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5,00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5,50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0,00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(12345).to_decimal_string(), "123.45");
        assert_eq!(Money::from_cents(500).to_decimal_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_apply_rate_basic() {
        // R$ 100,00 at 10% = R$ 10,00
        let total = Money::from_cents(10000);
        let rate = CommissionRate::from_bps(1000); // 10%
        assert_eq!(total.apply_rate(rate).cents(), 1000);
    }

    #[test]
    fn test_apply_rate_with_rounding() {
        // R$ 10,00 at 8.25% = R$ 0,825 → R$ 0,83 (half-up)
        let total = Money::from_cents(1000);
        let rate = CommissionRate::from_bps(825);
        assert_eq!(total.apply_rate(rate).cents(), 83);
    }

    #[test]
    fn test_apply_rate_bounds() {
        let total = Money::from_cents(10000);
        assert_eq!(total.apply_rate(CommissionRate::from_bps(0)).cents(), 0);
        assert_eq!(
            total.apply_rate(CommissionRate::from_bps(10000)).cents(),
            10000
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }

    #[test]
    fn test_divide_count_guards_zero() {
        let total = Money::from_cents(10000);
        assert_eq!(total.divide_count(4).cents(), 2500);
        assert_eq!(total.divide_count(0).cents(), 0);
        assert_eq!(Money::zero().divide_count(0).cents(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 30]
            .iter()
            .map(|c| Money::from_cents(*c))
            .sum();
        assert_eq!(total.cents(), 380);
    }

    /// Documents the intentional precision loss of integer division.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = ten.divide_count(3); // 333 centavos
        let reconstructed: Money = one_third * 3; // 999 centavos

        assert_eq!(reconstructed.cents(), 999);
        let lost = ten - reconstructed;
        assert_eq!(lost.cents(), 1);
    }
}
