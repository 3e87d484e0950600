//! # Formatting Helpers
//!
//! Shared pt-BR rendering rules for both exporters:
//! - dates as `dd/mm/yyyy`
//! - amounts as plain decimals (`123.45`) via [`Money::to_decimal_string`]
//!
//! Keeping these in one place is what makes CSV and PDF output byte-stable.

use chrono::{DateTime, NaiveDate, Utc};

use vendia_core::PaymentMethod;

/// Renders a timestamp as a pt-BR date (`dd/mm/yyyy`).
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

/// Renders a calendar date as pt-BR (`dd/mm/yyyy`).
pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Human label for a payment method, as shown in reports.
pub fn method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Pix => "Pix",
        PaymentMethod::Card => "Cartão",
        PaymentMethod::Cash => "Dinheiro",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(ts), "05/03/2026");
    }

    #[test]
    fn test_format_naive_date() {
        let d = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(format_naive_date(d), "31/12/2026");
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(method_label(PaymentMethod::Pix), "Pix");
        assert_eq!(method_label(PaymentMethod::Card), "Cartão");
        assert_eq!(method_label(PaymentMethod::Cash), "Dinheiro");
    }
}
