//! # CSV Exporter
//!
//! Renders sale rows and settlement summaries as CSV text (UTF-8, comma
//! separated, pt-BR dates, plain-decimal amounts).
//!
//! ## Determinism
//! Column order is fixed, per-method rows always appear in the same order,
//! and amounts go through [`Money::to_decimal_string`] - identical input
//! produces identical text. An empty row set produces a header-only file.

// `::csv` disambiguates the crate from this module
use ::csv::WriterBuilder;
use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::format::{format_date, method_label};
use vendia_core::settlement::Settlement;
use vendia_core::types::PaymentMethod;
use vendia_core::Sale;

/// Header of the sales line-item export.
pub const SALES_HEADER: [&str; 6] = [
    "Data",
    "Produto",
    "Quantidade",
    "Valor Unitário",
    "Total",
    "Pagamento",
];

/// One line of the sales export; field order matches [`SALES_HEADER`].
#[derive(Debug, Serialize)]
struct SaleRow {
    data: String,
    produto: String,
    quantidade: i64,
    valor_unitario: String,
    total: String,
    pagamento: String,
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        SaleRow {
            data: format_date(sale.sold_at),
            produto: sale.product_name.clone(),
            quantidade: sale.quantity,
            valor_unitario: sale.unit_price().to_decimal_string(),
            total: sale.line_total().to_decimal_string(),
            pagamento: method_label(sale.payment_method).to_string(),
        }
    }
}

/// Renders sale rows as CSV, one line per sale, in the order given.
///
/// Filtering (confirmed-only, date windows) is the caller's job; this is
/// pure formatting over whatever rows arrive.
pub fn sales_csv(sales: &[Sale]) -> ExportResult<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);

    // Explicit header so an empty export is still a valid file
    writer.write_record(SALES_HEADER)?;

    for sale in sales {
        writer.serialize(SaleRow::from(sale))?;
    }

    finish(writer)
}

/// Renders a settlement summary as a two-column CSV (`Campo,Valor`).
///
/// Every payment method gets a row even when zero, so downstream
/// spreadsheets see a stable shape.
pub fn settlement_csv(
    settlement: &Settlement,
    period_from: chrono::DateTime<chrono::Utc>,
    period_to: chrono::DateTime<chrono::Utc>,
) -> ExportResult<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);

    writer.write_record(["Campo", "Valor"])?;
    writer.write_record([
        "Período",
        &format!("{} - {}", format_date(period_from), format_date(period_to)),
    ])?;
    writer.write_record([
        "Total vendido",
        &settlement.totals.total_sold.to_decimal_string(),
    ])?;
    writer.write_record(["Vendas", &settlement.totals.sale_count.to_string()])?;
    writer.write_record([
        "Ticket médio",
        &settlement.average_ticket().to_decimal_string(),
    ])?;
    writer.write_record(["Comissão", &settlement.commission_owed.to_decimal_string()])?;

    for method in PaymentMethod::ALL {
        writer.write_record([
            &format!("Recebido em {}", method_label(method)),
            &settlement.totals.method_total(method).to_decimal_string(),
        ])?;
    }

    writer.write_record([
        "Saldo teórico",
        &settlement.theoretical_balance.to_decimal_string(),
    ])?;

    if let Some(discrepancy) = settlement.discrepancy {
        writer.write_record(["Diferença", &discrepancy.to_decimal_string()])?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> ExportResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Finalize(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Finalize(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use vendia_core::settlement::{compute_totals, settle};
    use vendia_core::types::{CommissionRate, SaleStatus};
    use vendia_core::Money;

    fn sale(product: &str, method: PaymentMethod, quantity: i64, unit_price_cents: i64) -> Sale {
        let ts = Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap();
        Sale {
            id: Uuid::new_v4().to_string(),
            company_id: None,
            seller_id: "u-1".to_string(),
            product_id: Uuid::new_v4().to_string(),
            product_name: product.to_string(),
            quantity,
            unit_price_cents,
            payment_method: method,
            status: SaleStatus::Confirmed,
            sold_at: ts,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_empty_sales_csv_is_header_only() {
        let text = sales_csv(&[]).unwrap();
        assert_eq!(
            text.trim(),
            "Data,Produto,Quantidade,Valor Unitário,Total,Pagamento"
        );
    }

    #[test]
    fn test_sales_csv_rows() {
        let sales = vec![
            sale("Brigadeiro", PaymentMethod::Cash, 3, 350),
            sale("Bolo de pote", PaymentMethod::Pix, 1, 1200),
        ];

        let text = sales_csv(&sales).unwrap();
        let lines: Vec<&str> = text.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "05/03/2026,Brigadeiro,3,3.50,10.50,Dinheiro");
        assert_eq!(lines[2], "05/03/2026,Bolo de pote,1,12.00,12.00,Pix");
    }

    #[test]
    fn test_sales_csv_deterministic() {
        let sales = vec![sale("Brigadeiro", PaymentMethod::Cash, 3, 350)];
        assert_eq!(sales_csv(&sales).unwrap(), sales_csv(&sales).unwrap());
    }

    /// Re-parsing the export reproduces the computed totals to the centavo.
    #[test]
    fn test_sales_csv_roundtrip_totals() {
        let sales = vec![
            sale("Brigadeiro", PaymentMethod::Cash, 3, 350),
            sale("Bolo de pote", PaymentMethod::Pix, 2, 1225),
            sale("Brownie", PaymentMethod::Card, 1, 900),
        ];
        let totals = compute_totals(&sales).unwrap();

        let text = sales_csv(&sales).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let mut reparsed_cents = 0i64;
        for record in reader.records() {
            let record = record.unwrap();
            let total: f64 = record[4].parse().unwrap();
            reparsed_cents += (total * 100.0).round() as i64;
        }

        assert_eq!(reparsed_cents, totals.total_sold.cents());
    }

    #[test]
    fn test_settlement_csv_contents() {
        let sales = vec![
            sale("Brigadeiro", PaymentMethod::Pix, 1, 5000),
            sale("Brownie", PaymentMethod::Cash, 1, 3000),
            sale("Cookie", PaymentMethod::Card, 1, 2000),
        ];
        let settlement = settle(
            &sales,
            CommissionRate::from_bps(1000),
            Money::from_cents(10_000),
            &[],
        )
        .unwrap()
        .with_counted_balance(Money::from_cents(12_500));

        let from = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let text = settlement_csv(&settlement, from, to).unwrap();

        assert!(text.contains("Período,01/03/2026 - 31/03/2026"));
        assert!(text.contains("Total vendido,100.00"));
        assert!(text.contains("Comissão,10.00"));
        assert!(text.contains("Recebido em Pix,50.00"));
        assert!(text.contains("Recebido em Cartão,20.00"));
        assert!(text.contains("Recebido em Dinheiro,30.00"));
        assert!(text.contains("Saldo teórico,130.00"));
        assert!(text.contains("Diferença,-5.00"));
    }

    #[test]
    fn test_settlement_csv_empty_period() {
        let settlement = settle(&[], CommissionRate::zero(), Money::zero(), &[]).unwrap();

        let from = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let text = settlement_csv(&settlement, from, to).unwrap();

        assert!(text.contains("Total vendido,0.00"));
        assert!(text.contains("Ticket médio,0.00"));
        assert!(text.contains("Recebido em Pix,0.00"));
        assert!(!text.contains("Diferença"));
    }
}
