//! # PDF Exporter
//!
//! Renders a settlement report as a PDF byte stream: a summary block
//! (period, totals, top product) followed by a line-item table.
//!
//! ## Fonts
//! genpdf embeds TrueType fonts into the document, so the LiberationSans
//! family must be available in a caller-supplied directory (the web app
//! ships them alongside its assets). A missing font directory is a typed
//! [`ExportError::Fonts`], never a panic, and there is no silent fallback
//! font - output bytes must be stable.

use std::path::Path;

use chrono::{DateTime, Utc};
use genpdf::elements::{Break, Paragraph, StyledElement, TableLayout};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Margins, SimplePageDecorator};

use crate::error::{ExportError, ExportResult};
use crate::format::{format_date, method_label};
use vendia_core::settlement::{top_product, Settlement};
use vendia_core::types::PaymentMethod;
use vendia_core::Sale;

// =============================================================================
// Report Input
// =============================================================================

/// Everything the PDF needs, already fetched and settled.
#[derive(Debug, Clone)]
pub struct SettlementReport<'a> {
    /// Document title, e.g. "Fechamento de caixa - Maria".
    pub title: String,
    pub period_from: DateTime<Utc>,
    pub period_to: DateTime<Utc>,
    pub settlement: &'a Settlement,
    /// The rows behind the settlement; drives the line-item table and the
    /// top-product line.
    pub sales: &'a [Sale],
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders the report to PDF bytes.
pub fn settlement_pdf(report: &SettlementReport<'_>, fonts_dir: &Path) -> ExportResult<Vec<u8>> {
    let font_family = genpdf::fonts::from_files(fonts_dir, "LiberationSans", None).map_err(|e| {
        ExportError::Fonts(format!(
            "{e}. Expected LiberationSans-*.ttf in {}",
            fonts_dir.display()
        ))
    })?;

    let mut doc = Document::new(font_family);
    doc.set_title(&report.title);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(10, 10, 10, 10));
    doc.set_page_decorator(decorator);

    let s_title = Style::new().with_font_size(14).bold();
    let s_normal = Style::new().with_font_size(9);
    let s_bold = Style::new().with_font_size(9).bold();
    let s_small = Style::new().with_font_size(7);

    // Header
    doc.push(p_aligned(&report.title, s_title, Alignment::Center));
    doc.push(p_aligned(
        &format!(
            "Período: {} - {}",
            format_date(report.period_from),
            format_date(report.period_to)
        ),
        s_normal,
        Alignment::Center,
    ));
    doc.push(Break::new(1));

    // Summary block
    let settlement = report.settlement;
    let mut summary = TableLayout::new(vec![3, 2]);

    summary_row(
        &mut summary,
        "Total vendido",
        &settlement.totals.total_sold.to_decimal_string(),
        s_bold,
        s_normal,
    )?;
    summary_row(
        &mut summary,
        "Vendas",
        &settlement.totals.sale_count.to_string(),
        s_bold,
        s_normal,
    )?;
    summary_row(
        &mut summary,
        "Ticket médio",
        &settlement.average_ticket().to_decimal_string(),
        s_bold,
        s_normal,
    )?;
    summary_row(
        &mut summary,
        "Comissão",
        &settlement.commission_owed.to_decimal_string(),
        s_bold,
        s_normal,
    )?;

    for method in PaymentMethod::ALL {
        summary_row(
            &mut summary,
            &format!("Recebido em {}", method_label(method)),
            &settlement.totals.method_total(method).to_decimal_string(),
            s_normal,
            s_normal,
        )?;
    }

    summary_row(
        &mut summary,
        "Saldo teórico",
        &settlement.theoretical_balance.to_decimal_string(),
        s_bold,
        s_normal,
    )?;

    if let Some(discrepancy) = settlement.discrepancy {
        summary_row(
            &mut summary,
            "Diferença",
            &discrepancy.to_decimal_string(),
            s_bold,
            s_bold,
        )?;
    }

    if let Some((name, revenue)) = top_product(report.sales) {
        summary_row(
            &mut summary,
            "Produto destaque",
            &format!("{} ({})", name, revenue.to_decimal_string()),
            s_normal,
            s_normal,
        )?;
    }

    doc.push(summary);
    doc.push(Break::new(1));

    // Line-item table
    doc.push(p("Vendas do período", s_bold));

    let mut items = TableLayout::new(vec![2, 4, 1, 2, 2, 2]);
    items
        .row()
        .element(p("Data", s_bold))
        .element(p("Produto", s_bold))
        .element(p("Qtd", s_bold))
        .element(p_aligned("Valor Unit.", s_bold, Alignment::Right))
        .element(p_aligned("Total", s_bold, Alignment::Right))
        .element(p("Pagamento", s_bold))
        .push()
        .map_err(|e| ExportError::Pdf(format!("items header: {e}")))?;

    for sale in report.sales {
        items
            .row()
            .element(p(&format_date(sale.sold_at), s_small))
            .element(p(&sale.product_name, s_small))
            .element(p(&sale.quantity.to_string(), s_small))
            .element(p_aligned(
                &sale.unit_price().to_decimal_string(),
                s_small,
                Alignment::Right,
            ))
            .element(p_aligned(
                &sale.line_total().to_decimal_string(),
                s_small,
                Alignment::Right,
            ))
            .element(p(method_label(sale.payment_method), s_small))
            .push()
            .map_err(|e| ExportError::Pdf(format!("item row: {e}")))?;
    }

    doc.push(items);

    // Render to bytes
    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    Ok(buffer)
}

// =============================================================================
// Element Helpers
// =============================================================================

/// Styled paragraph.
fn p(text: &str, style: Style) -> StyledElement<Paragraph> {
    Paragraph::new(text).styled(style)
}

/// Styled + aligned paragraph.
fn p_aligned(text: &str, style: Style, align: Alignment) -> impl Element {
    Paragraph::new(text).aligned(align).styled(style)
}

fn summary_row(
    table: &mut TableLayout,
    label: &str,
    value: &str,
    label_style: Style,
    value_style: Style,
) -> ExportResult<()> {
    table
        .row()
        .element(p(label, label_style))
        .element(p_aligned(value, value_style, Alignment::Right))
        .push()
        .map_err(|e| ExportError::Pdf(format!("summary row '{label}': {e}")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vendia_core::settlement::settle;
    use vendia_core::types::CommissionRate;
    use vendia_core::Money;

    #[test]
    fn test_missing_fonts_is_typed_error() {
        let settlement = settle(&[], CommissionRate::zero(), Money::zero(), &[]).unwrap();
        let report = SettlementReport {
            title: "Fechamento de caixa".to_string(),
            period_from: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            period_to: Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap(),
            settlement: &settlement,
            sales: &[],
        };

        let err = settlement_pdf(&report, Path::new("/definitely/not/a/fonts/dir")).unwrap_err();
        assert!(matches!(err, ExportError::Fonts(_)));
    }
}
