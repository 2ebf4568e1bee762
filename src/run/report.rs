use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::display::{cell_text, format_amount, pad, pad_left};
use crate::ledger::Ledger;
use crate::models::{Column, ColumnType};
use crate::summary::{rollup_categories, Summary, Totals};

fn column_width(column: Column) -> usize {
    match column {
        Column::Date => 10,
        Column::Category => 16,
        Column::Shop => 16,
        Column::Description => 30,
        Column::Value => 14,
    }
}

fn render_cell(text: &str, column: Column) -> String {
    let width = column_width(column);
    match column.kind() {
        ColumnType::Currency => pad_left(text, width),
        ColumnType::Date | ColumnType::Text => pad(text, width),
    }
}

/// The ledger as a text table, one numbered line per row.
pub(crate) fn render_table(ledger: &Ledger) -> String {
    let mut out = String::new();
    let header: Vec<String> = Column::all()
        .iter()
        .map(|c| render_cell(c.label(), *c))
        .collect();
    let _ = writeln!(out, "{:>4}  {}", "#", header.join("  "));
    let width = 6 + Column::all().iter().map(|c| column_width(*c) + 2).sum::<usize>() - 2;
    let _ = writeln!(out, "{}", "─".repeat(width));

    for (i, entry) in ledger.entries().iter().enumerate() {
        let cells: Vec<String> = Column::all()
            .iter()
            .map(|c| render_cell(&cell_text(entry, *c), *c))
            .collect();
        let _ = writeln!(out, "{:>4}  {}", i + 1, cells.join("  "));
    }

    if ledger.is_empty() {
        let _ = writeln!(out, "  (no entries)");
    }
    out
}

fn render_totals(out: &mut String, title: &str, totals: &Totals, with_share: bool) {
    let _ = writeln!(out, "{title}:");
    if totals.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let sum = totals.sum();
    for (key, amount) in totals.items() {
        let label = if key.is_empty() { "(leer)" } else { key.as_str() };
        let mut line = format!("  {} {}", pad(label, 24), pad_left(&format_amount(*amount), 16));
        if with_share {
            if let Some(share) = sum.and_then(|sum| share_percent(*amount, sum)) {
                let _ = write!(line, "  {share:>3}%");
            }
        }
        let _ = writeln!(out, "{line}");
    }
}

/// Whole-number share of `amount` in `sum`, truncated like the pie labels.
/// `None` for a zero sum or when the arithmetic overflows.
pub(crate) fn share_percent(amount: Decimal, sum: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(sum)?
        .trunc()
        .to_i64()
}

/// All three summaries as text. `rollup` folds small categories together.
pub(crate) fn render_summary(summary: &Summary, rollup: bool) -> String {
    let mut out = String::new();
    let categories = if rollup {
        rollup_categories(&summary.by_category)
    } else {
        summary.by_category.clone()
    };

    render_totals(&mut out, "Ausgaben pro Kategorie", &categories, true);
    let _ = writeln!(out);
    render_totals(&mut out, "Ausgaben pro Monat", &summary.by_month, false);
    let _ = writeln!(out);
    render_totals(&mut out, "Ausgaben pro Geschäft", &summary.by_shop, true);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} {}", pad("Gesamt", 24), pad_left(&format_amount(summary.total()), 16));
    if summary.skipped > 0 {
        let _ = writeln!(
            out,
            "  ({} row(s) with invalid date or amount not counted)",
            summary.skipped
        );
    }
    out
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
