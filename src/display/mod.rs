use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ledger::Ledger;
use crate::models::{Column, ColumnType, Entry, DATE_FORMAT};

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Format an amount the way it is shown in the table: 2 decimal places,
/// `.` thousands separator, `,` decimal separator, thin space and euro sign.
/// e.g. `1234567.891` → `"1.234.567,89 €"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let grouped: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped},{dec_part}\u{2009}€")
}

/// `YYYY-MM-DD` → `DD.MM.YYYY`. Text that is not a date is shown as is.
pub(crate) fn format_date(s: &str) -> String {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| s.to_string())
}

/// Parse user input into an amount. Accepts `12.50`, `12,50`, `1.234,50`
/// and an optional euro sign. Empty input is zero. `1.234` is rejected since
/// it reads as a thousands group as well as a decimal.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '€' | '\u{2009}' | '\u{a0}') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if is_dot_grouped(&cleaned) {
        anyhow::bail!("Ambiguous amount '{s}': use 1234 or 1.234,00");
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    Decimal::from_str(&normalized).with_context(|| format!("Failed to parse '{s}' as amount"))
}

/// `1.234` or `-12.345.678`: digits in groups of three after the first,
/// separated by dots only.
fn is_dot_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let first = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && (1..=3).contains(&first.len())
        && !first.starts_with('0')
        && first.bytes().all(|b| b.is_ascii_digit())
        && rest
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Display text for one cell.
pub(crate) fn cell_text(entry: &Entry, column: Column) -> String {
    let raw = entry.get(column);
    match column.kind() {
        ColumnType::Date => format_date(raw),
        ColumnType::Currency => entry
            .parsed_amount()
            .map(format_amount)
            .unwrap_or_else(|| raw.to_string()),
        ColumnType::Text => raw.to_string(),
    }
}

/// Text for copying a cell selection: cells in row/column order, tab between
/// cells of a row, newline between rows. Cells outside the table are ignored.
pub(crate) fn selection_text(ledger: &Ledger, cells: &[(usize, Column)]) -> String {
    let mut sorted: Vec<(usize, Column)> = cells.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut out = String::new();
    let mut previous_row: Option<usize> = None;
    for (row, column) in sorted {
        let Some(entry) = ledger.row(row) else {
            continue;
        };
        match previous_row {
            Some(prev) if prev != row => out.push('\n'),
            Some(_) => out.push('\t'),
            None => {}
        }
        out.push_str(&cell_text(entry, column));
        previous_row = Some(row);
    }
    out
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Left-align `s` in a field of `width` characters, truncating if needed.
pub(crate) fn pad(s: &str, width: usize) -> String {
    let t = truncate(s, width);
    let fill = width.saturating_sub(t.chars().count());
    format!("{t}{}", " ".repeat(fill))
}

/// Right-align counterpart of [`pad`], for amounts.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let t = truncate(s, width);
    let fill = width.saturating_sub(t.chars().count());
    format!("{}{t}", " ".repeat(fill))
}
