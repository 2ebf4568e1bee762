#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

use super::*;

fn make_entry(amount: &str, description: &str, shop: &str) -> Entry {
    Entry {
        date: "2024-01-15".into(),
        category: "Lebensmittel".into(),
        shop: shop.into(),
        description: description.into(),
        amount: amount.into(),
    }
}

// ── Column ────────────────────────────────────────────────────

#[test]
fn test_column_display_order() {
    let keys: Vec<&str> = Column::all().iter().map(|c| c.key()).collect();
    assert_eq!(keys, vec!["Datum", "Kategorie", "Geschäft", "Ausgabe", "Wert"]);
}

#[test]
fn test_column_key_differs_from_label() {
    assert_eq!(Column::Value.key(), "Wert");
    assert_eq!(Column::Value.label(), "Betrag");
    assert_eq!(Column::Description.key(), "Ausgabe");
    assert_eq!(Column::Description.label(), "Beschreibung");
}

#[test]
fn test_column_from_index() {
    assert_eq!(Column::from_index(0), Some(Column::Date));
    assert_eq!(Column::from_index(4), Some(Column::Value));
}

#[test]
fn test_column_from_index_out_of_bounds() {
    assert_eq!(Column::from_index(5), None);
    assert_eq!(Column::from_index(usize::MAX), None);
}

#[test]
fn test_column_parse_key_and_label() {
    assert_eq!(Column::parse("Wert"), Some(Column::Value));
    assert_eq!(Column::parse("betrag"), Some(Column::Value));
    assert_eq!(Column::parse(" GESCHÄFT "), Some(Column::Shop));
    assert_eq!(Column::parse("Beschreibung"), Some(Column::Description));
    assert_eq!(Column::parse("price"), None);
}

#[test]
fn test_column_kind() {
    assert_eq!(Column::Date.kind(), ColumnType::Date);
    assert_eq!(Column::Value.kind(), ColumnType::Currency);
    assert_eq!(Column::Shop.kind(), ColumnType::Text);
}

// ── Entry ─────────────────────────────────────────────────────

#[test]
fn test_entry_new_canonicalizes() {
    let entry = Entry::new(
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        "Gastronomie".into(),
        "Café".into(),
        "Kuchen".into(),
        dec!(4.50),
    );
    assert_eq!(entry.date, "2024-03-07");
    assert_eq!(entry.amount, "4.50");
    assert_eq!(entry.parsed_amount(), Some(dec!(4.5)));
}

#[test]
fn test_entry_get_set() {
    let mut entry = make_entry("10.00", "Brot", "Bäcker");
    assert_eq!(entry.get(Column::Shop), "Bäcker");
    assert!(entry.set(Column::Shop, "Markt".into()));
    assert_eq!(entry.get(Column::Shop), "Markt");
    assert!(!entry.set(Column::Shop, "Markt".into()));
}

#[test]
fn test_entry_parsed_date_invalid() {
    let mut entry = make_entry("1", "x", "");
    entry.date = "not-a-date".into();
    assert!(entry.parsed_date().is_none());
    entry.date = "15.01.2024".into();
    assert!(entry.parsed_date().is_none());
}

#[test]
fn test_entry_parsed_amount_invalid() {
    assert!(make_entry("abc", "x", "").parsed_amount().is_none());
    assert!(make_entry("", "x", "").parsed_amount().is_none());
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_validate_accept() {
    assert_eq!(
        make_entry("12.30", "Brot", "").validate(),
        Ok(Validation::Accept)
    );
}

#[test]
fn test_validate_discard_when_empty() {
    assert_eq!(make_entry("0", "", "").validate(), Ok(Validation::Discard));
}

#[test]
fn test_validate_zero_amount() {
    assert_eq!(
        make_entry("0.00", "Brot", "").validate(),
        Err(EntryError::ZeroAmount)
    );
    // A shop alone is not enough to discard silently
    assert_eq!(
        make_entry("0", "", "Bäcker").validate(),
        Err(EntryError::ZeroAmount)
    );
}

#[test]
fn test_validate_empty_description() {
    assert_eq!(
        make_entry("5", "  ", "Bäcker").validate(),
        Err(EntryError::EmptyDescription)
    );
}

#[test]
fn test_validate_invalid_amount() {
    assert_eq!(
        make_entry("zwölf", "Brot", "").validate(),
        Err(EntryError::InvalidAmount("zwölf".into()))
    );
}

#[test]
fn test_validate_invalid_date() {
    let mut entry = make_entry("5", "Brot", "");
    entry.date = "2024-13-01".into();
    assert!(matches!(entry.validate(), Err(EntryError::InvalidDate(_))));
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_suggestions_merge_defaults() {
    let used: BTreeSet<String> = ["Miete".to_string(), "Lebensmittel".to_string()].into();
    let all = category_suggestions(&used);
    assert_eq!(all.len(), DEFAULT_CATEGORIES.len() + 1);
    assert!(all.contains(&"Miete".to_string()));
    let mut sorted = all.clone();
    sorted.sort();
    assert_eq!(all, sorted);
}

#[test]
fn test_find_by_name_case_insensitive() {
    let candidates = vec!["Gastronomie".to_string(), "Miete".to_string()];
    assert_eq!(find_by_name(&candidates, "miete"), Some("Miete"));
    assert_eq!(find_by_name(&candidates, "Urlaub"), None);
}
