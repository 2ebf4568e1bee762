#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn row(date: &str, shop: &str, category: &str, description: &str, amount: &str) -> Entry {
    Entry {
        date: date.into(),
        category: category.into(),
        shop: shop.into(),
        description: description.into(),
        amount: amount.into(),
    }
}

fn sample() -> Vec<Entry> {
    vec![
        row("2024-01-05", "A", "food", "x", "10.00"),
        row("2024-01-20", "A", "food", "y", "5.00"),
        row("2024-02-01", "B", "transport", "z", "3.00"),
    ]
}

fn totals(pairs: &[(&str, Decimal)]) -> Totals {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ── Summary::compute ──────────────────────────────────────────

#[test]
fn test_compute_groups() {
    let s = Summary::compute(&sample());
    assert_eq!(s.by_category, totals(&[("food", dec!(15.00)), ("transport", dec!(3.00))]));
    assert_eq!(s.by_shop, totals(&[("A", dec!(15.00)), ("B", dec!(3.00))]));
    assert_eq!(
        s.by_month,
        totals(&[("Jan 2024", dec!(15.00)), ("Feb 2024", dec!(3.00))])
    );
    assert_eq!(s.skipped, 0);
    assert_eq!(s.total(), dec!(18.00));
}

#[test]
fn test_compute_first_seen_order() {
    let entries = vec![
        row("2024-03-01", "", "zeta", "a", "1"),
        row("2024-01-01", "", "alpha", "b", "1"),
        row("2024-03-02", "", "zeta", "c", "1"),
    ];
    let s = Summary::compute(&entries);
    let keys: Vec<&str> = s.by_category.items().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
    let months: Vec<&str> = s.by_month.items().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(months, vec!["Mar 2024", "Jan 2024"]);
}

#[test]
fn test_compute_skips_empty_shop() {
    let entries = vec![
        row("2024-01-01", "", "food", "a", "2"),
        row("2024-01-02", "A", "food", "b", "3"),
    ];
    let s = Summary::compute(&entries);
    assert_eq!(s.by_shop, totals(&[("A", dec!(3))]));
    assert_eq!(s.by_category.get("food"), Some(dec!(5)));
}

#[test]
fn test_compute_bad_date_drops_whole_row() {
    let mut entries = sample();
    entries.push(row("not-a-date", "C", "fun", "w", "100"));
    let s = Summary::compute(&entries);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.by_category.get("fun"), None);
    assert_eq!(s.by_shop.get("C"), None);
    assert_eq!(s.by_month.len(), 2);
    assert_eq!(s.total(), dec!(18.00));
}

#[test]
fn test_compute_bad_amount_drops_whole_row() {
    let mut entries = sample();
    entries.push(row("2024-03-01", "C", "fun", "w", "zwölf"));
    let s = Summary::compute(&entries);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.by_category.get("fun"), None);
    assert_eq!(s.by_month.get("Mar 2024"), None);
}

#[test]
fn test_compute_overflowing_row_is_skipped() {
    let entries = vec![
        row("2024-01-01", "A", "big", "a", "79228162514264337593543950335"),
        row("2024-01-02", "B", "big", "b", "79228162514264337593543950335"),
        row("2024-01-03", "C", "refund", "c", "-1"),
    ];
    let s = Summary::compute(&entries);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.by_category.get("big"), Some(Decimal::MAX));
    // Dropped from every total, not just the one that overflowed
    assert_eq!(s.by_shop.get("B"), None);
    assert_eq!(s.by_month.get("Jan 2024"), Some(Decimal::MAX - dec!(1)));
    assert_eq!(s.by_category.get("refund"), Some(dec!(-1)));
    assert_eq!(s.total(), Decimal::MAX - dec!(1));
}

#[test]
fn test_compute_overflow_across_categories() {
    let entries = vec![
        row("2024-01-01", "", "a", "x", "79228162514264337593543950335"),
        row("2024-02-01", "", "b", "y", "79228162514264337593543950335"),
        row("2024-03-01", "", "c", "z", "-5"),
    ];
    let s = Summary::compute(&entries);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.by_category.get("b"), None);
    assert_eq!(s.total(), Decimal::MAX - dec!(5));
}

#[test]
fn test_compute_empty() {
    let s = Summary::compute(&[]);
    assert!(s.by_category.is_empty());
    assert!(s.by_month.is_empty());
    assert!(s.by_shop.is_empty());
    assert_eq!(s.total(), Decimal::ZERO);
}

#[test]
fn test_compute_exact_decimal_sum() {
    // 0.1 added ten times must be exactly 1
    let entries: Vec<Entry> = (0..10)
        .map(|_| row("2024-01-01", "", "a", "x", "0.1"))
        .collect();
    let s = Summary::compute(&entries);
    assert_eq!(s.by_category.get("a"), Some(dec!(1)));
}

#[test]
fn test_compute_negative_amounts() {
    let entries = vec![
        row("2024-01-01", "", "a", "x", "10"),
        row("2024-01-02", "", "a", "refund", "-2.50"),
    ];
    let s = Summary::compute(&entries);
    assert_eq!(s.by_category.get("a"), Some(dec!(7.50)));
}

// ── rollup_categories ─────────────────────────────────────────

#[test]
fn test_rollup_seven_categories() {
    let input = totals(&[
        ("c1", dec!(1)),
        ("c2", dec!(2)),
        ("c3", dec!(3)),
        ("c4", dec!(4)),
        ("c5", dec!(5)),
        ("c6", dec!(6)),
        ("c7", dec!(7)),
    ]);
    let rolled = rollup_categories(&input);
    assert_eq!(
        rolled,
        totals(&[
            ("c7", dec!(7)),
            ("c6", dec!(6)),
            ("c5", dec!(5)),
            ("c4", dec!(4)),
            (OTHER_LABEL, dec!(6)),
        ])
    );
    assert_eq!(rolled.sum(), input.sum());
}

#[test]
fn test_rollup_six_or_fewer_unchanged() {
    let input = totals(&[
        ("c1", dec!(1)),
        ("c2", dec!(2)),
        ("c3", dec!(3)),
        ("c4", dec!(4)),
        ("c5", dec!(5)),
        ("c6", dec!(6)),
    ]);
    assert_eq!(rollup_categories(&input), input);
}

#[test]
fn test_rollup_ties_keep_scan_order() {
    let input = totals(&[
        ("a", dec!(5)),
        ("b", dec!(5)),
        ("c", dec!(5)),
        ("d", dec!(5)),
        ("e", dec!(5)),
        ("f", dec!(1)),
        ("g", dec!(9)),
    ]);
    let rolled = rollup_categories(&input);
    let keys: Vec<&str> = rolled.items().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["g", "a", "b", "c", OTHER_LABEL]);
    assert_eq!(rolled.get(OTHER_LABEL), Some(dec!(6)));
}

#[test]
fn test_rollup_keeps_real_other_separate() {
    let input = totals(&[
        (OTHER_LABEL, dec!(50)),
        ("c1", dec!(1)),
        ("c2", dec!(2)),
        ("c3", dec!(3)),
        ("c4", dec!(40)),
        ("c5", dec!(30)),
        ("c6", dec!(20)),
    ]);
    let rolled = rollup_categories(&input);
    assert_eq!(
        rolled.items(),
        &[
            (OTHER_LABEL.to_string(), dec!(50)),
            ("c4".to_string(), dec!(40)),
            ("c5".to_string(), dec!(30)),
            ("c6".to_string(), dec!(20)),
            (OTHER_LABEL.to_string(), dec!(6)),
        ]
    );
    assert_eq!(rolled.sum(), input.sum());
}

#[test]
fn test_rollup_overflowing_rest_is_left_alone() {
    let input = totals(&[
        ("c1", Decimal::MAX),
        ("c2", Decimal::MAX),
        ("c3", Decimal::MAX),
        ("c4", Decimal::MAX),
        ("c5", Decimal::MAX),
        ("c6", Decimal::MAX),
        ("c7", Decimal::MAX),
    ]);
    assert_eq!(rollup_categories(&input), input);
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_totals_add_accumulates() {
    let mut t = Totals::default();
    t.add("x", dec!(1.25));
    t.add("y", dec!(2));
    t.add("x", dec!(0.75));
    assert_eq!(t.get("x"), Some(dec!(2.00)));
    assert_eq!(t.len(), 2);
    assert_eq!(t.sum(), Some(dec!(4)));
}

#[test]
fn test_totals_add_overflow_leaves_total() {
    let mut t = Totals::default();
    assert!(t.add("x", Decimal::MAX));
    assert!(!t.add("x", dec!(1)));
    assert_eq!(t.get("x"), Some(Decimal::MAX));
    assert!(t.add("y", dec!(1)));
    assert_eq!(t.sum(), None);
}
