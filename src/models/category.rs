use std::collections::BTreeSet;

/// Categories offered even before the ledger contains any.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Lebensmittel",
    "Gastronomie",
    "Anschaffungen",
    "Geschenk",
    "Anderes",
];

/// Defaults merged with the categories already in use, sorted.
pub fn category_suggestions(used: &BTreeSet<String>) -> Vec<String> {
    let mut all: BTreeSet<String> = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
    all.extend(used.iter().cloned());
    all.into_iter().collect()
}

/// Find an existing spelling of `name` (case-insensitive) among suggestions.
pub fn find_by_name<'a>(candidates: &'a [String], name: &str) -> Option<&'a str> {
    let lower = name.trim().to_lowercase();
    candidates
        .iter()
        .find(|c| c.to_lowercase() == lower)
        .map(|c| c.as_str())
}
