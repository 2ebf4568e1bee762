use rust_decimal::Decimal;

use crate::models::Entry;

/// Label of the merged bucket produced by [`rollup_categories`].
pub(crate) const OTHER_LABEL: &str = "Other";

/// Rollup only kicks in above this many categories.
const ROLLUP_THRESHOLD: usize = 6;
/// Categories that keep their own bucket in a rollup.
const ROLLUP_KEEP: usize = 4;

/// Key -> running total, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    items: Vec<(String, Decimal)>,
}

impl Totals {
    /// Add `amount` to `key`. On overflow nothing changes and `false` is returned.
    pub(crate) fn add(&mut self, key: &str, amount: Decimal) -> bool {
        let Some(total) = self.added(key, amount) else {
            return false;
        };
        match self.items.iter_mut().find(|(k, _)| k == key) {
            Some((_, current)) => *current = total,
            None => self.items.push((key.to_string(), total)),
        }
        true
    }

    /// What `key` would total after adding `amount`, `None` on overflow.
    fn added(&self, key: &str, amount: Decimal) -> Option<Decimal> {
        match self.items.iter().find(|(k, _)| k == key) {
            Some((_, current)) => current.checked_add(amount),
            None => Some(amount),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<Decimal> {
        self.items.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub(crate) fn items(&self) -> &[(String, Decimal)] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` if the grand total does not fit a `Decimal`.
    pub(crate) fn sum(&self) -> Option<Decimal> {
        checked_sum(self.items.iter().map(|(_, v)| *v))
    }
}

impl FromIterator<(String, Decimal)> for Totals {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for (k, v) in iter {
            if !totals.add(&k, v) {
                tracing::warn!(key = %k, "total overflowed, amount left out");
            }
        }
        totals
    }
}

/// Everything the charts need, recomputed from scratch after each change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) by_category: Totals,
    pub(crate) by_month: Totals,
    pub(crate) by_shop: Totals,
    /// Rows left out because their date or amount did not parse, or their
    /// amount would overflow a total.
    pub(crate) skipped: usize,
    total: Decimal,
}

impl Summary {
    /// One pass over the rows. A row with a bad date or amount is dropped from
    /// all three totals; it never fails the whole pass. The same goes for a row
    /// whose amount would overflow any total it lands in.
    pub(crate) fn compute(entries: &[Entry]) -> Self {
        let mut summary = Summary::default();

        for (row, entry) in entries.iter().enumerate() {
            let Some(date) = entry.parsed_date() else {
                tracing::warn!(row = row + 1, date = %entry.date, "skipping row with invalid date");
                summary.skipped += 1;
                continue;
            };
            let Some(amount) = entry.parsed_amount() else {
                tracing::warn!(row = row + 1, amount = %entry.amount, "skipping row with invalid amount");
                summary.skipped += 1;
                continue;
            };

            let month = date.format("%b %Y").to_string();
            let has_shop = !entry.shop.is_empty();
            let total = summary.total.checked_add(amount).filter(|_| {
                summary.by_category.added(&entry.category, amount).is_some()
                    && summary.by_month.added(&month, amount).is_some()
                    && (!has_shop || summary.by_shop.added(&entry.shop, amount).is_some())
            });
            let Some(total) = total else {
                tracing::warn!(row = row + 1, amount = %entry.amount, "skipping row, total would overflow");
                summary.skipped += 1;
                continue;
            };

            summary.total = total;
            summary.by_category.add(&entry.category, amount);
            summary.by_month.add(&month, amount);
            if has_shop {
                summary.by_shop.add(&entry.shop, amount);
            }
        }

        summary
    }

    /// Sum over all counted rows.
    pub(crate) fn total(&self) -> Decimal {
        self.total
    }
}

/// Collapse a long category list for a pie chart: above six categories, keep
/// the four largest and merge the rest into one [`OTHER_LABEL`] bucket.
/// The bucket is always appended as its own item, even when a real category
/// of the same name is among the kept ones. If the rest does not fit a
/// `Decimal`, the list is returned unchanged.
pub(crate) fn rollup_categories(totals: &Totals) -> Totals {
    if totals.len() <= ROLLUP_THRESHOLD {
        return totals.clone();
    }

    let mut sorted: Vec<&(String, Decimal)> = totals.items().iter().collect();
    // sort_by is stable: ties keep their scan order
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut rolled: Totals = sorted
        .iter()
        .take(ROLLUP_KEEP)
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    let Some(rest) = checked_sum(sorted.iter().skip(ROLLUP_KEEP).map(|(_, v)| *v)) else {
        tracing::warn!("category remainder overflowed, not rolling up");
        return totals.clone();
    };
    rolled.items.push((OTHER_LABEL.to_string(), rest));
    rolled
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

#[cfg(test)]
mod tests;
