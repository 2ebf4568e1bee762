use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::Column;

/// On-disk and in-memory date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One ledger row. Fields are kept as text exactly as read or written so that
/// amounts never pass through a float; typed views parse on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub date: String,
    pub category: String,
    pub shop: String,
    pub description: String,
    pub amount: String,
}

/// Result of checking a new entry before it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Accept,
    /// Nothing was filled in; the entry should be dropped silently.
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("Amount must not be zero")]
    ZeroAmount,
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),
}

impl Entry {
    pub fn new(
        date: NaiveDate,
        category: String,
        shop: String,
        description: String,
        amount: Decimal,
    ) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            category,
            shop,
            description,
            amount: amount.to_string(),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Date => &self.date,
            Column::Category => &self.category,
            Column::Shop => &self.shop,
            Column::Description => &self.description,
            Column::Value => &self.amount,
        }
    }

    /// Replace one field. Returns `false` if the value was already equal.
    pub fn set(&mut self, column: Column, value: String) -> bool {
        let field = match column {
            Column::Date => &mut self.date,
            Column::Category => &mut self.category,
            Column::Shop => &mut self.shop,
            Column::Description => &mut self.description,
            Column::Value => &mut self.amount,
        };
        if *field == value {
            return false;
        }
        *field = value;
        true
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn parsed_amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }

    /// Checks applied before an entry is added from user input.
    pub fn validate(&self) -> Result<Validation, EntryError> {
        let amount = self
            .parsed_amount()
            .ok_or_else(|| EntryError::InvalidAmount(self.amount.clone()))?;
        let description = self.description.trim();

        if amount.is_zero() && description.is_empty() && self.shop.trim().is_empty() {
            return Ok(Validation::Discard);
        }
        if amount.is_zero() {
            return Err(EntryError::ZeroAmount);
        }
        if description.is_empty() {
            return Err(EntryError::EmptyDescription);
        }
        if self.parsed_date().is_none() {
            return Err(EntryError::InvalidDate(self.date.clone()));
        }
        Ok(Validation::Accept)
    }
}
