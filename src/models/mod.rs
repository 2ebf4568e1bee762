mod category;
mod column;
mod entry;

pub use category::{category_suggestions, find_by_name, DEFAULT_CATEGORIES};
pub use column::{Column, ColumnType};
pub use entry::{Entry, EntryError, Validation, DATE_FORMAT};

#[cfg(test)]
mod tests;
