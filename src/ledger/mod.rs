use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::backup;
use crate::models::{Column, Entry};

/// The in-memory expense table, bound to the file it was loaded from.
#[derive(Debug)]
pub(crate) struct Ledger {
    path: PathBuf,
    entries: Vec<Entry>,
    dirty: bool,
}

impl Ledger {
    /// Load `path`, or start an empty ledger if the file does not exist yet.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let entries = read_entries(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        })
    }

    /// Re-read the bound file, discarding unsaved edits.
    pub(crate) fn reload(&mut self) -> Result<()> {
        self.entries = read_entries(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn row(&self, row: usize) -> Option<&Entry> {
        self.entries.get(row)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn get(&self, row: usize, column: Column) -> Option<&str> {
        self.entries.get(row).map(|e| e.get(column))
    }

    /// Edit one cell. Returns whether anything changed; writing the current
    /// value again leaves the dirty flag alone. Row order is not touched.
    pub(crate) fn set(&mut self, row: usize, column: Column, value: String) -> Result<bool> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(row).ok_or_else(|| {
            let shown = row.saturating_add(1);
            anyhow::anyhow!("Row {shown} out of range (ledger has {len} rows)")
        })?;
        let changed = entry.set(column, value);
        if changed {
            self.dirty = true;
        }
        Ok(changed)
    }

    /// Append an entry and re-sort by date. Duplicates are kept.
    pub(crate) fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
        // Stable: entries with equal dates keep their relative order
        self.entries.sort_by(|a, b| a.date.cmp(&b.date));
        self.dirty = true;
    }

    /// Save to the bound file.
    pub(crate) fn save(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.save_as(&path)
    }

    /// Back up whatever is at `path`, then overwrite it with the full table.
    /// Once the write succeeded the ledger is bound to `path` and clean;
    /// on failure both stay as they were.
    pub(crate) fn save_as(&mut self, path: &Path) -> Result<()> {
        if let Some(backup) = backup::create_backup(path)? {
            tracing::info!(backup = %backup.display(), "backed up ledger");
        }
        write_entries(path, &self.entries)?;
        self.dirty = false;
        tracing::info!(path = %path.display(), rows = self.entries.len(), "saved ledger");
        if path != self.path {
            tracing::info!(from = %self.path.display(), to = %path.display(), "ledger rebound");
            self.path = path.to_path_buf();
        }
        Ok(())
    }

    pub(crate) fn used_categories(&self) -> BTreeSet<String> {
        self.distinct(Column::Category)
    }

    pub(crate) fn used_shops(&self) -> BTreeSet<String> {
        self.distinct(Column::Shop)
    }

    fn distinct(&self, column: Column) -> BTreeSet<String> {
        self.entries
            .iter()
            .map(|e| e.get(column))
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.to_string())
            .collect()
    }
}

fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    if !path.is_file() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        tracing::info!(path = %path.display(), "no ledger file yet, starting empty");
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open ledger: {}", path.display()))?;

    let headers = rdr
        .headers()
        .context("Failed to read ledger header")?
        .clone();
    let layout = map_header(headers.iter());

    let mut entries = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read ledger row {}", i + 1))?;
        let mut entry = Entry::default();
        for (idx, column) in &layout {
            let value = record.get(*idx).unwrap_or_default();
            entry.set(*column, value.to_string());
        }
        entries.push(entry);
    }

    tracing::info!(path = %path.display(), rows = entries.len(), "loaded ledger");
    Ok(entries)
}

/// Map file header positions to columns. Unknown headers are dropped; a column
/// missing from the header simply loads as empty text.
fn map_header<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<(usize, Column)> {
    let mut layout: Vec<(usize, Column)> = Vec::new();
    for (idx, name) in headers.enumerate() {
        match Column::parse(name) {
            Some(column) if !layout.iter().any(|(_, c)| *c == column) => {
                layout.push((idx, column));
            }
            Some(column) => {
                tracing::warn!(header = name, %column, "duplicate ledger column ignored");
            }
            None => {
                tracing::warn!(header = name, "unknown ledger column dropped");
            }
        }
    }
    layout
}

fn write_entries(path: &Path, entries: &[Entry]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open ledger for writing: {}", path.display()))?;

    wtr.write_record(Column::all().iter().map(|c| c.key()))
        .context("Failed to write ledger header")?;
    for entry in entries {
        wtr.write_record(Column::all().iter().map(|c| entry.get(*c)))
            .context("Failed to write ledger row")?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write ledger: {}", path.display()))?;
    Ok(())
}
