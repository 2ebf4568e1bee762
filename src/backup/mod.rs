use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{path}_{timestamp}.bak`, next to the original.
pub(crate) fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!("_{timestamp}.bak"));
    PathBuf::from(name)
}

/// Copy `path` to a timestamped sibling before it gets overwritten.
/// Returns `None` when there is nothing to back up yet. Old backups are kept.
pub(crate) fn create_backup(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let target = backup_path(path, &timestamp);
    std::fs::copy(path, &target).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            path.display(),
            target.display()
        )
    })?;
    tracing::debug!(source = %path.display(), backup = %target.display(), "created backup");
    Ok(Some(target))
}

/// All backups of `path` found next to it, oldest first.
pub(crate) fn list_backups(path: &Path) -> Result<Vec<PathBuf>> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!("^{}_[0-9]{{8}}_[0-9]{{6}}\\.bak$", regex::escape(file_name));
    let re = Regex::new(&pattern).context("Failed to build backup name pattern")?;

    let mut backups = Vec::new();
    for dir_entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let dir_entry = dir_entry?;
        let name = dir_entry.file_name();
        if name.to_str().is_some_and(|n| re.is_match(n)) && dir_entry.path().is_file() {
            backups.push(dir_entry.path());
        }
    }
    // The timestamp sorts chronologically as text
    backups.sort();
    Ok(backups)
}
