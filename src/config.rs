use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the ledger location.
pub(crate) const FILE_ENV: &str = "MICROACCOUNTING_FILE";
const FILE_NAME: &str = "Buchhaltung.csv";

/// Pull a global `--file <path>` out of the arguments.
pub(crate) fn split_file_flag(args: &[String]) -> Result<(Option<String>, Vec<String>)> {
    let mut file = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--file" || arg == "-f" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--file requires a path"))?;
            file = Some(value.clone());
        } else if let Some(value) = arg.strip_prefix("--file=") {
            file = Some(value.to_string());
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((file, rest))
}

/// Where the ledger lives: `--file`, then `$MICROACCOUNTING_FILE`, then the
/// per-user data directory.
pub(crate) fn ledger_path(flag: Option<&str>) -> Result<PathBuf> {
    resolve_ledger_path(flag, std::env::var_os(FILE_ENV), default_ledger_path)
}

fn resolve_ledger_path(
    flag: Option<&str>,
    env: Option<OsString>,
    default: impl FnOnce() -> Result<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = flag.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(shellexpand(path)));
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default()
}

fn default_ledger_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", "microaccounting")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(FILE_NAME))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
