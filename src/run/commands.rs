use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::io::Write;
use std::sync::LazyLock;

use super::report::{render_summary, render_table};
use crate::backup::list_backups;
use crate::display::{cell_text, format_amount, parse_amount, selection_text};
use crate::ledger::Ledger;
use crate::models::{category_suggestions, find_by_name, Column, Entry, Validation, DATE_FORMAT};
use crate::summary::Summary;

/// What a command operates on: the ledger, where to print, and whether the
/// session should keep going.
pub(crate) struct Session<'a> {
    pub(crate) ledger: &'a mut Ledger,
    pub(crate) out: &'a mut dyn Write,
    pub(crate) running: bool,
}

impl<'a> Session<'a> {
    pub(crate) fn new(ledger: &'a mut Ledger, out: &'a mut dyn Write) -> Self {
        Self {
            ledger,
            out,
            running: true,
        }
    }
}

pub(crate) struct Command {
    pub(crate) usage: &'static str,
    pub(crate) description: &'static str,
    pub(crate) run: fn(&[String], &mut Session) -> Result<()>,
}

macro_rules! register_command {
    ($name:expr, $usage:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                usage: $usage,
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("list", "list", "Show all entries", cmd_list, r);
    register_command!("ls", "ls", "Show all entries", cmd_list, r);
    register_command!(
        "add",
        "add --amount <a> --description <d> [--date] [--shop] [--category]",
        "Add an entry (date defaults to today)",
        cmd_add,
        r
    );
    register_command!(
        "set",
        "set <row> <column> <value>",
        "Edit one cell (e.g. set 3 Betrag 12,50)",
        cmd_set,
        r
    );
    register_command!(
        "summary",
        "summary [--rollup]",
        "Totals by category, month and shop",
        cmd_summary,
        r
    );
    register_command!("s", "s [--rollup]", "Totals by category, month and shop", cmd_summary, r);
    register_command!(
        "categories",
        "categories [--all]",
        "Categories in use (--all adds the defaults)",
        cmd_categories,
        r
    );
    register_command!("shops", "shops", "Shops in use", cmd_shops, r);
    register_command!("backups", "backups", "List backups of the ledger file", cmd_backups, r);
    register_command!(
        "copy",
        "copy <row>[-<row>]",
        "Print rows tab-separated for pasting",
        cmd_copy,
        r
    );
    register_command!(
        "save",
        "save [path]",
        "Save (backing up the old file); a path becomes the new ledger file",
        cmd_save,
        r
    );
    register_command!(
        "w",
        "w [path]",
        "Save (backing up the old file); a path becomes the new ledger file",
        cmd_save,
        r
    );
    register_command!("reload", "reload", "Discard unsaved changes and re-read the file", cmd_reload, r);
    register_command!("help", "help", "Show available commands", cmd_help, r);
    register_command!("h", "h", "Show available commands", cmd_help, r);
    register_command!("quit", "quit", "Leave the shell", cmd_quit, r);
    register_command!("q", "q", "Leave the shell", cmd_quit, r);

    r
});

/// Run one command by name. Unknown names get a suggestion.
pub(crate) fn handle_command(name: &str, args: &[String], session: &mut Session) -> Result<()> {
    match COMMANDS.get(name) {
        Some(cmd) => (cmd.run)(args, session),
        None => {
            let suggestion = find_closest(name);
            anyhow::bail!("Unknown command: {name}. Did you mean {suggestion}?")
        }
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split a shell line into arguments, honouring double quotes.
pub(crate) fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Accepts the file format and the display format.
fn parse_date_input(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .with_context(|| format!("Could not parse date: {s}"))
}

/// 1-based row number from the user to a 0-based index.
fn parse_row(s: &str, ledger: &Ledger) -> Result<usize> {
    let n: usize = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid row number: {s}"))?;
    if n == 0 || n > ledger.len() {
        anyhow::bail!("Row {n} out of range (1-{})", ledger.len());
    }
    Ok(n - 1)
}

/// Column by key, label or 1-based position.
fn parse_column(s: &str) -> Result<Column> {
    Column::parse(s)
        .or_else(|| {
            s.trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(Column::from_index)
        })
        .ok_or_else(|| {
            let names: Vec<&str> = Column::all().iter().map(|c| c.label()).collect();
            anyhow::anyhow!("Unknown column '{s}'. Columns: {}", names.join(", "))
        })
}

/// Normalize a cell edit the way the editors do: dates and amounts are
/// stored in their canonical text form.
fn normalize_cell(column: Column, value: &str) -> Result<String> {
    match column {
        Column::Date => Ok(parse_date_input(value)?.format(DATE_FORMAT).to_string()),
        Column::Value => Ok(parse_amount(value)?.to_string()),
        Column::Category | Column::Shop | Column::Description => Ok(value.trim().to_string()),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_list(_args: &[String], s: &mut Session) -> Result<()> {
    write!(s.out, "{}", render_table(s.ledger))?;
    Ok(())
}

fn cmd_add(args: &[String], s: &mut Session) -> Result<()> {
    let date = match flag_value(args, "--date") {
        Some(d) => parse_date_input(d)?,
        None => Local::now().date_naive(),
    };
    let amount = parse_amount(flag_value(args, "--amount").unwrap_or(""))?;
    let description = flag_value(args, "--description").unwrap_or("").trim().to_string();
    let shop = flag_value(args, "--shop").unwrap_or("").trim().to_string();

    // Reuse the existing spelling of a known category
    let suggestions = category_suggestions(&s.ledger.used_categories());
    let category_input = flag_value(args, "--category").unwrap_or("").trim();
    let category = find_by_name(&suggestions, category_input)
        .unwrap_or(category_input)
        .to_string();

    let entry = Entry::new(date, category, shop, description, amount);
    match entry.validate()? {
        Validation::Discard => {
            writeln!(s.out, "Nothing to add")?;
        }
        Validation::Accept => {
            writeln!(
                s.out,
                "Added {} {} {}",
                cell_text(&entry, Column::Date),
                entry.description,
                format_amount(amount)
            )?;
            s.ledger.insert(entry);
        }
    }
    Ok(())
}

fn cmd_set(args: &[String], s: &mut Session) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: set <row> <column> <value>");
    }
    let row = parse_row(&args[0], s.ledger)?;
    let column = parse_column(&args[1])?;
    let value = normalize_cell(column, &args[2..].join(" "))?;
    let previous = s.ledger.get(row, column).unwrap_or_default().to_string();

    if s.ledger.set(row, column, value)? {
        writeln!(s.out, "Row {}: {} updated (was '{previous}')", row + 1, column)?;
    } else {
        writeln!(s.out, "Row {}: {} unchanged", row + 1, column)?;
    }
    Ok(())
}

fn cmd_summary(args: &[String], s: &mut Session) -> Result<()> {
    let summary = Summary::compute(s.ledger.entries());
    write!(s.out, "{}", render_summary(&summary, has_flag(args, "--rollup")))?;
    Ok(())
}

fn cmd_categories(args: &[String], s: &mut Session) -> Result<()> {
    let used = s.ledger.used_categories();
    let names: Vec<String> = if has_flag(args, "--all") {
        category_suggestions(&used)
    } else {
        used.into_iter().collect()
    };
    for name in names {
        writeln!(s.out, "{name}")?;
    }
    Ok(())
}

fn cmd_shops(_args: &[String], s: &mut Session) -> Result<()> {
    for name in s.ledger.used_shops() {
        writeln!(s.out, "{name}")?;
    }
    Ok(())
}

fn cmd_backups(_args: &[String], s: &mut Session) -> Result<()> {
    let backups = list_backups(s.ledger.path())?;
    if backups.is_empty() {
        writeln!(s.out, "No backups of {}", s.ledger.path().display())?;
    }
    for path in backups {
        writeln!(s.out, "{}", path.display())?;
    }
    Ok(())
}

fn cmd_copy(args: &[String], s: &mut Session) -> Result<()> {
    let spec = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: copy <row>[-<row>]"))?;
    let (from, to) = match spec.split_once('-') {
        Some((a, b)) => (parse_row(a, s.ledger)?, parse_row(b, s.ledger)?),
        None => {
            let r = parse_row(spec, s.ledger)?;
            (r, r)
        }
    };
    let (from, to) = if from <= to { (from, to) } else { (to, from) };

    let cells: Vec<(usize, Column)> = (from..=to)
        .flat_map(|row| Column::all().iter().map(move |c| (row, *c)))
        .collect();
    writeln!(s.out, "{}", selection_text(s.ledger, &cells))?;
    Ok(())
}

fn cmd_save(args: &[String], s: &mut Session) -> Result<()> {
    match args.first() {
        Some(path) => {
            let path = std::path::PathBuf::from(crate::config::shellexpand(path));
            s.ledger.save_as(&path)?;
            writeln!(s.out, "Saved {} entries to {}", s.ledger.len(), path.display())?;
        }
        None => {
            s.ledger.save()?;
            writeln!(
                s.out,
                "Saved {} entries to {}",
                s.ledger.len(),
                s.ledger.path().display()
            )?;
        }
    }
    Ok(())
}

fn cmd_reload(_args: &[String], s: &mut Session) -> Result<()> {
    s.ledger.reload()?;
    writeln!(s.out, "Reloaded {} entries", s.ledger.len())?;
    Ok(())
}

fn cmd_help(_args: &[String], s: &mut Session) -> Result<()> {
    let mut cmds: Vec<(&&str, &Command)> = COMMANDS
        .iter()
        .filter(|(k, _)| k.len() > 2) // aliases share their long form's line
        .collect();
    cmds.sort_by_key(|(k, _)| **k);
    writeln!(s.out, "Commands:")?;
    for (_, cmd) in cmds {
        writeln!(s.out, "  {:<70} {}", cmd.usage, cmd.description)?;
    }
    Ok(())
}

fn cmd_quit(_args: &[String], s: &mut Session) -> Result<()> {
    s.running = false;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
