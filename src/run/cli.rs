use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use super::commands::{handle_command, Session};
use crate::ledger::Ledger;

pub(crate) fn as_cli(args: &[String], path: &Path) -> Result<()> {
    let (name, rest) = match args.split_first() {
        Some((name, rest)) => (name.as_str(), rest),
        None => ("list", &[][..]),
    };

    match name {
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("microaccounting {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "shell" => {
            let mut ledger = Ledger::load(path)?;
            super::as_shell(&mut ledger)
        }
        _ => {
            let mut ledger = Ledger::load(path)?;
            let mut stdout = io::stdout();
            run_once(name, rest, &mut ledger, &mut stdout)
        }
    }
}

/// Run a single command; whatever it changed is saved right away.
pub(crate) fn run_once<W: Write>(
    name: &str,
    args: &[String],
    ledger: &mut Ledger,
    out: &mut W,
) -> Result<()> {
    let mut session = Session::new(ledger, out);
    handle_command(name, args, &mut session)?;

    if session.ledger.is_dirty() {
        session.ledger.save()?;
        writeln!(session.out, "Saved to {}", session.ledger.path().display())?;
    }
    Ok(())
}

fn print_usage() {
    println!("MicroAccounting — expense ledger");
    println!();
    println!("Usage: microaccounting [--file <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none), list                  Show all entries");
    println!("  add                           Add an entry");
    println!("    --amount <12,50>            Amount (required)");
    println!("    --description <text>        Description (required)");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --shop <name>               Shop");
    println!("    --category <name>           Category");
    println!("  set <row> <column> <value>    Edit one cell (e.g. set 3 Betrag 12,50)");
    println!("  summary [--rollup]            Totals by category, month and shop");
    println!("  categories [--all]            Categories in use");
    println!("  shops                         Shops in use");
    println!("  backups                       List backups of the ledger file");
    println!("  copy <row>[-<row>]            Print rows tab-separated");
    println!("  shell                         Interactive session");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!(
        "The ledger defaults to the user data directory; set ${} or --file to override.",
        crate::config::FILE_ENV
    );
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
