use anyhow::Result;
use std::io::{self, BufRead, Write};

use super::commands::{handle_command, split_args, Session};
use crate::ledger::Ledger;

pub(crate) fn as_shell(ledger: &mut Ledger) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_shell(stdin.lock(), &mut stdout, ledger)
}

/// Read commands line by line until `quit` or end of input. Leaving with
/// unsaved changes asks first.
pub(crate) fn run_shell<R: BufRead, W: Write>(
    mut input: R,
    out: &mut W,
    ledger: &mut Ledger,
) -> Result<()> {
    writeln!(
        out,
        "{} entries in {}. Type 'help' for commands.",
        ledger.len(),
        ledger.path().display()
    )?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        let quit_requested = if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            true
        } else {
            let args = split_args(&line);
            match args.split_first() {
                Some((name, rest)) => {
                    let mut session = Session::new(ledger, out);
                    if let Err(e) = handle_command(name, rest, &mut session) {
                        writeln!(session.out, "Error: {e:#}")?;
                    }
                    !session.running
                }
                None => false,
            }
        };

        if quit_requested && confirm_quit(&mut input, out, ledger)? {
            break;
        }
    }
    Ok(())
}

/// `true` when the shell may exit.
fn confirm_quit<R: BufRead, W: Write>(input: &mut R, out: &mut W, ledger: &mut Ledger) -> Result<bool> {
    if !ledger.is_dirty() {
        return Ok(true);
    }

    loop {
        write!(out, "There are unsaved changes. Save before quitting? [y/n/c] ")?;
        out.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(out)?;
            writeln!(out, "No answer, changes not saved")?;
            tracing::warn!(path = %ledger.path().display(), "input closed with unsaved changes");
            return Ok(true);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" | "j" | "ja" => {
                return match ledger.save() {
                    Ok(()) => {
                        writeln!(out, "Saved to {}", ledger.path().display())?;
                        Ok(true)
                    }
                    Err(e) => {
                        writeln!(out, "Error: {e:#}")?;
                        Ok(false)
                    }
                };
            }
            "n" | "no" | "nein" => return Ok(true),
            "c" | "cancel" | "" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
