//! Transaction ledger application.
//!
//! This program ingests one transaction file (`.csv`, `.json`, or `.xml`),
//! reconciles it into per-account balances, and answers interactive
//! queries against the resulting in-memory ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv
//! ```
//!
//! Then, at the prompt:
//!
//! - `list all` — print every account and its balance
//! - `list <name>` — print every transaction touching the account,
//!   matched case-insensitively
//! - `quit` / `exit` (or end of input) — leave the session
//!
//! Malformed delimited-text records are reported and skipped; an
//! unsupported file suffix or an unsalvageable document aborts the run.
//! Log output goes to stderr and is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use bank_ledger::query::{self, Command};
use bank_ledger::types::{Balances, Transaction};
use bank_ledger::{formats, ledger};

fn main() -> Result<()> {
    env_logger::init();
    debug!("program started");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        anyhow::bail!("Missing input file!");
    }
    let file_name = &args[1];

    let content = fs::read_to_string(file_name)
        .with_context(|| format!("Failed to read file: {}", file_name))?;
    let output = formats::parse(file_name, &content)
        .with_context(|| format!("Failed to ingest file: {}", file_name))?;

    for diagnostic in &output.diagnostics {
        println!("{}", diagnostic);
    }
    debug!(
        "ingested {} transactions with {} diagnostics",
        output.transactions.len(),
        output.diagnostics.len()
    );

    let balances = ledger::build(&output.transactions);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter command: ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let line = match lines.next() {
            Some(line) => line.context("Failed to read command")?,
            None => break,
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        answer(input, &output.transactions, &balances);
    }

    debug!("closing program");
    Ok(())
}

/// Answers one line of operator input.
fn answer(input: &str, transactions: &[Transaction], balances: &Balances) {
    match Command::parse(input) {
        Some(Command::ListAll) => {
            debug!("listing all accounts");
            for line in query::list_all(balances) {
                println!("{}", line);
            }
        }
        Some(Command::ListAccount(name)) => {
            debug!("looking for transactions matching {}", name);
            let matches = query::list_account(transactions, &name);
            if matches.is_empty() {
                println!("{}", query::NO_MATCH);
            } else {
                for tx in matches {
                    println!("{}", tx);
                }
            }
        }
        None => {
            warn!("operator entered invalid input: {:?}", input);
            println!("{}", query::INVALID_COMMAND);
        }
    }
}
