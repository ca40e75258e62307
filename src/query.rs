//! Interactive query surface: command parsing and report rendering.
//!
//! Two commands exist. `list all` prints every account and its balance;
//! `list <name>` prints every transaction touching the named account,
//! matched case-insensitively. Anything else is an invalid command: one
//! report line, no other effect. Rendering returns plain text lines so the
//! shell in `main` stays a thin print loop.

use crate::types::{Balances, Transaction};

/// A recognized operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `list all` — every account and its balance.
    ListAll,
    /// `list <name>` — every transaction touching the account. The name is
    /// kept verbatim for display; matching ignores case.
    ListAccount(String),
}

impl Command {
    /// Parses operator input. The `list` keyword and the `all` argument
    /// are matched case-insensitively; an account name keeps its case.
    /// Returns `None` for anything unrecognized.
    pub fn parse(input: &str) -> Option<Command> {
        let input = input.trim();
        let (keyword, rest) = input.split_once(char::is_whitespace)?;
        if !keyword.eq_ignore_ascii_case("list") {
            return None;
        }
        let rest = rest.trim();
        if rest.is_empty() {
            return None;
        }
        if rest.eq_ignore_ascii_case("all") {
            Some(Command::ListAll)
        } else {
            Some(Command::ListAccount(rest.to_string()))
        }
    }
}

/// One line per account, in the ledger's (name) order.
pub fn list_all(balances: &Balances) -> Vec<String> {
    balances
        .iter()
        .map(|(name, balance)| format!("{}, balance: {:.2}", name, balance.round_dp(2)))
        .collect()
}

/// Every transaction where `name` matches either endpoint, ignoring case,
/// in transaction-log order. An empty result is a normal outcome, not an
/// error; the caller reports it as a plain message.
pub fn list_account<'a>(transactions: &'a [Transaction], name: &str) -> Vec<&'a Transaction> {
    transactions.iter().filter(|tx| tx.involves(name)).collect()
}

/// Message for a `list <name>` query that matched nothing.
pub const NO_MATCH: &str = "No transactions found for that account.";

/// Message for unrecognized input.
pub const INVALID_COMMAND: &str = "Invalid command.";
