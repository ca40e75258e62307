//! Core data types for transaction ingestion and reconciliation.
//!
//! This module defines the types shared by every stage of the pipeline:
//! the normalized [`Transaction`] record that all format parsers produce,
//! the [`Diagnostic`] record for non-fatal per-record observations, the
//! [`ParseError`] taxonomy for fatal ingestion failures, and type aliases
//! for domain-specific values.
//!
//! # Type Aliases
//!
//! - [`Amount`]: Type alias for monetary amounts (Decimal)
//! - [`Balances`]: Type alias for the derived account-balance map
//!   (BTreeMap<String, Decimal>)
//!
//! # Core Types
//!
//! - [`Transaction`]: One money movement between two named accounts
//! - [`Diagnostic`]: A reported, non-fatal observation about a skipped or
//!   unusual input record
//! - [`ParseError`]: Fatal ingestion failures (unsupported suffix,
//!   unsalvageable document)
//!
//! # Examples
//!
//! Creating a transaction:
//! ```
//! use bank_ledger::types::Transaction;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let tx = Transaction {
//!     date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
//!     from_account: "Alice".to_string(),
//!     to_account: "Bob".to_string(),
//!     narrative: "lunch".to_string(),
//!     amount: Decimal::from_str("10.00").unwrap(),
//! };
//! assert!(tx.involves("ALICE"));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::error;
use std::fmt;

pub type Amount = Decimal;

/// Derived per-account balances, keyed by the account's stored
/// (case-sensitive) name.
pub type Balances = BTreeMap<String, Amount>;

/// One money movement between two named accounts.
///
/// Every format parser normalizes its records into this shape; once
/// constructed a transaction is never mutated and carries no trace of the
/// file format it came from.
///
/// # Fields
///
/// - `date`: Calendar date of the movement (no time-of-day)
/// - `from_account`: Account the amount is debited from
/// - `to_account`: Account the amount is credited to
/// - `narrative`: Free-text description, unvalidated
/// - `amount`: Signed decimal amount, conventionally positive in source data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub from_account: String,
    pub to_account: String,
    pub narrative: String,
    pub amount: Amount,
}

impl Transaction {
    /// Returns true if `name` matches either endpoint, ignoring ASCII case.
    ///
    /// Account names are stored case-sensitively but looked up
    /// case-insensitively; this is the single place that rule lives.
    pub fn involves(&self, name: &str) -> bool {
        self.from_account.eq_ignore_ascii_case(name)
            || self.to_account.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, from: {}, to: {}, narrative: {}, amount: {:.2}",
            self.date.format("%d/%m/%Y"),
            self.from_account,
            self.to_account,
            self.narrative,
            self.amount.round_dp(2),
        )
    }
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The record was still read, but looked unusual.
    Warning,
    /// The record was dropped.
    Error,
}

/// A reported, non-fatal observation about a skipped or unusual input
/// record.
///
/// Diagnostics are accumulated by the parsers and surfaced to the operator
/// after ingestion; each one is also mirrored into the log at the matching
/// level by the parser that produced it. A malformed delimited-text record
/// becomes a diagnostic, not an error: the run continues without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based line number in the source file, where the format has one.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.line {
            Some(line) => write!(f, "{}: line {}: {}", label, line, self.message),
            None => write!(f, "{}: {}", label, self.message),
        }
    }
}

/// Fatal ingestion failures.
///
/// Per-record problems in the delimited-text format never reach this type;
/// they are recovered locally as [`Diagnostic`]s. This enum covers the
/// conditions that abort ingestion for a file as a whole.
#[derive(Debug)]
pub enum ParseError {
    /// The file name's suffix matched no known format; no transactions are
    /// produced.
    UnsupportedFormat(String),
    /// An object-notation or markup document could not be parsed as a
    /// whole. No partial ledger is built from a half-parsed document.
    MalformedDocument {
        format: &'static str,
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnsupportedFormat(name) => {
                write!(f, "file {} is not in a readable format", name)
            }
            ParseError::MalformedDocument { format, message } => {
                write!(f, "malformed {} document: {}", format, message)
            }
        }
    }
}

impl error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display_uses_two_decimal_places_and_day_first_date() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap(),
            from_account: "Alice".to_string(),
            to_account: "Bob".to_string(),
            narrative: "rent".to_string(),
            amount: Decimal::from_str("5").unwrap(),
        };
        assert_eq!(
            tx.to_string(),
            "Date: 02/01/2015, from: Alice, to: Bob, narrative: rent, amount: 5.00"
        );
    }

    #[test]
    fn involves_ignores_case_on_both_endpoints() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            from_account: "Alice".to_string(),
            to_account: "Bob".to_string(),
            narrative: "lunch".to_string(),
            amount: Decimal::from_str("10.00").unwrap(),
        };
        assert!(tx.involves("alice"));
        assert!(tx.involves("BOB"));
        assert!(!tx.involves("Carol"));
    }

    #[test]
    fn diagnostic_display_names_the_line() {
        let d = Diagnostic::error(4, "improperly formatted amount");
        assert_eq!(d.to_string(), "error: line 4: improperly formatted amount");
    }

    #[test]
    fn unsupported_format_names_the_file() {
        let err = ParseError::UnsupportedFormat("notes.txt".to_string());
        assert_eq!(err.to_string(), "file notes.txt is not in a readable format");
    }
}
