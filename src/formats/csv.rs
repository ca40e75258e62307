//! Delimited-text (CSV) parser.
//!
//! The only format with per-record tolerance: a malformed line is dropped
//! with a diagnostic naming its 1-based line number, and the run carries
//! on with the survivors. The header line is discarded unconditionally and
//! never validated.
//!
//! Fields are read by literal comma splitting: quoting is disabled and
//! field content is taken as-is, without trimming.

use chrono::NaiveDate;
use log::{error, warn};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::ParseOutput;
use crate::types::{Diagnostic, Severity, Transaction};

/// Expected column order: date, from, to, narrative, amount.
const EXPECTED_FIELDS: usize = 5;

/// Parses delimited-text content into transactions, in file order.
///
/// This parser is total: it never fails the document as a whole. Records
/// with too few fields, an unparseable date, or an unparseable amount are
/// skipped with an error diagnostic; records with extra fields are read
/// from their first five fields with a warning diagnostic.
pub fn parse(content: &str) -> ParseOutput {
    let mut output = ParseOutput::default();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                // Unreachable with quoting off and valid UTF-8 input, but
                // the skip-and-continue policy applies all the same.
                let line = err.position().map(|p| p.line() as usize);
                let diagnostic = Diagnostic {
                    severity: Severity::Error,
                    line,
                    message: format!("unreadable record, skipping entry: {}", err),
                };
                error!("{}", diagnostic);
                output.diagnostics.push(diagnostic);
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();

        if record.len() < EXPECTED_FIELDS {
            let diagnostic =
                Diagnostic::error(line, "fewer entries than expected, skipping entry");
            error!("{}", diagnostic);
            output.diagnostics.push(diagnostic);
            continue;
        }
        if record.len() > EXPECTED_FIELDS {
            let diagnostic = Diagnostic::warning(
                line,
                "more entries than expected, tentatively reading entry anyway",
            );
            warn!("{}", diagnostic);
            output.diagnostics.push(diagnostic);
        }

        let date = match parse_date(&record[0]) {
            Some(date) => date,
            None => {
                let diagnostic =
                    Diagnostic::error(line, "improperly formatted date, skipping entry");
                error!("{}", diagnostic);
                output.diagnostics.push(diagnostic);
                continue;
            }
        };
        let amount = match Decimal::from_str(&record[4]) {
            Ok(amount) => amount,
            Err(_) => {
                let diagnostic =
                    Diagnostic::error(line, "improperly formatted amount, skipping entry");
                error!("{}", diagnostic);
                output.diagnostics.push(diagnostic);
                continue;
            }
        };

        output.transactions.push(Transaction {
            date,
            from_account: record[1].to_string(),
            to_account: record[2].to_string(),
            narrative: record[3].to_string(),
            amount,
        });
    }

    output
}

/// Day-first dates are the convention in the source data; ISO dates are
/// accepted as a fallback.
fn parse_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(field, "%Y-%m-%d"))
        .ok()
}
