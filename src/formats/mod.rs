//! Multi-format ingestion: format selection and the parsers behind it.
//!
//! Three on-disk formats are supported, each normalized into the same
//! [`Transaction`] shape:
//!
//! - delimited text (`.csv`) — line-tolerant, malformed records are
//!   skipped with a diagnostic ([`csv`])
//! - object notation (`.json`) — whole-document, all-or-nothing ([`json`])
//! - markup (`.xml`) — positional traversal, whole-document ([`xml`])
//!
//! Selection is by file-name suffix only; the dispatcher never inspects
//! content. That is a known limitation, kept deliberately.

use log::debug;

use crate::types::{Diagnostic, ParseError, Transaction};

pub mod csv;
pub mod json;
pub mod xml;

/// The closed set of supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Xml,
}

impl Format {
    /// Selects a format from a file name's suffix.
    ///
    /// The match is case-sensitive: `.CSV` is not `.csv`. Returns `None`
    /// for any unrecognized suffix.
    pub fn from_file_name(file_name: &str) -> Option<Format> {
        if file_name.ends_with(".csv") {
            Some(Format::Csv)
        } else if file_name.ends_with(".json") {
            Some(Format::Json)
        } else if file_name.ends_with(".xml") {
            Some(Format::Xml)
        } else {
            None
        }
    }
}

/// The result of parsing one input file: the normalized transactions in
/// source order, plus any non-fatal diagnostics raised along the way.
///
/// Only the delimited-text parser produces diagnostics today; the other
/// two formats fail whole-document instead.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub transactions: Vec<Transaction>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    fn clean(transactions: Vec<Transaction>) -> Self {
        ParseOutput {
            transactions,
            diagnostics: Vec::new(),
        }
    }
}

/// Parses `content` with the parser selected by `file_name`'s suffix.
///
/// # Errors
///
/// - [`ParseError::UnsupportedFormat`] if the suffix matches no known
///   format; no transactions are produced.
/// - [`ParseError::MalformedDocument`] if an object-notation or markup
///   document cannot be parsed as a whole.
///
/// Malformed records in the delimited-text format are not errors: they are
/// dropped and reported through [`ParseOutput::diagnostics`].
pub fn parse(file_name: &str, content: &str) -> Result<ParseOutput, ParseError> {
    match Format::from_file_name(file_name) {
        Some(Format::Csv) => {
            debug!("{} detected as delimited text", file_name);
            Ok(csv::parse(content))
        }
        Some(Format::Json) => {
            debug!("{} detected as object notation", file_name);
            json::parse(content).map(ParseOutput::clean)
        }
        Some(Format::Xml) => {
            debug!("{} detected as markup", file_name);
            xml::parse(content).map(ParseOutput::clean)
        }
        None => Err(ParseError::UnsupportedFormat(file_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn suffix_selects_the_format() {
        assert_eq!(Format::from_file_name("t.csv"), Some(Format::Csv));
        assert_eq!(Format::from_file_name("t.json"), Some(Format::Json));
        assert_eq!(Format::from_file_name("t.xml"), Some(Format::Xml));
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert_eq!(Format::from_file_name("t.CSV"), None);
        assert_eq!(Format::from_file_name("t.Json"), None);
    }

    #[test]
    fn unknown_suffix_is_an_unsupported_format() {
        let err = parse("transactions.txt", "").unwrap_err();
        match err {
            ParseError::UnsupportedFormat(name) => assert_eq!(name, "transactions.txt"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    /// The same logical transactions expressed in each format must parse
    /// to structurally equal sequences.
    #[test]
    fn formats_agree_on_the_same_transactions() {
        let csv_input = "\
date,from,to,narrative,amount
01/01/2015,Alice,Bob,lunch,10.00
02/01/2015,Bob,Alice,rent,5.00
";
        let json_input = r#"[
            {"date": "2015-01-01", "from": "Alice", "to": "Bob", "narrative": "lunch", "amount": 10.00},
            {"date": "2015-01-02", "from": "Bob", "to": "Alice", "narrative": "rent", "amount": 5.00}
        ]"#;
        // Day offsets from the 1899-12-31 epoch: 42004 = 2015-01-01.
        let xml_input = r#"<TransactionList>
            <SupportTransaction Date="42004">
                <Description>lunch</Description>
                <Value>10.00</Value>
                <Parties>
                    <From>Alice</From>
                    <To>Bob</To>
                </Parties>
            </SupportTransaction>
            <SupportTransaction Date="42005">
                <Description>rent</Description>
                <Value>5.00</Value>
                <Parties>
                    <From>Bob</From>
                    <To>Alice</To>
                </Parties>
            </SupportTransaction>
        </TransactionList>"#;

        let from_csv = parse("t.csv", csv_input).unwrap();
        let from_json = parse("t.json", json_input).unwrap();
        let from_xml = parse("t.xml", xml_input).unwrap();

        assert!(from_csv.diagnostics.is_empty());
        assert_eq!(from_csv.transactions, from_json.transactions);
        assert_eq!(from_csv.transactions, from_xml.transactions);
    }

    /// A malformed delimited-text line reduces the count by exactly one,
    /// and the ledger built from the survivors still conserves.
    #[test]
    fn skipped_records_leave_the_ledger_conserved() {
        let input = "\
date,from,to,narrative,amount
01/01/2015,Alice,Bob,lunch,10.00
02/01/2015,Bob,Alice,rent,5.00
03/01/2015,Alice,Bob,bad,NaN
";
        let output = parse("t.csv", input).unwrap();
        assert_eq!(output.transactions.len(), 2);
        assert_eq!(output.diagnostics.len(), 1);

        let balances = crate::ledger::build(&output.transactions);
        let total: Decimal = balances.values().copied().sum();
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(balances["Alice"], Decimal::from_str("-5.00").unwrap());
        assert_eq!(balances["Bob"], Decimal::from_str("5.00").unwrap());
    }
}
