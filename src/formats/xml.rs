//! Markup (XML) parser.
//!
//! The document's root holds a flat run of transaction elements. The
//! format carries no field names: each transaction is a date attribute (an
//! integer day offset from the epoch, one day before 1900-01-01) plus four
//! text values read positionally from its child elements, in the order
//! narrative, amount, source account, destination account. A trailing
//! attribute-less element, or the root's end, terminates the run.
//!
//! The positional contract is made explicit as a small state machine over
//! pull-parser events: every text node inside a transaction element
//! advances the expected-field state, whitespace-only text is structural
//! noise, and any shape the machine does not expect fails the whole
//! document. There is no per-record recovery in this format.

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::{Amount, ParseError, Transaction};

/// Which positional value the next text node inside a transaction element
/// is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Narrative,
    Amount,
    From,
    To,
    Done,
}

/// A transaction element mid-traversal: the resolved date attribute plus
/// whatever positional values have been seen so far.
struct Pending {
    date: NaiveDate,
    narrative: Option<String>,
    amount: Option<Amount>,
    from: Option<String>,
    to: Option<String>,
    expect: Expect,
}

impl Pending {
    fn new(date: NaiveDate) -> Self {
        Pending {
            date,
            narrative: None,
            amount: None,
            from: None,
            to: None,
            expect: Expect::Narrative,
        }
    }

    fn take_value(&mut self, value: &str) -> Result<(), ParseError> {
        match self.expect {
            Expect::Narrative => {
                self.narrative = Some(value.to_string());
                self.expect = Expect::Amount;
            }
            Expect::Amount => {
                let amount = Decimal::from_str(value).map_err(|_| {
                    malformed(format!("improperly formatted amount {:?}", value))
                })?;
                self.amount = Some(amount);
                self.expect = Expect::From;
            }
            Expect::From => {
                self.from = Some(value.to_string());
                self.expect = Expect::To;
            }
            Expect::To => {
                self.to = Some(value.to_string());
                self.expect = Expect::Done;
            }
            Expect::Done => {
                return Err(malformed(format!(
                    "unexpected extra value {:?} in transaction element",
                    value
                )));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Transaction, ParseError> {
        match (self.narrative, self.amount, self.from, self.to) {
            (Some(narrative), Some(amount), Some(from_account), Some(to_account)) => {
                Ok(Transaction {
                    date: self.date,
                    from_account,
                    to_account,
                    narrative,
                    amount,
                })
            }
            _ => Err(malformed("transaction element is missing values")),
        }
    }
}

/// Parses a markup document into transactions, in document order.
///
/// # Errors
///
/// [`ParseError::MalformedDocument`] for any structural mismatch: a
/// transaction element without a date attribute before the terminator, a
/// non-integer or out-of-range day offset, too few or too many positional
/// values, or a truncated document.
pub fn parse(content: &str) -> Result<Vec<Transaction>, ParseError> {
    let mut reader = Reader::from_str(content);
    let mut transactions = Vec::new();
    let mut depth = 0usize;
    let mut pending: Option<Pending> = None;

    loop {
        match reader.read_event().map_err(|e| malformed(e.to_string()))? {
            Event::Start(e) => {
                depth += 1;
                // Depth 1 is the root; depth 2 opens one transaction.
                if depth == 2 {
                    match date_attribute(&e)? {
                        Some(date) => pending = Some(Pending::new(date)),
                        // Attribute-less element at transaction level is
                        // the terminator; stop without parsing it.
                        None => break,
                    }
                }
            }
            Event::Empty(e) => {
                if depth == 1 {
                    match date_attribute(&e)? {
                        // Self-closing terminator.
                        None => break,
                        Some(_) => {
                            return Err(malformed("transaction element has no content"));
                        }
                    }
                }
                // An empty element inside a transaction cannot carry a
                // positional value; if it stood where one was expected the
                // count check at the enclosing end tag reports it.
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                match pending.as_mut() {
                    Some(pending) => pending.take_value(text)?,
                    None => {
                        return Err(malformed(format!(
                            "unexpected text {:?} outside a transaction element",
                            text
                        )));
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(pending) = pending.take() {
                        transactions.push(pending.finish()?);
                    }
                }
                if depth == 0 {
                    // Root closed: end of the transaction list.
                    break;
                }
            }
            Event::Eof => {
                if depth > 0 || pending.is_some() {
                    return Err(malformed("unexpected end of document"));
                }
                break;
            }
            // Declarations, comments, and processing instructions are not
            // structural steps.
            _ => {}
        }
    }

    Ok(transactions)
}

/// Resolves the element's date attribute, if it has one.
///
/// The attribute is positional like everything else in this format: the
/// first attribute is taken, whatever its name, and its value must be an
/// integer day offset from the epoch.
fn date_attribute(element: &quick_xml::events::BytesStart) -> Result<Option<NaiveDate>, ParseError> {
    let attr = match element.attributes().next() {
        Some(attr) => attr.map_err(|e| malformed(e.to_string()))?,
        None => return Ok(None),
    };
    let value = attr
        .unescape_value()
        .map_err(|e| malformed(e.to_string()))?;
    let offset: i64 = value
        .trim()
        .parse()
        .map_err(|_| malformed(format!("improperly formatted day offset {:?}", value)))?;
    resolve_date(offset)
        .ok_or_else(|| malformed(format!("day offset {} is out of range", offset)))
        .map(Some)
}

/// The epoch sits one day before the 1900-01-01 origin, so offset 1 is
/// 1900-01-01 itself.
fn resolve_date(offset: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 31)?;
    epoch.checked_add_signed(chrono::Duration::try_days(offset)?)
}

fn malformed(message: impl Into<String>) -> ParseError {
    ParseError::MalformedDocument {
        format: "xml",
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<TransactionList>
        <SupportTransaction Date="1">
            <Description>lunch</Description>
            <Value>10.00</Value>
            <Parties>
                <From>Alice</From>
                <To>Bob</To>
            </Parties>
        </SupportTransaction>
        <SupportTransaction Date="2">
            <Description>rent</Description>
            <Value>5.00</Value>
            <Parties>
                <From>Bob</From>
                <To>Alice</To>
            </Parties>
        </SupportTransaction>
    </TransactionList>"#;

    #[test]
    fn reads_transactions_in_document_order() {
        let transactions = parse(DOC).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].narrative, "lunch");
        assert_eq!(transactions[0].from_account, "Alice");
        assert_eq!(transactions[0].to_account, "Bob");
        assert_eq!(transactions[0].amount, Decimal::from_str("10.00").unwrap());
        assert_eq!(transactions[1].narrative, "rent");
    }

    #[test]
    fn date_attribute_is_a_day_offset_from_the_epoch() {
        let transactions = parse(DOC).unwrap();
        // Offset 1 is the 1900-01-01 origin itself.
        assert_eq!(
            transactions[0].date,
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()
        );
        assert_eq!(
            transactions[1].date,
            NaiveDate::from_ymd_opt(1900, 1, 2).unwrap()
        );
    }

    #[test]
    fn attribute_less_terminator_element_stops_iteration() {
        let input = r#"<TransactionList>
            <SupportTransaction Date="1">
                <Description>lunch</Description>
                <Value>10.00</Value>
                <Parties>
                    <From>Alice</From>
                    <To>Bob</To>
                </Parties>
            </SupportTransaction>
            <EndOfList></EndOfList>
        </TransactionList>"#;
        let transactions = parse(input).unwrap();
        assert_eq!(transactions.len(), 1);
    }

    #[test]
    fn element_names_are_not_consulted_only_position() {
        let input = r#"<Root>
            <Item D="1">
                <A>coffee</A>
                <B>2.50</B>
                <C>
                    <D>Carol</D>
                    <E>Dave</E>
                </C>
            </Item>
        </Root>"#;
        let transactions = parse(input).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].narrative, "coffee");
        assert_eq!(transactions[0].from_account, "Carol");
        assert_eq!(transactions[0].to_account, "Dave");
    }

    #[test]
    fn missing_values_fail_the_document() {
        let input = r#"<TransactionList>
            <SupportTransaction Date="1">
                <Description>lunch</Description>
                <Value>10.00</Value>
            </SupportTransaction>
        </TransactionList>"#;
        assert!(matches!(
            parse(input),
            Err(ParseError::MalformedDocument { format: "xml", .. })
        ));
    }

    #[test]
    fn non_integer_day_offset_fails_the_document() {
        let input = r#"<TransactionList>
            <SupportTransaction Date="tomorrow">
                <Description>lunch</Description>
                <Value>10.00</Value>
                <Parties><From>Alice</From><To>Bob</To></Parties>
            </SupportTransaction>
        </TransactionList>"#;
        assert!(parse(input).is_err());
    }

    #[test]
    fn unparseable_amount_fails_the_document() {
        let input = r#"<TransactionList>
            <SupportTransaction Date="1">
                <Description>lunch</Description>
                <Value>ten</Value>
                <Parties><From>Alice</From><To>Bob</To></Parties>
            </SupportTransaction>
        </TransactionList>"#;
        assert!(parse(input).is_err());
    }

    #[test]
    fn truncated_document_fails() {
        let input = r#"<TransactionList>
            <SupportTransaction Date="1">
                <Description>lunch</Description>"#;
        assert!(parse(input).is_err());
    }

    #[test]
    fn empty_list_yields_no_transactions() {
        let transactions = parse("<TransactionList></TransactionList>").unwrap();
        assert!(transactions.is_empty());
    }
}
