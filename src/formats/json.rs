//! Object-notation (JSON) parser.
//!
//! The document is a single top-level array of transaction objects,
//! deserialized in one pass; array order becomes output order. Unlike the
//! delimited-text parser there is no per-record tolerance here: a partial
//! object graph cannot be safely salvaged, so any structural failure fails
//! the whole document.

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::types::{Amount, ParseError, Transaction};

/// Wire shape of one transaction object. Lowercase keys are the
/// convention; PascalCase aliases are accepted for data exported by older
/// tooling.
#[derive(Deserialize)]
struct Record {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "FromAccount", alias = "from_account")]
    from: String,
    #[serde(alias = "ToAccount", alias = "to_account")]
    to: String,
    #[serde(alias = "Narrative")]
    narrative: String,
    #[serde(alias = "Amount", deserialize_with = "deserialize_amount")]
    amount: Amount,
}

/// Custom deserializer for the amount field.
///
/// Accepts a JSON number or a numeric string, keeping exact decimal
/// semantics either way.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number or numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Amount::from_str(value.trim())
                .map_err(|e| de::Error::custom(format!("invalid decimal: {}", e)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Amount::try_from(value)
                .map_err(|e| de::Error::custom(format!("invalid decimal from float: {}", e)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Amount::from(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Amount::from(value))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// Parses an object-notation document into transactions, in array order.
///
/// # Errors
///
/// [`ParseError::MalformedDocument`] if the document is not a well-formed
/// array of transaction objects. Nothing is salvaged from a document that
/// fails part-way.
pub fn parse(content: &str) -> Result<Vec<Transaction>, ParseError> {
    let records: Vec<Record> =
        serde_json::from_str(content).map_err(|err| ParseError::MalformedDocument {
            format: "json",
            message: err.to_string(),
        })?;

    Ok(records
        .into_iter()
        .map(|r| Transaction {
            date: r.date,
            from_account: r.from,
            to_account: r.to,
            narrative: r.narrative,
            amount: r.amount,
        })
        .collect())
}
