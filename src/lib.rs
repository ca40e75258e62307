//! Multi-format transaction ingestion and reconciliation.
//!
//! This crate reads financial transaction records from one structured file
//! per run (delimited text, object notation, or markup), normalizes them
//! into a single [`types::Transaction`] shape, and folds them into
//! per-account running balances. Malformed delimited-text records are
//! skipped with diagnostics rather than aborting the run; the other two
//! formats fail whole-document. The transaction log is retained alongside
//! the derived balances so queries can answer from either.
//!
//! Pipeline: raw file → [`formats::parse`] → transaction sequence →
//! [`ledger::build`] → account balances → [`query`].

pub mod formats;
pub mod ledger;
pub mod query;
pub mod types;
