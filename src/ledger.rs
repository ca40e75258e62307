//! Ledger builder: folds transactions into per-account balances.
//!
//! Balances are derived state, fully recomputable from the transaction
//! sequence; no account exists independent of the transactions that
//! reference it.

use log::debug;
use rust_decimal::Decimal;

use crate::types::{Balances, Transaction};

/// Folds a transaction sequence into a map from account name to signed
/// balance.
///
/// Each transaction subtracts its amount from the sending account and adds
/// the same amount to the receiving account, creating either account on
/// first reference. The fold is a single left-to-right pass, but addition
/// and subtraction commute, so the result is order-independent. Accounts
/// that only ever appear on one side still get an entry.
///
/// This step is total: every transaction is well-formed by construction,
/// the parsers having already filtered malformed input. For a fixed input
/// the sum of all balances is exactly zero.
pub fn build(transactions: &[Transaction]) -> Balances {
    debug!("building ledger from {} transactions", transactions.len());
    let mut balances = Balances::new();
    for tx in transactions {
        *balances.entry(tx.from_account.clone()).or_insert(Decimal::ZERO) -= tx.amount;
        *balances.entry(tx.to_account.clone()).or_insert(Decimal::ZERO) += tx.amount;
    }
    balances
}
