//! Ledger (agent accounts)
//!
//! The ordered collection of transactions an agent is a party to. The
//! ledger only reads transactions and drops references to them; it never
//! mutates a record.

use crate::models::transaction::Transaction;
use std::sync::Arc;

/// Ordered transaction references held by one agent
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Arc<Transaction>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction reference
    pub fn push(&mut self, transaction: Arc<Transaction>) {
        self.entries.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Transaction>> {
        self.entries.iter()
    }

    pub fn contains(&self, transaction_id: &str) -> bool {
        self.entries.iter().any(|tx| tx.id() == transaction_id)
    }

    /// Transactions whose type equals `type_`, in ledger order
    pub fn transactions_of_type<'a>(
        &'a self,
        type_: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Transaction>> + 'a {
        self.entries.iter().filter(move |tx| tx.type_() == type_)
    }

    /// Total amount over all transactions of the given type
    ///
    /// Returns 0.0 when nothing matches.
    ///
    /// # Example
    /// ```
    /// use econ_agent_core::{Ledger, Transaction, TransactionSpec};
    /// use std::sync::Arc;
    ///
    /// let mut ledger = Ledger::new();
    /// assert_eq!(ledger.account("deposits"), 0.0);
    ///
    /// ledger.push(Arc::new(Transaction::new(
    ///     TransactionSpec::new("deposits", "", "bank1", "household1", 30.0),
    /// )));
    /// assert_eq!(ledger.account("deposits"), 30.0);
    /// ```
    pub fn account(&self, type_: &str) -> f64 {
        self.transactions_of_type(type_)
            .fold(0.0, |volume, tx| volume + tx.amount())
    }

    /// Number of transactions of the given type
    pub fn num_transactions(&self, type_: &str) -> usize {
        self.transactions_of_type(type_).count()
    }

    /// True iff summed asset amounts equal summed liability amounts exactly
    ///
    /// Types listed in neither slice are ignored. A type listed in both is
    /// counted on both sides; keeping the two lists disjoint is the
    /// caller's responsibility.
    pub fn check_consistency(&self, asset_types: &[&str], liability_types: &[&str]) -> bool {
        let mut assets = 0.0;
        let mut liabilities = 0.0;

        for tx in &self.entries {
            if asset_types.iter().any(|t| *t == tx.type_()) {
                assets += tx.amount();
            }
            if liability_types.iter().any(|t| *t == tx.type_()) {
                liabilities += tx.amount();
            }
        }

        assets == liabilities
    }

    /// Drop every transaction reference, returning how many were removed
    ///
    /// Records no other ledger holds are released here.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Keep only transactions with a positive amount, returning how many were dropped
    pub fn purge(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|tx| tx.amount() > 0.0);
        before - self.entries.len()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Arc<Transaction>;
    type IntoIter = std::slice::Iter<'a, Arc<Transaction>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Arc<Transaction>> for Ledger {
    fn from_iter<I: IntoIterator<Item = Arc<Transaction>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
