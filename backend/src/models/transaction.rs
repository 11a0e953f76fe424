//! Transaction model
//!
//! A directed balance-sheet record between two agents. Each transaction has:
//! - A type (`"deposits"`, `"loans"`, ...) and an asset label
//! - Issuing (`from`) and receiving (`to`) agent identifiers
//! - Amount, interest, maturity and time of default
//!
//! Transactions are immutable once created. Ledgers share them through
//! `Arc`, so one record can sit in both participants' accounts.
//!
//! An amount of zero or below marks the record as written off.

use serde::{Deserialize, Serialize};

/// Sentinel `time_of_default` for a transaction that has not defaulted
pub const NOT_DEFAULTED: f64 = -1.0;

/// Field values needed to create a [`Transaction`]
///
/// This is what the configuration loader reads from a `<transaction>`
/// element, after agent identifiers have been checked against the
/// environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSpec {
    #[serde(rename = "type")]
    pub type_: String,
    pub asset: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub interest: f64,
    pub maturity: f64,
    pub time_of_default: f64,
}

impl TransactionSpec {
    /// Spec with zero interest and maturity that has not defaulted
    ///
    /// # Example
    /// ```
    /// use econ_agent_core::TransactionSpec;
    ///
    /// let spec = TransactionSpec::new("deposits", "", "bank1", "household1", 30.0)
    ///     .with_interest(0.02);
    /// assert_eq!(spec.interest, 0.02);
    /// assert_eq!(spec.time_of_default, -1.0);
    /// ```
    pub fn new(
        type_: impl Into<String>,
        asset: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            type_: type_.into(),
            asset: asset.into(),
            from: from.into(),
            to: to.into(),
            amount,
            interest: 0.0,
            maturity: 0.0,
            time_of_default: NOT_DEFAULTED,
        }
    }

    pub fn with_interest(mut self, interest: f64) -> Self {
        self.interest = interest;
        self
    }

    pub fn with_maturity(mut self, maturity: f64) -> Self {
        self.maturity = maturity;
        self
    }

    pub fn with_time_of_default(mut self, time_of_default: f64) -> Self {
        self.time_of_default = time_of_default;
        self
    }
}

/// A balance-sheet record between two agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier (UUID)
    id: String,

    /// Category, e.g. "deposits"
    #[serde(rename = "type")]
    type_: String,

    asset: String,

    /// Identifier of the issuing agent
    from: String,

    /// Identifier of the receiving agent
    to: String,

    /// Face value; zero or negative after write-off or default
    amount: f64,

    interest: f64,

    maturity: f64,

    /// Time step of default, [`NOT_DEFAULTED`] otherwise
    time_of_default: f64,
}

impl Transaction {
    /// Create a transaction with a fresh id
    pub fn new(spec: TransactionSpec) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), spec)
    }

    /// Create a transaction keeping a known id (checkpoint restoration)
    pub fn with_id(id: String, spec: TransactionSpec) -> Self {
        let TransactionSpec {
            type_,
            asset,
            from,
            to,
            amount,
            interest,
            maturity,
            time_of_default,
        } = spec;

        Self {
            id,
            type_,
            asset,
            from,
            to,
            amount,
            interest,
            maturity,
            time_of_default,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn interest(&self) -> f64 {
        self.interest
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn time_of_default(&self) -> f64 {
        self.time_of_default
    }

    /// Whether the record carries a time of default
    pub fn is_defaulted(&self) -> bool {
        self.time_of_default != NOT_DEFAULTED
    }

    /// Whether `agent_id` is the issuer or the receiver
    pub fn involves(&self, agent_id: &str) -> bool {
        self.from == agent_id || self.to == agent_id
    }

    /// The field values this record was created from
    pub fn spec(&self) -> TransactionSpec {
        TransactionSpec {
            type_: self.type_.clone(),
            asset: self.asset.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            amount: self.amount,
            interest: self.interest,
            maturity: self.maturity,
            time_of_default: self.time_of_default,
        }
    }
}
