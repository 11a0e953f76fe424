//! Agent model
//!
//! An economic agent (bank, household, ...) participating in the simulated
//! financial system. Every agent has:
//! - A non-empty identifier, unique within a simulation run
//! - Static parameters (scalars)
//! - Mutable state variables (scalars or pairs of scalars)
//! - A ledger of the transactions it is a party to
//!
//! [`AgentCore`] holds that state and validates it on construction;
//! [`EconomicAgent`] is the capability set every concrete variant exposes.
//! All ledger, loading and rendering operations are provided by the trait,
//! so a variant only needs to hand out its core.

use crate::config::{self, ConfigError, LoadOutcome};
use crate::environment::{self, Environment, EnvironmentError};
use crate::models::bank::Bank;
use crate::models::household::Household;
use crate::models::ledger::Ledger;
use crate::models::transaction::{Transaction, TransactionSpec};
use crate::models::value::{Parameters, Scalar, StateValue, StateVariables};
use crate::render;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during agent operations
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("Agent identifier must be a non-empty string")]
    EmptyIdentifier,
}

/// Concrete agent variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Bank,
    Household,
}

impl AgentKind {
    /// Wrap a core into the matching concrete variant
    pub fn into_agent(self, core: AgentCore) -> Box<dyn EconomicAgent> {
        match self {
            AgentKind::Bank => Box::new(Bank::from_core(core)),
            AgentKind::Household => Box::new(Household::from_core(core)),
        }
    }

    /// Default `(asset_types, liability_types)` of the variant's balance sheet
    pub fn balance_sheet(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            AgentKind::Bank => (Bank::ASSET_TYPES, Bank::LIABILITY_TYPES),
            AgentKind::Household => (Household::ASSET_TYPES, Household::LIABILITY_TYPES),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Bank => f.write_str("bank"),
            AgentKind::Household => f.write_str("household"),
        }
    }
}

/// Identity, parameters, state and ledger shared by every agent variant
///
/// # Example
/// ```
/// use econ_agent_core::{AgentCore, Parameters, Scalar, StateVariables};
///
/// let mut params = Parameters::new();
/// params.insert("r".to_string(), Scalar::Float(0.02));
///
/// let core = AgentCore::new("bank1", params, StateVariables::new()).unwrap();
/// assert_eq!(core.identifier(), "bank1");
/// assert_eq!(core.parameter("r"), Some(&Scalar::Float(0.02)));
/// assert!(core.accounts().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AgentCore {
    /// Unique agent identifier (e.g., "bank1")
    identifier: String,

    /// Values determining the behaviour of the agent
    parameters: Parameters,

    /// Values determining the behaviour of the agent that change during the run
    state_variables: StateVariables,

    /// Transactions this agent is a party to
    accounts: Ledger,
}

impl AgentCore {
    /// Create an agent core with an empty ledger
    ///
    /// Fails with [`AgentError::EmptyIdentifier`] for an empty identifier.
    pub fn new(
        identifier: impl Into<String>,
        parameters: Parameters,
        state_variables: StateVariables,
    ) -> Result<Self, AgentError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;

        Ok(Self {
            identifier,
            parameters,
            state_variables,
            accounts: Ledger::new(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Replace the identifier
    ///
    /// On error the previous identifier is kept.
    pub fn set_identifier(&mut self, identifier: impl Into<String>) -> Result<(), AgentError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        self.identifier = identifier;
        Ok(())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Scalar> {
        self.parameters.get(name)
    }

    /// Replace the whole parameter map
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    /// Merge `parameters` into the existing ones, overwriting on collision
    ///
    /// Overwritten keys keep their original position; new keys are appended.
    pub fn append_parameters(&mut self, parameters: Parameters) {
        self.parameters.extend(parameters);
    }

    pub fn state_variables(&self) -> &StateVariables {
        &self.state_variables
    }

    pub fn state_variable(&self, name: &str) -> Option<&StateValue> {
        self.state_variables.get(name)
    }

    /// Insert or overwrite one state variable
    pub fn set_state_variable(&mut self, name: impl Into<String>, value: impl Into<StateValue>) {
        self.state_variables.insert(name.into(), value.into());
    }

    pub fn set_state_variables(&mut self, state_variables: StateVariables) {
        self.state_variables = state_variables;
    }

    pub fn append_state_variables(&mut self, state_variables: StateVariables) {
        self.state_variables.extend(state_variables);
    }

    pub fn accounts(&self) -> &Ledger {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut Ledger {
        &mut self.accounts
    }
}

impl fmt::Display for AgentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::render_agent(self))
    }
}

fn validate_identifier(identifier: &str) -> Result<(), AgentError> {
    if identifier.is_empty() {
        return Err(AgentError::EmptyIdentifier);
    }
    Ok(())
}

/// Capability set of an economic agent
///
/// Concrete variants implement [`core`](EconomicAgent::core),
/// [`core_mut`](EconomicAgent::core_mut) and [`kind`](EconomicAgent::kind);
/// everything else has a default built on the shared [`AgentCore`].
pub trait EconomicAgent: fmt::Debug + Send {
    fn core(&self) -> &AgentCore;

    fn core_mut(&mut self) -> &mut AgentCore;

    fn kind(&self) -> AgentKind;

    fn identifier(&self) -> &str {
        self.core().identifier()
    }

    fn set_identifier(&mut self, identifier: String) -> Result<(), AgentError> {
        self.core_mut().set_identifier(identifier)
    }

    fn parameters(&self) -> &Parameters {
        self.core().parameters()
    }

    fn set_parameters(&mut self, parameters: Parameters) {
        self.core_mut().set_parameters(parameters)
    }

    fn append_parameters(&mut self, parameters: Parameters) {
        self.core_mut().append_parameters(parameters)
    }

    fn state_variables(&self) -> &StateVariables {
        self.core().state_variables()
    }

    fn set_state_variables(&mut self, state_variables: StateVariables) {
        self.core_mut().set_state_variables(state_variables)
    }

    fn append_state_variables(&mut self, state_variables: StateVariables) {
        self.core_mut().append_state_variables(state_variables)
    }

    fn accounts(&self) -> &Ledger {
        self.core().accounts()
    }

    fn accounts_mut(&mut self) -> &mut Ledger {
        self.core_mut().accounts_mut()
    }

    /// Total amount of all transactions of the given type
    fn get_account(&self, type_: &str) -> f64 {
        self.accounts().account(type_)
    }

    /// Number of transactions of the given type
    fn get_account_num_transactions(&self, type_: &str) -> usize {
        self.accounts().num_transactions(type_)
    }

    /// Whether summed asset amounts equal summed liability amounts
    ///
    /// See [`Ledger::check_consistency`]; the two type lists should be disjoint.
    fn check_consistency(&self, asset_types: &[&str], liability_types: &[&str]) -> bool {
        self.accounts().check_consistency(asset_types, liability_types)
    }

    /// Remove every transaction from the ledger
    fn clear_accounts(&mut self) -> usize {
        let removed = self.accounts_mut().clear();
        tracing::debug!(agent = %self.identifier(), removed, "cleared accounts");
        removed
    }

    /// Remove worthless (non-positive amount) transactions from the ledger
    fn purge_accounts(&mut self) -> usize {
        let removed = self.accounts_mut().purge();
        tracing::debug!(agent = %self.identifier(), removed, "purged accounts");
        removed
    }

    /// Read identifier and parameters from a declarative file
    ///
    /// ```text
    /// <bank identifier='bank1'>
    ///     <parameter name='r' value='0.02'></parameter>
    /// </bank>
    /// ```
    ///
    /// Parameter values are stored as floats. On failure nothing is
    /// changed and the error is also logged.
    fn load_parameters_from_file(
        &mut self,
        path: &Path,
        _environment: &dyn Environment,
    ) -> Result<LoadOutcome, ConfigError> {
        let document = config::read_parameter_file(path)?;
        let entries = document.parameters.len();

        if let Err(err) = self.set_identifier(document.identifier) {
            let err = ConfigError::from(err);
            config::log_failure(path, &err);
            return Err(err);
        }
        self.append_parameters(
            document
                .parameters
                .into_iter()
                .map(|(name, value)| (name, Scalar::Float(value)))
                .collect(),
        );

        tracing::debug!(agent = %self.identifier(), path = %path.display(), entries, "loaded parameters");
        Ok(LoadOutcome { entries })
    }

    /// Read transactions from a declarative file and add them to the ledgers
    ///
    /// Every `from` / `to` identifier must be this agent or be known to
    /// `environment`. All references are resolved before any transaction is
    /// created, so a failed load leaves every ledger untouched.
    fn load_transactions_from_file(
        &mut self,
        path: &Path,
        environment: &mut dyn Environment,
    ) -> Result<LoadOutcome, ConfigError> {
        let specs = config::read_transaction_file(path)?;

        let own_id = self.identifier().to_string();
        for spec in &specs {
            if let Err(err) = environment::resolve_parties(spec, Some(own_id.as_str()), &*environment) {
                let err = ConfigError::from(err);
                config::log_failure(path, &err);
                return Err(err);
            }
        }

        let entries = specs.len();
        for spec in specs {
            self.add_transaction(spec, environment)?;
        }

        tracing::debug!(agent = %own_id, path = %path.display(), entries, "loaded transactions");
        Ok(LoadOutcome { entries })
    }

    /// Create a transaction and register it in both participants' ledgers
    ///
    /// The record is created first, then pushed into this agent's ledger
    /// (when it is a party) and into the counterparty's ledger through
    /// `environment`.
    fn add_transaction(
        &mut self,
        spec: TransactionSpec,
        environment: &mut dyn Environment,
    ) -> Result<Arc<Transaction>, EnvironmentError> {
        let own_id = self.identifier().to_string();
        environment::resolve_parties(&spec, Some(own_id.as_str()), &*environment)?;

        let transaction = Arc::new(Transaction::new(spec));
        environment::register_transaction(&transaction, Some(self.core_mut()), environment)?;
        Ok(transaction)
    }

    /// Render identifier, parameters and state variables as tagged text
    fn render(&self) -> String {
        render::render_agent(self.core())
    }
}
