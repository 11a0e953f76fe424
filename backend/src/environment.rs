//! Environment (agent registry)
//!
//! The environment resolves agent identifiers to live agents. It is also
//! the authority through which a transaction created by one agent reaches
//! its counterparty's ledger.
//!
//! # Critical Invariants
//!
//! 1. **Unique identifiers**: no two registered agents share an identifier
//! 2. **Two-phase creation**: a transaction is created only after both
//!    parties resolve, then pushed into each ledger exactly once

use crate::config::{self, ConfigError, LoadOutcome};
use crate::models::agent::{AgentCore, AgentError, EconomicAgent};
use crate::models::ledger::Ledger;
use crate::models::transaction::{Transaction, TransactionSpec};
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving or registering agents
#[derive(Debug, Error, PartialEq)]
pub enum EnvironmentError {
    #[error("No agent registered with identifier '{identifier}'")]
    UnknownAgent { identifier: String },

    #[error("An agent with identifier '{identifier}' is already registered")]
    DuplicateIdentifier { identifier: String },

    #[error("Agent '{identifier}' cannot be renamed while its transactions reference it")]
    ReferencedByTransactions { identifier: String },

    #[error(transparent)]
    InvalidIdentifier(#[from] AgentError),
}

/// Registry resolving agent identifiers to live agents
///
/// Mutable access is limited to ledgers so an agent's identifier cannot
/// drift from the one it is registered under.
pub trait Environment {
    fn get_agent_by_id(&self, identifier: &str) -> Option<&dyn EconomicAgent>;

    /// Ledger of a registered agent, used to register new transactions
    fn get_accounts_mut(&mut self, identifier: &str) -> Option<&mut Ledger>;
}

/// Check that both parties of `spec` exist
///
/// `own_id` names an agent held outside the environment by the caller; it
/// counts as resolved.
pub(crate) fn resolve_parties(
    spec: &TransactionSpec,
    own_id: Option<&str>,
    environment: &dyn Environment,
) -> Result<(), EnvironmentError> {
    for party in [&spec.from, &spec.to] {
        if own_id == Some(party.as_str()) {
            continue;
        }
        if environment.get_agent_by_id(party).is_none() {
            return Err(EnvironmentError::UnknownAgent {
                identifier: party.clone(),
            });
        }
    }
    Ok(())
}

/// Push `transaction` into the ledger of each distinct party
///
/// `this` takes precedence over the environment for its own identifier.
pub(crate) fn register_transaction(
    transaction: &Arc<Transaction>,
    mut this: Option<&mut AgentCore>,
    environment: &mut dyn Environment,
) -> Result<(), EnvironmentError> {
    let mut parties = vec![transaction.from()];
    if transaction.to() != transaction.from() {
        parties.push(transaction.to());
    }

    for party in parties {
        match this.as_deref_mut() {
            Some(core) if core.identifier() == party => {
                core.accounts_mut().push(Arc::clone(transaction));
            }
            _ => {
                let accounts = environment.get_accounts_mut(party).ok_or_else(|| {
                    EnvironmentError::UnknownAgent {
                        identifier: party.to_string(),
                    }
                })?;
                accounts.push(Arc::clone(transaction));
            }
        }
    }
    Ok(())
}

/// In-memory environment holding every agent of a simulation run
///
/// Agents keep their registration order.
///
/// # Example
/// ```
/// use econ_agent_core::{
///     AgentRegistry, Bank, EconomicAgent, Household, Parameters, StateVariables, TransactionSpec,
/// };
///
/// let mut registry = AgentRegistry::new();
/// registry
///     .register(Box::new(Bank::new("bank1", Parameters::new(), StateVariables::new()).unwrap()))
///     .unwrap();
/// registry
///     .register(Box::new(Household::new("household1", Parameters::new(), StateVariables::new()).unwrap()))
///     .unwrap();
///
/// registry
///     .add_transaction(TransactionSpec::new("deposits", "", "bank1", "household1", 30.0))
///     .unwrap();
/// assert_eq!(registry.get("bank1").unwrap().get_account("deposits"), 30.0);
/// assert_eq!(registry.get("household1").unwrap().get_account("deposits"), 30.0);
/// ```
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: IndexMap<String, Box<dyn EconomicAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent under its current identifier
    pub fn register(&mut self, agent: Box<dyn EconomicAgent>) -> Result<(), EnvironmentError> {
        let identifier = agent.identifier().to_string();
        if self.agents.contains_key(&identifier) {
            return Err(EnvironmentError::DuplicateIdentifier { identifier });
        }
        self.agents.insert(identifier, agent);
        Ok(())
    }

    /// Remove and return an agent
    pub fn remove(&mut self, identifier: &str) -> Option<Box<dyn EconomicAgent>> {
        self.agents.shift_remove(identifier)
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn agents(&self) -> impl Iterator<Item = &dyn EconomicAgent> {
        self.agents
            .values()
            .map(|agent| -> &dyn EconomicAgent { agent.as_ref() })
    }

    pub fn get(&self, identifier: &str) -> Option<&dyn EconomicAgent> {
        self.get_agent_by_id(identifier)
    }

    /// Run `f` on a registered agent with exclusive access
    ///
    /// If `f` renames the agent, the registry re-keys it in place. A rename
    /// onto another agent's identifier, or of an agent whose ledger still
    /// names it, is undone and reported as an error; other effects of `f`
    /// stay.
    pub fn update<R>(
        &mut self,
        identifier: &str,
        f: impl FnOnce(&mut dyn EconomicAgent) -> R,
    ) -> Result<R, EnvironmentError> {
        let (index, key, mut agent) = self
            .agents
            .shift_remove_full(identifier)
            .ok_or_else(|| EnvironmentError::UnknownAgent {
                identifier: identifier.to_string(),
            })?;

        let result = f(agent.as_mut());

        let new_key = agent.identifier().to_string();
        if new_key != key {
            let conflict = if self.agents.contains_key(&new_key) {
                Some(EnvironmentError::DuplicateIdentifier {
                    identifier: new_key.clone(),
                })
            } else if agent.accounts().iter().any(|tx| tx.involves(&key)) {
                Some(EnvironmentError::ReferencedByTransactions {
                    identifier: key.clone(),
                })
            } else {
                None
            };

            if let Some(err) = conflict {
                // `key` was accepted at registration, so it is a valid identifier
                let _ = agent.set_identifier(key.clone());
                self.agents.shift_insert(index, key, agent);
                return Err(err);
            }
            tracing::debug!(from = %key, to = %new_key, "agent renamed");
        }
        self.agents.shift_insert(index, new_key, agent);
        Ok(result)
    }

    /// Change a registered agent's identifier, keeping its position
    pub fn rename(&mut self, identifier: &str, new_identifier: &str) -> Result<(), EnvironmentError> {
        self.update(identifier, |agent| {
            agent.set_identifier(new_identifier.to_string())
        })??;
        Ok(())
    }

    /// Create a transaction between two registered agents
    pub fn add_transaction(
        &mut self,
        spec: TransactionSpec,
    ) -> Result<Arc<Transaction>, EnvironmentError> {
        resolve_parties(&spec, None, &*self)?;

        let transaction = Arc::new(Transaction::new(spec));
        register_transaction(&transaction, None, self)?;
        Ok(transaction)
    }

    /// Load a transaction file whose parties are all registered agents
    pub fn load_transactions_from_file(&mut self, path: &Path) -> Result<LoadOutcome, ConfigError> {
        let specs = config::read_transaction_file(path)?;

        for spec in &specs {
            if let Err(err) = resolve_parties(spec, None, &*self) {
                let err = ConfigError::from(err);
                config::log_failure(path, &err);
                return Err(err);
            }
        }

        let entries = specs.len();
        for spec in specs {
            self.add_transaction(spec)?;
        }

        tracing::debug!(path = %path.display(), entries, "loaded transactions");
        Ok(LoadOutcome { entries })
    }

    /// Load a transaction file on behalf of one registered agent
    ///
    /// The agent is detached from the registry while it loads so that its
    /// ledger and its counterparties' ledgers are each mutated under
    /// exclusive access, then put back at its original position.
    pub fn load_agent_transactions(
        &mut self,
        identifier: &str,
        path: &Path,
    ) -> Result<LoadOutcome, ConfigError> {
        let (index, key, mut agent) = self
            .agents
            .shift_remove_full(identifier)
            .ok_or_else(|| EnvironmentError::UnknownAgent {
                identifier: identifier.to_string(),
            })?;

        let result = agent.load_transactions_from_file(path, self);
        self.agents.shift_insert(index, key, agent);
        result
    }
}

impl Environment for AgentRegistry {
    fn get_agent_by_id(&self, identifier: &str) -> Option<&dyn EconomicAgent> {
        let agent: &dyn EconomicAgent = self.agents.get(identifier)?.as_ref();
        Some(agent)
    }

    fn get_accounts_mut(&mut self, identifier: &str) -> Option<&mut Ledger> {
        self.agents
            .get_mut(identifier)
            .map(|agent| agent.accounts_mut())
    }
}
