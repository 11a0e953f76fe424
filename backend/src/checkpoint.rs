//! Checkpoint - Save/Load Agent State
//!
//! Captures agents (identity, parameters, state variables and ledger) as
//! JSON and restores them later.
//!
//! # Critical Invariants
//!
//! - **Ledger integrity**: a snapshot carries a SHA-256 hash of its ledger
//!   and is rejected on load if the ledger no longer matches it
//! - **Party integrity**: every transaction in an agent's ledger names that
//!   agent as issuer or receiver
//! - **Shared records**: restoring a registry shares one record between the
//!   two ledgers that held it

use crate::environment::{AgentRegistry, EnvironmentError};
use crate::models::agent::{AgentCore, AgentError, AgentKind, EconomicAgent};
use crate::models::transaction::Transaction;
use crate::models::value::{Parameters, Scalar, StateValue, StateVariables};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while saving or restoring checkpoints
#[derive(Debug, Error, PartialEq)]
pub enum CheckpointError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Ledger hash mismatch for agent {identifier}: expected {expected}, got {actual}")]
    LedgerHashMismatch {
        identifier: String,
        expected: String,
        actual: String,
    },

    #[error("State validation error: {0}")]
    StateValidationError(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete state of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub kind: AgentKind,
    pub identifier: String,
    pub parameters: Parameters,
    pub state_variables: StateVariables,

    /// Ledger in order
    pub transactions: Vec<Transaction>,

    /// SHA-256 of the canonical JSON form of `transactions`
    pub ledger_hash: String,
}

impl AgentSnapshot {
    /// Capture an agent's current state
    ///
    /// Fails for non-finite floats, which JSON cannot carry.
    pub fn capture(agent: &dyn EconomicAgent) -> Result<Self, CheckpointError> {
        check_finite(agent)?;

        let transactions: Vec<Transaction> = agent
            .accounts()
            .iter()
            .map(|tx| Transaction::clone(tx))
            .collect();
        let ledger_hash = compute_ledger_hash(&transactions)?;

        Ok(Self {
            kind: agent.kind(),
            identifier: agent.identifier().to_string(),
            parameters: agent.parameters().clone(),
            state_variables: agent.state_variables().clone(),
            transactions,
            ledger_hash,
        })
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CheckpointError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Parse a snapshot and check it against its ledger hash
    ///
    /// Parameters must be scalars and state variables scalars or pairs;
    /// anything else is rejected here.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: AgentSnapshot = serde_json::from_str(json).map_err(|e| {
            CheckpointError::SerializationError(format!("Snapshot deserialization failed: {}", e))
        })?;
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Rebuild the agent with its own copy of every transaction
    pub fn restore(self) -> Result<Box<dyn EconomicAgent>, CheckpointError> {
        self.restore_with(Arc::new)
    }

    fn restore_with(
        self,
        mut share: impl FnMut(Transaction) -> Arc<Transaction>,
    ) -> Result<Box<dyn EconomicAgent>, CheckpointError> {
        let mut core = AgentCore::new(self.identifier, self.parameters, self.state_variables)?;
        for tx in self.transactions {
            core.accounts_mut().push(share(tx));
        }
        Ok(self.kind.into_agent(core))
    }
}

/// State of every agent in a registry, in registration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub agents: Vec<AgentSnapshot>,
}

impl RegistrySnapshot {
    pub fn capture(registry: &AgentRegistry) -> Result<Self, CheckpointError> {
        let agents = registry
            .agents()
            .map(AgentSnapshot::capture)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { agents })
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CheckpointError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json).map_err(|e| {
            CheckpointError::SerializationError(format!("Snapshot deserialization failed: {}", e))
        })?;
        for agent in &snapshot.agents {
            validate_snapshot(agent)?;
        }
        Ok(snapshot)
    }

    /// Rebuild the registry
    ///
    /// Transactions with the same id become one shared record.
    pub fn restore(self) -> Result<AgentRegistry, CheckpointError> {
        let mut shared: HashMap<String, Arc<Transaction>> = HashMap::new();
        let mut registry = AgentRegistry::new();

        for snapshot in self.agents {
            let agent = snapshot.restore_with(|tx| {
                Arc::clone(
                    shared
                        .entry(tx.id().to_string())
                        .or_insert_with(|| Arc::new(tx)),
                )
            })?;
            registry.register(agent)?;
        }

        Ok(registry)
    }
}

// ============================================================================
// Ledger Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of a ledger
///
/// Hashes the compact JSON form; field order follows the `Transaction`
/// struct, so equal ledgers always hash equally.
pub fn compute_ledger_hash(transactions: &[Transaction]) -> Result<String, CheckpointError> {
    let json = serde_json::to_vec(transactions).map_err(|e| {
        CheckpointError::SerializationError(format!("Ledger serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Reject NaN and infinite values anywhere in an agent's state
fn check_finite(agent: &dyn EconomicAgent) -> Result<(), CheckpointError> {
    let non_finite = |what: String| {
        CheckpointError::StateValidationError(format!(
            "Non-finite value in {} of agent {}",
            what,
            agent.identifier()
        ))
    };
    let scalar_finite = |scalar: &Scalar| !matches!(scalar, Scalar::Float(v) if !v.is_finite());

    for (name, value) in agent.parameters() {
        if !scalar_finite(value) {
            return Err(non_finite(format!("parameter {}", name)));
        }
    }

    for (name, value) in agent.state_variables() {
        let finite = match value {
            StateValue::Scalar(s) => scalar_finite(s),
            StateValue::Pair(a, b) => scalar_finite(a) && scalar_finite(b),
        };
        if !finite {
            return Err(non_finite(format!("state variable {}", name)));
        }
    }

    for tx in agent.accounts() {
        let fields = [tx.amount(), tx.interest(), tx.maturity(), tx.time_of_default()];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(non_finite(format!("transaction {}", tx.id())));
        }
    }

    Ok(())
}

/// Validate agent snapshot integrity
///
/// Checks:
/// - Ledger hash matches the transactions
/// - Every transaction involves the agent
pub fn validate_snapshot(snapshot: &AgentSnapshot) -> Result<(), CheckpointError> {
    let actual = compute_ledger_hash(&snapshot.transactions)?;
    if actual != snapshot.ledger_hash {
        return Err(CheckpointError::LedgerHashMismatch {
            identifier: snapshot.identifier.clone(),
            expected: snapshot.ledger_hash.clone(),
            actual,
        });
    }

    if let Some(tx) = snapshot
        .transactions
        .iter()
        .find(|tx| !tx.involves(&snapshot.identifier))
    {
        return Err(CheckpointError::StateValidationError(format!(
            "Transaction {} in ledger of {} involves neither party",
            tx.id(),
            snapshot.identifier
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionSpec;

    fn tx(amount: f64) -> Transaction {
        Transaction::with_id(
            "tx-1".to_string(),
            TransactionSpec::new("deposits", "", "bank1", "household1", amount),
        )
    }

    #[test]
    fn test_compute_ledger_hash_deterministic() {
        let hash1 = compute_ledger_hash(&[tx(30.0)]).unwrap();
        let hash2 = compute_ledger_hash(&[tx(30.0)]).unwrap();
        assert_eq!(hash1, hash2, "Same ledger should produce same hash");
    }

    #[test]
    fn test_compute_ledger_hash_different_for_different_ledgers() {
        let hash1 = compute_ledger_hash(&[tx(30.0)]).unwrap();
        let hash2 = compute_ledger_hash(&[tx(25.0)]).unwrap();
        assert_ne!(hash1, hash2, "Different ledgers should produce different hashes");
    }

    #[test]
    fn test_capture_rejects_non_finite_amount() {
        let mut registry = AgentRegistry::new();
        for id in ["bank1", "household1"] {
            let core = AgentCore::new(id, Parameters::new(), StateVariables::new()).unwrap();
            registry.register(AgentKind::Bank.into_agent(core)).unwrap();
        }
        registry
            .add_transaction(TransactionSpec::new("loans", "", "bank1", "household1", f64::NAN))
            .unwrap();

        let err = RegistrySnapshot::capture(&registry).unwrap_err();
        assert!(matches!(err, CheckpointError::StateValidationError(_)));
    }

    #[test]
    fn test_capture_rejects_infinite_state_variable() {
        let mut vars = StateVariables::new();
        vars.insert("y".to_string(), StateValue::pair(1, f64::INFINITY));
        let core = AgentCore::new("bank1", Parameters::new(), vars).unwrap();
        let agent = AgentKind::Bank.into_agent(core);

        assert!(matches!(
            AgentSnapshot::capture(agent.as_ref()),
            Err(CheckpointError::StateValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_foreign_transaction() {
        let transactions = vec![tx(30.0)];
        let snapshot = AgentSnapshot {
            kind: AgentKind::Bank,
            identifier: "bank2".to_string(),
            parameters: Parameters::new(),
            state_variables: StateVariables::new(),
            ledger_hash: compute_ledger_hash(&transactions).unwrap(),
            transactions,
        };

        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(CheckpointError::StateValidationError(_))
        ));
    }
}
