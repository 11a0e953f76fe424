//! Economic Agent Core
//!
//! Accounting model for agents (banks, households, ...) in agent-based
//! simulations of financial systems.
//!
//! # Architecture
//!
//! - **models**: Domain types (agents, values, transactions, ledgers)
//! - **config**: Loading agent parameters and transactions from files
//! - **environment**: Agent registry and cross-agent transaction creation
//! - **render**: Tagged text rendering of agent state
//! - **checkpoint**: JSON snapshots of agents and registries
//!
//! # Critical Invariants
//!
//! 1. Agent identifiers are non-empty
//! 2. Parameters are scalars; state variables are scalars or pairs
//! 3. Transactions are never mutated, only referenced and dropped
//! 4. A ledger is consistent iff asset and liability sums are exactly equal

// Module declarations
pub mod checkpoint;
pub mod config;
pub mod environment;
pub mod models;
pub mod render;

// Re-exports for convenience
pub use checkpoint::{AgentSnapshot, CheckpointError, RegistrySnapshot};
pub use config::{ConfigError, DocumentError, LoadOutcome};
pub use environment::{AgentRegistry, Environment, EnvironmentError};
pub use models::{
    agent::{AgentCore, AgentError, AgentKind, EconomicAgent},
    bank::Bank,
    household::Household,
    ledger::Ledger,
    transaction::{Transaction, TransactionSpec, NOT_DEFAULTED},
    value::{Parameters, Scalar, StateValue, StateVariables, ValueError},
};
