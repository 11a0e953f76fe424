//! Domain models for economic agents

pub mod agent;
pub mod bank;
pub mod household;
pub mod ledger;
pub mod transaction;
pub mod value;

// Re-exports
pub use agent::{AgentCore, AgentError, AgentKind, EconomicAgent};
pub use bank::Bank;
pub use household::Household;
pub use ledger::Ledger;
pub use transaction::{Transaction, TransactionSpec, NOT_DEFAULTED};
pub use value::{Parameters, Scalar, StateValue, StateVariables, ValueError};
