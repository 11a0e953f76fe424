//! Bank agent
//!
//! A bank extends loans and takes deposits. Its ledger balances when loans
//! (assets) equal deposits (liabilities).

use crate::models::agent::{AgentCore, AgentError, AgentKind, EconomicAgent};
use crate::models::value::{Parameters, StateVariables};

/// A bank participating in the simulated financial system
///
/// # Example
/// ```
/// use econ_agent_core::{Bank, EconomicAgent, Parameters, StateVariables};
///
/// let bank = Bank::new("bank1", Parameters::new(), StateVariables::new()).unwrap();
/// assert_eq!(bank.identifier(), "bank1");
/// assert!(bank.is_balanced());
/// ```
#[derive(Debug, Clone)]
pub struct Bank {
    core: AgentCore,
}

impl Bank {
    /// Transaction types on the asset side of a bank's balance sheet
    pub const ASSET_TYPES: &'static [&'static str] = &["loans"];

    /// Transaction types on the liability side of a bank's balance sheet
    pub const LIABILITY_TYPES: &'static [&'static str] = &["deposits"];

    pub fn new(
        identifier: impl Into<String>,
        parameters: Parameters,
        state_variables: StateVariables,
    ) -> Result<Self, AgentError> {
        Ok(Self::from_core(AgentCore::new(
            identifier,
            parameters,
            state_variables,
        )?))
    }

    pub fn from_core(core: AgentCore) -> Self {
        Self { core }
    }

    /// Whether loans equal deposits
    pub fn is_balanced(&self) -> bool {
        self.check_consistency(Self::ASSET_TYPES, Self::LIABILITY_TYPES)
    }
}

impl EconomicAgent for Bank {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Bank
    }
}
