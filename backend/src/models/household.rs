//! Household agent
//!
//! A household holds deposits and owes loans. Its ledger balances when
//! deposits (assets) equal loans (liabilities).

use crate::models::agent::{AgentCore, AgentError, AgentKind, EconomicAgent};
use crate::models::value::{Parameters, StateVariables};

/// A household participating in the simulated financial system
#[derive(Debug, Clone)]
pub struct Household {
    core: AgentCore,
}

impl Household {
    pub const ASSET_TYPES: &'static [&'static str] = &["deposits"];

    pub const LIABILITY_TYPES: &'static [&'static str] = &["loans"];

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

    /// Whether deposits equal loans
    pub fn is_balanced(&self) -> bool {
        self.check_consistency(Self::ASSET_TYPES, Self::LIABILITY_TYPES)
    }
}

impl EconomicAgent for Household {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Household
    }
}
