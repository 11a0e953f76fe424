//! Tests for loading agents from declarative configuration files

use econ_agent_core::{
    AgentRegistry, Bank, ConfigError, EconomicAgent, EnvironmentError, Household, LoadOutcome,
    Parameters, Scalar, StateVariables,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

// ============================================================================
// Test Helpers
// ============================================================================

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn bank(identifier: &str) -> Bank {
    Bank::new(identifier, Parameters::new(), StateVariables::new()).unwrap()
}

fn household(identifier: &str) -> Household {
    Household::new(identifier, Parameters::new(), StateVariables::new()).unwrap()
}

const DEPOSIT_FILE: &str = "<transactions>
  <transaction type='deposits' asset='' from='bank1' to='household1' amount='30' interest='0.02' maturity='0' time_of_default='-1'></transaction>
</transactions>";

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_load_parameters_sets_identifier_and_floats() {
    let file = write_file(
        "<bank identifier='bank1'>\n  <parameter name='r' value='0.02'></parameter>\n</bank>",
    );
    let mut agent = bank("placeholder");
    let registry = AgentRegistry::new();

    let outcome = agent
        .load_parameters_from_file(file.path(), &registry)
        .unwrap();

    assert_eq!(outcome, LoadOutcome { entries: 1 });
    assert_eq!(agent.identifier(), "bank1");
    assert_eq!(agent.parameters().get("r"), Some(&Scalar::Float(0.02)));
}

#[test]
fn test_load_parameters_keeps_unrelated_parameters() {
    let file = write_file(
        "<bank identifier='bank1'>
           <parameter name='r' value='0.05'></parameter>
           <parameter name='leverage' value='12'></parameter>
         </bank>",
    );
    let mut params = Parameters::new();
    params.insert("r".to_string(), Scalar::Float(0.01));
    params.insert("label".to_string(), Scalar::from("alpha"));
    let mut agent = Bank::new("bank1", params, StateVariables::new()).unwrap();

    agent
        .load_parameters_from_file(file.path(), &AgentRegistry::new())
        .unwrap();

    assert_eq!(agent.parameters().get("r"), Some(&Scalar::Float(0.05)));
    assert_eq!(agent.parameters().get("leverage"), Some(&Scalar::Float(12.0)));
    assert_eq!(agent.parameters().get("label"), Some(&Scalar::from("alpha")));
}

#[test]
fn test_load_parameters_non_numeric_value_changes_nothing() {
    let file = write_file(
        "<bank identifier='bank9'>
           <parameter name='r' value='0.05'></parameter>
           <parameter name='leverage' value='lots'></parameter>
         </bank>",
    );
    let mut agent = bank("bank1");

    let err = agent
        .load_parameters_from_file(file.path(), &AgentRegistry::new())
        .unwrap_err();

    assert!(matches!(err, ConfigError::Malformed { .. }));
    assert_eq!(agent.identifier(), "bank1");
    assert!(agent.parameters().is_empty());
}

#[test]
fn test_load_parameters_empty_identifier_is_rejected() {
    let file = write_file("<bank identifier=''></bank>");
    let mut agent = bank("bank1");

    let err = agent
        .load_parameters_from_file(file.path(), &AgentRegistry::new())
        .unwrap_err();

    assert!(matches!(err, ConfigError::Agent(_)));
    assert_eq!(agent.identifier(), "bank1");
}

#[test]
fn test_load_parameters_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut agent = bank("bank1");

    let err = agent
        .load_parameters_from_file(&dir.path().join("bank1.xml"), &AgentRegistry::new())
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn test_zero_parameters_is_distinguishable_from_failure() {
    let file = write_file("<bank identifier='bank1'></bank>");
    let mut agent = bank("bank1");

    let outcome = agent
        .load_parameters_from_file(file.path(), &AgentRegistry::new())
        .unwrap();
    assert_eq!(outcome.entries, 0);
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_load_transactions_reaches_both_ledgers() {
    let file = write_file(DEPOSIT_FILE);
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(household("household1"))).unwrap();
    let mut agent = bank("bank1");

    let outcome = agent
        .load_transactions_from_file(file.path(), &mut registry)
        .unwrap();
    assert_eq!(outcome.entries, 1);

    let own = agent.accounts().iter().next().unwrap().clone();
    assert_eq!(own.type_(), "deposits");
    assert_eq!(own.from(), "bank1");
    assert_eq!(own.to(), "household1");
    assert_eq!(own.amount(), 30.0);
    assert_eq!(own.interest(), 0.02);
    assert_eq!(own.maturity(), 0.0);
    assert_eq!(own.time_of_default(), -1.0);
    assert!(!own.is_defaulted());

    let counterparty = registry.get("household1").unwrap();
    assert_eq!(counterparty.accounts().len(), 1);
    assert!(counterparty.accounts().contains(own.id()));
}

#[test]
fn test_load_transactions_unknown_agent_changes_nothing() {
    let file = write_file(
        "<transactions>
           <transaction type='deposits' asset='' from='bank1' to='household1' amount='30' interest='0.02' maturity='0' time_of_default='-1'></transaction>
           <transaction type='loans' asset='' from='bank1' to='household2' amount='10' interest='0.05' maturity='4' time_of_default='-1'></transaction>
         </transactions>",
    );
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(household("household1"))).unwrap();
    let mut agent = bank("bank1");

    let err = agent
        .load_transactions_from_file(file.path(), &mut registry)
        .unwrap_err();

    match err {
        ConfigError::Environment(EnvironmentError::UnknownAgent { identifier }) => {
            assert_eq!(identifier, "household2")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(agent.accounts().is_empty());
    assert!(registry.get("household1").unwrap().accounts().is_empty());
}

#[test]
fn test_registry_loads_transactions_for_registered_agent() {
    let file = write_file(DEPOSIT_FILE);
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(bank("bank1"))).unwrap();
    registry.register(Box::new(household("household1"))).unwrap();

    registry
        .load_agent_transactions("bank1", file.path())
        .unwrap();

    let ids: Vec<&str> = registry.agent_ids().collect();
    assert_eq!(ids, vec!["bank1", "household1"]);
    assert_eq!(registry.get("bank1").unwrap().get_account("deposits"), 30.0);
    assert_eq!(registry.get("household1").unwrap().get_account("deposits"), 30.0);
}

#[test]
fn test_registry_level_load() {
    let file = write_file(DEPOSIT_FILE);
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(bank("bank1"))).unwrap();
    registry.register(Box::new(household("household1"))).unwrap();

    let outcome = registry.load_transactions_from_file(file.path()).unwrap();

    assert_eq!(outcome.entries, 1);
    assert_eq!(
        registry
            .get("household1")
            .unwrap()
            .get_account_num_transactions("deposits"),
        1
    );
}

#[test]
fn test_load_agent_transactions_unknown_agent() {
    let mut registry = AgentRegistry::new();
    let err = registry
        .load_agent_transactions("bank1", Path::new("unused.xml"))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Environment(EnvironmentError::UnknownAgent { .. })
    ));
}

#[test]
fn test_non_finite_amount_is_rejected() {
    let file = write_file(
        "<transactions>
           <transaction type='deposits' asset='' from='bank1' to='household1' amount='NaN' interest='0.02' maturity='0' time_of_default='-1'></transaction>
         </transactions>",
    );
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(bank("bank1"))).unwrap();
    registry.register(Box::new(household("household1"))).unwrap();

    let err = registry.load_transactions_from_file(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Malformed { .. }));
    assert!(registry.get("bank1").unwrap().accounts().is_empty());
}

#[test]
fn test_malformed_transaction_file() {
    let file = write_file("<transactions><transaction type='loans'></transactions>");
    let mut registry = AgentRegistry::new();
    let mut agent = bank("bank1");

    let err = agent
        .load_transactions_from_file(file.path(), &mut registry)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { .. }));
}
