//! Tests for the agent identity and parameter store
//!
//! Covers construction, identifier validation and the merge semantics of
//! parameters and state variables.

use econ_agent_core::{
    AgentError, AgentKind, Bank, EconomicAgent, Household, Parameters, Scalar, StateValue,
    StateVariables,
};
use proptest::prelude::*;

fn params(entries: &[(&str, f64)]) -> Parameters {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Scalar::Float(*v)))
        .collect()
}

#[test]
fn test_bank_new() {
    let bank = Bank::new("bank1", params(&[("r", 0.02)]), StateVariables::new()).unwrap();

    assert_eq!(bank.identifier(), "bank1");
    assert_eq!(bank.kind(), AgentKind::Bank);
    assert_eq!(bank.parameters().get("r"), Some(&Scalar::Float(0.02)));
    assert!(bank.state_variables().is_empty());
    assert!(bank.accounts().is_empty());
}

#[test]
fn test_construction_validates_identifier() {
    let err = Household::new("", Parameters::new(), StateVariables::new()).unwrap_err();
    assert_eq!(err, AgentError::EmptyIdentifier);
}

#[test]
fn test_set_identifier_failure_keeps_previous() {
    let mut bank = Bank::new("bank1", Parameters::new(), StateVariables::new()).unwrap();

    let err = bank.set_identifier(String::new()).unwrap_err();
    assert_eq!(err, AgentError::EmptyIdentifier);
    assert_eq!(bank.identifier(), "bank1");
}

#[test]
fn test_set_parameters_replaces_whole_map() {
    let mut bank = Bank::new("bank1", params(&[("r", 0.02)]), StateVariables::new()).unwrap();
    bank.set_parameters(params(&[("leverage", 10.0)]));

    assert_eq!(bank.parameters(), &params(&[("leverage", 10.0)]));
}

#[test]
fn test_append_parameters_overwrites_on_collision() {
    let mut bank = Bank::new(
        "bank1",
        params(&[("r", 0.02), ("leverage", 10.0)]),
        StateVariables::new(),
    )
    .unwrap();
    bank.append_parameters(params(&[("r", 0.03), ("reserve_ratio", 0.1)]));

    assert_eq!(
        bank.parameters(),
        &params(&[("r", 0.03), ("leverage", 10.0), ("reserve_ratio", 0.1)])
    );
}

#[test]
fn test_append_state_variables() {
    let mut vars = StateVariables::new();
    vars.insert("x".to_string(), StateValue::from(1.5));
    let mut household = Household::new("household1", Parameters::new(), vars).unwrap();

    let mut more = StateVariables::new();
    more.insert("y".to_string(), StateValue::pair(2, 3));
    household.append_state_variables(more);

    assert_eq!(household.state_variables().len(), 2);
    assert_eq!(
        household.state_variables().get("y"),
        Some(&StateValue::pair(2, 3))
    );
}

#[test]
fn test_agents_as_trait_objects() {
    let agents: Vec<Box<dyn EconomicAgent>> = vec![
        Box::new(Bank::new("bank1", Parameters::new(), StateVariables::new()).unwrap()),
        Box::new(Household::new("household1", Parameters::new(), StateVariables::new()).unwrap()),
    ];

    let kinds: Vec<AgentKind> = agents.iter().map(|a| a.kind()).collect();
    assert_eq!(kinds, vec![AgentKind::Bank, AgentKind::Household]);
}

proptest! {
    #[test]
    fn prop_append_parameters_is_map_update(
        base in proptest::collection::btree_map("[a-e]", -1.0e6f64..1.0e6, 0..6),
        extra in proptest::collection::btree_map("[c-h]", -1.0e6f64..1.0e6, 0..6),
    ) {
        let base: Parameters = base.into_iter().map(|(k, v)| (k, Scalar::Float(v))).collect();
        let extra: Parameters = extra.into_iter().map(|(k, v)| (k, Scalar::Float(v))).collect();

        let mut bank = Bank::new("bank1", base.clone(), StateVariables::new()).unwrap();
        bank.append_parameters(extra.clone());

        for (key, value) in &extra {
            prop_assert_eq!(bank.parameters().get(key), Some(value));
        }
        for (key, value) in base.iter().filter(|(k, _)| !extra.contains_key(*k)) {
            prop_assert_eq!(bank.parameters().get(key), Some(value));
        }
        let expected_len = base.len() + extra.keys().filter(|k| !base.contains_key(*k)).count();
        prop_assert_eq!(bank.parameters().len(), expected_len);
    }
}
