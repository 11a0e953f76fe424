//! Typed parameter and state values
//!
//! Agent parameters are scalars; state variables are scalars or an ordered
//! pair of scalars. Both maps preserve insertion order so that rendering is
//! deterministic.
//!
//! Shape checks only happen at the deserialization boundary (JSON
//! checkpoints); everywhere else the type system rules out bad shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Static agent configuration, keyed by parameter name
pub type Parameters = IndexMap<String, Scalar>;

/// Mutable agent state, keyed by variable name
pub type StateVariables = IndexMap<String, StateValue>;

/// Errors raised when an untyped value is converted into a [`Scalar`] or [`StateValue`]
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("Type violation: expected {expected}, found {found}")]
    TypeViolation {
        expected: &'static str,
        found: String,
    },
}

/// A single int, float or string value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Numeric view of the scalar, `None` for strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Str(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            // Integral floats keep a trailing ".0" so 2.0 never renders like the int 2
            Scalar::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                write!(f, "{:.1}", v)
            }
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Int(v) => Value::from(v),
            // JSON has no NaN/inf; those degrade to null
            Scalar::Float(v) => serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Str(s) => Value::String(s),
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Scalar::Float(f))
                } else {
                    Err(type_violation("scalar (int, float or string)", &Value::Number(n)))
                }
            }
            Value::String(s) => Ok(Scalar::Str(s)),
            other => Err(type_violation("scalar (int, float or string)", &other)),
        }
    }
}

/// A state variable value: a scalar or a two-element ordered pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub enum StateValue {
    Scalar(Scalar),
    Pair(Scalar, Scalar),
}

impl StateValue {
    /// Build a pair value
    pub fn pair(first: impl Into<Scalar>, second: impl Into<Scalar>) -> Self {
        StateValue::Pair(first.into(), second.into())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            StateValue::Scalar(s) => Some(s),
            StateValue::Pair(..) => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Scalar(s) => write!(f, "{}", s),
            StateValue::Pair(a, b) => write!(f, "[{},{}]", a, b),
        }
    }
}

impl From<Scalar> for StateValue {
    fn from(v: Scalar) -> Self {
        StateValue::Scalar(v)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Scalar(v.into())
    }
}

impl From<i32> for StateValue {
    fn from(v: i32) -> Self {
        StateValue::Scalar(v.into())
    }
}

impl From<f64> for StateValue {
    fn from(v: f64) -> Self {
        StateValue::Scalar(v.into())
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue::Scalar(v.into())
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue::Scalar(v.into())
    }
}

impl From<StateValue> for Value {
    fn from(value: StateValue) -> Self {
        match value {
            StateValue::Scalar(s) => s.into(),
            StateValue::Pair(a, b) => Value::Array(vec![a.into(), b.into()]),
        }
    }
}

impl TryFrom<Value> for StateValue {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(a), Some(b)) => {
                        Ok(StateValue::Pair(Scalar::try_from(a)?, Scalar::try_from(b)?))
                    }
                    _ => Err(ValueError::TypeViolation {
                        expected: "two-element pair",
                        found: "short array".to_string(),
                    }),
                }
            }
            Value::Array(items) => Err(ValueError::TypeViolation {
                expected: "scalar or two-element pair",
                found: format!("array of {} elements", items.len()),
            }),
            other => {
                let found = json_kind(&other);
                Scalar::try_from(other)
                    .map(StateValue::Scalar)
                    .map_err(|_| ValueError::TypeViolation {
                        expected: "scalar or two-element pair",
                        found: found.to_string(),
                    })
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_violation(expected: &'static str, found: &Value) -> ValueError {
    ValueError::TypeViolation {
        expected,
        found: json_kind(found).to_string(),
    }
}
