//! Parsing of configuration documents
//!
//! Works on document text; file access lives in the parent module.

use crate::models::transaction::TransactionSpec;
use roxmltree::{Document, Node};
use thiserror::Error;

/// Errors in the content of a configuration document
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("invalid markup: {0}")]
    Syntax(String),

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("attribute '{attribute}' of <{element}> is not a number: '{value}'")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },
}

/// Contents of a parameter file
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDocument {
    /// Identifier carried by the root element
    pub identifier: String,

    /// `(name, value)` pairs in document order
    pub parameters: Vec<(String, f64)>,
}

/// Parse a parameter document
///
/// The root element may have any name; only its `identifier` attribute and
/// its direct `<parameter>` children are read.
///
/// # Example
/// ```
/// use econ_agent_core::config::parse_parameter_document;
///
/// let doc = parse_parameter_document(
///     "<bank identifier='bank1'><parameter name='r' value='0.02'></parameter></bank>",
/// )
/// .unwrap();
/// assert_eq!(doc.identifier, "bank1");
/// assert_eq!(doc.parameters, vec![("r".to_string(), 0.02)]);
/// ```
pub fn parse_parameter_document(text: &str) -> Result<ParameterDocument, DocumentError> {
    let document = Document::parse(text).map_err(|e| DocumentError::Syntax(e.to_string()))?;
    let root = document.root_element();

    let identifier = attribute(root, "identifier")?.to_string();

    let parameters = root
        .children()
        .filter(|node| node.has_tag_name("parameter"))
        .map(|node| Ok((attribute(node, "name")?.to_string(), number(node, "value")?)))
        .collect::<Result<Vec<_>, DocumentError>>()?;

    Ok(ParameterDocument {
        identifier,
        parameters,
    })
}

/// Parse a transaction document
///
/// Only direct `<transaction>` children of the root are read.
pub fn parse_transaction_document(text: &str) -> Result<Vec<TransactionSpec>, DocumentError> {
    let document = Document::parse(text).map_err(|e| DocumentError::Syntax(e.to_string()))?;

    document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("transaction"))
        .map(|node| {
            Ok(TransactionSpec {
                type_: attribute(node, "type")?.to_string(),
                asset: attribute(node, "asset")?.to_string(),
                from: attribute(node, "from")?.to_string(),
                to: attribute(node, "to")?.to_string(),
                amount: number(node, "amount")?,
                interest: number(node, "interest")?,
                maturity: number(node, "maturity")?,
                time_of_default: number(node, "time_of_default")?,
            })
        })
        .collect()
}

fn attribute<'a>(node: Node<'a, '_>, name: &'static str) -> Result<&'a str, DocumentError> {
    node.attribute(name)
        .ok_or_else(|| DocumentError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name,
        })
}

/// Finite float value of an attribute; NaN and infinities are rejected
fn number(node: Node<'_, '_>, name: &'static str) -> Result<f64, DocumentError> {
    let raw = attribute(node, name)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DocumentError::InvalidNumber {
            element: node.tag_name().name().to_string(),
            attribute: name,
            value: raw.to_string(),
        })
}
