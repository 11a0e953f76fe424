//! Agent serializer
//!
//! Renders an agent's identifier, parameters and state variables as a
//! line-oriented nested tag block:
//!
//! ```text
//!   <agent identifier='bank1'>
//!     <parameter type='agent' name='r' value='0.02'></parameter>
//!     <variable name='x' value='1.5'></variable>
//!     <variable name='y' value='[2,3]'></variable>
//!   </agent>
//! ```
//!
//! Output follows map insertion order. Values are written verbatim, without
//! escaping.

use crate::models::agent::AgentCore;

/// Render an agent core as a tag block, ending with a newline
///
/// # Example
/// ```
/// use econ_agent_core::{render::render_agent, AgentCore, Parameters, StateValue, StateVariables};
///
/// let mut vars = StateVariables::new();
/// vars.insert("y".to_string(), StateValue::pair(2, 3));
/// let core = AgentCore::new("bank1", Parameters::new(), vars).unwrap();
///
/// assert_eq!(
///     render_agent(&core),
///     "  <agent identifier='bank1'>\n    <variable name='y' value='[2,3]'></variable>\n  </agent>\n"
/// );
/// ```
pub fn render_agent(core: &AgentCore) -> String {
    let mut out = format!("  <agent identifier='{}'>\n", core.identifier());

    for (name, value) in core.parameters() {
        out.push_str(&format!(
            "    <parameter type='agent' name='{}' value='{}'></parameter>\n",
            name, value
        ));
    }

    for (name, value) in core.state_variables() {
        out.push_str(&format!(
            "    <variable name='{}' value='{}'></variable>\n",
            name, value
        ));
    }

    out.push_str("  </agent>\n");
    out
}
