//! Translate a rule without evaluating it

use super::CliError;
use crate::Rule;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Rule JSON text
    pub rule: String,
}

/// What translation learned about a rule
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Literal variable names in slot order
    pub free_variables: Vec<String>,
    /// Some `var` computes its name at evaluation time
    pub has_computed_names: bool,
    pub node_count: usize,
    pub depth: usize,
    /// The translated rule written back as JSON, without operands beyond the
    /// arity caps
    pub normalized: serde_json::Value,
}

pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let rule = Rule::parse(&options.rule)?;
    let root = rule.root();

    Ok(CheckResult {
        free_variables: rule.free_variables().to_vec(),
        has_computed_names: rule.has_computed_names(),
        node_count: root.node_count(),
        depth: root.depth(),
        normalized: root.to_json(),
    })
}
