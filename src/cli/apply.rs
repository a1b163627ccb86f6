//! Evaluate a rule against one JSON document

use super::CliError;
use crate::{Evaluator, Record, Rule, Value};

/// Options for the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Rule JSON text
    pub rule: String,
    /// Data JSON text; `null` when absent
    pub data: Option<String>,
}

/// Translate the rule and evaluate it once against the data.
///
/// `log` output goes to stderr.
pub fn execute_apply(options: &ApplyOptions) -> Result<Value, CliError> {
    let rule = Rule::parse(&options.rule)?;

    let data = match &options.data {
        Some(text) => Value::from(serde_json::from_str::<serde_json::Value>(text)?),
        None => Value::Null,
    };

    let result = Evaluator::new().evaluate(rule.root(), &Record::new(&data))?;
    Ok(result)
}
