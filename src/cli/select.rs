//! Select JSON-lines records by rule

use tracing::{debug, warn};

use super::CliError;
use crate::{Evaluator, Record, Rule, Value};

/// Options for the select command
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Rule JSON text
    pub rule: String,
    /// One JSON document per line; blank lines are ignored
    pub input: String,
}

/// Rows of a select run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    /// Input lines whose rule result is truthy, unchanged and in input order
    pub selected: Vec<String>,
    /// Rows that failed to parse or to evaluate
    pub skipped: usize,
}

/// Evaluate the rule against every row and keep the truthy ones.
///
/// Only an invalid rule fails the whole run. A row that is not valid JSON,
/// faults during evaluation, or yields an object (which has no truth value)
/// is excluded and reported at warn level.
pub fn execute_select(options: &SelectOptions) -> Result<SelectResult, CliError> {
    let rule = Rule::parse(&options.rule)?;
    let mut evaluator = Evaluator::new();
    let mut result = SelectResult::default();

    for (index, line) in options.input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = index + 1;

        let data = match serde_json::from_str::<serde_json::Value>(line) {
            Ok(json) => Value::from(json),
            Err(e) => {
                warn!(row, error = %e, "skipping row that is not valid JSON");
                result.skipped += 1;
                continue;
            }
        };

        let keep = match evaluator.evaluate(rule.root(), &Record::new(&data)) {
            Ok(value) => match value.is_truthy() {
                Some(keep) => keep,
                None => {
                    warn!(row, "rule result has no truth value");
                    result.skipped += 1;
                    continue;
                }
            },
            Err(e) => {
                warn!(row, error = %e, "skipping row that faulted");
                result.skipped += 1;
                continue;
            }
        };

        if keep {
            result.selected.push(line.to_string());
        }
    }

    debug!(
        selected = result.selected.len(),
        skipped = result.skipped,
        "select finished"
    );
    Ok(result)
}
