//! A translated rule and its free-variable table.

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::Expr,
    bindings::{Bindings, Record},
    evaluator::{EvalError, Evaluator},
    translate::{TranslateError, Translator},
    value::Value,
};

/// Either stage failing while applying a rule in one step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A rule ready for repeated evaluation.
///
/// `free_variables` lists every literal `var` name in first-use order; a
/// name's position is the slot that its `var` nodes carry. The empty name
/// (the whole record) is never listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    root: Expr,
    free_variables: Vec<String>,
    has_computed_names: bool,
}

impl Rule {
    pub fn translate(json: &serde_json::Value) -> Result<Self, TranslateError> {
        let mut translator = Translator::new();
        let root = translator.translate(json)?;
        let (free_variables, has_computed_names) = translator.into_parts();
        debug!(
            nodes = root.node_count(),
            depth = root.depth(),
            variables = free_variables.len(),
            computed = has_computed_names,
            "translated rule"
        );
        Ok(Rule {
            root,
            free_variables,
            has_computed_names,
        })
    }

    /// Parses rule text, then translates it.
    pub fn parse(text: &str) -> Result<Self, TranslateError> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| TranslateError::Json {
                message: e.to_string(),
                line: e.line(),
                column: e.column(),
            })?;
        Self::translate(&json)
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn free_variables(&self) -> &[String] {
        &self.free_variables
    }

    /// True if some `var` computes its name at evaluation time, in which case
    /// `free_variables` is not the complete set of names the rule may read.
    pub fn has_computed_names(&self) -> bool {
        self.has_computed_names
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.free_variables.iter().position(|n| n == name)
    }

    pub fn into_parts(self) -> (Expr, Vec<String>, bool) {
        (self.root, self.free_variables, self.has_computed_names)
    }

    /// Evaluates with `log` output going to stderr.
    pub fn evaluate(&self, bindings: &dyn Bindings) -> Result<Value, EvalError> {
        Evaluator::new().evaluate(&self.root, bindings)
    }
}

/// Translates `rule` and evaluates it once against `data`.
///
/// ```
/// use jsonlogic_engine::{apply, Value};
/// use serde_json::json;
///
/// let result = apply(&json!({"cat": ["Hello, ", {"var": "name"}]}), &json!({"name": "Ada"}));
/// assert_eq!(result, Ok(Value::from("Hello, Ada")));
/// ```
pub fn apply(rule: &serde_json::Value, data: &serde_json::Value) -> Result<Value, Error> {
    let rule = Rule::translate(rule)?;
    let data = Value::from(data);
    Ok(rule.evaluate(&Record::new(&data))?)
}
