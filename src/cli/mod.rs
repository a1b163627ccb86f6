//! CLI support for jsonlogic-engine
//!
//! Provides programmatic access to the `jsonlogic` subcommands so other tools
//! can embed rule checking and record selection.

mod apply;
mod check;
mod ops;
mod select;

pub use apply::{ApplyOptions, execute_apply};
pub use check::{CheckOptions, CheckResult, execute_check};
pub use ops::{OperatorInfo, operator_table, render_operator_table};
pub use select::{SelectOptions, SelectResult, execute_select};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Translation error: {0}")]
    Translate(#[from] crate::TranslateError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    /// JSON parsing error in the data
    #[error("Invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
