//! Operator reference for the `ops` subcommand

use crate::ast::{OPERATORS, OpKind};

/// One row of the operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub name: &'static str,
    pub kind: OpKind,
    pub min_operands: usize,
    /// `None` when every operand is evaluated
    pub arity_cap: Option<usize>,
}

/// Every operator name the translator accepts, in table order.
pub fn operator_table() -> Vec<OperatorInfo> {
    OPERATORS
        .iter()
        .map(|&(name, kind)| OperatorInfo {
            name,
            kind,
            min_operands: kind.min_operands(),
            arity_cap: kind.arity_cap(),
        })
        .collect()
}

/// Plain-text table, one operator per line.
pub fn render_operator_table() -> String {
    let mut out = String::from("OPERATOR  MIN  CAP\n");
    for info in operator_table() {
        let cap = match info.arity_cap {
            Some(cap) => cap.to_string(),
            None => "-".to_string(),
        };
        out.push_str(&format!("{:<8}  {:>3}  {:>3}\n", info.name, info.min_operands, cap));
    }
    out
}
