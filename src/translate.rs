//! Translation of rule JSON into an [`Expr`] tree.
//!
//! Translation is all-or-nothing: any unknown operator or malformed operator
//! object aborts it, and no partial tree is returned. An operator with too
//! few operands is still a valid rule; it only faults if it is evaluated.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::ast::{
    ArithOp, ArrayOp, EqualityOp, Expr, FoldOp, LogicOp, OpKind, Pattern, RelationalOp, ScanOp,
    UnaryOp, Var,
};
use crate::value::Value;

/// Errors raised while translating rule JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("unknown operator \"{0}\"")]
    UnknownOperator(String),

    /// An object used as an operator must have exactly one key
    #[error("operator object must have exactly one key, found {0}")]
    MalformedOperator(usize),

    #[error("invalid regex pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Rule text that is not JSON; `line` and `column` are 1-based
    #[error("invalid rule JSON: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },
}

/// Translates rule JSON and builds the free-variable table along the way.
///
/// One translator is used for one rule: every literal `var` name gets the
/// next unused slot on first use, and later uses of the same name share it.
#[derive(Debug, Default)]
pub struct Translator {
    slots: HashMap<String, usize>,
    names: Vec<String>,
    has_computed_names: bool,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free variables in first-use order.
    pub fn free_variables(&self) -> &[String] {
        &self.names
    }

    /// True once any `var` used a name that is not a literal string.
    pub fn has_computed_names(&self) -> bool {
        self.has_computed_names
    }

    pub fn into_parts(self) -> (Vec<String>, bool) {
        (self.names, self.has_computed_names)
    }

    pub fn translate(&mut self, json: &serde_json::Value) -> Result<Expr, TranslateError> {
        match json {
            serde_json::Value::Object(object) => {
                if object.len() != 1 {
                    return Err(TranslateError::MalformedOperator(object.len()));
                }
                let Some((name, operands)) = object.iter().next() else {
                    return Err(TranslateError::MalformedOperator(0));
                };
                let kind = OpKind::from_name(name)
                    .ok_or_else(|| TranslateError::UnknownOperator(name.clone()))?;
                let operands = self.translate_operands(operands)?;
                self.build(kind, operands)
            }
            serde_json::Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| self.translate(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Array(elements))
            }
            scalar => Ok(Expr::Value(Value::from(scalar))),
        }
    }

    /// An array value is the operand list; anything else is a single operand.
    fn translate_operands(&mut self, json: &serde_json::Value) -> Result<Vec<Expr>, TranslateError> {
        match json {
            serde_json::Value::Array(items) => items.iter().map(|item| self.translate(item)).collect(),
            single => Ok(vec![self.translate(single)?]),
        }
    }

    fn build(&mut self, kind: OpKind, mut operands: Vec<Expr>) -> Result<Expr, TranslateError> {
        if operands.len() < kind.min_operands() {
            return Ok(Expr::Incomplete { op: kind, operands });
        }
        if let Some(cap) = kind.arity_cap() {
            operands.truncate(cap);
        }

        let mut ops = Operands {
            inner: operands.into_iter(),
        };

        let expr = match kind {
            OpKind::Eq => equality(EqualityOp::Eq, &mut ops),
            OpKind::StrictEq => equality(EqualityOp::StrictEq, &mut ops),
            OpKind::Neq => equality(EqualityOp::Neq, &mut ops),
            OpKind::StrictNeq => equality(EqualityOp::StrictNeq, &mut ops),
            OpKind::Less => relational(RelationalOp::Less, &mut ops),
            OpKind::Greater => relational(RelationalOp::Greater, &mut ops),
            OpKind::Leq => relational(RelationalOp::Leq, &mut ops),
            OpKind::Geq => relational(RelationalOp::Geq, &mut ops),
            OpKind::Not => unary(UnaryOp::Not, &mut ops),
            OpKind::NotNot => unary(UnaryOp::NotNot, &mut ops),
            OpKind::Log => unary(UnaryOp::Log, &mut ops),
            OpKind::And => Expr::Logic {
                op: LogicOp::And,
                operands: ops.rest(),
            },
            OpKind::Or => Expr::Logic {
                op: LogicOp::Or,
                operands: ops.rest(),
            },
            OpKind::If => Expr::If(ops.rest()),
            OpKind::Add => fold(FoldOp::Add, ops),
            OpKind::Mul => fold(FoldOp::Mul, ops),
            OpKind::Min => fold(FoldOp::Min, ops),
            OpKind::Max => fold(FoldOp::Max, ops),
            OpKind::Cat => fold(FoldOp::Cat, ops),
            OpKind::Merge => fold(FoldOp::Merge, ops),
            OpKind::Sub => arith(ArithOp::Sub, ops),
            OpKind::Div => arith(ArithOp::Div, ops),
            OpKind::Mod => arith(ArithOp::Mod, ops),
            OpKind::In => Expr::In(ops.rest()),
            OpKind::Substr => Expr::Substr {
                string: ops.required(),
                start: ops.optional(),
                length: ops.optional(),
            },
            OpKind::Regex => {
                let pattern = ops.required();
                let subject = ops.required();
                let compiled = match &*pattern {
                    Expr::Value(Value::String(text)) => Some(compile_pattern(text)?),
                    _ => None,
                };
                Expr::Regex {
                    pattern,
                    subject,
                    compiled,
                }
            }
            OpKind::Map => iterate(ArrayOp::Map, &mut ops),
            OpKind::Filter => iterate(ArrayOp::Filter, &mut ops),
            OpKind::Reduce => Expr::Reduce {
                array: ops.required(),
                body: ops.required(),
                initial: ops.optional(),
            },
            OpKind::All => scan(ScanOp::All, &mut ops),
            OpKind::None => scan(ScanOp::None, &mut ops),
            OpKind::Some => scan(ScanOp::Some, &mut ops),
            OpKind::Var => {
                let name = ops
                    .optional()
                    .unwrap_or_else(|| Box::new(Expr::Value(Value::String(String::new()))));
                let slot = self.register(&name);
                Expr::Var(Var { name, slot })
            }
            OpKind::Array => Expr::Array(ops.rest()),
        };
        Ok(expr)
    }

    /// Assigns a slot to a literal variable name. The empty name and null
    /// both mean "the whole record" and never enter the table.
    fn register(&mut self, name: &Expr) -> Option<usize> {
        match name {
            Expr::Value(Value::Null) => None,
            Expr::Value(Value::String(name)) if name.is_empty() => None,
            Expr::Value(Value::String(name)) => {
                if let Some(slot) = self.slots.get(name) {
                    return Some(*slot);
                }
                let slot = self.names.len();
                self.slots.insert(name.clone(), slot);
                self.names.push(name.clone());
                Some(slot)
            }
            _ => {
                self.has_computed_names = true;
                None
            }
        }
    }
}

fn compile_pattern(text: &str) -> Result<Pattern, TranslateError> {
    Regex::new(text)
        .map(Pattern)
        .map_err(|e| TranslateError::InvalidPattern {
            pattern: text.to_string(),
            message: e.to_string(),
        })
}

/// Operand list of one operator, already capped and holding at least
/// `min_operands` entries.
struct Operands {
    inner: std::vec::IntoIter<Expr>,
}

impl Operands {
    /// Next mandatory operand. `build` checks the count up front, so the null
    /// filler is never reached.
    fn required(&mut self) -> Box<Expr> {
        Box::new(self.inner.next().unwrap_or(Expr::Value(Value::Null)))
    }

    fn optional(&mut self) -> Option<Box<Expr>> {
        self.inner.next().map(Box::new)
    }

    fn rest(&mut self) -> Vec<Expr> {
        self.inner.by_ref().collect()
    }
}

fn unary(op: UnaryOp, ops: &mut Operands) -> Expr {
    Expr::Unary {
        op,
        operand: ops.required(),
    }
}

fn equality(op: EqualityOp, ops: &mut Operands) -> Expr {
    Expr::Equality {
        op,
        lhs: ops.required(),
        rhs: ops.required(),
    }
}

fn relational(op: RelationalOp, ops: &mut Operands) -> Expr {
    Expr::Relational {
        op,
        first: ops.required(),
        second: ops.required(),
        third: ops.optional(),
    }
}

/// With a single operand the left side is an implicit `0`.
fn arith(op: ArithOp, mut ops: Operands) -> Expr {
    let first = ops.required();
    match ops.optional() {
        Some(rhs) => Expr::Arith {
            op,
            lhs: Some(first),
            rhs,
        },
        None => Expr::Arith {
            op,
            lhs: None,
            rhs: first,
        },
    }
}

fn fold(op: FoldOp, mut ops: Operands) -> Expr {
    Expr::Fold {
        op,
        operands: ops.rest(),
    }
}

fn iterate(op: ArrayOp, ops: &mut Operands) -> Expr {
    Expr::Iterate {
        op,
        array: ops.required(),
        body: ops.required(),
    }
}

fn scan(op: ScanOp, ops: &mut Operands) -> Expr {
    Expr::Scan {
        op,
        array: ops.required(),
        predicate: ops.required(),
    }
}
