use std::fmt;

use regex::Regex;

use crate::ast::operators::{
    ArithOp, ArrayOp, EqualityOp, FoldOp, LogicOp, NodeKind, OpKind, RelationalOp, ScanOp,
    UnaryOp,
};
use crate::value::Value;

/// A translated rule node.
///
/// Operator variants own their operands exclusively; the tree has no sharing
/// and no cycles. Fixed-arity operators keep fixed operand slots, so operands
/// beyond an operator's arity cap never reach the tree. The tree is never
/// mutated after translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal leaf
    Value(Value),

    /// Array literal; every element is evaluated
    Array(Vec<Expr>),

    /// Variable reference (`{"var": name}`)
    Var(Var),

    /// `!`, `!!`, `log`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// `==`, `===`, `!=`, `!==`
    Equality {
        op: EqualityOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `<`, `>`, `<=`, `>=` over two or three operands
    ///
    /// # Example
    /// ```text
    /// {"<": [1, {"var": "x"}, 10]}
    /// ```
    Relational {
        op: RelationalOp,
        first: Box<Expr>,
        second: Box<Expr>,
        third: Option<Box<Expr>>,
    },

    /// `-`, `/`, `%`; a missing left operand reads as `0`
    Arith {
        op: ArithOp,
        lhs: Option<Box<Expr>>,
        rhs: Box<Expr>,
    },

    /// `+`, `*`, `min`, `max`, `cat`, `merge`
    Fold { op: FoldOp, operands: Vec<Expr> },

    /// `and`, `or`
    Logic { op: LogicOp, operands: Vec<Expr> },

    /// `[cond, then, cond, then, ..., else]`
    If(Vec<Expr>),

    /// `[needle, haystack, ...]`; every operand is evaluated
    In(Vec<Expr>),

    Substr {
        string: Box<Expr>,
        start: Option<Box<Expr>>,
        length: Option<Box<Expr>>,
    },

    /// `[pattern, subject]`; a literal pattern is compiled during translation
    Regex {
        pattern: Box<Expr>,
        subject: Box<Expr>,
        compiled: Option<Pattern>,
    },

    /// `map`, `filter`
    Iterate {
        op: ArrayOp,
        array: Box<Expr>,
        body: Box<Expr>,
    },

    Reduce {
        array: Box<Expr>,
        body: Box<Expr>,
        initial: Option<Box<Expr>>,
    },

    /// `all`, `none`, `some`
    Scan {
        op: ScanOp,
        array: Box<Expr>,
        predicate: Box<Expr>,
    },

    /// An operator given fewer operands than it needs. The rule still
    /// translates; evaluating this node is a fault.
    Incomplete { op: OpKind, operands: Vec<Expr> },
}

/// A `var` node.
///
/// `slot` is the position of the name in the rule's free-variable table when
/// the name is a literal string, and `None` when the name is computed at
/// evaluation time (or is the empty "whole record" name).
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: Box<Expr>,
    pub slot: Option<usize>,
}

/// A regex compiled from a literal pattern.
#[derive(Debug, Clone)]
pub struct Pattern(pub Regex);

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        let op = match self {
            Expr::Value(v) => return NodeKind::Value(v.kind()),
            Expr::Array(_) => OpKind::Array,
            Expr::Var(_) => OpKind::Var,
            Expr::Unary { op, .. } => op.kind(),
            Expr::Equality { op, .. } => op.kind(),
            Expr::Relational { op, .. } => op.kind(),
            Expr::Arith { op, .. } => op.kind(),
            Expr::Fold { op, .. } => op.kind(),
            Expr::Logic { op, .. } => op.kind(),
            Expr::If(_) => OpKind::If,
            Expr::In(_) => OpKind::In,
            Expr::Substr { .. } => OpKind::Substr,
            Expr::Regex { .. } => OpKind::Regex,
            Expr::Iterate { op, .. } => op.kind(),
            Expr::Reduce { .. } => OpKind::Reduce,
            Expr::Scan { op, .. } => op.kind(),
            Expr::Incomplete { op, .. } => *op,
        };
        NodeKind::Operator(op)
    }

    /// The operands this node evaluates, in order. Value leaves have none.
    ///
    /// The iterator is double-ended, so `children().rev()` walks right to left.
    pub fn children(&self) -> std::vec::IntoIter<&Expr> {
        let list: Vec<&Expr> = match self {
            Expr::Value(_) => Vec::new(),
            Expr::Array(items)
            | Expr::Fold { operands: items, .. }
            | Expr::Logic { operands: items, .. }
            | Expr::If(items)
            | Expr::In(items)
            | Expr::Incomplete { operands: items, .. } => items.iter().collect(),
            Expr::Var(var) => vec![&*var.name],
            Expr::Unary { operand, .. } => vec![&**operand],
            Expr::Equality { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            Expr::Relational {
                first,
                second,
                third,
                ..
            } => [Some(first), Some(second), third.as_ref()]
                .into_iter()
                .flatten()
                .map(|e| &**e)
                .collect(),
            Expr::Arith { lhs, rhs, .. } => [lhs.as_ref(), Some(rhs)]
                .into_iter()
                .flatten()
                .map(|e| &**e)
                .collect(),
            Expr::Substr {
                string,
                start,
                length,
            } => [Some(string), start.as_ref(), length.as_ref()]
                .into_iter()
                .flatten()
                .map(|e| &**e)
                .collect(),
            Expr::Regex {
                pattern, subject, ..
            } => vec![&**pattern, &**subject],
            Expr::Iterate { array, body, .. } => vec![&**array, &**body],
            Expr::Reduce {
                array,
                body,
                initial,
            } => [Some(array), Some(body), initial.as_ref()]
                .into_iter()
                .flatten()
                .map(|e| &**e)
                .collect(),
            Expr::Scan {
                array, predicate, ..
            } => vec![&**array, &**predicate],
        };
        list.into_iter()
    }

    /// Longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        crate::ast::walk::postorder(self, &mut crate::ast::walk::Depth)
    }

    pub fn node_count(&self) -> usize {
        crate::ast::walk::postorder(self, &mut crate::ast::walk::NodeCount)
    }

    /// Re-serializes the tree as rule JSON.
    ///
    /// The result is the normalized form: operands dropped by an arity cap do
    /// not reappear, and every operator lists its operands as an array.
    pub fn to_json(&self) -> serde_json::Value {
        crate::ast::walk::postorder(self, &mut crate::ast::walk::ToJson)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
