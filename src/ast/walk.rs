//! Postorder (S-attributed) traversal over a translated rule.
//!
//! A [`Visitor`] computes one attribute per node from the already computed
//! attributes of that node's children. Only evaluated operands are children,
//! so operands dropped by an arity cap are never visited.

use crate::ast::expressions::Expr;
use crate::ast::operators::{NodeKind, OpKind};
use crate::value::Value;

pub trait Visitor {
    type Output;

    fn visit_operator(&mut self, node: &Expr, children: Vec<Self::Output>) -> Self::Output;

    fn visit_value(&mut self, value: &Value) -> Self::Output;

    /// Forwards each concrete kind to its structural category. Override to
    /// handle particular kinds and fall back to this for the rest.
    fn visit(&mut self, node: &Expr, children: Vec<Self::Output>) -> Self::Output {
        match node {
            Expr::Value(v) => self.visit_value(v),
            _ => self.visit_operator(node, children),
        }
    }
}

/// Visits every child of `expr` (left to right, recursively), then `expr`.
pub fn postorder<V: Visitor>(expr: &Expr, visitor: &mut V) -> V::Output {
    let children = expr.children().map(|c| postorder(c, visitor)).collect();
    visitor.visit(expr, children)
}

pub struct Depth;

impl Visitor for Depth {
    type Output = usize;

    fn visit_operator(&mut self, _node: &Expr, children: Vec<usize>) -> usize {
        1 + children.into_iter().max().unwrap_or(0)
    }

    fn visit_value(&mut self, _value: &Value) -> usize {
        1
    }
}

pub struct NodeCount;

impl Visitor for NodeCount {
    type Output = usize;

    fn visit_operator(&mut self, _node: &Expr, children: Vec<usize>) -> usize {
        1 + children.into_iter().sum::<usize>()
    }

    fn visit_value(&mut self, _value: &Value) -> usize {
        1
    }
}

/// Rebuilds rule JSON bottom-up.
pub struct ToJson;

impl Visitor for ToJson {
    type Output = serde_json::Value;

    fn visit_operator(&mut self, node: &Expr, children: Vec<serde_json::Value>) -> serde_json::Value {
        match node.kind() {
            NodeKind::Operator(OpKind::Array) => serde_json::Value::Array(children),
            kind => {
                let mut object = serde_json::Map::new();
                object.insert(kind.name().to_string(), serde_json::Value::Array(children));
                serde_json::Value::Object(object)
            }
        }
    }

    fn visit_value(&mut self, value: &Value) -> serde_json::Value {
        value.clone().into()
    }
}
