//! # Rule Abstract Syntax Tree
//!
//! A JsonLogic rule is JSON built from single-key operator objects, arrays,
//! and scalars:
//!
//! ```text
//! {"if": [{"<": [{"var": "x"}, 10]}, "small", "big"]}
//! ```
//!
//! Translation turns that JSON into an [`Expr`] tree once per rule; the tree
//! is then evaluated any number of times against different records.
//!
//! - **[expressions]** - the [`Expr`] sum type and the `var` node
//! - **[operators]** - operator kinds, the operator-name table, arity caps
//! - **[walk]** - postorder traversal used for bottom-up attributes
//!
//! ## Arity caps
//!
//! Every operator evaluates at most a fixed number of operands. Extra
//! operands are accepted in rule text and translated, then dropped:
//!
//! ```text
//! {"<": [1, 2, 3, 0, 0]}     // compares 1 < 2 < 3 only
//! {"!": [false, "ignored"]}  // negates false
//! ```
pub mod expressions;
pub mod operators;
pub mod walk;

pub use expressions::{Expr, Pattern, Var};
pub use operators::{
    ArithOp, ArrayOp, Category, EqualityOp, FoldOp, LogicOp, NodeKind, OPERATORS, OpKind,
    RelationalOp, ScanOp, UnaryOp,
};
