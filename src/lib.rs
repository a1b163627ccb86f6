pub mod ast;
pub mod bindings;
pub mod cli;
pub mod coerce;
pub mod evaluator;
pub mod output;
pub mod rule;
pub mod translate;
pub mod value;

pub use ast::{Expr, NodeKind, OpKind, Var};
pub use bindings::{Bindings, Positional, Record};
pub use evaluator::{EvalError, Evaluator, evaluate};
pub use output::{to_json, to_json_pretty};
pub use rule::{Error, Rule, apply};
pub use translate::{TranslateError, Translator};
pub use value::{Kind, Value};
