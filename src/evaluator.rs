use std::collections::HashMap;
use std::io::{self, Write};

use regex::Regex;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{
    ast::{ArithOp, ArrayOp, EqualityOp, Expr, FoldOp, LogicOp, RelationalOp, ScanOp, UnaryOp, Var},
    bindings::{Bindings, Record},
    coerce::{self, ArithPair, ComparePair, NumPair},
    output::to_json,
    value::Value,
};

/// Errors that abort the evaluation of a rule.
///
/// None of them leave a partial result behind; the host decides what a
/// faulting record means (skip it, or fail the whole run).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// An operand kind lies outside the operator family's domain
    #[error("type error: \"{op}\" is not defined for {found}")]
    Type { op: &'static str, found: String },

    /// A string operand could not be parsed as the required number kind
    #[error("cannot convert {value:?} to {target}")]
    Coercion { value: String, target: &'static str },

    /// Signed and unsigned integers that have no common representation
    #[error("\"{op}\": unable to consolidate {detail}")]
    Range { op: &'static str, detail: String },

    #[error("invalid regex pattern {pattern:?}: {message}")]
    Regex { pattern: String, message: String },

    /// An operator reached with fewer operands than it needs
    #[error("\"{op}\" expects at least {min} operand(s), found {found}")]
    Arity {
        op: &'static str,
        min: usize,
        found: usize,
    },
}

/// Evaluates translated rules.
///
/// The tree is only read. The evaluator itself holds the diagnostic sink for
/// the `log` operator (stderr unless another writer is installed), so one
/// evaluator can be reused across records and different bindings.
///
/// # Examples
///
/// ```
/// use jsonlogic_engine::{Evaluator, Record, Rule, Value};
/// use serde_json::json;
///
/// let rule = Rule::translate(&json!({"<": [{"var": "x"}, 10]})).unwrap();
/// let data = Value::from(json!({"x": 5}));
///
/// let mut evaluator = Evaluator::new();
/// let result = evaluator.evaluate(rule.root(), &Record::new(&data)).unwrap();
/// assert_eq!(result, Value::Bool(true));
/// ```
pub struct Evaluator<W = io::Stderr> {
    log: W,
}

impl Evaluator<io::Stderr> {
    pub fn new() -> Self {
        Evaluator { log: io::stderr() }
    }
}

impl Default for Evaluator<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Evaluator<W> {
    /// Uses `log` as the sink for the `log` operator.
    pub fn with_log(log: W) -> Self {
        Evaluator { log }
    }

    pub fn into_log(self) -> W {
        self.log
    }

    pub fn evaluate(&mut self, expr: &Expr, bindings: &dyn Bindings) -> Result<Value, EvalError> {
        self.eval(expr, bindings)
    }

    fn eval(&mut self, expr: &Expr, bindings: &dyn Bindings) -> Result<Value, EvalError> {
        trace!(node = expr.kind().name(), "evaluating");
        match expr {
            Expr::Value(v) => Ok(v.clone()),
            Expr::Array(items) => self.eval_all(items, bindings).map(Value::Array),
            Expr::Var(var) => self.eval_var(var, bindings),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, bindings)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!truthy("!", &value)?)),
                    UnaryOp::NotNot => Ok(Value::Bool(truthy("!!", &value)?)),
                    UnaryOp::Log => {
                        self.write_log(&value);
                        Ok(value)
                    }
                }
            }
            Expr::Equality { op, lhs, rhs } => {
                let lhs = self.eval(lhs, bindings)?;
                let rhs = self.eval(rhs, bindings)?;
                let result = match op {
                    EqualityOp::Eq => loose_eq("==", &lhs, &rhs)?,
                    EqualityOp::Neq => !loose_eq("!=", &lhs, &rhs)?,
                    EqualityOp::StrictEq => coerce::strict_eq(&lhs, &rhs),
                    EqualityOp::StrictNeq => !coerce::strict_eq(&lhs, &rhs),
                };
                Ok(Value::Bool(result))
            }
            Expr::Relational {
                op,
                first,
                second,
                third,
            } => {
                let first = self.eval(first, bindings)?;
                let second = self.eval(second, bindings)?;
                if !compare(*op, &first, &second)? {
                    return Ok(Value::Bool(false));
                }
                match third {
                    Some(third) => {
                        let third = self.eval(third, bindings)?;
                        Ok(Value::Bool(compare(*op, &second, &third)?))
                    }
                    None => Ok(Value::Bool(true)),
                }
            }
            Expr::Arith { op, lhs, rhs } => {
                let lhs = match lhs {
                    Some(lhs) => self.eval(lhs, bindings)?,
                    None => Value::Int(0),
                };
                let rhs = self.eval(rhs, bindings)?;
                match op {
                    ArithOp::Sub => arithmetic("-", &lhs, &rhs, sub),
                    ArithOp::Div => arithmetic("/", &lhs, &rhs, div),
                    ArithOp::Mod => modulo(&lhs, &rhs),
                }
            }
            Expr::Fold { op, operands } => self.eval_fold(*op, operands, bindings),
            Expr::Logic { op, operands } => {
                let stop_on = *op == LogicOp::Or;
                let name = match op {
                    LogicOp::And => "and",
                    LogicOp::Or => "or",
                };
                let mut last = Value::Null;
                for operand in operands {
                    last = self.eval(operand, bindings)?;
                    if truthy(name, &last)? == stop_on {
                        break;
                    }
                }
                Ok(last)
            }
            Expr::If(operands) => self.eval_if(operands, bindings),
            Expr::In(operands) => {
                match self.eval_all(operands, bindings)?.as_slice() {
                    [needle, haystack, ..] => contains(needle, haystack).map(Value::Bool),
                    short => Err(EvalError::Arity {
                        op: "in",
                        min: 2,
                        found: short.len(),
                    }),
                }
            }
            Expr::Substr {
                string,
                start,
                length,
            } => {
                let text = coerce::to_string("substr", &self.eval(string, bindings)?)?;
                let start = self.eval_optional_int("substr", start.as_deref(), bindings)?;
                let length = self.eval_optional_int("substr", length.as_deref(), bindings)?;
                Ok(Value::String(substr(&text, start.unwrap_or(0), length)))
            }
            Expr::Regex {
                pattern,
                subject,
                compiled,
            } => {
                let pattern = self.eval(pattern, bindings)?;
                let subject = coerce::to_string("regex", &self.eval(subject, bindings)?)?;
                let matched = match compiled {
                    Some(regex) => regex.0.is_match(&subject),
                    None => {
                        let text = coerce::to_string("regex", &pattern)?;
                        let regex = Regex::new(&text).map_err(|e| EvalError::Regex {
                            pattern: text,
                            message: e.to_string(),
                        })?;
                        regex.is_match(&subject)
                    }
                };
                Ok(Value::Bool(matched))
            }
            Expr::Iterate { op, array, body } => {
                let name = match op {
                    ArrayOp::Map => "map",
                    ArrayOp::Filter => "filter",
                };
                let items = self.eval_array(name, array, bindings)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let result = self.eval(body, &Record::new(&item))?;
                    match op {
                        ArrayOp::Map => out.push(result),
                        ArrayOp::Filter => {
                            if truthy(name, &result)? {
                                out.push(item);
                            }
                        }
                    }
                }
                Ok(Value::Array(out))
            }
            Expr::Reduce {
                array,
                body,
                initial,
            } => {
                let items = self.eval_array("reduce", array, bindings)?;
                let mut accumulator = match initial {
                    Some(initial) => self.eval(initial, bindings)?,
                    None => Value::Null,
                };
                for current in items {
                    let scope = Value::Object(HashMap::from([
                        ("current".to_string(), current),
                        ("accumulator".to_string(), accumulator),
                    ]));
                    accumulator = self.eval(body, &Record::new(&scope))?;
                }
                Ok(accumulator)
            }
            Expr::Scan {
                op,
                array,
                predicate,
            } => self.eval_scan(*op, array, predicate, bindings),
            Expr::Incomplete { op, operands } => Err(EvalError::Arity {
                op: op.name(),
                min: op.min_operands(),
                found: operands.len(),
            }),
        }
    }

    fn eval_all(&mut self, operands: &[Expr], bindings: &dyn Bindings) -> Result<Vec<Value>, EvalError> {
        operands
            .iter()
            .map(|operand| self.eval(operand, bindings))
            .collect()
    }

    /// The name operand is evaluated and turned into text; the slot cached at
    /// translation time travels along to the host.
    fn eval_var(&mut self, var: &Var, bindings: &dyn Bindings) -> Result<Value, EvalError> {
        let name = match self.eval(&var.name, bindings)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => coerce::to_string("var", &other)?,
        };
        Ok(bindings.lookup(&name, var.slot).unwrap_or(Value::Null))
    }

    fn eval_fold(&mut self, op: FoldOp, operands: &[Expr], bindings: &dyn Bindings) -> Result<Value, EvalError> {
        let name = match op {
            FoldOp::Add => "+",
            FoldOp::Mul => "*",
            FoldOp::Min => "min",
            FoldOp::Max => "max",
            FoldOp::Cat => "cat",
            FoldOp::Merge => "merge",
        };

        let mut acc: Option<Value> = None;
        for operand in operands {
            let value = self.eval(operand, bindings)?;
            let converted = match op {
                FoldOp::Cat => Value::String(coerce::to_string(name, &value)?),
                FoldOp::Merge => match value {
                    Value::Array(_) => value,
                    scalar => Value::Array(vec![scalar]),
                },
                _ => coerce::to_arithmetic(name, value)?,
            };

            acc = Some(match acc {
                None => converted,
                Some(lhs) => match op {
                    FoldOp::Add => arithmetic(name, &lhs, &converted, add)?,
                    FoldOp::Mul => arithmetic(name, &lhs, &converted, mul)?,
                    FoldOp::Min => arithmetic(name, &lhs, &converted, min)?,
                    FoldOp::Max => arithmetic(name, &lhs, &converted, max)?,
                    FoldOp::Cat => match (lhs, converted) {
                        (Value::String(mut a), Value::String(b)) => {
                            a.push_str(&b);
                            Value::String(a)
                        }
                        (a, b) => return Err(mismatch(name, &a, &b)),
                    },
                    FoldOp::Merge => match (lhs, converted) {
                        (Value::Array(mut a), Value::Array(b)) => {
                            a.extend(b);
                            Value::Array(a)
                        }
                        (a, b) => return Err(mismatch(name, &a, &b)),
                    },
                },
            });
        }
        Ok(acc.unwrap_or(Value::Null))
    }

    /// `[c1, t1, c2, t2, ..., else]`: the first truthy condition picks its
    /// branch; without a match the trailing else (or null) is the result.
    fn eval_if(&mut self, operands: &[Expr], bindings: &dyn Bindings) -> Result<Value, EvalError> {
        let mut pairs = operands.chunks_exact(2);
        for pair in pairs.by_ref() {
            let condition = self.eval(&pair[0], bindings)?;
            if truthy("if", &condition)? {
                return self.eval(&pair[1], bindings);
            }
        }
        match pairs.remainder() {
            [otherwise] => self.eval(otherwise, bindings),
            _ => Ok(Value::Null),
        }
    }

    fn eval_scan(
        &mut self,
        op: ScanOp,
        array: &Expr,
        predicate: &Expr,
        bindings: &dyn Bindings,
    ) -> Result<Value, EvalError> {
        let name = match op {
            ScanOp::All => "all",
            ScanOp::None => "none",
            ScanOp::Some => "some",
        };
        let items = self.eval_array(name, array, bindings)?;
        if op == ScanOp::All && items.is_empty() {
            return Ok(Value::Bool(false));
        }

        // all: stop at the first false; none/some: stop at the first true
        let stop_on = op != ScanOp::All;
        for item in &items {
            let result = self.eval(predicate, &Record::new(item))?;
            if truthy(name, &result)? == stop_on {
                return Ok(Value::Bool(op == ScanOp::Some));
            }
        }
        Ok(Value::Bool(op != ScanOp::Some))
    }

    /// Materializes the array operand of `map`, `filter`, `reduce` and the
    /// scans. null reads as an empty array.
    fn eval_array(&mut self, op: &'static str, array: &Expr, bindings: &dyn Bindings) -> Result<Vec<Value>, EvalError> {
        match self.eval(array, bindings)? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(EvalError::Type {
                op,
                found: other.kind().to_string(),
            }),
        }
    }

    fn eval_optional_int(
        &mut self,
        op: &'static str,
        operand: Option<&Expr>,
        bindings: &dyn Bindings,
    ) -> Result<Option<i64>, EvalError> {
        let Some(operand) = operand else {
            return Ok(None);
        };
        let value = match self.eval(operand, bindings)? {
            Value::Int(n) => n,
            Value::Uint(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Value::Double(n) => n.trunc() as i64,
            Value::String(s) => coerce::parse_int(&s)?,
            Value::Null => 0,
            other => {
                return Err(EvalError::Type {
                    op,
                    found: other.kind().to_string(),
                });
            }
        };
        Ok(Some(value))
    }

    fn write_log(&mut self, value: &Value) {
        if let Err(e) = writeln!(self.log, "{}", to_json(value)) {
            warn!(error = %e, "failed to write log operator output");
        }
    }
}

/// Evaluates `expr` with a fresh evaluator that logs to stderr.
pub fn evaluate(expr: &Expr, bindings: &dyn Bindings) -> Result<Value, EvalError> {
    Evaluator::new().evaluate(expr, bindings)
}

fn truthy(op: &'static str, value: &Value) -> Result<bool, EvalError> {
    value.is_truthy().ok_or_else(|| EvalError::Type {
        op,
        found: value.kind().to_string(),
    })
}

fn mismatch(op: &'static str, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::Type {
        op,
        found: format!("{} and {}", lhs.kind(), rhs.kind()),
    }
}

fn loose_eq(op: &'static str, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    Ok(match coerce::comparison_pair(op, lhs, rhs)? {
        ComparePair::Num(NumPair::Int(a, b)) => a == b,
        ComparePair::Num(NumPair::Uint(a, b)) => a == b,
        ComparePair::Num(NumPair::Double(a, b)) => a == b,
        ComparePair::Str(a, b) => a == b,
    })
}

fn compare(op: RelationalOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    let name = match op {
        RelationalOp::Less => "<",
        RelationalOp::Greater => ">",
        RelationalOp::Leq => "<=",
        RelationalOp::Geq => ">=",
    };
    let ordering = match coerce::comparison_pair(name, lhs, rhs)? {
        ComparePair::Num(NumPair::Int(a, b)) => a.partial_cmp(&b),
        ComparePair::Num(NumPair::Uint(a, b)) => a.partial_cmp(&b),
        ComparePair::Num(NumPair::Double(a, b)) => a.partial_cmp(&b),
        ComparePair::Str(a, b) => a.partial_cmp(b),
    };
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        RelationalOp::Less => ordering.is_lt(),
        RelationalOp::Greater => ordering.is_gt(),
        RelationalOp::Leq => ordering.is_le(),
        RelationalOp::Geq => ordering.is_ge(),
    })
}

/// Combines two arithmetic operands after coercion.
fn arithmetic(
    op: &'static str,
    lhs: &Value,
    rhs: &Value,
    combine: fn(NumPair) -> Value,
) -> Result<Value, EvalError> {
    match coerce::arithmetic_pair(op, lhs, rhs)? {
        ArithPair::Null => Ok(Value::Null),
        ArithPair::Num(pair) => Ok(combine(pair)),
    }
}

// Integer overflow falls back to double arithmetic.

fn add(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(a, b) => a.checked_add(b).map_or(Value::Double(a as f64 + b as f64), Value::Int),
        NumPair::Uint(a, b) => a.checked_add(b).map_or(Value::Double(a as f64 + b as f64), Value::from_u64),
        NumPair::Double(a, b) => Value::Double(a + b),
    }
}

fn sub(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(a, b) => a.checked_sub(b).map_or(Value::Double(a as f64 - b as f64), Value::Int),
        NumPair::Uint(a, b) => match a.checked_sub(b) {
            Some(n) => Value::from_u64(n),
            None => i64::try_from(b - a).map_or(Value::Double(a as f64 - b as f64), |n| Value::Int(-n)),
        },
        NumPair::Double(a, b) => Value::Double(a - b),
    }
}

fn mul(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(a, b) => a.checked_mul(b).map_or(Value::Double(a as f64 * b as f64), Value::Int),
        NumPair::Uint(a, b) => a.checked_mul(b).map_or(Value::Double(a as f64 * b as f64), Value::from_u64),
        NumPair::Double(a, b) => Value::Double(a * b),
    }
}

/// Exact integer division stays integral; anything else is a double.
/// Integer division by zero yields null, like `%`.
fn div(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(_, 0) | NumPair::Uint(_, 0) => Value::Null,
        NumPair::Int(a, b) => match (a.checked_rem(b), a.checked_div(b)) {
            (Some(0), Some(q)) => Value::Int(q),
            _ => Value::Double(a as f64 / b as f64),
        },
        NumPair::Uint(a, b) if a % b == 0 => Value::from_u64(a / b),
        NumPair::Uint(a, b) => Value::Double(a as f64 / b as f64),
        NumPair::Double(a, b) => Value::Double(a / b),
    }
}

fn min(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(a, b) => Value::Int(a.min(b)),
        NumPair::Uint(a, b) => Value::from_u64(a.min(b)),
        NumPair::Double(a, b) => Value::Double(a.min(b)),
    }
}

fn max(pair: NumPair) -> Value {
    match pair {
        NumPair::Int(a, b) => Value::Int(a.max(b)),
        NumPair::Uint(a, b) => Value::from_u64(a.max(b)),
        NumPair::Double(a, b) => Value::Double(a.max(b)),
    }
}

/// `%` is defined for integers only; a zero divisor yields null.
fn modulo(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    Ok(match coerce::integer_pair("%", lhs, rhs)? {
        NumPair::Int(_, 0) | NumPair::Uint(_, 0) => Value::Null,
        NumPair::Int(a, b) => a.checked_rem(b).map_or(Value::Int(0), Value::Int),
        NumPair::Uint(a, b) => Value::from_u64(a % b),
        NumPair::Double(..) => return Err(mismatch("%", lhs, rhs)),
    })
}

/// `in`: substring test for a string haystack, strict membership for an
/// array haystack; a null haystack contains nothing.
fn contains(needle: &Value, haystack: &Value) -> Result<bool, EvalError> {
    match haystack {
        Value::String(s) => Ok(s.contains(coerce::to_string("in", needle)?.as_str())),
        Value::Array(items) => Ok(items.iter().any(|item| coerce::strict_eq(needle, item))),
        Value::Null => Ok(false),
        other => Err(EvalError::Type {
            op: "in",
            found: other.kind().to_string(),
        }),
    }
}

/// Character-based substring. A negative start counts from the end, a
/// negative length drops that many characters from the end.
fn substr(text: &str, start: i64, length: Option<i64>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;
    let from = if start < 0 { (len + start).max(0) } else { start.min(len) };
    let to = match length {
        None => len,
        Some(n) if n < 0 => (len + n).max(from),
        Some(n) => from.saturating_add(n).min(len),
    };
    chars[from as usize..to as usize].iter().collect()
}
