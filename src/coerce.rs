//! Operand coercion per operator family.
//!
//! Each family accepts a fixed set of value kinds and decides how two
//! operands of different kinds are brought to a common representation
//! before they are compared or combined:
//!
//! | family      | operators                         | domain                     |
//! |-------------|-----------------------------------|----------------------------|
//! | comparison  | `==` `!=` `<` `>` `<=` `>=`       | string, double, integer    |
//! | strict      | `===` `!==`                       | anything, no coercion      |
//! | arithmetic  | `+` `-` `*` `/` `min` `max`       | double, integer, null+null |
//! | integer     | `%`                               | integer                    |
//! | string      | `cat`                             | every scalar               |
//!
//! In the comparison family a string paired with a number is parsed into the
//! other operand's numeric kind; two strings compare as strings.

use tracing::warn;

use crate::evaluator::EvalError;
use crate::value::{Kind, Value};

/// Two numbers brought to the same representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumPair {
    Int(i64, i64),
    Uint(u64, u64),
    Double(f64, f64),
}

/// Operands of the comparison family after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparePair<'a> {
    Num(NumPair),
    Str(&'a str, &'a str),
}

/// Operands of the arithmetic family after coercion. Two nulls combine to
/// null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArithPair {
    Num(NumPair),
    Null,
}

fn type_error(op: &'static str, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::Type {
        op,
        found: format!("{} and {}", lhs.kind(), rhs.kind()),
    }
}

/// Pairs two numeric values; `Ok(None)` when either side is not numeric.
///
/// Mixed signed/unsigned integers go to the signed representation when the
/// unsigned side fits, to the unsigned one when the signed side is
/// non-negative, and fail otherwise.
pub fn numeric_pair(op: &'static str, lhs: &Value, rhs: &Value) -> Result<Option<NumPair>, EvalError> {
    let pair = match (lhs, rhs) {
        (Value::Double(a), Value::Double(b)) => NumPair::Double(*a, *b),
        (Value::Double(a), Value::Int(b)) => NumPair::Double(*a, *b as f64),
        (Value::Double(a), Value::Uint(b)) => NumPair::Double(*a, *b as f64),
        (Value::Int(a), Value::Double(b)) => NumPair::Double(*a as f64, *b),
        (Value::Uint(a), Value::Double(b)) => NumPair::Double(*a as f64, *b),
        (Value::Int(a), Value::Int(b)) => NumPair::Int(*a, *b),
        (Value::Uint(a), Value::Uint(b)) => NumPair::Uint(*a, *b),
        (Value::Int(a), Value::Uint(b)) => match i64::try_from(*b) {
            Ok(b) => NumPair::Int(*a, b),
            Err(_) => NumPair::Uint(unsigned(op, *a)?, *b),
        },
        (Value::Uint(a), Value::Int(b)) => match i64::try_from(*a) {
            Ok(a) => NumPair::Int(a, *b),
            Err(_) => NumPair::Uint(*a, unsigned(op, *b)?),
        },
        _ => return Ok(None),
    };
    Ok(Some(pair))
}

fn unsigned(op: &'static str, n: i64) -> Result<u64, EvalError> {
    u64::try_from(n).map_err(|_| EvalError::Range {
        op,
        detail: format!("negative int {} with uint above i64::MAX", n),
    })
}

/// Coercion for `==`, `!=`, `<`, `>`, `<=`, `>=`.
pub fn comparison_pair<'a>(
    op: &'static str,
    lhs: &'a Value,
    rhs: &'a Value,
) -> Result<ComparePair<'a>, EvalError> {
    if let Some(pair) = numeric_pair(op, lhs, rhs)? {
        return Ok(ComparePair::Num(pair));
    }

    let pair = match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => ComparePair::Str(a, b),
        (Value::String(s), Value::Int(b)) => ComparePair::Num(NumPair::Int(parse_int(s)?, *b)),
        (Value::String(s), Value::Uint(b)) => ComparePair::Num(NumPair::Uint(parse_uint(s)?, *b)),
        (Value::String(s), Value::Double(b)) => {
            ComparePair::Num(NumPair::Double(parse_double(s)?, *b))
        }
        (Value::Int(a), Value::String(s)) => ComparePair::Num(NumPair::Int(*a, parse_int(s)?)),
        (Value::Uint(a), Value::String(s)) => ComparePair::Num(NumPair::Uint(*a, parse_uint(s)?)),
        (Value::Double(a), Value::String(s)) => {
            ComparePair::Num(NumPair::Double(*a, parse_double(s)?))
        }
        _ => return Err(type_error(op, lhs, rhs)),
    };
    Ok(pair)
}

/// `===`: operands of different kinds are never equal; arrays and objects
/// are never equal to anything.
pub fn strict_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Uint(a), Value::Uint(b)) => a == b,
        (Value::Double(a), Value::Double(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

/// Coercion for `+`, `-`, `*`, `/`, `min`, `max`.
///
/// null paired with null is defined (and yields null), null paired with a
/// number is not.
pub fn arithmetic_pair(op: &'static str, lhs: &Value, rhs: &Value) -> Result<ArithPair, EvalError> {
    if let (Value::Null, Value::Null) = (lhs, rhs) {
        return Ok(ArithPair::Null);
    }
    numeric_pair(op, lhs, rhs)?
        .map(ArithPair::Num)
        .ok_or_else(|| type_error(op, lhs, rhs))
}

/// Coercion for `%`: integers only.
pub fn integer_pair(op: &'static str, lhs: &Value, rhs: &Value) -> Result<NumPair, EvalError> {
    match numeric_pair(op, lhs, rhs)? {
        Some(pair @ (NumPair::Int(..) | NumPair::Uint(..))) => Ok(pair),
        _ => Err(type_error(op, lhs, rhs)),
    }
}

/// Single-operand conversion applied before an arithmetic fold combines
/// operands: numbers and null pass, strings are parsed.
pub fn to_arithmetic(op: &'static str, value: Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(_) | Value::Uint(_) | Value::Double(_) | Value::Null => Ok(value),
        Value::String(s) => parse_number(&s),
        other => Err(EvalError::Type {
            op,
            found: other.kind().to_string(),
        }),
    }
}

/// Single-operand conversion for the string family.
pub fn to_string(op: &'static str, value: &Value) -> Result<String, EvalError> {
    value.to_text().ok_or_else(|| EvalError::Type {
        op,
        found: value.kind().to_string(),
    })
}

/// Parses a numeric string to the narrowest kind that holds it: `"2"` and
/// `"2.0"` give an int, `"2.5"` a double.
pub fn parse_number(text: &str) -> Result<Value, EvalError> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(u) = trimmed.parse::<u64>() {
        return Ok(Value::Uint(u));
    }
    let d = parse_double(text)?;
    if d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64 {
        Ok(Value::Int(d as i64))
    } else {
        Ok(Value::Double(d))
    }
}

/// Leading integer of a numeric string; fractional digits are truncated.
/// Values outside `i64` fail instead of saturating.
pub fn parse_int(text: &str) -> Result<i64, EvalError> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(i);
    }
    match trimmed.parse::<f64>().map(f64::trunc) {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        Ok(d) if d >= i64::MIN as f64 && d < i64::MAX as f64 => Ok(d as i64),
        _ => Err(coercion_error(text, Kind::Int)),
    }
}

/// Like [`parse_int`] for `u64`.
pub fn parse_uint(text: &str) -> Result<u64, EvalError> {
    let trimmed = text.trim();
    if let Ok(u) = trimmed.parse::<u64>() {
        return Ok(u);
    }
    match trimmed.parse::<f64>().map(f64::trunc) {
        Ok(d) if d >= 0.0 && d < u64::MAX as f64 => Ok(d as u64),
        _ => Err(coercion_error(text, Kind::Uint)),
    }
}

/// Finite doubles only; `nan`, `inf` and overflowing literals fail.
pub fn parse_double(text: &str) -> Result<f64, EvalError> {
    match text.trim().parse::<f64>() {
        Ok(d) if d.is_finite() => Ok(d),
        _ => Err(coercion_error(text, Kind::Double)),
    }
}

fn coercion_error(text: &str, target: Kind) -> EvalError {
    warn!(value = text, target = target.name(), "string operand is not numeric");
    EvalError::Coercion {
        value: text.to_string(),
        target: target.name(),
    }
}
