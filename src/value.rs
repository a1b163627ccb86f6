use std::collections::HashMap;
use std::fmt;

/// A value produced by evaluating a rule, or supplied by a variable lookup.
///
/// The scalar kinds mirror the JSON number model used by rule text: signed
/// integers, unsigned integers that do not fit `i64`, and doubles are kept
/// apart so that coercion can pick the narrowest common kind.
///
/// Arrays come out of array literals and the array operators (`merge`, `map`,
/// `filter`); objects only enter through variable lookup, e.g. `{"var": ""}`
/// returning the whole record.
///
/// # Examples
///
/// ```
/// use jsonlogic_engine::Value;
///
/// assert!(Value::Int(3).is_truthy().unwrap());
/// assert!(!Value::String(String::new()).is_truthy().unwrap());
/// assert_eq!(Value::Double(2.5).to_text().unwrap(), "2.5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Unsigned integer, only used for values above `i64::MAX`
    Uint(u64),

    /// Floating-point number
    Double(f64),

    /// UTF-8 string
    String(String),

    /// Array of evaluated values
    Array(Vec<Value>),

    /// Object, as handed out by a variable lookup
    Object(HashMap<String, Value>),
}

/// The runtime kind of a [`Value`], used in fault messages and coercion tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Boolean coercion used by `and`, `or`, `!`, `!!`, `if` and the array
    /// predicates.
    ///
    /// Numbers are truthy iff nonzero, strings iff nonempty, arrays iff they
    /// hold at least one element, and null is always falsy. Objects have no
    /// boolean meaning; `None` is returned for them.
    pub fn is_truthy(&self) -> Option<bool> {
        match self {
            Value::Null => Some(false),
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            Value::Uint(n) => Some(*n != 0),
            Value::Double(n) => Some(*n != 0.0),
            Value::String(s) => Some(!s.is_empty()),
            Value::Array(arr) => Some(!arr.is_empty()),
            Value::Object(_) => None,
        }
    }

    /// Canonical text form used by the string family (`cat`, `in`).
    ///
    /// Strings pass through unchanged; arrays and objects have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some("null".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Uint(n) => Some(n.to_string()),
            Value::Double(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Builds a number the way rule text does: integers that fit `i64` stay
    /// signed, larger positive integers become `Uint`.
    pub fn from_u64(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Uint(n),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Uint(u) => serde_json::Value::Number(u.into()),
            // non-finite doubles have no JSON spelling
            Value::Double(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(Into::into).collect()),
            Value::Object(obj) => {
                serde_json::Value::Object(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::from_u64(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Formats the value as compact JSON text (strings quoted, object keys sorted).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::output::to_json(self))
    }
}
