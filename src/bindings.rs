//! Variable binding hosts.
//!
//! The evaluator asks a [`Bindings`] implementation for the value of every
//! `var` it meets, passing the name and, when the name was a literal, its slot
//! in the rule's free-variable table. Hosts may ignore the slot and look up by
//! name, or use it as a fast path.

use crate::value::Value;

pub trait Bindings {
    /// Value of `name` for the current record; `None` evaluates to null.
    fn lookup(&self, name: &str, slot: Option<usize>) -> Option<Value>;
}

impl<F> Bindings for F
where
    F: Fn(&str, Option<usize>) -> Option<Value>,
{
    fn lookup(&self, name: &str, slot: Option<usize>) -> Option<Value> {
        self(name, slot)
    }
}

/// Binds a whole record.
///
/// The empty name is the record itself. A name that is a key of the record
/// wins as-is; otherwise it is split on `.` and each segment selects an object
/// field or, when numeric, an array element.
///
/// ```
/// use jsonlogic_engine::{Bindings, Record, Value};
/// use serde_json::json;
///
/// let data = Value::from(json!({"user": {"tags": ["a", "b"]}}));
/// let record = Record::new(&data);
/// assert_eq!(record.lookup("user.tags.1", None), Some(Value::from("b")));
/// assert_eq!(record.lookup("user.missing", None), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    data: &'a Value,
}

impl<'a> Record<'a> {
    pub fn new(data: &'a Value) -> Self {
        Record { data }
    }
}

impl Bindings for Record<'_> {
    fn lookup(&self, name: &str, _slot: Option<usize>) -> Option<Value> {
        resolve_path(self.data, name).cloned()
    }
}

/// Follows a dotted path into `value`.
pub fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(value);
    }
    if let Some(found) = step(value, path) {
        return Some(found);
    }
    let (head, rest) = path.split_once('.')?;
    resolve_path(step(value, head)?, rest)
}

fn step<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Binds one row of values laid out in free-variable order.
///
/// Resolved slots index straight into `values`; computed names fall back to a
/// search over `names`.
#[derive(Debug, Clone, Copy)]
pub struct Positional<'a> {
    names: &'a [String],
    values: &'a [Value],
}

impl<'a> Positional<'a> {
    pub fn new(names: &'a [String], values: &'a [Value]) -> Self {
        Positional { names, values }
    }
}

impl Bindings for Positional<'_> {
    fn lookup(&self, name: &str, slot: Option<usize>) -> Option<Value> {
        let slot = slot.or_else(|| self.names.iter().position(|n| n == name))?;
        self.values.get(slot).cloned()
    }
}
