//! JSON text output for evaluation results.
//!
//! Used for the `log` operator's diagnostic lines and for CLI output. Output is
//! deterministic: object keys are sorted, doubles always carry a fractional
//! part or exponent so they read back as doubles, and non-finite doubles are
//! written as `null`.
//!
//! ```
//! use jsonlogic_engine::Value;
//! use jsonlogic_engine::output::to_json;
//!
//! let value = Value::Array(vec![Value::Int(1), Value::Double(2.0), "x".into()]);
//! assert_eq!(to_json(&value), r#"[1,2.0,"x"]"#);
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::value::Value;

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        let mut out = String::new();
        self.print_value(&mut out, value, 0);
        out
    }

    fn print_value(&self, out: &mut String, value: &Value, indent: usize) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Uint(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Double(n) if n.is_finite() => {
                let _ = write!(out, "{:?}", n);
            }
            Value::Double(_) => out.push_str("null"),
            Value::String(s) => self.print_string(out, s),
            Value::Array(arr) => self.print_array(out, arr, indent),
            Value::Object(obj) => self.print_object(out, obj, indent),
        }
    }

    fn print_array(&self, out: &mut String, arr: &[Value], indent: usize) {
        if arr.is_empty() {
            out.push_str("[]");
            return;
        }

        out.push('[');
        for (i, v) in arr.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, indent + 1);
            self.print_value(out, v, indent + 1);
        }
        self.newline(out, indent);
        out.push(']');
    }

    fn print_object(&self, out: &mut String, obj: &HashMap<String, Value>, indent: usize) {
        if obj.is_empty() {
            out.push_str("{}");
            return;
        }

        let mut entries: Vec<_> = obj.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        out.push('{');
        for (i, (k, v)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.newline(out, indent + 1);
            self.print_string(out, k);
            out.push_str(if self.pretty { ": " } else { ":" });
            self.print_value(out, v, indent + 1);
        }
        self.newline(out, indent);
        out.push('}');
    }

    fn newline(&self, out: &mut String, indent: usize) {
        if self.pretty {
            out.push('\n');
            for _ in 0..indent {
                out.push_str("  ");
            }
        }
    }

    fn print_string(&self, out: &mut String, s: &str) {
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c => out.push(c),
            }
        }
        out.push('"');
    }
}

/// Compact JSON text, no whitespace.
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Pretty JSON text with 2-space indentation, one element per line.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
