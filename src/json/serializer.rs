//=========================================================================
// JSON Serializer
//=========================================================================
//
// Compact and indented writers for `Value`.
//
// Numbers use the shortest representation that reads back to the same
// `f64`; integral values print without a fractional part. Non-finite
// numbers have no JSON spelling and serialize as `null`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::{self, Write};

//=== Internal Dependencies ===============================================

use super::Value;

//=== Public Entry Points =================================================

impl Value {
    /// Serializes to compact JSON text.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_value(&mut out, self, None, 0);
        out
    }

    /// Serializes to JSON text, one member per line, indented by `indent`
    /// spaces per nesting level.
    pub fn serialize_pretty(&self, indent: usize) -> String {
        let mut out = String::new();
        write_value(&mut out, self, Some(indent), 0);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

//=== Writers =============================================================

fn write_value(out: &mut String, value: &Value, indent: Option<usize>, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push(']');
        }
        Value::Object(members) => {
            if members.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_string(out, key);
                out.push(':');
                if indent.is_some() {
                    out.push(' ');
                }
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push('}');
        }
    }
}

fn newline(out: &mut String, indent: Option<usize>, depth: usize) {
    if let Some(width) = indent {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(width * depth));
    }
}

fn write_number(out: &mut String, n: f64) {
    if !n.is_finite() {
        out.push_str("null");
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // negative zero prints as "0"
        let _ = write!(out, "{}", n as i64);
    } else {
        let _ = write!(out, "{}", n);
    }
}

pub(super) fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::Object;

    #[test]
    fn scalars() {
        assert_eq!(Value::Null.serialize(), "null");
        assert_eq!(Value::from(true).serialize(), "true");
        assert_eq!(Value::from(3).serialize(), "3");
        assert_eq!(Value::from(-0.0).serialize(), "0");
        assert_eq!(Value::from(2.5).serialize(), "2.5");
        assert_eq!(Value::from(f64::NAN).serialize(), "null");
    }

    #[test]
    fn strings_are_escaped() {
        let value = Value::from("a\"b\\c/d\n\t\u{01}");
        assert_eq!(value.serialize(), r#""a\"b\\c\/d\n\t\u0001""#);
    }

    #[test]
    fn object_keys_are_quoted_and_sorted() {
        let mut obj = Object::new();
        obj.insert("zeta".to_string(), Value::from(1));
        obj.insert("alpha".to_string(), Value::from(vec![Value::Null, Value::from("x")]));
        let value = Value::from(obj);

        assert_eq!(value.serialize(), r#"{"alpha":[null,"x"],"zeta":1}"#);
        assert_eq!(value.to_string(), value.serialize());
    }

    #[test]
    fn pretty_output() {
        let value: Value = [("a", Value::from(vec![Value::from(1), Value::from(2)])), ("b", Value::object())]
            .into_iter()
            .collect();
        let expected = "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}";
        assert_eq!(value.serialize_pretty(2), expected);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(Value::array().serialize(), "[]");
        assert_eq!(Value::object().serialize_pretty(4), "{}");
    }
}
