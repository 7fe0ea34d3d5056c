//=========================================================================
// Comparisons
//=========================================================================
//
// Lets a `Value` be compared directly with Rust scalars and strings:
//
//   value == 800      value == "menu"      value < 2.5
//
// A comparison across JSON types is never equal and has no ordering.
// Containers are only ever equal or unordered.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp::Ordering;

//=== Internal Dependencies ===============================================

use super::Value;

//=== Ordering Between Values =============================================

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (a, b) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

//=== Numbers =============================================================

macro_rules! impl_number_cmp {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Value::Number(n) if *n == *other as f64)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    other == self
                }
            }

            impl PartialOrd<$ty> for Value {
                fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                    match self {
                        Value::Number(n) => n.partial_cmp(&(*other as f64)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_number_cmp!(i32, i64, u32, u64, usize, f32, f64);

//=== Booleans ============================================================

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

//=== Strings =============================================================

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::String(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self.as_str()
    }
}

impl PartialOrd<&str> for Value {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        match self {
            Value::String(s) => s.as_str().partial_cmp(*other),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
