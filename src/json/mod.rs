//=========================================================================
// JSON Document Model
//=========================================================================
//
// In-memory JSON tree with typed access, dotted-path lookup, a strict
// parser and compact/pretty serializers.
//
// Architecture:
//   &str ──parser::parse()──→ Value ──serializer──→ String
//                               │
//                               ├─ get()/at()       (one level)
//                               └─ pointer("a.b.0") (dotted path)
//
// Objects are sorted maps, so serialized output is stable.
//
//=========================================================================

//=== Module Declarations =================================================

mod compare;
mod parser;
mod path;
mod serializer;
mod value;

//=== Public API ==========================================================

pub use value::{Array, Object, Value, ValueType};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== JsonError ===========================================================

/// Errors raised by JSON access, lookup and parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonError {
    /// The value is not of the requested type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueType, found: ValueType },

    /// An object lookup missed.
    #[error("key \"{0}\" not found in object")]
    KeyNotFound(String),

    /// An array index was past the end.
    #[error("index {index} exceeds array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A path segment addressed an array but is not an index.
    #[error("path segment \"{0}\" is not a valid array index")]
    InvalidIndex(String),

    /// The path was empty or contained an empty segment.
    #[error("invalid path \"{0}\"")]
    InvalidPath(String),

    /// Malformed input text.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
}

impl JsonError {
    pub(crate) fn mismatch(expected: ValueType, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.value_type(),
        }
    }
}
