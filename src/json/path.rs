//=========================================================================
// Dotted-Path Lookup
//=========================================================================
//
// `"window.size.0"` walks object keys and array indices one segment at a
// time. A segment addressing an array must be a decimal index; a segment
// addressing an object is always a key, even if it looks numeric.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Array, JsonError, Value, ValueType};

//=== Public API ==========================================================

impl Value {
    /// Resolves a dotted path such as `"a.b.0.c"`.
    pub fn pointer(&self, path: &str) -> Result<&Value, JsonError> {
        let mut current = self;
        for segment in segments(path)? {
            current = match current {
                Value::Object(_) => current.get(segment)?,
                Value::Array(_) => current.at(parse_index(segment)?)?,
                other => return Err(JsonError::mismatch(ValueType::Object, other)),
            };
        }
        Ok(current)
    }

    /// Mutable variant of [`Value::pointer`].
    pub fn pointer_mut(&mut self, path: &str) -> Result<&mut Value, JsonError> {
        let mut current = self;
        for segment in segments(path)? {
            current = match current {
                Value::Object(members) => members
                    .get_mut(segment)
                    .ok_or_else(|| JsonError::KeyNotFound(segment.to_string()))?,
                Value::Array(items) => element_mut(items, segment)?,
                other => return Err(JsonError::mismatch(ValueType::Object, other)),
            };
        }
        Ok(current)
    }

    /// Returns true if `path` resolves.
    pub fn has_pointer(&self, path: &str) -> bool {
        self.pointer(path).is_ok()
    }

    /// Writes `value` at `path`, creating missing objects along the way.
    ///
    /// A `null` met on the way is replaced by an empty object. Existing
    /// array elements can be addressed by index but arrays are never grown.
    pub fn set_pointer(&mut self, path: &str, value: impl Into<Value>) -> Result<(), JsonError> {
        let segments = segments(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(JsonError::InvalidPath(path.to_string()));
        };

        let mut current = self;
        for segment in parents {
            if current.is_null() {
                *current = Value::object();
            }
            current = match current {
                Value::Object(members) => members
                    .entry((*segment).to_string())
                    .or_insert_with(Value::object),
                Value::Array(items) => element_mut(items, segment)?,
                other => return Err(JsonError::mismatch(ValueType::Object, other)),
            };
        }

        if current.is_null() {
            *current = Value::object();
        }
        match current {
            Value::Object(members) => {
                members.insert((*last).to_string(), value.into());
                Ok(())
            }
            Value::Array(items) => {
                *element_mut(items, last)? = value.into();
                Ok(())
            }
            other => Err(JsonError::mismatch(ValueType::Object, other)),
        }
    }
}

//=== Helpers =============================================================

fn segments(path: &str) -> Result<Vec<&str>, JsonError> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(JsonError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

fn element_mut<'a>(items: &'a mut Array, segment: &str) -> Result<&'a mut Value, JsonError> {
    let index = parse_index(segment)?;
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(JsonError::IndexOutOfRange { index, len })
}

fn parse_index(segment: &str) -> Result<usize, JsonError> {
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(JsonError::InvalidIndex(segment.to_string()));
    }
    segment
        .parse()
        .map_err(|_| JsonError::InvalidIndex(segment.to_string()))
}

//=========================================================================
// Unit Tests
//=========================================================================
