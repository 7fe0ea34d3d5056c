//=========================================================================
// JSON Value
//=========================================================================
//
// Tagged-union DOM node. Containers own their children, so cloning a
// value deep-copies the subtree and assignment never aliases.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

//=== Internal Dependencies ===============================================

use super::JsonError;

//=== Container Aliases ===================================================

/// JSON object: keys kept in sorted order.
pub type Object = BTreeMap<String, Value>;

/// JSON array.
pub type Array = Vec<Value>;

//=== ValueType ===========================================================

/// Discriminant of a [`Value`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

//=== Value ===============================================================

/// A JSON document node.
///
/// # Example
///
/// ```rust
/// use stratum_engine::json::Value;
///
/// let doc: Value = r#"{"window": {"width": 800}}"#.parse().unwrap();
/// assert_eq!(*doc.pointer("window.width").unwrap(), 800);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    //--- Construction -----------------------------------------------------

    /// Creates an empty object.
    pub fn object() -> Self {
        Self::Object(Object::new())
    }

    /// Creates an empty array.
    pub fn array() -> Self {
        Self::Array(Array::new())
    }

    /// Replaces this value, whatever its current type.
    pub fn set(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    //--- Type Queries -----------------------------------------------------

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Object(_) => ValueType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    //--- Typed Access -----------------------------------------------------

    pub fn as_bool(&self) -> Result<bool, JsonError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(JsonError::mismatch(ValueType::Bool, other)),
        }
    }

    pub fn as_f64(&self) -> Result<f64, JsonError> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(JsonError::mismatch(ValueType::Number, other)),
        }
    }

    /// Returns the number as an integer if it has no fractional part and
    /// fits in an `i64`. `i64::MAX as f64` rounds up to 2^63, hence the
    /// strict upper bound.
    pub fn as_i64(&self) -> Result<i64, JsonError> {
        let n = self.as_f64()?;
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Ok(n as i64)
        } else {
            Err(JsonError::mismatch(ValueType::Number, self))
        }
    }

    pub fn as_str(&self) -> Result<&str, JsonError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(JsonError::mismatch(ValueType::String, other)),
        }
    }

    pub fn as_array(&self) -> Result<&Array, JsonError> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(JsonError::mismatch(ValueType::Array, other)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Array, JsonError> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(JsonError::mismatch(ValueType::Array, other)),
        }
    }

    pub fn as_object(&self) -> Result<&Object, JsonError> {
        match self {
            Self::Object(o) => Ok(o),
            other => Err(JsonError::mismatch(ValueType::Object, other)),
        }
    }

    pub fn as_object_mut(&mut self) -> Result<&mut Object, JsonError> {
        match self {
            Self::Object(o) => Ok(o),
            other => Err(JsonError::mismatch(ValueType::Object, other)),
        }
    }

    //--- One-Level Indexing -----------------------------------------------

    /// Looks up `key` in an object.
    pub fn get(&self, key: &str) -> Result<&Value, JsonError> {
        self.as_object()?
            .get(key)
            .ok_or_else(|| JsonError::KeyNotFound(key.to_string()))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, JsonError> {
        self.as_object_mut()?
            .get_mut(key)
            .ok_or_else(|| JsonError::KeyNotFound(key.to_string()))
    }

    /// Returns the element at `index` of an array.
    pub fn at(&self, index: usize) -> Result<&Value, JsonError> {
        let array = self.as_array()?;
        array.get(index).ok_or(JsonError::IndexOutOfRange {
            index,
            len: array.len(),
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Value, JsonError> {
        let array = self.as_array_mut()?;
        let len = array.len();
        array
            .get_mut(index)
            .ok_or(JsonError::IndexOutOfRange { index, len })
    }

    /// Inserts `key` into an object, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, JsonError> {
        Ok(self.as_object_mut()?.insert(key.into(), value.into()))
    }

    /// Appends to an array.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), JsonError> {
        self.as_array_mut()?.push(value.into());
        Ok(())
    }

    /// Number of children of a container; scalars have none.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(a) => a.len(),
            Self::Object(o) => o.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //--- Plain Text -------------------------------------------------------

    /// Human-readable rendering: strings unquoted, containers named by
    /// kind, everything else as it would serialize.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Object(_) => "Object".to_string(),
            Self::Array(_) => "Array".to_string(),
            scalar => scalar.serialize(),
        }
    }
}

//=== Conversions =========================================================

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default().value_type(), ValueType::Null);
    }

    #[test]
    fn set_changes_type() {
        let mut value = Value::from("text");
        value.set(12);
        assert_eq!(value.as_f64(), Ok(12.0));
        value.set(true);
        assert_eq!(value.as_bool(), Ok(true));
        value.set(Value::object());
        assert!(value.is_object());
    }

    #[test]
    fn typed_access_reports_mismatch() {
        let value = Value::from(3.5);
        assert_eq!(
            value.as_str(),
            Err(JsonError::TypeMismatch {
                expected: ValueType::String,
                found: ValueType::Number,
            })
        );
        assert!(value.as_i64().is_err());
        assert_eq!(Value::from(-7).as_i64(), Ok(-7));
    }

    #[test]
    fn as_i64_rejects_values_past_the_range() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert!(Value::Number(two_pow_63).as_i64().is_err());
        assert_eq!(Value::Number(-two_pow_63).as_i64(), Ok(i64::MIN));
        assert!(Value::Number(-two_pow_63 * 2.0).as_i64().is_err());
        assert_eq!(Value::Number(2f64.powi(53)).as_i64(), Ok(1 << 53));
    }

    #[test]
    fn object_lookup() {
        let mut obj = Value::object();
        obj.insert("name", "menu").unwrap();
        assert_eq!(obj.get("name").unwrap().as_str(), Ok("menu"));
        assert_eq!(
            obj.get("missing"),
            Err(JsonError::KeyNotFound("missing".to_string()))
        );
        assert!(Value::from(1).get("name").is_err());
    }

    #[test]
    fn array_indexing() {
        let mut arr = Value::array();
        arr.push(1).unwrap();
        arr.push("two").unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.at(1).unwrap().as_str(), Ok("two"));
        assert_eq!(arr.at(2), Err(JsonError::IndexOutOfRange { index: 2, len: 2 }));

        *arr.at_mut(0).unwrap() = Value::Null;
        assert!(arr.at(0).unwrap().is_null());
    }

    #[test]
    fn clones_do_not_alias() {
        let mut original: Value = [("a", 1)].into_iter().collect();
        let copy = original.clone();
        original.insert("a", 2).unwrap();
        assert_eq!(copy.get("a").unwrap().as_f64(), Ok(1.0));
    }

    #[test]
    fn plain_string_rendering() {
        assert_eq!(Value::Null.to_plain_string(), "null");
        assert_eq!(Value::from("raw \"text\"").to_plain_string(), "raw \"text\"");
        assert_eq!(Value::object().to_plain_string(), "Object");
        assert_eq!(Value::array().to_plain_string(), "Array");
        assert_eq!(Value::from(false).to_plain_string(), "false");
        assert_eq!(Value::from(42).to_plain_string(), "42");
    }

    #[test]
    fn option_converts_to_null() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
