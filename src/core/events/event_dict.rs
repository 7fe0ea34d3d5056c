//=========================================================================
// Event Dictionary
//=========================================================================
//
// String-keyed bag of type-erased payload values.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

//=== Internal Dependencies ===============================================

use super::EventError;

//=== EventDict ===========================================================

/// Payload carried by a queued event.
///
/// ```rust
/// use stratum_engine::core::events::EventDict;
///
/// let dict = EventDict::new().with("index", 2usize).with("label", "Play");
/// assert_eq!(dict.get::<usize>("index"), Ok(&2));
/// assert!(dict.get::<i32>("index").is_err());
/// ```
#[derive(Default)]
pub struct EventDict {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl EventDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Reads the entry under `key` as a `T`.
    pub fn get<T: Any>(&self, key: &str) -> Result<&T, EventError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| EventError::MissingKey(key.to_string()))?;
        entry.downcast_ref::<T>().ok_or_else(|| EventError::WrongType {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for EventDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("EventDict").field("keys", &keys).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
