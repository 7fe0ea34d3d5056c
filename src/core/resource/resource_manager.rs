//=========================================================================
// Resource Manager
//=========================================================================
//
// Owning cache of resources keyed by name, with reverse lookup by URI.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Handle, Resource, ResourceError};

//=== ResourceManager =====================================================

/// Name-keyed resource cache.
///
/// A URI is loaded at most once: inserting a resource whose URI is already
/// cached under a different name is rejected.
pub struct ResourceManager<T: Resource> {
    resources: BTreeMap<String, Arc<T>>,
}

impl<T: Resource> ResourceManager<T> {
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    //--- Lookup -----------------------------------------------------------

    pub fn has(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn has_uri(&self, uri: &str) -> bool {
        self.name_of_uri(uri).is_some()
    }

    /// Handle to the resource named `name`; empty if absent.
    pub fn get(&self, name: &str) -> Handle<T> {
        self.resources.get(name).map(Handle::from).unwrap_or_default()
    }

    /// Handle to the resource loaded from `uri`; empty if absent.
    pub fn get_by_uri(&self, uri: &str) -> Handle<T> {
        self.resources
            .values()
            .find(|r| r.uri() == uri)
            .map(Handle::from)
            .unwrap_or_default()
    }

    /// Name the resource at `uri` is cached under.
    pub fn name_of_uri(&self, uri: &str) -> Option<&str> {
        self.resources
            .iter()
            .find(|(_, r)| r.uri() == uri)
            .map(|(name, _)| name.as_str())
    }

    //--- Mutation ---------------------------------------------------------

    /// Checks whether `name`/`uri` could be inserted without building the
    /// resource first.
    pub fn check_insert(
        &self,
        name: &str,
        uri: &str,
        allow_overwrite: bool,
    ) -> Result<(), ResourceError> {
        if !allow_overwrite && self.has(name) {
            return Err(ResourceError::NameTaken(name.to_string()));
        }
        match self.name_of_uri(uri) {
            Some(owner) if owner != name => Err(ResourceError::UriInUse {
                uri: uri.to_string(),
                name: owner.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Caches `resource` under `name`.
    pub fn insert(
        &mut self,
        name: &str,
        resource: T,
        allow_overwrite: bool,
    ) -> Result<Handle<T>, ResourceError> {
        self.check_insert(name, resource.uri(), allow_overwrite)?;

        let resource = Arc::new(resource);
        let handle = Handle::from(&resource);
        if self.resources.insert(name.to_string(), resource).is_some() {
            debug!("Resource \"{}\" overwritten", name);
        }
        Ok(handle)
    }

    /// Drops the manager's reference. Outstanding handles become invalid
    /// once no caller holds an upgraded `Arc`.
    pub fn remove(&mut self, name: &str) -> Option<Arc<T>> {
        self.resources.remove(name)
    }

    pub fn clear(&mut self) {
        self.resources.clear();
    }

    //--- Inspection -------------------------------------------------------

    /// Cached names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.resources.iter().map(|(name, r)| (name.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<T: Resource> Default for ResourceManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Sound {
        uri: String,
    }

    impl Resource for Sound {
        fn uri(&self) -> &str {
            &self.uri
        }
    }

    fn sound(uri: &str) -> Sound {
        Sound {
            uri: uri.to_string(),
        }
    }

    #[test]
    fn lookup_by_name_and_uri() {
        let mut manager = ResourceManager::new();
        let handle = manager.insert("jump", sound("sfx/jump.wav"), false).unwrap();

        assert!(manager.has("jump"));
        assert!(manager.has_uri("sfx/jump.wav"));
        assert_eq!(manager.get("jump"), handle);
        assert_eq!(manager.get_by_uri("sfx/jump.wav"), handle);
        assert_eq!(manager.name_of_uri("sfx/jump.wav"), Some("jump"));
        assert!(!manager.get("land").is_valid());
        assert!(!manager.get_by_uri("sfx/land.wav").is_valid());
    }

    #[test]
    fn taken_name_requires_overwrite() {
        let mut manager = ResourceManager::new();
        manager.insert("music", sound("a.ogg"), false).unwrap();

        assert!(matches!(
            manager.insert("music", sound("b.ogg"), false),
            Err(ResourceError::NameTaken(_))
        ));

        let replaced = manager.insert("music", sound("b.ogg"), true).unwrap();
        assert_eq!(replaced.upgrade().unwrap().uri(), "b.ogg");
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn uri_is_loaded_once() {
        let mut manager = ResourceManager::new();
        manager.insert("music", sound("a.ogg"), false).unwrap();

        match manager.insert("theme", sound("a.ogg"), true) {
            Err(ResourceError::UriInUse { uri, name }) => {
                assert_eq!(uri, "a.ogg");
                assert_eq!(name, "music");
            }
            other => panic!("expected UriInUse, got {:?}", other.map(|_| ())),
        }

        // same name, same uri: a reload
        assert!(manager.insert("music", sound("a.ogg"), true).is_ok());
    }

    #[test]
    fn remove_invalidates_handles() {
        let mut manager = ResourceManager::new();
        let handle = manager.insert("jump", sound("jump.wav"), false).unwrap();

        assert!(manager.remove("jump").is_some());
        assert!(!handle.is_valid());
        assert!(manager.is_empty());
        assert!(manager.remove("jump").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let mut manager = ResourceManager::new();
        manager.insert("b", sound("2"), false).unwrap();
        manager.insert("a", sound("1"), false).unwrap();
        assert_eq!(manager.names().collect::<Vec<_>>(), vec!["a", "b"]);

        manager.clear();
        assert_eq!(manager.len(), 0);
    }
}
