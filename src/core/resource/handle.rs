//=========================================================================
// Resource Handle
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::{Arc, Weak};

//=== Handle ==============================================================

/// Non-owning reference to a managed resource.
///
/// Two handles are equal when they point at the same live resource, or
/// when both are invalid.
pub struct Handle<T> {
    target: Weak<T>,
}

impl<T> Handle<T> {
    /// A handle that points at nothing.
    pub fn empty() -> Self {
        Self { target: Weak::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Borrows the resource for as long as the returned `Arc` lives.
    pub fn upgrade(&self) -> Option<Arc<T>> {
        self.target.upgrade()
    }
}

impl<T> From<&Arc<T>> for Handle<T> {
    fn from(resource: &Arc<T>) -> Self {
        Self {
            target: Arc::downgrade(resource),
        }
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
        }
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.upgrade(), other.upgrade()) {
            (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("valid", &self.is_valid())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_handle_is_invalid() {
        let handle: Handle<u32> = Handle::default();
        assert!(!handle.is_valid());
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn handle_tracks_owner_lifetime() {
        let owner = Arc::new(5u32);
        let handle = Handle::from(&owner);
        assert!(handle.is_valid());
        assert_eq!(handle.upgrade().as_deref(), Some(&5));

        drop(owner);
        assert!(!handle.is_valid());
    }

    #[test]
    fn equality_is_identity() {
        let a = Arc::new(1u32);
        let b = Arc::new(1u32);

        assert_eq!(Handle::from(&a), Handle::from(&a));
        assert_ne!(Handle::from(&a), Handle::from(&b));
        assert_ne!(Handle::from(&a), Handle::empty());
        assert_eq!(Handle::<u32>::empty(), Handle::empty());
    }
}
