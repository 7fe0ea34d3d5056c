//=========================================================================
// Resource System
//=========================================================================
//
// Name-keyed caches of file-backed resources.
//
// Architecture:
//   ResourceManager<T>
//     └─ resources: BTreeMap<name, Arc<T>>   (owning)
//             ↓ get(name)
//        Handle<T> (Weak<T>)                 (non-owning)
//
// The manager owns every resource. Callers keep weak handles, which go
// invalid once the resource is removed from its manager.
//
//=========================================================================

//=== Module Declarations =================================================

mod handle;
mod resource_manager;
mod texture;

//=== Public API ==========================================================

pub use handle::Handle;
pub use resource_manager::ResourceManager;
pub use texture::{Texture, TextureManager};

//=== External Dependencies ===============================================

use std::path::Path;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::render::SurfaceError;

//=== Resource Trait ======================================================

/// Something loaded from a location on disk.
pub trait Resource: Send + Sync {
    /// Location the resource was created from.
    fn uri(&self) -> &str;
}

/// Returns true if `uri` names an existing file.
pub fn resource_exists(uri: &str) -> bool {
    !uri.is_empty() && Path::new(uri).is_file()
}

//=== ResourceError =======================================================

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource \"{0}\" does not exist")]
    NotFound(String),

    #[error("a resource named \"{0}\" is already loaded")]
    NameTaken(String),

    #[error("\"{uri}\" is already loaded as \"{name}\"")]
    UriInUse { uri: String, name: String },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

//=========================================================================
// Unit Tests
//=========================================================================
