//=========================================================================
// Textures
//=========================================================================
//
// File-backed images uploaded to a `DrawSurface` on demand.
//
// A `Texture` is created from a path that must exist, but nothing is
// decoded until `prepare()` or the first `draw()`. `release()` frees the
// surface copy; the next draw loads it again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{resource_exists, Handle, Resource, ResourceError, ResourceManager};
use crate::core::render::{DrawSurface, Rect, TextureInfo};

//=== Texture =============================================================

#[derive(Debug)]
pub struct Texture {
    uri: String,
    loaded: Mutex<Option<TextureInfo>>,
}

impl Texture {
    /// Fails with [`ResourceError::NotFound`] if `uri` is not a file.
    pub fn new(uri: &str) -> Result<Self, ResourceError> {
        if !resource_exists(uri) {
            return Err(ResourceError::NotFound(uri.to_string()));
        }
        Ok(Self {
            uri: uri.to_string(),
            loaded: Mutex::new(None),
        })
    }

    /// Loads the image into `surface` unless it is already there.
    pub fn prepare(&self, surface: &mut dyn DrawSurface) -> Result<TextureInfo, ResourceError> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = *loaded {
            return Ok(info);
        }

        let info = surface.load_texture(&self.uri)?;
        debug!("Texture \"{}\" loaded ({}x{})", self.uri, info.width, info.height);
        *loaded = Some(info);
        Ok(info)
    }

    /// Frees the surface copy. Does nothing if not prepared.
    pub fn release(&self, surface: &mut dyn DrawSurface) {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = loaded.take() {
            surface.unload_texture(info.id);
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Width and height in pixels, known once prepared.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|info| (info.width, info.height))
    }

    /// Draws the texture, or the `clip` region of it, with its top-left
    /// corner at `(x, y)`. Loads the texture first if needed.
    pub fn draw(
        &self,
        surface: &mut dyn DrawSurface,
        x: i32,
        y: i32,
        clip: Option<Rect>,
    ) -> Result<(), ResourceError> {
        let info = self.prepare(surface)?;
        let (w, h) = clip.map_or((info.width, info.height), |c| (c.w, c.h));
        surface.draw_texture(info.id, clip, Rect::new(x, y, w, h))?;
        Ok(())
    }
}

impl Resource for Texture {
    fn uri(&self) -> &str {
        &self.uri
    }
}

//=== TextureManager ======================================================

/// Texture cache keyed by name.
///
/// ```rust
/// use stratum_engine::core::render::RecordingSurface;
/// use stratum_engine::core::resource::TextureManager;
///
/// let mut textures = TextureManager::new();
/// let mut surface = RecordingSurface::new();
/// assert!(textures.add_texture("logo", "missing/logo.png", false, &mut surface).is_err());
/// assert!(!textures.get("logo").is_valid());
/// ```
#[derive(Default)]
pub struct TextureManager {
    cache: ResourceManager<Texture>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the image at `uri` under `name`.
    ///
    /// Fails if `name` is taken and `allow_overwrite` is false, if `uri` is
    /// already registered under another name, or if `uri` does not exist.
    /// A replaced texture has its surface copy freed.
    pub fn add_texture(
        &mut self,
        name: &str,
        uri: &str,
        allow_overwrite: bool,
        surface: &mut dyn DrawSurface,
    ) -> Result<Handle<Texture>, ResourceError> {
        self.cache.check_insert(name, uri, allow_overwrite)?;
        let texture = Texture::new(uri)?;
        if let Some(displaced) = self.cache.get(name).upgrade() {
            displaced.release(surface);
        }
        self.cache.insert(name, texture, allow_overwrite)
    }

    pub fn has(&self, name: &str) -> bool {
        self.cache.has(name)
    }

    pub fn has_uri(&self, uri: &str) -> bool {
        self.cache.has_uri(uri)
    }

    pub fn get(&self, name: &str) -> Handle<Texture> {
        self.cache.get(name)
    }

    pub fn get_by_uri(&self, uri: &str) -> Handle<Texture> {
        self.cache.get_by_uri(uri)
    }

    /// Removes `name` and frees its surface copy.
    pub fn remove(&mut self, name: &str, surface: &mut dyn DrawSurface) -> bool {
        match self.cache.remove(name) {
            Some(texture) => {
                texture.release(surface);
                true
            }
            None => false,
        }
    }

    /// Loads every registered texture now. Failures are logged and skipped.
    pub fn prepare_all(&self, surface: &mut dyn DrawSurface) -> usize {
        let mut prepared = 0;
        for (name, texture) in self.cache.iter() {
            match texture.prepare(surface) {
                Ok(_) => prepared += 1,
                Err(e) => warn!("Texture \"{}\" could not be prepared: {}", name, e),
            }
        }
        prepared
    }

    /// Frees every surface copy; the cache itself is kept.
    pub fn release_all(&self, surface: &mut dyn DrawSurface) {
        for (_, texture) in self.cache.iter() {
            texture.release(surface);
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, RecordingSurface};

    const IMAGE_A: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
    const IMAGE_B: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/lib.rs");

    #[test]
    fn texture_requires_existing_file() {
        assert!(matches!(
            Texture::new("nope.png"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(Texture::new(IMAGE_A).is_ok());
    }

    #[test]
    fn loading_is_lazy() {
        let mut surface = RecordingSurface::with_texture_size(20, 10);
        let texture = Texture::new(IMAGE_A).unwrap();

        assert!(!texture.is_prepared());
        assert_eq!(texture.bounds(), None);
        assert_eq!(surface.loaded_textures(), 0);

        texture.prepare(&mut surface).unwrap();
        texture.prepare(&mut surface).unwrap();
        assert!(texture.is_prepared());
        assert_eq!(texture.bounds(), Some((20, 10)));
        assert_eq!(surface.loaded_textures(), 1);
    }

    #[test]
    fn draw_prepares_and_sizes_destination() {
        let mut surface = RecordingSurface::with_texture_size(20, 10);
        let texture = Texture::new(IMAGE_A).unwrap();

        texture.draw(&mut surface, 5, 6, None).unwrap();
        let clip = Rect::new(2, 2, 4, 4);
        texture.draw(&mut surface, 0, 0, Some(clip)).unwrap();

        let info = texture.prepare(&mut surface).unwrap();
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Texture {
                    id: info.id,
                    clip: None,
                    dest: Rect::new(5, 6, 20, 10),
                },
                DrawCommand::Texture {
                    id: info.id,
                    clip: Some(clip),
                    dest: Rect::new(0, 0, 4, 4),
                },
            ]
        );
    }

    #[test]
    fn release_allows_reload() {
        let mut surface = RecordingSurface::new();
        let texture = Texture::new(IMAGE_A).unwrap();

        texture.prepare(&mut surface).unwrap();
        texture.release(&mut surface);
        assert!(!texture.is_prepared());
        assert_eq!(surface.loaded_textures(), 0);

        texture.draw(&mut surface, 0, 0, None).unwrap();
        assert!(texture.is_prepared());
    }

    #[test]
    fn manager_rules() {
        let mut surface = RecordingSurface::new();
        let mut textures = TextureManager::new();
        let logo = textures.add_texture("logo", IMAGE_A, false, &mut surface).unwrap();
        assert!(logo.is_valid());
        assert_eq!(textures.get_by_uri(IMAGE_A), logo);

        assert!(matches!(
            textures.add_texture("logo", IMAGE_B, false, &mut surface),
            Err(ResourceError::NameTaken(_))
        ));
        assert!(matches!(
            textures.add_texture("splash", IMAGE_A, true, &mut surface),
            Err(ResourceError::UriInUse { .. })
        ));
        assert!(matches!(
            textures.add_texture("splash", "missing.png", false, &mut surface),
            Err(ResourceError::NotFound(_))
        ));

        let replaced = textures.add_texture("logo", IMAGE_B, true, &mut surface).unwrap();
        assert!(!logo.is_valid());
        assert!(replaced.is_valid());
        assert!(textures.has_uri(IMAGE_B));
        assert!(!textures.has_uri(IMAGE_A));
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn remove_frees_surface_copy() {
        let mut surface = RecordingSurface::new();
        let mut textures = TextureManager::new();
        textures.add_texture("a", IMAGE_A, false, &mut surface).unwrap();
        textures.add_texture("b", IMAGE_B, false, &mut surface).unwrap();

        assert_eq!(textures.prepare_all(&mut surface), 2);
        assert_eq!(surface.loaded_textures(), 2);

        assert!(textures.remove("a", &mut surface));
        assert!(!textures.remove("a", &mut surface));
        assert_eq!(surface.loaded_textures(), 1);

        textures.release_all(&mut surface);
        assert_eq!(surface.loaded_textures(), 0);
        assert!(textures.has("b"));
    }

    #[test]
    fn overwrite_frees_displaced_surface_copy() {
        let mut surface = RecordingSurface::new();
        let mut textures = TextureManager::new();
        textures.add_texture("logo", IMAGE_A, false, &mut surface).unwrap();
        textures.prepare_all(&mut surface);
        assert_eq!(surface.loaded_textures(), 1);

        textures.add_texture("logo", IMAGE_B, true, &mut surface).unwrap();
        assert_eq!(surface.loaded_textures(), 0);

        textures.prepare_all(&mut surface);
        assert_eq!(surface.loaded_textures(), 1);
        textures.release_all(&mut surface);
        assert_eq!(surface.loaded_textures(), 0);
    }
}
