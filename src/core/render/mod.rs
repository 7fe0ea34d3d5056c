//=========================================================================
// Draw Surface
//=========================================================================
//
// The opaque rendering contract between the engine and whatever graphics
// library draws the frame.
//
// Architecture:
//   StateManager::render() → State::render(&mut dyn DrawSurface)
//                                   ↓
//        Texture::draw() / Writer::present() / direct surface calls
//
// The engine never rasterizes anything itself. Textures and fonts are
// referred to by ids handed out by the surface.
//
//=========================================================================

//=== Module Declarations =================================================

mod recording;

//=== Public API ==========================================================

pub use recording::{DrawCommand, RecordingSurface};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Geometry & Colour ===================================================

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Handles =============================================================

/// Surface-issued texture identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Surface-issued font identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// A texture as known by the surface after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

//=== SurfaceError ========================================================

/// Failures reported by a [`DrawSurface`] implementation.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to load texture \"{uri}\": {reason}")]
    TextureLoad { uri: String, reason: String },

    #[error("failed to open font \"{source_uri}\" at size {size}")]
    FontLoad { source_uri: String, size: u32 },

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    #[error("unknown font {0:?}")]
    UnknownFont(FontId),
}

//=== DrawSurface =========================================================

/// Rendering backend consumed by states, textures and the writer.
///
/// Implementations wrap a concrete renderer. The engine hands the surface
/// to the logic thread, hence the `Send` bound on the boxed form used by
/// [`crate::EngineBuilder::with_surface`].
pub trait DrawSurface {
    /// Loads image data at `uri` and returns its id and dimensions.
    fn load_texture(&mut self, uri: &str) -> Result<TextureInfo, SurfaceError>;

    /// Frees a previously loaded texture. Unknown ids are ignored.
    fn unload_texture(&mut self, id: TextureId);

    /// Copies `clip` (or the whole texture) of `id` into `dest`.
    fn draw_texture(
        &mut self,
        id: TextureId,
        clip: Option<Rect>,
        dest: Rect,
    ) -> Result<(), SurfaceError>;

    /// Opens the font file at `source` rendered at `size` points.
    fn load_font(&mut self, source: &str, size: u32) -> Result<FontId, SurfaceError>;

    /// Line height of `font` in pixels.
    fn font_height(&self, font: FontId) -> Option<u32>;

    /// Pixel extent of `text` rendered with `font`.
    fn text_size(&self, font: FontId, text: &str) -> Option<(u32, u32)>;

    /// Renders `text` with its top-left corner at `(x, y)`.
    fn draw_text(
        &mut self,
        font: FontId,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn set_draw_color(&mut self, color: Color);
    fn draw_color(&self) -> Color;

    /// Sets a device-independent resolution the surface scales from.
    fn set_logical_size(&mut self, width: u32, height: u32);

    /// Clears the back buffer with the draw colour.
    fn clear(&mut self);

    /// Presents the back buffer.
    fn present(&mut self);
}
