//=========================================================================
// Recording Surface
//=========================================================================
//
// A `DrawSurface` that rasterizes nothing and records every command.
//
// Used as the default surface when the application does not provide a
// renderer, and as the test double for everything that draws.
//
// Frame lifecycle:
//   clear() → draw_*() → present() → last_frame() holds the commands
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{Color, DrawSurface, FontId, Rect, SurfaceError, TextureId, TextureInfo};

//=== DrawCommand =========================================================

/// A single recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Texture {
        id: TextureId,
        clip: Option<Rect>,
        dest: Rect,
    },
    Text {
        font: FontId,
        text: String,
        x: i32,
        y: i32,
        color: Color,
    },
}

//=== RecordingSurface ====================================================

/// Command-recording surface with deterministic metrics.
///
/// Fonts are monospace: each glyph is `size` pixels wide and tall. Every
/// texture reports the configured default dimensions.
pub struct RecordingSurface {
    texture_size: (u32, u32),
    next_texture: u32,
    textures: HashMap<TextureId, String>,
    fonts: Vec<(String, u32)>,
    draw_color: Color,
    logical_size: Option<(u32, u32)>,
    commands: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_texture_size(64, 64)
    }

    /// Creates a surface whose textures all report `width` x `height`.
    pub fn with_texture_size(width: u32, height: u32) -> Self {
        Self {
            texture_size: (width, height),
            next_texture: 1,
            textures: HashMap::new(),
            fonts: Vec::new(),
            draw_color: Color::BLACK,
            logical_size: None,
            commands: Vec::new(),
            last_frame: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Commands issued since the last `present()`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of textures currently loaded.
    pub fn loaded_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn logical_size(&self) -> Option<(u32, u32)> {
        self.logical_size
    }

    fn font_size(&self, font: FontId) -> Option<u32> {
        let index = usize::try_from(font.0).ok()?;
        self.fonts.get(index).map(|(_, size)| *size)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for RecordingSurface {
    fn load_texture(&mut self, uri: &str) -> Result<TextureInfo, SurfaceError> {
        if uri.is_empty() {
            return Err(SurfaceError::TextureLoad {
                uri: uri.to_string(),
                reason: "empty uri".to_string(),
            });
        }

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, uri.to_string());

        let (width, height) = self.texture_size;
        Ok(TextureInfo { id, width, height })
    }

    fn unload_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
    }

    fn draw_texture(
        &mut self,
        id: TextureId,
        clip: Option<Rect>,
        dest: Rect,
    ) -> Result<(), SurfaceError> {
        if !self.textures.contains_key(&id) {
            return Err(SurfaceError::UnknownTexture(id));
        }
        self.commands.push(DrawCommand::Texture { id, clip, dest });
        Ok(())
    }

    fn load_font(&mut self, source: &str, size: u32) -> Result<FontId, SurfaceError> {
        if source.is_empty() || size == 0 {
            return Err(SurfaceError::FontLoad {
                source_uri: source.to_string(),
                size,
            });
        }
        let id = u32::try_from(self.fonts.len()).map_err(|_| SurfaceError::FontLoad {
            source_uri: source.to_string(),
            size,
        })?;
        self.fonts.push((source.to_string(), size));
        Ok(FontId(id))
    }

    fn font_height(&self, font: FontId) -> Option<u32> {
        self.font_size(font)
    }

    fn text_size(&self, font: FontId, text: &str) -> Option<(u32, u32)> {
        let size = self.font_size(font)?;
        let glyphs = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        Some((glyphs.saturating_mul(size), size))
    }

    fn draw_text(
        &mut self,
        font: FontId,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), SurfaceError> {
        if self.font_size(font).is_none() {
            return Err(SurfaceError::UnknownFont(font));
        }
        self.commands.push(DrawCommand::Text {
            font,
            text: text.to_string(),
            x,
            y,
            color,
        });
        Ok(())
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn draw_color(&self) -> Color {
        self.draw_color
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        self.logical_size = Some((width, height));
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(self.draw_color));
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        trace!(
            "Presenting frame {} ({} commands)",
            self.frames_presented,
            self.commands.len()
        );
        self.last_frame = std::mem::take(&mut self.commands);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_moves_commands_to_last_frame() {
        let mut surface = RecordingSurface::new();
        surface.set_draw_color(Color::rgb(255, 128, 64));
        surface.clear();
        surface.present();

        assert!(surface.commands().is_empty());
        assert_eq!(surface.last_frame(), &[DrawCommand::Clear(Color::rgb(255, 128, 64))]);
        assert_eq!(surface.frames_presented(), 1);
    }

    #[test]
    fn textures_report_configured_size() {
        let mut surface = RecordingSurface::with_texture_size(32, 16);
        let info = surface.load_texture("background.png").unwrap();
        assert_eq!((info.width, info.height), (32, 16));
        assert_eq!(surface.loaded_textures(), 1);

        surface.unload_texture(info.id);
        assert_eq!(surface.loaded_textures(), 0);
        assert!(surface.draw_texture(info.id, None, Rect::new(0, 0, 1, 1)).is_err());
    }

    #[test]
    fn monospace_text_metrics() {
        let mut surface = RecordingSurface::new();
        let font = surface.load_font("font.ttf", 8).unwrap();
        assert_eq!(surface.font_height(font), Some(8));
        assert_eq!(surface.text_size(font, "Play"), Some((32, 8)));
        assert_eq!(surface.text_size(FontId(9), "Play"), None);
    }

    #[test]
    fn invalid_fonts_are_rejected() {
        let mut surface = RecordingSurface::new();
        assert!(surface.load_font("", 8).is_err());
        assert!(surface.load_font("font.ttf", 0).is_err());
        assert!(surface
            .draw_text(FontId(0), "x", 0, 0, Color::WHITE)
            .is_err());
    }
}
