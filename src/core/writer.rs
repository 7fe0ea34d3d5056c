//=========================================================================
// Writer
//=========================================================================
//
// Named fonts and a pen colour for drawing text onto a `DrawSurface`.
//
// Fonts are opened once through the surface and afterwards referred to by
// name ("default12", "title", ...).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::render::{Color, DrawSurface, FontId, SurfaceError};

//=== WriterError =========================================================

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("font \"{0}\" is not defined")]
    UnknownFont(String),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

//=== Writer ==============================================================

/// Text renderer with a registry of named fonts.
///
/// ```rust
/// use stratum_engine::core::render::{Color, RecordingSurface};
/// use stratum_engine::core::writer::Writer;
///
/// let mut surface = RecordingSurface::new();
/// let mut writer = Writer::new();
/// writer.define_font(&mut surface, "small", "fonts/mono.ttf", 8).unwrap();
/// writer.set_pen_color(Color::rgb(200, 200, 0));
/// writer.present(&mut surface, "small", "Score: 10", 4, 4).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    fonts: HashMap<String, FontId>,
    pen: Color,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Fonts ------------------------------------------------------------

    /// Opens `source` at `size` under `name`. Does nothing if `name` is
    /// already defined.
    pub fn define_font(
        &mut self,
        surface: &mut dyn DrawSurface,
        name: &str,
        source: &str,
        size: u32,
    ) -> Result<(), WriterError> {
        if self.has_font(name) {
            return Ok(());
        }
        let id = surface.load_font(source, size)?;
        debug!("Font \"{}\" defined from \"{}\" at {}pt", name, source, size);
        self.fonts.insert(name.to_string(), id);
        Ok(())
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn font_id(&self, name: &str) -> Result<FontId, WriterError> {
        self.fonts
            .get(name)
            .copied()
            .ok_or_else(|| WriterError::UnknownFont(name.to_string()))
    }

    /// Line height of `name` in pixels.
    pub fn font_height(&self, surface: &dyn DrawSurface, name: &str) -> Result<u32, WriterError> {
        let id = self.font_id(name)?;
        surface
            .font_height(id)
            .ok_or(WriterError::Surface(SurfaceError::UnknownFont(id)))
    }

    /// Pixel extent of `text` in font `name`.
    pub fn text_size(
        &self,
        surface: &dyn DrawSurface,
        name: &str,
        text: &str,
    ) -> Result<(u32, u32), WriterError> {
        let id = self.font_id(name)?;
        surface
            .text_size(id, text)
            .ok_or(WriterError::Surface(SurfaceError::UnknownFont(id)))
    }

    //--- Pen --------------------------------------------------------------

    pub fn pen_color(&self) -> Color {
        self.pen
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen = color;
    }

    //--- Drawing ----------------------------------------------------------

    /// Draws `message` in the pen colour with its top-left at `(x, y)`.
    pub fn present(
        &self,
        surface: &mut dyn DrawSurface,
        font: &str,
        message: &str,
        x: i32,
        y: i32,
    ) -> Result<(), WriterError> {
        let id = self.font_id(font)?;
        surface.draw_text(id, message, x, y, self.pen)?;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, RecordingSurface};

    fn setup() -> (RecordingSurface, Writer) {
        let mut surface = RecordingSurface::new();
        let mut writer = Writer::new();
        writer.define_font(&mut surface, "default8", "font.ttf", 8).unwrap();
        (surface, writer)
    }

    #[test]
    fn redefining_a_font_keeps_the_first() {
        let (mut surface, mut writer) = setup();
        writer.define_font(&mut surface, "default8", "other.ttf", 24).unwrap();
        assert_eq!(writer.font_height(&surface, "default8").unwrap(), 8);
    }

    #[test]
    fn metrics_come_from_surface() {
        let (surface, writer) = setup();
        assert!(writer.has_font("default8"));
        assert_eq!(writer.text_size(&surface, "default8", "Quit").unwrap(), (32, 8));
        assert!(matches!(
            writer.font_height(&surface, "huge"),
            Err(WriterError::UnknownFont(_))
        ));
    }

    #[test]
    fn present_uses_pen_color() {
        let (mut surface, mut writer) = setup();
        assert_eq!(writer.pen_color(), Color::WHITE);

        writer.set_pen_color(Color::rgb(1, 2, 3));
        writer.present(&mut surface, "default8", "hi", 10, 20).unwrap();

        let font = writer.font_id("default8").unwrap();
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Text {
                font,
                text: "hi".to_string(),
                x: 10,
                y: 20,
                color: Color::rgb(1, 2, 3),
            }]
        );
    }

    #[test]
    fn failures_are_reported() {
        let (mut surface, mut writer) = setup();
        assert!(matches!(
            writer.define_font(&mut surface, "broken", "", 12),
            Err(WriterError::Surface(SurfaceError::FontLoad { .. }))
        ));
        assert!(!writer.has_font("broken"));
        assert!(writer.present(&mut surface, "missing", "x", 0, 0).is_err());
    }
}
