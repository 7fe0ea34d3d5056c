//=========================================================================
// Engine Configuration
//=========================================================================
//
// Window, rendering, timing and asset settings, with defaults that run
// out of the box and an optional JSON override.
//
// Document layout (every key optional):
// ```text
// {
//   "window":   { "title": "Stratum", "width": 800, "height": 600 },
//   "render":   { "logical_width": 1680, "logical_height": 1050 },
//   "engine":   { "tps": 60, "channel_capacity": 128 },
//   "fonts":    [ { "name": "default8", "source": "…", "size": 8 } ],
//   "textures": [ { "name": "background", "uri": "…" } ]
// }
// ```
//
// A present "fonts" or "textures" array replaces the default list.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::json::{JsonError, Value};

//=== Defaults ============================================================

const DEFAULT_FONT_SOURCE: &str = "assets/fonts/6809chargen.ttf";

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config is not valid JSON")]
    Parse(#[from] JsonError),

    #[error("config key \"{key}\" has the wrong type")]
    Field {
        key: String,
        #[source]
        source: JsonError,
    },

    #[error("config key \"{key}\" is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

//=== Config Types ========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stratum Engine".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// A font to open at startup, referred to afterwards by `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub name: String,
    pub source: String,
    pub size: u32,
}

impl FontConfig {
    pub fn new(name: &str, source: &str, size: u32) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            size,
        }
    }
}

/// A texture to register at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    pub name: String,
    pub uri: String,
}

/// Everything the engine reads before it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub window: WindowConfig,
    /// Resolution states draw in; the surface scales it to the window.
    pub logical_size: (u32, u32),
    pub tps: f64,
    pub channel_capacity: usize,
    pub fonts: Vec<FontConfig>,
    pub textures: Vec<TextureConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            logical_size: (1680, 1050),
            tps: 60.0,
            channel_capacity: 128,
            fonts: vec![
                FontConfig::new("default8", DEFAULT_FONT_SOURCE, 8),
                FontConfig::new("default12", DEFAULT_FONT_SOURCE, 12),
                FontConfig::new("default24", DEFAULT_FONT_SOURCE, 24),
            ],
            textures: Vec::new(),
        }
    }
}

//=== Loading =============================================================

impl EngineConfig {
    /// Reads and applies a JSON file over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {:?}", path);
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(&Value::parse(text)?)
    }

    /// Applies `doc` over the defaults.
    pub fn from_value(doc: &Value) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(title) = read(doc, "window.title", |v| v.as_str().map(str::to_string))? {
            config.window.title = title;
        }
        if let Some(width) = read_dimension(doc, "window.width")? {
            config.window.width = width;
        }
        if let Some(height) = read_dimension(doc, "window.height")? {
            config.window.height = height;
        }
        if let Some(width) = read_dimension(doc, "render.logical_width")? {
            config.logical_size.0 = width;
        }
        if let Some(height) = read_dimension(doc, "render.logical_height")? {
            config.logical_size.1 = height;
        }

        if let Some(tps) = read(doc, "engine.tps", Value::as_f64)? {
            if !(tps > 0.0 && tps.is_finite() && (1.0 / tps).is_finite()) {
                return Err(invalid("engine.tps", "must be a positive number"));
            }
            config.tps = tps;
        }
        if let Some(capacity) = read(doc, "engine.channel_capacity", Value::as_i64)? {
            config.channel_capacity = usize::try_from(capacity)
                .ok()
                .filter(|&c| c > 0)
                .ok_or_else(|| invalid("engine.channel_capacity", "must be a positive integer"))?;
        }

        if let Some(fonts) = read(doc, "fonts", |v| v.as_array().cloned())? {
            config.fonts = fonts
                .iter()
                .enumerate()
                .map(|(i, entry)| read_font(entry, i))
                .collect::<Result<_, _>>()?;
        }
        if let Some(textures) = read(doc, "textures", |v| v.as_array().cloned())? {
            config.textures = textures
                .iter()
                .enumerate()
                .map(|(i, entry)| read_texture(entry, i))
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }
}

//=== Helpers =============================================================

/// Reads `path` through `convert`. A missing key is `None`; anything else
/// that fails is an error naming the key.
fn read<T>(
    doc: &Value,
    path: &str,
    convert: impl FnOnce(&Value) -> Result<T, JsonError>,
) -> Result<Option<T>, ConfigError> {
    let field = |source| ConfigError::Field {
        key: path.to_string(),
        source,
    };
    match doc.pointer(path) {
        Ok(value) => convert(value).map(Some).map_err(field),
        Err(JsonError::KeyNotFound(_)) => Ok(None),
        Err(e) => Err(field(e)),
    }
}

fn read_dimension(doc: &Value, path: &str) -> Result<Option<u32>, ConfigError> {
    match read(doc, path, Value::as_i64)? {
        None => Ok(None),
        Some(n) => u32::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .map(Some)
            .ok_or_else(|| invalid(path, "must be a positive integer")),
    }
}

fn read_required<T>(
    entry: &Value,
    list: &str,
    index: usize,
    key: &str,
    convert: impl FnOnce(&Value) -> Result<T, JsonError>,
) -> Result<T, ConfigError> {
    let path = format!("{list}.{index}.{key}");
    read(entry, key, convert)
        .map_err(|e| match e {
            ConfigError::Field { source, .. } => ConfigError::Field {
                key: path.clone(),
                source,
            },
            other => other,
        })?
        .ok_or_else(|| invalid(&path, "missing"))
}

fn read_font(entry: &Value, index: usize) -> Result<FontConfig, ConfigError> {
    let name = read_required(entry, "fonts", index, "name", |v| v.as_str().map(str::to_string))?;
    let source =
        read_required(entry, "fonts", index, "source", |v| v.as_str().map(str::to_string))?;
    let size = read_required(entry, "fonts", index, "size", Value::as_i64)?;
    let size = u32::try_from(size)
        .ok()
        .filter(|&s| s > 0)
        .ok_or_else(|| invalid(&format!("fonts.{index}.size"), "must be a positive integer"))?;
    Ok(FontConfig { name, source, size })
}

fn read_texture(entry: &Value, index: usize) -> Result<TextureConfig, ConfigError> {
    let name =
        read_required(entry, "textures", index, "name", |v| v.as_str().map(str::to_string))?;
    let uri = read_required(entry, "textures", index, "uri", |v| v.as_str().map(str::to_string))?;
    Ok(TextureConfig { name, uri })
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_application() {
        let config = EngineConfig::default();
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.logical_size, (1680, 1050));
        assert_eq!(config.tps, 60.0);
        assert_eq!(config.channel_capacity, 128);

        let names: Vec<&str> = config.fonts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["default8", "default12", "default24"]);
        assert!(config.fonts.iter().all(|f| f.source == DEFAULT_FONT_SOURCE));
    }

    #[test]
    fn empty_document_keeps_defaults() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = EngineConfig::from_json_str(
            r#"{
                "window": {"title": "Demo", "width": 1024},
                "engine": {"tps": 30},
                "textures": [{"name": "bg", "uri": "assets/bg.png"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.tps, 30.0);
        assert_eq!(config.fonts.len(), 3);
        assert_eq!(
            config.textures,
            vec![TextureConfig {
                name: "bg".to_string(),
                uri: "assets/bg.png".to_string(),
            }]
        );
    }

    #[test]
    fn font_list_replaces_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"fonts": [{"name": "title", "source": "t.ttf", "size": 40}]}"#,
        )
        .unwrap();
        assert_eq!(config.fonts, vec![FontConfig::new("title", "t.ttf", 40)]);
    }

    #[test]
    fn wrong_types_name_the_key() {
        let err = EngineConfig::from_json_str(r#"{"window": {"width": "wide"}}"#).unwrap_err();
        match err {
            ConfigError::Field { key, .. } => assert_eq!(key, "window.width"),
            other => panic!("unexpected {other:?}"),
        }

        let err = EngineConfig::from_json_str(r#"{"window": 5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Field { .. }));
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        for doc in [
            r#"{"engine": {"tps": 0}}"#,
            r#"{"engine": {"tps": 1e-310}}"#,
            r#"{"engine": {"channel_capacity": -1}}"#,
            r#"{"window": {"height": 0}}"#,
            r#"{"fonts": [{"name": "x", "source": "x.ttf", "size": 0}]}"#,
        ] {
            assert!(
                matches!(EngineConfig::from_json_str(doc), Err(ConfigError::Invalid { .. })),
                "{doc}"
            );
        }
    }

    #[test]
    fn incomplete_entries_are_reported() {
        let err = EngineConfig::from_json_str(r#"{"textures": [{"name": "bg"}]}"#).unwrap_err();
        match err {
            ConfigError::Invalid { key, reason } => {
                assert_eq!(key, "textures.0.uri");
                assert_eq!(reason, "missing");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_text_and_missing_files() {
        assert!(matches!(
            EngineConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::load("no/such/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
