//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports of the types most applications touch.
//
// Usage:
//   use stratum_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine and configuration
pub use crate::config::{EngineConfig, FontConfig, TextureConfig, WindowConfig};
pub use crate::core::systems::EngineSystems;
pub use crate::engine::{Engine, EngineBuilder};

// State stack
pub use crate::core::context::FrameContext;
pub use crate::core::state::{Capabilities, State, StateKey, StateManager, StateTransition};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

// Events
pub use crate::core::events::{EventDict, EventError, EventManager};

// Rendering and assets
pub use crate::core::render::{Color, DrawSurface, Rect, RecordingSurface};
pub use crate::core::resource::TextureManager;
pub use crate::core::writer::Writer;

// Utilities
pub use crate::core::random::RandomGenerator;
pub use crate::core::timer::Timer;
pub use crate::json::Value;
