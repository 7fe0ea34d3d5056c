//=========================================================================
// Input
//=========================================================================
//
// Engine-side input types. Conversion from the windowing library lives in
// the platform layer; everything here is platform independent.
//
//=========================================================================

pub mod event;

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
