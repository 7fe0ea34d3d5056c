//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit input into engine `InputEvent`s.
//
// Modifier state arrives as its own winit event, so it is cached here and
// stamped onto every key and button event that follows. Keys the engine
// does not name are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Translation ------------------------------------------------------

    /// `None` for keys without an engine `KeyCode`.
    pub(crate) fn process_key_event(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        match KeyCode::from(code) {
            KeyCode::Unidentified => None,
            key => Some(self.key_event(key, event.state)),
        }
    }

    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn process_cursor(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved {
            x: x as f32,
            y: y as f32,
        }
    }

    fn key_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit already folds platform keys (Cmd → Ctrl on macOS).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 | W::Numpad0 => KeyCode::Digit0,
            W::Digit1 | W::Numpad1 => KeyCode::Digit1,
            W::Digit2 | W::Numpad2 => KeyCode::Digit2,
            W::Digit3 | W::Numpad3 => KeyCode::Digit3,
            W::Digit4 | W::Numpad4 => KeyCode::Digit4,
            W::Digit5 | W::Numpad5 => KeyCode::Digit5,
            W::Digit6 | W::Numpad6 => KeyCode::Digit6,
            W::Digit7 | W::Numpad7 => KeyCode::Digit7,
            W::Digit8 | W::Numpad8 => KeyCode::Digit8,
            W::Digit9 | W::Numpad9 => KeyCode::Digit9,

            W::KeyA => KeyCode::KeyA,
            W::KeyB => KeyCode::KeyB,
            W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD,
            W::KeyE => KeyCode::KeyE,
            W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG,
            W::KeyH => KeyCode::KeyH,
            W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ,
            W::KeyK => KeyCode::KeyK,
            W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM,
            W::KeyN => KeyCode::KeyN,
            W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP,
            W::KeyQ => KeyCode::KeyQ,
            W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS,
            W::KeyT => KeyCode::KeyT,
            W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV,
            W::KeyW => KeyCode::KeyW,
            W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY,
            W::KeyZ => KeyCode::KeyZ,

            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,

            W::Space => KeyCode::Space,
            W::Enter | W::NumpadEnter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn held(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        state.set(ModifiersState::SHIFT, shift);
        state.set(ModifiersState::CONTROL, ctrl);
        state.set(ModifiersState::ALT, alt);
        state
    }

    #[test]
    fn starts_unmodified() {
        assert!(InputProcessor::new().modifiers().is_empty());
    }

    #[test]
    fn cached_modifiers_are_stamped_on_keys() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(held(false, true, false));

        let event = processor.key_event(KeyCode::KeyS, ElementState::Pressed);
        assert_eq!(
            event,
            InputEvent::KeyDown {
                key: KeyCode::KeyS,
                modifiers: Modifiers::CTRL
            }
        );

        let event = processor.key_event(KeyCode::KeyS, ElementState::Released);
        assert!(event.is_key_up(KeyCode::KeyS));
        assert_eq!(event.modifiers(), Some(Modifiers::CTRL));
    }

    #[test]
    fn cached_modifiers_are_stamped_on_buttons() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(held(true, false, true));

        let event = processor.process_mouse_button(WinitMouseButton::Back, ElementState::Pressed);
        assert_eq!(
            event,
            InputEvent::MouseButtonDown {
                button: MouseButton::Other,
                modifiers: Modifiers {
                    shift: true,
                    ctrl: false,
                    alt: true
                },
            }
        );

        processor.update_modifiers(held(false, false, false));
        let event = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);
        assert_eq!(event.modifiers(), Some(Modifiers::NONE));
    }

    #[test]
    fn cursor_position_is_narrowed() {
        let processor = InputProcessor::new();
        match processor.process_cursor(123.5, 456.25) {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (123.5, 456.25)),
            other => panic!("Expected MouseMoved, got {:?}", other),
        }
    }

    #[test]
    fn key_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::KeyQ);
        assert_eq!(KeyCode::from(WinitKeyCode::Numpad7), KeyCode::Digit7);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::Enter);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
    }

    #[test]
    fn button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Other(9)), MouseButton::Other);
    }
}
