//=========================================================================
// State System
//=========================================================================
//
// Recursive stack of application states (menus, gameplay, overlays).
//
// Architecture:
//   StateManager
//     ├─ states: HashMap<K, Box<dyn State<K>>>   (registered once)
//     ├─ stack: Vec<K>                           (bottom → top)
//     └─ dispatch lists: update / render / poll  (stack filtered by
//                                                 capabilities)
//
// Flow (per frame):
//   poll()   → top → bottom, stops at the first state that handles it
//   update() → bottom → top
//   process_transitions() → push / swap / elevate / pop / clear
//   render() → bottom → top (overlays draw last)
//
// Only the top state has focus. Every state sees start/stop and
// focus-gained/focus-lost strictly alternating.
//
//=========================================================================

//=== Module Declarations =================================================

mod state_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use state_manager::{StateError, StateManager};
pub use transition_queue::{StateTransition, TransitionQueue};

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitOr, BitOrAssign};

//=== Internal Dependencies ===============================================

use crate::core::context::FrameContext;
use crate::core::input::InputEvent;
use crate::core::render::DrawSurface;

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// Typically implemented by a game-specific enum.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Capabilities ========================================================

/// Per-frame callbacks a state takes part in.
///
/// Queried once when the state is pushed and cached while it stays on the
/// stack.
///
/// ```rust
/// use stratum_engine::core::state::Capabilities;
///
/// let caps = Capabilities::UPDATE | Capabilities::RENDER;
/// assert!(caps.contains(Capabilities::RENDER));
/// assert!(!caps.contains(Capabilities::POLL));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const UPDATE: Self = Self(1);
    pub const RENDER: Self = Self(1 << 1);
    pub const POLL: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    /// True if every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

//=== State Trait =========================================================

/// A screen or mode living on the state stack.
///
/// Only `update()` is required. Lifecycle hooks default to doing nothing,
/// `render()` draws nothing and `poll()` handles nothing.
///
/// ```rust
/// # use stratum_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title }
/// # impl StateKey for Screen {}
/// struct Title {
///     ticks: u64,
/// }
///
/// impl State<Screen> for Title {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities::UPDATE | Capabilities::POLL
///     }
///
///     fn update(&mut self, _ctx: &mut FrameContext<Screen>) {
///         self.ticks += 1;
///     }
///
///     fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<Screen>) -> bool {
///         if event.is_key_down(KeyCode::Escape) {
///             ctx.transitions.push(StateTransition::Pop);
///             return true;
///         }
///         false
///     }
/// }
/// ```
pub trait State<K: StateKey>: Send {
    /// Which per-frame callbacks to receive while on the stack.
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    /// Called when the state enters the stack.
    fn on_start(&mut self, _ctx: &mut FrameContext<K>) {}

    /// Called when the state leaves the stack.
    fn on_stop(&mut self, _ctx: &mut FrameContext<K>) {}

    /// Called when the state becomes the top of the stack.
    fn on_focus_gained(&mut self, _ctx: &mut FrameContext<K>) {}

    /// Called when the state stops being the top of the stack.
    fn on_focus_lost(&mut self, _ctx: &mut FrameContext<K>) {}

    /// Called every tick while on the stack.
    fn update(&mut self, ctx: &mut FrameContext<K>);

    /// Draws the state.
    fn render(&mut self, _surface: &mut dyn DrawSurface, _ctx: &FrameContext<K>) {}

    /// Offers an input event. Return true to stop it reaching states below.
    fn poll(&mut self, _event: &InputEvent, _ctx: &mut FrameContext<K>) -> bool {
        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_combine() {
        let mut caps = Capabilities::NONE;
        assert!(caps.is_empty());

        caps |= Capabilities::POLL;
        assert!(caps.contains(Capabilities::POLL));
        assert!(!caps.contains(Capabilities::UPDATE));

        let all = Capabilities::UPDATE | Capabilities::RENDER | Capabilities::POLL;
        assert_eq!(all, Capabilities::ALL);
        assert_eq!(Capabilities::default(), Capabilities::ALL);
        assert!(all.contains(Capabilities::NONE));
    }
}
