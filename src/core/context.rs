//=========================================================================
// Frame Context
//=========================================================================
//
// Shared data handed to states during every callback.
//
// Contents:
// - transitions: stack-change requests, applied at the tick boundary
// - events:      shared pub/sub queue, flushed once per tick
// - textures:    named texture cache
// - writer:      named fonts and pen colour
// - rng:         WELL512 generator
// - frame/delta: tick counter and the duration of the last tick
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::events::EventManager;
use crate::core::random::RandomGenerator;
use crate::core::resource::TextureManager;
use crate::core::state::{StateKey, TransitionQueue};
use crate::core::writer::Writer;

//=== FrameContext ========================================================

/// Data every state can read and write.
pub struct FrameContext<K: StateKey> {
    /// Requests for the state manager, applied after `update()`.
    pub transitions: TransitionQueue<K>,

    /// Event queue. Clone the `Arc` to publish from other threads.
    pub events: Arc<EventManager>,

    pub textures: TextureManager,

    pub writer: Writer,

    pub rng: RandomGenerator,

    frame: u64,
    delta: Duration,
}

impl<K: StateKey> FrameContext<K> {
    pub fn new() -> Self {
        Self {
            transitions: TransitionQueue::new(),
            events: Arc::new(EventManager::new()),
            textures: TextureManager::new(),
            writer: Writer::new(),
            rng: RandomGenerator::new(),
            frame: 0,
            delta: Duration::ZERO,
        }
    }

    /// Ticks completed before the current one.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Length of the previous tick.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Marks the start of a tick that follows one lasting `delta`.
    pub(crate) fn begin_frame(&mut self, delta: Duration) {
        self.delta = delta;
    }

    pub(crate) fn end_frame(&mut self) {
        self.frame += 1;
    }
}

impl<K: StateKey> Default for FrameContext<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Screen {
        Main,
    }

    impl StateKey for Screen {}

    #[test]
    fn frame_counter_advances() {
        let mut ctx = FrameContext::<Screen>::new();
        assert_eq!(ctx.frame(), 0);

        ctx.begin_frame(Duration::from_millis(16));
        assert_eq!(ctx.delta(), Duration::from_millis(16));
        ctx.end_frame();
        assert_eq!(ctx.frame(), 1);
        assert!(ctx.transitions.is_empty());
    }

    #[test]
    fn context_moves_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<FrameContext<Screen>>();
        let _ = Screen::Main;
    }
}
