//=========================================================================
// State Manager
//=========================================================================
//
// Owns registered states, the stack of active keys and the per-callback
// dispatch lists.
//
// States are registered once by key and keep their data between
// activations. The dispatch lists are rebuilt from the stack after every
// change, using the capabilities cached when each state was pushed, so
// they always equal the stack filtered by capability, in stack order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, trace, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{Capabilities, State, StateKey, StateTransition};
use crate::core::context::FrameContext;
use crate::core::input::InputEvent;
use crate::core::render::DrawSurface;

//=== StateError ==========================================================

/// Reasons a stack operation or registration is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError<K: StateKey> {
    #[error("state {0:?} is not registered")]
    NotRegistered(K),

    #[error("state {0:?} is already on the stack")]
    AlreadyOnStack(K),

    #[error("state {0:?} is on the stack and cannot be replaced or removed")]
    Active(K),
}

//=== Hook ================================================================

#[derive(Debug, Clone, Copy)]
enum Hook {
    Start,
    Stop,
    FocusGained,
    FocusLost,
}

//=== StateManager ========================================================

/// Stack-based state machine with focus tracking.
///
/// ```rust
/// # use stratum_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Menu, Options }
/// # impl StateKey for Screen {}
/// # struct Blank;
/// # impl State<Screen> for Blank {
/// #     fn update(&mut self, _ctx: &mut FrameContext<Screen>) {}
/// # }
/// let mut ctx = FrameContext::new();
/// let mut states = StateManager::new();
/// states.register(Screen::Menu, Blank).unwrap();
/// states.register(Screen::Options, Blank).unwrap();
///
/// states.push(Screen::Menu, &mut ctx).unwrap();
/// states.push(Screen::Options, &mut ctx).unwrap();
/// assert_eq!(states.current(), Some(Screen::Options));
///
/// states.pop(&mut ctx);
/// assert_eq!(states.stack(), &[Screen::Menu]);
/// ```
pub struct StateManager<K: StateKey> {
    states: HashMap<K, Box<dyn State<K>>>,
    stack: Vec<K>,
    capabilities: HashMap<K, Capabilities>,
    updateables: Vec<K>,
    renderables: Vec<K>,
    pollables: Vec<K>,
}

impl<K: StateKey> StateManager<K> {
    /// Upper bound on transition rounds per tick, in case states keep
    /// requesting transitions from their lifecycle hooks.
    const MAX_TRANSITION_ROUNDS: usize = 64;

    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            stack: Vec::new(),
            capabilities: HashMap::new(),
            updateables: Vec::new(),
            renderables: Vec::new(),
            pollables: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `state` under `key`.
    ///
    /// Returns the state previously registered under `key`, if any.
    /// Replacing a state that is on the stack is refused.
    pub fn register<T>(
        &mut self,
        key: K,
        state: T,
    ) -> Result<Option<Box<dyn State<K>>>, StateError<K>>
    where
        T: State<K> + 'static,
    {
        if self.stack.contains(&key) {
            return Err(StateError::Active(key));
        }

        let previous = self.states.insert(key, Box::new(state));
        if previous.is_some() {
            warn!("State {:?} was already registered and has been replaced", key);
        }
        Ok(previous)
    }

    /// Removes and returns a state that is not on the stack.
    pub fn unregister(&mut self, key: K) -> Result<Box<dyn State<K>>, StateError<K>> {
        if self.stack.contains(&key) {
            return Err(StateError::Active(key));
        }
        self.states.remove(&key).ok_or(StateError::NotRegistered(key))
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    //--- Stack Operations -------------------------------------------------

    /// Puts `key` on top. The old top loses focus; the new state starts and
    /// then gains focus.
    pub fn push(&mut self, key: K, ctx: &mut FrameContext<K>) -> Result<(), StateError<K>> {
        self.ensure_registered(key)?;
        if self.stack.contains(&key) {
            return Err(StateError::AlreadyOnStack(key));
        }

        debug!("Pushing state {:?}", key);
        if let Some(top) = self.current() {
            self.notify(top, Hook::FocusLost, ctx);
        }
        self.enter(key, ctx);
        Ok(())
    }

    /// Replaces the top with `key`.
    ///
    /// The old top loses focus and stops before the new state starts and
    /// gains focus, so the state underneath never sees focus. On an empty
    /// stack this is a push. Swapping the top with itself restarts it.
    pub fn swap(&mut self, key: K, ctx: &mut FrameContext<K>) -> Result<(), StateError<K>> {
        self.ensure_registered(key)?;

        let Some(top) = self.current() else {
            return self.push(key, ctx);
        };
        if top != key && self.stack.contains(&key) {
            return Err(StateError::AlreadyOnStack(key));
        }

        debug!("Swapping state {:?} for {:?}", top, key);
        self.notify(top, Hook::FocusLost, ctx);
        self.leave_top(ctx);
        self.enter(key, ctx);
        Ok(())
    }

    /// Brings `key` to the top.
    ///
    /// A state not on the stack is pushed. The current top is left alone.
    /// Otherwise the top loses focus and `key` moves up and gains focus
    /// without restarting.
    pub fn elevate(&mut self, key: K, ctx: &mut FrameContext<K>) -> Result<(), StateError<K>> {
        self.ensure_registered(key)?;

        let Some(position) = self.stack.iter().position(|&k| k == key) else {
            return self.push(key, ctx);
        };
        let Some(top) = self.current() else {
            return Ok(());
        };
        if top == key {
            trace!("State {:?} is already on top", key);
            return Ok(());
        }

        debug!("Elevating state {:?}", key);
        self.notify(top, Hook::FocusLost, ctx);
        self.stack.remove(position);
        self.stack.push(key);
        self.rebuild_dispatch();
        self.notify(key, Hook::FocusGained, ctx);
        Ok(())
    }

    /// Removes the top. The state underneath regains focus.
    ///
    /// Returns the removed key, or `None` on an empty stack.
    pub fn pop(&mut self, ctx: &mut FrameContext<K>) -> Option<K> {
        let top = self.current()?;

        debug!("Popping state {:?}", top);
        self.notify(top, Hook::FocusLost, ctx);
        self.leave_top(ctx);

        if let Some(next) = self.current() {
            self.notify(next, Hook::FocusGained, ctx);
        }
        Some(top)
    }

    /// Empties the stack. The top loses focus, then every state stops,
    /// top to bottom.
    pub fn clear(&mut self, ctx: &mut FrameContext<K>) {
        let Some(top) = self.current() else {
            return;
        };

        debug!("Clearing {} states", self.stack.len());
        self.notify(top, Hook::FocusLost, ctx);
        while !self.stack.is_empty() {
            self.leave_top(ctx);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// The focused state.
    pub fn current(&self) -> Option<K> {
        self.stack.last().copied()
    }

    pub fn contains(&self, key: K) -> bool {
        self.stack.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Active keys, bottom first.
    pub fn stack(&self) -> &[K] {
        &self.stack
    }

    //--- Frame Dispatch ---------------------------------------------------

    /// Updates every state wanting updates, bottom to top.
    pub fn update(&mut self, ctx: &mut FrameContext<K>) {
        for key in &self.updateables {
            if let Some(state) = self.states.get_mut(key) {
                state.update(ctx);
            }
        }
    }

    /// Renders every state wanting rendering, bottom to top.
    pub fn render(&mut self, surface: &mut dyn DrawSurface, ctx: &FrameContext<K>) {
        for key in &self.renderables {
            if let Some(state) = self.states.get_mut(key) {
                state.render(surface, ctx);
            }
        }
    }

    /// Offers `event` to polling states, top to bottom, until one
    /// handles it. Returns whether any did.
    pub fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<K>) -> bool {
        for key in self.pollables.iter().rev() {
            if let Some(state) = self.states.get_mut(key) {
                if state.poll(event, ctx) {
                    trace!("{:?} handled by {:?}", event, key);
                    return true;
                }
            }
        }
        false
    }

    //--- Transition Processing --------------------------------------------

    /// Applies queued transitions oldest first.
    ///
    /// Transitions queued by lifecycle hooks during processing are applied
    /// in the same call. Refused transitions are logged and skipped.
    /// Returns the number applied.
    pub fn process_transitions(&mut self, ctx: &mut FrameContext<K>) -> usize {
        let mut applied = 0;

        for _ in 0..Self::MAX_TRANSITION_ROUNDS {
            let batch = ctx.transitions.take();
            if batch.is_empty() {
                return applied;
            }

            for transition in batch {
                match self.apply(transition, ctx) {
                    Ok(()) => applied += 1,
                    Err(e) => warn!("Transition {:?} refused: {}", transition, e),
                }
            }
        }

        warn!(
            "Transitions still pending after {} rounds, deferring {} to next tick",
            Self::MAX_TRANSITION_ROUNDS,
            ctx.transitions.len()
        );
        for pending in ctx.transitions.iter() {
            debug!("Deferred transition: {:?}", pending);
        }
        applied
    }

    fn apply(
        &mut self,
        transition: StateTransition<K>,
        ctx: &mut FrameContext<K>,
    ) -> Result<(), StateError<K>> {
        match transition {
            StateTransition::Push(key) => self.push(key, ctx),
            StateTransition::Swap(key) => self.swap(key, ctx),
            StateTransition::Elevate(key) => self.elevate(key, ctx),
            StateTransition::Pop => {
                if self.pop(ctx).is_none() {
                    trace!("Pop on empty stack ignored");
                }
                Ok(())
            }
            StateTransition::Clear => {
                self.clear(ctx);
                Ok(())
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn ensure_registered(&self, key: K) -> Result<(), StateError<K>> {
        if self.states.contains_key(&key) {
            Ok(())
        } else {
            Err(StateError::NotRegistered(key))
        }
    }

    /// Pushes `key`, caches its capabilities, starts it and focuses it.
    fn enter(&mut self, key: K, ctx: &mut FrameContext<K>) {
        let caps = self
            .states
            .get(&key)
            .map_or(Capabilities::NONE, |state| state.capabilities());
        self.capabilities.insert(key, caps);
        self.stack.push(key);
        self.rebuild_dispatch();

        self.notify(key, Hook::Start, ctx);
        self.notify(key, Hook::FocusGained, ctx);
    }

    /// Stops and removes the top. Focus must already have been taken away.
    fn leave_top(&mut self, ctx: &mut FrameContext<K>) {
        if let Some(key) = self.stack.pop() {
            self.capabilities.remove(&key);
            self.rebuild_dispatch();
            self.notify(key, Hook::Stop, ctx);
        }
    }

    fn notify(&mut self, key: K, hook: Hook, ctx: &mut FrameContext<K>) {
        let Some(state) = self.states.get_mut(&key) else {
            warn!("State {:?} vanished before {:?}", key, hook);
            return;
        };

        trace!("{:?} → {:?}", key, hook);
        match hook {
            Hook::Start => state.on_start(ctx),
            Hook::Stop => state.on_stop(ctx),
            Hook::FocusGained => state.on_focus_gained(ctx),
            Hook::FocusLost => state.on_focus_lost(ctx),
        }
    }

    fn rebuild_dispatch(&mut self) {
        self.updateables.clear();
        self.renderables.clear();
        self.pollables.clear();

        for key in &self.stack {
            let caps = self
                .capabilities
                .get(key)
                .copied()
                .unwrap_or(Capabilities::NONE);
            if caps.contains(Capabilities::UPDATE) {
                self.updateables.push(*key);
            }
            if caps.contains(Capabilities::RENDER) {
                self.renderables.push(*key);
            }
            if caps.contains(Capabilities::POLL) {
                self.pollables.push(*key);
            }
        }
    }
}

impl<K: StateKey> Default for StateManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
