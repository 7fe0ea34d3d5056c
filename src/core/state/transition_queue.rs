//=========================================================================
// Transition Queue
//=========================================================================
//
// States request stack changes here while they update or poll. The state
// manager applies them at the tick boundary, oldest first.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::StateKey;

//=== StateTransition =====================================================

/// A requested change to the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTransition<K: StateKey> {
    /// Puts a state on top of the current one.
    Push(K),

    /// Replaces the top state.
    Swap(K),

    /// Moves a state already on the stack to the top, or pushes it.
    Elevate(K),

    /// Removes the top state.
    Pop,

    /// Removes every state.
    Clear,
}

//=== TransitionQueue =====================================================

/// FIFO of requested transitions.
#[derive(Debug)]
pub struct TransitionQueue<K: StateKey> {
    queue: Vec<StateTransition<K>>,
}

impl<K: StateKey> TransitionQueue<K> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition for the next tick boundary.
    pub fn push(&mut self, transition: StateTransition<K>) {
        self.queue.push(transition);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTransition<K>> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all transitions, leaving the queue empty.
    pub fn take(&mut self) -> Vec<StateTransition<K>> {
        std::mem::take(&mut self.queue)
    }
}

impl<K: StateKey> Default for TransitionQueue<K> {
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
        Menu,
        Play,
    }

    impl StateKey for Screen {}

    #[test]
    fn take_preserves_order_and_empties() {
        let mut queue = TransitionQueue::new();
        queue.push(StateTransition::Push(Screen::Menu));
        queue.push(StateTransition::Swap(Screen::Play));
        queue.push(StateTransition::Pop);
        assert_eq!(queue.len(), 3);

        let taken = queue.take();
        assert_eq!(
            taken,
            vec![
                StateTransition::Push(Screen::Menu),
                StateTransition::Swap(Screen::Play),
                StateTransition::Pop,
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_discards() {
        let mut queue = TransitionQueue::new();
        queue.push(StateTransition::<Screen>::Clear);
        assert_eq!(queue.iter().count(), 1);
        queue.clear();
        assert!(queue.is_empty());
    }
}
