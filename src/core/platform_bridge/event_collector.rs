//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side receiver for platform messages.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → inputs → TickControl
//
// Each tick drains a bounded number of messages so a flood of input
// cannot stall the logic thread. Inputs are flattened in arrival order:
// every batch contributes its discrete events, then its continuous ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Whether the core loop keeps running after this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    inputs: Vec<InputEvent>,
}

impl EventCollector {
    /// Messages drained per tick; the rest wait for the next one.
    const MAX_MESSAGES_PER_TICK: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            inputs: Vec::with_capacity(32),
        }
    }

    /// Drains pending messages into this tick's input list.
    ///
    /// Returns `Exit` when the window closed or the platform hung up.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.inputs.clear();
        let mut drained = 0;

        while drained < Self::MAX_MESSAGES_PER_TICK {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                    self.inputs.extend(discrete);
                    self.inputs.extend(continuous);
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_MESSAGES_PER_TICK {
            warn!("Platform backlog: {} messages left for next tick", self.receiver.len());
        } else if drained > 0 {
            trace!("Collected {} input events from {} messages", self.inputs.len(), drained);
        }

        TickControl::Continue
    }

    /// Takes this tick's input, leaving the collector empty.
    pub(crate) fn take_inputs(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.inputs)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn empty_queue_continues() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.take_inputs().is_empty());
    }

    #[test]
    fn batches_flatten_in_arrival_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![key(KeyCode::KeyA)],
            continuous: vec![InputEvent::MouseMoved { x: 1.0, y: 2.0 }],
        })
        .unwrap();
        tx.send(PlatformEvent::Inputs {
            discrete: vec![key(KeyCode::KeyB)],
            continuous: vec![],
        })
        .unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        let inputs = collector.take_inputs();
        assert_eq!(inputs.len(), 3);
        assert!(inputs[0].is_key_down(KeyCode::KeyA));
        assert!(matches!(inputs[1], InputEvent::MouseMoved { .. }));
        assert!(inputs[2].is_key_down(KeyCode::KeyB));
        assert!(collector.take_inputs().is_empty());
    }

    #[test]
    fn window_closed_exits() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn previous_tick_is_cleared() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![key(KeyCode::Space)],
            continuous: vec![],
        })
        .unwrap();
        collector.collect_frame();

        collector.collect_frame();
        assert!(collector.take_inputs().is_empty());
    }

    #[test]
    fn disconnect_exits() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn backlog_is_bounded_per_tick() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        let total = EventCollector::MAX_MESSAGES_PER_TICK + 5;
        for _ in 0..total {
            tx.send(PlatformEvent::Inputs {
                discrete: vec![key(KeyCode::KeyX)],
                continuous: vec![],
            })
            .unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.take_inputs().len(), EventCollector::MAX_MESSAGES_PER_TICK);

        collector.collect_frame();
        assert_eq!(collector.take_inputs().len(), 5);
    }
}
