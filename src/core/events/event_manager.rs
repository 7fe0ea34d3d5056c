//=========================================================================
// Event Manager
//=========================================================================
//
// Deferred pub/sub keyed by event name.
//
// Queued events wait in an unbounded channel until `flush()`. A flush
// delivers only the events present when it began; anything queued by a
// handler during delivery waits for the next flush. Handlers are looked up
// at delivery time, so a handler removed before the flush never fires.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{EventDict, EventError};

//=== Types ===============================================================

/// Callback invoked with each delivered event.
pub type EventHandler = Arc<dyn Fn(&EventDict) -> Result<(), EventError> + Send + Sync>;

type HandlerMap = HashMap<String, Vec<(u64, EventHandler)>>;

/// Token returned by [`EventManager::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    name: String,
    id: u64,
}

impl Subscription {
    pub fn event_name(&self) -> &str {
        &self.name
    }
}

//=== EventManager ========================================================

/// Named event queue with deferred delivery.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use stratum_engine::core::events::{EventDict, EventManager};
///
/// let events = EventManager::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// events.subscribe("score", move |dict| {
///     sink.lock().unwrap().push(*dict.get::<u32>("points")?);
///     Ok(())
/// });
///
/// events.queue("score", EventDict::new().with("points", 10u32));
/// assert_eq!(events.flush(), 1);
/// assert_eq!(*seen.lock().unwrap(), vec![10]);
/// ```
pub struct EventManager {
    handlers: RwLock<HandlerMap>,
    sender: Sender<(String, EventDict)>,
    receiver: Receiver<(String, EventDict)>,
    next_id: AtomicU64,
}

impl EventManager {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            handlers: RwLock::new(HashMap::new()),
            sender,
            receiver,
            next_id: AtomicU64::new(1),
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Registers `handler` for events named `name`.
    pub fn subscribe<F>(&self, name: &str, handler: F) -> Subscription
    where
        F: Fn(&EventDict) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push((id, Arc::new(handler)));

        trace!("Subscribed handler {} to \"{}\"", id, name);
        Subscription {
            name: name.to_string(),
            id,
        }
    }

    /// Removes a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = handlers.get_mut(&subscription.name) else {
            return false;
        };

        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        let removed = list.len() != before;

        if list.is_empty() {
            handlers.remove(&subscription.name);
        }
        removed
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }

    //--- Queueing & Delivery ----------------------------------------------

    /// Queues an event for the next flush.
    ///
    /// Returns false, and drops the event, when nothing is subscribed to
    /// `name`.
    pub fn queue(&self, name: &str, dict: EventDict) -> bool {
        if self.subscriber_count(name) == 0 {
            trace!("No subscribers for \"{}\", event dropped", name);
            return false;
        }
        // The manager owns the receiver, so the channel cannot disconnect.
        self.sender.send((name.to_string(), dict)).is_ok()
    }

    /// Number of events waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Delivers every event queued before this call. Returns how many
    /// events were delivered.
    pub fn flush(&self) -> usize {
        let batch: Vec<(String, EventDict)> =
            self.receiver.try_iter().take(self.receiver.len()).collect();

        for (name, dict) in &batch {
            trace!("Flushing \"{}\"", name);

            let handlers: Vec<EventHandler> = self
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(name)
                .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default();

            for handler in handlers {
                if let Err(e) = handler(dict) {
                    warn!("Handler for \"{}\" failed: {}", name, e);
                }
            }
        }

        batch.len()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
