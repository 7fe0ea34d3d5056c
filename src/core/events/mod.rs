//=========================================================================
// Event System
//=========================================================================
//
// Named, deferred publish/subscribe.
//
// Architecture:
//   EventManager
//     ├─ handlers: name → [(id, handler)]
//     └─ queue:    (name, EventDict) FIFO
//
// Flow:
//   queue("menu.selected", dict) → (stored if subscribed)
//   flush() → snapshot queue → handler(&dict) for each subscriber
//
// Shared between states through `Arc<EventManager>`; every operation takes
// `&self`, so any thread may queue while another flushes.
//
//=========================================================================

//=== Module Declarations =================================================

mod event_dict;
mod event_manager;

//=== Public API ==========================================================

pub use event_dict::EventDict;
pub use event_manager::{EventHandler, EventManager, Subscription};

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EventError ==========================================================

/// Errors raised while reading event payloads or running handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The dictionary has no entry under this key.
    #[error("event key \"{0}\" not present")]
    MissingKey(String),

    /// The entry exists but holds another type.
    #[error("event key \"{key}\" does not hold a {expected}")]
    WrongType { key: String, expected: &'static str },

    /// A handler refused the event.
    #[error("handler failed: {0}")]
    Handler(String),
}
