//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages crossing the thread boundary in both directions.
//
//   platform → core: PlatformEvent over a bounded channel
//   core → platform: ShutdownNotifier, called once when the loop ends
//
// Nothing here names the windowing library, so the core thread builds
// and tests without a window.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Input gathered between two redraws.
    ///
    /// `discrete` keeps arrival order; `continuous` holds at most one
    /// event per kind.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}

//=== ShutdownNotifier ====================================================

/// Asks the platform to close the window once the core loop has stopped.
pub(crate) type ShutdownNotifier = Box<dyn FnOnce() + Send>;
