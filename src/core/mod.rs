//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Engine logic that runs off the platform thread.
//
// Architecture:
// ```text
//   Platform (main thread)            Logic thread @ TPS
//   ──────────────────────            ──────────────────────────────
//   PlatformEvent ──channel──────►    EventCollector::collect_frame()
//                                       ↓
//                                     EngineSystems::tick()
//                                       poll → update → transitions
//                                       → render → event flush
//                                       ↓
//   exit event loop ◄──notifier───    window closed or stack empty
// ```
//
// The orchestrator owns the systems. `Engine::init` configures them on
// the calling thread before they move to the logic thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod context;
pub mod events;
pub mod input;
pub mod random;
pub mod render;
pub mod resource;
pub mod state;
pub mod systems;
pub mod timer;
pub mod writer;

pub(crate) mod platform_bridge;

//=== External Dependencies ===============================================

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use platform_bridge::{EventCollector, PlatformEvent, ShutdownNotifier, TickControl};
use render::DrawSurface;
use state::StateKey;
use systems::EngineSystems;
use timer::Timer;

//=== CoreSystemsOrchestrator =============================================

/// Owns the engine systems and drives them at a fixed tick rate.
pub(crate) struct CoreSystemsOrchestrator<K: StateKey> {
    systems: EngineSystems<K>,
}

impl<K: StateKey> CoreSystemsOrchestrator<K> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(surface: Box<dyn DrawSurface + Send>, config: &EngineConfig) -> Self {
        let mut systems = EngineSystems::new(surface);
        systems.apply_config(config);
        Self { systems }
    }

    /// Gives `init_fn` access to the systems before the loop starts.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut EngineSystems<K>),
    {
        init_fn(&mut self.systems);
        debug!("Initial stack: {:?}", self.systems.states.stack());
    }

    //--- Execution --------------------------------------------------------

    /// Moves the systems to a new logic thread ticking at `tps`.
    ///
    /// `on_exit` runs on that thread once the loop ends and every state
    /// has been stopped.
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
        on_exit: ShutdownNotifier,
    ) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("stratum-core".to_string())
            .spawn(move || {
                let mut systems = self.systems;
                Self::run_loop(&mut systems, EventCollector::new(receiver), tps);
                systems.shutdown();
                on_exit();
            })
    }

    /// Ticks until the platform closes or the state stack empties.
    fn run_loop(systems: &mut EngineSystems<K>, mut collector: EventCollector, tps: f64) {
        let tick_duration = Duration::try_from_secs_f64(1.0 / tps).unwrap_or_else(|_| {
            warn!("Tick rate {} out of range, running unpaced", tps);
            Duration::ZERO
        });
        let mut tick_timer = Timer::new();
        tick_timer.start();

        info!("Core loop started ({:.1} TPS)", tps);

        loop {
            let tick_start = Instant::now();

            if collector.collect_frame() == TickControl::Exit {
                info!("Platform closed, core loop exiting");
                break;
            }

            let delta = tick_timer.elapsed();
            tick_timer.restart();

            let inputs = collector.take_inputs();
            systems.tick(&inputs, delta);

            if systems.states.is_empty() {
                info!("State stack empty, core loop exiting");
                break;
            }

            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                thread::sleep(tick_duration - elapsed);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
