//=========================================================================
// Stratum Engine
//=========================================================================
//
// Entry point that wires the platform and the logic thread together.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>
//         │                          │                              │
//         ├─ with_tps()              └─ config applied:             ├─ spawns logic thread
//         ├─ with_channel_capacity()    fonts, textures,            ├─ runs event loop
//         ├─ with_config()              logical size                └─ joins on exit
//         └─ with_surface()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::config::{EngineConfig, WindowConfig};
use crate::core::platform_bridge::{PlatformEvent, ShutdownNotifier};
use crate::core::render::{DrawSurface, RecordingSurface};
use crate::core::state::StateKey;
use crate::core::systems::EngineSystems;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::{CoreSignal, Platform};

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic ticks per second)
/// - **Channel capacity**: 128 platform messages
/// - **Config**: [`EngineConfig::default`]
/// - **Surface**: [`RecordingSurface`]
///
/// # Examples
///
/// ```no_run
/// use stratum_engine::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Title }
/// impl StateKey for Screen {}
///
/// struct Title;
/// impl State<Screen> for Title {
///     fn update(&mut self, _ctx: &mut FrameContext<Screen>) {}
/// }
///
/// EngineBuilder::<Screen>::new()
///     .with_tps(120.0)
///     .with_channel_capacity(256)
///     .build()
///     .init(|systems| {
///         systems.states.register(Screen::Title, Title).unwrap();
///         systems.states.push(Screen::Title, &mut systems.context).unwrap();
///     })
///     .run();
/// ```
pub struct EngineBuilder<K: StateKey> {
    tps: f64,
    channel_capacity: usize,
    config: EngineConfig,
    surface: Option<Box<dyn DrawSurface + Send>>,
    _phantom: std::marker::PhantomData<K>,
}

impl<K: StateKey> EngineBuilder<K> {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            tps: config.tps,
            channel_capacity: config.channel_capacity,
            config,
            surface: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Sets the logic thread's tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0` or so small that one tick would last forever.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(
            tps > 0.0 && (1.0 / tps).is_finite(),
            "TPS must be positive, got {}",
            tps
        );
        self.tps = tps;
        self
    }

    /// Sets how many platform messages may queue for the logic thread.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Replaces the configuration, including its tick rate and channel
    /// capacity. Later `with_tps`/`with_channel_capacity` calls still win.
    pub fn with_config(self, config: EngineConfig) -> Self {
        let tps = config.tps;
        let capacity = config.channel_capacity;
        Self { config, ..self }.with_tps(tps).with_channel_capacity(capacity)
    }

    /// Sets the surface states render to.
    pub fn with_surface(mut self, surface: Box<dyn DrawSurface + Send>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Creates the engine and applies the configuration to its systems.
    pub fn build(self) -> Engine<K> {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let surface = self
            .surface
            .unwrap_or_else(|| Box::new(RecordingSurface::new()));

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(surface, &self.config),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: self.config.window,
        }
    }
}

impl<K: StateKey> Default for EngineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// The engine runtime.
///
/// ```text
/// Engine (main thread)
///   ├─► CoreSystemsOrchestrator (logic thread @ TPS)
///   │     └─► StateManager, FrameContext, DrawSurface
///   │
///   └─► Platform (winit event loop)
///         └─► window, input batching
/// ```
pub struct Engine<K: StateKey> {
    orchestrator: CoreSystemsOrchestrator<K>,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl<K: StateKey> Engine<K> {
    /// Registers states, pushes the first one and subscribes to events
    /// before the engine starts.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut EngineSystems<K>),
    {
        info!("Initializing engine systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    /// Runs until the window closes or the state stack empties.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the event loop and the platform → core channel
    /// 2. Spawns the logic thread at the configured TPS
    /// 3. Runs the event loop on this thread
    /// 4. Joins the logic thread, which stops every remaining state
    ///
    /// Failures are logged; the call always returns once both sides
    /// have stopped.
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let event_loop = match Platform::event_loop() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                error!("Platform error: {}", e);
                return;
            }
        };

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        let proxy = event_loop.create_proxy();
        let on_exit: ShutdownNotifier = Box::new(move || {
            if proxy.send_event(CoreSignal::Shutdown).is_err() {
                debug!("Event loop already closed");
            }
        });

        let core_handle = match self.orchestrator.spawn_core_thread(rx, self.tps, on_exit) {
            Ok(handle) => handle,
            Err(e) => {
                error!("Core thread could not start: {}", e);
                return;
            }
        };
        info!("Core logic thread spawned");

        let platform = Platform::new(tx, self.window);
        if let Err(e) = platform.run(event_loop) {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScreen {
        Main,
    }

    impl StateKey for TestScreen {}

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::<TestScreen>::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert!(builder.surface.is_none());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::<TestScreen>::new().with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::<TestScreen>::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::<TestScreen>::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_subnormal() {
        EngineBuilder::<TestScreen>::new().with_tps(1e-310);
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::<TestScreen>::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::<TestScreen>::new().with_channel_capacity(0);
    }

    #[test]
    fn config_carries_timing() {
        let mut config = EngineConfig::default();
        config.tps = 30.0;
        config.channel_capacity = 16;
        config.window.title = "Configured".to_string();

        let engine = EngineBuilder::<TestScreen>::new().with_config(config).build();

        assert_eq!(engine.tps, 30.0);
        assert_eq!(engine.channel_capacity, 16);
        assert_eq!(engine.window.title, "Configured");
    }

    #[test]
    fn explicit_settings_after_config_win() {
        let builder = EngineBuilder::<TestScreen>::new()
            .with_config(EngineConfig::default())
            .with_tps(144.0);
        assert_eq!(builder.tps, 144.0);
    }

    #[test]
    fn init_sees_configured_systems() {
        let mut fonts_seen = false;
        let engine = EngineBuilder::<TestScreen>::new()
            .with_surface(Box::new(RecordingSurface::new()))
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build()
            .init(|systems| {
                fonts_seen = systems.context.writer.has_font("default12");
                assert!(systems.states.is_empty());
                let _ = TestScreen::Main;
            });

        assert!(fonts_seen);
        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
    }
}
