//=========================================================================
// Engine Systems
//=========================================================================
//
// Everything the logic thread owns: the state stack, the data states
// share, and the surface they draw on.
//
// Tick pipeline:
//   1. poll      every input event, top state first
//   2. update    bottom → top
//   3. process   queued stack transitions
//   4. render    clear, bottom → top, present
//   5. flush     queued events to their subscribers
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::context::FrameContext;
use crate::core::input::InputEvent;
use crate::core::render::DrawSurface;
use crate::core::state::{StateKey, StateManager};

//=== EngineSystems =======================================================

/// Systems handed to [`crate::Engine::init`] and then moved to the logic
/// thread.
pub struct EngineSystems<K: StateKey> {
    /// Registered states and the active stack.
    pub states: StateManager<K>,

    /// Shared data passed to every state callback.
    pub context: FrameContext<K>,

    /// Render target for every tick.
    pub surface: Box<dyn DrawSurface + Send>,
}

impl<K: StateKey> EngineSystems<K> {
    pub(crate) fn new(surface: Box<dyn DrawSurface + Send>) -> Self {
        Self {
            states: StateManager::new(),
            context: FrameContext::new(),
            surface,
        }
    }

    /// Sets the logical size and opens configured fonts and textures.
    ///
    /// Assets that fail are logged and skipped.
    pub(crate) fn apply_config(&mut self, config: &EngineConfig) {
        let (width, height) = config.logical_size;
        self.surface.set_logical_size(width, height);

        for font in &config.fonts {
            if let Err(e) = self.context.writer.define_font(
                self.surface.as_mut(),
                &font.name,
                &font.source,
                font.size,
            ) {
                warn!("Font \"{}\" not loaded: {}", font.name, e);
            }
        }

        for texture in &config.textures {
            let added = self.context.textures.add_texture(
                &texture.name,
                &texture.uri,
                false,
                self.surface.as_mut(),
            );
            if let Err(e) = added {
                warn!("Texture \"{}\" not registered: {}", texture.name, e);
            }
        }

        debug!(
            "Config applied: {} fonts, {} textures",
            config.fonts.len(),
            self.context.textures.len()
        );
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one tick over `inputs`. `delta` is the length of the previous
    /// tick.
    pub(crate) fn tick(&mut self, inputs: &[InputEvent], delta: Duration) {
        self.context.begin_frame(delta);

        for event in inputs {
            self.states.poll(event, &mut self.context);
        }

        self.states.update(&mut self.context);
        self.states.process_transitions(&mut self.context);

        self.surface.clear();
        self.states.render(self.surface.as_mut(), &self.context);
        self.surface.present();

        self.context.events.flush();
        self.context.end_frame();
    }

    /// Stops every state and unloads textures.
    pub(crate) fn shutdown(&mut self) {
        let remaining = self.states.len();
        self.states.clear(&mut self.context);
        self.context.transitions.clear();
        self.context.textures.release_all(self.surface.as_mut());
        info!(
            "Systems shut down after {} ticks ({} states stopped)",
            self.context.frame(),
            remaining
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventDict;
    use crate::core::input::KeyCode;
    use crate::core::render::{Color, RecordingSurface};
    use crate::core::state::{State, StateTransition};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Screen {
        Menu,
        Options,
    }

    impl StateKey for Screen {}

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        open_on: Option<KeyCode>,
    }

    impl Recorder {
        fn note(&self, what: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, what));
        }
    }

    impl State<Screen> for Recorder {
        fn on_start(&mut self, _ctx: &mut FrameContext<Screen>) {
            self.note("start");
        }

        fn on_stop(&mut self, _ctx: &mut FrameContext<Screen>) {
            self.note("stop");
        }

        fn update(&mut self, ctx: &mut FrameContext<Screen>) {
            self.note("update");
            ctx.events.queue("tick", EventDict::new().with("state", self.name));
        }

        fn render(&mut self, surface: &mut dyn DrawSurface, _ctx: &FrameContext<Screen>) {
            self.note("render");
            surface.set_draw_color(Color::WHITE);
        }

        fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<Screen>) -> bool {
            match self.open_on {
                Some(key) if event.is_key_down(key) => {
                    self.note("poll");
                    ctx.transitions.push(StateTransition::Push(Screen::Options));
                    true
                }
                _ => false,
            }
        }
    }

    fn systems(log: &Log) -> EngineSystems<Screen> {
        let mut systems = EngineSystems::new(Box::new(RecordingSurface::new()));
        systems
            .states
            .register(
                Screen::Menu,
                Recorder {
                    name: "menu",
                    log: log.clone(),
                    open_on: Some(KeyCode::Enter),
                },
            )
            .unwrap();
        systems
            .states
            .register(
                Screen::Options,
                Recorder {
                    name: "options",
                    log: log.clone(),
                    open_on: None,
                },
            )
            .unwrap();
        systems
    }

    #[test]
    fn tick_runs_pipeline_in_order() {
        let log = Log::default();
        let mut systems = systems(&log);
        systems.states.push(Screen::Menu, &mut systems.context).unwrap();

        let flushed = Arc::new(AtomicUsize::new(0));
        let counter = flushed.clone();
        systems.context.events.subscribe("tick", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        log.lock().unwrap().clear();

        systems.tick(&[InputEvent::key_down(KeyCode::Enter)], Duration::from_millis(16));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "menu:poll",
                "menu:update",
                "options:start",
                "menu:render",
                "options:render",
            ]
        );
        assert_eq!(flushed.load(Ordering::SeqCst), 1);
        assert_eq!(systems.context.frame(), 1);
        assert_eq!(systems.context.delta(), Duration::from_millis(16));
        assert_eq!(systems.states.stack(), &[Screen::Menu, Screen::Options]);
    }

    #[test]
    fn config_defines_fonts_and_skips_bad_assets() {
        let log = Log::default();
        let mut systems = systems(&log);

        let mut config = EngineConfig::default();
        config.fonts.push(crate::config::FontConfig::new("broken", "", 12));
        config.textures.push(crate::config::TextureConfig {
            name: "missing".to_string(),
            uri: "no/such/texture.png".to_string(),
        });

        systems.apply_config(&config);

        let writer = &systems.context.writer;
        assert!(writer.has_font("default8"));
        assert!(writer.has_font("default24"));
        assert!(!writer.has_font("broken"));
        assert!(systems.context.textures.is_empty());
    }

    #[test]
    fn shutdown_stops_every_state() {
        let log = Log::default();
        let mut systems = systems(&log);
        systems.states.push(Screen::Menu, &mut systems.context).unwrap();
        systems.states.push(Screen::Options, &mut systems.context).unwrap();
        log.lock().unwrap().clear();

        systems.shutdown();

        assert!(systems.states.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["options:stop", "menu:stop"]);
    }

    #[test]
    fn shutdown_discards_pending_transitions() {
        let log = Log::default();
        let mut systems = systems(&log);
        systems.states.push(Screen::Menu, &mut systems.context).unwrap();
        systems.context.transitions.push(StateTransition::Push(Screen::Options));

        systems.shutdown();

        assert!(systems.context.transitions.is_empty());
        assert!(!log.lock().unwrap().iter().any(|e| e == "options:start"));
    }
}
