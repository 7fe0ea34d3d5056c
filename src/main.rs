//=========================================================================
// Stratum Demo
//=========================================================================
//
// Main menu with three entries, a play screen that rolls dice from the
// engine PRNG, and an options overlay drawn over the menu.
//
// Usage:
//   stratum_engine [config.json]
//
// Keys:
//   ↑/↓ select, Enter activate, Escape back (quits from the menu)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::process::ExitCode;

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use stratum_engine::prelude::*;

//=== Screens =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Menu,
    Play,
    Options,
}

impl StateKey for Screen {}

const MENU_SELECTED: &str = "menu.selected";
const MENU_ITEMS: [&str; 3] = ["Start Game", "Options", "Quit"];

//=== MainMenu ============================================================

struct MainMenu {
    selected: usize,
}

impl MainMenu {
    fn activate(&self, ctx: &mut FrameContext<Screen>) {
        let item = MENU_ITEMS[self.selected];
        ctx.events.queue(
            MENU_SELECTED,
            EventDict::new().with("index", self.selected).with("item", item.to_string()),
        );

        let transition = match self.selected {
            0 => StateTransition::Swap(Screen::Play),
            1 => StateTransition::Push(Screen::Options),
            _ => StateTransition::Clear,
        };
        ctx.transitions.push(transition);
    }
}

impl State<Screen> for MainMenu {
    fn capabilities(&self) -> Capabilities {
        Capabilities::RENDER | Capabilities::POLL
    }

    fn on_focus_gained(&mut self, ctx: &mut FrameContext<Screen>) {
        ctx.writer.set_pen_color(Color::WHITE);
    }

    fn update(&mut self, _ctx: &mut FrameContext<Screen>) {}

    fn render(&mut self, surface: &mut dyn DrawSurface, ctx: &FrameContext<Screen>) {
        let line = ctx.writer.font_height(surface, "default24").unwrap_or(24) as i32 * 2;

        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let marker = if i == self.selected { "> " } else { "  " };
            let text = format!("{marker}{item}");
            if let Err(e) = ctx.writer.present(surface, "default24", &text, 120, 200 + line * i as i32) {
                warn!("Menu text not drawn: {}", e);
                return;
            }
        }
    }

    fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<Screen>) -> bool {
        let InputEvent::KeyDown { key, .. } = event else {
            return false;
        };

        match key {
            KeyCode::ArrowUp => {
                self.selected = (self.selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
            }
            KeyCode::ArrowDown => {
                self.selected = (self.selected + 1) % MENU_ITEMS.len();
            }
            KeyCode::Enter => self.activate(ctx),
            KeyCode::Escape => ctx.transitions.push(StateTransition::Clear),
            _ => return false,
        }
        true
    }
}

//=== Play ================================================================

/// Replaces the menu. Rolls a die every half second and shows the last
/// few results.
struct Play {
    rolls: Vec<i32>,
    since_roll: std::time::Duration,
}

impl Play {
    const ROLL_EVERY: std::time::Duration = std::time::Duration::from_millis(500);
    const SHOWN: usize = 8;
}

impl State<Screen> for Play {
    fn on_start(&mut self, ctx: &mut FrameContext<Screen>) {
        self.rolls.clear();
        self.since_roll = std::time::Duration::ZERO;
        ctx.writer.set_pen_color(Color::rgb(255, 220, 90));
    }

    fn on_stop(&mut self, ctx: &mut FrameContext<Screen>) {
        info!("Left play after {} rolls", self.rolls.len());
        ctx.writer.set_pen_color(Color::WHITE);
    }

    fn update(&mut self, ctx: &mut FrameContext<Screen>) {
        self.since_roll += ctx.delta();
        if self.since_roll < Self::ROLL_EVERY {
            return;
        }
        self.since_roll = std::time::Duration::ZERO;

        self.rolls.push(ctx.rng.range(1, 6));
        if self.rolls.len() > Self::SHOWN {
            self.rolls.remove(0);
        }
    }

    fn render(&mut self, surface: &mut dyn DrawSurface, ctx: &FrameContext<Screen>) {
        let rolls: Vec<String> = self.rolls.iter().map(i32::to_string).collect();
        let lines = [
            format!("Tick {}", ctx.frame()),
            format!("Rolls: {}", rolls.join(" ")),
            "Escape to return".to_string(),
        ];

        for (i, text) in lines.iter().enumerate() {
            if let Err(e) = ctx.writer.present(surface, "default12", text, 40, 40 + 30 * i as i32) {
                warn!("Play text not drawn: {}", e);
                return;
            }
        }
    }

    fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<Screen>) -> bool {
        if event.is_key_down(KeyCode::Escape) {
            ctx.transitions.push(StateTransition::Swap(Screen::Menu));
            return true;
        }
        false
    }
}

//=== Options =============================================================

/// Overlay drawn above the menu. Swallows all key input while open.
struct Options;

impl State<Screen> for Options {
    fn capabilities(&self) -> Capabilities {
        Capabilities::RENDER | Capabilities::POLL
    }

    fn update(&mut self, _ctx: &mut FrameContext<Screen>) {}

    fn render(&mut self, surface: &mut dyn DrawSurface, ctx: &FrameContext<Screen>) {
        let drawn = ctx
            .writer
            .present(surface, "default24", "Options", 600, 200)
            .and_then(|()| ctx.writer.present(surface, "default8", "Nothing to configure yet. Escape closes.", 600, 260));
        if let Err(e) = drawn {
            warn!("Options text not drawn: {}", e);
        }
    }

    fn poll(&mut self, event: &InputEvent, ctx: &mut FrameContext<Screen>) -> bool {
        if event.is_key_down(KeyCode::Escape) {
            ctx.transitions.push(StateTransition::Pop);
        }
        matches!(event, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. })
    }
}

//=== Entry Point =========================================================

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Config {:?} rejected: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    EngineBuilder::<Screen>::new()
        .with_config(config)
        .build()
        .init(|systems| {
            let states = &mut systems.states;
            let registered = states
                .register(Screen::Menu, MainMenu { selected: 0 })
                .and_then(|_| {
                    states.register(
                        Screen::Play,
                        Play {
                            rolls: Vec::new(),
                            since_roll: std::time::Duration::ZERO,
                        },
                    )
                })
                .and_then(|_| states.register(Screen::Options, Options))
                .and_then(|_| states.push(Screen::Menu, &mut systems.context));
            if let Err(e) = registered {
                error!("Demo setup failed: {}", e);
            }

            systems.context.events.subscribe(MENU_SELECTED, |event| {
                let item = event.get::<String>("item")?;
                let index = event.get::<usize>("index")?;
                info!("Menu selected \"{}\" (#{})", item, index);
                Ok(())
            });
        })
        .run();

    ExitCode::SUCCESS
}
