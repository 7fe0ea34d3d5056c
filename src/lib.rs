//=========================================================================
// Stratum Engine: Library Root
//=========================================================================
//
// A small 2D application scaffold: a winit window on the main thread, a
// fixed-rate logic thread running a stack of states, and the utilities
// those states share (textures, fonts, events, a PRNG and a JSON DOM).
//
// Typical usage:
// ```no_run
// use stratum_engine::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Screen { Menu }
// impl StateKey for Screen {}
//
// struct Menu;
// impl State<Screen> for Menu {
//     fn update(&mut self, _ctx: &mut FrameContext<Screen>) {}
// }
//
// EngineBuilder::<Screen>::new()
//     .build()
//     .init(|systems| {
//         systems.states.register(Screen::Menu, Menu).unwrap();
//         systems.states.push(Screen::Menu, &mut systems.context).unwrap();
//     })
//     .run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod config;
pub mod core;
pub mod json;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the winit integration and stays private; applications
// only see the engine facade.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
