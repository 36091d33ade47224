//=========================================================================
// Eggdrop Engine: Library Root
//
// This crate defines the public API surface of the Eggdrop engine and
// the Eggdrop game built on it.
//
// Responsibilities:
// - Expose the engine entry point (`Engine`, `EngineBuilder`)
// - Keep the winit/pixels integration (`platform`) hidden from users
// - Ship the game (`game`) and its asset loaders (`assets`)
//
// Typical usage:
// ```no_run
// use eggdrop_engine::EngineBuilder;
// use eggdrop_engine::game::{self, GameFonts, Screen};
//
// fn main() {
//     EngineBuilder::<Screen>::new()
//         .build()
//         .init(|manager| game::install(manager, GameFonts::block(), None))
//         .run()
//         .unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the core thread: scene graph,
// menus, modes, the frame loop. It never touches winit.
//
// `assets` loads fonts, procedural bitmaps and RON scene descriptions.
//
// `game` is Eggdrop itself: the intro menu and the play field.
//
pub mod core;
pub mod assets;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window, the pixels surface and input translation.
//
// `engine` wires the platform thread to the core thread.
//
mod platform;
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
