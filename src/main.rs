//=========================================================================
// Eggdrop
//
// Binary entry point.
//
// Environment:
//   EGGDROP_FONT  path to a TTF/OTF file for menu and score text
//                 (falls back to the built-in block font)
//   EGGDROP_SEED  u64 seed for the chicken's random turns
//   RUST_LOG      log filter, default "info"
//
//=========================================================================

use std::process::ExitCode;

use log::{error, info, warn};

use eggdrop_engine::game::{self, GameFonts, Screen};
use eggdrop_engine::EngineBuilder;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let fonts = match std::env::var("EGGDROP_FONT") {
        Ok(path) => match GameFonts::from_file(&path) {
            Ok(fonts) => {
                info!("Using font {}", path);
                fonts
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(_) => GameFonts::block(),
    };

    let seed = std::env::var("EGGDROP_SEED").ok().and_then(|raw| match raw.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            warn!("Ignoring EGGDROP_SEED={:?}: not a u64", raw);
            None
        }
    });

    let result = EngineBuilder::<Screen>::new()
        .with_title("Eggdrop!")
        .build()
        .init(move |manager| game::install(manager, fonts, seed))
        .run();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
