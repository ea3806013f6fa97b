// Entry point for the tap-to-open Minesweeper TUI
// Sets up logging and configuration, then hands over to the UI loop

use log::info;
use std::error::Error;

// Module declarations
mod tps_board;  // Tile grid, mine placement and flood fill
mod tps_color;  // Palette adapted to terminal colour depth
mod tps_config; // TOML preferences
mod tps_error;  // Error taxonomy
mod tps_game;   // Difficulty, phase machine and timer
mod tps_lang;   // Multi-language string resources
mod tps_layout; // Logical view geometry and hit testing
mod tps_log;    // File logging
mod tps_tile;   // Single tile and its prime gesture
mod tps_ui;     // Terminal rendering and event handling

use tps_config::load_or_create_config;
use tps_lang::Lang;
use tps_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Log before loading the config so problems with it are recorded
    let log_file = tps_log::init();

    let mut cfg = load_or_create_config();
    tps_log::apply_level(&cfg.log_level);
    if let Some(path) = log_file {
        info!(
            "{} {} started, logging to {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            path.display()
        );
    }

    let mut lang = Lang::new(&cfg.language);

    run_ui(&mut cfg, &mut lang)
}
