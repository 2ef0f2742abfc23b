pub mod app;
pub mod config;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod machine;

pub use app::GameBoyApp;
pub use config::GameBoyConfig;
pub use error::{EmulationError, EmulationResult};
pub use interrupts::{Interrupt, InterruptController};
pub use machine::{
    shades_to_rgb24, Button, GameBoy, TileMap, DMG_PALETTE, OBJECT_LAYER_SIZE, TILE_MAP_SIZE,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor for the SDL frontend.
pub const SCREEN_SCALE: u32 = 4;
/// T-cycles in one full DMG frame (154 lines of 456 cycles).
pub const CYCLES_PER_FRAME: u32 = 70_224;
