mod bus;
mod cartridge;
mod dma;
mod gameboy;
mod joypad;
mod ppu;
mod timer;
mod video;

pub use gameboy::GameBoy;
pub use joypad::Button;
pub use ppu::{TileMap, OBJECT_LAYER_SIZE, TILE_MAP_SIZE};
pub use video::{shades_to_rgb24, DMG_PALETTE};

#[cfg(test)]
mod tests;
