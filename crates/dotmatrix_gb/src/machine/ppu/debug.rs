use super::objects::{ObjectEntry, OAM_ENTRIES};
use super::regs::shade;
use super::Ppu;

/// Side length of a full tile map in pixels.
pub const TILE_MAP_SIZE: usize = 256;
/// Side length of the object-layer view. Objects are placed at their raw
/// OAM coordinates, so 0..176 covers every position including the hidden
/// border.
pub const OBJECT_LAYER_SIZE: usize = 176;

/// Which 32x32 tile map to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMap {
    /// The map LCDC bit 3 selects for the background.
    Background,
    /// The map LCDC bit 6 selects for the window.
    Window,
}

impl Ppu {
    /// Render a whole 256x256 tile map as palette-applied shades using the
    /// current LCDC addressing mode and BGP.
    pub(crate) fn render_tile_map(&self, map: TileMap) -> Vec<u8> {
        let base = match map {
            TileMap::Background => self.lcdc.bg_map_base(),
            TileMap::Window => self.lcdc.window_map_base(),
        };
        let mut out = Vec::with_capacity(TILE_MAP_SIZE * TILE_MAP_SIZE);
        for y in 0..TILE_MAP_SIZE {
            for x in 0..TILE_MAP_SIZE {
                let color = self.map_pixel(base, x as u8, y as u8);
                out.push(shade(self.bgp, color));
            }
        }
        out
    }

    /// All 40 objects drawn at their raw OAM coordinates (screen position
    /// plus 8/16) with their palettes. Lower OAM indices end up on top;
    /// colour 0 is transparent and the backdrop is shade 0.
    pub(crate) fn render_object_layer(&self) -> Vec<u8> {
        let height = self.lcdc.object_height() as usize;
        let mut out = vec![0u8; OBJECT_LAYER_SIZE * OBJECT_LAYER_SIZE];

        for index in (0..OAM_ENTRIES).rev() {
            let entry = &self.oam[index * 4..index * 4 + 4];
            let (y, x, attrs) = (entry[0] as usize, entry[1] as usize, entry[3]);
            let tile = if height == 16 { entry[2] & 0xFE } else { entry[2] };
            let palette = if attrs & ObjectEntry::PALETTE_1 != 0 {
                self.obp1
            } else {
                self.obp0
            };

            for row in 0..height {
                let source_row = if attrs & ObjectEntry::FLIP_Y != 0 {
                    height - 1 - row
                } else {
                    row
                };
                for column in 0..8u8 {
                    let (px, py) = (x + column as usize, y + row);
                    if px >= OBJECT_LAYER_SIZE || py >= OBJECT_LAYER_SIZE {
                        continue;
                    }
                    let source_column = if attrs & ObjectEntry::FLIP_X != 0 {
                        7 - column
                    } else {
                        column
                    };
                    let color = self.tile_pixel(tile as usize * 16, source_row, source_column);
                    if color != 0 {
                        out[py * OBJECT_LAYER_SIZE + px] = shade(palette, color);
                    }
                }
            }
        }
        out
    }
}
