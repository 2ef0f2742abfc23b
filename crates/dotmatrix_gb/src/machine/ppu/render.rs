use super::objects::ObjectEntry;
use super::regs::{shade, Lcdc};
use super::Ppu;
use crate::SCREEN_WIDTH;

/// WX values above this put the window off-screen.
const WINDOW_X_MAX: u8 = 166;

impl Ppu {
    #[inline]
    pub(super) fn tile_pixel(&self, tile_offset: usize, row: usize, column: u8) -> u8 {
        let lo = self.vram[tile_offset + row * 2];
        let hi = self.vram[tile_offset + row * 2 + 1];
        let bit = 7 - column;
        (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
    }

    /// Colour index of a BG/window map at map pixel (`x`, `y`).
    #[inline]
    pub(super) fn map_pixel(&self, map_base: usize, x: u8, y: u8) -> u8 {
        let tile_index = self.vram[map_base + (y as usize / 8) * 32 + x as usize / 8];
        let tile_offset = self.lcdc.bg_tile_offset(tile_index);
        self.tile_pixel(tile_offset, (y & 7) as usize, x & 7)
    }

    /// Compose LY into the back buffer: background, then window, then
    /// objects.
    pub(super) fn render_scanline(&mut self) {
        let ly = self.ly as usize;
        // Raw BG/window colour indices; objects with the BG-priority bit
        // only show over index 0.
        let mut bg_color = [0u8; SCREEN_WIDTH];
        // With BG/window off the line is blank white.
        let mut line = [0u8; SCREEN_WIDTH];

        if self.lcdc.contains(Lcdc::BG_WINDOW_ENABLE) {
            let map = self.lcdc.bg_map_base();
            let y = self.ly.wrapping_add(self.scy);
            for (x, color) in bg_color.iter_mut().enumerate() {
                *color = self.map_pixel(map, (x as u8).wrapping_add(self.scx), y);
            }

            if self.window_visible() {
                let map = self.lcdc.window_map_base();
                let start = self.wx as isize - 7;
                for x in start.max(0) as usize..SCREEN_WIDTH {
                    let window_x = (x as isize - start) as u8;
                    bg_color[x] = self.map_pixel(map, window_x, self.window_line);
                }
                self.window_line = self.window_line.wrapping_add(1);
            }

            for (out, &color) in line.iter_mut().zip(bg_color.iter()) {
                *out = shade(self.bgp, color);
            }
        }

        if self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            self.render_objects(&bg_color, &mut line);
        }

        self.back[ly * SCREEN_WIDTH..(ly + 1) * SCREEN_WIDTH].copy_from_slice(&line);
    }

    fn window_visible(&self) -> bool {
        self.lcdc.contains(Lcdc::WINDOW_ENABLE) && self.window_y_triggered && self.wx <= WINDOW_X_MAX
    }

    fn render_objects(&self, bg_color: &[u8; SCREEN_WIDTH], line: &mut [u8; SCREEN_WIDTH]) {
        // DMG priority: smaller X first, then lower OAM index.
        let mut objects: Vec<ObjectEntry> = self.line_objects.to_vec();
        objects.sort_by_key(|o| (o.x, o.oam_index));

        let mut drawn = [false; SCREEN_WIDTH];
        for object in &objects {
            let height = object.height;
            let tile = if height == 16 { object.tile & 0xFE } else { object.tile };
            let mut row = self.ly.wrapping_add(16).wrapping_sub(object.y);
            if row >= height {
                continue;
            }
            if object.attrs & ObjectEntry::FLIP_Y != 0 {
                row = height - 1 - row;
            }
            let palette = if object.attrs & ObjectEntry::PALETTE_1 != 0 {
                self.obp1
            } else {
                self.obp0
            };

            for column in 0..8u8 {
                let screen_x = object.x as isize - 8 + column as isize;
                if !(0..SCREEN_WIDTH as isize).contains(&screen_x) {
                    continue;
                }
                let sx = screen_x as usize;
                if drawn[sx] {
                    continue;
                }
                let source_column = if object.attrs & ObjectEntry::FLIP_X != 0 {
                    7 - column
                } else {
                    column
                };
                // Rows 8-15 of a tall object continue into the next tile.
                let color = self.tile_pixel(tile as usize * 16, row as usize, source_column);
                if color == 0 {
                    continue;
                }
                drawn[sx] = true;
                if object.attrs & ObjectEntry::BG_PRIORITY != 0 && bg_color[sx] != 0 {
                    continue;
                }
                line[sx] = shade(palette, color);
            }
        }
    }
}
