use bitflags::bitflags;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct Lcdc: u8 {
        /// On DMG this blanks both background and window.
        const BG_WINDOW_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_SIZE_8X16 = 1 << 2;
        const BG_MAP_9C00 = 1 << 3;
        /// Unsigned tile indices from $8000 instead of signed from $9000.
        const TILE_DATA_8000 = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_MAP_9C00 = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT ($FF41).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct StatSelect: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM_SCAN = 1 << 5;
        const LYC = 1 << 6;
    }
}

impl Lcdc {
    #[inline]
    pub(crate) fn object_height(self) -> u8 {
        if self.contains(Lcdc::OBJ_SIZE_8X16) {
            16
        } else {
            8
        }
    }

    /// VRAM offset of the background tile map.
    #[inline]
    pub(crate) fn bg_map_base(self) -> usize {
        if self.contains(Lcdc::BG_MAP_9C00) {
            0x1C00
        } else {
            0x1800
        }
    }

    #[inline]
    pub(crate) fn window_map_base(self) -> usize {
        if self.contains(Lcdc::WINDOW_MAP_9C00) {
            0x1C00
        } else {
            0x1800
        }
    }

    /// VRAM offset of the 16-byte tile referenced by a BG/window map entry.
    #[inline]
    pub(crate) fn bg_tile_offset(self, tile: u8) -> usize {
        if self.contains(Lcdc::TILE_DATA_8000) {
            tile as usize * 16
        } else {
            (0x1000 + (tile as i8 as isize) * 16) as usize
        }
    }
}

/// Palette lookup: 2-bit colour index to 2-bit shade.
#[inline]
pub(crate) fn shade(palette: u8, color: u8) -> u8 {
    (palette >> (color * 2)) & 0x03
}
