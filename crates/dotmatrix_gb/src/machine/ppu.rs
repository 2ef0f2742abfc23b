//! Picture processing unit.
//!
//! Runs one T-cycle per `tick`, moving through OAM scan (80 cycles), pixel
//! transfer (172 cycles plus penalties) and HBlank for a 456-cycle line.
//! Lines 144-153 are VBlank. A line is composed into the back buffer when
//! its pixel transfer ends; the back buffer is published on VBlank entry.
mod debug;
mod objects;
mod regs;
mod render;
mod timing;

pub use debug::{TileMap, OBJECT_LAYER_SIZE, TILE_MAP_SIZE};
use objects::{ObjectEntry, MAX_OBJECTS_PER_LINE};
use regs::{Lcdc, StatSelect};

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub(crate) const VRAM_SIZE: usize = 0x2000;
pub(crate) const OAM_BYTES: usize = 0xA0;
const FRAME_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// STAT mode bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

pub(crate) struct Ppu {
    vram: Box<[u8; VRAM_SIZE]>,
    oam: [u8; OAM_BYTES],

    lcdc: Lcdc,
    stat_select: StatSelect,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,

    mode: Mode,
    /// T-cycles elapsed in the current line.
    dot: u16,
    /// Length of this line's pixel transfer.
    transfer_len: u16,
    /// OR of the enabled STAT sources; an interrupt fires on its rising edge.
    stat_line: bool,
    /// Window rows drawn so far this frame.
    window_line: u8,
    /// Set once LY has matched WY this frame.
    window_y_triggered: bool,
    line_objects: Vec<ObjectEntry>,

    /// Palette-applied 2-bit shades.
    back: Box<[u8; FRAME_PIXELS]>,
    front: Box<[u8; FRAME_PIXELS]>,
    frame_ready: bool,
}

impl Ppu {
    pub(crate) fn new() -> Self {
        Self {
            vram: Box::new([0; VRAM_SIZE]),
            oam: [0; OAM_BYTES],
            lcdc: Lcdc::empty(),
            stat_select: StatSelect::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            mode: Mode::HBlank,
            dot: 0,
            transfer_len: 172,
            stat_line: false,
            window_line: 0,
            window_y_triggered: false,
            line_objects: Vec::with_capacity(MAX_OBJECTS_PER_LINE),
            back: Box::new([0; FRAME_PIXELS]),
            front: Box::new([0; FRAME_PIXELS]),
            frame_ready: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    #[inline]
    fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    /// CPU view of VRAM: blocked during pixel transfer.
    #[inline]
    pub(crate) fn vram_accessible(&self) -> bool {
        self.mode != Mode::Transfer
    }

    /// CPU view of OAM: blocked during OAM scan and pixel transfer.
    #[inline]
    pub(crate) fn oam_accessible(&self) -> bool {
        matches!(self.mode, Mode::HBlank | Mode::VBlank)
    }

    pub(crate) fn read_vram(&self, addr: u16) -> u8 {
        if self.vram_accessible() {
            self.vram[(addr & 0x1FFF) as usize]
        } else {
            0xFF
        }
    }

    pub(crate) fn write_vram(&mut self, addr: u16, value: u8) {
        if self.vram_accessible() {
            self.vram[(addr & 0x1FFF) as usize] = value;
        }
    }

    pub(crate) fn read_oam(&self, offset: u16) -> u8 {
        if self.oam_accessible() {
            self.oam[offset as usize]
        } else {
            0xFF
        }
    }

    pub(crate) fn write_oam(&mut self, offset: u16, value: u8) {
        if self.oam_accessible() {
            self.oam[offset as usize] = value;
        }
    }

    /// OAM DMA writes bypass the mode restriction.
    #[inline]
    pub(crate) fn dma_write_oam(&mut self, offset: u16, value: u8) {
        self.oam[offset as usize] = value;
    }

    /// Raw VRAM read for DMA sources in $8000-$9FFF.
    #[inline]
    pub(crate) fn dma_read_vram(&self, addr: u16) -> u8 {
        self.vram[(addr & 0x1FFF) as usize]
    }

    pub(crate) fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => {
                let coincidence = if self.ly == self.lyc { 0x04 } else { 0 };
                let mode = if self.lcd_enabled() { self.mode as u8 } else { 0 };
                0x80 | self.stat_select.bits() | coincidence | mode
            }
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            _ => 0xFF,
        }
    }

    pub(crate) fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF40 => self.write_lcdc(value),
            0xFF41 => self.stat_select = StatSelect::from_bits_truncate(value),
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => self.lyc = value,
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            _ => {}
        }
    }

    /// Returns true once per finished frame.
    pub(crate) fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Last completed frame as 2-bit shades, row-major.
    pub(crate) fn front_buffer(&self) -> &[u8] {
        &self.front[..]
    }
}
