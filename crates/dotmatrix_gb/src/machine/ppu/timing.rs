use super::regs::{Lcdc, StatSelect};
use super::{Mode, Ppu};
use crate::interrupts::{Interrupt, InterruptController};

const OAM_SCAN_CYCLES: u16 = 80;
const TRANSFER_BASE_CYCLES: u16 = 172;
/// Extra pixel-transfer cycles per object on the line.
const OBJECT_PENALTY: u16 = 6;
const LINE_CYCLES: u16 = 456;
const VBLANK_START_LINE: u8 = 144;
const FRAME_LINES: u8 = 154;

impl Ppu {
    /// Advance one T-cycle. Does nothing while the LCD is off.
    pub(crate) fn tick(&mut self, interrupts: &mut InterruptController) {
        if !self.lcd_enabled() {
            return;
        }

        self.dot += 1;
        match self.mode {
            Mode::OamScan if self.dot == OAM_SCAN_CYCLES => {
                self.select_objects();
                self.transfer_len = TRANSFER_BASE_CYCLES
                    + (self.scx & 0x07) as u16
                    + OBJECT_PENALTY * self.line_objects.len() as u16;
                self.mode = Mode::Transfer;
            }
            Mode::Transfer if self.dot == OAM_SCAN_CYCLES + self.transfer_len => {
                self.render_scanline();
                self.mode = Mode::HBlank;
            }
            Mode::HBlank | Mode::VBlank if self.dot == LINE_CYCLES => {
                self.dot = 0;
                self.next_line(interrupts);
            }
            _ => {}
        }

        self.update_stat_line(interrupts);
    }

    fn next_line(&mut self, interrupts: &mut InterruptController) {
        self.ly += 1;
        if self.ly == VBLANK_START_LINE {
            self.mode = Mode::VBlank;
            interrupts.request(Interrupt::VBlank);
            // DMG: the mode-2 STAT select also fires at the start of VBlank.
            if self.stat_select.contains(StatSelect::OAM_SCAN) && !self.stat_line {
                interrupts.request(Interrupt::Stat);
            }
            std::mem::swap(&mut self.back, &mut self.front);
            self.frame_ready = true;
            log::debug!("GB PPU: VBlank edge, IF=0x{:02X}", interrupts.read_if());
        } else if self.ly == FRAME_LINES {
            self.ly = 0;
            self.start_frame();
            self.start_line();
        } else if self.ly < VBLANK_START_LINE {
            self.start_line();
        }
    }

    fn start_frame(&mut self) {
        self.window_line = 0;
        self.window_y_triggered = false;
    }

    fn start_line(&mut self) {
        self.mode = Mode::OamScan;
        if self.ly == self.wy {
            self.window_y_triggered = true;
        }
    }

    /// Recompute the STAT line and request INT $48 on a rising edge.
    fn update_stat_line(&mut self, interrupts: &mut InterruptController) {
        let select = self.stat_select;
        let mode_source = match self.mode {
            Mode::HBlank => select.contains(StatSelect::HBLANK),
            Mode::VBlank => select.contains(StatSelect::VBLANK),
            Mode::OamScan => select.contains(StatSelect::OAM_SCAN),
            Mode::Transfer => false,
        };
        let line = mode_source || (select.contains(StatSelect::LYC) && self.ly == self.lyc);

        if line && !self.stat_line {
            interrupts.request(Interrupt::Stat);
            log::debug!(
                "GB PPU: STAT rising edge (LY={} LYC={} mode={:?})",
                self.ly,
                self.lyc,
                self.mode
            );
        }
        self.stat_line = line;
    }

    pub(super) fn write_lcdc(&mut self, value: u8) {
        let was_enabled = self.lcd_enabled();
        self.lcdc = Lcdc::from_bits_retain(value);
        let now_enabled = self.lcd_enabled();

        if was_enabled && !now_enabled {
            if self.mode != Mode::VBlank {
                log::warn!("GB PPU: LCD disabled outside VBlank (LY={})", self.ly);
            }
            self.ly = 0;
            self.dot = 0;
            self.mode = Mode::HBlank;
            self.stat_line = false;
            self.back.fill(0);
            self.front.fill(0);
        } else if !was_enabled && now_enabled {
            self.ly = 0;
            self.dot = 0;
            self.start_frame();
            self.start_line();
        }
    }
}
