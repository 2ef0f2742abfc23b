use dotmatrix_common::key::Key;

use super::bus::GameBoyBus;
use super::cartridge::Cartridge;
use super::joypad::Button;
use super::ppu::TileMap;
use super::video;
use crate::config::GameBoyConfig;
use crate::cpu::Cpu;
use crate::error::{EmulationError, EmulationResult};
use crate::CYCLES_PER_FRAME;

/// A DMG: CPU plus bus.
///
/// [`GameBoy::step`] is the only way time moves: the CPU runs one step and
/// the rest of the machine catches up by the cycles it reported.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    config: GameBoyConfig,
    /// Set once a step has failed; the session is over after that.
    fault: Option<EmulationError>,
    total_cycles: u64,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    /// Machine in the post-boot state with no cartridge inserted.
    pub fn new() -> Self {
        let config = GameBoyConfig::default();
        Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::new(&config),
            config,
            fault: None,
            total_cycles: 0,
        }
    }

    pub fn with_config(config: GameBoyConfig) -> EmulationResult<Self> {
        config.validate()?;
        let cpu = if config.boot_rom.is_some() {
            Cpu::power_on()
        } else {
            Cpu::new()
        };
        Ok(Self {
            cpu,
            bus: GameBoyBus::new(&config),
            config,
            fault: None,
            total_cycles: 0,
        })
    }

    /// Parse `rom` and insert it into the cartridge slot.
    pub fn load_rom(&mut self, rom: &[u8]) -> EmulationResult<()> {
        let cartridge = Cartridge::from_rom(rom, self.config.strict_bank_switch)?;
        self.bus.insert_cartridge(cartridge);
        Ok(())
    }

    /// Title from the cartridge header, if a cartridge is loaded.
    pub fn cartridge_title(&self) -> Option<&str> {
        self.bus.cartridge_header().map(|h| h.title.as_str())
    }

    #[inline]
    pub fn boot_rom_mapped(&self) -> bool {
        self.bus.boot_rom_mapped()
    }

    #[inline]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Run one CPU step, then advance timer, DMA and PPU by the cycles it
    /// took. Returns those cycles.
    pub fn step(&mut self) -> EmulationResult<u32> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        let was_stopped = self.cpu.is_stopped();
        let cycles = match self.cpu.step(&mut self.bus) {
            Ok(cycles) => cycles,
            Err(err) => return Err(self.fail(err)),
        };

        if was_stopped {
            if !self.cpu.is_stopped() {
                self.bus.leave_stop();
            }
        } else {
            self.bus.advance(cycles);
        }
        self.total_cycles += cycles as u64;

        if let Some(err) = self.bus.take_fault() {
            log::error!("GB bus fault: {err} ({})", self.cpu.regs);
            return Err(self.fail(err));
        }
        Ok(cycles)
    }

    fn fail(&mut self, err: EmulationError) -> EmulationError {
        self.fault = Some(err.clone());
        err
    }

    /// Step until the PPU finishes a frame, or one frame's worth of cycles
    /// has passed (the LCD may be off).
    pub fn step_frame(&mut self) -> EmulationResult<()> {
        let mut elapsed = 0u32;
        while elapsed < CYCLES_PER_FRAME {
            elapsed += self.step()?;
            if self.bus.ppu.take_frame_ready() {
                break;
            }
        }
        Ok(())
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.bus.set_button(button, pressed);
    }

    /// Map frontend keys onto the joypad:
    /// - arrows => D-pad
    /// - Z => A, X => B
    /// - A / Backspace => Select, S / Return => Start
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let button = match key {
            Key::Right => Button::Right,
            Key::Left => Button::Left,
            Key::Up => Button::Up,
            Key::Down => Button::Down,
            Key::Z => Button::A,
            Key::X => Button::B,
            Key::A | Key::Backspace => Button::Select,
            Key::S | Key::Return => Button::Start,
            _ => return,
        };
        self.set_button(button, pressed);
    }

    /// Last finished frame as 2-bit shades (0 = lightest), row-major.
    pub fn frame_shades(&self) -> &[u8] {
        self.bus.ppu.front_buffer()
    }

    /// Last finished frame as packed RGB24.
    pub fn video_frame(&self, buffer: &mut [u8]) {
        video::shades_to_rgb24(self.frame_shades(), buffer);
    }

    /// 256x256 view of a whole tile map as 2-bit shades.
    pub fn debug_tile_map(&self, map: TileMap) -> Vec<u8> {
        self.bus.ppu.render_tile_map(map)
    }

    /// 176x176 view of every OAM object at its raw coordinates, as 2-bit
    /// shades.
    pub fn debug_object_layer(&self) -> Vec<u8> {
        self.bus.ppu.render_object_layer()
    }
}
