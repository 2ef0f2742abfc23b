use dotmatrix_common::app::App;
use dotmatrix_common::key::Key;

use crate::error::EmulationError;
use crate::{GameBoy, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Adapter that lets a frontend drive a [`GameBoy`] one frame per update.
///
/// An emulation error ends the session: it is logged with a register
/// snapshot, kept for the caller, and `should_exit` turns true.
pub struct GameBoyApp {
    pub gb: GameBoy,
    should_exit: bool,
    frame_counter: u64,
    error: Option<EmulationError>,
}

impl GameBoyApp {
    pub fn new(gb: GameBoy) -> Self {
        Self {
            gb,
            should_exit: false,
            frame_counter: 0,
            error: None,
        }
    }

    /// The error that stopped the session, if any.
    pub fn take_error(&mut self) -> Option<EmulationError> {
        self.error.take()
    }

    #[inline]
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        match self.gb.cartridge_title() {
            Some(title) => log::info!("Game Boy init: \"{title}\""),
            None => log::info!("Game Boy init: no cartridge"),
        }
    }

    fn update(&mut self, screen_state: &mut [u8]) {
        if self.should_exit {
            return;
        }

        if let Err(err) = self.gb.step_frame() {
            log::error!(
                "GB: emulation stopped after {} frames: {err} ({}, ime={} mode={:?})",
                self.frame_counter,
                self.gb.cpu.regs,
                self.gb.cpu.ime,
                self.gb.cpu.mode(),
            );
            self.error = Some(err);
            self.should_exit = true;
            return;
        }

        self.gb.video_frame(screen_state);
        self.frame_counter = self.frame_counter.wrapping_add(1);

        if self.frame_counter % 600 == 0 {
            log::debug!(
                "GB: frame={} cycles={} {}",
                self.frame_counter,
                self.gb.total_cycles(),
                self.gb.cpu.regs
            );
        }
    }

    fn handle_key_event(&mut self, key: Key, is_pressed: bool) {
        if key == Key::Escape {
            self.should_exit = true;
            return;
        }
        self.gb.handle_key(key, is_pressed);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Game Boy exit after {} frames", self.frame_counter);
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        match self.gb.cartridge_title() {
            Some(title) if !title.is_empty() => format!("dotmatrix - {title}"),
            _ => "dotmatrix".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameBoyConfig;

    fn app_with_program(program: &[u8]) -> GameBoyApp {
        let mut rom = vec![0u8; 0x8000];
        rom[0x134..0x138].copy_from_slice(b"DEMO");
        rom[0x100..0x100 + program.len()].copy_from_slice(program);
        let config = GameBoyConfig::builder().randomize_ram(false).build();
        let mut gb = GameBoy::with_config(config).unwrap();
        gb.load_rom(&rom).unwrap();
        GameBoyApp::new(gb)
    }

    #[test]
    fn update_renders_a_frame() {
        // JR -2
        let mut app = app_with_program(&[0x18, 0xFE]);
        let mut screen = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
        app.update(&mut screen);
        assert!(!app.should_exit());
        assert_eq!(app.frame_counter(), 1);
        assert!(screen.iter().all(|&b| b == 0xFF));
        assert_eq!(app.title(), "dotmatrix - DEMO");
    }

    #[test]
    fn emulation_error_requests_exit() {
        let mut app = app_with_program(&[0xFC]);
        let mut screen = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
        app.update(&mut screen);
        assert!(app.should_exit());
        assert_eq!(
            app.take_error(),
            Some(EmulationError::UndefinedOpcode {
                opcode: 0xFC,
                addr: 0x0100
            })
        );
        assert_eq!(app.frame_counter(), 0);
    }

    #[test]
    fn escape_requests_exit() {
        let mut app = app_with_program(&[0x18, 0xFE]);
        app.handle_key_event(Key::Escape, true);
        assert!(app.should_exit());
    }
}
