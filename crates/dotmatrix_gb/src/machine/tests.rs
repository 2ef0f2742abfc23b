use super::ppu::Mode;
use super::timer::Timer;
use super::{Button, GameBoy, TileMap, OBJECT_LAYER_SIZE, TILE_MAP_SIZE};
use crate::cpu::Bus;
use crate::error::EmulationError;
use crate::interrupts::{InterruptController, InterruptFlags};
use crate::{GameBoyConfig, SCREEN_HEIGHT, SCREEN_WIDTH};

const BANK: usize = 0x4000;

/// ROM of `banks` x 16 KiB where every byte of bank N is `0x11 * (N + 1)`,
/// with a header declaring `cart_type` and `ram_code`.
fn patterned_rom(banks: usize, cart_type: u8, ram_code: u8) -> Vec<u8> {
    let mut rom = vec![0u8; banks * BANK];
    for (bank, chunk) in rom.chunks_mut(BANK).enumerate() {
        chunk.fill(0x11u8.wrapping_mul(bank as u8 + 1));
    }
    rom[0x147] = cart_type;
    rom[0x148] = (banks / 2).trailing_zeros() as u8;
    rom[0x149] = ram_code;
    rom
}

/// 32 KiB ROM-only cartridge with `program` at $0100.
fn program_rom(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 2 * BANK];
    rom[0x134..0x138].copy_from_slice(b"TEST");
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn quiet_config() -> GameBoyConfig {
    GameBoyConfig::builder().randomize_ram(false).build()
}

fn machine_with(rom: &[u8]) -> GameBoy {
    let mut gb = GameBoy::with_config(quiet_config()).unwrap();
    gb.load_rom(rom).unwrap();
    gb
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[test]
fn div_increments_every_256_tcycles() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();

    for _ in 0..255 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.read(0xFF04), 0);
    timer.tick_tcycle(&mut ic);
    assert_eq!(timer.read(0xFF04), 1);
}

#[test]
fn tima_overflow_reloads_tma_one_cycle_later() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    timer.write(0xFF06, 0x42);
    timer.write(0xFF05, 0xFF);
    // Enabled, 16 T-cycles per increment.
    timer.write(0xFF07, 0x05);

    for _ in 0..16 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.read(0xFF05), 0x00);
    assert!(!ic.requested().contains(InterruptFlags::TIMER));

    timer.tick_tcycle(&mut ic);
    assert_eq!(timer.read(0xFF05), 0x42);
    assert!(ic.requested().contains(InterruptFlags::TIMER));
}

#[test]
fn tima_rates_follow_tac() {
    for (tac, period) in [(0x04u8, 1024u32), (0x05, 16), (0x06, 64), (0x07, 256)] {
        let mut timer = Timer::new();
        let mut ic = InterruptController::new();
        timer.write(0xFF07, tac);
        for _ in 0..period * 3 {
            timer.tick_tcycle(&mut ic);
        }
        assert_eq!(timer.read(0xFF05), 3, "TAC=0x{tac:02X}");
    }
}

#[test]
fn div_write_clears_the_whole_divider() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    for _ in 0..1000 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.read(0xFF04), 3);

    timer.write(0xFF04, 0x99);
    assert_eq!(timer.internal_counter(), 0);
    assert_eq!(timer.read(0xFF04), 0);
}

#[test]
fn div_reset_counts_as_falling_edge() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    timer.write(0xFF07, 0x05);
    // Bit 3 of the divider is high after 8 cycles.
    for _ in 0..8 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.read(0xFF05), 0);
    timer.write(0xFF04, 0);
    assert_eq!(timer.read(0xFF05), 1);
}

#[test]
fn timer_is_frozen_while_stopped() {
    let mut timer = Timer::new();
    let mut ic = InterruptController::new();
    timer.init_dmg();
    timer.enter_stop();
    for _ in 0..4096 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.internal_counter(), 0);

    timer.leave_stop();
    for _ in 0..256 {
        timer.tick_tcycle(&mut ic);
    }
    assert_eq!(timer.read(0xFF04), 1);
}

#[test]
fn tac_reads_upper_bits_set() {
    let mut timer = Timer::new();
    timer.write(0xFF07, 0xFE);
    assert_eq!(timer.read(0xFF07), 0xFE);
    timer.write(0xFF07, 0x01);
    assert_eq!(timer.read(0xFF07), 0xF9);
}

// ---------------------------------------------------------------------------
// Cartridges
// ---------------------------------------------------------------------------

#[test]
fn mbc1_basic_rom_banking_works() {
    let rom = patterned_rom(4, 0x01, 0x00);
    let mut gb = machine_with(&rom);

    assert_eq!(gb.bus.read8(0x0000), 0x11);
    // Bank 1 after reset.
    assert_eq!(gb.bus.read8(0x4000), 0x22);

    gb.bus.write8(0x2000, 0x02);
    assert_eq!(gb.bus.read8(0x4000), 0x33);
    gb.bus.write8(0x2000, 0x03);
    assert_eq!(gb.bus.read8(0x7FFF), 0x44);
    assert_eq!(gb.bus.read8(0x0000), 0x11);

    // Bank 0 is not selectable in the upper window.
    gb.bus.write8(0x2000, 0x00);
    assert_eq!(gb.bus.read8(0x4000), 0x22);
    assert_eq!(gb.bus.take_fault(), None);
}

#[test]
fn mbc1_out_of_range_bank_is_fatal_when_strict() {
    let rom = patterned_rom(4, 0x01, 0x00);
    let mut gb = machine_with(&rom);

    gb.bus.write8(0x2000, 0x05);
    assert_eq!(
        gb.bus.take_fault(),
        Some(EmulationError::InvalidBankSwitch {
            bank: 5,
            available: 4
        })
    );
    // The previous selection stays in place.
    assert_eq!(gb.bus.read8(0x4000), 0x22);
}

#[test]
fn out_of_range_bank_wraps_when_not_strict() {
    let rom = patterned_rom(4, 0x01, 0x00);
    let config = GameBoyConfig::builder()
        .randomize_ram(false)
        .strict_bank_switch(false)
        .build();
    let mut gb = GameBoy::with_config(config).unwrap();
    gb.load_rom(&rom).unwrap();

    gb.bus.write8(0x2000, 0x06);
    assert_eq!(gb.bus.take_fault(), None);
    assert_eq!(gb.bus.read8(0x4000), 0x33);
}

#[test]
fn mbc1_ram_enable_and_access_works() {
    let rom = patterned_rom(2, 0x03, 0x02);
    let mut gb = machine_with(&rom);

    assert_eq!(gb.bus.read8(0xA000), 0xFF);
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);

    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.read8(0xA000), 0x42);

    gb.bus.write8(0x0000, 0x00);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
}

#[test]
fn mbc3_ram_banks_are_independent() {
    // 32 KiB RAM: four banks.
    let rom = patterned_rom(8, 0x13, 0x03);
    let mut gb = machine_with(&rom);
    gb.bus.write8(0x0000, 0x0A);

    for bank in 0..4u8 {
        gb.bus.write8(0x4000, bank);
        gb.bus.write8(0xA123, 0xA0 | bank);
    }
    for bank in 0..4u8 {
        gb.bus.write8(0x4000, bank);
        assert_eq!(gb.bus.read8(0xA123), 0xA0 | bank);
    }

    gb.bus.write8(0x2000, 0x07);
    assert_eq!(gb.bus.read8(0x4000), 0x88);
}

#[test]
fn mbc5_can_map_bank_zero_high() {
    let rom = patterned_rom(4, 0x19, 0x00);
    let mut gb = machine_with(&rom);

    gb.bus.write8(0x2000, 0x03);
    assert_eq!(gb.bus.read8(0x4000), 0x44);
    gb.bus.write8(0x2000, 0x00);
    assert_eq!(gb.bus.read8(0x4000), 0x11);

    // Bit 8 pushes the request past the end of the ROM.
    gb.bus.write8(0x3000, 0x01);
    assert_eq!(
        gb.bus.take_fault(),
        Some(EmulationError::InvalidBankSwitch {
            bank: 0x100,
            available: 4
        })
    );
}

#[test]
fn header_problems_are_reported() {
    let mut gb = GameBoy::with_config(quiet_config()).unwrap();
    assert_eq!(gb.load_rom(&[0u8; 0x100]), Err(EmulationError::RomTooSmall(0x100)));

    let rom = patterned_rom(2, 0xFC, 0x00);
    assert_eq!(gb.load_rom(&rom), Err(EmulationError::UnsupportedCartridge(0xFC)));

    let mut rom = program_rom(&[]);
    rom[0x134..0x140].copy_from_slice(b"DOTMATRIX\0\0\0");
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.cartridge_title(), Some("DOTMATRIX"));
}

#[test]
fn empty_slot_reads_ff() {
    let mut gb = GameBoy::with_config(quiet_config()).unwrap();
    assert_eq!(gb.cartridge_title(), None);
    assert_eq!(gb.bus.read8(0x0100), 0xFF);
    assert_eq!(gb.bus.read8(0x7FFF), 0xFF);
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

#[test]
fn bank_switch_error_stops_the_session() {
    // LD A,$05 ; LD ($2000),A
    let mut rom = patterned_rom(4, 0x01, 0x00);
    rom[0x100..0x105].copy_from_slice(&[0x3E, 0x05, 0xEA, 0x00, 0x20]);
    let mut gb = machine_with(&rom);

    assert_eq!(gb.step(), Ok(8));
    let expected = EmulationError::InvalidBankSwitch {
        bank: 5,
        available: 4,
    };
    assert_eq!(gb.step(), Err(expected.clone()));

    let pc = gb.cpu.regs.pc;
    assert_eq!(gb.step(), Err(expected));
    assert_eq!(gb.cpu.regs.pc, pc);
}

#[test]
fn undefined_opcode_stops_the_session() {
    let rom = program_rom(&[0x00, 0xDD]);
    let mut gb = machine_with(&rom);

    assert_eq!(gb.step(), Ok(4));
    let err = gb.step().unwrap_err();
    assert_eq!(
        err,
        EmulationError::UndefinedOpcode {
            opcode: 0xDD,
            addr: 0x0101
        }
    );
    assert_eq!(gb.step_frame(), Err(err));
}

#[test]
fn step_frame_runs_one_frame_of_cycles() {
    // JR -2
    let rom = program_rom(&[0x18, 0xFE]);
    let mut gb = machine_with(&rom);

    gb.step_frame().unwrap();
    let first = gb.total_cycles();
    // The first VBlank starts 144 lines after the LCD came on.
    assert!((144 * 456..144 * 456 + 12).contains(&first));

    gb.step_frame().unwrap();
    let delta = gb.total_cycles() - first;
    assert!(delta.abs_diff(70_224) < 12, "frame took {delta} cycles");
}

#[test]
fn step_frame_is_bounded_with_lcd_off() {
    // XOR A ; LDH ($40),A ; JR -2
    let rom = program_rom(&[0xAF, 0xE0, 0x40, 0x18, 0xFE]);
    let mut gb = machine_with(&rom);

    gb.step_frame().unwrap();
    gb.step_frame().unwrap();
    assert!(gb.total_cycles() >= 70_224);
    assert!(gb.total_cycles() < 2 * 70_224 + 12);
}

#[test]
fn halt_wakes_on_vblank_without_ime() {
    // XOR A ; LDH ($0F),A ; INC A ; LDH ($FF),A ; HALT ; NOP
    let rom = program_rom(&[0xAF, 0xE0, 0x0F, 0x3C, 0xE0, 0xFF, 0x76, 0x00]);
    let mut gb = machine_with(&rom);

    for _ in 0..5 {
        gb.step().unwrap();
    }
    assert!(gb.cpu.is_halted());

    let mut guard = 0;
    while gb.cpu.is_halted() {
        gb.step().unwrap();
        guard += 1;
        assert!(guard < 20_000, "HALT never woke");
    }
    assert!(gb.bus.interrupts.requested().contains(InterruptFlags::VBLANK));
    // Woke without dispatch: PC is just past HALT.
    assert_eq!(gb.cpu.regs.pc, 0x0108);
    assert!((144 * 456..144 * 456 + 48).contains(&gb.total_cycles()));
}

#[test]
fn vblank_interrupt_is_dispatched_through_the_bus() {
    // LD A,$01 ; LDH ($FF),A ; XOR A ; LDH ($0F),A ; EI ; JR -2
    let mut rom = program_rom(&[0x3E, 0x01, 0xE0, 0xFF, 0xAF, 0xE0, 0x0F, 0xFB, 0x18, 0xFE]);
    // Handler: JR -2
    rom[0x40] = 0x18;
    rom[0x41] = 0xFE;
    let mut gb = machine_with(&rom);

    gb.step_frame().unwrap();
    // Dispatch, then the handler spins on its JR.
    for _ in 0..2 {
        gb.step().unwrap();
    }
    assert_eq!(gb.cpu.regs.pc, 0x0040);
    assert!(!gb.cpu.ime);
    assert!(!gb.bus.interrupts.requested().contains(InterruptFlags::VBLANK));
    assert_eq!(gb.bus.read8(0xFFFC), 0x08);
    assert_eq!(gb.bus.read8(0xFFFD), 0x01);
}

#[test]
fn stop_freezes_div_until_a_button_is_pressed() {
    // LD A,$10 (select buttons) ; LDH ($00),A ; STOP ; NOP
    let rom = program_rom(&[0x3E, 0x10, 0xE0, 0x00, 0x10, 0x00, 0x00]);
    let mut gb = machine_with(&rom);

    for _ in 0..3 {
        gb.step().unwrap();
    }
    assert!(gb.cpu.is_stopped());
    for _ in 0..1000 {
        assert_eq!(gb.step(), Ok(4));
    }
    assert_eq!(gb.bus.read8(0xFF04), 0);
    let ly = gb.bus.read8(0xFF44);

    gb.set_button(Button::Start, true);
    gb.step().unwrap();
    assert!(!gb.cpu.is_stopped());
    assert_eq!(gb.bus.read8(0xFF44), ly);

    while gb.total_cycles() < 8000 {
        gb.step().unwrap();
    }
    assert_ne!(gb.bus.read8(0xFF04), 0);
}

#[test]
fn invalid_boot_rom_is_rejected() {
    let config = GameBoyConfig::builder().boot_rom(vec![0; 10]).build();
    assert!(matches!(
        GameBoy::with_config(config),
        Err(EmulationError::InvalidBootRom(10))
    ));
}

#[test]
fn boot_rom_unmaps_on_ff50_write() {
    let mut boot = vec![0u8; 0x100];
    // LD A,$01 ; LDH ($50),A
    boot[..4].copy_from_slice(&[0x3E, 0x01, 0xE0, 0x50]);
    let config = GameBoyConfig::builder()
        .boot_rom(boot)
        .randomize_ram(false)
        .build();
    let mut gb = GameBoy::with_config(config).unwrap();
    gb.load_rom(&patterned_rom(2, 0x00, 0x00)).unwrap();

    assert_eq!(gb.cpu.regs.pc, 0x0000);
    assert!(gb.boot_rom_mapped());
    assert_eq!(gb.bus.read8(0x0000), 0x3E);
    // Only the first 256 bytes are overlaid.
    assert_eq!(gb.bus.read8(0x0100), 0x11);

    // Writing zero leaves it mapped.
    gb.bus.write8(0xFF50, 0x00);
    assert!(gb.boot_rom_mapped());

    gb.step().unwrap();
    gb.step().unwrap();
    assert!(!gb.boot_rom_mapped());
    assert_eq!(gb.bus.read8(0x0000), 0x11);

    gb.bus.write8(0xFF50, 0x00);
    assert_eq!(gb.bus.read8(0x0000), 0x11);
}

#[test]
fn joypad_press_requests_input_interrupt() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.interrupts.write_if(0);
    // Select the d-pad.
    gb.bus.write8(0xFF00, 0x20);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0F);

    gb.set_button(Button::Down, true);
    assert!(gb.bus.interrupts.requested().contains(InterruptFlags::INPUT));
    assert_eq!(gb.bus.read8(0xFF00), 0xE7);

    // Holding a button does not re-request.
    gb.bus.interrupts.write_if(0);
    gb.set_button(Button::Down, true);
    assert!(gb.bus.interrupts.requested().is_empty());

    // Buttons are not visible while only the d-pad is selected, and a
    // press there pulls no line low.
    gb.set_button(Button::A, true);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x07);
    assert!(gb.bus.interrupts.requested().is_empty());
    gb.bus.write8(0xFF00, 0x10);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0E);
}

#[test]
fn unselected_group_press_does_not_interrupt() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.interrupts.write_if(0);
    // Neither group selected.
    gb.bus.write8(0xFF00, 0x30);

    gb.set_button(Button::Start, true);
    gb.set_button(Button::Left, true);
    assert!(gb.bus.interrupts.requested().is_empty());
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0F);

    // Selecting the buttons exposes Start, then a new press interrupts.
    gb.bus.write8(0xFF00, 0x10);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x07);
    gb.set_button(Button::B, true);
    assert!(gb.bus.interrupts.requested().contains(InterruptFlags::INPUT));
}

#[test]
fn key_mapping_drives_buttons() {
    use dotmatrix_common::key::Key;

    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.write8(0xFF00, 0x10);
    gb.handle_key(Key::Return, true);
    gb.handle_key(Key::Z, true);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x06);
    gb.handle_key(Key::Return, false);
    gb.handle_key(Key::Escape, true);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0E);
}

// ---------------------------------------------------------------------------
// OAM DMA
// ---------------------------------------------------------------------------

#[test]
fn oam_dma_copies_160_bytes_in_640_cycles() {
    let mut gb = machine_with(&program_rom(&[]));
    // LCD off so OAM is readable afterwards.
    gb.bus.write8(0xFF40, 0x11);
    for i in 0..0xA0u16 {
        gb.bus.write8(0xC000 + i, i as u8 ^ 0x5A);
    }

    gb.bus.write8(0xFF46, 0xC0);
    assert!(gb.bus.dma_active());
    assert_eq!(gb.bus.read8(0xFF46), 0xC0);

    gb.bus.advance(639);
    assert!(gb.bus.dma_active());
    // Only HRAM and IO are reachable meanwhile.
    assert_eq!(gb.bus.read8(0xC000), 0xFF);
    gb.bus.write8(0xC000, 0x00);
    gb.bus.write8(0xFF80, 0x77);
    assert_eq!(gb.bus.read8(0xFF80), 0x77);

    gb.bus.advance(1);
    assert!(!gb.bus.dma_active());
    for i in 0..0xA0u16 {
        assert_eq!(gb.bus.read8(0xFE00 + i), i as u8 ^ 0x5A);
    }
    assert_eq!(gb.bus.read8(0xC000), 0x5A);
}

#[test]
fn oam_dma_reads_rom_and_echo_sources() {
    let mut gb = machine_with(&patterned_rom(2, 0x00, 0x00));
    gb.bus.write8(0xFF40, 0x11);

    gb.bus.write8(0xFF46, 0x40);
    gb.bus.advance(640);
    assert_eq!(gb.bus.read8(0xFE9F), 0x22);

    gb.bus.write8(0xC010, 0xB7);
    gb.bus.write8(0xFF46, 0xE0);
    gb.bus.advance(640);
    assert_eq!(gb.bus.read8(0xFE10), 0xB7);
}

#[test]
fn oam_dma_from_vram_source() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.write8(0xFF40, 0x11);
    for i in 0..0xA0u16 {
        gb.bus.write8(0x8000 + i, i as u8 ^ 0xA5);
    }

    gb.bus.write8(0xFF46, 0x80);
    gb.bus.advance(640);
    assert!(!gb.bus.dma_active());
    for i in 0..0xA0u16 {
        assert_eq!(gb.bus.read8(0xFE00 + i), i as u8 ^ 0xA5);
    }
}

// ---------------------------------------------------------------------------
// PPU
// ---------------------------------------------------------------------------

#[test]
fn one_frame_raises_one_vblank_and_one_lyc_stat() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.interrupts.write_if(0);
    gb.bus.write8(0xFF45, 144);
    gb.bus.write8(0xFF41, 0x40);

    let mut vblanks = 0;
    let mut stats = 0;
    for _ in 0..456 * 154 {
        gb.bus.advance(1);
        let requested = gb.bus.interrupts.requested();
        if requested.contains(InterruptFlags::VBLANK) {
            vblanks += 1;
        }
        if requested.contains(InterruptFlags::STAT) {
            stats += 1;
        }
        gb.bus.interrupts.write_if(0);
    }
    assert_eq!(vblanks, 1);
    assert_eq!(stats, 1);
    assert_eq!(gb.bus.ppu.ly(), 0);
    assert_eq!(gb.bus.ppu.mode(), Mode::OamScan);
    assert!(gb.bus.ppu.take_frame_ready());
    assert!(!gb.bus.ppu.take_frame_ready());
}

#[test]
fn mode_sequence_within_a_line() {
    let mut gb = machine_with(&program_rom(&[]));
    let stat_mode = |gb: &mut GameBoy| gb.bus.read8(0xFF41) & 0x03;

    assert_eq!(stat_mode(&mut gb), 2);
    gb.bus.advance(80);
    assert_eq!(stat_mode(&mut gb), 3);
    gb.bus.advance(172);
    assert_eq!(stat_mode(&mut gb), 0);
    gb.bus.advance(456 - 80 - 172);
    assert_eq!(stat_mode(&mut gb), 2);
    assert_eq!(gb.bus.read8(0xFF44), 1);

    gb.bus.advance(456 * 143);
    assert_eq!(gb.bus.read8(0xFF44), 144);
    assert_eq!(stat_mode(&mut gb), 1);
}

#[test]
fn ly_is_read_only_and_drives_coincidence() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.write8(0xFF44, 0x50);
    assert_eq!(gb.bus.read8(0xFF44), 0);

    gb.bus.write8(0xFF45, 0);
    assert_eq!(gb.bus.read8(0xFF41) & 0x04, 0x04);
    gb.bus.write8(0xFF45, 1);
    assert_eq!(gb.bus.read8(0xFF41) & 0x04, 0);
}

#[test]
fn vram_and_oam_locked_by_mode() {
    let mut gb = machine_with(&program_rom(&[]));

    // Mode 2: OAM locked, VRAM open.
    gb.bus.write8(0xFE00, 0x12);
    assert_eq!(gb.bus.read8(0xFE00), 0xFF);
    gb.bus.write8(0x8000, 0x34);
    assert_eq!(gb.bus.read8(0x8000), 0x34);

    // Mode 3: both locked.
    gb.bus.advance(80);
    gb.bus.write8(0x8000, 0x56);
    assert_eq!(gb.bus.read8(0x8000), 0xFF);

    // HBlank: both open and the mode-3 write was dropped.
    gb.bus.advance(172);
    assert_eq!(gb.bus.read8(0x8000), 0x34);
    gb.bus.write8(0xFE00, 0x12);
    assert_eq!(gb.bus.read8(0xFE00), 0x12);
}

#[test]
fn lcd_off_resets_ly_and_stops_the_ppu() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.advance(456 * 10 + 100);
    assert_eq!(gb.bus.read8(0xFF44), 10);

    gb.bus.write8(0xFF40, 0x11);
    assert_eq!(gb.bus.read8(0xFF44), 0);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 0);
    gb.bus.advance(456 * 3);
    assert_eq!(gb.bus.read8(0xFF44), 0);

    gb.bus.write8(0xFF40, 0x91);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 2);
}

/// Turn the LCD off, place `count` objects on line 0 and turn it back on.
fn objects_on_first_line(gb: &mut GameBoy, count: u8, lcdc: u8) {
    gb.bus.write8(0xFF40, 0x11);
    for i in 0..count as u16 {
        let base = 0xFE00 + i * 4;
        gb.bus.write8(base, 16);
        // Descending X so a sort by X would reorder them.
        gb.bus.write8(base + 1, 160 - i as u8 * 8);
        gb.bus.write8(base + 2, i as u8);
        gb.bus.write8(base + 3, 0);
    }
    gb.bus.write8(0xFF40, lcdc);
}

#[test]
fn oam_scan_keeps_first_ten_objects() {
    let mut gb = machine_with(&program_rom(&[]));
    objects_on_first_line(&mut gb, 12, 0x93);

    gb.bus.advance(80);
    let selected: Vec<u8> = gb.bus.ppu.line_objects().iter().map(|o| o.oam_index).collect();
    assert_eq!(selected, (0..10).collect::<Vec<u8>>());

    // Ten objects stretch mode 3 by 60 cycles.
    gb.bus.advance(172 + 59);
    assert_eq!(gb.bus.ppu.mode(), Mode::Transfer);
    gb.bus.advance(1);
    assert_eq!(gb.bus.ppu.mode(), Mode::HBlank);
}

#[test]
fn tall_objects_cover_sixteen_lines() {
    let mut gb = machine_with(&program_rom(&[]));
    gb.bus.write8(0xFF40, 0x11);
    // Top row at screen Y -8: only visible with 8x16 objects.
    gb.bus.write8(0xFE00, 8);
    gb.bus.write8(0xFE01, 8);

    gb.bus.write8(0xFF40, 0x93);
    gb.bus.advance(80);
    assert!(gb.bus.ppu.line_objects().is_empty());

    gb.bus.write8(0xFF40, 0x11);
    gb.bus.write8(0xFF40, 0x97);
    gb.bus.advance(80);
    assert_eq!(gb.bus.ppu.line_objects().len(), 1);
}

#[test]
fn frame_renders_background_tiles() {
    // JR -2
    let mut gb = machine_with(&program_rom(&[0x18, 0xFE]));
    gb.bus.write8(0xFF40, 0x11);
    // Tile 0, first row colour 3, remaining rows colour 1.
    gb.bus.write8(0x8000, 0xFF);
    gb.bus.write8(0x8001, 0xFF);
    for row in 1..8u16 {
        gb.bus.write8(0x8000 + row * 2, 0xFF);
    }
    // BGP: 0->0, 1->1, 2->2, 3->3.
    gb.bus.write8(0xFF47, 0xE4);
    gb.bus.write8(0xFF40, 0x91);

    gb.step_frame().unwrap();
    let shades = gb.frame_shades();
    assert_eq!(shades.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
    assert!(shades[..SCREEN_WIDTH].iter().all(|&s| s == 3));
    assert!(shades[SCREEN_WIDTH..2 * SCREEN_WIDTH].iter().all(|&s| s == 1));
    assert!(shades[8 * SCREEN_WIDTH..9 * SCREEN_WIDTH].iter().all(|&s| s == 3));

    let mut rgb = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    gb.video_frame(&mut rgb);
    assert_eq!(&rgb[..3], &[0, 0, 0]);
    let second_row = SCREEN_WIDTH * 3;
    assert_eq!(&rgb[second_row..second_row + 3], &[0xAA, 0xAA, 0xAA]);

    let map = gb.debug_tile_map(TileMap::Background);
    assert_eq!(map.len(), TILE_MAP_SIZE * TILE_MAP_SIZE);
    assert!(map[..TILE_MAP_SIZE].iter().all(|&s| s == 3));
}

#[test]
fn objects_draw_over_background() {
    // JR -2
    let mut gb = machine_with(&program_rom(&[0x18, 0xFE]));
    gb.bus.write8(0xFF40, 0x11);
    // Tile 1: solid colour 2.
    for row in 0..8u16 {
        gb.bus.write8(0x8010 + row * 2 + 1, 0xFF);
    }
    // One object at the top-left corner using tile 1.
    gb.bus.write8(0xFE00, 16);
    gb.bus.write8(0xFE01, 8);
    gb.bus.write8(0xFE02, 1);
    gb.bus.write8(0xFE03, 0);
    gb.bus.write8(0xFF47, 0xE4);
    gb.bus.write8(0xFF48, 0xE4);
    gb.bus.write8(0xFF40, 0x93);

    gb.step_frame().unwrap();
    let shades = gb.frame_shades();
    assert_eq!(shades[0], 2);
    assert_eq!(shades[7 * SCREEN_WIDTH + 7], 2);
    assert_eq!(shades[8], 0);
    assert_eq!(shades[8 * SCREEN_WIDTH], 0);
}

/// Fill tile `tile` (unsigned $8000 addressing) with one colour index.
fn solid_tile(gb: &mut GameBoy, tile: u16, color: u8) {
    let lo = if color & 1 != 0 { 0xFF } else { 0x00 };
    let hi = if color & 2 != 0 { 0xFF } else { 0x00 };
    for row in 0..8u16 {
        gb.bus.write8(0x8000 + tile * 16 + row * 2, lo);
        gb.bus.write8(0x8000 + tile * 16 + row * 2 + 1, hi);
    }
}

fn put_object(gb: &mut GameBoy, index: u16, y: u8, x: u8, tile: u8, attrs: u8) {
    let base = 0xFE00 + index * 4;
    gb.bus.write8(base, y);
    gb.bus.write8(base + 1, x);
    gb.bus.write8(base + 2, tile);
    gb.bus.write8(base + 3, attrs);
}

/// JR -2 loop with the LCD off, ready for VRAM/OAM setup.
fn idle_machine_lcd_off() -> GameBoy {
    let mut gb = machine_with(&program_rom(&[0x18, 0xFE]));
    gb.bus.write8(0xFF40, 0x11);
    gb.bus.write8(0xFF47, 0xE4);
    gb.bus.write8(0xFF48, 0xE4);
    gb.bus.write8(0xFF49, 0xE4);
    gb
}

/// Turn the LCD on with `lcdc` and return the first full frame.
fn render_frame(gb: &mut GameBoy, lcdc: u8) -> Vec<u8> {
    gb.bus.write8(0xFF40, lcdc);
    gb.step_frame().unwrap();
    gb.frame_shades().to_vec()
}

fn pixel(frame: &[u8], x: usize, y: usize) -> u8 {
    frame[y * SCREEN_WIDTH + x]
}

#[test]
fn window_covers_background_from_wx_wy() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 1, 3);
    solid_tile(&mut gb, 2, 1);
    // Window map at $9C00: first tile row uses tile 1, the rest tile 2.
    for i in 0..32 * 32u16 {
        gb.bus.write8(0x9C00 + i, if i < 32 { 1 } else { 2 });
    }
    gb.bus.write8(0xFF4A, 40);
    gb.bus.write8(0xFF4B, 87);

    // LCD, window map $9C00, window, $8000 tiles, BG.
    let frame = render_frame(&mut gb, 0xF1);

    assert_eq!(pixel(&frame, 100, 39), 0);
    assert_eq!(pixel(&frame, 79, 40), 0);
    // The window starts at its own row 0 on LY=WY.
    assert_eq!(pixel(&frame, 80, 40), 3);
    assert_eq!(pixel(&frame, 159, 47), 3);
    assert_eq!(pixel(&frame, 80, 48), 1);
    assert_eq!(pixel(&frame, 159, 143), 1);
    assert_eq!(pixel(&frame, 79, 143), 0);

    let map = gb.debug_tile_map(TileMap::Window);
    assert!(map[..8 * TILE_MAP_SIZE].iter().all(|&s| s == 3));
    assert!(map[8 * TILE_MAP_SIZE..].iter().all(|&s| s == 1));
}

#[test]
fn overlapping_objects_prefer_smaller_x_then_oam_index() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 1, 1);
    solid_tile(&mut gb, 2, 2);
    solid_tile(&mut gb, 3, 3);
    // Screen X 12..19 and 8..15: the later OAM entry has the smaller X.
    put_object(&mut gb, 0, 16, 20, 1, 0);
    put_object(&mut gb, 1, 16, 16, 2, 0);
    // Same X: the lower OAM index wins.
    put_object(&mut gb, 2, 16, 60, 3, 0);
    put_object(&mut gb, 3, 16, 60, 1, 0);

    let frame = render_frame(&mut gb, 0x93);

    assert_eq!(pixel(&frame, 8, 0), 2);
    assert_eq!(pixel(&frame, 12, 0), 2);
    assert_eq!(pixel(&frame, 15, 0), 2);
    assert_eq!(pixel(&frame, 16, 0), 1);
    assert_eq!(pixel(&frame, 19, 0), 1);
    assert_eq!(pixel(&frame, 52, 3), 3);
    assert_eq!(pixel(&frame, 59, 7), 3);
    assert_eq!(pixel(&frame, 52, 8), 0);
}

#[test]
fn bg_priority_objects_only_show_over_colour_zero() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 1, 1);
    solid_tile(&mut gb, 2, 2);
    // Background column 1 (screen X 8..15) uses colour 1.
    for row in 0..32u16 {
        gb.bus.write8(0x9801 + row * 32, 1);
    }
    // Screen X 4..11 on lines 0..7, behind the background.
    put_object(&mut gb, 0, 16, 12, 2, 0x80);
    // Same columns on lines 16..23, in front.
    put_object(&mut gb, 1, 32, 12, 2, 0x00);

    let frame = render_frame(&mut gb, 0x93);

    assert_eq!(pixel(&frame, 4, 0), 2);
    assert_eq!(pixel(&frame, 7, 0), 2);
    assert_eq!(pixel(&frame, 8, 0), 1);
    assert_eq!(pixel(&frame, 11, 7), 1);
    assert_eq!(pixel(&frame, 8, 16), 2);
    assert_eq!(pixel(&frame, 12, 16), 1);
}

#[test]
fn object_flips_mirror_the_tile() {
    let mut gb = idle_machine_lcd_off();
    // Tile 1: only the top-left pixel is set, colour 3.
    gb.bus.write8(0x8010, 0x80);
    gb.bus.write8(0x8011, 0x80);
    put_object(&mut gb, 0, 16, 8, 1, 0x00);
    put_object(&mut gb, 1, 16, 24, 1, 0x20);
    put_object(&mut gb, 2, 32, 8, 1, 0x40);
    put_object(&mut gb, 3, 32, 24, 1, 0x60);

    let frame = render_frame(&mut gb, 0x93);

    assert_eq!(pixel(&frame, 0, 0), 3);
    assert_eq!(pixel(&frame, 23, 0), 3);
    assert_eq!(pixel(&frame, 0, 23), 3);
    assert_eq!(pixel(&frame, 23, 23), 3);
    assert_eq!(frame.iter().filter(|&&s| s == 3).count(), 4);
}

#[test]
fn tall_objects_use_the_odd_tile_for_the_bottom_half() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 4, 1);
    solid_tile(&mut gb, 5, 2);
    // Bit 0 of the tile index is ignored in 8x16 mode.
    put_object(&mut gb, 0, 16, 8, 5, 0x00);
    put_object(&mut gb, 1, 16, 24, 4, 0x40);

    let frame = render_frame(&mut gb, 0x97);

    assert_eq!(pixel(&frame, 0, 0), 1);
    assert_eq!(pixel(&frame, 0, 7), 1);
    assert_eq!(pixel(&frame, 0, 8), 2);
    assert_eq!(pixel(&frame, 0, 15), 2);
    assert_eq!(pixel(&frame, 0, 16), 0);
    // Y-flipped: the bottom tile comes first.
    assert_eq!(pixel(&frame, 16, 0), 2);
    assert_eq!(pixel(&frame, 16, 15), 1);
}

#[test]
fn only_ten_objects_reach_the_screen() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 1, 3);
    for i in 0..12u16 {
        put_object(&mut gb, i, 16, 8 + i as u8 * 12, 1, 0);
    }

    let frame = render_frame(&mut gb, 0x93);

    let drawn = (0..12)
        .filter(|i| pixel(&frame, i * 12, 0) == 3)
        .count();
    assert_eq!(drawn, 10);
    assert_eq!(pixel(&frame, 10 * 12, 0), 0);
    assert_eq!(pixel(&frame, 11 * 12, 0), 0);
}

#[test]
fn object_height_change_in_mode_3_keeps_the_scanned_height() {
    let mut gb = idle_machine_lcd_off();
    solid_tile(&mut gb, 2, 1);
    solid_tile(&mut gb, 3, 2);
    put_object(&mut gb, 0, 16, 8, 2, 0x40);
    gb.bus.write8(0xFF40, 0x97);

    // LY=8, just past the OAM scan.
    gb.bus.advance(8 * 456 + 80);
    assert_eq!(gb.bus.ppu.mode(), Mode::Transfer);
    gb.bus.write8(0xFF40, 0x93);
    gb.bus.advance(300);

    while !gb.bus.ppu.take_frame_ready() {
        gb.bus.advance(4);
    }
    let frame = gb.frame_shades();
    // Y-flipped 8x16: lines 0..7 show tile 3, line 8 the last row of tile 2.
    assert_eq!(pixel(frame, 0, 0), 2);
    assert_eq!(pixel(frame, 0, 7), 2);
    assert_eq!(pixel(frame, 0, 8), 1);
    assert_eq!(pixel(frame, 0, 9), 0);
}

#[test]
fn object_layer_view_places_objects_at_oam_coordinates() {
    let mut gb = idle_machine_lcd_off();
    gb.bus.write8(0x8010, 0x80);
    gb.bus.write8(0x8011, 0x80);
    // OBP1 maps colour 3 to shade 1.
    gb.bus.write8(0xFF49, 0x40);
    put_object(&mut gb, 0, 20, 30, 1, 0x00);
    // Hidden on the LCD, still shown here.
    put_object(&mut gb, 1, 0, 0, 1, 0x10);

    let layer = gb.debug_object_layer();
    assert_eq!(layer.len(), OBJECT_LAYER_SIZE * OBJECT_LAYER_SIZE);
    assert_eq!(layer[20 * OBJECT_LAYER_SIZE + 30], 3);
    assert_eq!(layer[0], 1);
    assert_eq!(layer.iter().filter(|&&s| s != 0).count(), 2);
}

#[test]
fn dispatch_with_stack_over_if_keeps_running() {
    // LD SP,$FF10 ; LD A,$01 ; LDH ($FF),A ; EI ; NOP
    let rom = program_rom(&[0x31, 0x10, 0xFF, 0x3E, 0x01, 0xE0, 0xFF, 0xFB, 0x00]);
    let mut gb = machine_with(&rom);
    // VBlank is already requested in the post-boot state.
    for _ in 0..5 {
        gb.step().unwrap();
    }
    assert!(gb.cpu.ime);

    assert_eq!(gb.step(), Ok(20));
    assert_eq!(gb.cpu.regs.pc, 0x0040);
    // The high byte of the return address ($0109) was pushed onto IF.
    assert_eq!(gb.bus.read8(0xFF0F) & 0x1F, 0x01);
    assert_eq!(gb.step(), Ok(4));
}
