//! Opcode dispatch tables.
//!
//! Both tables are built at compile time from the opcode bit patterns. The
//! eleven holes in the base table (`$D3 $DB $DD $E3 $E4 $EB $EC $ED $F4 $FC
//! $FD`) stay `None` and lock the CPU when fetched.

use super::{Bus, Cpu};

pub(super) type Handler = fn(&mut Cpu, &mut dyn Bus, u8) -> u32;

pub(super) static OPCODES: [Option<Handler>; 256] = build_base_table();
pub(super) static CB_OPCODES: [Handler; 256] = build_cb_table();

const fn build_base_table() -> [Option<Handler>; 256] {
    let mut table: [Option<Handler>; 256] = [None; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = decode(op as u8);
        op += 1;
    }
    table
}

const fn build_cb_table() -> [Handler; 256] {
    let mut table: [Handler; 256] = [Cpu::exec_cb_shift as Handler; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = match op >> 6 {
            0 => Cpu::exec_cb_shift,
            1 => Cpu::exec_cb_bit,
            2 => Cpu::exec_cb_res,
            _ => Cpu::exec_cb_set,
        };
        op += 1;
    }
    table
}

const fn decode(op: u8) -> Option<Handler> {
    let handler: Handler = match op {
        0x00 => Cpu::exec_nop,
        0x01 | 0x11 | 0x21 | 0x31 => Cpu::exec_ld_rr_d16,
        0x02 | 0x12 | 0x22 | 0x32 => Cpu::exec_ld_indirect_a,
        0x0A | 0x1A | 0x2A | 0x3A => Cpu::exec_ld_a_indirect,
        0x03 | 0x13 | 0x23 | 0x33 => Cpu::exec_inc16,
        0x0B | 0x1B | 0x2B | 0x3B => Cpu::exec_dec16,
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Cpu::exec_inc8,
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Cpu::exec_dec8,
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => Cpu::exec_ld_r_d8,
        0x07 | 0x0F | 0x17 | 0x1F => Cpu::exec_rotate_a,
        0x08 => Cpu::exec_ld_a16_sp,
        0x09 | 0x19 | 0x29 | 0x39 => Cpu::exec_add_hl_rr,
        0x10 => Cpu::exec_stop,
        0x18 => Cpu::exec_jr,
        0x20 | 0x28 | 0x30 | 0x38 => Cpu::exec_jr_cc,
        0x27 => Cpu::exec_daa,
        0x2F => Cpu::exec_cpl,
        0x37 => Cpu::exec_scf,
        0x3F => Cpu::exec_ccf,
        0x76 => Cpu::exec_halt,
        0x40..=0x7F => Cpu::exec_ld_r_r,
        0x80..=0xBF => Cpu::exec_alu_r,
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Cpu::exec_ret_cc,
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Cpu::exec_pop,
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Cpu::exec_push,
        0xC2 | 0xCA | 0xD2 | 0xDA => Cpu::exec_jp_cc,
        0xC3 => Cpu::exec_jp_a16,
        0xC4 | 0xCC | 0xD4 | 0xDC => Cpu::exec_call_cc,
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => Cpu::exec_alu_d8,
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Cpu::exec_rst,
        0xC9 => Cpu::exec_ret,
        0xCB => Cpu::exec_prefix_cb,
        0xCD => Cpu::exec_call_a16,
        0xD9 => Cpu::exec_reti,
        0xE0 | 0xF0 => Cpu::exec_ldh_a8,
        0xE2 | 0xF2 => Cpu::exec_ldh_c,
        0xE8 => Cpu::exec_add_sp_r8,
        0xE9 => Cpu::exec_jp_hl,
        0xEA | 0xFA => Cpu::exec_ld_a16_a,
        0xF3 => Cpu::exec_di,
        0xF8 => Cpu::exec_ld_hl_sp_r8,
        0xF9 => Cpu::exec_ld_sp_hl,
        0xFB => Cpu::exec_ei,
        _ => return None,
    };
    Some(handler)
}
