//! CB-prefixed block: rotate/shift, BIT, RES, SET. Every CB opcode reads
//! and (except BIT) writes back through the same 3-bit register field used
//! by the primary table, so this shares `read_r8`/`write_r8`.

use super::{read_r8, write_r8};
use crate::bus::Bus;
use crate::cpu::regs::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use crate::cpu::Cpu;

fn set_rot_flags(cpu: &mut Cpu, result: u8, carry_out: bool) {
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(FLAG_H, false);
    cpu.regs.set_flag(FLAG_C, carry_out);
}

fn rot_op(which: u8, value: u8, carry_in: bool) -> (u8, bool) {
    match which {
        0 => (value.rotate_left(1), value & 0x80 != 0), // RLC
        1 => (value.rotate_right(1), value & 0x01 != 0), // RRC
        2 => {
            let out = value & 0x80 != 0;
            ((value << 1) | carry_in as u8, out) // RL
        }
        3 => {
            let out = value & 0x01 != 0;
            ((value >> 1) | ((carry_in as u8) << 7), out) // RR
        }
        4 => (value << 1, value & 0x80 != 0),           // SLA
        5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0), // SRA
        6 => (value.rotate_left(4), false),             // SWAP
        7 => (value >> 1, value & 0x01 != 0),            // SRL
        _ => unreachable!(),
    }
}

pub fn execute_cb(cpu: &mut Cpu, bus: &mut Bus, op: u8) -> u32 {
    let reg_idx = op & 0x07;
    let value = read_r8(cpu, bus, reg_idx);
    let indirect = reg_idx == 6;

    match op >> 6 {
        0 => {
            let which = (op >> 3) & 0x07;
            let carry_in = cpu.regs.flag(FLAG_C);
            let (result, carry_out) = rot_op(which, value, carry_in);
            write_r8(cpu, bus, reg_idx, result);
            if which == 6 {
                // SWAP: Z reflects the result, C is always cleared.
                cpu.regs.set_flag(FLAG_Z, result == 0);
                cpu.regs.set_flag(FLAG_N, false);
                cpu.regs.set_flag(FLAG_H, false);
                cpu.regs.set_flag(FLAG_C, false);
            } else {
                set_rot_flags(cpu, result, carry_out);
            }
        }
        1 => {
            // BIT b,r: no write-back.
            let bit = (op >> 3) & 0x07;
            let set = value & (1 << bit) != 0;
            cpu.regs.set_flag(FLAG_Z, !set);
            cpu.regs.set_flag(FLAG_N, false);
            cpu.regs.set_flag(FLAG_H, true);
            return if indirect { 12 } else { 8 };
        }
        2 => {
            let bit = (op >> 3) & 0x07;
            write_r8(cpu, bus, reg_idx, value & !(1 << bit));
        }
        3 => {
            let bit = (op >> 3) & 0x07;
            write_r8(cpu, bus, reg_idx, value | (1 << bit));
        }
        _ => unreachable!(),
    }

    if indirect {
        16
    } else {
        8
    }
}
