//! ADD/ADC/SUB/SBC/AND/OR/XOR/CP (the 0x80-0xBF and 0xC6-0xFE ALU blocks),
//! INC/DEC r8, ADD HL,rr, ADD SP,r8, and INC/DEC r8 flag handling.

use super::{logical, read_r8};
use crate::bus::Bus;
use crate::cpu::regs::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use crate::cpu::Cpu;

fn add(cpu: &mut Cpu, value: u8, carry_in: u8) {
    let a = cpu.regs.a;
    let (r1, o1) = a.overflowing_add(value);
    let (result, o2) = r1.overflowing_add(carry_in);
    cpu.regs.a = result;
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(
        FLAG_H,
        (a & 0x0F) + (value & 0x0F) + carry_in > 0x0F,
    );
    cpu.regs.set_flag(FLAG_C, o1 || o2);
}

fn sub(cpu: &mut Cpu, value: u8, carry_in: u8) {
    let a = cpu.regs.a;
    let (r1, b1) = a.overflowing_sub(value);
    let (result, b2) = r1.overflowing_sub(carry_in);
    cpu.regs.a = result;
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, true);
    cpu.regs.set_flag(
        FLAG_H,
        (a & 0x0F) < (value & 0x0F) + carry_in,
    );
    cpu.regs.set_flag(FLAG_C, b1 || b2);
}

/// Dispatch the 0x80-0xBF block: `op`'s bits 3-5 select the operation,
/// bits 0-2 select the operand register (or `(HL)`).
pub fn alu_a_r(cpu: &mut Cpu, bus: &Bus, op: u8) -> u32 {
    let operand_idx = op & 0x07;
    let value = read_r8(cpu, bus, operand_idx);
    apply_alu_op((op >> 3) & 0x07, cpu, value);
    if operand_idx == 6 {
        8
    } else {
        4
    }
}

pub fn alu_a_d8(cpu: &mut Cpu, op: u8, imm: u8) -> u32 {
    let which = match op {
        0xC6 => 0,
        0xCE => 1,
        0xD6 => 2,
        0xDE => 3,
        0xE6 => 4,
        0xEE => 5,
        0xF6 => 6,
        0xFE => 7,
        _ => unreachable!(),
    };
    apply_alu_op(which, cpu, imm);
    8
}

fn apply_alu_op(which: u8, cpu: &mut Cpu, value: u8) {
    let carry = cpu.regs.flag(FLAG_C) as u8;
    match which {
        0 => add(cpu, value, 0),         // ADD
        1 => add(cpu, value, carry),     // ADC
        2 => sub(cpu, value, 0),         // SUB
        3 => sub(cpu, value, carry),     // SBC
        4 => logical::and(cpu, value),
        5 => logical::xor(cpu, value),
        6 => logical::or(cpu, value),
        7 => logical::cp(cpu, value),
        _ => unreachable!(),
    }
}

pub fn inc_dec_r8(cpu: &mut Cpu, bus: &mut Bus, op: u8, delta: i8) -> u32 {
    let idx = (op >> 3) & 0x07;
    let before = super::read_r8(cpu, bus, idx);
    let after = (before as i16 + delta as i16) as u8;
    super::write_r8(cpu, bus, idx, after);
    cpu.regs.set_flag(FLAG_Z, after == 0);
    cpu.regs.set_flag(FLAG_N, delta < 0);
    if delta > 0 {
        cpu.regs.set_flag(FLAG_H, (before & 0x0F) + 1 > 0x0F);
    } else {
        cpu.regs.set_flag(FLAG_H, (before & 0x0F) == 0);
    }
    if idx == 6 {
        12
    } else {
        4
    }
}

pub fn add_hl_rr(cpu: &mut Cpu, op: u8) -> u32 {
    let rhs = match op {
        0x09 => cpu.regs.bc(),
        0x19 => cpu.regs.de(),
        0x29 => cpu.regs.hl(),
        0x39 => cpu.regs.sp,
        _ => unreachable!(),
    };
    let hl = cpu.regs.hl();
    let (result, carry) = hl.overflowing_add(rhs);
    cpu.regs.set_hl(result);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs
        .set_flag(FLAG_H, (hl & 0x0FFF) + (rhs & 0x0FFF) > 0x0FFF);
    cpu.regs.set_flag(FLAG_C, carry);
    8
}

pub fn add_sp_r8(cpu: &mut Cpu, offset: i8) -> u32 {
    let sp = cpu.regs.sp;
    let operand = offset as i16 as u16;
    let result = sp.wrapping_add(operand);
    let half_carry = (sp & 0x0F) + (operand & 0x0F) > 0x0F;
    let carry = (sp & 0xFF) + (operand & 0xFF) > 0xFF;
    cpu.regs.sp = result;
    cpu.regs.set_flag(FLAG_Z, false);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(FLAG_H, half_carry);
    cpu.regs.set_flag(FLAG_C, carry);
    16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::test_utils::build_dmg_rom;

    fn cpu_bus() -> (Cpu, Bus) {
        let rom = build_dmg_rom(&[]);
        (Cpu::new(0x01), Bus::new(Cartridge::load(&rom).unwrap()))
    }

    #[test]
    fn add_sets_half_and_full_carry() {
        let mut cpu = Cpu::new(0x01);
        cpu.regs.a = 0xFF;
        add(&mut cpu, 0x01, 0);
        assert_eq!(cpu.regs.a, 0);
        assert!(cpu.regs.flag(FLAG_Z));
        assert!(cpu.regs.flag(FLAG_H));
        assert!(cpu.regs.flag(FLAG_C));
    }

    #[test]
    fn inc_r8_sets_half_carry_on_nibble_overflow() {
        let (mut cpu, mut bus) = cpu_bus();
        cpu.regs.b = 0x0F;
        inc_dec_r8(&mut cpu, &mut bus, 0x04, 1);
        assert_eq!(cpu.regs.b, 0x10);
        assert!(cpu.regs.flag(FLAG_H));
        assert!(!cpu.regs.flag(FLAG_N));
    }

    #[test]
    fn add_hl_rr_preserves_zero_flag() {
        let mut cpu = Cpu::new(0x01);
        cpu.regs.set_flag(FLAG_Z, true);
        cpu.regs.set_hl(0x0FFF);
        cpu.regs.set_bc(0x0001);
        add_hl_rr(&mut cpu, 0x09);
        assert_eq!(cpu.regs.hl(), 0x1000);
        assert!(cpu.regs.flag(FLAG_Z)); // untouched by ADD HL,rr
        assert!(cpu.regs.flag(FLAG_H));
    }
}
