//! AND/OR/XOR/CP: the logic half of the ALU block, factored out from the
//! add/sub/adc/sbc arithmetic so each file stays focused on one family.

use crate::cpu::regs::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use crate::cpu::Cpu;

pub fn and(cpu: &mut Cpu, value: u8) {
    let result = cpu.regs.a & value;
    cpu.regs.a = result;
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(FLAG_H, true);
    cpu.regs.set_flag(FLAG_C, false);
}

pub fn or(cpu: &mut Cpu, value: u8) {
    let result = cpu.regs.a | value;
    cpu.regs.a = result;
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(FLAG_H, false);
    cpu.regs.set_flag(FLAG_C, false);
}

pub fn xor(cpu: &mut Cpu, value: u8) {
    let result = cpu.regs.a ^ value;
    cpu.regs.a = result;
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, false);
    cpu.regs.set_flag(FLAG_H, false);
    cpu.regs.set_flag(FLAG_C, false);
}

pub fn cp(cpu: &mut Cpu, value: u8) {
    let a = cpu.regs.a;
    let result = a.wrapping_sub(value);
    cpu.regs.set_flag(FLAG_Z, result == 0);
    cpu.regs.set_flag(FLAG_N, true);
    cpu.regs.set_flag(FLAG_H, (a & 0x0F) < (value & 0x0F));
    cpu.regs.set_flag(FLAG_C, a < value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_a_a_zeroes_and_sets_z() {
        let mut cpu = Cpu::new(0x01);
        cpu.regs.a = 0x5A;
        xor(&mut cpu, cpu.regs.a);
        assert_eq!(cpu.regs.a, 0);
        assert!(cpu.regs.flag(FLAG_Z));
        assert!(!cpu.regs.flag(FLAG_C));
    }

    #[test]
    fn cp_sets_carry_when_a_less_than_operand() {
        let mut cpu = Cpu::new(0x01);
        cpu.regs.a = 0x10;
        cp(&mut cpu, 0x20);
        assert!(cpu.regs.flag(FLAG_C));
        assert!(cpu.regs.flag(FLAG_N));
    }
}
