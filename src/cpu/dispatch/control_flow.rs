//! JP/JR/CALL/RET (conditional and unconditional) and RST.

use crate::bus::Bus;
use crate::cpu::regs::{FLAG_C, FLAG_Z};
use crate::cpu::Cpu;

fn check_cc(cpu: &Cpu, op: u8) -> bool {
    match (op >> 3) & 0x03 {
        0 => !cpu.regs.flag(FLAG_Z), // NZ
        1 => cpu.regs.flag(FLAG_Z),  // Z
        2 => !cpu.regs.flag(FLAG_C), // NC
        3 => cpu.regs.flag(FLAG_C),  // C
        _ => unreachable!(),
    }
}

pub fn jr(cpu: &mut Cpu, offset: i8, taken: bool) -> u32 {
    if taken {
        cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
    }
    12
}

pub fn jr_cc(cpu: &mut Cpu, op: u8, offset: i8) -> u32 {
    if check_cc(cpu, op) {
        cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
        12
    } else {
        8
    }
}

pub fn jp(cpu: &mut Cpu, addr: u16, taken: bool) -> u32 {
    if taken {
        cpu.regs.pc = addr;
    }
    16
}

pub fn jp_cc(cpu: &mut Cpu, op: u8, addr: u16) -> u32 {
    if check_cc(cpu, op) {
        cpu.regs.pc = addr;
        16
    } else {
        12
    }
}

pub fn jp_hl(cpu: &mut Cpu) -> u32 {
    cpu.regs.pc = cpu.regs.hl();
    4
}

pub fn call(cpu: &mut Cpu, bus: &mut Bus, addr: u16, taken: bool) -> u32 {
    if taken {
        cpu.regs.sp = cpu.regs.sp.wrapping_sub(2);
        bus.write16(cpu.regs.sp, cpu.regs.pc);
        cpu.regs.pc = addr;
        24
    } else {
        12
    }
}

pub fn call_cc(cpu: &mut Cpu, bus: &mut Bus, op: u8, addr: u16) -> u32 {
    let taken = check_cc(cpu, op);
    call(cpu, bus, addr, taken)
}

pub fn ret(cpu: &mut Cpu, bus: &mut Bus, taken: bool) -> u32 {
    if taken {
        cpu.regs.pc = bus.read16(cpu.regs.sp);
        cpu.regs.sp = cpu.regs.sp.wrapping_add(2);
        16
    } else {
        8
    }
}

pub fn ret_cc(cpu: &mut Cpu, bus: &mut Bus, op: u8) -> u32 {
    let taken = check_cc(cpu, op);
    let cycles = ret(cpu, bus, taken);
    if taken {
        cycles + 4 // conditional RET costs 4 extra cycles over unconditional RET when taken
    } else {
        cycles
    }
}

pub fn reti(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.regs.pc = bus.read16(cpu.regs.sp);
    cpu.regs.sp = cpu.regs.sp.wrapping_add(2);
    bus.interrupts.enabled = true;
    bus.interrupts.compute_irq();
    16
}

pub fn rst(cpu: &mut Cpu, bus: &mut Bus, op: u8) -> u32 {
    let vector = (op & 0x38) as u16;
    cpu.regs.sp = cpu.regs.sp.wrapping_sub(2);
    bus.write16(cpu.regs.sp, cpu.regs.pc);
    cpu.regs.pc = vector;
    16
}
