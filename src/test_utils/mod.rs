//! Shared test utilities for building minimal, header-valid DMG ROM images.
//!
//! `build_dmg_rom` produces a 32 KiB ROM_ONLY cartridge with a correct
//! Nintendo logo and header checksum, and the given bytes placed at 0x0150
//! (just past the header), so tests can exercise `Cartridge::load` and
//! `Bus` without hand-assembling a header each time. The real hardware
//! entry point at 0x0100 only has four bytes before the Nintendo logo
//! begins at 0x0104, too little room for anything but a jump, so CPU-level
//! tests that want to execute a program from the first fetch set
//! `cpu.regs.pc = 0x0150` directly after construction instead of relying on
//! boot-style entry code.

#![allow(dead_code)]

use crate::cartridge::NINTENDO_LOGO;

/// Address test programs built by `build_dmg_rom` start at.
pub const PROGRAM_START: u16 = 0x0150;

/// Build a 32 KiB, ROM_ONLY, DMG-targeted cartridge image with `program`
/// placed starting at 0x0150 and a valid logo/checksum/size header.
pub fn build_dmg_rom(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];

    rom[0x0104..0x0134].copy_from_slice(&NINTENDO_LOGO);

    let title = b"TESTROM";
    rom[0x0134..0x0134 + title.len()].copy_from_slice(title);

    rom[0x0143] = 0x00; // DMG-only
    rom[0x0146] = 0x00; // no SGB support
    rom[0x0147] = 0x00; // ROM ONLY
    rom[0x0148] = 0x00; // 32 KiB (0x8000 << 0)
    rom[0x0149] = 0x00; // no cart RAM

    let start = PROGRAM_START as usize;
    let end = (start + program.len()).min(rom.len());
    let copy_len = end - start;
    rom[start..end].copy_from_slice(&program[..copy_len]);

    fix_checksum(&mut rom);
    rom
}

/// Recompute byte 0x014D so the header checksum invariant
/// (`sum(0x134..=0x14D) + 1 per byte == 1 mod 256`) holds.
pub fn fix_checksum(rom: &mut [u8]) {
    let mut partial: u8 = 0;
    for &b in &rom[0x0134..0x014D] {
        partial = partial.wrapping_add(b).wrapping_add(1);
    }
    // Need partial + (byte + 1) == 1 (mod 256) => byte == -partial.
    rom[0x014D] = 0u8.wrapping_sub(partial);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    #[test]
    fn builder_produces_loadable_rom() {
        let rom = build_dmg_rom(&[0x3E, 0x42]); // LD A, 0x42
        let cart = Cartridge::load(&rom).expect("builder output must be valid");
        assert_eq!(cart.mbc.read_rom(0x0150), 0x3E);
        assert_eq!(cart.mbc.read_rom(0x0151), 0x42);
    }
}
