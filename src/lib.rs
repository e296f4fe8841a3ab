#![doc = r#"
Game Boy (DMG/SGB/CGB) emulator core.

This crate implements the coupled CPU/memory-map/PPU subsystem described in
the project specification: the Sharp LR35902 fetch-decode-execute loop and
interrupt controller, the guest address-space dispatcher, and the PPU's
four-state mode machine. Audio synthesis, frontend I/O, CLI parsing, and
save-state persistence are out of scope for the core; the `frontend` module
exposes the three pluggable sink traits (`InputSink`/`VideoSink`/
`AudioSink`) those concerns plug into.

Modules:
- `cartridge`: ROM header validation, system-kind detection, the `Mbc`
  trait and its `RomOnly` implementation.
- `interrupts`: IME/IE/IF state and the derived IRQ mask.
- `timer`: DIV/TIMA/TMA/TAC.
- `bus`: the guest address-space dispatcher; owns the cartridge, WRAM,
  HRAM, PPU, timer, interrupt controller, and joypad.
- `ppu`: the LCD controller mode machine, background rendering, OAM, and
  the CGB palette/VRAM-bank/HDMA extensions.
- `cpu`: the register file, execution-control state, and the opcode
  decoder/executor (primary + CB-prefixed tables).
- `machine`: `Machine`, the top-level owned state object and `tick` loop.
- `frontend`: the pluggable sink traits, null implementations, and (under
  the `display` feature) a windowed `pixels`/`winit` video sink.

In tests, shared ROM builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod frontend;
pub mod interrupts;
pub mod machine;
pub mod ppu;
pub mod timer;

pub use bus::Bus;
pub use cartridge::Cartridge;
pub use cpu::Cpu;
pub use machine::Machine;

#[cfg(test)]
pub mod test_utils;
