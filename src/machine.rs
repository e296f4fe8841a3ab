/*!
`Machine`: the single synchronous state object spec.md §2/§3 describes,
owning the CPU, bus (cartridge/WRAM/HRAM/timer/interrupts/joypad), and PPU,
and exposing the top-level `tick` function the host loop drives.

`Machine` owns every buffer it references; frontend sinks are passed in by
reference at call time rather than stored, so they can hold no back-owned
machine memory (spec.md §3 "Ownership") and so `tick`'s frontend callbacks
stay synchronous and non-reentrant (spec.md §5).
*/

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::frontend::{InputKey, InputSink, KeyEvent, VideoSink};

pub struct Machine {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl Machine {
    pub fn new(cartridge: Cartridge) -> Self {
        let initial_a = cartridge.header.system_kind.initial_a();
        Self {
            cpu: Cpu::new(initial_a),
            bus: Bus::new(cartridge),
        }
    }

    /// Load and validate a ROM image, then build a `Machine` with post-boot
    /// register values synthesized for the detected system kind (spec.md
    /// §3 "Lifecycle": no boot ROM handshake is emulated).
    pub fn from_rom(rom: &[u8]) -> Result<Self, String> {
        let cartridge = Cartridge::load(rom)?;
        Ok(Self::new(cartridge))
    }

    /// Advance by one tick: PPU dot advance, then timer advance, then one
    /// CPU step (spec.md §2/§5's fixed ordering). Returns whether a frame
    /// completed on this tick, i.e. whether the caller should now call
    /// `VideoSink::blit_canvas`.
    pub fn tick(&mut self) -> bool {
        let bus = &mut self.bus;
        bus.ppu.tick(1, &mut bus.interrupts);
        bus.timer.tick(1, &mut bus.interrupts);
        self.cpu.step(bus);
        bus.ppu.take_frame_ready()
    }

    /// Apply a single input event to the joypad matrix (spec.md §6's
    /// `get_key`/joypad wiring). `Up`/`Down`/`Left`/`Right` are the D-pad
    /// line; `A`/`B`/`Select`/`Start` are the button line.
    pub fn apply_key_event(&mut self, event: KeyEvent) {
        let (mask, is_dpad) = match event.key {
            InputKey::Right => (0x01, true),
            InputKey::Left => (0x02, true),
            InputKey::Up => (0x04, true),
            InputKey::Down => (0x08, true),
            InputKey::A => (0x01, false),
            InputKey::B => (0x02, false),
            InputKey::Select => (0x04, false),
            InputKey::Start => (0x08, false),
        };
        self.bus.set_button(mask, is_dpad, event.pressed);
    }

    /// Run ticks, draining `input` each tick, until a frame completes, then
    /// call `video.blit_canvas` exactly once. This is the composition the
    /// host loop performs once per iteration; it does not live inside
    /// `tick` itself so that `Machine` stays ignorant of which sinks, if
    /// any, are wired up (spec.md §5: frontends are the host's concern).
    pub fn run_frame(&mut self, input: &mut dyn InputSink, video: &mut dyn VideoSink) {
        loop {
            if let Some(event) = input.get_key(self) {
                self.apply_key_event(event);
            }
            if self.tick() {
                video.blit_canvas(self);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{NullInput, NullVideo};
    use crate::test_utils::build_dmg_rom;

    #[test]
    fn tick_runs_a_simple_program_to_halt() {
        // LD A,0x42; LD B,0x37; ADD B; HALT (spec.md §8 scenario 1).
        let rom = build_dmg_rom(&[0x3E, 0x42, 0x06, 0x37, 0x80, 0x76]);
        let mut m = Machine::from_rom(&rom).unwrap();
        m.cpu.regs.pc = crate::test_utils::PROGRAM_START;
        for _ in 0..100 {
            m.tick();
            if m.cpu.exec.halted {
                break;
            }
        }
        assert!(m.cpu.exec.halted);
        assert_eq!(m.cpu.regs.a, 0x79);
        assert!(!m.cpu.regs.flag(crate::cpu::regs::FLAG_Z));
        assert!(!m.cpu.regs.flag(crate::cpu::regs::FLAG_C));
        assert!(!m.cpu.regs.flag(crate::cpu::regs::FLAG_H));
        assert!(!m.cpu.regs.flag(crate::cpu::regs::FLAG_N));
    }

    #[test]
    fn run_frame_blits_exactly_once_per_call() {
        let rom = build_dmg_rom(&[0x18, 0xFE]); // JR -2: spin in place forever
        let mut m = Machine::from_rom(&rom).unwrap();
        m.cpu.regs.pc = crate::test_utils::PROGRAM_START;
        m.bus.ppu.lcdc |= 0x80; // LCDC.enable
        let mut input = NullInput;
        let mut video = NullVideo;
        m.run_frame(&mut input, &mut video);
        // run_frame returns the instant the PPU enters VBLANK (LY==144,
        // mode 1) — that is the spec-correct blit point (spec.md §8
        // scenario 6), not a full 70224-dot wrap back to OAM scan.
        assert_eq!(m.bus.ppu.ly, 144);
        assert_eq!(m.bus.ppu.mode(), 1);
    }

    #[test]
    fn apply_key_event_sets_joypad_line_and_requests_interrupt() {
        let rom = build_dmg_rom(&[]);
        let mut m = Machine::from_rom(&rom).unwrap();
        m.bus.interrupts.mask = crate::interrupts::INT_JOYPAD;
        m.apply_key_event(KeyEvent {
            key: InputKey::A,
            pressed: true,
        });
        assert_eq!(m.bus.joypad.buttons & 0x01, 0x01);
        assert_eq!(m.bus.interrupts.pending & crate::interrupts::INT_JOYPAD, crate::interrupts::INT_JOYPAD);
    }
}
