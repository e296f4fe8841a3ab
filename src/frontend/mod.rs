/*!
Frontend plug surface: the three pluggable sinks (input, video, audio) plus
the `FrontendKind` selector, mirroring `frontend.h`'s `frontend_input_t` /
`frontend_video_t` / `frontend_audio_t` function-pointer records and the
`frontend_type` enum. The reference implementation passes `emu_state`
through every callback; here each sink method takes `&Machine` (video,
audio) or `&mut Machine` (input, to drain the joypad event queue) instead
of a void-pointer-plus-global.

A null implementation of each sink is provided and is the only one
required for this crate to build and run. A concrete windowed sink lives
in `display` behind the `display` feature (the `pixels`/`winit` pair the
teacher already depends on); `LibCaca` and `Sdl2` remain named-but-stub
variants, matching spec.md's "specified only at the interface level"
scoping for frontends.
*/

#[cfg(feature = "display")]
pub mod display;

#[cfg(feature = "screenshot")]
pub mod screenshot;

use crate::machine::Machine;

/// One joypad key, independent of DMG/SGB/CGB physical layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

/// A single input event: which key, and whether it was just pressed or
/// released. Mirrors `frontend_input_return_t`'s `{key, press}` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: InputKey,
    pub pressed: bool,
}

/// `frontend_input_t`: `init`/`finish`/`get_key`.
pub trait InputSink {
    fn init(&mut self, machine: &Machine) -> bool;
    fn finish(&mut self, machine: &Machine);
    /// Drain and return the next queued key event, if any. Called once per
    /// `Machine::tick`; must return promptly and must not re-enter `tick`.
    fn get_key(&mut self, machine: &Machine) -> Option<KeyEvent>;
}

/// `frontend_video_t`: `init`/`finish`/`blit_canvas`.
pub trait VideoSink {
    fn init(&mut self, machine: &Machine) -> bool;
    fn finish(&mut self, machine: &Machine);
    /// Present `machine.ppu.framebuffer`. Called exactly once per frame,
    /// synchronously, when the PPU's mode machine enters VBLANK.
    fn blit_canvas(&mut self, machine: &Machine);
}

/// `frontend_audio_t`: `init`/`finish`/`output_sample`. Audio synthesis
/// itself is out of scope (spec.md §1); this trait exists so a frontend
/// triple is always a matched set of three sinks, per the reference
/// implementation's `frontend_t`.
pub trait AudioSink {
    fn init(&mut self, machine: &Machine) -> bool;
    fn finish(&mut self, machine: &Machine);
    fn output_sample(&mut self, machine: &Machine);
}

/// Mirrors `frontend_type` (`FRONT_NULL`/`FRONT_LIBCACA`/`FRONT_WIN32`/
/// `FRONT_SDL2`). This crate must compile and run with only `Null`
/// selectable; the others are named per spec.md §6 but only `Win32`
/// (behind `display`) backs a working implementation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FrontendKind {
    #[default]
    Null,
    LibCaca,
    Win32,
    Sdl2,
}

/// No-op input sink: never reports a key.
#[derive(Default)]
pub struct NullInput;

impl InputSink for NullInput {
    fn init(&mut self, _machine: &Machine) -> bool {
        true
    }
    fn finish(&mut self, _machine: &Machine) {}
    fn get_key(&mut self, _machine: &Machine) -> Option<KeyEvent> {
        None
    }
}

/// No-op video sink: discards every frame.
#[derive(Default)]
pub struct NullVideo;

impl VideoSink for NullVideo {
    fn init(&mut self, _machine: &Machine) -> bool {
        true
    }
    fn finish(&mut self, _machine: &Machine) {}
    fn blit_canvas(&mut self, _machine: &Machine) {}
}

/// No-op audio sink: discards every sample.
#[derive(Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn init(&mut self, _machine: &Machine) -> bool {
        true
    }
    fn finish(&mut self, _machine: &Machine) {}
    fn output_sample(&mut self, _machine: &Machine) {}
}

/// Construct `(input, not built with this feature errors for LibCaca/Sdl2)`
/// style stub results for frontend kinds this crate doesn't implement,
/// matching spec.md §6's "null implementation is provided for each role"
/// plus an explicit error for the named-but-unbuilt kinds.
pub fn unsupported_frontend(kind: FrontendKind) -> Result<(), String> {
    match kind {
        FrontendKind::Null => Ok(()),
        FrontendKind::Win32 if cfg!(feature = "display") => Ok(()),
        other => Err(format!(
            "frontend {other:?} is not built with this feature set"
        )),
    }
}
