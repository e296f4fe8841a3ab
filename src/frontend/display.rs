/*!
Windowed video sink backing `FrontendKind::Win32`, built on the `pixels` +
`winit` pair the teacher already depends on (feature `display`). This is
the one frontend besides `Null` that is fully wired; `LibCaca` and `Sdl2`
remain interface-level stubs (spec.md §6).
*/

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::frontend::VideoSink;
use crate::machine::Machine;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// A `VideoSink` that owns a winit window and a `pixels` surface, scaled up
/// 3x from the native 160x144 framebuffer. `init` creates the window
/// lazily on first use since `pixels`/`winit` both need a live event loop
/// to construct a surface against.
pub struct WindowedVideo {
    window: Option<Window>,
    pixels: Option<Pixels<'static>>,
}

impl Default for WindowedVideo {
    fn default() -> Self {
        Self {
            window: None,
            pixels: None,
        }
    }
}

const SCALE: u32 = 3;

impl WindowedVideo {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let size = LogicalSize::new(
            (SCREEN_WIDTH as u32) * SCALE,
            (SCREEN_HEIGHT as u32) * SCALE,
        );
        let attrs = WindowAttributes::default()
            .with_title("gb_core")
            .with_inner_size(size)
            .with_min_inner_size(size);
        let window = event_loop
            .create_window(attrs)
            .expect("failed to create window");
        let inner = window.inner_size();
        let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface_texture)
            .expect("failed to create pixels surface");
        self.window = Some(window);
        self.pixels = Some(pixels);
    }
}

impl VideoSink for WindowedVideo {
    fn init(&mut self, _machine: &Machine) -> bool {
        // The window itself is created lazily from `resumed`, since
        // constructing a surface requires a live `ActiveEventLoop`.
        true
    }

    fn finish(&mut self, _machine: &Machine) {
        self.pixels = None;
        self.window = None;
    }

    fn blit_canvas(&mut self, machine: &Machine) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };
        let frame = pixels.frame_mut();
        for (px, color) in frame
            .chunks_exact_mut(4)
            .zip(machine.bus.ppu.framebuffer.iter())
        {
            px[0] = (color >> 16) as u8;
            px[1] = (color >> 8) as u8;
            px[2] = *color as u8;
            px[3] = 0xFF;
        }
        let _ = pixels.render();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// A minimal `ApplicationHandler` that drives a `Machine` one frame per
/// `RedrawRequested`, wiring `WindowedVideo`'s lazily-created window to the
/// live event loop. This backs spec.md §6's `event_loop(state)` for
/// toolkits that require owning the main loop.
pub struct WindowedRunner {
    pub machine: Machine,
    pub video: WindowedVideo,
}

impl ApplicationHandler for WindowedRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.video.ensure_window(event_loop);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                let mut input = crate::frontend::NullInput;
                self.machine.run_frame(&mut input, &mut self.video);
            }
            _ => {}
        }
    }
}

/// Run `machine` under a windowed event loop until the window is closed.
/// Matches spec.md §6's `event_loop` entry point.
pub fn event_loop(machine: Machine) -> Result<(), String> {
    let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
    let mut runner = WindowedRunner {
        machine,
        video: WindowedVideo::new(),
    };
    event_loop
        .run_app(&mut runner)
        .map_err(|e| e.to_string())
}
