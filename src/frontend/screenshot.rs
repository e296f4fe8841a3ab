/*!
Framebuffer screenshot helper, behind the `screenshot` feature. Dumps
`Ppu::framebuffer` (160x144, packed `0x00RRGGBB`) to a PNG via the `image`
crate, the teacher's existing-but-previously-unused dependency for this
exact purpose.
*/

use image::{ImageBuffer, Rgb};

use crate::machine::Machine;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Encode the current framebuffer as an RGB image and write it to `path`.
pub fn save_framebuffer_png(machine: &Machine, path: &str) -> Result<(), String> {
    let mut img = ImageBuffer::<Rgb<u8>, _>::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let color = machine.bus.ppu.framebuffer[i];
        *pixel = Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8]);
    }
    img.save(path).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_dmg_rom;

    #[test]
    fn saves_a_png_sized_to_the_screen_dimensions() {
        let machine = Machine::from_rom(&build_dmg_rom(&[])).unwrap();
        let dir = std::env::temp_dir();
        let path = dir.join("gb_core_screenshot_test.png");
        let path_str = path.to_str().unwrap();
        save_framebuffer_png(&machine, path_str).expect("save should succeed");
        let saved = image::open(path_str).expect("file should be a valid image");
        assert_eq!(saved.width(), SCREEN_WIDTH as u32);
        assert_eq!(saved.height(), SCREEN_HEIGHT as u32);
        let _ = std::fs::remove_file(path_str);
    }
}
