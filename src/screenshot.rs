//! Optional PNG screenshot capture, gated behind the `screenshot` feature.
//! Decodes the video RAM window the same way the `display` feature's
//! renderer does, so a screenshot matches what the windowed build shows.

use image::{GrayImage, Luma};

use crate::bus::Bus;

const SCREEN_WIDTH: u32 = 256;
const SCREEN_HEIGHT: u32 = 224;

/// Renders the current framebuffer to a grayscale PNG at `path`.
pub fn save_framebuffer_png<P: AsRef<std::path::Path>>(
    bus: &Bus,
    path: P,
) -> Result<(), String> {
    let mut image = GrayImage::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    for (offset, byte) in bus.framebuffer().iter().enumerate() {
        let x = (offset / 32) as u32;
        let y_base = (offset % 32) as u32;
        for bit in 0..8u32 {
            let lit = (byte >> bit) & 1 != 0;
            let y = 255 - (y_base * 8 + bit);
            let (screen_x, screen_y) = (y, x);
            if screen_x >= SCREEN_WIDTH || screen_y >= SCREEN_HEIGHT {
                continue;
            }
            image.put_pixel(screen_x, screen_y, Luma([if lit { 255 } else { 0 }]));
        }
    }

    image
        .save(path.as_ref())
        .map_err(|err| format!("failed to write screenshot {}: {err}", path.as_ref().display()))
}
