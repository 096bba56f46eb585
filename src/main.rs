//! Demo driver binary for the 8080/Space Invaders core.
//!
//! Without the `display` feature this runs headless, printing periodic
//! register/frame diagnostics to stdout. With `display` enabled it opens a
//! window, decodes the framebuffer each frame, and forwards key events.

use invaders::bus::Bus;
use invaders::loader;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <rom-path> [--cpm]", args.first().map(String::as_str).unwrap_or("invaders"));
        std::process::exit(1);
    }

    let rom_path = &args[1];
    let cpm_mode = args.iter().skip(2).any(|a| a == "--cpm");

    let rom_bytes = loader::load_rom_file(rom_path).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let mut bus = Bus::new();
    bus.load_at(&rom_bytes, 0x0000);
    if cpm_mode {
        loader::apply_cpm_patch(&mut bus);
        println!("applied CP/M diagnostics patch");
    }

    #[cfg(feature = "display")]
    display::run(bus);
    #[cfg(not(feature = "display"))]
    run_headless(bus);
}

#[cfg(not(feature = "display"))]
fn run_headless(mut bus: Bus) {
    let mut frame: u64 = 0;
    loop {
        bus.run_frame();
        frame += 1;
        if frame % 60 == 0 {
            println!(
                "frame {frame}: pc={:#06x} a={:#04x} sp={:#06x}",
                bus.cpu.pc, bus.cpu.a, bus.cpu.sp
            );
        }
    }
}

#[cfg(feature = "display")]
mod display {
    use std::num::NonZeroU32;
    use std::sync::Arc;

    use pixels::{Pixels, SurfaceTexture};
    use winit::application::ApplicationHandler;
    use winit::event::{ElementState, WindowEvent};
    use winit::event_loop::{ActiveEventLoop, EventLoop};
    use winit::keyboard::{KeyCode, PhysicalKey};
    use winit::window::{Window, WindowId};

    use invaders::bus::Bus;
    use invaders::io::{P1_COIN, P1_FIRE, P1_LEFT, P1_RIGHT, P1_START};

    const SCREEN_WIDTH: u32 = 256;
    const SCREEN_HEIGHT: u32 = 224;

    pub fn run(bus: Bus) {
        let event_loop = EventLoop::new().expect("failed to create event loop");
        let mut app = App { bus, window: None, pixels: None };
        event_loop.run_app(&mut app).expect("event loop exited with an error");
    }

    struct App {
        bus: Bus,
        window: Option<Arc<Window>>,
        pixels: Option<Pixels<'static>>,
    }

    impl App {
        fn draw(&mut self) {
            let Some(pixels) = self.pixels.as_mut() else { return };
            let frame = pixels.frame_mut();
            // Video RAM is 224 columns x 256 rows, column-major, 1 bit per
            // pixel; the cabinet screen is mounted rotated, so column x /
            // row y in VRAM lands at screen column y, screen row x here.
            for (offset, byte) in self.bus.framebuffer().iter().enumerate() {
                let x = offset / 32;
                let y_base = offset % 32;
                for bit in 0..8u32 {
                    let lit = (byte >> bit) & 1 != 0;
                    let y = 255 - (y_base as u32 * 8 + bit);
                    let screen_x = y;
                    let screen_y = x as u32;
                    if screen_x >= SCREEN_WIDTH || screen_y >= SCREEN_HEIGHT {
                        continue;
                    }
                    let pixel_index = ((screen_y * SCREEN_WIDTH + screen_x) * 4) as usize;
                    let value = if lit { 0xFF } else { 0x00 };
                    frame[pixel_index..pixel_index + 4].copy_from_slice(&[value, value, value, 0xFF]);
                }
            }
        }

        fn handle_key(&mut self, code: KeyCode, pressed: bool) {
            let mask = match code {
                KeyCode::ArrowLeft => P1_LEFT,
                KeyCode::ArrowRight => P1_RIGHT,
                KeyCode::Space => P1_FIRE,
                KeyCode::Digit1 => P1_START,
                KeyCode::Digit5 => P1_COIN,
                _ => return,
            };
            self.bus.set_key(mask, pressed);
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            let attrs = Window::default_attributes()
                .with_title("Space Invaders")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    SCREEN_WIDTH as f64,
                    SCREEN_HEIGHT as f64,
                ));
            let window = Arc::new(
                event_loop
                    .create_window(attrs)
                    .expect("failed to create window"),
            );
            let size = window.inner_size();
            let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
            let pixels = Pixels::new(SCREEN_WIDTH, SCREEN_HEIGHT, surface_texture)
                .expect("failed to create pixel surface");
            self.window = Some(window);
            self.pixels = Some(pixels);
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => {
                    if let (Some(pixels), Some(width), Some(height)) = (
                        self.pixels.as_mut(),
                        NonZeroU32::new(size.width),
                        NonZeroU32::new(size.height),
                    ) {
                        let _ = pixels.resize_surface(width.get(), height.get());
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(code, event.state == ElementState::Pressed);
                    }
                }
                WindowEvent::RedrawRequested => {
                    self.bus.run_frame();
                    self.draw();
                    if let Some(pixels) = self.pixels.as_ref() {
                        let _ = pixels.render();
                    }
                    if let Some(window) = self.window.as_ref() {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        }
    }
}
