//! Offscreen rendering without a display: clear, read back, print stats.

use casement_core::geometry::Size;
use casement_window::{Color, HeadlessWindow, Window, WindowConfig};

fn main() {
    casement_core::logging::init();

    let mut window = HeadlessWindow::new(WindowConfig {
        size: Size::new(256, 256),
        title: "headless clear".to_string(),
        ..Default::default()
    })
    .expect("failed to create headless window");

    window.bind();
    window.clear(Color::new(0.2, 0.4, 0.8, 1.0), 1.0, None);
    window.swap_buffers();

    let pixels = window.read_pixels().expect("readback failed");
    let center = (128 * 256 + 128) * 4;
    println!(
        "rendered {} frame(s) at {:?}, center pixel rgba = {:?}",
        window.frames(),
        window.size(),
        &pixels[center..center + 4]
    );

    window.destroy();
}
