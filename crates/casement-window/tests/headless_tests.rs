//! Headless backend scenarios. These need a working GPU driver, so they
//! are ignored by default: cargo test --test headless_tests -- --ignored

use casement_core::geometry::{Rect, Size};
use casement_window::{
    Backend, Color, GlVersion, HeadlessWindow, Window, WindowConfig, WindowError, create_window,
};

fn headless_config(width: u32, height: u32) -> WindowConfig {
    WindowConfig {
        size: Size::new(width, height),
        ..Default::default()
    }
}

#[test]
fn invalid_config_fails_before_any_gpu_work() {
    // Runs everywhere: validation rejects the config before touching wgpu.
    let result = create_window(headless_config(0, 64), Backend::Headless);
    assert!(matches!(result, Err(WindowError::ContextCreation(_))));

    let result = create_window(
        WindowConfig {
            samples: 6,
            ..headless_config(64, 64)
        },
        Backend::Headless,
    );
    assert!(matches!(result, Err(WindowError::ContextCreation(_))));
}

#[test]
#[ignore] // Requires GPU
fn create_reports_requested_size_and_resolved_version() {
    let window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    assert_eq!(window.size(), Size::new(64, 64));
    let fb = window.framebuffer().unwrap();
    assert_eq!(fb.size(), (64, 64));

    // Whatever the adapter resolved to, it is one of the documented tiers.
    let version = window.gl_version();
    assert!(version <= GlVersion::new(4, 6));
    assert!(version >= GlVersion::new(3, 3));
}

#[test]
#[ignore] // Requires GPU
fn clear_then_readback_yields_uniform_pixels() {
    let mut window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    window.bind();
    window.clear(Color::BLACK, 1.0, None);

    let pixels = window.read_pixels().expect("readback failed");
    assert_eq!(pixels.len(), 64 * 64 * 4);
    for pixel in pixels.chunks_exact(4) {
        assert_eq!(pixel, &[0, 0, 0, 255]);
    }
}

#[test]
#[ignore] // Requires GPU
fn viewport_clear_only_touches_the_region() {
    let mut window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    window.clear(Color::BLACK, 1.0, None);
    window.clear(Color::WHITE, 1.0, Some(Rect::new(0, 0, 32, 64)));

    let pixels = window.read_pixels().expect("readback failed");
    for y in 0..64usize {
        for x in 0..64usize {
            let offset = (y * 64 + x) * 4;
            let pixel = &pixels[offset..offset + 4];
            if x < 32 {
                assert_eq!(pixel, &[255, 255, 255, 255], "inside region at {},{}", x, y);
            } else {
                assert_eq!(pixel, &[0, 0, 0, 255], "outside region at {},{}", x, y);
            }
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn oversized_viewport_clear_is_clamped() {
    let mut window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    window.clear(Color::BLACK, 1.0, None);
    // Extends well past the framebuffer; must clear the in-bounds part
    // without tripping validation.
    window.clear(Color::WHITE, 1.0, Some(Rect::new(32, 0, 100, 100)));
    // Entirely outside; must be a no-op.
    window.clear(Color::WHITE, 1.0, Some(Rect::new(200, 200, 10, 10)));

    let pixels = window.read_pixels().expect("readback failed");
    for y in 0..64usize {
        for x in 0..64usize {
            let offset = (y * 64 + x) * 4;
            let pixel = &pixels[offset..offset + 4];
            if x >= 32 {
                assert_eq!(pixel, &[255, 255, 255, 255], "inside region at {},{}", x, y);
            } else {
                assert_eq!(pixel, &[0, 0, 0, 255], "outside region at {},{}", x, y);
            }
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn swap_buffers_only_advances_the_counter() {
    let mut window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    assert_eq!(window.frames(), 0);
    for _ in 0..10 {
        window.swap_buffers();
    }
    assert_eq!(window.frames(), 10);
}

#[test]
#[ignore] // Requires GPU
fn resize_recreates_the_framebuffer_at_the_new_size() {
    let mut window = match HeadlessWindow::new(headless_config(800, 600)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    window.resize(400, 300);
    assert_eq!(window.size(), Size::new(400, 300));
    assert_eq!(window.framebuffer().unwrap().size(), (400, 300));

    // The resize event is queued for the next pump.
    let batch = window.pump_events();
    assert!(
        batch
            .iter()
            .any(|e| matches!(e, casement_window::Event::Resized(size) if *size == Size::new(400, 300)))
    );
}

#[test]
#[ignore] // Requires GPU
fn destroy_is_idempotent() {
    let mut window = match HeadlessWindow::new(headless_config(64, 64)) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    window.destroy();
    assert!(window.should_close());
    window.destroy();
    window.destroy();
    assert!(window.should_close());

    // Post-destroy clears are reported, not fatal.
    window.clear(Color::BLACK, 1.0, None);
    assert!(window.read_pixels().is_err());
}

#[test]
#[ignore] // Requires GPU
fn headless_forces_display_flags_off() {
    let mut window = match HeadlessWindow::new(WindowConfig {
        vsync: true,
        cursor_visible: true,
        resizable: true,
        ..headless_config(64, 64)
    }) {
        Ok(window) => window,
        Err(e) => {
            println!("GPU not available: {}", e);
            return;
        }
    };

    let config = window.config();
    assert!(!config.vsync);
    assert!(!config.cursor_visible);
    assert!(!config.resizable);
    assert!(window.pump_events().is_empty());
}
