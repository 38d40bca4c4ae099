//! Minimal interactive consumer: a pulsing clear color, escape to quit.

use casement_core::time::FrameTime;
use casement_window::{
    App, Backend, Color, KeyCode, Mods, Window, WindowConfig, create_window, run,
};

struct PulseApp {
    quit: bool,
}

impl App for PulseApp {
    fn frame(&mut self, window: &mut dyn Window, time: &FrameTime) {
        if self.quit {
            window.close();
            return;
        }
        let g = time.elapsed_seconds().sin() * 0.5 + 0.5;
        window.bind();
        window.clear(Color::new(0.1, g, 0.3, 1.0), 1.0, None);
    }

    fn on_key_down(&mut self, key: KeyCode, _mods: Mods) {
        if key == KeyCode::Escape {
            self.quit = true;
        }
    }
}

fn main() {
    casement_core::logging::init();

    let window = create_window(
        WindowConfig {
            title: "casement clear".to_string(),
            ..Default::default()
        },
        Backend::Winit,
    )
    .expect("failed to create window");

    run(window, &mut PulseApp { quit: false });
}
