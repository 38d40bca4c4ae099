//! Casement: a backend-agnostic window and graphics context abstraction.
//!
//! One window contract, concrete backends behind it. Rendering code
//! programs against [`Window`] and [`App`] and runs unmodified on the
//! headless offscreen backend or the interactive winit backend; which one
//! is active is a configuration choice made once at startup.
//!
//! # Example
//!
//! ```no_run
//! use casement_window::{App, Backend, Color, WindowConfig, Window, create_window, run};
//! use casement_core::time::FrameTime;
//!
//! struct ClearApp;
//!
//! impl App for ClearApp {
//!     fn frame(&mut self, window: &mut dyn Window, time: &FrameTime) {
//!         let g = (time.elapsed_seconds().sin() * 0.5 + 0.5).clamp(0.0, 1.0);
//!         window.clear(Color::new(0.0, g, 0.2, 1.0), 1.0, None);
//!     }
//! }
//!
//! let window = create_window(WindowConfig::default(), Backend::Winit)
//!     .expect("failed to create window");
//! run(window, &mut ClearApp);
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod headless;
pub mod keys;
pub mod readback;
pub mod run;
pub mod target;
pub mod window;
pub mod winit_backend;

pub use app::App;
pub use config::{FALLBACK_VERSIONS, GlVersion, WindowConfig};
pub use context::GraphicsContext;
pub use error::WindowError;
pub use events::{Event, EventBatch, EventQueue};
pub use headless::HeadlessWindow;
pub use keys::{KeyCode, Mods, MouseButton};
pub use readback::{Readback, ReadbackError};
pub use run::run;
pub use target::{COLOR_FORMAT, Color, DEPTH_FORMAT, Framebuffer, FramebufferBuilder};
pub use window::{Backend, Window, create_window};
pub use winit_backend::WinitWindow;

// Re-export the core crate's primitives consumers need at the API surface.
pub use casement_core::geometry::{Pos, Rect, Size};
pub use casement_core::time::FrameTime;
