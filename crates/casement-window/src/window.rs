//! The window contract every backend implements.

use casement_core::geometry::{Rect, Size};

use crate::config::{GlVersion, WindowConfig};
use crate::error::WindowError;
use crate::events::EventBatch;
use crate::target::Color;

/// Backend selection, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Offscreen context with no display, no input and no presentation.
    Headless,
    /// Interactive winit window.
    Winit,
}

/// The operations every backend provides and the semantics consumers may
/// rely on regardless of which backend is active.
///
/// Consumers hold `Box<dyn Window>` only; the concrete backend type never
/// leaks past [`create_window`]. A window owns exactly one native context
/// and one default render target for its whole lifetime. All methods are
/// single-threaded: the thread that created the window drives it.
pub trait Window {
    /// Short backend identifier for logs.
    fn backend_name(&self) -> &'static str;

    /// The configuration the window was created from, as resolved.
    fn config(&self) -> &WindowConfig;

    /// Current drawable size. Always equals the default framebuffer's
    /// attachment dimensions.
    fn size(&self) -> Size<u32>;

    /// The context version tier actually created, after fallback.
    fn gl_version(&self) -> GlVersion;

    /// Completed presents. Increments by exactly one per
    /// [`swap_buffers`](Window::swap_buffers) call, on every backend.
    fn frames(&self) -> u64;

    fn is_focused(&self) -> bool;

    /// Make the default framebuffer the active render target again.
    ///
    /// Side effect only; callable at any time between creation and
    /// [`destroy`](Window::destroy).
    fn bind(&mut self);

    /// Clear the default framebuffer's color and depth planes, optionally
    /// restricted to a sub-region.
    ///
    /// Clearing a destroyed window is a programmer error: it is reported
    /// through the log and does nothing else.
    fn clear(&mut self, color: Color, depth: f32, viewport: Option<Rect<u32>>);

    /// Present the rendered contents and advance the frame counter. The
    /// headless backend only advances the counter; there is nothing to
    /// present.
    fn swap_buffers(&mut self);

    /// Recreate the default framebuffer at the new size and queue a
    /// [`Event::Resized`](crate::events::Event::Resized) so consumers see
    /// the resize before the next frame callback.
    fn resize(&mut self, width: u32, height: u32);

    /// Collect pending native events, translated into normalized events,
    /// in native-reported order.
    fn pump_events(&mut self) -> EventBatch;

    /// True once the closing flag is set. Monotonic: never reverts.
    fn should_close(&self) -> bool;

    /// Set the closing flag. One-way; there is no reopen.
    fn close(&mut self);

    /// Release the native context and framebuffer. Idempotent: further
    /// calls are no-ops.
    fn destroy(&mut self);
}

/// Create a window on the selected backend.
///
/// Fails with [`WindowError::ContextCreation`] when the requested version
/// or sample count cannot be satisfied, or with
/// [`WindowError::DisplayUnavailable`] when the interactive backend cannot
/// reach a display. No other error kinds escape.
pub fn create_window(
    config: WindowConfig,
    backend: Backend,
) -> Result<Box<dyn Window>, WindowError> {
    match backend {
        Backend::Headless => Ok(Box::new(crate::headless::HeadlessWindow::new(config)?)),
        Backend::Winit => Ok(Box::new(crate::winit_backend::WinitWindow::new(config)?)),
    }
}
