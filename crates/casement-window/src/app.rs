//! The consumer-facing callback surface.

use std::path::Path;

use casement_core::geometry::Size;
use casement_core::time::FrameTime;
use glam::Vec2;

use crate::events::Event;
use crate::keys::{KeyCode, Mods, MouseButton};
use crate::window::Window;

/// What render code implements against.
///
/// Only [`frame`](App::frame) is required; the event handlers default to
/// no-ops so consumers override just the variants they care about. All
/// events of a frame are dispatched, in order, before that frame's
/// `frame()` call.
#[allow(unused_variables)]
pub trait App {
    /// Called once per frame with the current window and timing. Elapsed
    /// and delta time come from a monotonic clock; delta is never negative.
    fn frame(&mut self, window: &mut dyn Window, time: &FrameTime);

    fn on_key_down(&mut self, key: KeyCode, mods: Mods) {}

    fn on_key_up(&mut self, key: KeyCode, mods: Mods) {}

    fn on_mouse_move(&mut self, pos: Vec2) {}

    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool, pos: Vec2) {}

    fn on_scroll(&mut self, delta: Vec2) {}

    /// The default framebuffer already has the new size when this fires.
    fn on_resize(&mut self, size: Size<u32>) {}

    fn on_focus(&mut self, focused: bool) {}

    fn on_char(&mut self, ch: char) {}

    fn on_text(&mut self, text: &str) {}

    fn on_file_drop(&mut self, path: &Path) {}

    /// Return `false` to veto a native close request.
    fn on_close_request(&mut self) -> bool {
        true
    }
}

/// Route one normalized event to the matching handler.
///
/// Close requests are not routed here; the driver consults
/// [`App::on_close_request`] and sets the window's closing flag itself.
pub(crate) fn dispatch_event(app: &mut dyn App, event: &Event) {
    match event {
        Event::KeyDown { key, mods } => app.on_key_down(*key, *mods),
        Event::KeyUp { key, mods } => app.on_key_up(*key, *mods),
        Event::MouseMove(pos) => app.on_mouse_move(*pos),
        Event::MouseButtonDown { button, pos } => app.on_mouse_button(*button, true, *pos),
        Event::MouseButtonUp { button, pos } => app.on_mouse_button(*button, false, *pos),
        Event::MouseScroll(delta) => app.on_scroll(*delta),
        Event::Resized(size) => app.on_resize(*size),
        Event::Focused(focused) => app.on_focus(*focused),
        Event::Char(ch) => app.on_char(*ch),
        Event::TextInput(text) => app.on_text(text),
        Event::FileDrop(path) => app.on_file_drop(path),
        Event::CloseRequested => {}
    }
}
