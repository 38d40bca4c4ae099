//! The render-loop driver.
//!
//! Drives the per-frame cycle against any backend: pump and dispatch
//! events, invoke the consumer's frame callback, swap. Per-frame anomalies
//! are recovered locally; the closing flag is the only path to shutdown,
//! and the driver finishes with exactly one `destroy()`.

use casement_core::time::TimeTracker;

use crate::app::{App, dispatch_event};
use crate::events::Event;
use crate::window::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Closing,
    Stopped,
}

/// Run the per-frame cycle until the window closes, then destroy it.
///
/// Each Running iteration: pump native events and dispatch every produced
/// normalized event to the app, in order, before anything else; then invoke
/// the frame callback; then swap. The ordering guarantee consumers rely on
/// is that all of a frame's events are delivered before that frame's
/// render callback runs.
pub fn run(mut window: Box<dyn Window>, app: &mut dyn App) {
    let mut tracker = TimeTracker::new();
    let mut state = LoopState::Running;

    tracing::debug!(backend = window.backend_name(), "entering render loop");

    while state == LoopState::Running {
        let batch = window.pump_events();
        for event in batch.iter() {
            if matches!(event, Event::CloseRequested) {
                if app.on_close_request() {
                    window.close();
                }
                continue;
            }
            dispatch_event(app, event);
        }

        if window.should_close() {
            state = LoopState::Closing;
            break;
        }

        let time = tracker.tick();
        app.frame(window.as_mut(), &time);
        window.swap_buffers();

        if window.should_close() {
            state = LoopState::Closing;
        }
    }

    // Closing -> Stopped after one final destroy.
    window.destroy();
    state = LoopState::Stopped;

    tracing::debug!(?state, frames = window.frames(), "render loop stopped");
}
