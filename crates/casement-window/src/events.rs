//! The normalized event model.
//!
//! Backends translate native occurrences into [`Event`] values carrying
//! only backend-independent fields. Events are transient: queued during a
//! pump in native order, drained once, dispatched synchronously, discarded.

use std::collections::VecDeque;
use std::path::PathBuf;

use casement_core::geometry::Size;
use glam::Vec2;

use crate::keys::{KeyCode, Mods, MouseButton};

/// A backend-independent window or input occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyDown { key: KeyCode, mods: Mods },
    KeyUp { key: KeyCode, mods: Mods },
    /// Cursor moved, position in pixels.
    MouseMove(Vec2),
    MouseButtonDown { button: MouseButton, pos: Vec2 },
    MouseButtonUp { button: MouseButton, pos: Vec2 },
    /// Scroll delta; line-based scrolling is converted to pixels.
    MouseScroll(Vec2),
    /// Drawable resized; the default framebuffer has already been rebuilt
    /// at this size when the event is observed.
    Resized(Size<u32>),
    CloseRequested,
    Focused(bool),
    /// A single translated character of text input.
    Char(char),
    /// A committed chunk of text input.
    TextInput(String),
    FileDrop(PathBuf),
}

/// Counters kept by the queue, mostly for diagnostics.
#[derive(Default, Debug, Clone)]
pub struct EventStats {
    pub events_received: usize,
    pub events_processed: usize,
}

/// Per-window event queue.
///
/// Strictly FIFO: `drain()` yields events in exactly the order the backend
/// pushed them. Nothing is reordered, coalesced or silently dropped, so
/// consumers can replay a frame's input faithfully.
pub struct EventQueue {
    pending: VecDeque<Event>,
    stats: EventStats,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(64),
            stats: EventStats::default(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.stats.events_received += 1;
        self.pending.push_back(event);
    }

    /// Drain everything queued since the last pump into one frame batch.
    pub fn drain(&mut self) -> EventBatch {
        let events: Vec<Event> = self.pending.drain(..).collect();
        self.stats.events_processed += events.len();
        EventBatch { events }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The events of one frame, delivered before that frame's render callback.
#[derive(Debug, Default)]
pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_native_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::KeyDown {
            key: KeyCode::A,
            mods: Mods::empty(),
        });
        queue.push(Event::Focused(false));
        queue.push(Event::CloseRequested);

        let batch = queue.drain();
        let events: Vec<_> = batch.iter().collect();
        assert!(matches!(events[0], Event::KeyDown { .. }));
        assert_eq!(events[1], &Event::Focused(false));
        assert_eq!(events[2], &Event::CloseRequested);
    }

    #[test]
    fn intermediate_mouse_moves_are_kept() {
        let mut queue = EventQueue::new();
        queue.push(Event::MouseMove(Vec2::new(1.0, 1.0)));
        queue.push(Event::KeyDown {
            key: KeyCode::A,
            mods: Mods::empty(),
        });
        queue.push(Event::MouseMove(Vec2::new(2.0, 2.0)));

        let batch = queue.drain();
        let events: Vec<_> = batch.iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], &Event::MouseMove(Vec2::new(1.0, 1.0)));
        assert_eq!(events[2], &Event::MouseMove(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut queue = EventQueue::new();
        queue.push(Event::Focused(true));
        assert!(!queue.is_empty());

        let batch = queue.drain();
        assert_eq!(batch.len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn stats_count_received_events() {
        let mut queue = EventQueue::new();
        queue.push(Event::Char('x'));
        queue.push(Event::Char('y'));
        queue.drain();
        assert_eq!(queue.stats().events_received, 2);
        assert_eq!(queue.stats().events_processed, 2);
    }
}
