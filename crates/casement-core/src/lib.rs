//! Casement Core
//!
//! Shared primitives for the Casement windowing abstraction: geometry
//! types, frame timing and logging setup.

pub mod geometry;
pub mod logging;
pub mod time;

pub use geometry::{Pos, Rect, Size};
pub use time::{FrameTime, TimeTracker};
