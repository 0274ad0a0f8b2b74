//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window runtime translates platform events into `SketchEvent`s and the
//! engine dispatches them to the matching sketch hook.

pub mod platform;

mod state;
mod types;

pub use state::InputState;
pub use types::{Key, KeyEvent, Modifier, MouseButton, PointerEvent, SketchEvent};
