//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and drives an `Engine` from it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
