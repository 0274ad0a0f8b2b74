//! Core sketch-facing contracts.
//!
//! This module defines the stable interface between the engine (frame
//! lifecycle, presenters) and user code. Callbacks receive an explicit
//! `Canvas` instead of reaching for global state, and every invocation runs
//! contained so a failing callback never takes the engine down.

mod contain;
mod sketch;

pub use contain::run_contained;
pub use sketch::{FnSketch, Sketch, SketchResult};
