//! Color model shared between the drawing facade and the backends.
//!
//! Sketches speak `ColorArg` (grayscale or multi-channel, `0..=255`).
//! Backends normalize it to their native form: straight `Rgba8` for pixmaps,
//! premultiplied `Color` for GPU vertices.

pub mod color;

pub use color::{Color, ColorArg, Rgba8, DEFAULT_BACKGROUND};
