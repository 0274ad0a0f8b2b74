//! Atelier engine crate.
//!
//! Owns the rendering-command pipeline: the sequenced command buffer, the
//! frame lifecycle, the affine transform stack, the presenter backends and
//! snapshot handling. Hosts drive it either headless (`Engine::run_frames`)
//! or through the winit runtime in `window`.

pub mod canvas;
pub mod config;
pub mod core;
pub mod device;
pub mod engine;
pub mod error;
pub mod frame;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod snapshot;
pub mod time;
pub mod transform;
pub mod window;

pub use canvas::Canvas;
pub use config::{EngineConfig, RenderMode};
pub use crate::core::{FnSketch, Sketch, SketchResult};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
