//! Presenter backends.
//!
//! A presenter turns a frame's command list into pixels. All backends share
//! the same replay interpretation (`replay`), which reduces commands to
//! device-space polygons; backends differ only in how those polygons reach a
//! surface.
//!
//! Convention:
//! - geometry is in logical pixels (top-left origin, +Y down)
//! - one logical pixel maps to one surface pixel for offscreen targets
//! - resources are created lazily and released by `teardown()`

mod bitmap;
mod chain;
mod cpu;
mod pixmap;
mod replay;
mod teardown;
mod tessellate;

pub mod gpu;

use std::fmt;
use std::str::FromStr;

use crate::error::EngineResult;
use crate::scene::Command;

pub use bitmap::BitmapPresenter;
pub use chain::{PresenterChain, PresenterFactory};
pub use cpu::CpuPresenter;
pub use gpu::GpuPresenter;
pub use pixmap::Pixmap;
pub use replay::{replay, Primitive, ReplayOutput};
pub use teardown::{release_step, TeardownLatch, TeardownReport};
pub use tessellate::Point;

/// Presenter backend identifier, in default fallback order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BackendKind {
    /// wgpu offscreen texture (optionally presented to a window surface).
    Gpu,
    /// Software rasterizer into an in-memory pixmap.
    Cpu,
    /// Last-resort writer: background, axis-aligned rects and lines only.
    Bitmap,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Gpu => "gpu",
            BackendKind::Cpu => "cpu",
            BackendKind::Bitmap => "bitmap",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpu" | "wgpu" => Ok(BackendKind::Gpu),
            "cpu" | "raster" => Ok(BackendKind::Cpu),
            "bitmap" => Ok(BackendKind::Bitmap),
            other => Err(format!("unknown backend {other:?}")),
        }
    }
}

/// What a `render()` call produced.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceInfo {
    pub backend: BackendKind,
    pub width: u32,
    pub height: u32,
    /// Commands that produced output or changed transform state.
    pub applied: usize,
    /// Unknown or malformed commands that were skipped.
    pub skipped: usize,
}

/// Common presenter interface.
///
/// Single-threaded: `render`, `present`, `resize` and `teardown` are only
/// called between sketch callbacks.
pub trait Presenter {
    fn kind(&self) -> BackendKind;

    /// Replays `commands` onto a fresh surface.
    fn render(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo>;

    /// Pushes the last rendered surface to the display. No-op offscreen.
    fn present(&mut self) -> EngineResult<()>;

    /// Requests new backing dimensions. Returns `true` only when storage was
    /// (or will lazily be) reallocated.
    fn resize(&mut self, width: u32, height: u32) -> bool;

    /// The window surface changed size (physical pixels). Offscreen backends ignore it.
    fn surface_resized(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Current backing dimensions.
    fn size(&self) -> (u32, u32);

    /// Reads back the most recent surface.
    fn capture(&mut self) -> EngineResult<Pixmap>;

    /// True once a surface has been rendered and not torn down.
    fn has_surface(&self) -> bool;

    /// Releases backend resources. Idempotent.
    fn teardown(&mut self) -> TeardownReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_round_trip() {
        for kind in [BackendKind::Gpu, BackendKind::Cpu, BackendKind::Bitmap] {
            assert_eq!(kind.name().parse::<BackendKind>(), Ok(kind));
        }
        assert!("metal".parse::<BackendKind>().is_err());
    }
}
