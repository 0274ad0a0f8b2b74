use crate::error::{EngineError, EngineResult};
use crate::scene::Command;

use super::pixmap::Pixmap;
use super::replay::{replay, Primitive};
use super::teardown::{TeardownLatch, TeardownReport};
use super::{BackendKind, Presenter, SurfaceInfo};

/// Software rasterizer presenter.
///
/// Renders into an in-memory `Pixmap` allocated on first use and kept until
/// a resize, so each frame paints over the previous one. Used headless and
/// as the fallback when the GPU backend is unavailable.
#[derive(Debug)]
pub struct CpuPresenter {
    width: u32,
    height: u32,
    surface: Option<Pixmap>,
    latch: TeardownLatch,
}

impl CpuPresenter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            surface: None,
            latch: TeardownLatch::default(),
        }
    }

    /// Renders `commands` into a standalone pixmap.
    pub fn rasterize(width: u32, height: u32, commands: &[Command]) -> (Pixmap, SurfaceInfo) {
        let mut pixmap = Pixmap::new(width, height);
        let info = Self::paint(&mut pixmap, commands);
        (pixmap, info)
    }

    fn paint(pixmap: &mut Pixmap, commands: &[Command]) -> SurfaceInfo {
        let out = replay(commands);
        for prim in &out.primitives {
            match prim {
                Primitive::Clear(c) => pixmap.fill(*c),
                Primitive::Polygon { points, color } => pixmap.fill_polygon(points, *color),
            }
        }
        SurfaceInfo {
            backend: BackendKind::Cpu,
            width: pixmap.width(),
            height: pixmap.height(),
            applied: out.applied,
            skipped: out.skipped,
        }
    }
}

impl Presenter for CpuPresenter {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn render(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo> {
        let (width, height) = (self.width, self.height);
        let pixmap = self.surface.get_or_insert_with(|| Pixmap::new(width, height));
        let info = Self::paint(pixmap, commands);
        self.latch.rearm();
        Ok(info)
    }

    fn present(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.surface = None;
        true
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&mut self) -> EngineResult<Pixmap> {
        self.surface
            .clone()
            .ok_or_else(|| EngineError::backend(BackendKind::Cpu, "nothing rendered yet"))
    }

    fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if !self.latch.begin() {
            return report;
        }
        let surface = &mut self.surface;
        report.step("pixmap", || {
            surface.take();
            Ok(())
        });
        report
    }
}
