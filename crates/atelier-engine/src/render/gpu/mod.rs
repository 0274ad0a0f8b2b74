//! wgpu presenter.
//!
//! Frames are rendered into an offscreen `Rgba8Unorm` texture (created lazily
//! at the canvas size) so captures read back exactly what was composited.
//! The texture is cleared only when first allocated; later frames draw over
//! it. Windowed hosts copy it onto the window surface in `present()`.

mod pipeline;

use std::panic::{catch_unwind, AssertUnwindSafe};

use winit::window::Window;

use crate::device::{GpuContext, GpuInit, PresentAction};
use crate::error::{EngineError, EngineResult};
use crate::paint::{Color, Rgba8};
use crate::scene::Command;

use super::replay::{replay, Primitive};
use super::teardown::{TeardownLatch, TeardownReport};
use super::tessellate;
use super::{BackendKind, Pixmap, Presenter, SurfaceInfo};

use pipeline::{BlitPipeline, FillPipeline, FillVertex};

const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct Offscreen {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// GPU-accelerated presenter.
pub struct GpuPresenter<'w> {
    ctx: Option<GpuContext<'w>>,
    width: u32,
    height: u32,

    target: Option<Offscreen>,
    offscreen_pipeline: Option<FillPipeline>,
    surface_pipeline: Option<BlitPipeline>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    vertex_count: u32,

    rendered: bool,
    latch: TeardownLatch,
}

impl<'w> GpuPresenter<'w> {
    /// Offscreen-only presenter.
    pub fn headless(width: u32, height: u32, init: &GpuInit) -> EngineResult<Self> {
        let ctx = pollster::block_on(GpuContext::headless(init))
            .map_err(|e| EngineError::backend(BackendKind::Gpu, format!("{e:#}")))?;
        Ok(Self::from_context(ctx, width, height))
    }

    /// Presenter that also pushes frames to `window`.
    pub fn for_window(window: &'w Window, width: u32, height: u32, init: &GpuInit) -> EngineResult<Self> {
        let ctx = pollster::block_on(GpuContext::for_window(window, init))
            .map_err(|e| EngineError::backend(BackendKind::Gpu, format!("{e:#}")))?;
        Ok(Self::from_context(ctx, width, height))
    }

    fn from_context(ctx: GpuContext<'w>, width: u32, height: u32) -> Self {
        let info = ctx.adapter_info();
        log::info!("gpu adapter: {} ({:?})", info.name, info.backend);
        Self {
            ctx: Some(ctx),
            width: width.max(1),
            height: height.max(1),
            target: None,
            offscreen_pipeline: None,
            surface_pipeline: None,
            vbo: None,
            vbo_capacity: 0,
            vertex_count: 0,
            rendered: false,
            latch: TeardownLatch::default(),
        }
    }

    fn ctx(&self) -> EngineResult<&GpuContext<'w>> {
        self.ctx
            .as_ref()
            .ok_or_else(|| EngineError::backend(BackendKind::Gpu, "device released"))
    }

    fn render_inner(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo> {
        let out = replay(commands);
        let vertices = build_vertices(&out.primitives, self.width, self.height);

        self.ensure_target()?;
        self.upload(&vertices)?;

        if self.offscreen_pipeline.is_none() {
            let pipeline = FillPipeline::new(self.ctx()?.device(), OFFSCREEN_FORMAT);
            self.offscreen_pipeline = Some(pipeline);
        }

        let ctx = self.ctx()?;
        let device = ctx.device();
        let queue = ctx.queue();
        let (Some(pipeline), Some(target)) = (self.offscreen_pipeline.as_ref(), self.target.as_ref())
        else {
            return Err(EngineError::backend(BackendKind::Gpu, "offscreen target missing"));
        };

        pipeline.write_viewport(queue, self.width, self.height);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("atelier offscreen encoder"),
        });
        let fresh = !self.rendered;
        pipeline.draw(&mut encoder, &target.view, fresh, self.vbo.as_ref(), self.vertex_count);
        queue.submit(std::iter::once(encoder.finish()));

        self.rendered = true;
        Ok(SurfaceInfo {
            backend: BackendKind::Gpu,
            width: self.width,
            height: self.height,
            applied: out.applied,
            skipped: out.skipped,
        })
    }

    fn ensure_target(&mut self) -> EngineResult<()> {
        if self.target.is_some() {
            return Ok(());
        }
        let device = self.ctx()?.device();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("atelier offscreen target"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("allocated {}x{} offscreen target", self.width, self.height);
        self.target = Some(Offscreen { texture, view });
        Ok(())
    }

    fn upload(&mut self, vertices: &[FillVertex]) -> EngineResult<()> {
        self.vertex_count = vertices.len() as u32;
        if vertices.is_empty() {
            return Ok(());
        }

        if vertices.len() > self.vbo_capacity || self.vbo.is_none() {
            let new_cap = vertices.len().next_power_of_two().max(256);
            let buffer = self.ctx()?.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("atelier fill vbo"),
                size: (new_cap * std::mem::size_of::<FillVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            if let Some(old) = self.vbo.replace(buffer) {
                old.destroy();
            }
            self.vbo_capacity = new_cap;
        }

        let ctx = self.ctx()?;
        if let Some(vbo) = self.vbo.as_ref() {
            ctx.queue().write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
        }
        Ok(())
    }

    fn present_inner(&mut self) -> EngineResult<()> {
        let Some(ctx) = self.ctx.as_ref() else { return Ok(()) };
        let Some(surface) = ctx.surface() else { return Ok(()) };
        let Some(target) = self.target.as_ref().filter(|_| self.rendered) else {
            return Ok(());
        };

        let format = surface.format();
        if self.surface_pipeline.as_ref().is_none_or(|p| p.format() != format) {
            self.surface_pipeline = Some(BlitPipeline::new(ctx.device(), format));
        }
        let Some(pipeline) = self.surface_pipeline.as_ref() else { return Ok(()) };

        let frame = match surface.acquire() {
            Ok(f) => f,
            Err(err) => {
                return match surface.recover(ctx.device(), err) {
                    PresentAction::Abandon => {
                        Err(EngineError::backend(BackendKind::Gpu, "surface out of memory"))
                    }
                    action => {
                        log::debug!("skipping present: {action:?}");
                        Ok(())
                    }
                };
            }
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("atelier present encoder"),
        });

        // The canvas stretches to the surface; the window tracks the canvas size.
        pipeline.draw(ctx.device(), &mut encoder, &target.view, &view);

        ctx.queue().submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn readback(&self) -> EngineResult<Pixmap> {
        let ctx = self.ctx()?;
        let target = self
            .target
            .as_ref()
            .filter(|_| self.rendered)
            .ok_or_else(|| EngineError::backend(BackendKind::Gpu, "nothing rendered yet"))?;

        let (width, height) = (self.width, self.height);
        let unpadded = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let device = ctx.device();
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("atelier readback"),
            size: padded as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("atelier readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue().submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::wait_indefinitely());

        let mapped = rx
            .recv()
            .map_err(|e| EngineError::backend(BackendKind::Gpu, format!("readback channel: {e}")))?;
        mapped.map_err(|e| EngineError::backend(BackendKind::Gpu, format!("readback map: {e}")))?;

        let mut rgba = Vec::with_capacity((unpadded * height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(padded as usize).take(height as usize) {
                rgba.extend_from_slice(&row[..unpadded as usize]);
            }
        }
        buffer.unmap();
        buffer.destroy();

        unpremultiply(&mut rgba);
        Pixmap::from_rgba_bytes(width, height, &rgba)
            .ok_or_else(|| EngineError::backend(BackendKind::Gpu, "readback size mismatch"))
    }
}

impl Presenter for GpuPresenter<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn render(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo> {
        // wgpu reports validation failures by panicking from the default handler.
        match catch_unwind(AssertUnwindSafe(|| self.render_inner(commands))) {
            Ok(result) => result,
            Err(_) => Err(EngineError::backend(BackendKind::Gpu, "render panicked")),
        }
    }

    fn present(&mut self) -> EngineResult<()> {
        match catch_unwind(AssertUnwindSafe(|| self.present_inner())) {
            Ok(result) => result,
            Err(_) => Err(EngineError::backend(BackendKind::Gpu, "present panicked")),
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        if let Some(old) = self.target.take() {
            old.texture.destroy();
        }
        self.rendered = false;
        true
    }

    fn surface_resized(&mut self, width: u32, height: u32) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.resize_surface(winit::dpi::PhysicalSize::new(width, height));
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&mut self) -> EngineResult<Pixmap> {
        match catch_unwind(AssertUnwindSafe(|| self.readback())) {
            Ok(result) => result,
            Err(_) => Err(EngineError::backend(BackendKind::Gpu, "readback panicked")),
        }
    }

    fn has_surface(&self) -> bool {
        self.rendered && self.target.is_some()
    }

    fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if !self.latch.begin() {
            return report;
        }

        let vbo = self.vbo.take();
        report.step("vertex buffer", || {
            if let Some(b) = vbo {
                b.destroy();
            }
            Ok(())
        });

        let target = self.target.take();
        report.step("offscreen texture", || {
            if let Some(t) = target {
                t.texture.destroy();
            }
            Ok(())
        });

        let pipelines = (self.offscreen_pipeline.take(), self.surface_pipeline.take());
        report.step("pipelines", || {
            if let Some(p) = pipelines.0 {
                p.destroy();
            }
            drop(pipelines.1);
            Ok(())
        });

        let ctx = &mut self.ctx;
        report.step("surface", || {
            if let Some(c) = ctx.as_mut() {
                drop(c.release_surface());
            }
            Ok(())
        });

        let ctx = self.ctx.take();
        report.step("device", || {
            if let Some(c) = ctx {
                c.device().destroy();
            }
            Ok(())
        });

        self.rendered = false;
        self.vbo_capacity = 0;
        self.vertex_count = 0;
        report
    }
}

impl Drop for GpuPresenter<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Flattens primitives into a premultiplied triangle list.
fn build_vertices(primitives: &[Primitive], width: u32, height: u32) -> Vec<FillVertex> {
    let full = [
        [0.0, 0.0],
        [width as f32, 0.0],
        [width as f32, height as f32],
        [0.0, height as f32],
    ];

    let mut out = Vec::new();
    for prim in primitives {
        let (points, color): (&[tessellate::Point], Rgba8) = match prim {
            Primitive::Clear(c) => (&full[..], *c),
            Primitive::Polygon { points, color } => (points.as_slice(), *color),
        };
        let color = premultiplied(color);
        out.extend(
            tessellate::fan(points)
                .into_iter()
                .map(|pos| FillVertex { pos, color }),
        );
    }
    out
}

fn premultiplied(c: Rgba8) -> [f32; 4] {
    let f = |v: u8| v as f32 / 255.0;
    Color::from_straight(f(c.r), f(c.g), f(c.b), f(c.a)).to_array()
}

/// Converts premultiplied readback bytes to straight alpha in place.
fn unpremultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_covers_viewport_with_two_triangles() {
        let v = build_vertices(&[Primitive::Clear(Rgba8::new(255, 0, 0, 255))], 10, 20);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert!(v.iter().any(|p| p.pos == [10.0, 20.0]));
    }

    #[test]
    fn translucent_vertices_are_premultiplied() {
        let [r, _, _, a] = premultiplied(Rgba8::new(255, 0, 0, 51));
        assert!((a - 0.2).abs() < 1e-6);
        assert!((r - 0.2).abs() < 1e-6);
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        let mut px = [64, 0, 0, 128, 10, 20, 30, 255];
        unpremultiply(&mut px);
        assert_eq!(px, [128, 0, 0, 128, 10, 20, 30, 255]);
    }
}
