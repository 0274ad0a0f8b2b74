use anyhow::{Context, Result};
use winit::window::Window;

use super::{GpuInit, WindowSurface};

/// Owns the wgpu core objects and, for windowed hosts, the window surface.
///
/// Lifetimes: `'w` is the window borrow carried by the surface. Headless
/// contexts use any `'w`.
pub struct GpuContext<'w> {
    /// Kept alive for the lifetime of the surface.
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: Option<WindowSurface<'w>>,
}

impl<'w> GpuContext<'w> {
    /// Creates a context with no surface (offscreen rendering only).
    pub async fn headless(init: &GpuInit) -> Result<Self> {
        let instance = new_instance();
        let adapter = request_adapter(&instance, init, None).await?;
        let (device, queue) = request_device(&adapter, init).await?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            surface: None,
        })
    }

    /// Creates a context whose adapter can present to `window`.
    pub async fn for_window(window: &'w Window, init: &GpuInit) -> Result<Self> {
        let instance = new_instance();
        let (surface, size) = WindowSurface::create(&instance, window)?;
        let adapter = request_adapter(&instance, init, Some(&surface)).await?;
        let (device, queue) = request_device(&adapter, init).await?;
        let surface = WindowSurface::configure(surface, size, &adapter, &device, init)?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            surface: Some(surface),
        })
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    #[inline]
    pub fn surface(&self) -> Option<&WindowSurface<'w>> {
        self.surface.as_ref()
    }

    #[inline]
    pub fn surface_mut(&mut self) -> Option<&mut WindowSurface<'w>> {
        self.surface.as_mut()
    }

    /// Reconfigures the window surface, if any.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(&self.device, size);
        }
    }

    /// Drops the window surface ahead of the device.
    pub fn release_surface(&mut self) -> Option<WindowSurface<'w>> {
        self.surface.take()
    }
}

fn new_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

async fn request_adapter(
    instance: &wgpu::Instance,
    init: &GpuInit,
    surface: Option<&wgpu::Surface<'_>>,
) -> Result<wgpu::Adapter> {
    instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface: surface,
            force_fallback_adapter: init.software_adapter,
        })
        .await
        .context("failed to find a suitable GPU adapter")
}

async fn request_device(adapter: &wgpu::Adapter, init: &GpuInit) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("atelier device"),
            required_features: wgpu::Features::empty(),
            required_limits: init.limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}
