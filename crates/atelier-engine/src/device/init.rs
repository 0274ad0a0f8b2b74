/// Adapter and surface preferences for the GPU presenter.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one.
    pub srgb_surface: bool,
    pub present_mode: wgpu::PresentMode,
    /// Requested compositing mode; unsupported requests fall back to the
    /// surface's first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub power_preference: wgpu::PowerPreference,
    /// Accept a software adapter (llvmpipe, WARP). Useful on CI.
    pub software_adapter: bool,
    pub limits: wgpu::Limits,
    pub frame_latency: u32,
}

impl GpuInit {
    /// Settings for machines without a hardware adapter.
    pub fn software() -> Self {
        Self {
            software_adapter: true,
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        // Sketch canvases are small; downlevel limits and low power run anywhere.
        Self {
            srgb_surface: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::LowPower,
            software_adapter: false,
            limits: wgpu::Limits::downlevel_defaults(),
            frame_latency: 2,
        }
    }
}
