//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue, with or without a window
//! - creating & configuring the window Surface (swapchain)
//! - mapping surface acquire failures to a `PresentAction`

mod context;
mod init;
mod surface;

pub use context::GpuContext;
pub use init::GpuInit;
pub use surface::{PresentAction, WindowSurface};
