//! Drawing facade.
//!
//! `Canvas` is the explicit context object handed to every sketch callback.
//! It owns the command buffer, the transform stack and the current style, so
//! drawing calls never reach for global state.
//!
//! Conventions:
//! - logical pixels, origin top-left, +X right, +Y down
//! - colors are `ColorArg` in `0..=255`
//! - every transform mutation records exactly one command

mod draw;
mod transform;

use std::path::PathBuf;

use crate::frame::FrameState;
use crate::paint::ColorArg;
use crate::scene::{Args, Command, CommandBuffer, Op};
use crate::snapshot::{expand_template, PendingSnapshotRequest};
use crate::time::FrameTime;
use crate::transform::{Mat3, TransformStack};

/// Current fill/stroke state forwarded into shape commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<ColorArg>,
    pub stroke: Option<ColorArg>,
    pub stroke_weight: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(ColorArg::Gray(255.0)),
            stroke: Some(ColorArg::Gray(0.0)),
            stroke_weight: 1.0,
        }
    }
}

/// Per-engine drawing context.
#[derive(Debug)]
pub struct Canvas {
    buffer: CommandBuffer,
    transforms: TransformStack,
    style: Style,

    pub(crate) state: FrameState,

    width: u32,
    height: u32,
    requested_size: Option<(u32, u32)>,

    draw_active: bool,
    time: Option<FrameTime>,

    snapshot_requests: Vec<PendingSnapshotRequest>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: CommandBuffer::new(),
            transforms: TransformStack::new(),
            style: Style::default(),
            state: FrameState::default(),
            width: width.max(1),
            height: height.max(1),
            requested_size: None,
            draw_active: false,
            time: None,
            snapshot_requests: Vec::new(),
        }
    }

    // ── raw recording ─────────────────────────────────────────────────────

    /// Records an arbitrary command and returns its sequence number.
    ///
    /// Backends skip ops they do not understand, so custom tags are safe.
    #[inline]
    pub fn record(&mut self, op: Op, args: Args) -> u64 {
        self.buffer.record(op, args)
    }

    /// Commands recorded for the current tick (replay prefix included).
    #[inline]
    pub fn commands(&self) -> &[Command] {
        self.buffer.commands()
    }

    #[inline]
    pub fn buffer(&self) -> &CommandBuffer {
        &self.buffer
    }

    #[inline]
    pub(crate) fn buffer_mut(&mut self) -> &mut CommandBuffer {
        &mut self.buffer
    }

    // ── style ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Current transform (top of the stack).
    #[inline]
    pub fn current_matrix(&self) -> Mat3 {
        self.transforms.top()
    }

    // ── loop control ──────────────────────────────────────────────────────

    /// Stops continuous drawing after the current (or next) frame.
    pub fn no_loop(&mut self) {
        self.state.looping = false;
    }

    /// Resumes continuous drawing and releases the no-loop latch.
    pub fn loop_(&mut self) {
        self.state.looping = true;
        self.state.no_loop_drawn = false;
    }

    /// Requests exactly one extra draw while not looping.
    pub fn redraw(&mut self) {
        self.state.redraw_requested = true;
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.state.looping
    }

    /// Number of completed draws.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.state.frame_count
    }

    #[inline]
    pub fn frame_state(&self) -> &FrameState {
        &self.state
    }

    /// True while `update()` / `draw()` run.
    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.draw_active
    }

    // ── dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Requests new canvas dimensions. Applied to the presenter between ticks.
    pub fn size(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.width = width;
        self.height = height;
        self.requested_size = Some((width, height));
    }

    pub(crate) fn take_requested_size(&mut self) -> Option<(u32, u32)> {
        self.requested_size.take()
    }

    pub(crate) fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    // ── timing ────────────────────────────────────────────────────────────

    /// Seconds since the previous draw (0 before the first draw).
    pub fn delta_time(&self) -> f32 {
        self.time.map_or(0.0, |t| t.dt)
    }

    /// Milliseconds since the engine started, as of the current draw.
    pub fn millis(&self) -> u128 {
        self.time.map_or(0, |t| t.elapsed.as_millis())
    }

    // ── snapshots ─────────────────────────────────────────────────────────

    /// Requests a snapshot of the current frame.
    ///
    /// A `#` run in the file name becomes the zero-padded frame number.
    /// During a draw pass the request is fulfilled after the frame is
    /// composited; otherwise it is resolved right after the callback returns.
    pub fn save_frame(&mut self, template: impl Into<PathBuf>) -> PathBuf {
        let target_path = expand_template(&template.into(), self.state.frame_count);
        self.snapshot_requests.push(PendingSnapshotRequest {
            target_path: target_path.clone(),
            enqueued_during_draw: self.draw_active,
        });
        target_path
    }

    pub(crate) fn take_snapshot_requests(&mut self) -> Vec<PendingSnapshotRequest> {
        std::mem::take(&mut self.snapshot_requests)
    }

    // ── lifecycle hooks (controller only) ─────────────────────────────────

    /// Resets per-pass transform state; the canvas and replay both start
    /// every pass from identity.
    pub(crate) fn begin_pass(&mut self, drawing: bool, time: Option<FrameTime>) {
        self.transforms.clear();
        self.draw_active = drawing;
        if time.is_some() {
            self.time = time;
        }
    }

    pub(crate) fn end_pass(&mut self) {
        self.draw_active = false;
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(100, 100)
    }
}
