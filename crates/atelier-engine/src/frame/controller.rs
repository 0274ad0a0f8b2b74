use crate::canvas::Canvas;
use crate::core::{run_contained, Sketch};
use crate::error::EngineResult;
use crate::input::SketchEvent;
use crate::time::FrameClock;

use super::setup::SetupCapture;

/// Result of one `FrameController::tick`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// `draw()` ran; commands recorded in this tick carry `frame`.
    Drew { frame: u64 },
    /// The should-draw decision said no. The buffer was still cleared and
    /// re-seeded with the setup prefix.
    Skipped,
    /// The no-loop latch is set; nothing was touched.
    Frozen,
}

impl TickOutcome {
    #[inline]
    pub fn drew(self) -> bool {
        matches!(self, TickOutcome::Drew { .. })
    }
}

/// Drives setup-once, the should-draw decision and post-draw bookkeeping.
///
/// Single-threaded: one tick runs to completion before the next starts.
#[derive(Debug)]
pub struct FrameController {
    canvas: Canvas,
    capture: SetupCapture,
    clock: FrameClock,
    headless: bool,
    drew_before: bool,
}

impl FrameController {
    pub fn new(canvas: Canvas, headless: bool) -> Self {
        Self {
            canvas,
            capture: SetupCapture::default(),
            clock: FrameClock::new(),
            headless,
            drew_before: false,
        }
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Setup output (captured background + replay prefix).
    #[inline]
    pub fn setup_capture(&self) -> &SetupCapture {
        &self.capture
    }

    #[inline]
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Runs one tick of the lifecycle against `sketch`.
    pub fn tick(&mut self, sketch: &mut dyn Sketch) -> TickOutcome {
        if !self.canvas.state.setup_done {
            self.run_setup(sketch);
        }

        if self.canvas.state.is_frozen() {
            return TickOutcome::Frozen;
        }

        let buffer = self.canvas.buffer_mut();
        buffer.clear();
        buffer.reseed(&self.capture.prefix);
        if self.headless {
            if let Some(bg) = self.capture.take_background_once() {
                self.canvas.buffer_mut().insert_front(bg);
            }
        }

        let Some(reason) = self.canvas.state.draw_reason(self.drew_before) else {
            log::trace!("tick skipped (frame_count={})", self.canvas.state.frame_count);
            return TickOutcome::Skipped;
        };

        let frame = self.canvas.state.frame_count;
        let start_seq = self.canvas.buffer().last_seq();
        log::trace!("draw frame {frame} ({reason:?})");

        // One-shot: a redraw() issued during this draw queues another.
        self.canvas.state.redraw_requested = false;

        let time = self.clock.tick();
        self.canvas.begin_pass(true, Some(time));

        let canvas = &mut self.canvas;
        // update() failing does not cancel draw().
        let _ = run_contained("update", || sketch.update(canvas));
        let drawn = run_contained("draw", || sketch.draw(canvas));

        self.canvas.end_pass();
        self.canvas.buffer_mut().tag_since(start_seq, frame);
        self.drew_before = true;

        let state = &mut self.canvas.state;
        if !state.looping && !state.ignore_no_loop {
            state.no_loop_drawn = true;
        }
        if drawn.is_ok() {
            state.frame_count += 1;
        }

        TickOutcome::Drew { frame }
    }

    /// Routes one host event to the matching sketch hook.
    pub fn dispatch(&mut self, sketch: &mut dyn Sketch, event: &SketchEvent) -> EngineResult<()> {
        let canvas = &mut self.canvas;
        match event {
            SketchEvent::MousePressed(p) => {
                run_contained("mouse_pressed", || sketch.mouse_pressed(canvas, p))
            }
            SketchEvent::MouseReleased(p) => {
                run_contained("mouse_released", || sketch.mouse_released(canvas, p))
            }
            SketchEvent::MouseMoved(p) => {
                run_contained("mouse_moved", || sketch.mouse_moved(canvas, p))
            }
            SketchEvent::KeyPressed(k) => {
                run_contained("key_pressed", || sketch.key_pressed(canvas, k))
            }
            SketchEvent::KeyReleased(k) => {
                run_contained("key_released", || sketch.key_released(canvas, k))
            }
        }
    }

    fn run_setup(&mut self, sketch: &mut dyn Sketch) {
        self.canvas.buffer_mut().clear();
        self.canvas.begin_pass(false, None);

        let canvas = &mut self.canvas;
        if run_contained("setup", || sketch.setup(canvas)).is_err() {
            log::warn!("continuing with partial setup output");
        }

        self.canvas.end_pass();
        let output = self.canvas.buffer_mut().drain();
        self.capture = SetupCapture::from_setup_output(output);
        self.canvas.state.setup_done = true;

        log::debug!(
            "setup captured: background={}, prefix={} commands",
            self.capture.background.is_some(),
            self.capture.prefix.len()
        );
    }
}
