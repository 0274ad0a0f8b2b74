//! Engine facade.
//!
//! Wires the frame lifecycle, the presenter chain and snapshot handling into
//! one object a host drives tick by tick.

use std::borrow::Cow;
use std::path::PathBuf;

use winit::window::Window;

use crate::canvas::Canvas;
use crate::config::{EngineConfig, RenderMode};
use crate::core::Sketch;
use crate::device::GpuInit;
use crate::error::EngineResult;
use crate::frame::{FrameController, TickOutcome};
use crate::input::SketchEvent;
use crate::paint::DEFAULT_BACKGROUND;
use crate::render::{
    BackendKind, BitmapPresenter, CpuPresenter, GpuPresenter, Presenter, PresenterChain,
    PresenterFactory, SurfaceInfo, TeardownReport,
};
use crate::scene::{Args, Command, CommandMeta, Op};
use crate::snapshot::{expand_template, PendingSnapshotRequest, SnapshotOrchestrator, SnapshotRecord};

/// One sketch instance: canvas, lifecycle, presenters and snapshots.
///
/// `'w` is the window borrow held by a windowed GPU presenter; headless
/// engines are `Engine<'static>`.
pub struct Engine<'w> {
    config: EngineConfig,
    frames: FrameController,
    chain: PresenterChain<'w>,
    snapshots: SnapshotOrchestrator,
    last_surface: Option<SurfaceInfo>,
    window_resize: Option<(u32, u32)>,
}

impl Engine<'static> {
    /// Engine without a window. Presenters are created lazily on first render.
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, None)
    }
}

impl<'w> Engine<'w> {
    /// Engine whose GPU presenter draws into `window`.
    pub fn with_window(config: EngineConfig, window: &'w Window) -> Self {
        Self::build(config, Some(window))
    }

    fn build(config: EngineConfig, window: Option<&'w Window>) -> Self {
        let (w, h) = (config.width.max(1), config.height.max(1));
        let headless = config.mode == RenderMode::Headless;

        let mut canvas = Canvas::new(w, h);
        canvas.state.ignore_no_loop = config.ignore_no_loop;

        let mut chain = PresenterChain::new(w, h);
        for &kind in &config.backends {
            chain.push(kind, factory(kind, window));
        }

        log::info!(
            "engine: {w}x{h} {:?}, backends {:?}",
            config.mode,
            config.backends
        );

        Self {
            config,
            frames: FrameController::new(canvas, headless),
            chain,
            snapshots: SnapshotOrchestrator::new(),
            last_surface: None,
            window_resize: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas {
        self.frames.canvas()
    }

    /// Host access to loop controls (`redraw()`, `loop_()`, ...) between ticks.
    #[inline]
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        self.frames.canvas_mut()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.canvas().frame_count()
    }

    /// Backend currently presenting, initializing the chain if needed.
    pub fn presenter_kind(&mut self) -> Option<BackendKind> {
        self.chain.kind()
    }

    /// Result of the most recent render.
    #[inline]
    pub fn last_surface(&self) -> Option<SurfaceInfo> {
        self.last_surface
    }

    /// Snapshot outcomes, oldest first.
    #[inline]
    pub fn snapshots(&self) -> &[SnapshotRecord] {
        self.snapshots.records()
    }

    /// Runs one tick: lifecycle, then render and deferred snapshots if it drew.
    pub fn tick(&mut self, sketch: &mut dyn Sketch) -> TickOutcome {
        let outcome = self.frames.tick(sketch);
        self.apply_size_request();

        let requests = self.frames.canvas_mut().take_snapshot_requests();

        if let TickOutcome::Drew { frame } = outcome {
            let commands = self.render_list().into_owned();
            self.last_surface = self.chain.render(&commands);
            self.snapshots.submit(requests, &mut self.chain, &commands, frame);
            self.snapshots.fulfill_deferred(&mut self.chain, &commands, frame);
        } else if !requests.is_empty() {
            let commands = self.render_list().into_owned();
            let frame = self.frame_count();
            self.snapshots.submit(requests, &mut self.chain, &commands, frame);
        }

        outcome
    }

    /// True while the next tick would draw. Hosts use it to stop scheduling
    /// redraws once the no-loop latch holds.
    pub fn wants_redraw(&self) -> bool {
        let state = self.canvas().frame_state();
        state.looping || state.redraw_requested || state.ignore_no_loop || !state.no_loop_drawn
    }

    /// Ticks `n` times; returns how many ticks drew.
    pub fn run_frames(&mut self, sketch: &mut dyn Sketch, n: usize) -> usize {
        (0..n).filter(|_| self.tick(sketch).drew()).count()
    }

    /// Pushes the last rendered frame to the window (no-op headless).
    pub fn present(&mut self) {
        self.chain.present();
    }

    /// Window redraw: ticks, then presents whatever the surface holds. A
    /// frozen or skipped tick re-presents the previous frame.
    pub fn redraw(&mut self, sketch: &mut dyn Sketch) -> TickOutcome {
        let outcome = self.tick(sketch);
        self.present();
        outcome
    }

    /// Routes a host event to the sketch. Snapshot requests made by the
    /// handler resolve immediately.
    pub fn dispatch(&mut self, sketch: &mut dyn Sketch, event: &SketchEvent) -> EngineResult<()> {
        let result = self.frames.dispatch(sketch, event);
        self.apply_size_request();

        let requests = self.frames.canvas_mut().take_snapshot_requests();
        if !requests.is_empty() {
            let commands = self.render_list().into_owned();
            let frame = self.frame_count();
            self.snapshots.submit(requests, &mut self.chain, &commands, frame);
        }
        result
    }

    /// Host-side snapshot of the current frame, resolved immediately.
    pub fn save_frame(&mut self, template: impl Into<PathBuf>) -> PathBuf {
        let frame = self.frame_count();
        let target_path = expand_template(&template.into(), frame);
        let commands = self.render_list().into_owned();
        self.snapshots.immediate(
            PendingSnapshotRequest {
                target_path: target_path.clone(),
                enqueued_during_draw: false,
            },
            &mut self.chain,
            &commands,
            frame,
        );
        target_path
    }

    /// Window surface changed size (physical pixels).
    pub fn surface_resized(&mut self, width: u32, height: u32) {
        self.chain.surface_resized(width, height);
    }

    /// Canvas size requested by the sketch that the window should adopt.
    pub fn take_window_resize(&mut self) -> Option<(u32, u32)> {
        self.window_resize.take()
    }

    /// Releases presenter resources. Idempotent; also runs on drop.
    pub fn teardown(&mut self) -> TeardownReport {
        self.chain.teardown()
    }

    fn apply_size_request(&mut self) {
        if let Some((w, h)) = self.frames.canvas_mut().take_requested_size() {
            if self.chain.resize(w, h) {
                log::debug!("presenter resized to {w}x{h}");
            }
            self.frames.canvas_mut().set_dimensions(w, h);
            if self.config.mode == RenderMode::Windowed {
                self.window_resize = Some((w, h));
            }
        }
    }

    /// Commands handed to presenters. Surfaces persist between frames, so a
    /// windowed presenter without one (first frame, fallback, resize) starts
    /// from the setup background, or the default gray when setup painted none.
    fn render_list(&self) -> Cow<'_, [Command]> {
        let commands = self.canvas().commands();
        if self.config.mode == RenderMode::Headless || self.chain.has_surface() {
            return Cow::Borrowed(commands);
        }

        let base = self
            .frames
            .setup_capture()
            .background
            .clone()
            .unwrap_or_else(|| Command {
                op: Op::Background,
                args: Args::new().with("color", DEFAULT_BACKGROUND),
                meta: CommandMeta { seq: 0, frame: None },
            });

        let mut list = Vec::with_capacity(commands.len() + 1);
        list.push(base);
        list.extend_from_slice(commands);
        Cow::Owned(list)
    }
}

fn factory<'w>(kind: BackendKind, window: Option<&'w Window>) -> PresenterFactory<'w> {
    match kind {
        BackendKind::Gpu => Box::new(move |w, h| {
            let init = GpuInit::default();
            let presenter = match window {
                Some(window) => GpuPresenter::for_window(window, w, h, &init)?,
                None => GpuPresenter::headless(w, h, &init)?,
            };
            Ok(Box::new(presenter) as Box<dyn Presenter + 'w>)
        }),
        BackendKind::Cpu => {
            if window.is_some() {
                log::warn!("cpu presenter cannot draw to a window; frames stay offscreen");
            }
            Box::new(|w, h| Ok(Box::new(CpuPresenter::new(w, h)) as Box<dyn Presenter + 'w>))
        }
        BackendKind::Bitmap => {
            Box::new(|w, h| Ok(Box::new(BitmapPresenter::new(w, h)) as Box<dyn Presenter + 'w>))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::core::FnSketch;
    use crate::render::Pixmap;

    /// CPU presenter that counts presents.
    struct CountingPresents {
        inner: CpuPresenter,
        presents: Rc<Cell<u32>>,
    }

    impl Presenter for CountingPresents {
        fn kind(&self) -> BackendKind {
            BackendKind::Cpu
        }
        fn render(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo> {
            self.inner.render(commands)
        }
        fn present(&mut self) -> EngineResult<()> {
            self.presents.set(self.presents.get() + 1);
            Ok(())
        }
        fn resize(&mut self, width: u32, height: u32) -> bool {
            self.inner.resize(width, height)
        }
        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }
        fn capture(&mut self) -> EngineResult<Pixmap> {
            self.inner.capture()
        }
        fn has_surface(&self) -> bool {
            self.inner.has_surface()
        }
        fn teardown(&mut self) -> TeardownReport {
            self.inner.teardown()
        }
    }

    fn cpu_engine() -> Engine<'static> {
        Engine::new(EngineConfig::headless(16, 16).with_backends(vec![BackendKind::Cpu]))
    }

    #[test]
    fn headless_engine_renders_on_cpu() {
        let mut engine = cpu_engine();
        let mut s = FnSketch::new().draw(|c| {
            c.background(10.0)?;
            Ok(())
        });
        assert!(engine.tick(&mut s).drew());
        let info = engine.last_surface().unwrap();
        assert_eq!(info.backend, BackendKind::Cpu);
        assert_eq!((info.width, info.height), (16, 16));
    }

    #[test]
    fn size_request_resizes_presenter() {
        let mut engine = cpu_engine();
        let mut s = FnSketch::new().setup(|c| {
            c.size(40, 30);
            Ok(())
        });
        engine.tick(&mut s);
        let info = engine.last_surface().unwrap();
        assert_eq!((info.width, info.height), (40, 30));
        assert_eq!(engine.canvas().width(), 40);
        assert_eq!(engine.take_window_resize(), None);
    }

    #[test]
    fn no_loop_stops_wanting_redraws() {
        let mut engine = cpu_engine();
        let mut s = FnSketch::new().setup(|c| {
            c.no_loop();
            Ok(())
        });
        assert!(engine.wants_redraw());
        engine.tick(&mut s);
        assert!(!engine.wants_redraw());

        engine.canvas_mut().redraw();
        assert!(engine.wants_redraw());
    }

    #[test]
    fn redraw_presents_even_when_frozen() {
        let presents = Rc::new(Cell::new(0));
        let counter = presents.clone();
        let mut engine = cpu_engine();
        engine.chain = PresenterChain::new(16, 16).with(
            BackendKind::Cpu,
            Box::new(move |w, h| {
                Ok(Box::new(CountingPresents {
                    inner: CpuPresenter::new(w, h),
                    presents: counter,
                }) as Box<dyn Presenter>)
            }),
        );
        let mut s = FnSketch::new().setup(|c| {
            c.no_loop();
            Ok(())
        });

        assert!(engine.redraw(&mut s).drew());
        assert_eq!(engine.redraw(&mut s), TickOutcome::Frozen);
        assert_eq!(engine.redraw(&mut s), TickOutcome::Frozen);
        assert_eq!(presents.get(), 3);
        assert!(engine.chain.has_surface());
    }

    #[test]
    fn empty_backend_list_renders_nothing() {
        let mut engine =
            Engine::new(EngineConfig::headless(8, 8).with_backends(Vec::<BackendKind>::new()));
        let mut s = FnSketch::new();
        assert!(engine.tick(&mut s).drew());
        assert!(engine.last_surface().is_none());
        assert_eq!(engine.presenter_kind(), None);
    }

    #[test]
    fn windowed_render_list_starts_with_default_gray() {
        let engine = Engine::new(
            EngineConfig::headless(8, 8)
                .with_mode(RenderMode::Windowed)
                .with_backends(vec![BackendKind::Cpu]),
        );
        let list = engine.render_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].args.color("color"), Some(Some(DEFAULT_BACKGROUND)));
    }

    #[test]
    fn windowed_base_background_only_paints_a_fresh_surface() {
        let mut engine = Engine::new(
            EngineConfig::headless(8, 8)
                .with_mode(RenderMode::Windowed)
                .with_backends(vec![BackendKind::Cpu]),
        );
        let mut s = FnSketch::new().draw(|c| {
            c.circle(4.0, 4.0, 2.0)?;
            Ok(())
        });

        engine.tick(&mut s);
        assert_eq!(engine.last_surface().unwrap().applied, 2);
        assert!(engine.render_list().iter().all(|c| c.op == Op::Circle));

        engine.tick(&mut s);
        assert_eq!(engine.last_surface().unwrap().applied, 1);

        engine.canvas_mut().size(12, 12);
        engine.apply_size_request();
        assert_eq!(engine.render_list()[0].op, Op::Background);
    }

    #[test]
    fn headless_setup_background_survives_later_frames() {
        let mut engine = cpu_engine();
        let mut s = FnSketch::new()
            .setup(|c| {
                c.background(0.0)?;
                Ok(())
            })
            .draw(|c| {
                c.circle(10.0, 10.0, 2.0)?;
                Ok(())
            });

        engine.run_frames(&mut s, 2);
        let (_, px) = engine.chain.capture().unwrap().unwrap();
        assert_eq!(px.pixel(0, 0), Some(crate::paint::Rgba8::new(0, 0, 0, 255)));
    }
}
