use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{EngineConfig, RenderMode};
use crate::core::Sketch;
use crate::engine::Engine;
use crate::input::InputState;
use crate::input::platform::winit::translate_window_event;

/// Window configuration derived from the engine config.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl RuntimeConfig {
    pub fn from_engine(config: &EngineConfig) -> Self {
        Self {
            title: config.title.clone(),
            initial_size: LogicalSize::new(config.width as f64, config.height as f64),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_engine(&EngineConfig::default())
    }
}

/// Entry point for windowed sketches.
pub struct Runtime;

impl Runtime {
    /// Opens a window and runs `sketch` until the window closes.
    pub fn run<S>(config: EngineConfig, sketch: S) -> Result<()>
    where
        S: Sketch + 'static,
    {
        let config = config.with_mode(RenderMode::Windowed);
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, sketch);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,

    window: Window,

    #[borrows(window)]
    #[not_covariant]
    engine: Engine<'this>,
}

struct AppState<S>
where
    S: Sketch + 'static,
{
    config: EngineConfig,
    sketch: S,

    entry: Option<WindowEntry>,
    exit_requested: bool,
}

impl<S> AppState<S>
where
    S: Sketch + 'static,
{
    fn new(config: EngineConfig, sketch: S) -> Self {
        Self {
            config,
            sketch,
            entry: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let runtime = RuntimeConfig::from_engine(&self.config);
        let attrs = Window::default_attributes()
            .with_title(runtime.title)
            .with_inner_size(runtime.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let config = self.config.clone();

        let entry = WindowEntryBuilder {
            input_state: InputState::default(),
            window,
            engine_builder: |w| Engine::with_window(config, w),
        }
        .build();

        self.entry = Some(entry);
        Ok(id)
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        if let Some(mut entry) = self.entry.take() {
            let report = entry.with_engine_mut(|engine| engine.teardown());
            if !report.is_clean() {
                log::warn!("teardown finished with {} failed step(s)", report.failed.len());
            }
        }
        event_loop.exit();
    }

    /// One frame: tick, present, and follow any size change the sketch asked for.
    fn redraw(&mut self) {
        let sketch = &mut self.sketch;
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            fields.engine.redraw(sketch);

            if let Some((w, h)) = fields.engine.take_window_resize() {
                let _ = fields
                    .window
                    .request_inner_size(LogicalSize::new(w as f64, h as f64));
            }
        });
    }
}

impl<S> ApplicationHandler for AppState<S>
where
    S: Sketch + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.request_exit(event_loop);
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Keep redrawing while the sketch loops; a frozen sketch waits for input.
        if let Some(entry) = &self.entry {
            entry.with(|fields| {
                if fields.engine.wants_redraw() {
                    fields.window.request_redraw();
                }
            });
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.request_exit(event_loop);
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                return;
            }
            _ => {}
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (sketch, entry) = (&mut self.sketch, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            match &event {
                WindowEvent::Resized(size) => {
                    fields.engine.surface_resized(size.width, size.height);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = fields.window.inner_size();
                    fields.engine.surface_resized(size.width, size.height);
                }
                _ => {}
            }

            if let Some(ev) = translate_window_event(fields.window, fields.input_state, &event) {
                // Handler failures are logged by the engine and leave the loop running.
                let _ = fields.engine.dispatch(sketch, &ev);
            }

            if fields.engine.wants_redraw() {
                fields.window.request_redraw();
            }
        });
    }
}
