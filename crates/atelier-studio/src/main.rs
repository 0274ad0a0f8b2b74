use anyhow::Result;

use atelier_engine::input::{Key, KeyEvent, PointerEvent};
use atelier_engine::logging::{init_logging, LoggingConfig};
use atelier_engine::window::Runtime;
use atelier_engine::{Canvas, Engine, EngineConfig, Sketch, SketchResult};

/// Headless runs render this many frames and keep the last one.
const HEADLESS_FRAMES: usize = 60;

/// Orbiting squares; click to toggle looping, `s` to save a frame.
struct Orbit {
    angle: f64,
    speed: f64,
}

impl Default for Orbit {
    fn default() -> Self {
        Self { angle: 0.0, speed: 0.05 }
    }
}

impl Sketch for Orbit {
    fn setup(&mut self, canvas: &mut Canvas) -> SketchResult {
        canvas.size(400, 400);
        canvas.background((24.0, 26.0, 33.0))?;
        Ok(())
    }

    fn update(&mut self, _canvas: &mut Canvas) -> SketchResult {
        self.angle += self.speed;
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas) -> SketchResult {
        canvas.background((24.0, 26.0, 33.0))?;
        canvas.no_stroke();

        canvas.push();
        canvas.translate(200.0, 200.0);
        for i in 0..8 {
            let t = i as f64 / 8.0;
            canvas.push();
            canvas.rotate(self.angle + t * std::f64::consts::TAU);
            canvas.translate(120.0, 0.0);
            canvas.rotate(-self.angle * 2.0);
            canvas.fill((80.0 + 170.0 * t, 140.0, 255.0 - 150.0 * t, 220.0))?;
            canvas.rect(-18.0, -18.0, 36.0, 36.0)?;
            canvas.pop();
        }
        canvas.pop();

        canvas.stroke(240.0)?;
        canvas.stroke_weight(2.0)?;
        canvas.no_fill();
        canvas.circle(200.0, 200.0, 120.0)?;
        Ok(())
    }

    fn mouse_pressed(&mut self, canvas: &mut Canvas, _event: &PointerEvent) -> SketchResult {
        if canvas.is_looping() {
            canvas.no_loop();
        } else {
            canvas.loop_();
        }
        Ok(())
    }

    fn key_pressed(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> SketchResult {
        if event.key == Some(Key::Char('s')) {
            let path = canvas.save_frame("orbit-####.png");
            log::info!("saving {}", path.display());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::sketch_defaults());

    let config = EngineConfig::from_env().with_title("atelier studio");
    let windowed = std::env::args().any(|a| a == "--window");

    if windowed {
        return Runtime::run(config, Orbit::default());
    }

    let mut engine = Engine::new(config);
    let mut sketch = Orbit::default();
    let drawn = engine.run_frames(&mut sketch, HEADLESS_FRAMES);
    let path = engine.save_frame("orbit-final.png");

    log::info!(
        "rendered {drawn} frame(s) on {:?}, snapshot at {}",
        engine.presenter_kind(),
        path.display()
    );
    Ok(())
}
