use crate::canvas::Canvas;
use crate::input::{KeyEvent, PointerEvent};

/// Result returned by every sketch callback.
pub type SketchResult = anyhow::Result<()>;

/// User program contract.
///
/// Every method has a no-op default so sketches only implement what they use.
pub trait Sketch {
    /// Called exactly once, before the first draw.
    fn setup(&mut self, canvas: &mut Canvas) -> SketchResult {
        let _ = canvas;
        Ok(())
    }

    /// Called before every draw.
    fn update(&mut self, canvas: &mut Canvas) -> SketchResult {
        let _ = canvas;
        Ok(())
    }

    /// Called on every tick that decides to draw.
    fn draw(&mut self, canvas: &mut Canvas) -> SketchResult {
        let _ = canvas;
        Ok(())
    }

    fn mouse_pressed(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        let _ = (canvas, event);
        Ok(())
    }

    fn mouse_released(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        let _ = (canvas, event);
        Ok(())
    }

    fn mouse_moved(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        let _ = (canvas, event);
        Ok(())
    }

    fn key_pressed(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> SketchResult {
        let _ = (canvas, event);
        Ok(())
    }

    fn key_released(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> SketchResult {
        let _ = (canvas, event);
        Ok(())
    }
}

type CanvasFn<'a> = Box<dyn FnMut(&mut Canvas) -> SketchResult + 'a>;
type PointerFn<'a> = Box<dyn FnMut(&mut Canvas, &PointerEvent) -> SketchResult + 'a>;
type KeyFn<'a> = Box<dyn FnMut(&mut Canvas, &KeyEvent) -> SketchResult + 'a>;

/// Closure-built sketch.
///
/// ```ignore
/// let mut sketch = FnSketch::new()
///     .setup(|c| { c.background(0.0)?; Ok(()) })
///     .draw(|c| { c.rect(10.0, 10.0, 20.0, 20.0)?; Ok(()) });
/// ```
#[derive(Default)]
pub struct FnSketch<'a> {
    setup: Option<CanvasFn<'a>>,
    update: Option<CanvasFn<'a>>,
    draw: Option<CanvasFn<'a>>,
    mouse_pressed: Option<PointerFn<'a>>,
    mouse_released: Option<PointerFn<'a>>,
    mouse_moved: Option<PointerFn<'a>>,
    key_pressed: Option<KeyFn<'a>>,
    key_released: Option<KeyFn<'a>>,
}

impl<'a> FnSketch<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(mut self, f: impl FnMut(&mut Canvas) -> SketchResult + 'a) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    pub fn update(mut self, f: impl FnMut(&mut Canvas) -> SketchResult + 'a) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn draw(mut self, f: impl FnMut(&mut Canvas) -> SketchResult + 'a) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    pub fn on_mouse_pressed(
        mut self,
        f: impl FnMut(&mut Canvas, &PointerEvent) -> SketchResult + 'a,
    ) -> Self {
        self.mouse_pressed = Some(Box::new(f));
        self
    }

    pub fn on_mouse_released(
        mut self,
        f: impl FnMut(&mut Canvas, &PointerEvent) -> SketchResult + 'a,
    ) -> Self {
        self.mouse_released = Some(Box::new(f));
        self
    }

    pub fn on_mouse_moved(
        mut self,
        f: impl FnMut(&mut Canvas, &PointerEvent) -> SketchResult + 'a,
    ) -> Self {
        self.mouse_moved = Some(Box::new(f));
        self
    }

    pub fn on_key_pressed(
        mut self,
        f: impl FnMut(&mut Canvas, &KeyEvent) -> SketchResult + 'a,
    ) -> Self {
        self.key_pressed = Some(Box::new(f));
        self
    }

    pub fn on_key_released(
        mut self,
        f: impl FnMut(&mut Canvas, &KeyEvent) -> SketchResult + 'a,
    ) -> Self {
        self.key_released = Some(Box::new(f));
        self
    }
}

impl Sketch for FnSketch<'_> {
    fn setup(&mut self, canvas: &mut Canvas) -> SketchResult {
        self.setup.as_mut().map_or(Ok(()), |f| f(canvas))
    }

    fn update(&mut self, canvas: &mut Canvas) -> SketchResult {
        self.update.as_mut().map_or(Ok(()), |f| f(canvas))
    }

    fn draw(&mut self, canvas: &mut Canvas) -> SketchResult {
        self.draw.as_mut().map_or(Ok(()), |f| f(canvas))
    }

    fn mouse_pressed(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        self.mouse_pressed.as_mut().map_or(Ok(()), |f| f(canvas, event))
    }

    fn mouse_released(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        self.mouse_released.as_mut().map_or(Ok(()), |f| f(canvas, event))
    }

    fn mouse_moved(&mut self, canvas: &mut Canvas, event: &PointerEvent) -> SketchResult {
        self.mouse_moved.as_mut().map_or(Ok(()), |f| f(canvas, event))
    }

    fn key_pressed(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> SketchResult {
        self.key_pressed.as_mut().map_or(Ok(()), |f| f(canvas, event))
    }

    fn key_released(&mut self, canvas: &mut Canvas, event: &KeyEvent) -> SketchResult {
        self.key_released.as_mut().map_or(Ok(()), |f| f(canvas, event))
    }
}
