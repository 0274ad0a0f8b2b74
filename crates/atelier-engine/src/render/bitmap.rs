use crate::error::{EngineError, EngineResult};
use crate::scene::{Command, Op};

use super::pixmap::Pixmap;
use super::replay::{malformed, require, ShapeStyle};
use super::teardown::{TeardownLatch, TeardownReport};
use super::{BackendKind, Presenter, SurfaceInfo};

/// Last-resort presenter.
///
/// Understands `background`, axis-aligned `rect` and one-pixel `line` only,
/// all in untransformed canvas coordinates. Everything else is skipped.
/// The surface persists between frames until a resize reallocates it.
#[derive(Debug)]
pub struct BitmapPresenter {
    width: u32,
    height: u32,
    surface: Option<Pixmap>,
    latch: TeardownLatch,
}

impl BitmapPresenter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            surface: None,
            latch: TeardownLatch::default(),
        }
    }

    fn draw(pixmap: &mut Pixmap, cmd: &Command) -> EngineResult<bool> {
        match cmd.op {
            Op::Background => {
                let color = match cmd.args.color("color") {
                    Some(Some(c)) if c.is_finite() => c,
                    _ => return Err(malformed(cmd, "background needs a color")),
                };
                pixmap.fill(color.to_rgba8());
            }

            Op::Rect => {
                let (x, y) = (require(cmd, "x")?, require(cmd, "y")?);
                let (w, h) = (require(cmd, "w")?, require(cmd, "h")?);
                let style = ShapeStyle::from_command(cmd)?;

                // Clamp in float space so huge rects stay bounded by the surface.
                let (max_x, max_y) = (pixmap.width() as f64 + 1.0, pixmap.height() as f64 + 1.0);
                let to_col = |v: f64| v.clamp(-1.0, max_x).round() as i64;
                let to_row = |v: f64| v.clamp(-1.0, max_y).round() as i64;
                let (x0, x1) = (to_col(x.min(x + w)), to_col(x.max(x + w)));
                let (y0, y1) = (to_row(y.min(y + h)), to_row(y.max(y + h)));

                if let Some(fill) = style.fill {
                    for row in y0..y1 {
                        pixmap.blend_span(row, x0, x1, fill);
                    }
                }
                if let Some(stroke) = style.stroke.filter(|_| style.weight > 0.0) {
                    let (l, t) = (x0 as f64, y0 as f64);
                    let (r, b) = ((x1 - 1).max(x0) as f64, (y1 - 1).max(y0) as f64);
                    pixmap.draw_line((l, t), (r, t), stroke);
                    pixmap.draw_line((r, t), (r, b), stroke);
                    pixmap.draw_line((r, b), (l, b), stroke);
                    pixmap.draw_line((l, b), (l, t), stroke);
                }
            }

            Op::Line => {
                let (x1, y1) = (require(cmd, "x1")?, require(cmd, "y1")?);
                let (x2, y2) = (require(cmd, "x2")?, require(cmd, "y2")?);
                let style = ShapeStyle::from_command(cmd)?;
                if let Some(stroke) = style.stroke {
                    pixmap.draw_line((x1, y1), (x2, y2), stroke);
                }
            }

            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Presenter for BitmapPresenter {
    fn kind(&self) -> BackendKind {
        BackendKind::Bitmap
    }

    fn render(&mut self, commands: &[Command]) -> EngineResult<SurfaceInfo> {
        let (width, height) = (self.width, self.height);
        let pixmap = self.surface.get_or_insert_with(|| Pixmap::new(width, height));
        let (mut applied, mut skipped) = (0, 0);

        for cmd in commands {
            match Self::draw(pixmap, cmd) {
                Ok(true) => applied += 1,
                Ok(false) => {
                    log::debug!("bitmap: `{}` not supported (seq {})", cmd.op, cmd.seq());
                    skipped += 1;
                }
                Err(err) => {
                    log::debug!("bitmap: {err}");
                    skipped += 1;
                }
            }
        }

        self.latch.rearm();
        Ok(SurfaceInfo {
            backend: BackendKind::Bitmap,
            width: self.width,
            height: self.height,
            applied,
            skipped,
        })
    }

    fn present(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.surface = None;
        true
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&mut self) -> EngineResult<Pixmap> {
        self.surface
            .clone()
            .ok_or_else(|| EngineError::backend(BackendKind::Bitmap, "nothing rendered yet"))
    }

    fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if !self.latch.begin() {
            return report;
        }
        let surface = &mut self.surface;
        report.step("bitmap", || {
            surface.take();
            Ok(())
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::paint::Rgba8;

    #[test]
    fn draws_reduced_subset_and_skips_the_rest() {
        let mut c = Canvas::new(10, 10);
        c.background(255.0).unwrap();
        c.no_stroke();
        c.fill(0.0).unwrap();
        c.rect(2.0, 2.0, 3.0, 3.0).unwrap();
        c.translate(1.0, 1.0);
        c.circle(5.0, 5.0, 2.0).unwrap();
        c.stroke((0.0, 0.0, 255.0)).unwrap();
        c.line(0.0, 9.0, 9.0, 9.0).unwrap();

        let mut p = BitmapPresenter::new(10, 10);
        let info = p.render(c.commands()).unwrap();
        assert_eq!(info.applied, 3);
        assert_eq!(info.skipped, 2);

        let px = p.capture().unwrap();
        assert_eq!(px.pixel(0, 0), Some(Rgba8::new(255, 255, 255, 255)));
        assert_eq!(px.pixel(3, 3), Some(Rgba8::new(0, 0, 0, 255)));
        assert_eq!(px.pixel(5, 9), Some(Rgba8::new(0, 0, 255, 255)));
    }

    #[test]
    fn surface_accumulates_across_frames() {
        let mut first = Canvas::new(6, 6);
        first.background(0.0).unwrap();
        let mut second = Canvas::new(6, 6);
        second.no_stroke();
        second.fill(255.0).unwrap();
        second.rect(0.0, 0.0, 2.0, 2.0).unwrap();

        let mut p = BitmapPresenter::new(6, 6);
        p.render(first.commands()).unwrap();
        p.render(second.commands()).unwrap();

        let px = p.capture().unwrap();
        assert_eq!(px.pixel(1, 1), Some(Rgba8::new(255, 255, 255, 255)));
        assert_eq!(px.pixel(4, 4), Some(Rgba8::new(0, 0, 0, 255)));

        assert!(p.resize(7, 7));
        assert!(!p.has_surface());
    }

    #[test]
    fn extreme_coordinates_are_clipped() {
        let mut c = Canvas::new(8, 8);
        c.stroke(0.0).unwrap();
        c.line(-1e300, 5.0, 1e300, 5.0).unwrap();
        c.fill(255.0).unwrap();
        c.no_stroke();
        c.rect(-1e300, 0.0, 2e300, 3.0).unwrap();

        let mut p = BitmapPresenter::new(8, 8);
        let info = p.render(c.commands()).unwrap();
        assert_eq!(info.skipped, 0);

        let px = p.capture().unwrap();
        assert_eq!(px.pixel(3, 1), Some(Rgba8::new(255, 255, 255, 255)));
        assert_eq!(px.pixel(7, 5), Some(Rgba8::new(0, 0, 0, 255)));
        assert_eq!(px.pixel(3, 6), Some(Rgba8::TRANSPARENT));
    }
}
