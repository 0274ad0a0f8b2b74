use crate::error::{EngineError, EngineResult};
use crate::paint::ColorArg;
use crate::scene::{Args, Op};

use super::Canvas;

fn ensure_finite(primitive: &'static str, values: &[f64]) -> EngineResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EngineError::validation(primitive, "coordinates must be finite"))
    }
}

fn ensure_color(primitive: &'static str, color: ColorArg) -> EngineResult<ColorArg> {
    if color.is_finite() {
        Ok(color)
    } else {
        Err(EngineError::validation(primitive, "color channels must be finite"))
    }
}

impl Canvas {
    // ── style ─────────────────────────────────────────────────────────────

    pub fn fill(&mut self, color: impl Into<ColorArg>) -> EngineResult<()> {
        self.style.fill = Some(ensure_color("fill", color.into())?);
        Ok(())
    }

    pub fn no_fill(&mut self) {
        self.style.fill = None;
    }

    pub fn stroke(&mut self, color: impl Into<ColorArg>) -> EngineResult<()> {
        self.style.stroke = Some(ensure_color("stroke", color.into())?);
        Ok(())
    }

    pub fn no_stroke(&mut self) {
        self.style.stroke = None;
    }

    pub fn stroke_weight(&mut self, weight: f64) -> EngineResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EngineError::validation(
                "stroke_weight",
                format!("weight must be finite and non-negative, got {weight}"),
            ));
        }
        self.style.stroke_weight = weight;
        Ok(())
    }

    /// Shape args carrying the current style.
    fn styled(&self, args: Args) -> Args {
        args.with("fill", self.style.fill)
            .with("stroke", self.style.stroke)
            .with("stroke_weight", self.style.stroke_weight)
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Fills the whole canvas, ignoring the current transform.
    pub fn background(&mut self, color: impl Into<ColorArg>) -> EngineResult<u64> {
        let color = ensure_color("background", color.into())?;
        Ok(self.record(Op::Background, Args::new().with("color", color)))
    }

    /// Corner-form rectangle.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> EngineResult<u64> {
        ensure_finite("rect", &[x, y, w, h])?;
        if w <= 0.0 || h <= 0.0 {
            return Err(EngineError::validation(
                "rect",
                format!("width and height must be positive, got {w}x{h}"),
            ));
        }
        let args = Args::new().with("x", x).with("y", y).with("w", w).with("h", h);
        Ok(self.record(Op::Rect, self.styled(args)))
    }

    /// Center-form ellipse.
    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) -> EngineResult<u64> {
        ensure_finite("ellipse", &[x, y, w, h])?;
        if w <= 0.0 || h <= 0.0 {
            return Err(EngineError::validation(
                "ellipse",
                format!("width and height must be positive, got {w}x{h}"),
            ));
        }
        let args = Args::new().with("x", x).with("y", y).with("w", w).with("h", h);
        Ok(self.record(Op::Ellipse, self.styled(args)))
    }

    pub fn circle(&mut self, x: f64, y: f64, r: f64) -> EngineResult<u64> {
        ensure_finite("circle", &[x, y, r])?;
        if r <= 0.0 {
            return Err(EngineError::validation(
                "circle",
                format!("radius must be positive, got {r}"),
            ));
        }
        let args = Args::new().with("x", x).with("y", y).with("r", r);
        Ok(self.record(Op::Circle, self.styled(args)))
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> EngineResult<u64> {
        ensure_finite("line", &[x1, y1, x2, y2])?;
        if x1 == x2 && y1 == y2 {
            return Err(EngineError::validation(
                "line",
                format!("zero-length line at ({x1}, {y1})"),
            ));
        }
        let args = Args::new()
            .with("x1", x1)
            .with("y1", y1)
            .with("x2", x2)
            .with("y2", y2)
            .with("stroke", self.style.stroke)
            .with("stroke_weight", self.style.stroke_weight);
        Ok(self.record(Op::Line, args))
    }

    /// A dot of the current stroke color and weight.
    pub fn point(&mut self, x: f64, y: f64) -> EngineResult<u64> {
        ensure_finite("point", &[x, y])?;
        let args = Args::new()
            .with("x", x)
            .with("y", y)
            .with("stroke", self.style.stroke)
            .with("stroke_weight", self.style.stroke_weight);
        Ok(self.record(Op::Point, args))
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::Canvas;
    use crate::paint::ColorArg;
    use crate::scene::{ArgValue, Op};

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn zero_length_line_is_rejected() {
        let mut c = Canvas::default();
        let err = c.line(5.0, 5.0, 5.0, 5.0).unwrap_err();
        assert!(err.is_validation());
        assert!(c.commands().is_empty());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut c = Canvas::default();
        assert!(c.circle(0.0, 0.0, -1.0).unwrap_err().is_validation());
        assert!(c.circle(0.0, 0.0, 0.0).unwrap_err().is_validation());
    }

    #[test]
    fn non_positive_rect_is_rejected() {
        let mut c = Canvas::default();
        assert!(c.rect(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(c.rect(0.0, 0.0, 10.0, -3.0).is_err());
        assert!(c.ellipse(0.0, 0.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        let mut c = Canvas::default();
        assert!(c.point(f64::NAN, 0.0).is_err());
        assert!(c.stroke_weight(-1.0).is_err());
        assert!(c.fill(f64::INFINITY).is_err());
    }

    // ── style forwarding ──────────────────────────────────────────────────

    #[test]
    fn shapes_carry_current_style() {
        let mut c = Canvas::default();
        c.fill((10.0, 20.0, 30.0)).unwrap();
        c.no_stroke();
        c.stroke_weight(4.0).unwrap();
        c.rect(1.0, 2.0, 3.0, 4.0).unwrap();

        let cmd = &c.commands()[0];
        assert_eq!(cmd.op, Op::Rect);
        assert_eq!(cmd.args.color("fill"), Some(Some(ColorArg::Rgb(10.0, 20.0, 30.0))));
        assert_eq!(cmd.args.get("stroke"), Some(&ArgValue::None));
        assert_eq!(cmd.args.num("stroke_weight"), Some(4.0));
    }

    #[test]
    fn style_setters_do_not_record() {
        let mut c = Canvas::default();
        c.fill(1.0).unwrap();
        c.stroke(2.0).unwrap();
        c.no_fill();
        assert!(c.commands().is_empty());
    }
}
