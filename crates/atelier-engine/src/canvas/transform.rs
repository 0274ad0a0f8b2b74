use crate::error::{EngineError, EngineResult};
use crate::scene::{Args, Op};
use crate::transform::Mat3;

use super::Canvas;

impl Canvas {
    /// Saves the current transform.
    pub fn push(&mut self) -> u64 {
        self.transforms.push();
        self.record(Op::Push, Args::new())
    }

    /// Restores the last saved transform (resets to identity when nothing is saved).
    pub fn pop(&mut self) -> u64 {
        self.transforms.pop();
        self.record(Op::Pop, Args::new())
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> u64 {
        self.transforms.translate(dx, dy);
        self.record(Op::Translate, Args::new().with("x", dx).with("y", dy))
    }

    /// Rotation in radians.
    pub fn rotate(&mut self, angle: f64) -> u64 {
        self.transforms.rotate(angle);
        self.record(Op::Rotate, Args::new().with("angle", angle))
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> u64 {
        self.transforms.scale(sx, sy);
        self.record(Op::Scale, Args::new().with("x", sx).with("y", sy))
    }

    pub fn shear_x(&mut self, angle: f64) -> u64 {
        self.transforms.shear_x(angle);
        self.record(Op::ShearX, Args::new().with("angle", angle))
    }

    pub fn shear_y(&mut self, angle: f64) -> u64 {
        self.transforms.shear_y(angle);
        self.record(Op::ShearY, Args::new().with("angle", angle))
    }

    /// Multiplies the current transform by a caller-supplied matrix.
    ///
    /// - 6 values: `(a, b, c, d, e, f)`, implicit `[0, 0, 1]` last row
    /// - 9 values: row-major 3x3
    /// - 16 values: recorded for 3D-aware consumers; the 2D stack is left unchanged
    pub fn apply_matrix(&mut self, values: &[f64]) -> EngineResult<u64> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::validation("apply_matrix", "matrix values must be finite"));
        }
        match *values {
            [a, b, c, d, e, f] => self.transforms.apply(Mat3::from_affine(a, b, c, d, e, f)),
            [m0, m1, m2, m3, m4, m5, m6, m7, m8] => self
                .transforms
                .apply(Mat3::from_row_major(&[m0, m1, m2, m3, m4, m5, m6, m7, m8])),
            _ if values.len() == 16 => {
                log::debug!("apply_matrix: 4x4 matrix recorded without affecting the 2D stack");
            }
            _ => {
                return Err(EngineError::validation(
                    "apply_matrix",
                    format!("expected 6, 9 or 16 values, got {}", values.len()),
                ));
            }
        }
        Ok(self.record(Op::ApplyMatrix, Args::new().with("m", values.to_vec())))
    }

    /// Sets the current transform to identity.
    pub fn reset_matrix(&mut self) -> u64 {
        self.transforms.reset();
        self.record(Op::ResetMatrix, Args::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::Canvas;
    use crate::scene::Op;
    use crate::transform::Mat3;

    #[test]
    fn every_transform_records_exactly_one_command() {
        let mut c = Canvas::default();
        c.push();
        c.translate(1.0, 2.0);
        c.rotate(0.5);
        c.scale(2.0, 3.0);
        c.shear_x(0.1);
        c.shear_y(0.2);
        c.apply_matrix(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
        c.reset_matrix();
        c.pop();

        let ops: Vec<&Op> = c.commands().iter().map(|cmd| &cmd.op).collect();
        assert_eq!(
            ops,
            vec![
                &Op::Push,
                &Op::Translate,
                &Op::Rotate,
                &Op::Scale,
                &Op::ShearX,
                &Op::ShearY,
                &Op::ApplyMatrix,
                &Op::ResetMatrix,
                &Op::Pop,
            ]
        );
    }

    #[test]
    fn translate_pair_restores_matrix() {
        let mut c = Canvas::default();
        c.rotate(1.1);
        let before = c.current_matrix();
        c.translate(42.5, -17.25);
        c.translate(-42.5, 17.25);
        assert!(c.current_matrix().approx_eq(&before, 1e-9));
    }

    #[test]
    fn apply_matrix_accepts_nine_values() {
        let mut c = Canvas::default();
        c.apply_matrix(&[2.0, 0.0, 1.0, 0.0, 2.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        let (x, y) = c.current_matrix().transform_point(1.0, 1.0);
        assert_eq!((x, y), (3.0, 3.0));
    }

    #[test]
    fn apply_matrix_sixteen_values_leaves_stack_alone() {
        let mut c = Canvas::default();
        let mut m = vec![0.0; 16];
        m[0] = 5.0;
        c.apply_matrix(&m).unwrap();
        assert_eq!(c.current_matrix(), Mat3::IDENTITY);
        assert_eq!(c.commands().len(), 1);
    }

    #[test]
    fn apply_matrix_rejects_other_lengths() {
        let mut c = Canvas::default();
        assert!(c.apply_matrix(&[1.0, 2.0, 3.0]).unwrap_err().is_validation());
        assert!(c.commands().is_empty());
    }
}
