use std::ops::Mul;

/// Row-major 3x3 matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Mat3([[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]])
    }

    /// Rotation by `angle` radians (clockwise on screen, +Y down).
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    #[inline]
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Mat3([[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn shear_x(angle: f64) -> Self {
        Mat3([[1.0, angle.tan(), 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn shear_y(angle: f64) -> Self {
        Mat3([[1.0, 0.0, 0.0], [angle.tan(), 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Canvas-style six-number form: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
    #[inline]
    pub const fn from_affine(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Mat3([[a, c, e], [b, d, f], [0.0, 0.0, 1.0]])
    }

    /// Row-major nine-number form.
    pub fn from_row_major(m: &[f64; 9]) -> Self {
        Mat3([[m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]]])
    }

    /// Maps a point (projective divide included for completeness).
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.0;
        let tx = m[0][0] * x + m[0][1] * y + m[0][2];
        let ty = m[1][0] * x + m[1][1] * y + m[1][2];
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        if w != 0.0 && w != 1.0 {
            (tx / w, ty / w)
        } else {
            (tx, ty)
        }
    }

    /// Approximate uniform scale factor (geometric mean of the axis scales).
    pub fn approx_scale(&self) -> f64 {
        let m = &self.0;
        let det = (m[0][0] * m[1][1] - m[0][1] * m[1][0]).abs();
        det.sqrt()
    }

    pub fn approx_eq(&self, other: &Mat3, eps: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Mat3(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_is_neutral() {
        let m = Mat3::translation(3.0, 4.0) * Mat3::rotation(0.3);
        assert_eq!(m * Mat3::IDENTITY, m);
        assert_eq!(Mat3::IDENTITY * m, m);
    }

    #[test]
    fn translation_moves_points() {
        let (x, y) = Mat3::translation(2.0, -1.0).transform_point(1.0, 1.0);
        assert_abs_diff_eq!(x, 3.0);
        assert_abs_diff_eq!(y, 0.0);
    }

    #[test]
    fn right_multiplication_applies_local_transform_first() {
        // translate then scale: the scale acts in the translated frame.
        let m = Mat3::translation(10.0, 0.0) * Mat3::scaling(2.0, 2.0);
        let (x, y) = m.transform_point(1.0, 1.0);
        assert_abs_diff_eq!(x, 12.0);
        assert_abs_diff_eq!(y, 2.0);
    }

    #[test]
    fn quarter_rotation_maps_x_axis_to_y_axis() {
        let (x, y) = Mat3::rotation(std::f64::consts::FRAC_PI_2).transform_point(1.0, 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn affine_six_number_layout() {
        let m = Mat3::from_affine(1.0, 0.0, 0.0, 1.0, 5.0, 6.0);
        assert_eq!(m, Mat3::translation(5.0, 6.0));
    }

    #[test]
    fn approx_scale_of_uniform_scale() {
        assert_abs_diff_eq!(Mat3::scaling(3.0, 3.0).approx_scale(), 3.0);
    }
}
