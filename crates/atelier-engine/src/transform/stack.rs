use super::Mat3;

/// Nested save/restore stack of affine matrices.
///
/// Invariant: the stack is never empty; the bottom entry starts as identity.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat3>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat3::IDENTITY],
        }
    }

    /// Returns the identity matrix.
    #[inline]
    pub fn identity() -> Mat3 {
        Mat3::IDENTITY
    }

    /// Current (top) matrix.
    #[inline]
    pub fn top(&self) -> Mat3 {
        *self.top_ref()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Duplicates the top entry.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Removes the top entry; the sole remaining entry is reset to identity instead.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            *self.top_mut() = Mat3::IDENTITY;
        }
    }

    /// Right-multiplies the top matrix by `m`.
    pub fn apply(&mut self, m: Mat3) {
        let top = self.top_mut();
        *top = *top * m;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.apply(Mat3::translation(dx, dy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.apply(Mat3::rotation(angle));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.apply(Mat3::scaling(sx, sy));
    }

    pub fn shear_x(&mut self, angle: f64) {
        self.apply(Mat3::shear_x(angle));
    }

    pub fn shear_y(&mut self, angle: f64) {
        self.apply(Mat3::shear_y(angle));
    }

    /// Sets the top entry to identity; entries below are untouched.
    pub fn reset(&mut self) {
        *self.top_mut() = Mat3::IDENTITY;
    }

    /// Drops every saved entry and returns to a single identity.
    pub fn clear(&mut self) {
        self.stack.truncate(1);
        self.reset();
    }

    fn top_ref(&self) -> &Mat3 {
        // Non-empty by construction; `pop` never removes the last entry.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat3 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── push / pop ────────────────────────────────────────────────────────

    #[test]
    fn push_duplicates_top() {
        let mut ts = TransformStack::new();
        ts.translate(5.0, 5.0);
        ts.push();
        assert_eq!(ts.depth(), 2);
        assert_eq!(ts.top(), Mat3::translation(5.0, 5.0));
    }

    #[test]
    fn pop_restores_saved_matrix() {
        let mut ts = TransformStack::new();
        ts.translate(1.0, 2.0);
        ts.push();
        ts.rotate(1.0);
        ts.pop();
        assert_eq!(ts.top(), Mat3::translation(1.0, 2.0));
    }

    #[test]
    fn pop_on_sole_entry_resets_to_identity() {
        let mut ts = TransformStack::new();
        ts.scale(3.0, 3.0);
        ts.pop();
        assert_eq!(ts.depth(), 1);
        assert_eq!(ts.top(), Mat3::IDENTITY);

        // Repeated pops never underflow.
        ts.pop();
        ts.pop();
        assert_eq!(ts.depth(), 1);
    }

    // ── mutation ──────────────────────────────────────────────────────────

    #[test]
    fn translate_round_trip_restores_top() {
        let mut ts = TransformStack::new();
        ts.rotate(0.7);
        ts.scale(1.5, 0.5);
        let before = ts.top();

        ts.translate(13.25, -7.5);
        ts.translate(-13.25, 7.5);

        assert!(ts.top().approx_eq(&before, 1e-9));
    }

    #[test]
    fn reset_only_touches_top() {
        let mut ts = TransformStack::new();
        ts.translate(4.0, 4.0);
        ts.push();
        ts.scale(2.0, 2.0);
        ts.reset();
        assert_eq!(ts.top(), Mat3::IDENTITY);
        ts.pop();
        assert_eq!(ts.top(), Mat3::translation(4.0, 4.0));
    }
}
