//! Shape tessellation into device-space polygons.
//!
//! Every shape becomes one or more convex polygons (fills) or quads (strokes).
//! Transforms are applied per vertex, so rotated/sheared shapes come out
//! exact without special cases in the backends.

use std::f64::consts::TAU;

use crate::transform::Mat3;

/// Device-space point.
pub type Point = [f32; 2];

/// Maps local-space points through `m`.
pub fn transform_all(m: &Mat3, local: &[(f64, f64)]) -> Vec<Point> {
    local
        .iter()
        .map(|&(x, y)| {
            let (tx, ty) = m.transform_point(x, y);
            [tx as f32, ty as f32]
        })
        .collect()
}

/// Corner-form rectangle as four transformed corners.
pub fn rect(m: &Mat3, x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    transform_all(m, &[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
}

/// Segment count for an ellipse whose largest device radius is `radius_px`.
pub fn ellipse_segments(radius_px: f64) -> usize {
    let n = (radius_px.max(0.0).sqrt() * 8.0).ceil() as usize;
    n.clamp(12, 256)
}

/// Center-form ellipse polygon (radii in local units).
pub fn ellipse(m: &Mat3, cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Point> {
    let n = ellipse_segments(rx.max(ry) * m.approx_scale());
    let local: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            (cx + rx * t.cos(), cy + ry * t.sin())
        })
        .collect();
    transform_all(m, &local)
}

/// Quad covering the segment `a..b` with the given device width.
///
/// Returns `None` for zero-length segments or non-positive widths.
pub fn thick_segment(a: Point, b: Point, width: f32) -> Option<[Point; 4]> {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON || width <= 0.0 {
        return None;
    }
    let half = width * 0.5;
    let (nx, ny) = (-dy / len * half, dx / len * half);
    Some([
        [a[0] + nx, a[1] + ny],
        [b[0] + nx, b[1] + ny],
        [b[0] - nx, b[1] - ny],
        [a[0] - nx, a[1] - ny],
    ])
}

/// Stroke quads for a closed polygon outline.
pub fn outline(points: &[Point], width: f32) -> Vec<[Point; 4]> {
    if points.len() < 2 {
        return Vec::new();
    }
    (0..points.len())
        .filter_map(|i| thick_segment(points[i], points[(i + 1) % points.len()], width))
        .collect()
}

/// Axis-aligned square centered on `c`.
pub fn square(c: Point, size: f32) -> [Point; 4] {
    let h = size * 0.5;
    [
        [c[0] - h, c[1] - h],
        [c[0] + h, c[1] - h],
        [c[0] + h, c[1] + h],
        [c[0] - h, c[1] + h],
    ]
}

/// Fan triangulation of a convex polygon, as a flat triangle list.
pub fn fan(polygon: &[Point]) -> Vec<Point> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity((polygon.len() - 2) * 3);
    for i in 1..polygon.len() - 1 {
        out.extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn horizontal_segment_expands_vertically() {
        let q = thick_segment([0.0, 0.0], [10.0, 0.0], 2.0).unwrap();
        assert_abs_diff_eq!(q[0][1], 1.0);
        assert_abs_diff_eq!(q[3][1], -1.0);
        assert_abs_diff_eq!(q[1][0], 10.0);
    }

    #[test]
    fn zero_length_segment_is_dropped() {
        assert!(thick_segment([1.0, 1.0], [1.0, 1.0], 3.0).is_none());
        assert!(thick_segment([0.0, 0.0], [1.0, 0.0], 0.0).is_none());
    }

    #[test]
    fn rect_follows_translation() {
        let pts = rect(&Mat3::translation(5.0, 5.0), 0.0, 0.0, 2.0, 3.0);
        assert_eq!(pts, vec![[5.0, 5.0], [7.0, 5.0], [7.0, 8.0], [5.0, 8.0]]);
    }

    #[test]
    fn ellipse_points_lie_on_curve() {
        let pts = ellipse(&Mat3::IDENTITY, 10.0, 10.0, 4.0, 2.0);
        assert!(pts.len() >= 12);
        for p in pts {
            let (x, y) = ((p[0] - 10.0) / 4.0, (p[1] - 10.0) / 2.0);
            assert_abs_diff_eq!(x * x + y * y, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn fan_yields_n_minus_two_triangles() {
        let quad = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert_eq!(fan(&quad).len(), 6);
        assert!(fan(&quad[..2]).is_empty());
    }
}
