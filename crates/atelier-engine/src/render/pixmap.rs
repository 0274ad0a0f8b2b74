use crate::paint::Rgba8;

use super::tessellate::Point;

/// In-memory straight-alpha RGBA surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Pixmap {
    /// Transparent pixmap of the given size (at least 1x1).
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Wraps tightly packed RGBA bytes. Returns `None` on a length mismatch.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]))
            .collect();
        Some(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Overwrites every pixel (blending against what was there when `color`
    /// is translucent).
    pub fn fill(&mut self, color: Rgba8) {
        for p in &mut self.pixels {
            *p = color.over(*p);
        }
    }

    /// Blends one pixel; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize) * self.width as usize + x as usize;
        self.pixels[idx] = color.over(self.pixels[idx]);
    }

    /// Blends a horizontal span `[x0, x1)` on row `y`.
    pub fn blend_span(&mut self, y: i64, x0: i64, x1: i64, color: Rgba8) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i64);
        for x in x0..x1 {
            self.blend(x, y, color);
        }
    }

    /// Scan-converts a polygon with pixel-center sampling and the even-odd rule.
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba8) {
        if points.len() < 3 || color.a == 0 {
            return;
        }

        let (mut y_min, mut y_max) = (f32::INFINITY, f32::NEG_INFINITY);
        for p in points {
            y_min = y_min.min(p[1]);
            y_max = y_max.max(p[1]);
        }
        let row_start = (y_min - 0.5).ceil().max(0.0) as i64;
        let row_end = ((y_max - 0.5).floor() as i64).min(self.height as i64 - 1);

        let mut crossings: Vec<f32> = Vec::with_capacity(8);
        for row in row_start..=row_end {
            let sy = row as f32 + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                // Half-open rule so shared vertices count once.
                let (lo, hi) = if a[1] <= b[1] { (*a, b) } else { (b, *a) };
                if sy < lo[1] || sy >= hi[1] {
                    continue;
                }
                let t = (sy - lo[1]) / (hi[1] - lo[1]);
                crossings.push(lo[0] + t * (hi[0] - lo[0]));
            }

            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let x0 = (pair[0] - 0.5).ceil() as i64;
                let x1 = (pair[1] - 0.5).ceil() as i64;
                self.blend_span(row, x0, x1, color);
            }
        }
    }

    /// One-pixel Bresenham line.
    ///
    /// The segment is clipped to the surface (plus a one-pixel margin) before
    /// it is rounded, so the walk is bounded by the surface size whatever the
    /// endpoints are. Non-finite endpoints draw nothing.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba8) {
        let Some(((x0, y0), (x1, y1))) = self.clip_segment(from, to) else {
            return;
        };
        let (x0, y0) = (x0.round() as i64, y0.round() as i64);
        let (x1, y1) = (x1.round() as i64, y1.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);

        loop {
            self.blend(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cohen-Sutherland clip against `[-1, width] x [-1, height]`.
    ///
    /// Intersections are interpolated with a ratio in `[0, 1]` and the clipped
    /// coordinate is snapped onto the edge, so huge endpoints keep their
    /// direction instead of collapsing through cancellation.
    fn clip_segment(
        &self,
        from: (f64, f64),
        to: (f64, f64),
    ) -> Option<((f64, f64), (f64, f64))> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const TOP: u8 = 4;
        const BOTTOM: u8 = 8;

        let (min, max_x, max_y) = (-1.0, self.width as f64, self.height as f64);
        let outcode = |(x, y): (f64, f64)| {
            let mut code = 0;
            if x < min {
                code |= LEFT;
            } else if x > max_x {
                code |= RIGHT;
            }
            if y < min {
                code |= TOP;
            } else if y > max_y {
                code |= BOTTOM;
            }
            code
        };

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if ![from.0, from.1, dx, dy].iter().all(|v| v.is_finite()) {
            return None;
        }

        let (mut a, mut b) = (from, to);
        // Every pass snaps one endpoint onto an edge; four edges per endpoint.
        for _ in 0..8 {
            let (ca, cb) = (outcode(a), outcode(b));
            if ca | cb == 0 {
                return Some((a, b));
            }
            if ca & cb != 0 {
                return None;
            }

            let code = if ca != 0 { ca } else { cb };
            let (x0, y0) = a;
            let (x1, y1) = b;
            let p = if code & TOP != 0 {
                (x0 + (x1 - x0) * ((min - y0) / (y1 - y0)), min)
            } else if code & BOTTOM != 0 {
                (x0 + (x1 - x0) * ((max_y - y0) / (y1 - y0)), max_y)
            } else if code & LEFT != 0 {
                (min, y0 + (y1 - y0) * ((min - x0) / (x1 - x0)))
            } else {
                (max_x, y0 + (y1 - y0) * ((max_x - x0) / (x1 - x0)))
            };

            if code == ca {
                a = p;
            } else {
                b = p;
            }
        }
        None
    }

    /// Raw RGBA bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels[(y * self.width + x) as usize].to_array())
        })
    }
}
