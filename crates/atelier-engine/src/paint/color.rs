/// Sketch-facing color argument.
///
/// Components are in `0..=255`. Out-of-range values are clamped during
/// normalization, never rejected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorArg {
    Gray(f64),
    GrayAlpha(f64, f64),
    Rgb(f64, f64, f64),
    Rgba(f64, f64, f64, f64),
}

impl ColorArg {
    /// Builds a color from a channel slice: 1 = gray, 2 = gray + alpha,
    /// 3 = rgb, 4 = rgba. Any other length yields `None`.
    pub fn from_channels(channels: &[f64]) -> Option<Self> {
        match *channels {
            [v] => Some(Self::Gray(v)),
            [v, a] => Some(Self::GrayAlpha(v, a)),
            [r, g, b] => Some(Self::Rgb(r, g, b)),
            [r, g, b, a] => Some(Self::Rgba(r, g, b, a)),
            _ => None,
        }
    }

    /// Expands to straight `(r, g, b, a)` in `0..=255`.
    pub fn channels(self) -> [f64; 4] {
        match self {
            Self::Gray(v) => [v, v, v, 255.0],
            Self::GrayAlpha(v, a) => [v, v, v, a],
            Self::Rgb(r, g, b) => [r, g, b, 255.0],
            Self::Rgba(r, g, b, a) => [r, g, b, a],
        }
    }

    pub fn is_finite(self) -> bool {
        self.channels().iter().all(|c| c.is_finite())
    }

    /// Normalizes to 8-bit straight alpha (pixmap backends).
    pub fn to_rgba8(self) -> Rgba8 {
        let [r, g, b, a] = self.channels().map(|c| c.clamp(0.0, 255.0).round() as u8);
        Rgba8 { r, g, b, a }
    }

    /// Normalizes to premultiplied float color (GPU backend).
    pub fn to_color(self) -> Color {
        let [r, g, b, a] = self.channels().map(|c| (c / 255.0) as f32);
        Color::from_straight(r, g, b, a)
    }
}

impl From<f64> for ColorArg {
    fn from(v: f64) -> Self {
        Self::Gray(v)
    }
}

impl From<(f64, f64)> for ColorArg {
    fn from((v, a): (f64, f64)) -> Self {
        Self::GrayAlpha(v, a)
    }
}

impl From<(f64, f64, f64)> for ColorArg {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self::Rgb(r, g, b)
    }
}

impl From<(f64, f64, f64, f64)> for ColorArg {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Self::Rgba(r, g, b, a)
    }
}

impl From<[u8; 3]> for ColorArg {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::Rgb(r.into(), g.into(), b.into())
    }
}

impl From<[u8; 4]> for ColorArg {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::Rgba(r.into(), g.into(), b.into(), a.into())
    }
}

/// Gray used by windowed presenters when the sketch never paints a background.
pub const DEFAULT_BACKGROUND: ColorArg = ColorArg::Gray(204.0);

/// 8-bit straight-alpha RGBA pixel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over blend of `self` onto `dst` (both straight alpha).
    pub fn over(self, dst: Rgba8) -> Rgba8 {
        match self.a {
            255 => self,
            0 => dst,
            _ => {
                let sa = self.a as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                if out_a <= 0.0 {
                    return Rgba8::TRANSPARENT;
                }
                let mix = |s: u8, d: u8| {
                    let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                Rgba8 {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
                }
            }
        }
    }
}

/// Premultiplied RGBA color.
///
/// Invariant: `rgb` components are multiplied by `a`. Matches the premultiplied
/// blend state of the GPU pipeline.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Clear value for render passes (wgpu expects premultiplied for our blend setup).
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ColorArg normalization ────────────────────────────────────────────

    #[test]
    fn gray_expands_to_opaque_rgb() {
        assert_eq!(ColorArg::Gray(128.0).to_rgba8(), Rgba8::new(128, 128, 128, 255));
    }

    #[test]
    fn gray_alpha_keeps_alpha() {
        assert_eq!(ColorArg::GrayAlpha(10.0, 20.0).to_rgba8(), Rgba8::new(10, 10, 10, 20));
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(
            ColorArg::Rgba(-5.0, 300.0, 12.4, 255.0).to_rgba8(),
            Rgba8::new(0, 255, 12, 255)
        );
    }

    #[test]
    fn from_channels_rejects_bad_lengths() {
        assert!(ColorArg::from_channels(&[]).is_none());
        assert!(ColorArg::from_channels(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
        assert_eq!(ColorArg::from_channels(&[1.0, 2.0, 3.0]), Some(ColorArg::Rgb(1.0, 2.0, 3.0)));
    }

    #[test]
    fn to_color_is_premultiplied() {
        let c = ColorArg::Rgba(255.0, 0.0, 0.0, 127.5).to_color();
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);
    }

    // ── blending ──────────────────────────────────────────────────────────

    #[test]
    fn opaque_source_replaces_destination() {
        let src = Rgba8::new(1, 2, 3, 255);
        assert_eq!(src.over(Rgba8::new(200, 200, 200, 255)), src);
    }

    #[test]
    fn half_alpha_mixes_with_opaque_destination() {
        let out = Rgba8::new(255, 0, 0, 128).over(Rgba8::new(0, 0, 255, 255));
        assert_eq!(out.a, 255);
        assert!(out.r > 120 && out.r < 135);
        assert!(out.b > 120 && out.b < 135);
    }
}
