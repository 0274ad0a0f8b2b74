//! Shared command interpretation.
//!
//! Walks a frame's commands in order and reduces them to device-space
//! primitives. Unknown ops and commands with missing or unusable arguments
//! are skipped (logged at debug) and never abort the frame.
//!
//! Transform state starts at identity and is reset whenever the frame tag
//! changes between consecutive commands. The canvas clears its stack at the
//! start of every pass, so the untagged setup prefix and the tagged draw
//! commands each replay against the matrix they were recorded under.

use crate::error::{EngineError, EngineResult};
use crate::paint::{ColorArg, Rgba8};
use crate::scene::{Command, Op};
use crate::transform::{Mat3, TransformStack};

use super::tessellate::{self, Point};

/// Backend-neutral drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Paint the whole surface (blended when translucent).
    Clear(Rgba8),
    /// Convex polygon in device pixels.
    Polygon { points: Vec<Point>, color: Rgba8 },
}

/// Result of replaying one command list.
#[derive(Debug, Clone, Default)]
pub struct ReplayOutput {
    pub primitives: Vec<Primitive>,
    pub applied: usize,
    pub skipped: usize,
}

/// Fill/stroke resolved for one shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ShapeStyle {
    pub fill: Option<Rgba8>,
    pub stroke: Option<Rgba8>,
    pub weight: f64,
}

impl ShapeStyle {
    /// Reads `fill` / `stroke` / `stroke_weight`; absent keys fall back to the
    /// canvas defaults (white fill, black 1px stroke).
    pub(crate) fn from_command(cmd: &Command) -> EngineResult<Self> {
        let fill = color_or(cmd, "fill", Some(ColorArg::Gray(255.0)))?;
        let stroke = color_or(cmd, "stroke", Some(ColorArg::Gray(0.0)))?;
        let weight = match cmd.args.get("stroke_weight") {
            None => 1.0,
            Some(_) => require(cmd, "stroke_weight")?.max(0.0),
        };
        Ok(Self {
            fill: fill.map(ColorArg::to_rgba8),
            stroke: stroke.map(ColorArg::to_rgba8),
            weight,
        })
    }
}

pub(crate) fn malformed(cmd: &Command, message: impl Into<String>) -> EngineError {
    EngineError::MalformedCommand {
        op: cmd.op.name().to_string(),
        seq: cmd.seq(),
        message: message.into(),
    }
}

/// Finite numeric argument or a `MalformedCommand` error.
pub(crate) fn require(cmd: &Command, name: &str) -> EngineResult<f64> {
    cmd.args
        .num(name)
        .ok_or_else(|| malformed(cmd, format!("missing or non-finite `{name}`")))
}

fn color_or(cmd: &Command, name: &str, default: Option<ColorArg>) -> EngineResult<Option<ColorArg>> {
    if cmd.args.get(name).is_none() {
        return Ok(default);
    }
    match cmd.args.color(name) {
        Some(Some(c)) if c.is_finite() => Ok(Some(c)),
        Some(None) => Ok(None),
        _ => Err(malformed(cmd, format!("unusable color `{name}`"))),
    }
}

/// Replays `commands` into primitives.
pub fn replay(commands: &[Command]) -> ReplayOutput {
    let mut r = Replayer::default();
    for cmd in commands {
        r.step(cmd);
    }
    r.out
}

#[derive(Default)]
struct Replayer {
    stack: TransformStack,
    tag: Option<Option<u64>>,
    out: ReplayOutput,
}

impl Replayer {
    fn step(&mut self, cmd: &Command) {
        if self.tag.is_some_and(|t| t != cmd.meta.frame) {
            self.stack.clear();
        }
        self.tag = Some(cmd.meta.frame);

        match self.apply(cmd) {
            Ok(true) => self.out.applied += 1,
            Ok(false) => {
                log::debug!("replay: skipping unknown op `{}` (seq {})", cmd.op, cmd.seq());
                self.out.skipped += 1;
            }
            Err(err) => {
                log::debug!("replay: {err}");
                self.out.skipped += 1;
            }
        }
    }

    /// `Ok(false)` means the op is not understood by this replayer.
    fn apply(&mut self, cmd: &Command) -> EngineResult<bool> {
        let m = self.stack.top();
        match &cmd.op {
            Op::Background => {
                let color = match cmd.args.color("color") {
                    Some(Some(c)) if c.is_finite() => c,
                    _ => return Err(malformed(cmd, "background needs a color")),
                };
                self.out.primitives.push(Primitive::Clear(color.to_rgba8()));
            }

            Op::Rect => {
                let (x, y) = (require(cmd, "x")?, require(cmd, "y")?);
                let (w, h) = (require(cmd, "w")?, require(cmd, "h")?);
                let style = ShapeStyle::from_command(cmd)?;
                self.shape(tessellate::rect(&m, x, y, w, h), style, &m);
            }

            Op::Ellipse => {
                let (x, y) = (require(cmd, "x")?, require(cmd, "y")?);
                let (w, h) = (require(cmd, "w")?, require(cmd, "h")?);
                let style = ShapeStyle::from_command(cmd)?;
                let pts = tessellate::ellipse(&m, x, y, w.abs() * 0.5, h.abs() * 0.5);
                self.shape(pts, style, &m);
            }

            Op::Circle => {
                let (x, y, r) = (require(cmd, "x")?, require(cmd, "y")?, require(cmd, "r")?);
                let style = ShapeStyle::from_command(cmd)?;
                let r = r.abs();
                self.shape(tessellate::ellipse(&m, x, y, r, r), style, &m);
            }

            Op::Line => {
                let (x1, y1) = (require(cmd, "x1")?, require(cmd, "y1")?);
                let (x2, y2) = (require(cmd, "x2")?, require(cmd, "y2")?);
                let style = ShapeStyle::from_command(cmd)?;
                if let Some(color) = style.stroke {
                    let ends = tessellate::transform_all(&m, &[(x1, y1), (x2, y2)]);
                    let width = (style.weight * m.approx_scale()) as f32;
                    if let Some(quad) = tessellate::thick_segment(ends[0], ends[1], width) {
                        self.polygon(quad.to_vec(), color);
                    }
                }
            }

            Op::Point => {
                let (x, y) = (require(cmd, "x")?, require(cmd, "y")?);
                let style = ShapeStyle::from_command(cmd)?;
                if let Some(color) = style.stroke {
                    let (px, py) = m.transform_point(x, y);
                    let size = ((style.weight * m.approx_scale()) as f32).max(1.0);
                    self.polygon(tessellate::square([px as f32, py as f32], size).to_vec(), color);
                }
            }

            Op::Push => self.stack.push(),
            Op::Pop => self.stack.pop(),
            Op::Translate => self.stack.translate(require(cmd, "x")?, require(cmd, "y")?),
            Op::Rotate => self.stack.rotate(require(cmd, "angle")?),
            Op::Scale => self.stack.scale(require(cmd, "x")?, require(cmd, "y")?),
            Op::ShearX => self.stack.shear_x(require(cmd, "angle")?),
            Op::ShearY => self.stack.shear_y(require(cmd, "angle")?),
            Op::ResetMatrix => self.stack.reset(),

            Op::ApplyMatrix => {
                let values = cmd
                    .args
                    .nums("m")
                    .ok_or_else(|| malformed(cmd, "missing matrix values `m`"))?;
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(malformed(cmd, "non-finite matrix value"));
                }
                match *values {
                    [a, b, c, d, e, f] => self.stack.apply(Mat3::from_affine(a, b, c, d, e, f)),
                    [m0, m1, m2, m3, m4, m5, m6, m7, m8] => self
                        .stack
                        .apply(Mat3::from_row_major(&[m0, m1, m2, m3, m4, m5, m6, m7, m8])),
                    _ if values.len() == 16 => {}
                    _ => return Err(malformed(cmd, format!("{} matrix values", values.len()))),
                }
            }

            Op::Custom(_) => return Ok(false),
        }
        Ok(true)
    }

    fn shape(&mut self, points: Vec<Point>, style: ShapeStyle, m: &Mat3) {
        if let Some(color) = style.stroke {
            let width = (style.weight * m.approx_scale()) as f32;
            let quads = tessellate::outline(&points, width);
            if let Some(fill) = style.fill {
                self.polygon(points, fill);
            }
            for q in quads {
                self.polygon(q.to_vec(), color);
            }
        } else if let Some(fill) = style.fill {
            self.polygon(points, fill);
        }
    }

    fn polygon(&mut self, points: Vec<Point>, color: Rgba8) {
        if color.a > 0 {
            self.out.primitives.push(Primitive::Polygon { points, color });
        }
    }
}

/// Matrix in effect after replaying `commands` (same reset rule as `replay`).
pub(crate) fn final_matrix(commands: &[Command]) -> Mat3 {
    let mut r = Replayer::default();
    for cmd in commands {
        r.step(cmd);
    }
    r.stack.top()
}
