use std::fmt;

use super::Args;

/// Command tag.
///
/// Extending the command set:
/// - add a variant here and its `name()`
/// - emit it from a `Canvas` method
/// - teach `render::replay` to interpret it (unknown tags are skipped)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Background,
    Rect,
    Ellipse,
    Circle,
    Line,
    Point,

    Push,
    Pop,
    Translate,
    Rotate,
    Scale,
    ShearX,
    ShearY,
    ApplyMatrix,
    ResetMatrix,

    /// Caller-defined tag. Backends skip tags they do not understand.
    Custom(String),
}

impl Op {
    pub fn name(&self) -> &str {
        match self {
            Op::Background => "background",
            Op::Rect => "rect",
            Op::Ellipse => "ellipse",
            Op::Circle => "circle",
            Op::Line => "line",
            Op::Point => "point",
            Op::Push => "push",
            Op::Pop => "pop",
            Op::Translate => "translate",
            Op::Rotate => "rotate",
            Op::Scale => "scale",
            Op::ShearX => "shear_x",
            Op::ShearY => "shear_y",
            Op::ApplyMatrix => "apply_matrix",
            Op::ResetMatrix => "reset_matrix",
            Op::Custom(name) => name,
        }
    }

    /// True for ops that mutate the transform stack during replay.
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Op::Push
                | Op::Pop
                | Op::Translate
                | Op::Rotate
                | Op::Scale
                | Op::ShearX
                | Op::ShearY
                | Op::ApplyMatrix
                | Op::ResetMatrix
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bookkeeping attached to every recorded command.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CommandMeta {
    /// Buffer-lifetime sequence number, strictly increasing.
    pub seq: u64,
    /// Frame the command was drawn in. Assigned after the draw pass;
    /// setup-time commands stay `None`.
    pub frame: Option<u64>,
}

/// One recorded drawing or state-change operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub op: Op,
    pub args: Args,
    pub meta: CommandMeta,
}

impl Command {
    #[inline]
    pub fn seq(&self) -> u64 {
        self.meta.seq
    }

    #[inline]
    pub fn is_background(&self) -> bool {
        self.op == Op::Background
    }
}
