//! 2D affine transforms.
//!
//! `Mat3` is a row-major 3x3 matrix acting on column vectors `[x, y, 1]`.
//! `TransformStack` is the pure save/restore structure; emitting the matching
//! commands is the canvas's job.

mod matrix;
mod stack;

pub use matrix::Mat3;
pub use stack::TransformStack;
