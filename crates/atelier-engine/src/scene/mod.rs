//! Command buffer (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw and state-change commands
//! - sequence every recorded command with a lifetime-unique `seq`
//! - keep replayed setup commands distinguishable from fresh ones

mod args;
mod buffer;
mod cmd;

pub use args::{ArgValue, Args};
pub use buffer::CommandBuffer;
pub use cmd::{Command, CommandMeta, Op};
