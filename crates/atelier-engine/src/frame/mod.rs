//! Frame lifecycle.
//!
//! Drives setup-once execution, the should-draw decision, the setup replay
//! prefix, frame tagging and the frame counter.

mod controller;
mod setup;
mod state;

pub use controller::{FrameController, TickOutcome};
pub use setup::SetupCapture;
pub use state::{DrawReason, FrameState};
