//! Snapshot requests and file output.
//!
//! `Canvas::save_frame` queues a `PendingSnapshotRequest`; the engine hands
//! the queue to the `SnapshotOrchestrator`, which decides between deferred
//! capture (after compositing), immediate capture, CPU re-render and the
//! no-presenter no-op.

mod encode;
mod orchestrator;
mod path;

pub use encode::write_pixmap;
pub use orchestrator::{PendingSnapshotRequest, SnapshotOrchestrator, SnapshotRecord};
pub use path::{expand_template, PLACEHOLDER};
