use std::path::PathBuf;

use crate::error::EngineResult;
use crate::render::{BackendKind, CpuPresenter, PresenterChain};
use crate::scene::Command;

use super::encode::write_pixmap;

/// A `save_frame` call waiting to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSnapshotRequest {
    /// Template already expanded for the requesting frame.
    pub target_path: PathBuf,
    /// Requested from inside `update()` / `draw()`.
    pub enqueued_during_draw: bool,
}

/// Outcome of one snapshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub path: PathBuf,
    pub frame: u64,
    /// Backend whose pixels were written; `None` when no presenter existed
    /// and the request degraded to a no-op.
    pub backend: Option<BackendKind>,
    /// Fulfilled after compositing rather than immediately.
    pub deferred: bool,
}

/// Resolves snapshot requests against the presenter chain.
#[derive(Debug, Default)]
pub struct SnapshotOrchestrator {
    deferred: Vec<PendingSnapshotRequest>,
    records: Vec<SnapshotRecord>,
}

impl SnapshotOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed requests, oldest first.
    #[inline]
    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Routes freshly queued requests.
    ///
    /// Draw-time requests wait for `fulfill_deferred` when a presenter exists;
    /// everything else is resolved now against `commands`.
    pub fn submit(
        &mut self,
        requests: Vec<PendingSnapshotRequest>,
        chain: &mut PresenterChain<'_>,
        commands: &[Command],
        frame: u64,
    ) {
        for request in requests {
            if request.enqueued_during_draw && chain.kind().is_some() {
                self.deferred.push(request);
            } else {
                self.immediate(request, chain, commands, frame);
            }
        }
    }

    /// Writes every deferred request from the just-composited surface.
    pub fn fulfill_deferred(
        &mut self,
        chain: &mut PresenterChain<'_>,
        commands: &[Command],
        frame: u64,
    ) {
        for request in std::mem::take(&mut self.deferred) {
            self.capture_and_write(request.target_path, chain, commands, frame, true);
        }
    }

    /// Resolves one request right away.
    pub fn immediate(
        &mut self,
        request: PendingSnapshotRequest,
        chain: &mut PresenterChain<'_>,
        commands: &[Command],
        frame: u64,
    ) {
        if chain.kind().is_none() {
            log::info!("snapshot {} recorded without output: no presenter", request.target_path.display());
            self.records.push(SnapshotRecord {
                path: request.target_path,
                frame,
                backend: None,
                deferred: false,
            });
            return;
        }

        if !chain.has_surface() {
            chain.render(commands);
        }
        self.capture_and_write(request.target_path, chain, commands, frame, false);
    }

    fn capture_and_write(
        &mut self,
        path: PathBuf,
        chain: &mut PresenterChain<'_>,
        commands: &[Command],
        frame: u64,
        deferred: bool,
    ) {
        match write_snapshot(&path, chain, commands) {
            Ok((written, backend)) => self.records.push(SnapshotRecord {
                path: written,
                frame,
                backend: Some(backend),
                deferred,
            }),
            Err(err) => log::error!("snapshot {} failed: {err}", path.display()),
        }
    }
}

/// Captures from the active presenter, falling back to a CPU re-render of
/// the full command list.
fn write_snapshot(
    path: &std::path::Path,
    chain: &mut PresenterChain<'_>,
    commands: &[Command],
) -> EngineResult<(PathBuf, BackendKind)> {
    let captured = match chain.capture() {
        Some(Ok(captured)) => Some(captured),
        Some(Err(err)) => {
            log::warn!("capture failed ({err}); re-rendering on cpu");
            None
        }
        None => None,
    };

    let (backend, pixmap) = match captured {
        Some(c) => c,
        None => {
            let (w, h) = chain.size();
            let (pixmap, _) = CpuPresenter::rasterize(w, h, commands);
            (BackendKind::Cpu, pixmap)
        }
    };

    Ok((write_pixmap(&pixmap, path)?, backend))
}
