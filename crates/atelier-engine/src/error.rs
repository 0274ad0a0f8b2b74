//! Engine error types.

use std::path::PathBuf;

use crate::render::BackendKind;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level error type for the engine.
///
/// Only `Validation` is meant to reach user code; every other variant is
/// contained by the engine (logged, then degraded or skipped).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A drawing primitive was called with arguments that violate its constraints.
    #[error("validation error in {primitive}: {message}")]
    Validation {
        primitive: &'static str,
        message: String,
    },

    /// A sketch callback returned an error or panicked.
    #[error("{callback} callback failed: {message}")]
    Callback {
        callback: &'static str,
        message: String,
    },

    /// A command carried unexpected or missing arguments.
    #[error("malformed {op} command (seq {seq}): {message}")]
    MalformedCommand {
        op: String,
        seq: u64,
        message: String,
    },

    /// A presenter backend could not be initialized or failed while rendering.
    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable {
        backend: BackendKind,
        message: String,
    },

    /// Releasing a GPU resource failed.
    #[error("failed to release {resource}: {message}")]
    Teardown {
        resource: &'static str,
        message: String,
    },

    /// Encoding or writing a snapshot failed.
    #[error("snapshot error: {message} ({path:?})")]
    Snapshot { message: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn validation(primitive: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            primitive,
            message: message.into(),
        }
    }

    pub fn backend(backend: BackendKind, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend,
            message: message.into(),
        }
    }

    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
            path: path.into(),
        }
    }

    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
