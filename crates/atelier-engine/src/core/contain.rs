use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{EngineError, EngineResult};

use super::SketchResult;

/// Runs a user callback, turning both returned errors and panics into
/// `EngineError::Callback`. The failure is logged; callers decide whether
/// the frame continues.
pub fn run_contained<F>(callback: &'static str, f: F) -> EngineResult<()>
where
    F: FnOnce() -> SketchResult,
{
    let message = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => format!("{err:#}"),
        Err(payload) => panic_message(payload.as_ref()),
    };
    log::warn!("{callback}() failed: {message}");
    Err(EngineError::Callback { callback, message })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_passes_through() {
        assert!(run_contained("draw", || Ok(())).is_ok());
    }

    #[test]
    fn error_is_wrapped() {
        let err = run_contained("setup", || Err(anyhow::anyhow!("boom"))).unwrap_err();
        match err {
            EngineError::Callback { callback, message } => {
                assert_eq!(callback, "setup");
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn panic_is_caught() {
        let err = run_contained("draw", || panic!("kaboom")).unwrap_err();
        assert!(err.to_string().contains("kaboom"));
    }
}
