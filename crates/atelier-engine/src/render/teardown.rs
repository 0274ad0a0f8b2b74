use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::EngineError;

/// One-shot guard for presenter teardown.
#[derive(Debug, Default)]
pub struct TeardownLatch {
    done: bool,
}

impl TeardownLatch {
    /// Returns `true` the first time only.
    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.done, true)
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Re-arms the latch once new resources have been acquired.
    pub fn rearm(&mut self) {
        self.done = false;
    }
}

/// Outcome of a teardown pass.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub released: Vec<&'static str>,
    pub failed: Vec<EngineError>,
}

impl TeardownReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Runs one guarded release step and records its outcome.
    pub fn step<F>(&mut self, resource: &'static str, f: F)
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        match release_step(resource, f) {
            Ok(()) => self.released.push(resource),
            Err(err) => self.failed.push(err),
        }
    }
}

/// Releases one resource. Errors and panics become `EngineError::Teardown`
/// and are logged; the caller moves on to the next resource.
pub fn release_step<F>(resource: &'static str, f: F) -> Result<(), EngineError>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    let message = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {
            log::debug!("released {resource}");
            return Ok(());
        }
        Ok(Err(err)) => format!("{err:#}"),
        Err(_) => "panicked during release".to_string(),
    };
    log::error!("failed to release {resource}: {message}");
    Err(EngineError::Teardown { resource, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_step_does_not_stop_the_rest() {
        let mut report = TeardownReport::default();
        let mut third_ran = false;

        report.step("texture", || Ok(()));
        report.step("buffer", || anyhow::bail!("device lost"));
        report.step("pipeline", || {
            third_ran = true;
            Ok(())
        });

        assert!(third_ran);
        assert_eq!(report.released, vec!["texture", "pipeline"]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn panicking_step_is_contained() {
        let err = release_step("surface", || panic!("driver bug")).unwrap_err();
        assert!(matches!(err, EngineError::Teardown { resource: "surface", .. }));
    }

    #[test]
    fn latch_fires_once() {
        let mut latch = TeardownLatch::default();
        assert!(latch.begin());
        assert!(!latch.begin());
        latch.rearm();
        assert!(latch.begin());
    }
}
