use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{EngineError, EngineResult};
use crate::scene::Command;

use super::pixmap::Pixmap;
use super::teardown::TeardownReport;
use super::{BackendKind, Presenter, SurfaceInfo};

/// Builds a presenter for the given backing size.
pub type PresenterFactory<'w> =
    Box<dyn FnOnce(u32, u32) -> EngineResult<Box<dyn Presenter + 'w>> + 'w>;

/// Ordered backend fallback.
///
/// Factories are tried front to back. A backend that fails to initialize, or
/// whose render errors or panics, is torn down and the next one takes over.
/// Once the list is exhausted there is no presenter and rendering becomes a
/// no-op.
pub struct PresenterChain<'w> {
    pending: VecDeque<(BackendKind, PresenterFactory<'w>)>,
    active: Option<Box<dyn Presenter + 'w>>,
    size: (u32, u32),
    exhausted_logged: bool,
}

impl<'w> PresenterChain<'w> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pending: VecDeque::new(),
            active: None,
            size: (width.max(1), height.max(1)),
            exhausted_logged: false,
        }
    }

    /// Appends a backend to the fallback order.
    pub fn push(&mut self, kind: BackendKind, factory: PresenterFactory<'w>) {
        self.pending.push_back((kind, factory));
    }

    pub fn with(mut self, kind: BackendKind, factory: PresenterFactory<'w>) -> Self {
        self.push(kind, factory);
        self
    }

    /// Kind of the presenter currently in use, initializing one if needed.
    pub fn kind(&mut self) -> Option<BackendKind> {
        self.activate().map(|p| p.kind())
    }

    /// Kind of the active presenter without initializing anything.
    pub fn active_kind(&self) -> Option<BackendKind> {
        self.active.as_ref().map(|p| p.kind())
    }

    /// True when no presenter is active and no factory is left to try.
    pub fn is_exhausted(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Active presenter, initializing the next candidate when none is active.
    pub fn activate(&mut self) -> Option<&mut (dyn Presenter + 'w)> {
        while self.active.is_none() {
            let Some((kind, factory)) = self.pending.pop_front() else {
                if !self.exhausted_logged {
                    log::error!("no presenter backend available; rendering disabled");
                    self.exhausted_logged = true;
                }
                return None;
            };

            let (w, h) = self.size;
            match factory(w, h) {
                Ok(p) => {
                    log::info!("presenter backend: {kind}");
                    self.active = Some(p);
                }
                Err(err) => log::warn!("{kind} presenter failed to initialize: {err}"),
            }
        }
        self.active.as_deref_mut()
    }

    /// Renders through the first backend that succeeds.
    pub fn render(&mut self, commands: &[Command]) -> Option<SurfaceInfo> {
        loop {
            let presenter = self.activate()?;
            let kind = presenter.kind();
            let result = panic::catch_unwind(AssertUnwindSafe(|| presenter.render(commands)))
                .unwrap_or_else(|_| Err(EngineError::backend(kind, "render panicked")));
            match result {
                Ok(info) => return Some(info),
                Err(err) => {
                    log::warn!("{kind} presenter failed to render: {err}");
                    self.drop_active();
                }
            }
        }
    }

    /// Presents the active surface. Failures are logged and the frame dropped.
    pub fn present(&mut self) {
        if let Some(p) = self.active.as_deref_mut() {
            if let Err(err) = p.present() {
                log::warn!("{} present failed: {err}", p.kind());
            }
        }
    }

    /// Applies new backing dimensions to the active and all future presenters.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.size = (width.max(1), height.max(1));
        self.active
            .as_deref_mut()
            .is_some_and(|p| p.resize(width, height))
    }

    /// Forwards a window-surface resize to the active presenter.
    pub fn surface_resized(&mut self, width: u32, height: u32) {
        if let Some(p) = self.active.as_deref_mut() {
            p.surface_resized(width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn has_surface(&self) -> bool {
        self.active.as_ref().is_some_and(|p| p.has_surface())
    }

    /// Reads back the active presenter's surface.
    pub fn capture(&mut self) -> Option<EngineResult<(BackendKind, Pixmap)>> {
        let p = self.active.as_deref_mut()?;
        let kind = p.kind();
        Some(p.capture().map(|px| (kind, px)))
    }

    /// Tears down the active presenter. Idempotent.
    pub fn teardown(&mut self) -> TeardownReport {
        self.active
            .as_deref_mut()
            .map(|p| p.teardown())
            .unwrap_or_default()
    }

    fn drop_active(&mut self) {
        if let Some(mut p) = self.active.take() {
            let report = p.teardown();
            if !report.is_clean() {
                log::error!("{} teardown left {} failures", p.kind(), report.failed.len());
            }
        }
    }
}

impl Drop for PresenterChain<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::render::CpuPresenter;

    /// Presenter that fails every render and counts teardowns.
    struct Broken {
        teardowns: Rc<RefCell<u32>>,
    }

    impl Presenter for Broken {
        fn kind(&self) -> BackendKind {
            BackendKind::Gpu
        }
        fn render(&mut self, _: &[Command]) -> EngineResult<SurfaceInfo> {
            Err(EngineError::backend(BackendKind::Gpu, "device lost"))
        }
        fn present(&mut self) -> EngineResult<()> {
            Ok(())
        }
        fn resize(&mut self, _: u32, _: u32) -> bool {
            false
        }
        fn size(&self) -> (u32, u32) {
            (1, 1)
        }
        fn capture(&mut self) -> EngineResult<Pixmap> {
            Err(EngineError::backend(BackendKind::Gpu, "no surface"))
        }
        fn has_surface(&self) -> bool {
            false
        }
        fn teardown(&mut self) -> TeardownReport {
            *self.teardowns.borrow_mut() += 1;
            TeardownReport::default()
        }
    }

    /// Presenter whose render panics.
    struct Panicking;

    impl Presenter for Panicking {
        fn kind(&self) -> BackendKind {
            BackendKind::Bitmap
        }
        fn render(&mut self, _: &[Command]) -> EngineResult<SurfaceInfo> {
            panic!("attempt to subtract with overflow")
        }
        fn present(&mut self) -> EngineResult<()> {
            Ok(())
        }
        fn resize(&mut self, _: u32, _: u32) -> bool {
            false
        }
        fn size(&self) -> (u32, u32) {
            (1, 1)
        }
        fn capture(&mut self) -> EngineResult<Pixmap> {
            Err(EngineError::backend(BackendKind::Bitmap, "no surface"))
        }
        fn has_surface(&self) -> bool {
            false
        }
        fn teardown(&mut self) -> TeardownReport {
            TeardownReport::default()
        }
    }

    fn cpu<'w>() -> PresenterFactory<'w> {
        Box::new(|w, h| Ok(Box::new(CpuPresenter::new(w, h)) as Box<dyn Presenter>))
    }

    fn failing_init<'w>() -> PresenterFactory<'w> {
        Box::new(|_, _| Err(EngineError::backend(BackendKind::Gpu, "no adapter")))
    }

    // ── fallback ──────────────────────────────────────────────────────────

    #[test]
    fn init_failure_falls_through() {
        let mut chain = PresenterChain::new(4, 4)
            .with(BackendKind::Gpu, failing_init())
            .with(BackendKind::Cpu, cpu());
        assert_eq!(chain.kind(), Some(BackendKind::Cpu));
        assert!(chain.render(&[]).is_some());
    }

    #[test]
    fn render_failure_tears_down_and_falls_through() {
        let teardowns = Rc::new(RefCell::new(0));
        let t = teardowns.clone();
        let mut chain = PresenterChain::new(4, 4)
            .with(
                BackendKind::Gpu,
                Box::new(move |_, _| Ok(Box::new(Broken { teardowns: t }) as Box<dyn Presenter>)),
            )
            .with(BackendKind::Cpu, cpu());

        let info = chain.render(&[]).unwrap();
        assert_eq!(info.backend, BackendKind::Cpu);
        assert_eq!(*teardowns.borrow(), 1);
    }

    #[test]
    fn render_panic_is_contained_and_falls_through() {
        let mut chain = PresenterChain::new(4, 4)
            .with(
                BackendKind::Bitmap,
                Box::new(|_, _| Ok(Box::new(Panicking) as Box<dyn Presenter>)),
            )
            .with(BackendKind::Cpu, cpu());

        let info = chain.render(&[]).unwrap();
        assert_eq!(info.backend, BackendKind::Cpu);
        assert_eq!(chain.active_kind(), Some(BackendKind::Cpu));
    }

    #[test]
    fn lone_panicking_backend_exhausts_the_chain() {
        let mut chain = PresenterChain::new(4, 4).with(
            BackendKind::Bitmap,
            Box::new(|_, _| Ok(Box::new(Panicking) as Box<dyn Presenter>)),
        );
        assert!(chain.render(&[]).is_none());
        assert!(chain.is_exhausted());
    }

    #[test]
    fn exhausted_chain_is_a_no_op() {
        let mut chain = PresenterChain::new(4, 4).with(BackendKind::Gpu, failing_init());
        assert!(chain.render(&[]).is_none());
        assert!(chain.is_exhausted());
        assert!(chain.capture().is_none());
        assert_eq!(chain.kind(), None);
    }

    #[test]
    fn resize_reaches_later_backends() {
        let mut chain = PresenterChain::new(4, 4).with(BackendKind::Cpu, cpu());
        chain.resize(32, 16);
        let info = chain.render(&[]).unwrap();
        assert_eq!((info.width, info.height), (32, 16));
    }
}
