//! Engine configuration.

use std::env;

use crate::render::BackendKind;

/// Where frames go.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RenderMode {
    /// Offscreen only; snapshots are the sole output.
    #[default]
    Headless,
    /// A winit window is presented every frame.
    Windowed,
}

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub mode: RenderMode,
    /// Presenter fallback order.
    pub backends: Vec<BackendKind>,
    /// Host override: keep drawing even after `no_loop()`.
    pub ignore_no_loop: bool,
    pub title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            mode: RenderMode::Headless,
            backends: vec![BackendKind::Gpu, BackendKind::Cpu, BackendKind::Bitmap],
            ignore_no_loop: false,
            title: "atelier".to_string(),
        }
    }
}

impl EngineConfig {
    pub const ENV_BACKENDS: &'static str = "ATELIER_BACKENDS";
    pub const ENV_IGNORE_NO_LOOP: &'static str = "ATELIER_IGNORE_NO_LOOP";
    pub const ENV_SIZE: &'static str = "ATELIER_SIZE";

    pub fn headless(width: u32, height: u32) -> Self {
        Self::default().with_size(width, height)
    }

    pub fn windowed(width: u32, height: u32) -> Self {
        Self::default().with_size(width, height).with_mode(RenderMode::Windowed)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_backends(mut self, backends: impl Into<Vec<BackendKind>>) -> Self {
        self.backends = backends.into();
        self
    }

    pub fn with_ignore_no_loop(mut self, ignore: bool) -> Self {
        self.ignore_no_loop = ignore;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[inline]
    pub fn is_headless(&self) -> bool {
        self.mode == RenderMode::Headless
    }

    /// Default configuration overlaid with `ATELIER_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Applies overrides from a key lookup. Unparseable values are logged and ignored.
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(Self::ENV_BACKENDS) {
            match parse_backends(&raw) {
                Some(list) => self.backends = list,
                None => log::warn!("ignoring {}={raw:?}", Self::ENV_BACKENDS),
            }
        }

        if let Some(raw) = lookup(Self::ENV_IGNORE_NO_LOOP) {
            self.ignore_no_loop = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(raw) = lookup(Self::ENV_SIZE) {
            match parse_size(&raw) {
                Some((w, h)) => self = self.with_size(w, h),
                None => log::warn!("ignoring {}={raw:?}", Self::ENV_SIZE),
            }
        }

        self
    }
}

fn parse_backends(raw: &str) -> Option<Vec<BackendKind>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<BackendKind>().ok())
        .collect()
}

fn parse_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overlay(pairs: &[(&str, &str)]) -> EngineConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::default().overlay(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!((c.width, c.height), (100, 100));
        assert!(c.is_headless());
        assert_eq!(c.backends, vec![BackendKind::Gpu, BackendKind::Cpu, BackendKind::Bitmap]);
    }

    #[test]
    fn env_overrides_apply() {
        let c = overlay(&[
            ("ATELIER_BACKENDS", "cpu, bitmap"),
            ("ATELIER_IGNORE_NO_LOOP", "true"),
            ("ATELIER_SIZE", "320x240"),
        ]);
        assert_eq!(c.backends, vec![BackendKind::Cpu, BackendKind::Bitmap]);
        assert!(c.ignore_no_loop);
        assert_eq!((c.width, c.height), (320, 240));
    }

    #[test]
    fn bad_values_are_ignored() {
        let c = overlay(&[("ATELIER_BACKENDS", "cpu,vulkan"), ("ATELIER_SIZE", "big")]);
        assert_eq!(c, EngineConfig::default());
    }

    #[test]
    fn empty_backend_list_is_allowed() {
        let c = overlay(&[("ATELIER_BACKENDS", "")]);
        assert!(c.backends.is_empty());
    }
}
