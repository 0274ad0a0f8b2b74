use std::sync::Once;

use log::LevelFilter;

/// Crates that log per-frame at `info` and drown out sketch output.
const NOISY_GPU_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger setup for hosts embedding the engine.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for everything without a module override.
    pub level: LevelFilter,
    /// Per-module overrides, applied after `level`.
    pub modules: Vec<(String, LevelFilter)>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            modules: Vec::new(),
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// `info` for the engine and sketch, `warn` for the GPU stack.
    pub fn sketch_defaults() -> Self {
        let modules = NOISY_GPU_MODULES
            .iter()
            .map(|m| (m.to_string(), LevelFilter::Warn))
            .collect();
        Self {
            modules,
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module: impl Into<String>, level: LevelFilter) -> Self {
        self.modules.push((module.into(), level));
        self
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` once per process. Later calls do nothing.
///
/// `RUST_LOG` directives are parsed last so they override `config`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(config.level);
        for (module, level) in &config.modules {
            builder.filter_module(module, *level);
        }
        if let Ok(directives) = std::env::var("RUST_LOG") {
            builder.parse_filters(&directives);
        }
        builder.write_style(config.write_style);

        // Test harnesses may already have installed a logger.
        if builder.try_init().is_ok() {
            log::debug!("logger installed at {}", config.level);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sketch_defaults_quiet_the_gpu_stack() {
        let cfg = LoggingConfig::sketch_defaults();
        assert_eq!(cfg.level, LevelFilter::Info);
        assert!(cfg.modules.iter().all(|(_, l)| *l == LevelFilter::Warn));
        assert!(cfg.modules.iter().any(|(m, _)| m == "wgpu_core"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default().with_module("atelier_engine", LevelFilter::Trace));
    }
}
