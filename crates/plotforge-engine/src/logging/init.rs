use std::sync::Once;

/// Default filter: the plotting crates at info, wgpu internals quieted
/// (wgpu_core and wgpu_hal log per-resource chatter at info).
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "plotforge_engine=debug,wgpu=warn").
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Config with an explicit filter, overriding `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self { env_filter: Some(filter.into()), ..Self::default() }
    }
}

/// Filter precedence: explicit config, then the `RUST_LOG` value, then
/// [`DEFAULT_FILTER`].
fn resolve_filter(config: Option<String>, rust_log: Option<String>) -> String {
    config
        .or(rust_log)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Intended usage is early in
/// `main`, before any device setup.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter {filter:?}");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_beats_rust_log() {
        let filter = resolve_filter(Some("debug".into()), Some("trace".into()));
        assert_eq!(filter, "debug");
    }

    #[test]
    fn rust_log_beats_the_default() {
        let filter = resolve_filter(None, Some("warn".into()));
        assert_eq!(filter, "warn");
    }

    #[test]
    fn default_filter_quiets_wgpu_internals() {
        let filter = resolve_filter(None, None);
        assert_eq!(filter, DEFAULT_FILTER);
        assert!(filter.contains("wgpu_core=warn"));
    }

    #[test]
    fn with_filter_fills_only_the_filter() {
        let config = LoggingConfig::with_filter("plotforge_engine=trace");
        assert_eq!(config.env_filter.as_deref(), Some("plotforge_engine=trace"));
    }
}
