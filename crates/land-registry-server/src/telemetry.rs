//! Structured logging
//!
//! One `fmt` layer, plain or JSON, filtered by `RUST_LOG` when it is set and
//! by the configured level otherwise.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
    Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Fallback `EnvFilter` directive
    pub log_level: String,
    pub json_format: bool,
    pub include_timestamps: bool,
    pub include_thread_ids: bool,
    pub include_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from(&LoggingConfig::default())
    }
}

impl From<&LoggingConfig> for TelemetryConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            log_level: logging.level.clone(),
            json_format: logging.json_format,
            include_timestamps: logging.include_timestamps,
            include_thread_ids: logging.include_thread_ids,
            include_target: logging.include_target,
        }
    }
}

impl TelemetryConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let layer = fmt::layer()
            .with_target(self.include_target)
            .with_thread_ids(self.include_thread_ids);

        // Each format/timer combination is a distinct layer type
        match (self.json_format, self.include_timestamps) {
            (true, true) => layer.json().with_current_span(true).with_span_list(false).boxed(),
            (true, false) => layer
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .without_time()
                .boxed(),
            (false, true) => layer.boxed(),
            (false, false) => layer.without_time().boxed(),
        }
    }
}

/// Install the global subscriber
///
/// Fails if one is already installed.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_logging_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_format);
        assert!(config.include_timestamps);
        assert!(!config.include_thread_ids);
        assert!(config.include_target);
    }

    #[test]
    fn test_from_logging_config() {
        let logging = LoggingConfig {
            level: "land_registry_db=debug,info".to_string(),
            json_format: true,
            include_timestamps: false,
            include_thread_ids: true,
            include_target: false,
        };

        let config = TelemetryConfig::from(&logging);
        assert_eq!(config.log_level, "land_registry_db=debug,info");
        assert!(config.json_format);
        assert!(!config.include_timestamps);
        assert!(config.include_thread_ids);
        assert!(!config.include_target);
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for json in [true, false] {
            for timestamps in [true, false] {
                let config = TelemetryConfig {
                    log_level: "debug".to_string(),
                    json_format: json,
                    include_timestamps: timestamps,
                    ..TelemetryConfig::default()
                };
                let _layer = config.fmt_layer();
                let _filter = config.env_filter();
            }
        }
    }
}
