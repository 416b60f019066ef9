//! Telemetry configuration.

use std::env;

/// Environment variable selecting the log level / filter directive.
pub const ENV_LOG_LEVEL: &str = "IGNITION_LOG_LEVEL";
/// Environment variable toggling ANSI colors.
pub const ENV_LOG_ANSI: &str = "IGNITION_LOG_ANSI";

/// Console logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level or full env-filter directive (e.g. `info`, `ignition=debug`).
    pub log_level: String,
    /// Whether to emit ANSI colors.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            ansi: env::var(ENV_LOG_ANSI)
                .map(|raw| raw != "0" && !raw.eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.ansi),
        }
    }

    /// Overrides the level, e.g. with the resolved config's console level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
