//! # Ignition Telemetry
//!
//! Console logging for Ignition applications.
//!
//! The bootstrap runtime only *speaks* `tracing`; it never installs a
//! subscriber, because the logging transport belongs to the embedding
//! application. This crate is the batteries-included transport an embedder
//! can opt into: a fmt subscriber with an env-filter bound to the level
//! the resolved configuration chose.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ignition_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IGNITION_LOG_LEVEL` | `info` | Log level / env-filter directive |
//! | `IGNITION_LOG_ANSI`  | `true` | Enable ANSI colors |

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level/filter directive did not parse.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The offending directive.
        directive: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("a tracing subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Keeps the installed subscriber alive for the process lifetime.
///
/// Nothing to flush today; the guard exists so adding buffered writers
/// later does not change the API.
pub struct TelemetryGuard {
    _private: (),
}

/// Installs the global fmt subscriber described by `config`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter =
        EnvFilter::try_new(&config.log_level).map_err(|err| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: err.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))?;

    Ok(TelemetryGuard { _private: () })
}

/// Test-friendly variant: an already-installed subscriber is not an error.
pub fn init_for_tests() {
    let config = TelemetryConfig {
        log_level: "debug".to_string(),
        ansi: false,
    };
    let _ = init_telemetry(&config);
}
