//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or interpreting configuration layers.
///
/// Any of these aborts bootstrap: a half-merged configuration is not a
/// usable configuration. The one non-error by contract is an environment
/// scan that matches zero variables, which yields an empty layer instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured file could not be read.
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configured file could not be parsed.
    #[error("failed to parse config file {path}: {reason}")]
    FileParse {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// The file extension maps to no known parser.
    #[error("unsupported config file format: {path} (expected .json or .toml)")]
    UnsupportedFormat {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The merged configuration root is not a mapping.
    #[error("config root must be a mapping, got {found}")]
    InvalidRoot {
        /// JSON type name of what was found instead.
        found: &'static str,
    },

    /// A key the runtime consumes has the wrong shape.
    #[error("config key '{key}' has unexpected shape: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// What was expected versus found.
        reason: String,
    },
}
