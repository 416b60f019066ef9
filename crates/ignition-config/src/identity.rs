//! Deterministic install identity.
//!
//! The identity keys per-installation state (caches, namespaces) and must be
//! stable across runs and processes for the same root directory. A SHA-256
//! content hash of the seed gives that stability with negligible collision
//! probability; nothing here is a secrecy boundary.

use crate::resolved::{ResolvedConfig, KEY_USER_CONF_ROOT};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Errors deriving the install identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The seed key is absent from the resolved configuration.
    #[error("identity seed missing: config key '{0}' is not set")]
    MissingSeed(&'static str),

    /// The seed key is present but unusable.
    #[error("identity seed invalid: {0}")]
    InvalidSeed(String),
}

/// Stable, deterministic identifier for one installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallId(String);

impl InstallId {
    /// Wraps an already-derived identity value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The lowercase hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the install identity from a seed value.
///
/// Pure function: same seed, same identity, in this process or any other.
pub fn derive_id(seed: &str) -> InstallId {
    InstallId(hex::encode(Sha256::digest(seed.as_bytes())))
}

/// Derives the install identity from the configured root directory.
pub fn derive_install_id(config: &ResolvedConfig) -> Result<InstallId, IdentityError> {
    let seed = config
        .user_conf_root()
        .ok_or(IdentityError::MissingSeed(KEY_USER_CONF_ROOT))?;
    match seed {
        Value::String(path) if !path.is_empty() => Ok(derive_id(path)),
        Value::String(_) => Err(IdentityError::InvalidSeed(
            "root directory path is empty".to_string(),
        )),
        other => Err(IdentityError::InvalidSeed(format!(
            "expected a string path, found {other}"
        ))),
    }
}
