//! # Ignition Config
//!
//! Layered configuration for the Ignition bootstrap runtime.
//!
//! ## Precedence (lowest to highest)
//!
//! ```text
//! defaults  <  caller options  <  config files  <  environment variables
//! ```
//!
//! Later layers win on key collision. Mappings merge recursively; sequences
//! and scalars replace wholesale. The value model is `serde_json::Value`,
//! which already carries the mapping | sequence | scalar distinction the
//! merge rules are defined over.
//!
//! This crate performs no interpretation of downstream keys: it resolves the
//! layers, exposes typed accessors for the keys the runtime consumes, and
//! derives the install identity. What a plugin or the embedding application
//! puts under its own keys is its own business.

pub mod defaults;
pub mod error;
pub mod identity;
pub mod merge;
pub mod resolved;
pub mod sources;

pub use defaults::defaults;
pub use error::ConfigError;
pub use identity::{derive_id, derive_install_id, IdentityError, InstallId};
pub use merge::{merge, merge_all};
pub use resolved::ResolvedConfig;
pub use sources::env::{load_env, load_env_from};
pub use sources::file::load_files;

/// Delimiter that maps environment variable names to nested config keys.
pub const ENV_NESTING_DELIMITER: &str = "__";
