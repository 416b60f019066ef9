//! External configuration sources: files and environment variables.

pub mod env;
pub mod file;
