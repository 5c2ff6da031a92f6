//! Parsing and validation of `prewarm.toml` sweep configuration files.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`PrewarmConfig`], validates it, and resolves it against the filesystem
//! into a [`ResolvedSweep`] with absolute paths and parsed targets.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve, ResolvedCompiler, ResolvedSweep};
pub use types::*;
