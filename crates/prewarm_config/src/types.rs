//! Configuration types deserialized from `prewarm.toml`.

use serde::Deserialize;

pub use prewarm_sweep::SweepMode;

/// Default cache directory for the built-in store compiler, relative to the base directory.
pub const DEFAULT_CACHE_DIR: &str = ".prewarm-cache";

/// The top-level configuration parsed from `prewarm.toml`.
#[derive(Debug, Deserialize)]
pub struct PrewarmConfig {
    /// What to sweep and how.
    pub sweep: SweepConfig,
    /// Directory scans whose results are appended to the static target list.
    #[serde(default)]
    pub discover: Vec<DiscoverConfig>,
    /// The compile primitive to run on each target.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// The `[sweep]` section.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// Directory targets are relative to. Relative values resolve against the
    /// directory containing the configuration file.
    pub base_dir: String,
    /// Ordered target paths. Must be present (possibly empty) unless at least
    /// one `[[discover]]` scan is configured.
    pub targets: Option<Vec<String>>,
    /// Scheduling mode.
    #[serde(default)]
    pub mode: SweepMode,
    /// Host policy: make `prewarm run` exit non-zero when any target fails.
    #[serde(default)]
    pub fail_on_error: bool,
}

/// One `[[discover]]` entry: a directory walked for additional targets.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    /// Directory to walk, relative to the base directory.
    pub dir: String,
    /// File extensions to keep (without the dot). Empty keeps every file.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Whether to descend into subdirectories.
    #[serde(default = "default_true")]
    pub recursive: bool,
}

/// The `[compiler]` section, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompilerConfig {
    /// Store each target in the built-in content-addressed artifact cache.
    Store {
        /// Cache directory, relative to the base directory unless absolute.
        #[serde(default = "default_cache_dir")]
        cache_dir: String,
        /// Reject targets that are not valid UTF-8.
        #[serde(default = "default_true")]
        require_utf8: bool,
    },
    /// Run an external program once per target, with the target's path appended.
    Command {
        /// Program and leading arguments, e.g. `["php", "-l"]`.
        command: Vec<String>,
    },
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig::Store {
            cache_dir: default_cache_dir(),
            require_utf8: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}
