//! Shared helpers for CLI commands.
//!
//! Locates and resolves the configuration file and builds the compile
//! primitive selected by it.

use std::path::{Path, PathBuf};

use prewarm_cache::StoreCompiler;
use prewarm_config::{ResolvedCompiler, ResolvedSweep, CONFIG_FILE};
use prewarm_sweep::CompilePrimitive;

use crate::command::CommandCompiler;
use crate::GlobalArgs;

/// Version stamped into cache manifests and artifacts.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Walks up from `start` looking for the nearest `prewarm.toml`.
///
/// Returns the path of the file, or an error if none is found.
pub fn find_config(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file path from global CLI args.
///
/// `--config` may name the file itself or a directory containing it. Without
/// `--config`, walks up from the current directory.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE))
            } else {
                Ok(p)
            }
        }
        None => find_config(&std::env::current_dir()?),
    }
}

/// Loads, validates, and resolves the configuration named by the global args.
pub fn load_sweep(global: &GlobalArgs) -> Result<ResolvedSweep, Box<dyn std::error::Error>> {
    let path = resolve_config_path(global)?;
    log::debug!("using configuration {}", path.display());
    let config = prewarm_config::load_config_file(&path)?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(prewarm_config::resolve(&config, config_dir)?)
}

/// The compile primitive selected by the configuration.
pub enum HostCompiler {
    /// Built-in artifact store.
    Store(StoreCompiler),
    /// External program.
    Command(CommandCompiler),
}

impl HostCompiler {
    /// Builds the primitive for a resolved compiler selection.
    pub fn from_resolved(compiler: &ResolvedCompiler) -> Self {
        match compiler {
            ResolvedCompiler::Store {
                cache_dir,
                require_utf8,
            } => HostCompiler::Store(StoreCompiler::open(cache_dir, TOOL_VERSION, *require_utf8)),
            ResolvedCompiler::Command { program, args } => {
                HostCompiler::Command(CommandCompiler::new(program, args))
            }
        }
    }

    /// Borrows the primitive for a sweep.
    pub fn primitive(&self) -> &dyn CompilePrimitive {
        match self {
            HostCompiler::Store(store) => store,
            HostCompiler::Command(command) => command,
        }
    }

    /// Flushes any state the primitive keeps after a sweep.
    ///
    /// A manifest that cannot be saved is logged, not fatal: the compiled
    /// artifacts are already in place.
    pub fn finish(&self) {
        if let HostCompiler::Store(store) = self {
            if let Err(e) = store.save() {
                log::warn!("could not save cache manifest: {e}");
            }
        }
    }
}
