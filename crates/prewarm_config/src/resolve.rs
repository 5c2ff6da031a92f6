//! Resolution of a parsed configuration against the filesystem.

use std::path::{Path, PathBuf};

use prewarm_common::Target;
use prewarm_sweep::{Chain, DirectoryScan, StaticList, SweepMode};

use crate::error::ConfigError;
use crate::types::{CompilerConfig, DiscoverConfig, PrewarmConfig};

/// A sweep configuration with every path made absolute and every target parsed.
#[derive(Debug)]
pub struct ResolvedSweep {
    /// Absolute base directory.
    pub base_dir: PathBuf,
    /// Static targets in configured order.
    pub targets: Vec<Target>,
    /// Directory scans appended after the static targets.
    pub discover: Vec<DiscoverConfig>,
    /// Scheduling mode.
    pub mode: SweepMode,
    /// Whether any failure should fail the host process.
    pub fail_on_error: bool,
    /// The compile primitive to use.
    pub compiler: ResolvedCompiler,
}

/// A compiler selection with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCompiler {
    /// The built-in artifact store.
    Store {
        /// Absolute cache directory.
        cache_dir: PathBuf,
        /// Reject targets that are not valid UTF-8.
        require_utf8: bool,
    },
    /// An external program.
    Command {
        /// Program to run.
        program: String,
        /// Arguments placed before the target path.
        args: Vec<String>,
    },
}

impl ResolvedSweep {
    /// Builds the target source for this sweep: the static list followed by
    /// each configured directory scan.
    pub fn target_source(&self) -> Chain {
        let mut chain = Chain::new().with(StaticList(self.targets.clone()));
        for scan in &self.discover {
            chain = chain.with(DirectoryScan {
                dir: scan.dir.clone(),
                extensions: scan.extensions.clone(),
                recursive: scan.recursive,
            });
        }
        chain
    }
}

/// Resolves `config` loaded from a file in `config_dir`.
///
/// A relative `base_dir` is taken relative to `config_dir`; a relative
/// `config_dir` is taken relative to the current working directory. A
/// relative store `cache_dir` is taken relative to the resolved base directory.
pub fn resolve(config: &PrewarmConfig, config_dir: &Path) -> Result<ResolvedSweep, ConfigError> {
    let config_dir = if config_dir.is_absolute() {
        config_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(ConfigError::WorkingDir)?
            .join(config_dir)
    };
    let base_dir = normalize(&config_dir.join(&config.sweep.base_dir));

    let targets = config
        .sweep
        .targets
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            Target::new(raw).map_err(|e| {
                ConfigError::invalid(format!("sweep.targets[{i}]"), e.to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let compiler = match &config.compiler {
        CompilerConfig::Store {
            cache_dir,
            require_utf8,
        } => ResolvedCompiler::Store {
            cache_dir: normalize(&base_dir.join(cache_dir)),
            require_utf8: *require_utf8,
        },
        CompilerConfig::Command { command } => {
            let (program, args) = command
                .split_first()
                .ok_or_else(|| ConfigError::invalid("compiler.command", "must name a program"))?;
            ResolvedCompiler::Command {
                program: program.clone(),
                args: args.to_vec(),
            }
        }
    };

    Ok(ResolvedSweep {
        base_dir,
        targets,
        discover: config.discover.clone(),
        mode: config.sweep.mode,
        fail_on_error: config.sweep.fail_on_error,
        compiler,
    })
}

/// Removes `.` components and folds `..` lexically, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
