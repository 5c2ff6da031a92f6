//! Where a sweep's target list comes from.
//!
//! Sources are collected once, before the sweep starts. A failing source
//! aborts the whole sweep with [`SweepError::InvalidConfiguration`]; no target
//! is attempted from a half-collected list.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use prewarm_common::Target;

use crate::error::SweepError;

/// Produces the ordered list of targets for one sweep.
pub trait TargetSource {
    /// Collects targets relative to `base_dir`.
    fn collect(&self, base_dir: &Path) -> Result<Vec<Target>, SweepError>;
}

/// A fixed, configured list. Order is preserved as written.
#[derive(Debug, Clone, Default)]
pub struct StaticList(pub Vec<Target>);

impl StaticList {
    /// Validates every raw path, failing on the first invalid one.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, SweepError> {
        let targets = raw
            .iter()
            .map(|s| Target::new(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(targets))
    }
}

impl TargetSource for StaticList {
    fn collect(&self, _base_dir: &Path) -> Result<Vec<Target>, SweepError> {
        Ok(self.0.clone())
    }
}

/// Discovers targets by walking a directory below the base directory.
///
/// Results are sorted by path so that repeated scans of an unchanged tree
/// produce the same list.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    /// Directory to walk, relative to the base directory. Empty means the base itself.
    pub dir: String,
    /// File extensions to keep, without the dot. Empty keeps every file.
    pub extensions: Vec<String>,
    /// Whether to descend into subdirectories.
    pub recursive: bool,
}

impl DirectoryScan {
    /// Creates a recursive scan of `dir` keeping files with the given extensions.
    pub fn new(dir: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            recursive: true,
        }
    }

    /// Returns `true` if a file with this path should become a target.
    fn keeps(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }

    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SweepError> {
        let entries = fs::read_dir(dir).map_err(|e| scan_error(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| scan_error(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| scan_error(&path, e))?;
            // Symlinked directories are not followed, so a link cycle cannot loop the scan.
            if file_type.is_dir() {
                if self.recursive {
                    self.walk(&path, files)?;
                }
            } else if path.is_file() && self.keeps(&path) {
                files.push(path);
            }
        }
        Ok(())
    }
}

fn scan_error(path: &Path, err: std::io::Error) -> SweepError {
    SweepError::InvalidConfiguration(format!("cannot scan {}: {err}", path.display()))
}

impl TargetSource for DirectoryScan {
    fn collect(&self, base_dir: &Path) -> Result<Vec<Target>, SweepError> {
        let root = match self.dir.trim_matches('/') {
            "" | "." => base_dir.to_path_buf(),
            dir => Target::new(dir)?.resolve(base_dir),
        };
        if !root.is_dir() {
            return Err(SweepError::InvalidConfiguration(format!(
                "scan directory {} does not exist",
                root.display()
            )));
        }

        let mut files = Vec::new();
        self.walk(&root, &mut files)?;
        files.sort();

        let targets = files
            .iter()
            .map(|p| {
                Target::from_path_under(base_dir, p).ok_or_else(|| {
                    SweepError::InvalidConfiguration(format!(
                        "cannot use scanned file {} as a target: name is not valid UTF-8",
                        p.display()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "scan of {} found {} target(s)",
            root.display(),
            targets.len()
        );
        Ok(targets)
    }
}

/// Concatenates several sources, dropping repeated targets.
///
/// The first occurrence of a target keeps its position; later duplicates are
/// skipped so each target is attempted once per sweep.
#[derive(Default)]
pub struct Chain(pub Vec<Box<dyn TargetSource>>);

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source to the chain.
    pub fn with(mut self, source: impl TargetSource + 'static) -> Self {
        self.0.push(Box::new(source));
        self
    }
}

impl TargetSource for Chain {
    fn collect(&self, base_dir: &Path) -> Result<Vec<Target>, SweepError> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for source in &self.0 {
            for target in source.collect(base_dir)? {
                if seen.insert(target.clone()) {
                    targets.push(target);
                }
            }
        }
        Ok(targets)
    }
}
