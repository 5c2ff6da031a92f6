//! Per-target outcomes and sweep totals.

use std::path::{Path, PathBuf};

use prewarm_common::Target;
use serde::Serialize;

/// What happened to one target during a sweep.
///
/// Every target ends in exactly one of these states; there is no retry and no
/// transition out of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// The compile primitive accepted the file.
    Loaded,
    /// The resolved path is not an existing, readable file.
    NotFound,
    /// The compile primitive rejected the file or panicked.
    CompileError(String),
}

impl TargetOutcome {
    /// Returns `true` for [`TargetOutcome::Loaded`].
    pub fn is_loaded(&self) -> bool {
        matches!(self, TargetOutcome::Loaded)
    }
}

/// One target's entry in a [`SweepReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRecord {
    /// The target as listed.
    pub target: Target,
    /// The target resolved against the base directory.
    pub path: PathBuf,
    /// How the attempt ended.
    #[serde(flatten)]
    pub outcome: TargetOutcome,
}

/// Aggregate counts for one sweep.
///
/// `loaded + failed` always equals the number of targets attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SweepResult {
    /// Targets the compile primitive accepted.
    pub loaded: usize,
    /// Targets that were missing or failed to compile.
    pub failed: usize,
}

impl SweepResult {
    /// Tallies a slice of records.
    pub fn from_records(records: &[TargetRecord]) -> Self {
        let loaded = records.iter().filter(|r| r.outcome.is_loaded()).count();
        Self {
            loaded,
            failed: records.len() - loaded,
        }
    }

    /// Total number of targets in the sweep.
    pub fn total(&self) -> usize {
        self.loaded + self.failed
    }

    /// Returns `true` if no target failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// The full outcome of a sweep: totals plus every target's record, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// The base directory targets were resolved against.
    pub base_dir: PathBuf,
    /// Loaded/failed counts derived from `records`.
    pub result: SweepResult,
    /// One record per target, in the order targets were listed.
    pub records: Vec<TargetRecord>,
}

impl SweepReport {
    pub(crate) fn new(base_dir: &Path, records: Vec<TargetRecord>) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            result: SweepResult::from_records(&records),
            records,
        }
    }

    /// Iterates over records whose outcome is not [`TargetOutcome::Loaded`].
    pub fn failures(&self) -> impl Iterator<Item = &TargetRecord> {
        self.records.iter().filter(|r| !r.outcome.is_loaded())
    }

    /// Looks up the outcome recorded for a target.
    pub fn outcome_of(&self, target: &Target) -> Option<&TargetOutcome> {
        self.records
            .iter()
            .find(|r| &r.target == target)
            .map(|r| &r.outcome)
    }
}
