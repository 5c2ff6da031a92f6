//! `prewarm check`: existence-only dry run.
//!
//! Runs the same existence check as a sweep over every target but never
//! invokes the compiler.

use std::path::Path;

use prewarm_sweep::{FileProbe, FsProbe, Target};

use crate::list::collect_targets;
use crate::pipeline::load_sweep;
use crate::GlobalArgs;

/// Existence of each target, in sweep order.
#[derive(Debug, Default)]
struct CheckSummary {
    found: Vec<Target>,
    missing: Vec<Target>,
}

/// Runs the `prewarm check` command. Always exits 0 once targets resolve;
/// missing files are reported, not treated as an error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sweep = load_sweep(global)?;
    if !sweep.base_dir.is_dir() {
        return Err(format!("base directory {} does not exist", sweep.base_dir.display()).into());
    }
    let targets = collect_targets(&sweep)?;
    let summary = check_targets(&FsProbe, &sweep.base_dir, &targets);

    if !global.quiet {
        for target in &summary.found {
            eprintln!("   found {target}");
        }
    }
    for target in &summary.missing {
        eprintln!(" missing {}", target.resolve(&sweep.base_dir).display());
    }
    eprintln!(
        "  Result: {} found, {} missing",
        summary.found.len(),
        summary.missing.len()
    );
    Ok(0)
}

fn check_targets(probe: &dyn FileProbe, base_dir: &Path, targets: &[Target]) -> CheckSummary {
    let mut summary = CheckSummary::default();
    for target in targets {
        if probe.is_readable_file(&target.resolve(base_dir)) {
            summary.found.push(target.clone());
        } else {
            summary.missing.push(target.clone());
        }
    }
    summary
}
