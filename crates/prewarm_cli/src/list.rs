//! `prewarm list`: prints the resolved target list.

use std::io::Write;
use std::path::Path;

use prewarm_config::ResolvedSweep;
use prewarm_sweep::{Target, TargetSource};

use crate::pipeline::load_sweep;
use crate::{GlobalArgs, ListArgs};

/// Runs the `prewarm list` command.
///
/// Prints one target per line to stdout, in the order a sweep would attempt
/// them: the static list first, then each directory scan.
pub fn run(args: &ListArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sweep = load_sweep(global)?;
    let targets = collect_targets(&sweep)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_targets(&mut out, &targets, &sweep.base_dir, args.absolute)?;

    if !global.quiet {
        eprintln!("   {} target(s) under {}", targets.len(), sweep.base_dir.display());
    }
    Ok(0)
}

/// Collects every target the configured sources produce.
pub fn collect_targets(sweep: &ResolvedSweep) -> Result<Vec<Target>, Box<dyn std::error::Error>> {
    Ok(sweep.target_source().collect(&sweep.base_dir)?)
}

fn write_targets(
    out: &mut impl Write,
    targets: &[Target],
    base_dir: &Path,
    absolute: bool,
) -> std::io::Result<()> {
    for target in targets {
        if absolute {
            writeln!(out, "{}", target.resolve(base_dir).display())?;
        } else {
            writeln!(out, "{target}")?;
        }
    }
    Ok(())
}
