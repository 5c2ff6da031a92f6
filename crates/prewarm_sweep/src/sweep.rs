//! The precompile sweep.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use prewarm_common::Target;
use prewarm_diagnostics::{Diagnostic, DiagnosticCode, LogSink};
use rayon::prelude::*;
use serde::Deserialize;

use crate::error::SweepError;
use crate::outcome::{SweepReport, TargetOutcome, TargetRecord};
use crate::primitive::{CompileFailure, CompilePrimitive, FileProbe, FsProbe};
use crate::source::TargetSource;

static FS_PROBE: FsProbe = FsProbe;

/// How targets are scheduled within one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// One target at a time, in listed order.
    #[default]
    Sequential,
    /// Targets attempted on the rayon pool; records and log lines keep listed order.
    Parallel,
}

/// Runs precompile sweeps against a set of collaborators.
///
/// A `Sweeper` holds no state between sweeps: running it twice over an
/// unchanged filesystem yields equal reports.
pub struct Sweeper<'a> {
    compiler: &'a dyn CompilePrimitive,
    probe: &'a dyn FileProbe,
    sink: &'a dyn LogSink,
    mode: SweepMode,
}

impl<'a> Sweeper<'a> {
    /// Creates a sequential sweeper that checks existence on the real filesystem.
    pub fn new(compiler: &'a dyn CompilePrimitive, sink: &'a dyn LogSink) -> Self {
        Self {
            compiler,
            probe: &FS_PROBE,
            sink,
            mode: SweepMode::Sequential,
        }
    }

    /// Replaces the existence check.
    pub fn with_probe(mut self, probe: &'a dyn FileProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Sets the scheduling mode.
    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attempts every target once and reports the outcome of each.
    ///
    /// Per-target failures are logged and counted, never returned. The only
    /// error is an unusable base directory, detected before any attempt.
    ///
    /// A panicking primitive is recorded as a compile error, but the process
    /// panic hook still runs first. Hosts that want panics kept out of stderr
    /// install their own hook, as the `prewarm` binary does.
    pub fn run(&self, base_dir: &Path, targets: &[Target]) -> Result<SweepReport, SweepError> {
        check_base_dir(base_dir)?;
        log::debug!(
            "sweeping {} target(s) under {} ({:?})",
            targets.len(),
            base_dir.display(),
            self.mode
        );

        let records: Vec<TargetRecord> = match self.mode {
            SweepMode::Sequential => targets
                .iter()
                .map(|target| {
                    let record = self.attempt(base_dir, target);
                    self.log_failure(&record);
                    record
                })
                .collect(),
            SweepMode::Parallel => {
                let records: Vec<TargetRecord> = targets
                    .par_iter()
                    .map(|target| self.attempt(base_dir, target))
                    .collect();
                for record in &records {
                    self.log_failure(record);
                }
                records
            }
        };

        let report = SweepReport::new(base_dir, records);
        self.sink.emit(Diagnostic::note(
            DiagnosticCode::SWEEP_SUMMARY,
            format!(
                "done: {} file(s) loaded, {} failed",
                report.result.loaded, report.result.failed
            ),
        ));
        Ok(report)
    }

    /// Collects targets from `source`, then runs the sweep over them.
    ///
    /// If the source cannot be collected, no target is attempted.
    pub fn run_source(
        &self,
        base_dir: &Path,
        source: &dyn TargetSource,
    ) -> Result<SweepReport, SweepError> {
        check_base_dir(base_dir)?;
        let targets = source.collect(base_dir)?;
        self.run(base_dir, &targets)
    }

    fn attempt(&self, base_dir: &Path, target: &Target) -> TargetRecord {
        let path = target.resolve(base_dir);
        let outcome = if !self.probe.is_readable_file(&path) {
            TargetOutcome::NotFound
        } else {
            match panic::catch_unwind(AssertUnwindSafe(|| self.compiler.compile(&path))) {
                Ok(Ok(())) => {
                    log::debug!("compiled {}", path.display());
                    TargetOutcome::Loaded
                }
                Ok(Err(CompileFailure { message })) => TargetOutcome::CompileError(message),
                Err(payload) => TargetOutcome::CompileError(panic_message(payload)),
            }
        };
        TargetRecord {
            target: target.clone(),
            path,
            outcome,
        }
    }

    fn log_failure(&self, record: &TargetRecord) {
        let diag = match &record.outcome {
            TargetOutcome::Loaded => return,
            TargetOutcome::NotFound => Diagnostic::warning(
                DiagnosticCode::NOT_FOUND,
                format!("file not found: {}", record.path.display()),
            ),
            TargetOutcome::CompileError(message) => Diagnostic::error(
                DiagnosticCode::COMPILE_ERROR,
                format!("failed to compile {}: {message}", record.path.display()),
            ),
        };
        self.sink.emit(diag.with_path(&record.path));
    }
}

/// Runs a sequential sweep with the filesystem probe.
pub fn run_sweep(
    base_dir: &Path,
    targets: &[Target],
    compiler: &dyn CompilePrimitive,
    sink: &dyn LogSink,
) -> Result<SweepReport, SweepError> {
    Sweeper::new(compiler, sink).run(base_dir, targets)
}

fn check_base_dir(base_dir: &Path) -> Result<(), SweepError> {
    if !base_dir.is_absolute() {
        return Err(SweepError::InvalidConfiguration(format!(
            "base directory {} is not absolute",
            base_dir.display()
        )));
    }
    if !base_dir.is_dir() {
        return Err(SweepError::InvalidConfiguration(format!(
            "base directory {} does not exist",
            base_dir.display()
        )));
    }
    Ok(())
}

/// The panic payload itself when it is a string, otherwise a fixed message.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast_ref::<&str>() {
            Some(s) => s.to_string(),
            None => "compiler panicked".to_string(),
        },
    }
}
