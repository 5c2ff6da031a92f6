//! Behavioural properties of a full sweep over an on-disk tree.
//!
//! Each test builds a small site in a temp directory and drives the sweep
//! with stub compile primitives that count attempts or inject faults.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use prewarm_diagnostics::DiagnosticSink;
use prewarm_sweep::{
    run_sweep, Chain, CompileFailure, CompilePrimitive, DirectoryScan, StaticList, SweepError,
    SweepMode, SweepResult, Sweeper, Target, TargetOutcome,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Counts attempts per path and fails any path whose file name is listed.
struct StubCompiler {
    fail_on: Vec<&'static str>,
    attempts: Mutex<HashMap<PathBuf, usize>>,
    total: AtomicUsize,
}

impl StubCompiler {
    fn new(fail_on: &[&'static str]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            attempts: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
        }
    }

    fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    fn attempts_for(&self, path: &Path) -> usize {
        self.attempts.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

impl CompilePrimitive for StubCompiler {
    fn compile(&self, path: &Path) -> Result<(), CompileFailure> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.fail_on.contains(&name) {
            Err(CompileFailure::new(format!("cannot compile {name}")))
        } else {
            Ok(())
        }
    }
}

fn site(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        let path = dir.path().join(file.trim_start_matches('/'));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<?php // fixture").unwrap();
    }
    dir
}

fn targets(raw: &[&str]) -> Vec<Target> {
    raw.iter().map(|s| Target::new(s).unwrap()).collect()
}

fn outcome_counts(outcomes: impl Iterator<Item = TargetOutcome>) -> HashMap<TargetOutcome, usize> {
    let mut counts = HashMap::new();
    for outcome in outcomes {
        *counts.entry(outcome).or_default() += 1;
    }
    counts
}

// ===========================================================================
// Totals
// ===========================================================================

#[test]
fn loaded_plus_failed_equals_target_count() {
    let dir = site(&["/a.php", "/b.php", "/inc/c.php"]);
    let compiler = StubCompiler::new(&["b.php"]);
    let lists: [&[&str]; 4] = [
        &[],
        &["/a.php"],
        &["/a.php", "/missing.php"],
        &["/a.php", "/b.php", "/inc/c.php", "/nope.php", "/inc/nope.php"],
    ];
    for list in lists {
        let sink = DiagnosticSink::new();
        let report = run_sweep(dir.path(), &targets(list), &compiler, &sink).unwrap();
        assert_eq!(report.result.total(), list.len());
        assert_eq!(report.records.len(), list.len());
    }
}

#[test]
fn one_present_one_missing() {
    let dir = site(&["/wp-load.php"]);
    let compiler = StubCompiler::new(&[]);
    let sink = DiagnosticSink::new();

    let report = run_sweep(
        dir.path(),
        &targets(&["/wp-load.php", "/wp-includes/wp-db.php"]),
        &compiler,
        &sink,
    )
    .unwrap();

    assert_eq!(report.result, SweepResult { loaded: 1, failed: 1 });
    assert_eq!(
        report.outcome_of(&Target::new("/wp-includes/wp-db.php").unwrap()),
        Some(&TargetOutcome::NotFound)
    );
    // Missing files are never handed to the compiler.
    assert_eq!(compiler.total(), 1);
}

#[test]
fn empty_list_is_a_clean_sweep() {
    let dir = site(&[]);
    let compiler = StubCompiler::new(&[]);
    let sink = DiagnosticSink::new();

    let report = run_sweep(dir.path(), &[], &compiler, &sink).unwrap();

    assert_eq!(report.result, SweepResult { loaded: 0, failed: 0 });
    let diags = sink.take_all();
    assert_eq!(diags.len(), 1, "only the summary is logged");
    assert_eq!(diags[0].message, "done: 0 file(s) loaded, 0 failed");
}

// ===========================================================================
// Independence and exactly-once
// ===========================================================================

#[test]
fn failure_on_one_target_does_not_affect_later_targets() {
    let files = ["/t1.php", "/t2.php", "/t3.php", "/t4.php", "/t5.php"];
    let dir = site(&files);

    let clean = StubCompiler::new(&[]);
    let baseline = run_sweep(dir.path(), &targets(&files), &clean, &DiagnosticSink::new()).unwrap();

    let faulty = StubCompiler::new(&["t2.php"]);
    let report = run_sweep(dir.path(), &targets(&files), &faulty, &DiagnosticSink::new()).unwrap();

    assert_eq!(
        report.records[1].outcome,
        TargetOutcome::CompileError("cannot compile t2.php".into())
    );
    for k in 2..files.len() {
        assert_eq!(report.records[k].outcome, baseline.records[k].outcome);
        assert_eq!(faulty.attempts_for(&report.records[k].path), 1);
    }
}

#[test]
fn panicking_primitive_does_not_stop_sweep() {
    let dir = site(&["/a.php", "/b.php", "/c.php"]);
    let compiler = |path: &Path| -> Result<(), CompileFailure> {
        if path.ends_with("b.php") {
            panic!("allocator exhausted");
        }
        Ok(())
    };
    let sink = DiagnosticSink::new();

    let report = run_sweep(
        dir.path(),
        &targets(&["/a.php", "/b.php", "/c.php"]),
        &compiler,
        &sink,
    )
    .unwrap();

    assert_eq!(report.result, SweepResult { loaded: 2, failed: 1 });
    assert!(matches!(report.records[1].outcome, TargetOutcome::CompileError(_)));
    assert_eq!(sink.error_count(), 1);
}

#[test]
fn every_existing_target_is_attempted_exactly_once() {
    let files = ["/a.php", "/b.php", "/c.php"];
    let dir = site(&files);
    let compiler = StubCompiler::new(&["a.php", "c.php"]);

    let report = run_sweep(dir.path(), &targets(&files), &compiler, &DiagnosticSink::new()).unwrap();

    assert_eq!(compiler.total(), 3);
    for record in &report.records {
        assert_eq!(compiler.attempts_for(&record.path), 1);
    }
}

// ===========================================================================
// Idempotence and ordering
// ===========================================================================

#[test]
fn repeated_sweeps_give_identical_results() {
    let dir = site(&["/a.php", "/b.php"]);
    let list = targets(&["/a.php", "/b.php", "/gone.php"]);
    let compiler = StubCompiler::new(&["b.php"]);

    let first = run_sweep(dir.path(), &list, &compiler, &DiagnosticSink::new()).unwrap();
    let second = run_sweep(dir.path(), &list, &compiler, &DiagnosticSink::new()).unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(first, second);
}

#[test]
fn permutation_keeps_outcome_multiset() {
    let dir = site(&["/a.php", "/b.php", "/c.php"]);
    let compiler = StubCompiler::new(&["c.php"]);
    let forward = targets(&["/a.php", "/b.php", "/c.php", "/x.php"]);
    let mut reversed = forward.clone();
    reversed.reverse();

    let a = run_sweep(dir.path(), &forward, &compiler, &DiagnosticSink::new()).unwrap();
    let b = run_sweep(dir.path(), &reversed, &compiler, &DiagnosticSink::new()).unwrap();

    assert_eq!(
        outcome_counts(a.records.into_iter().map(|r| r.outcome)),
        outcome_counts(b.records.into_iter().map(|r| r.outcome))
    );
    assert_eq!(a.result, b.result);
}

#[test]
fn parallel_mode_matches_sequential() {
    let names: Vec<String> = (0..40).map(|i| format!("/lib/f{i:02}.php")).collect();
    let present: Vec<&str> = names.iter().step_by(3).map(String::as_str).collect();
    let dir = site(&present);
    let all: Vec<&str> = names.iter().map(String::as_str).collect();
    let list = targets(&all);
    let compiler = StubCompiler::new(&["f03.php", "f21.php"]);

    let sequential_sink = DiagnosticSink::new();
    let sequential = Sweeper::new(&compiler, &sequential_sink)
        .run(dir.path(), &list)
        .unwrap();
    let parallel_sink = DiagnosticSink::new();
    let parallel = Sweeper::new(&compiler, &parallel_sink)
        .with_mode(SweepMode::Parallel)
        .run(dir.path(), &list)
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential_sink.take_all(), parallel_sink.take_all());
}

// ===========================================================================
// Invalid configuration
// ===========================================================================

#[test]
fn failing_source_attempts_nothing() {
    let dir = site(&["/a.php"]);
    let compiler = StubCompiler::new(&[]);
    let sink = DiagnosticSink::new();
    let source = Chain::new()
        .with(StaticList::parse(&["/a.php"]).unwrap())
        .with(DirectoryScan::new("plugins/missing", &["php"]));

    let err = Sweeper::new(&compiler, &sink)
        .run_source(dir.path(), &source)
        .unwrap_err();

    assert!(matches!(err, SweepError::InvalidConfiguration(_)));
    assert_eq!(compiler.total(), 0);
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn invalid_base_dir_attempts_nothing() {
    let compiler = StubCompiler::new(&[]);
    let sink = DiagnosticSink::new();

    let err = Sweeper::new(&compiler, &sink)
        .run_source(Path::new("site"), &StaticList::parse(&["/a.php"]).unwrap())
        .unwrap_err();

    assert!(err.to_string().contains("not absolute"));
    assert_eq!(compiler.total(), 0);
}

#[test]
fn scanned_targets_are_swept() {
    let dir = site(&["/plugins/shop/includes/a.php", "/plugins/shop/includes/sub/b.php"]);
    fs::write(dir.path().join("plugins/shop/includes/notes.md"), "x").unwrap();
    let compiler = StubCompiler::new(&[]);

    let report = Sweeper::new(&compiler, &DiagnosticSink::new())
        .run_source(dir.path(), &DirectoryScan::new("plugins/shop/includes", &["php"]))
        .unwrap();

    assert_eq!(report.result, SweepResult { loaded: 2, failed: 0 });
}
