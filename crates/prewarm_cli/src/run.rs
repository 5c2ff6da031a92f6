//! `prewarm run`: precompiles every configured target.

use prewarm_config::ResolvedSweep;
use prewarm_diagnostics::{
    DiagnosticRenderer, DiagnosticSink, LogFacadeSink, LogSink, Severity, TerminalRenderer,
};
use prewarm_sweep::{SweepMode, SweepReport, SweepResult, Sweeper};

use crate::pipeline::{load_sweep, HostCompiler};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the `prewarm run` command.
///
/// Per-target failures never abort the sweep. The exit code is 1 only when
/// `--strict` or `fail_on_error` is set and at least one target failed.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sweep = load_sweep(global)?;
    let compiler = HostCompiler::from_resolved(&sweep.compiler);
    let mode = effective_mode(&sweep, args);

    let report = match args.format {
        ReportFormat::Text => {
            let sink = DiagnosticSink::new();
            let report = execute(&sweep, &compiler, mode, &sink)?;
            render_diagnostics(&sink, global);
            report
        }
        ReportFormat::Json => {
            let report = execute(&sweep, &compiler, mode, &LogFacadeSink::new())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            report
        }
    };

    Ok(exit_code(&report.result, args.strict || sweep.fail_on_error))
}

fn execute(
    sweep: &ResolvedSweep,
    compiler: &HostCompiler,
    mode: SweepMode,
    sink: &dyn LogSink,
) -> Result<SweepReport, Box<dyn std::error::Error>> {
    let source = sweep.target_source();
    let report = Sweeper::new(compiler.primitive(), sink)
        .with_mode(mode)
        .run_source(&sweep.base_dir, &source)?;
    compiler.finish();
    Ok(report)
}

/// `--parallel` overrides the configured mode; it never forces sequential.
fn effective_mode(sweep: &ResolvedSweep, args: &RunArgs) -> SweepMode {
    if args.parallel {
        SweepMode::Parallel
    } else {
        sweep.mode
    }
}

fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.take_all() {
        if is_shown(diag.severity, global.quiet) {
            eprintln!("{}", renderer.render(&diag));
        }
    }
}

/// `--quiet` keeps only errors.
fn is_shown(severity: Severity, quiet: bool) -> bool {
    !quiet || severity.is_error()
}

fn exit_code(result: &SweepResult, fail_on_error: bool) -> i32 {
    if fail_on_error && result.failed > 0 {
        1
    } else {
        0
    }
}
