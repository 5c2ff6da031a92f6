//! Append-only log sinks for sweep diagnostics.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// An append-only, fire-and-forget logging channel.
///
/// Emitting never fails and never blocks the caller on a broken channel:
/// implementations swallow their own delivery problems.
pub trait LogSink: Send + Sync {
    /// Appends one diagnostic to the channel.
    fn emit(&self, diag: Diagnostic);
}

/// Collects diagnostics in emission order, for rendering after a sweep.
///
/// Per-severity counts are kept in atomics so callers can ask "did anything
/// fail?" without taking the lock or cloning the buffer.
#[derive(Default)]
pub struct DiagnosticSink {
    buffer: Mutex<Vec<Diagnostic>>,
    notes: AtomicUsize,
    warnings: AtomicUsize,
    errors: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic. Safe to call from several threads at once.
    pub fn emit(&self, diag: Diagnostic) {
        self.counter(diag.severity).fetch_add(1, Ordering::Relaxed);
        self.buffer().push(diag);
    }

    /// Number of diagnostics ever emitted at `severity`, including drained ones.
    pub fn count(&self, severity: Severity) -> usize {
        self.counter(severity).load(Ordering::Relaxed)
    }

    /// Number of error diagnostics ever emitted.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Returns `true` if any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Drains the buffer. Counts are not reset.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.buffer())
    }

    /// Copies the buffer without draining it.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.buffer().clone()
    }

    fn counter(&self, severity: Severity) -> &AtomicUsize {
        match severity {
            Severity::Note => &self.notes,
            Severity::Warning => &self.warnings,
            Severity::Error => &self.errors,
        }
    }

    // A poisoned lock still guards a valid Vec.
    fn buffer(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for DiagnosticSink {
    fn emit(&self, diag: Diagnostic) {
        DiagnosticSink::emit(self, diag);
    }
}

/// Forwards diagnostics to the `log` facade under a fixed target.
///
/// Severity maps onto the log level via [`Severity::log_level`]; the file
/// path, when present, is appended to the line.
pub struct LogFacadeSink {
    target: &'static str,
}

impl LogFacadeSink {
    /// Creates a sink logging under the `prewarm` target.
    pub fn new() -> Self {
        Self::with_target("prewarm")
    }

    /// Creates a sink logging under a custom target.
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogFacadeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for LogFacadeSink {
    fn emit(&self, diag: Diagnostic) {
        let level = diag.severity.log_level();
        match &diag.path {
            Some(path) => log::log!(target: self.target, level, "{diag} ({})", path.display()),
            None => log::log!(target: self.target, level, "{diag}"),
        }
        for note in &diag.notes {
            log::log!(target: self.target, level, "  = note: {note}");
        }
    }
}
