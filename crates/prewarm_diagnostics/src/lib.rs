//! Diagnostic records and log sinks for precompile sweeps.
//!
//! A sweep reports every per-target failure and its final summary as a
//! structured [`Diagnostic`]. Diagnostics are written to a [`LogSink`], an
//! append-only, fire-and-forget channel: the thread-safe [`DiagnosticSink`]
//! accumulates them for inspection, and [`LogFacadeSink`] forwards them to the
//! `log` facade. [`TerminalRenderer`] formats them for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::{DiagnosticSink, LogFacadeSink, LogSink};
