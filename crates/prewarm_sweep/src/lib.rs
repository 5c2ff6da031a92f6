//! Fault-tolerant batch precompilation.
//!
//! A sweep takes an ordered list of [`Target`]s below a base directory and
//! attempts to compile each one exactly once through a host-provided
//! [`CompilePrimitive`]. Missing files and compiler failures (including
//! panics) are recorded per target and never stop the sweep; the caller gets
//! a [`SweepReport`] whose [`SweepResult`] counts loaded and failed targets.
//!
//! Where the target list comes from is a separate concern: a
//! [`TargetSource`] (static list, directory scan, or a chain of both) is
//! collected before any target is attempted.

#![warn(missing_docs)]

pub mod error;
pub mod outcome;
pub mod primitive;
pub mod source;
pub mod sweep;

pub use error::SweepError;
pub use outcome::{SweepReport, SweepResult, TargetOutcome, TargetRecord};
pub use prewarm_common::Target;
pub use primitive::{CompileFailure, CompilePrimitive, FileProbe, FsProbe};
pub use source::{Chain, DirectoryScan, StaticList, TargetSource};
pub use sweep::{run_sweep, SweepMode, Sweeper};
