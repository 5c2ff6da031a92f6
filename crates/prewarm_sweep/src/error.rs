//! Error types for sweep setup.

use prewarm_common::TargetError;

/// Errors that abort a sweep before any target is attempted.
///
/// Per-target failures are never reported through this type; they are
/// recorded as [`TargetOutcome`](crate::TargetOutcome)s instead.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The base directory, target list, or a target source is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<TargetError> for SweepError {
    fn from(err: TargetError) -> Self {
        SweepError::InvalidConfiguration(err.to_string())
    }
}
