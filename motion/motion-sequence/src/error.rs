//! Error types for sequence assembly.

use motion_path::PathError;
use thiserror::Error;

/// Errors that can occur while assembling a motion sequence.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SequenceError {
    /// The sequence would contain no segments.
    #[error("a trajectory sequence needs at least one segment")]
    EmptySequence,

    /// A path, profile or trajectory could not be generated.
    ///
    /// Continuity violations only surface here when the retry on a fresh
    /// path fails as well.
    #[error("path generation failed: {0}")]
    Path(#[from] PathError),

    /// A wait duration is negative or not finite.
    #[error("invalid wait duration: {0}")]
    InvalidDuration(f64),

    /// The builder configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SequenceError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Check if this error wraps a path generation failure.
    #[must_use]
    pub const fn is_path_error(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Check if this error is an unrecovered continuity violation.
    #[must_use]
    pub fn is_continuity_violation(&self) -> bool {
        matches!(self, Self::Path(err) if err.is_continuity_violation())
    }
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, SequenceError>;
