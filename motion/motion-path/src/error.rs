//! Error types for path and profile generation.

use thiserror::Error;

/// Errors raised while building paths, profiles and trajectories.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    /// A new piece does not continue the existing path smoothly.
    ///
    /// The start tangent of the piece disagrees with the end tangent of the
    /// path built so far. Callers can recover by starting a fresh path at the
    /// current end pose.
    #[error("path continuity violated: piece starts at tangent {actual:.6} but path ends at {expected:.6}")]
    ContinuityViolation {
        /// End tangent of the existing path (radians).
        expected: f64,
        /// Start tangent of the rejected piece (radians).
        actual: f64,
    },

    /// A piece has no usable geometry (e.g., zero length).
    #[error("degenerate path piece: {reason}")]
    Degenerate {
        /// Description of the degeneracy.
        reason: String,
    },

    /// `build()` was called before any piece was added.
    #[error("cannot build a trajectory from an empty path")]
    EmptyPath,

    /// Velocity or acceleration limits are unusable.
    #[error("invalid constraints: {reason}")]
    InvalidConstraints {
        /// Description of the problem.
        reason: String,
    },
}

impl PathError {
    /// Create a continuity violation error.
    #[must_use]
    pub const fn continuity_violation(expected: f64, actual: f64) -> Self {
        Self::ContinuityViolation { expected, actual }
    }

    /// Create a degenerate piece error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }

    /// Create an invalid constraints error.
    #[must_use]
    pub fn invalid_constraints(reason: impl Into<String>) -> Self {
        Self::InvalidConstraints {
            reason: reason.into(),
        }
    }

    /// Check if this is a continuity violation.
    #[must_use]
    pub const fn is_continuity_violation(&self) -> bool {
        matches!(self, Self::ContinuityViolation { .. })
    }
}
