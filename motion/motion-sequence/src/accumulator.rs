//! The at-most-one open path of a growing sequence.

use std::mem;

use motion_path::{Trajectory, TrajectoryBuilder};

use crate::Result;

/// Whether a path is currently being extended.
#[derive(Debug, Clone, Default)]
pub enum PathState {
    /// No open path; the next extension opens one.
    #[default]
    Idle,
    /// A path is open and accepts extensions.
    Accumulating(TrajectoryBuilder),
}

impl PathState {
    /// Returns `true` if a path is open.
    #[must_use]
    pub const fn is_accumulating(&self) -> bool {
        matches!(self, Self::Accumulating(_))
    }

    /// Open a path, replacing any previous state.
    pub fn open(&mut self, builder: TrajectoryBuilder) {
        *self = Self::Accumulating(builder);
    }

    /// The open path's builder, if any.
    pub fn builder_mut(&mut self) -> Option<&mut TrajectoryBuilder> {
        match self {
            Self::Accumulating(builder) => Some(builder),
            Self::Idle => None,
        }
    }

    /// The open path's builder, if any.
    #[must_use]
    pub const fn builder(&self) -> Option<&TrajectoryBuilder> {
        match self {
            Self::Accumulating(builder) => Some(builder),
            Self::Idle => None,
        }
    }

    /// Close the open path and return its trajectory.
    ///
    /// Returns `Ok(None)` when idle or when the open path never received a
    /// piece. The state is `Idle` afterwards even if building fails.
    pub fn close(&mut self) -> Result<Option<Trajectory>> {
        match mem::replace(self, Self::Idle) {
            Self::Accumulating(builder) if !builder.is_empty() => Ok(Some(builder.build()?)),
            Self::Accumulating(_) | Self::Idle => Ok(None),
        }
    }
}
