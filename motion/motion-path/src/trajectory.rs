//! A path paired with the profile that drives along it.

use motion_types::Pose2d;

use crate::path::Path;
use crate::profile::MotionProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A time-parameterized path.
///
/// The profile's position is arc length along the path, so the pose at time
/// `t` is `path.get(profile.get(t).x)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory {
    path: Path,
    profile: MotionProfile,
}

impl Trajectory {
    /// Pair a path with a profile over its arc length.
    #[must_use]
    pub const fn new(path: Path, profile: MotionProfile) -> Self {
        Self { path, profile }
    }

    /// The geometric path.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// The arc-length profile.
    #[must_use]
    pub const fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Time to drive the whole path.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.profile.duration()
    }

    /// Arc length of the path.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.path.length()
    }

    /// Pose at time `t`, clamped to `[0, duration]`.
    #[must_use]
    pub fn get(&self, t: f64) -> Pose2d {
        self.path.get(self.profile.get(t).x)
    }

    /// Pose at the start.
    #[must_use]
    pub fn start(&self) -> Pose2d {
        self.path.start()
    }

    /// Pose at the end.
    #[must_use]
    pub fn end(&self) -> Pose2d {
        self.path.end()
    }
}
