//! Motion sequences for mobile robots: paths, turns, waits and markers.
//!
//! A [`TrajectorySequenceBuilder`] accumulates drive commands into a list of
//! [`Segment`]s while tracking elapsed time and path length. Markers
//! (callbacks that should fire during playback) can be registered by time,
//! by distance driven, or by a point on the field; when the sequence is built
//! each one is resolved to a global time and bound to the segment it falls
//! in.
//!
//! # Modules
//!
//! - [`builder`] - The sequence builder and its path state machine
//! - [`segment`] - Path, turn and wait segments
//! - [`sequence`] - The finished [`TrajectorySequence`]
//! - [`projector`] - Marker resolution and binding
//! - [`markers`], [`timeline`], [`accumulator`] - Builder internals, exposed
//!   for inspection and testing
//!
//! # Example
//!
//! ```
//! use motion_sequence::{Segment, TrajectorySequenceBuilder};
//! use motion_types::{MarkerCallback, MotionConstraints, Point2, Pose2d, TurnConstraints};
//!
//! # fn main() -> motion_sequence::Result<()> {
//! let mut builder = TrajectorySequenceBuilder::new(
//!     Pose2d::new(0.0, 0.0, 0.0),
//!     MotionConstraints::new(30.0, 30.0),
//!     TurnConstraints::new(3.0, 3.0),
//! );
//!
//! builder
//!     .forward(20.0)?
//!     .add_spatial_marker(Point2::new(10.0, 2.0), MarkerCallback::noop())
//!     .wait_seconds(0.5)?;
//!
//! let sequence = builder.build()?;
//! assert!(matches!(sequence.get(0), Some(Segment::Path(_))));
//! assert_eq!(sequence.get(0).map(|s| s.markers().len()), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through [`tracing`]: path and segment events at `debug`,
//! finished sequences at `info`, and markers that had to be dropped at
//! `warn`. No subscriber is installed.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for [`SequenceConfig`]
//!   and the underlying path types

#![doc(html_root_url = "https://docs.rs/motion-sequence/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

pub mod accumulator;
pub mod builder;
pub mod config;
mod error;
pub mod markers;
pub mod projector;
pub mod segment;
pub mod sequence;
pub mod timeline;

pub use accumulator::PathState;
pub use builder::TrajectorySequenceBuilder;
pub use config::SequenceConfig;
pub use error::{Result, SequenceError};
pub use markers::{DisplacementMarker, MarkerStore, SpatialMarker, TemporalMarker};
pub use segment::{PathSegment, Segment, TurnSegment, WaitSegment};
pub use sequence::TrajectorySequence;
pub use timeline::Timeline;

// Re-export the collaborator crates' entry points for convenience
pub use motion_path::{PathCommand, PathError, Trajectory};
pub use motion_types::{Marker, MarkerCallback, Pose2d, Producer};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion_types::{MotionConstraints, Point2, TurnConstraints};

    #[test]
    fn test_start_tangent_shapes_first_path() {
        let mut builder = TrajectorySequenceBuilder::new(
            Pose2d::default(),
            MotionConstraints::new(30.0, 30.0),
            TurnConstraints::new(3.0, 3.0),
        )
        .with_start_tangent(std::f64::consts::FRAC_PI_2);

        // Leaves upwards before curving right
        builder
            .spline_to_constant_heading(Point2::new(10.0, 10.0), 0.0)
            .unwrap();
        let sequence = builder.build().unwrap();
        let path = sequence.get(0).unwrap().as_path().unwrap();
        assert_relative_eq!(
            path.trajectory().path().start_tangent(),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-9
        );
        assert_relative_eq!(sequence.end().heading, 0.0);
    }

    #[test]
    fn test_custom_config_is_used() {
        let config = SequenceConfig::new().with_resolution(1.0);
        let builder = TrajectorySequenceBuilder::new(
            Pose2d::default(),
            MotionConstraints::new(30.0, 30.0),
            TurnConstraints::new(3.0, 3.0),
        )
        .with_config(config)
        .unwrap();
        assert_relative_eq!(builder.config().resolution(), 1.0);
    }
}
