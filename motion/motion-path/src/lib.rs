//! Reference paths, motion profiles and trajectories for mobile robots.
//!
//! This crate provides the collaborators a motion sequence is assembled from:
//!
//! - [`Curve2d`], [`LineCurve`], [`CubicHermite`] - Planar curves
//! - [`ArcLengthCurve`] - Curves re-indexed by arc length
//! - [`HeadingInterpolation`] - Heading behaviour along a curve
//! - [`Path`], [`PathPiece`] - Smooth chains of curves with per-piece limits
//! - [`profile`] - Constant-acceleration motion profiles and their generators
//! - [`Trajectory`] - A path paired with the profile that drives it
//! - [`TrajectoryBuilder`], [`PathCommand`] - Incremental, continuity-checked
//!   trajectory construction
//!
//! # Example
//!
//! ```
//! use motion_path::{PathCommand, TrajectoryBuilder};
//! use motion_types::{MotionConstraints, Pose2d};
//!
//! let mut builder = TrajectoryBuilder::new(Pose2d::new(0.0, 0.0, 0.0), 0.0, 0.25);
//! builder
//!     .add(PathCommand::Forward(24.0), MotionConstraints::new(30.0, 30.0))
//!     .unwrap();
//!
//! let trajectory = builder.build().unwrap();
//! assert!((trajectory.length() - 24.0).abs() < 1e-9);
//! assert!((trajectory.end().x - 24.0).abs() < 1e-9);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for curves, paths,
//!   profiles and trajectories

#![doc(html_root_url = "https://docs.rs/motion-path/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::cast_precision_loss)]

pub mod builder;
pub mod curve;
mod error;
pub mod heading;
pub mod path;
pub mod profile;
pub mod trajectory;

pub use builder::{PathCommand, TrajectoryBuilder};
pub use curve::{ArcLengthCurve, CubicHermite, Curve2d, CurveKind, LineCurve};
pub use error::PathError;
pub use heading::HeadingInterpolation;
pub use path::{Path, PathPiece};
pub use profile::{MotionProfile, MotionSegment, MotionState};
pub use trajectory::Trajectory;

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
