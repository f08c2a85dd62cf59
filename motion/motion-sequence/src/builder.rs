//! Incremental assembly of a [`TrajectorySequence`].
//!
//! The builder keeps at most one path open. Path commands extend it; turns,
//! waits, inserted trajectories and tangent changes close it into a path
//! segment first. When a path command cannot continue the open path
//! smoothly, the path is closed and the command is retried once on a fresh
//! path starting where the robot is.
//!
//! Markers can be registered at any point and are placed on the timeline
//! when [`TrajectorySequenceBuilder::build`] runs.
//!
//! # Example
//!
//! ```
//! use motion_sequence::TrajectorySequenceBuilder;
//! use motion_types::{DriveConstraints, MarkerCallback, Pose2d};
//! use std::f64::consts::FRAC_PI_2;
//!
//! # fn main() -> motion_sequence::Result<()> {
//! let drive = DriveConstraints::new(30.0, 30.0, 3.0, 3.0);
//! let mut builder = TrajectorySequenceBuilder::from_drive_constraints(Pose2d::default(), &drive);
//!
//! builder
//!     .forward(24.0)?
//!     .add_displacement_marker(MarkerCallback::noop())
//!     .turn(FRAC_PI_2)?
//!     .wait_seconds(1.0)?
//!     .forward(12.0)?;
//!
//! let sequence = builder.build()?;
//! assert_eq!(sequence.len(), 4);
//! assert!((sequence.end().heading - FRAC_PI_2).abs() < 1e-9);
//! assert_eq!(sequence.markers().count(), 1);
//! # Ok(())
//! # }
//! ```

use std::f64::consts::PI;

use motion_path::profile::generate_simple_profile;
use motion_path::{PathCommand, PathError, Trajectory, TrajectoryBuilder};
use motion_types::{
    DriveConstraints, MarkerCallback, MotionConstraints, Point2, Pose2d, Producer, TurnConstraints,
    angle,
};
use tracing::{debug, info};

use crate::accumulator::PathState;
use crate::config::SequenceConfig;
use crate::markers::MarkerStore;
use crate::projector;
use crate::segment::{PathSegment, Segment, TurnSegment, WaitSegment};
use crate::sequence::TrajectorySequence;
use crate::timeline::Timeline;
use crate::{Result, SequenceError};

/// Builds a [`TrajectorySequence`] from drive, turn and wait commands.
#[derive(Debug, Clone)]
pub struct TrajectorySequenceBuilder {
    config: SequenceConfig,

    base_constraints: MotionConstraints,
    base_turn_constraints: TurnConstraints,
    current_constraints: MotionConstraints,
    current_turn_constraints: TurnConstraints,

    last_pose: Pose2d,
    tangent_offset: f64,
    absolute_tangent: Option<f64>,

    segments: Vec<Segment>,
    state: PathState,
    timeline: Timeline,
    markers: MarkerStore,
}

impl TrajectorySequenceBuilder {
    /// Create a builder at `start_pose` with base translational and angular
    /// limits.
    ///
    /// Paths initially travel along the start heading.
    #[must_use]
    pub fn new(
        start_pose: Pose2d,
        constraints: MotionConstraints,
        turn_constraints: TurnConstraints,
    ) -> Self {
        Self {
            config: SequenceConfig::default(),
            base_constraints: constraints,
            base_turn_constraints: turn_constraints,
            current_constraints: constraints,
            current_turn_constraints: turn_constraints,
            last_pose: start_pose,
            tangent_offset: 0.0,
            absolute_tangent: None,
            segments: Vec::new(),
            state: PathState::Idle,
            timeline: Timeline::new(),
            markers: MarkerStore::new(),
        }
    }

    /// Create a builder from the limits of a drive base.
    #[must_use]
    pub fn from_drive_constraints(start_pose: Pose2d, drive: &DriveConstraints) -> Self {
        Self::new(start_pose, drive.motion(), drive.turn())
    }

    /// Start paths along `tangent` instead of the start heading.
    #[must_use]
    pub const fn with_start_tangent(mut self, tangent: f64) -> Self {
        self.absolute_tangent = Some(tangent);
        self
    }

    /// Replace the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidConfig`] listing every problem found
    /// by [`SequenceConfig::validate`].
    pub fn with_config(mut self, config: SequenceConfig) -> Result<Self> {
        let issues = config.validate();
        if !issues.is_empty() {
            return Err(SequenceError::invalid_config(issues.join("; ")));
        }
        self.config = config;
        Ok(self)
    }

    /// The numeric settings in use.
    #[must_use]
    pub const fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Elapsed time of everything added so far, in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Path length driven by everything added so far.
    #[must_use]
    pub const fn displacement(&self) -> f64 {
        self.timeline.displacement()
    }

    /// Pose at the end of everything added so far.
    #[must_use]
    pub const fn last_pose(&self) -> Pose2d {
        self.last_pose
    }

    /// Translational limits applied to the next path command.
    #[must_use]
    pub const fn current_constraints(&self) -> MotionConstraints {
        self.current_constraints
    }

    /// Angular limits applied to the next turn.
    #[must_use]
    pub const fn current_turn_constraints(&self) -> TurnConstraints {
        self.current_turn_constraints
    }

    // =========================================================================
    // Path commands
    // =========================================================================

    /// Drive straight to `end`, facing along the line.
    pub fn line_to(&mut self, end: Point2<f64>) -> Result<&mut Self> {
        self.add_path_command(PathCommand::LineTo(end))
    }

    /// Drive straight to `end` without turning.
    pub fn line_to_constant_heading(&mut self, end: Point2<f64>) -> Result<&mut Self> {
        self.add_path_command(PathCommand::LineToConstantHeading(end))
    }

    /// Drive straight to `end`, turning evenly to its heading.
    pub fn line_to_linear_heading(&mut self, end: Pose2d) -> Result<&mut Self> {
        self.add_path_command(PathCommand::LineToLinearHeading(end))
    }

    /// Drive straight to `end`, easing into its heading.
    pub fn line_to_spline_heading(&mut self, end: Pose2d) -> Result<&mut Self> {
        self.add_path_command(PathCommand::LineToSplineHeading(end))
    }

    /// Strafe straight to `end`.
    pub fn strafe_to(&mut self, end: Point2<f64>) -> Result<&mut Self> {
        self.add_path_command(PathCommand::StrafeTo(end))
    }

    /// Drive `distance` along the current heading.
    pub fn forward(&mut self, distance: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::Forward(distance))
    }

    /// Drive `distance` against the current heading.
    pub fn back(&mut self, distance: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::Back(distance))
    }

    /// Strafe `distance` to the left.
    pub fn strafe_left(&mut self, distance: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::StrafeLeft(distance))
    }

    /// Strafe `distance` to the right.
    pub fn strafe_right(&mut self, distance: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::StrafeRight(distance))
    }

    /// Curve to `end`, arriving along `end_tangent`, facing along the curve.
    pub fn spline_to(&mut self, end: Point2<f64>, end_tangent: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::SplineTo(end, end_tangent))
    }

    /// Curve to `end` without turning.
    pub fn spline_to_constant_heading(
        &mut self,
        end: Point2<f64>,
        end_tangent: f64,
    ) -> Result<&mut Self> {
        self.add_path_command(PathCommand::SplineToConstantHeading(end, end_tangent))
    }

    /// Curve to `end`, turning evenly to its heading.
    pub fn spline_to_linear_heading(&mut self, end: Pose2d, end_tangent: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::SplineToLinearHeading(end, end_tangent))
    }

    /// Curve to `end`, easing into its heading.
    pub fn spline_to_spline_heading(&mut self, end: Pose2d, end_tangent: f64) -> Result<&mut Self> {
        self.add_path_command(PathCommand::SplineToSplineHeading(end, end_tangent))
    }

    /// Extend the open path with `command` under the current limits.
    pub fn add_path_command(&mut self, command: PathCommand) -> Result<&mut Self> {
        self.add_path(command, self.current_constraints)
    }

    /// Extend the open path with `command` under explicit limits.
    pub fn add_path_command_with(
        &mut self,
        command: PathCommand,
        constraints: MotionConstraints,
    ) -> Result<&mut Self> {
        self.add_path(command, constraints)
    }

    fn add_path(&mut self, command: PathCommand, constraints: MotionConstraints) -> Result<&mut Self> {
        if !self.state.is_accumulating() {
            self.new_path()?;
        }

        match self.extend(command, constraints) {
            Err(err) if err.is_continuity_violation() => {
                debug!(?command, "path continuity violated, retrying on a fresh path");
                self.new_path()?;
                self.extend(command, constraints)?;
            }
            other => other?,
        }

        let trajectory = self
            .state
            .builder()
            .ok_or(PathError::EmptyPath)?
            .build()?;

        self.timeline
            .track_open_path(trajectory.duration(), trajectory.length());
        self.last_pose = trajectory.end();

        Ok(self)
    }

    fn extend(
        &mut self,
        command: PathCommand,
        constraints: MotionConstraints,
    ) -> std::result::Result<(), PathError> {
        self.state
            .builder_mut()
            .ok_or(PathError::EmptyPath)?
            .add(command, constraints)
    }

    /// Close the open path, if any, into a path segment.
    fn push_path(&mut self) -> Result<()> {
        if let Some(trajectory) = self.state.close()? {
            debug!(
                duration = trajectory.duration(),
                length = trajectory.length(),
                "closed path segment"
            );
            self.segments
                .push(Segment::Path(PathSegment::new(trajectory, Vec::new())));
        }
        Ok(())
    }

    /// Close any open path and open a new one at the current pose.
    fn new_path(&mut self) -> Result<()> {
        self.push_path()?;
        self.timeline.reset_path_baseline();

        let tangent = self
            .absolute_tangent
            .unwrap_or_else(|| angle::norm(self.last_pose.heading + self.tangent_offset));
        debug!(
            x = self.last_pose.x,
            y = self.last_pose.y,
            tangent,
            "opened path"
        );
        self.state.open(TrajectoryBuilder::new(
            self.last_pose,
            tangent,
            self.config.resolution(),
        ));
        Ok(())
    }

    // =========================================================================
    // Tangent control
    // =========================================================================

    /// Start the next path along the absolute direction `tangent`.
    ///
    /// Closes the open path.
    pub fn set_tangent(&mut self, tangent: f64) -> Result<&mut Self> {
        self.absolute_tangent = Some(tangent);
        self.push_path()?;
        Ok(self)
    }

    /// Drive subsequent paths backwards (`true`) or forwards (`false`)
    /// relative to the robot's heading.
    ///
    /// Closes the open path and clears any absolute tangent.
    pub fn set_reversed(&mut self, reversed: bool) -> Result<&mut Self> {
        self.absolute_tangent = None;
        self.tangent_offset = if reversed { PI } else { 0.0 };
        self.push_path()?;
        Ok(self)
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// Replace the translational limits for subsequent path commands.
    pub const fn set_constraints(&mut self, constraints: MotionConstraints) -> &mut Self {
        self.current_constraints = constraints;
        self
    }

    /// Restore the base translational limits.
    pub const fn reset_constraints(&mut self) -> &mut Self {
        self.current_constraints = self.base_constraints;
        self
    }

    /// Set the maximum velocity for subsequent path commands.
    pub const fn set_max_vel(&mut self, max_vel: f64) -> &mut Self {
        self.current_constraints = self.current_constraints.with_max_vel(max_vel);
        self
    }

    /// Restore the base maximum velocity.
    pub const fn reset_vel_constraint(&mut self) -> &mut Self {
        self.current_constraints = self
            .current_constraints
            .with_max_vel(self.base_constraints.max_vel());
        self
    }

    /// Set the maximum acceleration for subsequent path commands.
    pub const fn set_max_accel(&mut self, max_accel: f64) -> &mut Self {
        self.current_constraints = self.current_constraints.with_max_accel(max_accel);
        self
    }

    /// Restore the base maximum acceleration.
    pub const fn reset_accel_constraint(&mut self) -> &mut Self {
        self.current_constraints = self
            .current_constraints
            .with_max_accel(self.base_constraints.max_accel());
        self
    }

    /// Replace the angular limits for subsequent turns.
    pub const fn set_turn_constraint(&mut self, max_ang_vel: f64, max_ang_accel: f64) -> &mut Self {
        self.current_turn_constraints = TurnConstraints::new(max_ang_vel, max_ang_accel);
        self
    }

    /// Restore the base angular limits.
    pub const fn reset_turn_constraint(&mut self) -> &mut Self {
        self.current_turn_constraints = self.base_turn_constraints;
        self
    }

    // =========================================================================
    // Turns, waits and raw trajectories
    // =========================================================================

    /// Rotate in place by `angle` radians under the current angular limits.
    pub fn turn(&mut self, angle: f64) -> Result<&mut Self> {
        self.turn_with(angle, self.current_turn_constraints)
    }

    /// Rotate in place by `angle` radians under explicit angular limits.
    pub fn turn_with(&mut self, angle: f64, constraints: TurnConstraints) -> Result<&mut Self> {
        self.push_path()?;

        let heading = self.last_pose.heading;
        let profile = generate_simple_profile(
            heading,
            heading + angle,
            constraints.max_ang_vel(),
            constraints.max_ang_accel(),
        )?;
        let duration = profile.duration();

        self.segments.push(Segment::Turn(TurnSegment::new(
            self.last_pose,
            angle,
            profile,
            Vec::new(),
        )));
        self.last_pose = self.last_pose.rotated(angle);
        self.timeline.advance_duration(duration);

        debug!(angle, duration, "appended turn segment");
        Ok(self)
    }

    /// Hold the current pose for `seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidDuration`] if `seconds` is negative or
    /// not finite.
    pub fn wait_seconds(&mut self, seconds: f64) -> Result<&mut Self> {
        if !(seconds.is_finite() && seconds >= 0.0) {
            return Err(SequenceError::InvalidDuration(seconds));
        }
        self.push_path()?;

        self.segments.push(Segment::Wait(WaitSegment::new(
            self.last_pose,
            seconds,
            Vec::new(),
        )));
        self.timeline.advance_duration(seconds);

        debug!(seconds, "appended wait segment");
        Ok(self)
    }

    /// Append a prebuilt trajectory as its own path segment.
    ///
    /// The trajectory is not checked against the current pose.
    pub fn add_trajectory(&mut self, trajectory: Trajectory) -> Result<&mut Self> {
        self.push_path()?;

        self.timeline
            .advance(trajectory.duration(), trajectory.length());
        self.last_pose = trajectory.end();
        self.segments
            .push(Segment::Path(PathSegment::new(trajectory, Vec::new())));

        debug!("appended prebuilt trajectory");
        Ok(self)
    }

    // =========================================================================
    // Markers
    // =========================================================================

    /// Fire `callback` at the time reached so far.
    pub fn add_temporal_marker(&mut self, callback: MarkerCallback) -> &mut Self {
        self.add_temporal_marker_offset(0.0, callback)
    }

    /// Fire `callback` `offset` seconds after the time reached so far.
    pub fn add_temporal_marker_offset(&mut self, offset: f64, callback: MarkerCallback) -> &mut Self {
        let time = self.timeline.duration() + offset;
        self.add_temporal_marker_with(Producer::fixed(time), callback)
    }

    /// Fire `callback` at global time `time`.
    pub fn add_temporal_marker_at(&mut self, time: f64, callback: MarkerCallback) -> &mut Self {
        self.add_temporal_marker_with(Producer::fixed(time), callback)
    }

    /// Fire `callback` at `scale * total_duration + offset`, evaluated on the
    /// finished sequence.
    pub fn add_temporal_marker_scaled(
        &mut self,
        scale: f64,
        offset: f64,
        callback: MarkerCallback,
    ) -> &mut Self {
        self.add_temporal_marker_with(Producer::affine(scale, offset), callback)
    }

    /// Fire `callback` at the time `producer` yields for the finished
    /// sequence's duration.
    pub fn add_temporal_marker_with(&mut self, producer: Producer, callback: MarkerCallback) -> &mut Self {
        self.markers.push_temporal(producer, callback);
        self
    }

    /// Fire `callback` at the displacement reached so far.
    pub fn add_displacement_marker(&mut self, callback: MarkerCallback) -> &mut Self {
        self.add_displacement_marker_offset(0.0, callback)
    }

    /// Fire `callback` `offset` units of path after the displacement reached
    /// so far.
    pub fn add_displacement_marker_offset(
        &mut self,
        offset: f64,
        callback: MarkerCallback,
    ) -> &mut Self {
        let displacement = self.timeline.displacement() + offset;
        self.add_displacement_marker_with(Producer::fixed(displacement), callback)
    }

    /// Fire `callback` once `displacement` units of path have been driven.
    pub fn add_displacement_marker_at(&mut self, displacement: f64, callback: MarkerCallback) -> &mut Self {
        self.add_displacement_marker_with(Producer::fixed(displacement), callback)
    }

    /// Fire `callback` at `scale * total_displacement + offset`, evaluated on
    /// the finished sequence.
    pub fn add_displacement_marker_scaled(
        &mut self,
        scale: f64,
        offset: f64,
        callback: MarkerCallback,
    ) -> &mut Self {
        self.add_displacement_marker_with(Producer::affine(scale, offset), callback)
    }

    /// Fire `callback` at the displacement `producer` yields for the finished
    /// sequence's total displacement.
    pub fn add_displacement_marker_with(
        &mut self,
        producer: Producer,
        callback: MarkerCallback,
    ) -> &mut Self {
        self.markers.push_displacement(producer, callback);
        self
    }

    /// Fire `callback` where the robot passes closest to `point`.
    pub fn add_spatial_marker(&mut self, point: Point2<f64>, callback: MarkerCallback) -> &mut Self {
        self.markers.push_spatial(point, callback);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Close any open path, place every marker, and produce the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptySequence`] if nothing was added.
    pub fn build(mut self) -> Result<TrajectorySequence> {
        self.push_path()?;

        let global = projector::to_global(&self.markers, &self.timeline, &self.segments, &self.config);
        let placed = global.len();
        let segments = projector::bind_to_segments(global, self.segments);
        let sequence = TrajectorySequence::new(segments)?;

        info!(
            segments = sequence.len(),
            duration = sequence.duration(),
            markers = placed,
            dropped = self.markers.len() - placed,
            "built trajectory sequence"
        );
        Ok(sequence)
    }
}
