//! Arc-length parameterized paths built from curve pieces.
//!
//! A [`Path`] is a G1-continuous chain of [`PathPiece`]s. Each piece carries
//! its own heading behaviour and translational limits, so a single path can
//! slow down for one stretch and strafe along another.

use motion_types::{MotionConstraints, Point2, Pose2d};

use crate::curve::{ArcLengthCurve, Curve2d};
use crate::heading::HeadingInterpolation;
use crate::{PathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Golden-section bracket width at which projection stops refining.
const PROJECTION_TOLERANCE: f64 = 1e-9;

/// Most coarse samples taken by [`Path::project`], whatever the step.
const MAX_PROJECTION_SAMPLES: f64 = 100_000.0;

/// One curve of a path, with its heading behaviour and limits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathPiece {
    curve: ArcLengthCurve,
    heading: HeadingInterpolation,
    constraints: MotionConstraints,
}

impl PathPiece {
    /// Create a piece.
    #[must_use]
    pub const fn new(
        curve: ArcLengthCurve,
        heading: HeadingInterpolation,
        constraints: MotionConstraints,
    ) -> Self {
        Self {
            curve,
            heading,
            constraints,
        }
    }

    /// The piece's curve.
    #[must_use]
    pub const fn curve(&self) -> &ArcLengthCurve {
        &self.curve
    }

    /// The piece's heading behaviour.
    #[must_use]
    pub const fn heading(&self) -> &HeadingInterpolation {
        &self.heading
    }

    /// Limits in effect along this piece.
    #[must_use]
    pub const fn constraints(&self) -> MotionConstraints {
        self.constraints
    }

    /// Arc length of the piece.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Pose at local arc length `s`.
    #[must_use]
    pub fn pose_at(&self, s: f64) -> Pose2d {
        let t = self.curve.t_at(s);
        let position = self.curve.curve().point_at(t);
        let tangent = self.curve.curve().tangent_angle_at(t);
        let heading = self.heading.heading_at(s, self.length(), tangent);
        Pose2d::from_position(position, heading)
    }

    /// Direction of travel at local arc length `s`.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> f64 {
        self.curve.tangent_angle_at_arc(s)
    }
}

/// A chain of pieces indexed by total arc length.
///
/// # Example
///
/// ```
/// use motion_path::{ArcLengthCurve, CurveKind, HeadingInterpolation, LineCurve, Path, PathPiece};
/// use motion_types::{MotionConstraints, Point2};
///
/// let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
/// let piece = PathPiece::new(
///     ArcLengthCurve::new(CurveKind::Line(line)).unwrap(),
///     HeadingInterpolation::Tangent { offset: 0.0 },
///     MotionConstraints::new(30.0, 30.0),
/// );
/// let path = Path::new(vec![piece]).unwrap();
///
/// assert!((path.length() - 10.0).abs() < 1e-12);
/// let s = path.project(Point2::new(4.0, 3.0), 0.25);
/// assert!((s - 4.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    pieces: Vec<PathPiece>,
    /// Arc length at which each piece starts.
    starts: Vec<f64>,
    length: f64,
}

impl Path {
    /// Create a path from its pieces.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if `pieces` is empty.
    pub fn new(pieces: Vec<PathPiece>) -> Result<Self> {
        if pieces.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut starts = Vec::with_capacity(pieces.len());
        let mut length = 0.0;
        for piece in &pieces {
            starts.push(length);
            length += piece.length();
        }

        Ok(Self {
            pieces,
            starts,
            length,
        })
    }

    /// Total arc length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// The pieces in order.
    #[must_use]
    pub fn pieces(&self) -> &[PathPiece] {
        &self.pieces
    }

    /// Locate the piece containing `s` (clamped to the path) and the local
    /// arc length within it.
    fn locate(&self, s: f64) -> (&PathPiece, f64) {
        let s = s.clamp(0.0, self.length);
        let idx = self
            .starts
            .partition_point(|&start| start <= s)
            .saturating_sub(1)
            .min(self.pieces.len() - 1);
        (&self.pieces[idx], s - self.starts[idx])
    }

    /// Pose at arc length `s`, clamped to `[0, length]`.
    #[must_use]
    pub fn get(&self, s: f64) -> Pose2d {
        let (piece, local) = self.locate(s);
        piece.pose_at(local)
    }

    /// Direction of travel at arc length `s`.
    #[must_use]
    pub fn tangent_angle(&self, s: f64) -> f64 {
        let (piece, local) = self.locate(s);
        piece.tangent_at(local)
    }

    /// Limits in effect at arc length `s`.
    #[must_use]
    pub fn constraints_at(&self, s: f64) -> MotionConstraints {
        self.locate(s).0.constraints()
    }

    /// Pose at the start of the path.
    #[must_use]
    pub fn start(&self) -> Pose2d {
        self.get(0.0)
    }

    /// Pose at the end of the path.
    #[must_use]
    pub fn end(&self) -> Pose2d {
        self.get(self.length)
    }

    /// Direction of travel at the start.
    #[must_use]
    pub fn start_tangent(&self) -> f64 {
        self.pieces[0].curve().start_tangent()
    }

    /// Direction of travel at the end.
    #[must_use]
    pub fn end_tangent(&self) -> f64 {
        self.pieces[self.pieces.len() - 1].curve().end_tangent()
    }

    /// Arc length of the point on the path closest to `point`.
    ///
    /// Samples the path every `step` units of arc length, then refines the
    /// best sample with golden-section search over the neighbouring interval.
    /// Steps finer than `length / 100_000` are coarsened to that.
    #[must_use]
    pub fn project(&self, point: Point2<f64>, step: f64) -> f64 {
        let dist = |s: f64| (self.get(s).position() - point).norm();

        let step = if step.is_finite() && step > 0.0 {
            step.clamp(self.length / MAX_PROJECTION_SAMPLES, self.length)
        } else {
            self.length
        };

        let mut best_s = 0.0;
        let mut best_dist = dist(0.0);
        let mut s = step;
        loop {
            let clamped = s.min(self.length);
            let d = dist(clamped);
            if d < best_dist {
                best_dist = d;
                best_s = clamped;
            }
            if clamped >= self.length {
                break;
            }
            s += step;
        }

        // Refine with golden section search
        let golden = (5.0_f64.sqrt() - 1.0) / 2.0;

        let mut a = (best_s - step).max(0.0);
        let mut b = (best_s + step).min(self.length);

        let mut c = b - golden * (b - a);
        let mut d = a + golden * (b - a);

        while (b - a) > PROJECTION_TOLERANCE {
            if dist(c) < dist(d) {
                b = d;
                d = c;
                c = b - golden * (b - a);
            } else {
                a = c;
                c = d;
                d = a + golden * (b - a);
            }
        }

        let refined = (a + b) / 2.0;
        if dist(refined) <= best_dist {
            refined
        } else {
            best_s
        }
    }
}
