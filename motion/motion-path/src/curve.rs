//! Planar curves and arc-length parameterization.
//!
//! Curves are parameterized over `t ∈ [0, 1]`. Paths are indexed by arc
//! length instead, so each path piece wraps its curve in an
//! [`ArcLengthCurve`] that precomputes a length table for `s → t` lookup.

use nalgebra::{Point2, Vector2};

use crate::{PathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of intervals in each arc-length lookup table.
const ARC_TABLE_INTERVALS: usize = 64;

/// Curves shorter than this are rejected as degenerate.
const MIN_CURVE_LENGTH: f64 = 1e-9;

/// A parametric curve in the plane.
pub trait Curve2d {
    /// Evaluate the position at parameter `t ∈ [0, 1]`.
    fn point_at(&self, t: f64) -> Point2<f64>;

    /// First derivative with respect to `t`.
    fn derivative_at(&self, t: f64) -> Vector2<f64>;

    /// Second derivative with respect to `t`.
    fn second_derivative_at(&self, t: f64) -> Vector2<f64>;

    /// Direction of travel at `t`, in radians.
    fn tangent_angle_at(&self, t: f64) -> f64 {
        let d = self.derivative_at(t);
        d.y.atan2(d.x)
    }

    /// Signed curvature at `t`. Positive curvature bends counter-clockwise.
    fn curvature_at(&self, t: f64) -> f64 {
        let d1 = self.derivative_at(t);
        let d2 = self.second_derivative_at(t);
        let cross = d1.x * d2.y - d1.y * d2.x;
        let d1_norm = d1.norm();

        if d1_norm > 1e-10 {
            cross / d1_norm.powi(3)
        } else {
            0.0
        }
    }

    /// Arc length between two parameter values. Always non-negative.
    fn arc_length_between(&self, t0: f64, t1: f64) -> f64 {
        let (start, end) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        adaptive_arc_length(self, start, end, 1e-10, 20)
    }

    /// Total arc length.
    fn arc_length(&self) -> f64 {
        self.arc_length_between(0.0, 1.0)
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineCurve {
    /// Start point.
    pub start: Point2<f64>,
    /// End point.
    pub end: Point2<f64>,
}

impl LineCurve {
    /// Create a line from `start` to `end`.
    #[must_use]
    pub const fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }
}

impl Curve2d for LineCurve {
    fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + (self.end - self.start) * t
    }

    fn derivative_at(&self, _t: f64) -> Vector2<f64> {
        self.end - self.start
    }

    fn second_derivative_at(&self, _t: f64) -> Vector2<f64> {
        Vector2::zeros()
    }

    fn arc_length_between(&self, t0: f64, t1: f64) -> f64 {
        (self.end - self.start).norm() * (t1 - t0).abs()
    }
}

/// A cubic Hermite spline: fixed endpoints and end derivatives.
///
/// Equivalent to a cubic Bézier with control points
/// `p0, p0 + d0/3, p1 - d1/3, p1`.
///
/// ```text
/// H(t) = (2t³-3t²+1)p₀ + (t³-2t²+t)d₀ + (-2t³+3t²)p₁ + (t³-t²)d₁
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicHermite {
    /// Start point.
    pub p0: Point2<f64>,
    /// End point.
    pub p1: Point2<f64>,
    /// Derivative at the start.
    pub d0: Vector2<f64>,
    /// Derivative at the end.
    pub d1: Vector2<f64>,
}

impl CubicHermite {
    /// Create a spline from endpoints and end derivatives.
    #[must_use]
    pub const fn new(p0: Point2<f64>, p1: Point2<f64>, d0: Vector2<f64>, d1: Vector2<f64>) -> Self {
        Self { p0, p1, d0, d1 }
    }

    /// Create a spline leaving `p0` along `start_tangent` and arriving at
    /// `p1` along `end_tangent`.
    ///
    /// Both end derivatives get the chord length as magnitude, which keeps
    /// the parameterization close to uniform speed.
    #[must_use]
    pub fn from_tangents(p0: Point2<f64>, start_tangent: f64, p1: Point2<f64>, end_tangent: f64) -> Self {
        let chord = (p1 - p0).norm();
        Self::new(
            p0,
            p1,
            motion_types::polar(chord, start_tangent),
            motion_types::polar(chord, end_tangent),
        )
    }
}

impl Curve2d for CubicHermite {
    fn point_at(&self, t: f64) -> Point2<f64> {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Point2::from(self.p0.coords * h00 + self.d0 * h10 + self.p1.coords * h01 + self.d1 * h11)
    }

    fn derivative_at(&self, t: f64) -> Vector2<f64> {
        let t2 = t * t;

        let h00 = 6.0 * t2 - 6.0 * t;
        let h10 = 3.0 * t2 - 4.0 * t + 1.0;
        let h01 = -6.0 * t2 + 6.0 * t;
        let h11 = 3.0 * t2 - 2.0 * t;

        self.p0.coords * h00 + self.d0 * h10 + self.p1.coords * h01 + self.d1 * h11
    }

    fn second_derivative_at(&self, t: f64) -> Vector2<f64> {
        let h00 = 12.0 * t - 6.0;
        let h10 = 6.0 * t - 4.0;
        let h01 = -12.0 * t + 6.0;
        let h11 = 6.0 * t - 2.0;

        self.p0.coords * h00 + self.d0 * h10 + self.p1.coords * h01 + self.d1 * h11
    }
}

/// The curve shapes a path piece can take.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurveKind {
    /// Straight line.
    Line(LineCurve),
    /// Cubic spline.
    Spline(CubicHermite),
}

impl Curve2d for CurveKind {
    fn point_at(&self, t: f64) -> Point2<f64> {
        match self {
            Self::Line(c) => c.point_at(t),
            Self::Spline(c) => c.point_at(t),
        }
    }

    fn derivative_at(&self, t: f64) -> Vector2<f64> {
        match self {
            Self::Line(c) => c.derivative_at(t),
            Self::Spline(c) => c.derivative_at(t),
        }
    }

    fn second_derivative_at(&self, t: f64) -> Vector2<f64> {
        match self {
            Self::Line(c) => c.second_derivative_at(t),
            Self::Spline(c) => c.second_derivative_at(t),
        }
    }

    fn arc_length_between(&self, t0: f64, t1: f64) -> f64 {
        match self {
            Self::Line(c) => c.arc_length_between(t0, t1),
            Self::Spline(c) => c.arc_length_between(t0, t1),
        }
    }
}

/// A curve re-indexed by arc length `s ∈ [0, length]`.
///
/// # Example
///
/// ```
/// use motion_path::{ArcLengthCurve, CurveKind, LineCurve};
/// use nalgebra::Point2;
///
/// let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
/// let curve = ArcLengthCurve::new(CurveKind::Line(line)).unwrap();
///
/// assert!((curve.length() - 5.0).abs() < 1e-12);
/// let p = curve.point_at_arc(2.5);
/// assert!((p.x - 1.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcLengthCurve {
    curve: CurveKind,
    /// Cumulative arc length at `t = i / ARC_TABLE_INTERVALS`.
    table: Vec<f64>,
    length: f64,
}

impl ArcLengthCurve {
    /// Wrap a curve, precomputing its arc-length table.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Degenerate`] if the curve has (near) zero length.
    pub fn new(curve: CurveKind) -> Result<Self> {
        let mut table = Vec::with_capacity(ARC_TABLE_INTERVALS + 1);
        table.push(0.0);

        let mut total = 0.0;
        for i in 0..ARC_TABLE_INTERVALS {
            let t0 = i as f64 / ARC_TABLE_INTERVALS as f64;
            let t1 = (i + 1) as f64 / ARC_TABLE_INTERVALS as f64;
            total += curve.arc_length_between(t0, t1);
            table.push(total);
        }

        if !(total.is_finite() && total > MIN_CURVE_LENGTH) {
            return Err(PathError::degenerate(format!("curve length {total} is too small")));
        }

        Ok(Self {
            curve,
            table,
            length: total,
        })
    }

    /// The underlying curve.
    #[must_use]
    pub const fn curve(&self) -> &CurveKind {
        &self.curve
    }

    /// Total arc length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Convert an arc length into a curve parameter, clamping to the curve.
    #[must_use]
    pub fn t_at(&self, s: f64) -> f64 {
        if s <= 0.0 {
            return 0.0;
        }
        if s >= self.length {
            return 1.0;
        }

        // First table entry at or beyond s
        let idx = self.table.partition_point(|&len| len < s).max(1);
        let s0 = self.table[idx - 1];
        let s1 = self.table[idx];
        let t0 = (idx - 1) as f64 / ARC_TABLE_INTERVALS as f64;
        let dt = 1.0 / ARC_TABLE_INTERVALS as f64;

        let mut t = if s1 - s0 > 1e-15 {
            t0 + dt * (s - s0) / (s1 - s0)
        } else {
            t0
        };

        // Newton refinement inside the bracket
        for _ in 0..3 {
            let speed = self.curve.derivative_at(t).norm();
            if speed < 1e-12 {
                break;
            }
            let err = s0 + self.curve.arc_length_between(t0, t) - s;
            t = (t - err / speed).clamp(t0, t0 + dt);
        }

        t
    }

    /// Position at arc length `s`.
    #[must_use]
    pub fn point_at_arc(&self, s: f64) -> Point2<f64> {
        self.curve.point_at(self.t_at(s))
    }

    /// Direction of travel at arc length `s`, in radians.
    #[must_use]
    pub fn tangent_angle_at_arc(&self, s: f64) -> f64 {
        self.curve.tangent_angle_at(self.t_at(s))
    }

    /// Signed curvature at arc length `s`.
    #[must_use]
    pub fn curvature_at_arc(&self, s: f64) -> f64 {
        self.curve.curvature_at(self.t_at(s))
    }

    /// Direction of travel at the start.
    #[must_use]
    pub fn start_tangent(&self) -> f64 {
        self.curve.tangent_angle_at(0.0)
    }

    /// Direction of travel at the end.
    #[must_use]
    pub fn end_tangent(&self) -> f64 {
        self.curve.tangent_angle_at(1.0)
    }
}

/// One interval awaiting Simpson refinement, with its endpoint and midpoint
/// speeds already sampled.
struct SimpsonPanel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    estimate: f64,
    tolerance: f64,
    depth: usize,
}

impl SimpsonPanel {
    fn new(a: f64, b: f64, fa: f64, fm: f64, fb: f64, tolerance: f64, depth: usize) -> Self {
        let estimate = (b - a) / 6.0 * 4.0f64.mul_add(fm, fa + fb);
        Self { a, b, fa, fm, fb, estimate, tolerance, depth }
    }
}

/// Arc length over `[a, b]` by adaptive Simpson integration of the speed.
///
/// Panels are refined from a work list rather than by recursion; each speed
/// sample is taken once and shared by the two halves of its panel. A panel
/// is accepted once its halves agree to within `15 * tolerance` or after
/// `max_depth` splits, with the Richardson correction applied either way.
fn adaptive_arc_length<C: Curve2d + ?Sized>(
    curve: &C,
    a: f64,
    b: f64,
    tolerance: f64,
    max_depth: usize,
) -> f64 {
    let speed = |t: f64| curve.derivative_at(t).norm();

    let mut total = 0.0;
    let mut pending = vec![SimpsonPanel::new(
        a,
        b,
        speed(a),
        speed(0.5 * (a + b)),
        speed(b),
        tolerance,
        max_depth,
    )];

    while let Some(panel) = pending.pop() {
        let mid = 0.5 * (panel.a + panel.b);
        let half = 0.5 * panel.tolerance;
        let left = SimpsonPanel::new(
            panel.a,
            mid,
            panel.fa,
            speed(0.5 * (panel.a + mid)),
            panel.fm,
            half,
            panel.depth.saturating_sub(1),
        );
        let right = SimpsonPanel::new(
            mid,
            panel.b,
            panel.fm,
            speed(0.5 * (mid + panel.b)),
            panel.fb,
            half,
            panel.depth.saturating_sub(1),
        );

        let refined = left.estimate + right.estimate;
        let error = refined - panel.estimate;
        if panel.depth == 0 || error.abs() < 15.0 * panel.tolerance {
            total += refined + error / 15.0;
        } else {
            pending.push(right);
            pending.push(left);
        }
    }

    total
}
