//! Planar robot pose.

use nalgebra::{Point2, Vector2};

use crate::angle;

/// A robot pose in the plane: position plus heading in radians.
///
/// Poses are plain values. Operations that advance a heading (such as
/// [`Pose2d::rotated`]) normalize the result into `[0, 2π)`; constructors
/// store the heading as given.
///
/// # Example
///
/// ```
/// use motion_types::Pose2d;
/// use nalgebra::Point2;
///
/// let pose = Pose2d::from_position(Point2::new(3.0, 4.0), 0.0);
/// assert!((pose.position().coords.norm() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose2d {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Heading in radians, counter-clockwise from the +X axis.
    pub heading: f64,
}

impl Pose2d {
    /// Creates a pose from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Creates a pose from a position and heading.
    #[must_use]
    pub fn from_position(position: Point2<f64>, heading: f64) -> Self {
        Self::new(position.x, position.y, heading)
    }

    /// Returns the position component.
    #[must_use]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Returns the unit vector the heading points along.
    #[must_use]
    pub fn heading_vec(&self) -> Vector2<f64> {
        polar(1.0, self.heading)
    }

    /// Returns a copy with the heading replaced.
    #[must_use]
    pub const fn with_heading(self, heading: f64) -> Self {
        Self::new(self.x, self.y, heading)
    }

    /// Returns a copy rotated in place by `angle`, with the heading normalized.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Self {
        self.with_heading(angle::norm(self.heading + angle))
    }

    /// Returns a copy translated by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vector2<f64>) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.heading)
    }

    /// Euclidean distance between the positions of two poses.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.position() - self.position()).norm()
    }

    /// Returns `true` if positions agree within `epsilon` and headings point
    /// the same way within `epsilon` radians.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.distance_to(other) <= epsilon && angle::heading_eq(self.heading, other.heading, epsilon)
    }
}

/// Builds a vector from polar coordinates.
///
/// # Example
///
/// ```
/// use motion_types::polar;
/// use std::f64::consts::FRAC_PI_2;
///
/// let v = polar(2.0, FRAC_PI_2);
/// assert!(v.x.abs() < 1e-12);
/// assert!((v.y - 2.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn polar(radius: f64, theta: f64) -> Vector2<f64> {
    Vector2::new(radius * theta.cos(), radius * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_heading_vec() {
        let pose = Pose2d::new(0.0, 0.0, PI);
        let v = pose.heading_vec();
        assert_relative_eq!(v.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotated_normalizes() {
        let pose = Pose2d::new(0.0, 0.0, 0.0).rotated(-FRAC_PI_2);
        assert_relative_eq!(pose.heading, 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_translated() {
        let pose = Pose2d::new(1.0, 1.0, 0.3).translated(Vector2::new(2.0, -1.0));
        assert_relative_eq!(pose.x, 3.0);
        assert_relative_eq!(pose.y, 0.0);
        assert_relative_eq!(pose.heading, 0.3);
    }

    #[test]
    fn test_approx_eq_wraps_heading() {
        let a = Pose2d::new(1.0, 2.0, 0.0);
        let b = Pose2d::new(1.0, 2.0 + 1e-10, 2.0 * PI - 1e-10);
        assert!(a.approx_eq(&b, 1e-8));
        assert!(!a.approx_eq(&Pose2d::new(1.0, 2.0, 0.1), 1e-8));
    }
}
