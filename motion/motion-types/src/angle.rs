//! Heading normalization helpers.
//!
//! Headings stored on poses live in `[0, 2π)`; differences between headings
//! live in `[-π, π)`.

use std::f64::consts::{PI, TAU};

/// Normalize an angle into `[0, 2π)`.
///
/// # Example
///
/// ```
/// use motion_types::angle;
/// use std::f64::consts::PI;
///
/// assert!((angle::norm(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
/// assert!((angle::norm(5.0 * PI) - PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn norm(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Normalize an angular difference into `[-π, π)`.
///
/// # Example
///
/// ```
/// use motion_types::angle;
/// use std::f64::consts::PI;
///
/// assert!((angle::norm_delta(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn norm_delta(angle: f64) -> f64 {
    let wrapped = norm(angle);
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Returns `true` if two headings point the same way within `epsilon` radians.
#[must_use]
pub fn heading_eq(a: f64, b: f64, epsilon: f64) -> bool {
    norm_delta(a - b).abs() <= epsilon
}
