//! Heading behaviour along a path piece.

use motion_types::angle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the robot's heading evolves while it drives along a piece.
///
/// Headings are decoupled from the direction of travel so that holonomic
/// drives can strafe or rotate while translating.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeadingInterpolation {
    /// Heading follows the direction of travel, shifted by `offset`.
    ///
    /// An offset of π drives the piece backwards.
    Tangent {
        /// Constant offset from the tangent (radians).
        offset: f64,
    },
    /// Heading is held fixed.
    Constant(f64),
    /// Heading changes linearly with arc length.
    Linear {
        /// Heading at the start of the piece.
        start: f64,
        /// Signed change over the whole piece.
        delta: f64,
    },
    /// Heading eases in and out (smoothstep in arc length).
    Spline {
        /// Heading at the start of the piece.
        start: f64,
        /// Signed change over the whole piece.
        delta: f64,
    },
}

impl HeadingInterpolation {
    /// Linear interpolation taking the shortest way from `start` to `end`.
    #[must_use]
    pub fn linear(start: f64, end: f64) -> Self {
        Self::Linear {
            start,
            delta: angle::norm_delta(end - start),
        }
    }

    /// Smoothstep interpolation taking the shortest way from `start` to `end`.
    #[must_use]
    pub fn spline(start: f64, end: f64) -> Self {
        Self::Spline {
            start,
            delta: angle::norm_delta(end - start),
        }
    }

    /// Heading at arc length `s` of a piece of length `length` whose
    /// direction of travel at `s` is `tangent`. Always normalized.
    #[must_use]
    pub fn heading_at(&self, s: f64, length: f64, tangent: f64) -> f64 {
        let u = if length > 0.0 {
            (s / length).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let raw = match *self {
            Self::Tangent { offset } => tangent + offset,
            Self::Constant(heading) => heading,
            Self::Linear { start, delta } => delta.mul_add(u, start),
            Self::Spline { start, delta } => delta.mul_add(u * u * (3.0 - 2.0 * u), start),
        };
        angle::norm(raw)
    }
}
