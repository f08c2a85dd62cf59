//! Placing pending markers on the finished segment list.
//!
//! Projection runs in two phases when a sequence is built:
//!
//! 1. [`to_global`] resolves every pending marker to a global fire time.
//!    Temporal producers yield a time directly; displacement producers yield
//!    an arc length that is converted with [`displacement_to_time`]; spatial
//!    markers are projected onto every path and converted the same way.
//! 2. [`bind_to_segments`] finds the segment each global time falls in and
//!    attaches the marker there with a segment-local time.
//!
//! Markers that cannot be placed are dropped with a warning.

use motion_path::MotionProfile;
use motion_types::{Marker, Point2};
use tracing::{debug, warn};

use crate::config::SequenceConfig;
use crate::markers::MarkerStore;
use crate::segment::Segment;
use crate::timeline::Timeline;

/// A displacement this close past the end of a path still resolves to that
/// path's end.
const PATH_END_EPSILON: f64 = 1e-9;

/// Upper bound on bisection steps; 1100 halvings exhaust any `f64` bracket.
const MAX_BISECTION_STEPS: usize = 1100;

/// Resolve every pending marker to a global fire time.
///
/// Markers come out grouped by kind (temporal, displacement, spatial), each
/// group in registration order.
#[must_use]
pub fn to_global(
    store: &MarkerStore,
    timeline: &Timeline,
    segments: &[Segment],
    config: &SequenceConfig,
) -> Vec<Marker> {
    let mut global = Vec::with_capacity(store.len());

    for marker in store.temporal() {
        let time = marker.producer.produce(timeline.duration());
        global.push(Marker::new(time, marker.callback.clone()));
    }

    for marker in store.displacement() {
        let target = marker.producer.produce(timeline.displacement());
        match displacement_to_time(segments, target, config.time_tolerance()) {
            Some(time) => global.push(Marker::new(time, marker.callback.clone())),
            None => warn!(
                displacement = target,
                total = timeline.displacement(),
                "dropping displacement marker that does not fall on any path"
            ),
        }
    }

    for marker in store.spatial() {
        match point_to_time(
            segments,
            marker.point,
            config.projection_step(),
            config.time_tolerance(),
        ) {
            Some(time) => global.push(Marker::new(time, marker.callback.clone())),
            None => warn!(
                x = marker.point.x,
                y = marker.point.y,
                "dropping spatial marker: sequence has no path to project onto"
            ),
        }
    }

    global
}

/// Global time at which the robot has driven `displacement` along the
/// sequence's paths.
///
/// Path segments are scanned in order; turns and waits add time but no
/// displacement. A displacement on the end of a path resolves to that path's
/// end, before any turn or wait that follows it. Returns `None` if the
/// displacement is not finite or lies beyond the total path length.
#[must_use]
pub fn displacement_to_time(segments: &[Segment], displacement: f64, tolerance: f64) -> Option<f64> {
    if !displacement.is_finite() {
        return None;
    }

    let mut elapsed = 0.0;
    let mut covered = 0.0;

    for segment in segments {
        if let Some(path) = segment.as_path() {
            let length = path.length();
            let residual = displacement - covered;
            if residual <= length + PATH_END_EPSILON {
                let profile = path.trajectory().profile();
                // Past-the-end residuals land exactly on the path's end time
                let local = if residual >= length {
                    profile.duration()
                } else {
                    profile_displacement_to_time(profile, residual, tolerance)
                };
                return Some(elapsed + local);
            }
            covered += length;
        }
        elapsed += segment.duration();
    }

    None
}

/// Global time at which the robot passes closest to `point`.
///
/// Every path is searched with `step`; the nearest candidate wins, with ties
/// going to the earlier path. Returns `None` if the sequence has no path.
#[must_use]
pub fn point_to_time(segments: &[Segment], point: Point2<f64>, step: f64, tolerance: f64) -> Option<f64> {
    let mut covered = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for path in segments.iter().filter_map(Segment::as_path) {
        let trajectory = path.trajectory();
        let local = trajectory.path().project(point, step);
        let distance = (trajectory.path().get(local).position() - point).norm();

        if best.is_none_or(|(best_distance, _)| distance < best_distance) {
            best = Some((distance, covered + local));
        }
        covered += path.length();
    }

    let (distance, displacement) = best?;
    debug!(distance, displacement, "projected spatial marker onto path");
    displacement_to_time(segments, displacement, tolerance)
}

/// Time at which `profile` reaches position `x`, by bisection down to a
/// bracket of `tolerance` seconds.
///
/// Positions before the start map to 0 and positions past the end map to the
/// profile's duration. The search also stops once the bracket can no longer
/// be split in floating point, so tolerances below the float spacing of the
/// duration still terminate.
#[must_use]
pub fn profile_displacement_to_time(profile: &MotionProfile, x: f64, tolerance: f64) -> f64 {
    if x <= profile.start().x {
        return 0.0;
    }
    if x >= profile.end().x {
        return profile.duration();
    }

    let mut lo = 0.0;
    let mut hi = profile.duration();
    for _ in 0..MAX_BISECTION_STEPS {
        if hi - lo <= tolerance {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if profile.get(mid).x < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Attach global-time markers to the segments they fall in.
///
/// Each time is clamped to `[0, total duration]`; the owner is the first
/// segment whose cumulative end reaches it, so a marker on a boundary binds
/// to the earlier segment.
#[must_use]
pub fn bind_to_segments(markers: Vec<Marker>, mut segments: Vec<Segment>) -> Vec<Segment> {
    let total: f64 = segments.iter().map(Segment::duration).sum();

    for marker in markers {
        if !marker.time.is_finite() {
            warn!(time = marker.time, "dropping marker with non-finite time");
            continue;
        }
        let time = marker.time.clamp(0.0, total);

        let mut before = 0.0;
        let mut owner = None;
        for (index, segment) in segments.iter().enumerate() {
            let end = before + segment.duration();
            if end >= time {
                owner = Some(index);
                break;
            }
            before = end;
        }

        match owner {
            Some(index) => {
                segments[index] = segments[index].with_marker(marker.at(time - before));
            }
            None => warn!(time, total, "dropping marker with no owning segment"),
        }
    }

    segments
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::{PathSegment, TurnSegment, WaitSegment};
    use approx::assert_relative_eq;
    use motion_path::profile::generate_simple_profile;
    use motion_path::{PathCommand, TrajectoryBuilder};
    use motion_types::{MarkerCallback, MotionConstraints, Pose2d, Producer};

    const LIMITS: MotionConstraints = MotionConstraints::new(30.0, 30.0);

    fn forward(from: Pose2d, distance: f64) -> Segment {
        let mut builder = TrajectoryBuilder::new(from, from.heading, 0.25);
        builder.add(PathCommand::Forward(distance), LIMITS).unwrap();
        Segment::Path(PathSegment::new(builder.build().unwrap(), vec![]))
    }

    /// forward 10, wait 2, forward 6 along +x
    fn segments() -> Vec<Segment> {
        let first = forward(Pose2d::default(), 10.0);
        let wait = Segment::Wait(WaitSegment::new(first.end_pose(), 2.0, vec![]));
        let second = forward(first.end_pose(), 6.0);
        vec![first, wait, second]
    }

    #[test]
    fn test_profile_inverse() {
        let profile = generate_simple_profile(0.0, 10.0, 5.0, 5.0).unwrap();
        // Cruise phase: x = 2.5 + 5(t - 1)
        assert_relative_eq!(profile_displacement_to_time(&profile, 5.0, 1e-9), 1.5, epsilon = 1e-8);
        assert_relative_eq!(profile_displacement_to_time(&profile, -1.0, 1e-9), 0.0);
        assert_relative_eq!(profile_displacement_to_time(&profile, 11.0, 1e-9), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_inverse_with_sub_ulp_tolerance() {
        let profile = generate_simple_profile(0.0, 10.0, 5.0, 5.0).unwrap();
        assert_relative_eq!(profile_displacement_to_time(&profile, 5.0, 1e-20), 1.5, epsilon = 1e-12);
        assert_relative_eq!(profile_displacement_to_time(&profile, 5.0, 0.0), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_displacement_skips_non_path_time() {
        let segs = segments();
        let first = segs[0].duration();

        let t = displacement_to_time(&segs, 10.5, 1e-6).unwrap();
        let second = segs[2].as_path().unwrap().trajectory().profile();
        let expected = first + 2.0 + profile_displacement_to_time(second, 0.5, 1e-6);
        assert_relative_eq!(t, expected, epsilon = 1e-9);

        let t = displacement_to_time(&segs, 13.0, 1e-6).unwrap();
        let second = segs[2].as_path().unwrap().trajectory().profile();
        let expected = first + 2.0 + profile_displacement_to_time(second, 3.0, 1e-6);
        assert_relative_eq!(t, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_displacement_on_path_end_precedes_wait() {
        let segs = segments();
        let first = segs[0].duration();

        // The end of the first path fires before the wait, not after it
        assert_eq!(displacement_to_time(&segs, 10.0, 1e-6), Some(first));
        assert_eq!(displacement_to_time(&segs, 10.0 + 1e-10, 1e-6), Some(first));

        let bound = bind_to_segments(vec![Marker::new(first, MarkerCallback::noop())], segs);
        assert_eq!(bound[0].markers().len(), 1);
        assert_relative_eq!(bound[0].markers()[0].time, first);
    }

    #[test]
    fn test_displacement_at_total_length() {
        let segs = segments();
        let total: f64 = segs.iter().map(Segment::duration).sum();
        assert_relative_eq!(displacement_to_time(&segs, 16.0, 1e-6).unwrap(), total, epsilon = 1e-12);
        assert!(displacement_to_time(&segs, 16.5, 1e-6).is_none());
        assert!(displacement_to_time(&segs, f64::NAN, 1e-6).is_none());
    }

    #[test]
    fn test_point_picks_closest_path() {
        let segs = segments();
        let on_second = displacement_to_time(&segs, 14.0, 1e-6).unwrap();
        let t = point_to_time(&segs, Point2::new(14.0, 0.5), 0.25, 1e-6).unwrap();
        assert_relative_eq!(t, on_second, epsilon = 1e-4);
    }

    #[test]
    fn test_point_without_paths() {
        let wait = Segment::Wait(WaitSegment::new(Pose2d::default(), 1.0, vec![]));
        assert!(point_to_time(&[wait], Point2::new(0.0, 0.0), 0.25, 1e-6).is_none());
    }

    #[test]
    fn test_bind_clamps_and_localizes() {
        let segs = segments();
        let first = segs[0].duration();
        let total: f64 = segs.iter().map(Segment::duration).sum();

        let markers = vec![
            Marker::new(-5.0, MarkerCallback::noop()),
            Marker::new(first + 0.5, MarkerCallback::noop()),
            Marker::new(total + 10.0, MarkerCallback::noop()),
            Marker::new(f64::NAN, MarkerCallback::noop()),
        ];
        let bound = bind_to_segments(markers, segs);

        assert_eq!(bound[0].markers().len(), 1);
        assert_relative_eq!(bound[0].markers()[0].time, 0.0);
        assert_eq!(bound[1].markers().len(), 1);
        assert_relative_eq!(bound[1].markers()[0].time, 0.5, epsilon = 1e-12);
        assert_eq!(bound[2].markers().len(), 1);
        assert_relative_eq!(bound[2].markers()[0].time, bound[2].duration(), epsilon = 1e-9);
    }

    #[test]
    fn test_bind_boundary_goes_to_earlier_segment() {
        let segs = segments();
        let first = segs[0].duration();
        let bound = bind_to_segments(vec![Marker::new(first, MarkerCallback::noop())], segs);
        assert_eq!(bound[0].markers().len(), 1);
        assert!(bound[1].markers().is_empty());
        assert_relative_eq!(bound[0].markers()[0].time, first);
    }

    #[test]
    fn test_bind_zero_duration_turn() {
        let profile = generate_simple_profile(0.0, 0.0, 1.0, 1.0).unwrap();
        let turn = Segment::Turn(TurnSegment::new(Pose2d::default(), 0.0, profile, vec![]));
        let wait = Segment::Wait(WaitSegment::new(Pose2d::default(), 1.0, vec![]));
        let bound = bind_to_segments(vec![Marker::new(0.0, MarkerCallback::noop())], vec![turn, wait]);
        assert_eq!(bound[0].markers().len(), 1);
    }

    #[test]
    fn test_to_global_orders_by_kind() {
        let segs = segments();
        let mut timeline = Timeline::new();
        timeline.advance(segs.iter().map(Segment::duration).sum(), 16.0);

        let mut store = MarkerStore::new();
        store.push_spatial(Point2::new(5.0, 0.0), MarkerCallback::noop());
        store.push_displacement(Producer::affine(1.0, -6.0), MarkerCallback::noop());
        store.push_displacement(Producer::fixed(100.0), MarkerCallback::noop());
        store.push_temporal(Producer::affine(0.5, 0.0), MarkerCallback::noop());

        let global = to_global(&store, &timeline, &segs, &SequenceConfig::default());
        // Out-of-range displacement marker is dropped
        assert_eq!(global.len(), 3);
        assert_relative_eq!(global[0].time, timeline.duration() / 2.0);
        assert_relative_eq!(
            global[1].time,
            displacement_to_time(&segs, 10.0, 1e-6).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            global[2].time,
            displacement_to_time(&segs, 5.0, 1e-6).unwrap(),
            epsilon = 1e-4
        );
    }
}
