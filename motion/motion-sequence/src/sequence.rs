//! The finished, immutable motion sequence.

use motion_types::{Marker, Pose2d};

use crate::segment::Segment;
use crate::{Result, SequenceError};

/// An ordered, non-empty list of segments with their markers bound.
///
/// # Example
///
/// ```
/// use motion_sequence::{Segment, TrajectorySequence, WaitSegment};
/// use motion_types::Pose2d;
///
/// let pose = Pose2d::new(1.0, 2.0, 0.0);
/// let sequence = TrajectorySequence::new(vec![
///     Segment::Wait(WaitSegment::new(pose, 1.5, vec![])),
///     Segment::Wait(WaitSegment::new(pose, 0.5, vec![])),
/// ])
/// .unwrap();
///
/// assert_eq!(sequence.len(), 2);
/// assert!((sequence.duration() - 2.0).abs() < 1e-12);
/// assert_eq!(sequence.segment_at(1.75), Some((1, 0.25)));
///
/// assert!(TrajectorySequence::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TrajectorySequence {
    segments: Vec<Segment>,
}

impl TrajectorySequence {
    /// Wrap a list of segments.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptySequence`] if `segments` is empty.
    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        Ok(Self { segments })
    }

    /// Pose at the start of the first segment.
    #[must_use]
    pub fn start(&self) -> Pose2d {
        self.segments[0].start_pose()
    }

    /// Pose at the end of the last segment.
    #[must_use]
    pub fn end(&self) -> Pose2d {
        self.segments[self.segments.len() - 1].end_pose()
    }

    /// Sum of all segment durations.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(Segment::duration).sum()
    }

    /// Number of segments. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segment at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterate over the segments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// The segment running at global time `time` and the time into it.
    ///
    /// A time on a boundary belongs to the earlier segment. Returns `None`
    /// for negative, non-finite, or past-the-end times.
    #[must_use]
    pub fn segment_at(&self, time: f64) -> Option<(usize, f64)> {
        if !(time.is_finite() && time >= 0.0) {
            return None;
        }

        let mut before = 0.0;
        for (index, segment) in self.segments.iter().enumerate() {
            let end = before + segment.duration();
            if end >= time {
                return Some((index, time - before));
            }
            before = end;
        }
        None
    }

    /// Pose at global time `time`, clamped to the sequence.
    #[must_use]
    pub fn pose_at(&self, time: f64) -> Pose2d {
        if time.is_nan() || time <= 0.0 {
            return self.start();
        }
        match self.segment_at(time) {
            Some((index, local)) => self.segments[index].pose_at(local),
            None => self.end(),
        }
    }

    /// Every bound marker with its global fire time, in segment order.
    pub fn markers(&self) -> impl Iterator<Item = (f64, &Marker)> + '_ {
        let mut before = 0.0;
        self.segments.iter().flat_map(move |segment| {
            let offset = before;
            before += segment.duration();
            segment
                .markers()
                .iter()
                .map(move |marker| (offset + marker.time, marker))
        })
    }
}

impl<'a> IntoIterator for &'a TrajectorySequence {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
