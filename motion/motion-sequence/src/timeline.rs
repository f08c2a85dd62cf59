//! Running totals of a growing sequence.

/// Elapsed duration and displacement, plus a snapshot of the open path.
///
/// The open path is rebuilt after every extension, so its contribution is
/// added as a delta against the previous snapshot of the same path rather
/// than recomputed from the totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timeline {
    duration: f64,
    displacement: f64,
    last_path_duration: f64,
    last_path_length: f64,
}

impl Timeline {
    /// A timeline at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duration: 0.0,
            displacement: 0.0,
            last_path_duration: 0.0,
            last_path_length: 0.0,
        }
    }

    /// Elapsed time in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Elapsed path length.
    #[must_use]
    pub const fn displacement(&self) -> f64 {
        self.displacement
    }

    /// Duration of the open path at its last snapshot.
    #[must_use]
    pub const fn last_path_duration(&self) -> f64 {
        self.last_path_duration
    }

    /// Length of the open path at its last snapshot.
    #[must_use]
    pub const fn last_path_length(&self) -> f64 {
        self.last_path_length
    }

    /// Add time without displacement (turns and waits).
    pub fn advance_duration(&mut self, dt: f64) {
        self.duration += dt;
    }

    /// Add time and displacement of a finished trajectory.
    pub fn advance(&mut self, dt: f64, ds: f64) {
        self.duration += dt;
        self.displacement += ds;
    }

    /// Record a new snapshot of the open path and return the
    /// `(duration, displacement)` deltas that were added to the totals.
    pub fn track_open_path(&mut self, path_duration: f64, path_length: f64) -> (f64, f64) {
        let dt = path_duration - self.last_path_duration;
        let ds = path_length - self.last_path_length;
        self.advance(dt, ds);
        self.last_path_duration = path_duration;
        self.last_path_length = path_length;
        (dt, ds)
    }

    /// Forget the open path snapshot before starting a new path.
    pub fn reset_path_baseline(&mut self) {
        self.last_path_duration = 0.0;
        self.last_path_length = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_path_deltas() {
        let mut timeline = Timeline::new();
        timeline.advance_duration(1.0);

        let (dt, ds) = timeline.track_open_path(2.0, 10.0);
        assert_relative_eq!(dt, 2.0);
        assert_relative_eq!(ds, 10.0);

        // Growing the same path only adds the difference
        let (dt, ds) = timeline.track_open_path(3.5, 16.0);
        assert_relative_eq!(dt, 1.5);
        assert_relative_eq!(ds, 6.0);

        assert_relative_eq!(timeline.duration(), 4.5);
        assert_relative_eq!(timeline.displacement(), 16.0);
    }

    #[test]
    fn test_reset_baseline_starts_new_path() {
        let mut timeline = Timeline::new();
        timeline.track_open_path(2.0, 10.0);
        timeline.reset_path_baseline();
        assert_relative_eq!(timeline.last_path_duration(), 0.0);

        timeline.track_open_path(1.0, 4.0);
        assert_relative_eq!(timeline.duration(), 3.0);
        assert_relative_eq!(timeline.displacement(), 14.0);
    }
}
