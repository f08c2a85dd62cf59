//! Markers waiting to be placed on the timeline.
//!
//! Markers are registered while the sequence is still growing, so their fire
//! points are stored symbolically and only resolved when the sequence is
//! built.

use motion_types::{MarkerCallback, Point2, Producer};

/// A marker whose fire time is produced from the final sequence duration.
#[derive(Debug, Clone)]
pub struct TemporalMarker {
    /// Maps the total duration to a global fire time.
    pub producer: Producer,
    /// Callback to fire.
    pub callback: MarkerCallback,
}

/// A marker whose fire point is produced from the final path displacement.
#[derive(Debug, Clone)]
pub struct DisplacementMarker {
    /// Maps the total displacement to a fire displacement.
    pub producer: Producer,
    /// Callback to fire.
    pub callback: MarkerCallback,
}

/// A marker that fires where the path passes closest to a point.
#[derive(Debug, Clone)]
pub struct SpatialMarker {
    /// Point the path should pass near.
    pub point: Point2<f64>,
    /// Callback to fire.
    pub callback: MarkerCallback,
}

/// Pending markers in registration order, one list per kind.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    temporal: Vec<TemporalMarker>,
    displacement: Vec<DisplacementMarker>,
    spatial: Vec<SpatialMarker>,
}

impl MarkerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a temporal marker.
    pub fn push_temporal(&mut self, producer: Producer, callback: MarkerCallback) {
        self.temporal.push(TemporalMarker { producer, callback });
    }

    /// Queue a displacement marker.
    pub fn push_displacement(&mut self, producer: Producer, callback: MarkerCallback) {
        self.displacement
            .push(DisplacementMarker { producer, callback });
    }

    /// Queue a spatial marker.
    pub fn push_spatial(&mut self, point: Point2<f64>, callback: MarkerCallback) {
        self.spatial.push(SpatialMarker { point, callback });
    }

    /// Pending temporal markers.
    #[must_use]
    pub fn temporal(&self) -> &[TemporalMarker] {
        &self.temporal
    }

    /// Pending displacement markers.
    #[must_use]
    pub fn displacement(&self) -> &[DisplacementMarker] {
        &self.displacement
    }

    /// Pending spatial markers.
    #[must_use]
    pub fn spatial(&self) -> &[SpatialMarker] {
        &self.spatial
    }

    /// Total number of pending markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.temporal.len() + self.displacement.len() + self.spatial.len()
    }

    /// Returns `true` if no marker is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
