//! Deferred callbacks and their fire-point producers.
//!
//! A [`Marker`] pairs a fire time with a [`MarkerCallback`]. Before a marker
//! is bound to a segment, its fire point is described by a [`Producer`]: a
//! function from the running total (duration or displacement) at build time
//! to the fire point.

use std::fmt;
use std::sync::Arc;

/// An opaque, shareable callback attached to a marker.
///
/// The motion crates only store, reorder and reattach callbacks. Executors
/// that play a finished sequence call [`MarkerCallback::fire`].
///
/// # Example
///
/// ```
/// use motion_types::MarkerCallback;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let count = Arc::new(AtomicUsize::new(0));
/// let seen = Arc::clone(&count);
/// let callback = MarkerCallback::new(move || {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// callback.fire();
/// callback.clone().fire();
/// assert_eq!(count.load(Ordering::SeqCst), 2);
/// ```
#[derive(Clone)]
pub struct MarkerCallback(Arc<dyn Fn() + Send + Sync>);

impl MarkerCallback {
    /// Wraps a closure as a marker callback.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// A callback that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Invokes the callback.
    pub fn fire(&self) {
        (self.0)();
    }

    /// Returns `true` if both handles refer to the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MarkerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MarkerCallback(..)")
    }
}

/// A callback bound to a fire time.
///
/// While markers are being projected the time is global (seconds from the
/// start of the sequence); once bound to a segment it is local to that
/// segment.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Fire time in seconds.
    pub time: f64,
    /// Callback to invoke at `time`.
    pub callback: MarkerCallback,
}

impl Marker {
    /// Creates a marker.
    #[must_use]
    pub const fn new(time: f64, callback: MarkerCallback) -> Self {
        Self { time, callback }
    }

    /// Returns a copy of this marker moved to `time`.
    #[must_use]
    pub fn at(&self, time: f64) -> Self {
        Self::new(time, self.callback.clone())
    }
}

/// Maps a running total to a marker fire point.
///
/// The running total is the sequence's accumulated duration (for temporal
/// markers) or accumulated path length (for displacement markers), evaluated
/// when the sequence is built.
#[derive(Clone)]
pub enum Producer {
    /// `scale * total + offset`.
    Affine {
        /// Multiplier applied to the running total.
        scale: f64,
        /// Constant added after scaling.
        offset: f64,
    },
    /// Any caller-supplied mapping.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl Producer {
    /// A producer that ignores the running total and yields `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::Producer;
    ///
    /// assert!((Producer::fixed(2.5).produce(100.0) - 2.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self::Affine {
            scale: 0.0,
            offset: value,
        }
    }

    /// A producer yielding `scale * total + offset`.
    #[must_use]
    pub const fn affine(scale: f64, offset: f64) -> Self {
        Self::Affine { scale, offset }
    }

    /// Wraps an arbitrary mapping.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Evaluates the producer for a running total.
    #[must_use]
    pub fn produce(&self, total: f64) -> f64 {
        match self {
            Self::Affine { scale, offset } => scale.mul_add(total, *offset),
            Self::Custom(f) => f(total),
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affine { scale, offset } => f
                .debug_struct("Affine")
                .field("scale", scale)
                .field("offset", offset)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_producer_forms() {
        assert_relative_eq!(Producer::fixed(3.0).produce(10.0), 3.0);
        assert_relative_eq!(Producer::affine(0.5, 1.0).produce(10.0), 6.0);
        assert_relative_eq!(Producer::custom(|t| t * t).produce(3.0), 9.0);
    }

    #[test]
    fn test_callback_identity() {
        let a = MarkerCallback::noop();
        let b = a.clone();
        let c = MarkerCallback::noop();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_marker_at_keeps_callback() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let marker = Marker::new(4.0, MarkerCallback::new(move || flag.store(true, Ordering::SeqCst)));

        let moved = marker.at(1.5);
        assert_relative_eq!(moved.time, 1.5);
        assert!(moved.callback.ptr_eq(&marker.callback));

        moved.callback.fire();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_debug_is_opaque() {
        assert_eq!(format!("{:?}", MarkerCallback::noop()), "MarkerCallback(..)");
        assert!(format!("{:?}", Producer::affine(1.0, 2.0)).contains("Affine"));
    }
}
