//! Trait for sources of per-frame detections.

use crate::tracker::BoundingBox;

/// Trait for anything that produces one batch of detection boxes per frame.
///
/// Implement this trait to connect a detector, a recorded detection file or
/// any other box producer to a tracker.
///
/// # Example
///
/// ```
/// use sort_rs::{BoundingBox, DetectionSource};
///
/// struct Replay {
///     frames: std::vec::IntoIter<Vec<BoundingBox>>,
/// }
///
/// impl DetectionSource for Replay {
///     type Error = std::convert::Infallible;
///
///     fn next_frame(&mut self) -> Result<Option<Vec<BoundingBox>>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Detections of the next frame, `Ok(None)` once the source is exhausted.
    ///
    /// A frame without detections is `Ok(Some(vec![]))`; it still has to be
    /// passed to the tracker so that tracks accumulate misses.
    fn next_frame(&mut self) -> Result<Option<Vec<BoundingBox>>, Self::Error>;
}
