//! TrackerPipeline for combining a detection source with tracking.

use thiserror::Error;

use super::DetectionSource;
use crate::tracker::{MultiObjectTracker, SortTracker, Track, TrackerConfig};

#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error("detection source failed")]
    Source(#[source] E),
    #[error(transparent)]
    Tracker(#[from] crate::Error),
}

/// Bundles a [`DetectionSource`] with a tracker.
///
/// Each processed frame is fully tracked before the next one is pulled from
/// the source, and results are returned as owned snapshots.
pub struct TrackerPipeline<D: DetectionSource, T: MultiObjectTracker = SortTracker> {
    source: D,
    tracker: T,
}

impl<D> TrackerPipeline<D, SortTracker>
where
    D: DetectionSource,
    D::Error: std::error::Error + 'static,
{
    /// Create a new pipeline with a SORT tracker built from `config`.
    pub fn new(source: D, config: TrackerConfig) -> Self {
        Self::with_tracker(source, SortTracker::new(config))
    }

    /// Create a new pipeline with the default tracker configuration.
    pub fn with_default_config(source: D) -> Self {
        Self::new(source, TrackerConfig::default())
    }
}

impl<D, T> TrackerPipeline<D, T>
where
    D: DetectionSource,
    D::Error: std::error::Error + 'static,
    T: MultiObjectTracker,
{
    pub fn with_tracker(source: D, tracker: T) -> Self {
        Self { source, tracker }
    }

    /// Pull the next frame from the source and track it.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    pub fn process_frame(&mut self) -> Result<Option<Vec<Track>>, PipelineError<D::Error>> {
        let Some(detections) = self.source.next_frame().map_err(PipelineError::Source)? else {
            return Ok(None);
        };
        Ok(Some(self.tracker.track(&detections)?))
    }

    /// Track every remaining frame and collect the per-frame results.
    pub fn run(&mut self) -> Result<Vec<Vec<Track>>, PipelineError<D::Error>> {
        let mut frames = Vec::new();
        while let Some(tracks) = self.process_frame()? {
            frames.push(tracks);
        }
        Ok(frames)
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }
}
