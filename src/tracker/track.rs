//! Identity and history of one tracked object.

use crate::tracker::rect::BoundingBox;
use crate::tracker::track_state::TrackState;

/// A followed object. Values handed out by the tracker are snapshots taken
/// at the end of a frame; they do not change afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Track {
    track_id: u64,
    state: TrackState,
    history: Vec<BoundingBox>,
    misses: u32,
    total_misses: u32,
    prediction: BoundingBox,
}

impl Track {
    /// Start a track from its founding detection.
    pub(crate) fn new(track_id: u64, bbox: BoundingBox) -> Self {
        Self {
            track_id,
            state: TrackState::Started,
            history: vec![bbox],
            misses: 0,
            total_misses: 0,
            prediction: bbox,
        }
    }

    /// Unique identifier, assigned from 1 upwards per tracker.
    pub fn track_id(&self) -> u64 {
        self.track_id
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Matched detections, one per frame in which the track was matched.
    pub fn history(&self) -> &[BoundingBox] {
        &self.history
    }

    /// Consecutive frames without a match.
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Lifetime number of missed frames, excluding the final streak of an
    /// ended track.
    pub fn total_misses(&self) -> u32 {
        self.total_misses
    }

    /// Most recent motion-model prediction.
    pub fn prediction(&self) -> BoundingBox {
        self.prediction
    }

    /// Most recently matched detection.
    pub fn last_box(&self) -> Option<&BoundingBox> {
        self.history.last()
    }

    /// Number of frames with a matched detection.
    pub fn hits(&self) -> usize {
        self.history.len()
    }

    /// Whether the track has been matched at least `min_hits` times.
    pub fn is_confirmed(&self, min_hits: u32) -> bool {
        self.hits() >= min_hits as usize
    }

    pub(crate) fn set_prediction(&mut self, prediction: BoundingBox) {
        self.prediction = prediction;
    }

    pub(crate) fn mark_matched(&mut self, bbox: BoundingBox) {
        self.history.push(bbox);
        self.misses = 0;
        self.state = TrackState::Active;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.misses += 1;
        self.total_misses += 1;
        self.state = TrackState::Ending;
    }

    /// The terminal miss streak does not count towards `total_misses`.
    pub(crate) fn mark_ended(&mut self) {
        self.total_misses = self.total_misses.saturating_sub(self.misses);
        self.state = TrackState::Ended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(left: f32) -> BoundingBox {
        BoundingBox::new(left, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_new_track() {
        let track = Track::new(7, bbox(1.0));
        assert_eq!(track.track_id(), 7);
        assert_eq!(track.state(), TrackState::Started);
        assert_eq!(track.history(), &[bbox(1.0)]);
        assert_eq!(track.prediction(), bbox(1.0));
        assert_eq!(track.misses(), 0);
    }

    #[test]
    fn test_lifecycle_counters() {
        let mut track = Track::new(1, bbox(0.0));
        track.mark_missed();
        track.mark_matched(bbox(1.0));
        assert_eq!(track.state(), TrackState::Active);
        assert_eq!(track.misses(), 0);
        assert_eq!(track.total_misses(), 1);

        track.mark_missed();
        track.mark_missed();
        assert_eq!(track.state(), TrackState::Ending);
        assert_eq!(track.total_misses(), 3);

        track.mark_ended();
        assert_eq!(track.state(), TrackState::Ended);
        assert_eq!(track.misses(), 2);
        assert_eq!(track.total_misses(), 1);
        assert_eq!(track.hits(), 2);
        assert!(track.is_confirmed(2));
        assert!(!track.is_confirmed(3));
    }
}
