//! SORT tracker: per-frame predict, associate, update, retire and create.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tracker::assignment::{AssignmentSolver, HungarianSolver};
use crate::tracker::box_tracker::{BoxNoise, KalmanBoxTracker};
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::rect::BoundingBox;
use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;

/// Configuration for the [`SortTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum IoU between a detection and a prediction to accept a match
    pub iou_threshold: f32,
    /// Consecutive misses tolerated before a track is retired
    pub max_age: u32,
    /// Matches before a track counts as confirmed, see [`Track::is_confirmed`].
    /// Does not filter the tracker output.
    pub min_hits: u32,
    /// Diagonal of the measurement noise covariance (cx, cy, s, r)
    pub measurement_noise: [f64; 4],
    /// Diagonal of the process noise covariance (cx, cy, s, r, vcx, vcy, vs)
    pub process_noise: [f64; 7],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let noise = BoxNoise::default();
        Self {
            iou_threshold: 0.3,
            max_age: 1,
            min_hits: 3,
            measurement_noise: noise.measurement,
            process_noise: noise.process,
        }
    }
}

impl TrackerConfig {
    fn noise(&self) -> BoxNoise {
        BoxNoise {
            measurement: self.measurement_noise,
            process: self.process_noise,
        }
    }
}

/// Common interface for multi-object trackers.
pub trait MultiObjectTracker {
    /// Process one frame of detections and return a snapshot of every known
    /// track, including tracks that ended during this frame.
    fn track(&mut self, detections: &[BoundingBox]) -> Result<Vec<Track>>;

    /// Number of tracks currently held.
    fn num_tracks(&self) -> usize;

    /// Drop all tracks. Track ids keep counting up.
    fn clear(&mut self);
}

/// Registry entry: the public track record and its motion model.
#[derive(Debug, Clone)]
struct Tracklet {
    track: Track,
    filter: KalmanBoxTracker,
}

/// SORT multi-object tracker, generic over the assignment solver.
pub struct SortTracker<S = HungarianSolver> {
    tracklets: BTreeMap<u64, Tracklet>,
    next_track_id: u64,
    frame_count: u64,
    config: TrackerConfig,
    noise: BoxNoise,
    solver: S,
}

impl SortTracker<HungarianSolver> {
    /// Create a tracker using the Hungarian solver.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_solver(config, HungarianSolver)
    }
}

impl Default for SortTracker<HungarianSolver> {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl<S: AssignmentSolver> SortTracker<S> {
    /// Create a tracker using a custom assignment solver.
    pub fn with_solver(config: TrackerConfig, solver: S) -> Self {
        Self {
            tracklets: BTreeMap::new(),
            next_track_id: 1,
            frame_count: 0,
            noise: config.noise(),
            config,
            solver,
        }
    }

    /// Get the configuration the tracker was built with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Snapshots of the tracks currently held, in id order.
    pub fn tracks(&self) -> Vec<Track> {
        self.tracklets.values().map(|t| t.track.clone()).collect()
    }

    /// Run one frame.
    ///
    /// All fallible work (prediction, association, filter updates and new
    /// filters) runs on scratch copies first; the registry is only touched
    /// once everything has succeeded, so an error leaves the tracker exactly
    /// as it was before the call.
    pub fn update(&mut self, detections: &[BoundingBox]) -> Result<Vec<Track>> {
        let candidates: Vec<BoundingBox> = detections
            .iter()
            .filter(|d| !d.is_degenerate())
            .copied()
            .collect();
        if candidates.len() != detections.len() {
            trace!(
                "dropped {} degenerate detection(s)",
                detections.len() - candidates.len()
            );
        }

        // Step 1: predict every tracklet
        let mut ids = Vec::with_capacity(self.tracklets.len());
        let mut filters = Vec::with_capacity(self.tracklets.len());
        let mut predictions = Vec::with_capacity(self.tracklets.len());
        for (&id, tracklet) in &self.tracklets {
            let mut filter = tracklet.filter.clone();
            predictions.push(filter.predict()?);
            filters.push(filter);
            ids.push(id);
        }

        // Step 2: associate detections with predictions
        let AssignmentResult {
            matches,
            unmatched_detections,
            unmatched_tracks,
        } = matching::associate(
            &candidates,
            &predictions,
            self.config.iou_threshold,
            &self.solver,
        )?;
        trace!(
            "frame {}: {} matched, {} unmatched detections, {} unmatched tracks",
            self.frame_count + 1,
            matches.len(),
            unmatched_detections.len(),
            unmatched_tracks.len()
        );

        for &(det_idx, track_idx) in &matches {
            filters[track_idx].update(&candidates[det_idx])?;
        }

        let mut new_filters = Vec::with_capacity(unmatched_detections.len());
        for &det_idx in &unmatched_detections {
            let bbox = candidates[det_idx];
            new_filters.push((bbox, KalmanBoxTracker::new(&bbox, &self.noise)?));
        }

        // Commit: nothing below can fail
        for ((id, filter), prediction) in ids.iter().zip(filters).zip(predictions) {
            if let Some(tracklet) = self.tracklets.get_mut(id) {
                tracklet.filter = filter;
                tracklet.track.set_prediction(prediction);
            }
        }

        // Step 3: matched tracks continue
        for &(det_idx, track_idx) in &matches {
            if let Some(tracklet) = self.tracklets.get_mut(&ids[track_idx]) {
                tracklet.track.mark_matched(candidates[det_idx]);
            }
        }

        // Step 4: unmatched tracks miss a frame
        for &track_idx in &unmatched_tracks {
            if let Some(tracklet) = self.tracklets.get_mut(&ids[track_idx]) {
                tracklet.track.mark_missed();
            }
        }

        // Step 5: retire tracks over the miss budget
        let expired: Vec<u64> = self
            .tracklets
            .iter()
            .filter(|(_, t)| t.track.misses() > self.config.max_age)
            .map(|(&id, _)| id)
            .collect();
        let mut ended = Vec::with_capacity(expired.len());
        for id in expired {
            if let Some(mut tracklet) = self.tracklets.remove(&id) {
                tracklet.track.mark_ended();
                ended.push(tracklet.track);
            }
        }

        // Step 6: unmatched detections start new tracks
        for (bbox, filter) in new_filters {
            let track_id = self.next_track_id;
            self.next_track_id += 1;
            self.tracklets.insert(
                track_id,
                Tracklet {
                    track: Track::new(track_id, bbox),
                    filter,
                },
            );
        }

        self.frame_count += 1;

        // Step 7: live tracks followed by the ones that just ended
        let mut result = self.tracks();
        result.extend(ended);
        self.log_frame(&result);
        Ok(result)
    }

    fn log_frame(&self, tracks: &[Track]) {
        if !log::log_enabled!(log::Level::Debug) || tracks.is_empty() {
            return;
        }
        let any_started = tracks.iter().any(|t| t.state() == TrackState::Started);
        let ended = tracks
            .iter()
            .filter(|t| !t.state().is_alive())
            .count();
        if !any_started && ended == 0 {
            return;
        }
        let longest = tracks.iter().map(Track::hits).max().unwrap_or(0);
        let summary: Vec<String> = tracks
            .iter()
            .map(|t| match t.state() {
                TrackState::Active => t.track_id().to_string(),
                state => format!("{}: {:?}", t.track_id(), state),
            })
            .collect();
        debug!(
            "frame {}: tracks [{}], longest: {}, ended: {}",
            self.frame_count,
            summary.join(","),
            longest,
            ended
        );
    }
}

impl<S: AssignmentSolver> MultiObjectTracker for SortTracker<S> {
    fn track(&mut self, detections: &[BoundingBox]) -> Result<Vec<Track>> {
        self.update(detections)
    }

    fn num_tracks(&self) -> usize {
        self.tracklets.len()
    }

    fn clear(&mut self) {
        self.tracklets.clear();
    }
}
