//! SORT (Simple Online and Realtime Tracking) for axis-aligned boxes.
//!
//! Each frame's detections are matched to Kalman-predicted track boxes by
//! optimal IoU assignment; unmatched detections start new tracks and tracks
//! that miss too many frames are retired.
//!
//! ```
//! use sort_rs::{BoundingBox, SortTracker, TrackerConfig};
//!
//! let mut tracker = SortTracker::new(TrackerConfig::default());
//! let tracks = tracker.update(&[BoundingBox::new(10.0, 20.0, 30.0, 60.0)]).unwrap();
//! assert_eq!(tracks[0].track_id(), 1);
//! ```

mod error;

pub mod integration;
pub mod linalg;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{DetectionSource, MotSequence, TrackerPipeline};
pub use tracker::{
    BoundingBox, HungarianSolver, MultiObjectTracker, SortTracker, Track, TrackState,
    TrackerConfig,
};
