//! Integration module for feeding detections from outside sources into a tracker.
//!
//! This module provides the [`DetectionSource`] trait, a reader for
//! MOT-challenge detection files and a pipeline that drives a tracker frame
//! by frame.

mod detector;
mod mot;
mod pipeline;

pub use detector::DetectionSource;
pub use mot::{MotParseError, MotSequence};
pub use pipeline::{PipelineError, TrackerPipeline};
