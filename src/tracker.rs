mod assignment;
mod box_tracker;
mod kalman_filter;
mod matching;
mod rect;
mod sort_tracker;
mod track;
mod track_state;

pub use assignment::{AssignmentSolver, HungarianSolver, LapjvSolver, validate_permutation};
pub use box_tracker::{BoxNoise, KalmanBoxTracker};
pub use kalman_filter::{KalmanFilter, KalmanFilterParams};
pub use matching::{AssignmentResult, associate, iou_cost, iou_cost_matrix};
pub use rect::{BoundingBox, DEGENERATE_AREA, iou_batch};
pub use sort_tracker::{MultiObjectTracker, SortTracker, TrackerConfig};
pub use track::Track;
pub use track_state::TrackState;
