//! Detection-to-track association for multi-object tracking.

use ndarray::Array2;

use crate::error::Result;
use crate::tracker::assignment::{AssignmentSolver, validate_permutation};
use crate::tracker::rect::{BoundingBox, iou_batch};

/// Cost of a padded (dummy) cell; never better than a zero-overlap pair.
pub const PADDING_COST: i32 = 0;

/// Integer cost of pairing boxes with the given IoU: `round(-100 * iou)`.
#[inline]
pub fn iou_cost(iou: f32) -> i32 {
    (-100.0 * iou).round() as i32
}

/// Build the square cost matrix between detections (rows) and predicted
/// track boxes (columns), padded to `max(rows, cols)` with [`PADDING_COST`].
pub fn iou_cost_matrix(detections: &[BoundingBox], predictions: &[BoundingBox]) -> Array2<i32> {
    padded_costs(&iou_batch(detections, predictions))
}

fn padded_costs(ious: &Array2<f32>) -> Array2<i32> {
    let size = ious.nrows().max(ious.ncols());
    let mut costs = Array2::from_elem((size, size), PADDING_COST);
    for ((i, j), &iou) in ious.indexed_iter() {
        costs[[i, j]] = iou_cost(iou);
    }
    costs
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Accepted `(detection index, track index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_tracks: Vec<usize>,
}

/// Match detections to predicted track boxes.
///
/// Builds the padded cost matrix, solves it, then keeps only pairs that lie
/// inside the real matrix and whose IoU is at least `iou_threshold`. The
/// threshold is checked on the unrounded IoU. Everything else is reported
/// unmatched, in ascending index order.
pub fn associate<S: AssignmentSolver + ?Sized>(
    detections: &[BoundingBox],
    predictions: &[BoundingBox],
    iou_threshold: f32,
    solver: &S,
) -> Result<AssignmentResult> {
    let (num_dets, num_tracks) = (detections.len(), predictions.len());

    if num_dets == 0 || num_tracks == 0 {
        return Ok(AssignmentResult {
            matches: vec![],
            unmatched_detections: (0..num_dets).collect(),
            unmatched_tracks: (0..num_tracks).collect(),
        });
    }

    let ious = iou_batch(detections, predictions);
    let costs = padded_costs(&ious);
    let assignment = solver.solve(&costs)?;
    validate_permutation(&assignment, costs.nrows())?;

    let mut matches = vec![];
    let mut det_matched = vec![false; num_dets];
    let mut track_matched = vec![false; num_tracks];

    for (det_idx, &track_idx) in assignment.iter().enumerate() {
        if det_idx >= num_dets || track_idx >= num_tracks {
            continue;
        }
        if ious[[det_idx, track_idx]] >= iou_threshold {
            matches.push((det_idx, track_idx));
            det_matched[det_idx] = true;
            track_matched[track_idx] = true;
        }
    }

    let unmatched = |mask: &[bool]| -> Vec<usize> {
        mask.iter()
            .enumerate()
            .filter_map(|(i, &m)| if m { None } else { Some(i) })
            .collect()
    };

    Ok(AssignmentResult {
        unmatched_detections: unmatched(&det_matched),
        unmatched_tracks: unmatched(&track_matched),
        matches,
    })
}
