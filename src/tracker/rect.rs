/// Axis-aligned bounding box representation with format conversion utilities.
///
/// Boxes are stored as TLWH (left, top, width, height) in whatever unit the
/// detections use; pixels and normalized fractions both work.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub left: f32,
    /// Top-left y coordinate
    pub top: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

/// Boxes with an area at or below this are degenerate and never matched.
pub const DEGENERATE_AREA: f32 = 1e-9;

/// Added to the IoU denominator so two degenerate boxes never divide by zero.
const IOU_EPSILON: f64 = 1e-5;

impl BoundingBox {
    /// Create a new box from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a box from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Create a box from its center point and dimensions.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.left, self.top, self.right(), self.bottom()]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.left, self.top, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Width over height, 0 for a box without height.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    /// True for boxes that cannot take part in matching: negative or
    /// (near) zero extent, or non-finite coordinates.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.to_tlwh().iter().all(|v| v.is_finite());
        !finite || self.width < 0.0 || self.height < 0.0 || self.area() <= DEGENERATE_AREA
    }

    /// Overlapping region of two boxes, `None` when they do not overlap.
    /// Boxes that only share an edge do not overlap.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x1 = self.left.max(other.left);
        let y1 = self.top.max(other.top);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(BoundingBox::from_tlbr(x1, y1, x2, y2))
        } else {
            None
        }
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Extents are treated as inclusive pixel spans, so every side counts one
    /// extra unit: a `w x h` box covers `(w + 1) * (h + 1)`. Disjoint boxes
    /// score exactly 0.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let Some(inter) = self.intersection(other) else {
            return 0.0;
        };

        let inclusive = |b: &BoundingBox| (1.0 + b.width as f64) * (1.0 + b.height as f64);
        let inter_area = inclusive(&inter);
        let union_area = inclusive(self) + inclusive(other) - inter_area;

        (inter_area / (union_area + IOU_EPSILON)).clamp(0.0, 1.0) as f32
    }
}

use ndarray::Array2;

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}
