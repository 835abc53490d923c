//! Detection source reading the MOT-challenge text format.
//!
//! One detection per line, comma separated:
//! `frame, id, left, top, width, height, confidence, x, y, z`.
//! Columns after `height` are optional; a missing confidence counts as 1.

use std::collections::BTreeMap;
use std::io::BufRead;

use log::debug;
use thiserror::Error;

use super::DetectionSource;
use crate::tracker::BoundingBox;

#[derive(Debug, Error)]
pub enum MotParseError {
    #[error("failed to read detections")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// A recorded sequence of detections, replayed one frame at a time.
///
/// Frames between the first and last frame number that have no detections
/// are yielded as empty batches.
#[derive(Debug, Clone, Default)]
pub struct MotSequence {
    frames: BTreeMap<u32, Vec<BoundingBox>>,
    first: Option<u32>,
    cursor: Option<u32>,
    last: u32,
}

impl MotSequence {
    /// Parse every line of `reader`, keeping detections with a confidence of
    /// at least `min_confidence`. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R, min_confidence: f32) -> Result<Self, MotParseError> {
        let mut frames: BTreeMap<u32, Vec<BoundingBox>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let (frame, bbox, confidence) = parse_line(&line, line_no)?;
            let entry = frames.entry(frame).or_default();
            if confidence >= min_confidence {
                entry.push(bbox);
            } else {
                skipped += 1;
            }
        }

        debug!(
            "loaded {} frame(s), skipped {} low-confidence detection(s)",
            frames.len(),
            skipped
        );
        Ok(Self::from_frames(frames))
    }

    /// Parse detections from an in-memory string.
    pub fn parse(text: &str, min_confidence: f32) -> Result<Self, MotParseError> {
        Self::from_reader(text.as_bytes(), min_confidence)
    }

    /// Build a sequence from frame numbers and their detections.
    pub fn from_frames(frames: BTreeMap<u32, Vec<BoundingBox>>) -> Self {
        let first = frames.keys().next().copied();
        let last = frames.keys().next_back().copied().unwrap_or(0);
        Self {
            frames,
            first,
            cursor: first,
            last,
        }
    }

    /// Number of frames from the first to the last frame number.
    pub fn len(&self) -> usize {
        self.first
            .map_or(0, |first| (self.last - first) as usize + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Frame number the next call to `next_frame` yields.
    pub fn next_frame_number(&self) -> Option<u32> {
        self.cursor
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<(u32, BoundingBox, f32), MotParseError> {
    let malformed = |reason: String| MotParseError::Malformed {
        line: line_no,
        reason,
    };
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(malformed(format!(
            "expected at least 6 columns, found {}",
            fields.len()
        )));
    }

    let frame = fields[0]
        .parse::<u32>()
        .map_err(|e| malformed(format!("invalid frame number {:?}: {e}", fields[0])))?;
    let number = |idx: usize, name: &str| {
        fields[idx]
            .parse::<f32>()
            .map_err(|e| malformed(format!("invalid {name} {:?}: {e}", fields[idx])))
    };
    let left = number(2, "left")?;
    let top = number(3, "top")?;
    let width = number(4, "width")?;
    let height = number(5, "height")?;
    let confidence = if fields.len() > 6 {
        number(6, "confidence")?
    } else {
        1.0
    };

    Ok((frame, BoundingBox::new(left, top, width, height), confidence))
}

impl DetectionSource for MotSequence {
    type Error = MotParseError;

    fn next_frame(&mut self) -> Result<Option<Vec<BoundingBox>>, Self::Error> {
        let Some(frame) = self.cursor else {
            return Ok(None);
        };
        self.cursor = if frame < self.last { Some(frame + 1) } else { None };
        Ok(Some(self.frames.remove(&frame).unwrap_or_default()))
    }
}
