/// Track state enumeration for the object tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TrackState {
    /// Created this frame from an unmatched detection
    #[default]
    Started,
    /// Matched in the current frame
    Active,
    /// Missed in the current frame, still within the miss budget
    Ending,
    /// Retired; reported once and then dropped
    Ended,
}

impl TrackState {
    /// Whether the track is still held by the tracker.
    pub fn is_alive(self) -> bool {
        self != TrackState::Ended
    }
}
