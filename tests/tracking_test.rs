use approx::assert_abs_diff_eq;
use sort_rs::{
    BoundingBox, MotSequence, MultiObjectTracker, SortTracker, Track, TrackState, TrackerConfig,
    TrackerPipeline,
};

fn frame(boxes: &[(f32, f32, f32, f32)]) -> Vec<BoundingBox> {
    boxes
        .iter()
        .map(|&(l, t, w, h)| BoundingBox::new(l, t, w, h))
        .collect()
}

fn four_easy_tracks() -> Vec<Vec<BoundingBox>> {
    vec![
        frame(&[
            (1703.0, 385.0, 157.0, 339.0),
            (1293.0, 455.0, 83.0, 213.0),
            (259.0, 449.0, 101.0, 261.0),
            (1253.0, 529.0, 55.0, 127.0),
        ]),
        frame(&[
            (1699.0, 383.0, 159.0, 341.0),
            (1293.0, 455.0, 83.0, 213.0),
            (261.0, 447.0, 101.0, 263.0),
            (1253.0, 529.0, 55.0, 127.0),
        ]),
        frame(&[
            (1697.0, 383.0, 159.0, 343.0),
            (1293.0, 455.0, 83.0, 213.0),
            (263.0, 447.0, 101.0, 263.0),
            (1255.0, 529.0, 55.0, 127.0),
            (429.0, 300.0, 55.0, 127.0),
        ]),
        frame(&[
            (1695.0, 383.0, 159.0, 343.0),
            (1293.0, 455.0, 83.0, 213.0),
            (265.0, 447.0, 101.0, 263.0),
            (1257.0, 529.0, 55.0, 127.0),
        ]),
        frame(&[
            (1693.0, 381.0, 159.0, 347.0),
            (1295.0, 455.0, 83.0, 213.0),
            (267.0, 447.0, 101.0, 263.0),
            (1259.0, 529.0, 55.0, 129.0),
        ]),
    ]
}

fn count_in_state(tracks: &[Track], state: TrackState) -> usize {
    tracks.iter().filter(|t| t.state() == state).count()
}

#[test]
fn test_four_easy_tracks_tracked_to_end() {
    let mut tracker = SortTracker::new(TrackerConfig::default());
    let frames = four_easy_tracks();

    let first = tracker.update(&frames[0]).unwrap();
    let ids: Vec<u64> = first.iter().map(Track::track_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let mut tracks = first;
    for detections in &frames[1..] {
        tracks = tracker.update(detections).unwrap();
    }

    assert_eq!(count_in_state(&tracks, TrackState::Active), 4);
    for track in tracks.iter().filter(|t| t.track_id() <= 4) {
        assert_eq!(track.state(), TrackState::Active);
        assert_eq!(track.history().len(), 5);
        assert_eq!(track.total_misses(), 0);
    }

    // the one-frame detection from frame 3 ends exactly now
    let extra: Vec<&Track> = tracks.iter().filter(|t| t.track_id() == 5).collect();
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].state(), TrackState::Ended);
    assert_eq!(extra[0].history().len(), 1);
}

#[test]
fn test_crossing_tracks_end_in_correct_location() {
    let crossing = vec![
        frame(&[(0.8, 0.3, 0.1, 0.1), (0.1, 0.1, 0.15, 0.15)]),
        frame(&[(0.8, 0.35, 0.1, 0.1), (0.2, 0.2, 0.15, 0.15)]),
        frame(&[(0.3, 0.3, 0.15, 0.15), (0.8, 0.4, 0.1, 0.1)]),
        frame(&[(0.4, 0.4, 0.15, 0.15), (0.8, 0.45, 0.1, 0.1)]),
        frame(&[(0.5, 0.5, 0.15, 0.15), (0.8, 0.5, 0.1, 0.1)]),
        vec![],
        vec![],
        vec![],
        vec![],
        vec![],
    ];

    let mut tracker = SortTracker::new(TrackerConfig {
        iou_threshold: 0.2,
        ..TrackerConfig::default()
    });

    let mut tracks = Vec::new();
    for detections in &crossing {
        let result = tracker.update(detections).unwrap();
        if !result.is_empty() {
            tracks = result;
        }
    }

    assert_eq!(tracks.len(), 2);
    let (first, second) = (&tracks[0], &tracks[1]);
    assert_eq!(first.state(), TrackState::Ended);
    assert_eq!(second.state(), TrackState::Ended);
    assert_eq!(first.history().len(), 5);
    assert_eq!(second.history().len(), 5);

    // started at (0.8, 0.3), moved straight down
    let first_start = first.history()[0];
    let first_end = first.last_box().unwrap();
    assert_abs_diff_eq!(first_start.top, 0.3, epsilon = 1e-6);
    assert_abs_diff_eq!(first_end.left, 0.8, epsilon = 1e-6);
    assert_abs_diff_eq!(first_end.top, 0.5, epsilon = 1e-6);

    // started at (0.1, 0.1), moved diagonally across
    let second_end = second.last_box().unwrap();
    assert_abs_diff_eq!(second.history()[0].left, 0.1, epsilon = 1e-6);
    assert_abs_diff_eq!(second_end.left, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(second_end.top, 0.5, epsilon = 1e-6);
}

#[test]
fn test_ended_track_reported_once() {
    let mut tracker = SortTracker::new(TrackerConfig::default());
    let bbox = BoundingBox::new(100.0, 100.0, 50.0, 80.0);
    tracker.update(&[bbox]).unwrap();

    let mut ended_reports = 0;
    for _ in 0..6 {
        let tracks = tracker.update(&[]).unwrap();
        ended_reports += count_in_state(&tracks, TrackState::Ended);
    }
    assert_eq!(ended_reports, 1);
    assert_eq!(tracker.num_tracks(), 0);
}

#[test]
fn test_track_ids_never_reused() {
    let mut tracker = SortTracker::new(TrackerConfig::default());
    let a = BoundingBox::new(0.0, 0.0, 30.0, 30.0);
    let b = BoundingBox::new(500.0, 500.0, 30.0, 30.0);

    let mut seen = Vec::new();
    let schedule = [vec![a], vec![], vec![], vec![b], vec![], vec![], vec![a, b]];
    for detections in &schedule {
        for track in tracker.update(detections).unwrap() {
            if track.state() == TrackState::Started {
                assert!(!seen.contains(&track.track_id()));
                seen.push(track.track_id());
            }
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn test_identical_input_gives_identical_output() {
    let run = || {
        let mut tracker = SortTracker::new(TrackerConfig::default());
        four_easy_tracks()
            .iter()
            .map(|f| tracker.update(f).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_independent_trackers_on_threads() {
    let frames = four_easy_tracks();
    let results: Vec<Vec<Track>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let frames = &frames;
                scope.spawn(move || {
                    let mut tracker = SortTracker::new(TrackerConfig::default());
                    let mut last = Vec::new();
                    for f in frames {
                        last = tracker.track(f).unwrap();
                    }
                    last
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for tracks in &results {
        assert_eq!(tracks, &results[0]);
        assert_eq!(count_in_state(tracks, TrackState::Active), 4);
    }
}

#[test]
fn test_mot_file_through_pipeline() {
    let mut text = String::new();
    for (idx, detections) in four_easy_tracks().iter().enumerate() {
        for d in detections {
            text.push_str(&format!(
                "{},-1,{},{},{},{},1,-1,-1,-1\n",
                idx + 1,
                d.left,
                d.top,
                d.width,
                d.height
            ));
        }
    }
    let sequence = MotSequence::parse(&text, 0.0).unwrap();
    assert_eq!(sequence.len(), 5);

    let mut pipeline = TrackerPipeline::with_default_config(sequence);
    let frames = pipeline.run().unwrap();
    assert_eq!(frames.len(), 5);
    assert_eq!(count_in_state(&frames[4], TrackState::Active), 4);
    assert_eq!(pipeline.tracker().frame_count(), 5);
}
