// Classifier behaviour on hand-built and synthetic landmark frames.

use glam::{Vec2, Vec3};
use tree_core::synthetic::{hand_frame, HandPose};
use tree_core::*;

/// Frame with explicit wrist, palm centre, fingertips and thumb tip; every
/// other joint sits on the palm centre.
fn frame_with(wrist: Vec2, palm: Vec2, tips: [Vec2; 4], thumb: Vec2) -> HandLandmarkFrame {
    let mut pts = [palm.extend(0.0); LANDMARK_COUNT];
    pts[WRIST] = wrist.extend(0.0);
    pts[PALM_CENTER] = palm.extend(0.0);
    pts[THUMB_TIP] = thumb.extend(0.0);
    for (slot, tip) in FINGERTIPS.iter().zip(tips) {
        pts[*slot] = tip.extend(0.0);
    }
    HandLandmarkFrame::new(pts)
}

fn at(pose: HandPose, x: f32) -> HandLandmarkFrame {
    hand_frame(pose, Vec2::new(x, 0.75))
}

#[test]
fn empty_frame_is_none_and_keeps_memory() {
    let mut c = GestureClassifier::new();
    assert_eq!(c.classify(&at(HandPose::Relaxed, 0.4)), GestureSymbol::None);
    assert_eq!(c.last_wrist_x(), Some(0.4));

    assert_eq!(c.classify(&HandLandmarkFrame::empty()), GestureSymbol::None);
    assert_eq!(c.last_wrist_x(), Some(0.4));
}

#[test]
fn swipe_uses_memory_from_before_empty_frames() {
    let mut c = GestureClassifier::new();
    c.classify(&at(HandPose::Relaxed, 0.3));
    for _ in 0..5 {
        c.classify(&HandLandmarkFrame::empty());
    }
    assert_eq!(
        c.classify(&at(HandPose::Relaxed, 0.5)),
        GestureSymbol::SwipeRight
    );
}

#[test]
fn swipe_right_beats_any_posture() {
    for pose in [HandPose::Fist, HandPose::Open, HandPose::Relaxed] {
        let mut c = GestureClassifier::new();
        c.classify(&at(pose, 0.30));
        assert_eq!(c.classify(&at(pose, 0.45)), GestureSymbol::SwipeRight, "{pose:?}");
    }
}

#[test]
fn swipe_left_on_large_negative_step() {
    let mut c = GestureClassifier::new();
    c.classify(&at(HandPose::Open, 0.6));
    assert_eq!(c.classify(&at(HandPose::Open, 0.45)), GestureSymbol::SwipeLeft);
}

#[test]
fn small_wrist_motion_falls_through_to_posture() {
    let mut c = GestureClassifier::new();
    c.classify(&at(HandPose::Fist, 0.50));
    assert_eq!(c.classify(&at(HandPose::Fist, 0.55)), GestureSymbol::Fist);
    assert_eq!(c.classify(&at(HandPose::Fist, 0.50)), GestureSymbol::Fist);
}

#[test]
fn memory_is_overwritten_after_a_swipe() {
    let mut c = GestureClassifier::new();
    c.classify(&at(HandPose::Open, 0.30));
    assert_eq!(c.classify(&at(HandPose::Open, 0.45)), GestureSymbol::SwipeRight);
    assert_eq!(c.last_wrist_x(), Some(0.45));
    // holding still afterwards is just the posture again
    assert_eq!(c.classify(&at(HandPose::Open, 0.45)), GestureSymbol::Open);
}

#[test]
fn first_frame_never_swipes() {
    let mut c = GestureClassifier::new();
    assert_eq!(c.classify(&at(HandPose::Open, 0.9)), GestureSymbol::Open);
}

#[test]
fn fist_wins_when_open_threshold_also_met() {
    // avgPalmDist = 0.10, thumbToPalmDist = 0.10, avgWristDist = 0.40
    let frame = frame_with(
        Vec2::new(0.5, 0.9),
        Vec2::new(0.5, 0.6),
        [Vec2::new(0.5, 0.5); 4],
        Vec2::new(0.5, 0.7),
    );
    let m = HandMetrics::measure(frame.points().unwrap());
    assert!((m.avg_palm_dist - 0.10).abs() < 1e-5);
    assert!((m.thumb_to_palm_dist - 0.10).abs() < 1e-5);
    assert!((m.avg_wrist_dist - 0.40).abs() < 1e-5);

    let mut c = GestureClassifier::new();
    assert_eq!(c.classify(&frame), GestureSymbol::Fist);
}

#[test]
fn posture_thresholds() {
    let fist = HandMetrics {
        avg_palm_dist: 0.10,
        thumb_to_palm_dist: 0.10,
        avg_wrist_dist: 0.40,
    };
    assert_eq!(fist.posture(), GestureSymbol::Fist);

    let loose_thumb = HandMetrics {
        thumb_to_palm_dist: 0.20,
        ..fist
    };
    assert_eq!(loose_thumb.posture(), GestureSymbol::Open);

    let neither = HandMetrics {
        avg_palm_dist: 0.2,
        thumb_to_palm_dist: 0.2,
        avg_wrist_dist: 0.30,
    };
    assert_eq!(neither.posture(), GestureSymbol::None);
}

#[test]
fn synthetic_poses_classify_as_intended() {
    let cases = [
        (HandPose::Fist, GestureSymbol::Fist),
        (HandPose::Open, GestureSymbol::Open),
        (HandPose::Relaxed, GestureSymbol::None),
    ];
    for (pose, expected) in cases {
        let mut c = GestureClassifier::new();
        assert_eq!(c.classify(&at(pose, 0.5)), expected, "{pose:?}");
    }
}

#[test]
fn classification_ignores_depth() {
    let flat = at(HandPose::Open, 0.5);
    let mut pts = *flat.points().unwrap();
    for (i, p) in pts.iter_mut().enumerate() {
        p.z = i as f32 * 0.3;
    }
    let deep = HandLandmarkFrame::new(pts);
    assert_eq!(
        HandMetrics::measure(flat.points().unwrap()),
        HandMetrics::measure(deep.points().unwrap())
    );
}

#[test]
fn from_points_accepts_only_empty_or_full() {
    assert!(HandLandmarkFrame::from_points(&[]).unwrap().is_empty());
    let full = [Vec3::ZERO; LANDMARK_COUNT];
    assert!(!HandLandmarkFrame::from_points(&full).unwrap().is_empty());
    assert_eq!(
        HandLandmarkFrame::from_points(&[Vec3::ZERO; 5]),
        Err(FrameError::LandmarkCount(5))
    );
}

#[test]
fn csv_records_parse() {
    assert!(HandLandmarkFrame::parse_csv_line("   ").unwrap().is_empty());

    let values: Vec<String> = (0..LANDMARK_COUNT * 3)
        .map(|i| format!("{}", i as f32 * 0.01))
        .collect();
    let frame = HandLandmarkFrame::parse_csv_line(&values.join(",")).unwrap();
    let pts = frame.points().unwrap();
    assert!((pts[1].x - 0.03).abs() < 1e-6);
    assert!((pts[20].z - 0.62).abs() < 1e-5);

    let short = values[..62].join(",");
    assert_eq!(
        HandLandmarkFrame::parse_csv_line(&short),
        Err(FrameError::FieldCount {
            expected: 63,
            actual: 62
        })
    );

    let mut bad = values.clone();
    bad[4] = "abc".into();
    assert!(matches!(
        HandLandmarkFrame::parse_csv_line(&bad.join(",")),
        Err(FrameError::BadNumber { index: 4, .. })
    ));
}
