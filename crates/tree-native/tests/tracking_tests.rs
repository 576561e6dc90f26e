// Capture-side tests: landmark sources and the tracking thread.
// The native crate is a binary, so the module is compiled in directly.

#![allow(dead_code)]
#[path = "../src/tracking.rs"]
mod tracking;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use tracking::*;
use tree_core::synthetic::{hand_frame, HandPose};
use tree_core::*;

fn csv_line(frame: &HandLandmarkFrame) -> String {
    match frame.points() {
        Some(points) => points
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(","),
        None => String::new(),
    }
}

fn wait_for(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    done()
}

/// Plays a fixed list once, then reports exhaustion.
struct Scripted(std::vec::IntoIter<HandLandmarkFrame>);

impl LandmarkSource for Scripted {
    fn next_frame(&mut self) -> Option<HandLandmarkFrame> {
        self.0.next()
    }
}

#[test]
fn synthetic_hand_follows_pose_keys() {
    let control = Arc::new(HandControl::default());
    let mut hand = SyntheticHand::new(Arc::clone(&control));
    let mut classifier = GestureClassifier::new();

    let frame = hand.next_frame().unwrap();
    assert_eq!(classifier.classify(&frame), GestureSymbol::None);

    control.set_pose(HandPose::Open);
    assert_eq!(classifier.classify(&hand.next_frame().unwrap()), GestureSymbol::Open);
    control.set_pose(HandPose::Fist);
    assert_eq!(classifier.classify(&hand.next_frame().unwrap()), GestureSymbol::Fist);
}

#[test]
fn synthetic_swipe_fires_once_and_glides_back() {
    let control = Arc::new(HandControl::default());
    let mut hand = SyntheticHand::new(Arc::clone(&control));
    let mut classifier = GestureClassifier::new();
    classifier.classify(&hand.next_frame().unwrap());

    control.swipe(1);
    assert_eq!(
        classifier.classify(&hand.next_frame().unwrap()),
        GestureSymbol::SwipeRight
    );
    for _ in 0..20 {
        assert_eq!(classifier.classify(&hand.next_frame().unwrap()), GestureSymbol::None);
    }
    let rest = classifier.last_wrist_x().unwrap();
    assert!((rest - 0.5).abs() < 1e-5);

    control.swipe(-3);
    assert_eq!(
        classifier.classify(&hand.next_frame().unwrap()),
        GestureSymbol::SwipeLeft
    );
}

#[test]
fn hidden_hand_yields_empty_frames() {
    let control = Arc::new(HandControl::default());
    let mut hand = SyntheticHand::new(Arc::clone(&control));
    assert!(control.toggle_hidden());
    assert!(hand.next_frame().unwrap().is_empty());
    assert!(!control.toggle_hidden());
    assert!(!hand.next_frame().unwrap().is_empty());

    control.toggle_hidden();
    control.set_pose(HandPose::Fist);
    assert!(!hand.next_frame().unwrap().is_empty());
}

#[test]
fn replay_skips_comments_and_bad_lines_then_loops() {
    let open = hand_frame(HandPose::Open, Vec2::new(0.5, 0.75));
    let fist = hand_frame(HandPose::Fist, Vec2::new(0.5, 0.75));
    let text = format!(
        "# recorded session\n{}\n\n1,2,3\n{}\n",
        csv_line(&open),
        csv_line(&fist)
    );
    let mut replay = ReplaySource::from_text(&text);
    assert_eq!(replay.len(), 3);

    let mut classifier = GestureClassifier::new();
    let mut seen = Vec::new();
    for _ in 0..6 {
        seen.push(classifier.classify(&replay.next_frame().unwrap()));
    }
    use GestureSymbol::*;
    assert_eq!(seen, vec![Open, None, Fist, Open, None, Fist]);
}

#[test]
fn replay_open_rejects_missing_or_empty_files() {
    let dir = std::env::temp_dir().join(format!("tree-replay-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    assert!(ReplaySource::open(&dir.join("absent.csv")).is_err());

    let empty = dir.join("empty.csv");
    std::fs::write(&empty, "# nothing here\n1,2\n").unwrap();
    assert!(ReplaySource::open(&empty).is_err());

    let good = dir.join("good.csv");
    let frame = hand_frame(HandPose::Open, Vec2::new(0.4, 0.7));
    std::fs::write(&good, format!("{}\n", csv_line(&frame))).unwrap();
    assert_eq!(ReplaySource::open(&good).unwrap().len(), 1);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn tracking_thread_publishes_gestures() {
    let cell = Arc::new(SceneCell::new(SceneState::new(AppMode::Tree, 0)));
    let control = Arc::new(HandControl::default());
    control.set_pose(HandPose::Open);
    let handle = TrackingHandle::start(
        Box::new(SyntheticHand::new(Arc::clone(&control))),
        Arc::clone(&cell),
        Orchestrator::new(PHOTO_COUNT, 3),
        Duration::from_millis(1),
    )
    .unwrap();

    assert!(wait_for(Duration::from_secs(5), || cell.load().mode == AppMode::Scatter));
    assert!(cell.load().focus < PHOTO_COUNT);

    control.set_pose(HandPose::Fist);
    assert!(wait_for(Duration::from_secs(5), || cell.load().mode == AppMode::Tree));
    assert!(handle.is_running());

    drop(handle);
    let generation = cell.snapshot().generation;
    thread::sleep(Duration::from_millis(20));
    assert_eq!(cell.snapshot().generation, generation);
}

#[test]
fn tracking_thread_ends_when_source_runs_dry() {
    let cell = Arc::new(SceneCell::new(SceneState::new(AppMode::Tree, 0)));
    let frames = vec![
        hand_frame(HandPose::Relaxed, Vec2::new(0.3, 0.75)),
        hand_frame(HandPose::Relaxed, Vec2::new(0.5, 0.75)),
    ];
    let handle = TrackingHandle::start(
        Box::new(Scripted(frames.into_iter())),
        Arc::clone(&cell),
        Orchestrator::new(PHOTO_COUNT, 3),
        Duration::from_millis(1),
    )
    .unwrap();

    assert!(wait_for(Duration::from_secs(5), || !handle.is_running()));
    let snap = cell.snapshot();
    assert_eq!(snap.generation, 2);
    assert_eq!(snap.state.focus, PHOTO_COUNT - 1);
    assert_eq!(snap.state.gesture, GestureSymbol::SwipeRight);
}
