//! Capture side: landmark sources and the tracking thread that classifies
//! frames and publishes into the shared scene cell.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec2;
use tree_core::synthetic::{hand_frame, HandPose};
use tree_core::{GestureClassifier, GestureSymbol, HandLandmarkFrame, Orchestrator, SceneCell};

pub const TRACKING_PERIOD: Duration = Duration::from_millis(33);

/// Anything that yields hand-landmark frames at its own pace.
pub trait LandmarkSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<HandLandmarkFrame>;
}

/// Keyboard-facing controls for [`SyntheticHand`].
#[derive(Debug, Default)]
pub struct HandControl {
    pose: AtomicU8,
    hidden: AtomicBool,
    pending_swipe: AtomicI32,
}

impl HandControl {
    pub fn set_pose(&self, pose: HandPose) {
        self.pose.store(pose as u8, Ordering::Relaxed);
        self.hidden.store(false, Ordering::Relaxed);
    }

    pub fn toggle_hidden(&self) -> bool {
        !self.hidden.fetch_xor(true, Ordering::Relaxed)
    }

    /// Queue a wrist jump: negative moves left, positive right.
    pub fn swipe(&self, direction: i32) {
        self.pending_swipe.store(direction.signum(), Ordering::Relaxed);
        self.hidden.store(false, Ordering::Relaxed);
    }
}

const SWIPE_JUMP: f32 = 0.12;
const WRIST_RECENTER_STEP: f32 = 0.02; // well under the swipe threshold
const WRIST_REST: Vec2 = Vec2::new(0.5, 0.75);

/// Hand driven from the keyboard. Swipes jump the wrist in one frame and then
/// glide it back slowly enough not to register the return trip.
pub struct SyntheticHand {
    control: Arc<HandControl>,
    wrist_x: f32,
}

impl SyntheticHand {
    pub fn new(control: Arc<HandControl>) -> Self {
        Self {
            control,
            wrist_x: WRIST_REST.x,
        }
    }
}

impl LandmarkSource for SyntheticHand {
    fn next_frame(&mut self) -> Option<HandLandmarkFrame> {
        if self.control.hidden.load(Ordering::Relaxed) {
            return Some(HandLandmarkFrame::empty());
        }
        let swipe = self.control.pending_swipe.swap(0, Ordering::Relaxed);
        if swipe != 0 {
            self.wrist_x += swipe as f32 * SWIPE_JUMP;
        } else {
            let back = WRIST_REST.x - self.wrist_x;
            self.wrist_x += back.clamp(-WRIST_RECENTER_STEP, WRIST_RECENTER_STEP);
        }
        let pose = HandPose::from_u8(self.control.pose.load(Ordering::Relaxed));
        Some(hand_frame(pose, Vec2::new(self.wrist_x, WRIST_REST.y)))
    }
}

/// Recorded frames played back in a loop.
pub struct ReplaySource {
    frames: Vec<HandLandmarkFrame>,
    cursor: usize,
}

impl ReplaySource {
    pub fn from_text(text: &str) -> Self {
        let mut frames = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            match HandLandmarkFrame::parse_csv_line(line) {
                Ok(frame) => frames.push(frame),
                Err(e) => log::warn!("[tracking] replay line {}: {e}", lineno + 1),
            }
        }
        Self { frames, cursor: 0 }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let source = Self::from_text(&text);
        if source.is_empty() {
            anyhow::bail!("no usable frames in {}", path.display());
        }
        log::info!(
            "[tracking] replaying {} frames from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Option<HandLandmarkFrame> {
        if self.frames.is_empty() {
            return None;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Some(frame)
    }
}

/// Running tracking thread. Dropping the handle stops the loop, joins the
/// thread and drops the source with it.
pub struct TrackingHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TrackingHandle {
    pub fn start(
        mut source: Box<dyn LandmarkSource>,
        cell: Arc<SceneCell>,
        mut orchestrator: Orchestrator,
        period: Duration,
    ) -> anyhow::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("hand-tracking".into())
            .spawn(move || {
                // fresh classifier per session: swipe memory starts empty
                let mut classifier = GestureClassifier::new();
                while !stop_flag.load(Ordering::Acquire) {
                    let Some(frame) = source.next_frame() else {
                        log::info!("[tracking] source exhausted");
                        break;
                    };
                    let gesture = classifier.classify(&frame);
                    let before = cell.load();
                    let after = cell.dispatch(&mut orchestrator, gesture);
                    if gesture != GestureSymbol::None {
                        log::debug!("[tracking] gesture {}", gesture.label());
                    }
                    if before.mode != after.mode {
                        log::info!(
                            "[tracking] mode {} -> {}",
                            before.mode.label(),
                            after.mode.label()
                        );
                    }
                    if before.focus != after.focus {
                        log::info!("[tracking] focus {} -> {}", before.focus, after.focus);
                    }
                    thread::sleep(period);
                }
                drop(source);
                log::info!("[tracking] stopped");
            })?;
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(t) = self.thread.take() {
            _ = t.join();
        }
    }
}
