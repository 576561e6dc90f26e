//! Hand-landmark frames and the gesture classifier.
//!
//! The classifier is memoryless except for a single scalar: the wrist x of the
//! previous non-empty frame, used to detect horizontal swipes.

use crate::constants::*;
use glam::{Vec2, Vec3};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("expected 0 or 21 landmarks, got {0}")]
    LandmarkCount(usize),

    #[error("expected {expected} values per record, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("invalid number in field {index}: {text:?}")]
    BadNumber { index: usize, text: String },
}

/// One sample of tracked hand keypoints, or no hand at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandLandmarkFrame {
    points: Option<[Vec3; LANDMARK_COUNT]>,
}

impl HandLandmarkFrame {
    pub fn empty() -> Self {
        Self { points: None }
    }

    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self {
            points: Some(points),
        }
    }

    /// Build a frame from a slice that must hold either zero or exactly
    /// [`LANDMARK_COUNT`] points.
    pub fn from_points(points: &[Vec3]) -> Result<Self, FrameError> {
        if points.is_empty() {
            return Ok(Self::empty());
        }
        let arr: [Vec3; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| FrameError::LandmarkCount(points.len()))?;
        Ok(Self::new(arr))
    }

    /// Parse one replay record: `x,y,z` repeated 21 times, or a blank line for
    /// "no hand".
    pub fn parse_csv_line(line: &str) -> Result<Self, FrameError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::empty());
        }
        let mut values = Vec::with_capacity(LANDMARK_COUNT * 3);
        for (index, field) in line.split(',').enumerate() {
            let text = field.trim();
            let v: f32 = text.parse().map_err(|_| FrameError::BadNumber {
                index,
                text: text.to_string(),
            })?;
            values.push(v);
        }
        if values.len() != LANDMARK_COUNT * 3 {
            return Err(FrameError::FieldCount {
                expected: LANDMARK_COUNT * 3,
                actual: values.len(),
            });
        }
        let points: Vec<Vec3> = values
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_none()
    }

    pub fn points(&self) -> Option<&[Vec3; LANDMARK_COUNT]> {
        self.points.as_ref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GestureSymbol {
    #[default]
    None = 0,
    Fist = 1,
    Open = 2,
    SwipeLeft = 3,
    SwipeRight = 4,
}

impl GestureSymbol {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Fist,
            2 => Self::Open,
            3 => Self::SwipeLeft,
            4 => Self::SwipeRight,
            _ => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Fist => "FIST",
            Self::Open => "OPEN",
            Self::SwipeLeft => "SWIPE_LEFT",
            Self::SwipeRight => "SWIPE_RIGHT",
        }
    }
}

/// Finger-spread measurements derived from a single frame, in the image plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandMetrics {
    pub avg_palm_dist: f32,
    pub thumb_to_palm_dist: f32,
    pub avg_wrist_dist: f32,
}

impl HandMetrics {
    pub fn measure(points: &[Vec3; LANDMARK_COUNT]) -> Self {
        let flat = |i: usize| -> Vec2 { points[i].truncate() };
        let wrist = flat(WRIST);
        let palm = flat(PALM_CENTER);
        let n = FINGERTIPS.len() as f32;
        let avg_palm_dist = FINGERTIPS
            .iter()
            .map(|&i| flat(i).distance(palm))
            .sum::<f32>()
            / n;
        let avg_wrist_dist = FINGERTIPS
            .iter()
            .map(|&i| flat(i).distance(wrist))
            .sum::<f32>()
            / n;
        Self {
            avg_palm_dist,
            thumb_to_palm_dist: flat(THUMB_TIP).distance(palm),
            avg_wrist_dist,
        }
    }

    /// Static posture, ignoring motion. Fist wins over open.
    pub fn posture(&self) -> GestureSymbol {
        if self.avg_palm_dist < FIST_PALM_DIST_MAX && self.thumb_to_palm_dist < FIST_THUMB_DIST_MAX
        {
            GestureSymbol::Fist
        } else if self.avg_wrist_dist > OPEN_WRIST_DIST_MIN {
            GestureSymbol::Open
        } else {
            GestureSymbol::None
        }
    }
}

/// Stateful classifier; one instance per tracking session.
#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    last_wrist_x: Option<f32>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_wrist_x(&self) -> Option<f32> {
        self.last_wrist_x
    }

    pub fn classify(&mut self, frame: &HandLandmarkFrame) -> GestureSymbol {
        // Empty frames leave the swipe memory alone, so a hand that reappears
        // is compared against where it was last seen.
        let Some(points) = frame.points() else {
            return GestureSymbol::None;
        };
        let metrics = HandMetrics::measure(points);

        let wrist_x = points[WRIST].x;
        let swipe = self.last_wrist_x.and_then(|prev| {
            let diff = wrist_x - prev;
            if diff > SWIPE_THRESHOLD {
                Some(GestureSymbol::SwipeRight)
            } else if diff < -SWIPE_THRESHOLD {
                Some(GestureSymbol::SwipeLeft)
            } else {
                None
            }
        });
        self.last_wrist_x = Some(wrist_x);

        swipe.unwrap_or_else(|| metrics.posture())
    }
}
