//! Procedural hand landmarks for the keyboard-driven capture source and tests.
//!
//! Frames follow the 21-point hand topology in normalized image coordinates
//! (y grows downward) with the fingers pointing up from the wrist.

use crate::constants::*;
use crate::gesture::HandLandmarkFrame;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HandPose {
    /// Fingers half curled: neither fist nor open.
    #[default]
    Relaxed = 0,
    Fist = 1,
    Open = 2,
}

impl HandPose {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Fist,
            2 => Self::Open,
            _ => Self::Relaxed,
        }
    }

    fn finger_reach(self) -> f32 {
        match self {
            Self::Fist => 0.05,
            Self::Relaxed => 0.12,
            Self::Open => 0.22,
        }
    }

    fn thumb_offset(self) -> Vec2 {
        match self {
            Self::Fist => Vec2::new(-0.05, 0.03),
            Self::Relaxed => Vec2::new(-0.19, 0.06),
            Self::Open => Vec2::new(-0.22, 0.0),
        }
    }

    fn splay(self) -> f32 {
        match self {
            Self::Open => 0.15,
            _ => 0.08,
        }
    }
}

const PALM_OFFSET: Vec2 = Vec2::new(0.0, -0.15);
// knuckles relative to the palm centre: index, middle, ring, pinky
const KNUCKLES: [Vec2; 4] = [
    Vec2::new(-0.04, 0.01),
    Vec2::new(0.0, 0.0),
    Vec2::new(0.035, 0.005),
    Vec2::new(0.065, 0.02),
];

/// Build a full landmark frame for `pose` with the wrist at `wrist`.
pub fn hand_frame(pose: HandPose, wrist: Vec2) -> HandLandmarkFrame {
    let mut pts = [Vec3::ZERO; LANDMARK_COUNT];
    let palm = wrist + PALM_OFFSET;
    let at = |p: Vec2| p.extend(0.0);
    pts[WRIST] = at(wrist);

    // thumb: 1..=4
    let thumb_base = wrist + Vec2::new(-0.05, -0.03);
    let thumb_tip = palm + pose.thumb_offset();
    for (k, slot) in (1..=4).enumerate() {
        let f = (k + 1) as f32 / 4.0;
        pts[slot] = at(thumb_base.lerp(thumb_tip, f));
    }

    // fingers: knuckle at 5/9/13/17, tip three further on
    let reach = pose.finger_reach();
    for (finger, knuckle) in KNUCKLES.iter().enumerate() {
        let base_index = 5 + finger * 4;
        let angle = (finger as f32 - 1.5) * pose.splay();
        let dir = Vec2::new(angle.sin(), -angle.cos());
        let knuckle = palm + *knuckle;
        let tip = palm + dir * reach;
        for j in 0..4 {
            let f = j as f32 / 3.0;
            pts[base_index + j] = at(knuckle.lerp(tip, f));
        }
    }
    // the middle knuckle doubles as the palm centre
    pts[PALM_CENTER] = at(palm);

    HandLandmarkFrame::new(pts)
}
