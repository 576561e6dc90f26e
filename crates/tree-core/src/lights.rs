use crate::constants::*;
use crate::mode::AppMode;
use glam::Vec3;

/// Marker position on the light spiral, a looser sibling of the tree spiral.
#[inline]
pub fn light_point(i: usize, n: usize) -> Vec3 {
    let f = i as f32 / n as f32;
    let t = f * std::f32::consts::PI * 2.0 * LIGHT_TURNS;
    let y = f * LIGHT_HEIGHT;
    let r = (LIGHT_RADIUS_TOP - y) * LIGHT_RADIUS_SCALE;
    Vec3::new(t.cos() * r, y + LIGHT_BASE_Y, t.sin() * r)
}

/// Twinkle level in [0, 1] for marker `i` at `time`.
#[inline]
pub fn twinkle(time: f32, i: usize) -> f32 {
    (time * LIGHT_TWINKLE_SPEED + i as f32 * LIGHT_TWINKLE_PHASE).sin() * 0.5 + 0.5
}

pub struct LightRing {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    rotation: f32,
    visible: bool,
}

impl Default for LightRing {
    fn default() -> Self {
        Self::new(LIGHT_COUNT)
    }
}

impl LightRing {
    pub fn new(count: usize) -> Self {
        let positions = (0..count).map(|i| light_point(i, count)).collect();
        let mut ring = Self {
            positions,
            colors: vec![Vec3::ZERO; count],
            rotation: 0.0,
            visible: true,
        };
        ring.recolor(0.0);
        ring
    }

    pub fn base_color(i: usize) -> Vec3 {
        if i % 2 == 0 {
            Vec3::from(RED)
        } else {
            Vec3::from(GOLD)
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn step(&mut self, mode: AppMode, time: f32) {
        self.rotation += LIGHT_ROTATION_STEP;
        self.recolor(time);
        self.visible = mode != AppMode::Scatter;
    }

    fn recolor(&mut self, time: f32) {
        for (i, c) in self.colors.iter_mut().enumerate() {
            *c = Self::base_color(i) * (twinkle(time, i) * LIGHT_GAIN);
        }
    }
}

/// Pulsing tree-top star.
#[derive(Clone, Debug)]
pub struct Star {
    pub position: Vec3,
    pub rotation: f32,
    pub scale: f32,
    pub visible: bool,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            position: STAR_APEX,
            rotation: 0.0,
            scale: 1.0,
            visible: true,
        }
    }
}

impl Star {
    pub fn step(&mut self, mode: AppMode, time: f32) {
        self.rotation += STAR_ROTATION_STEP;
        self.scale = 1.0 + (time * STAR_PULSE_SPEED).sin() * STAR_PULSE_AMOUNT;
        self.visible = mode != AppMode::Scatter;
    }
}
