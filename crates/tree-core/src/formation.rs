//! Particle field morphing between the spiral tree and the scattered cloud.

use crate::constants::*;
use crate::mode::AppMode;
use glam::Vec3;
use rand::Rng;

/// Which target configuration particles are pulled toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formation {
    Tree,
    Scatter,
}

impl Formation {
    pub fn for_mode(mode: AppMode) -> Self {
        match mode {
            AppMode::Scatter => Self::Scatter,
            _ => Self::Tree,
        }
    }

    pub fn approach_rate(self) -> f32 {
        match self {
            Self::Tree => TREE_APPROACH_RATE,
            Self::Scatter => SCATTER_APPROACH_RATE,
        }
    }
}

/// Point on the tree spiral for particle `i` of `n`.
#[inline]
pub fn tree_point(i: usize, n: usize) -> Vec3 {
    let f = i as f32 / n as f32;
    let t = f * std::f32::consts::PI * 2.0 * TREE_TURNS;
    let y = f * TREE_HEIGHT;
    let r = (TREE_RADIUS_TOP - y) * TREE_RADIUS_SCALE;
    Vec3::new(t.cos() * r, y + TREE_BASE_Y, t.sin() * r)
}

/// Palette slot for particle `i`: every tenth is gold, every third red.
#[inline]
pub fn particle_color(i: usize) -> [f32; 3] {
    if i % 10 == 0 {
        GOLD
    } else if i % 3 == 0 {
        RED
    } else {
        LIGHT_GREEN
    }
}

fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
    )
}

pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    tree_target: Vec<Vec3>,
    scatter_target: Vec<Vec3>,
    rotation: f32,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let tree_target = (0..count).map(|i| tree_point(i, count)).collect();
        let mut positions = Vec::with_capacity(count);
        let mut scatter_target = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(random_in_cube(rng, SPAWN_HALF_WIDTH));
            scatter_target.push(random_in_cube(rng, SCATTER_HALF_WIDTH));
        }
        let colors = (0..count).map(|i| Vec3::from(particle_color(i))).collect();
        log::debug!("[formation] built {count} particles");
        Self {
            positions,
            colors,
            tree_target,
            scatter_target,
            rotation: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn target(&self, formation: Formation) -> &[Vec3] {
        match formation {
            Formation::Tree => &self.tree_target,
            Formation::Scatter => &self.scatter_target,
        }
    }

    /// Field-wide rotation about +Y, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance one frame toward the target for `mode`. Touches no allocator.
    pub fn step(&mut self, mode: AppMode) {
        let formation = Formation::for_mode(mode);
        let rate = formation.approach_rate();
        let target = match formation {
            Formation::Tree => &self.tree_target,
            Formation::Scatter => &self.scatter_target,
        };
        for (p, t) in self.positions.iter_mut().zip(target.iter()) {
            *p += (*t - *p) * rate;
        }
        self.rotation += FIELD_ROTATION_STEP;
    }
}
