use crate::constants::*;

/// Scene sizing resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    pub particle_count: usize,
    pub photo_count: usize,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT_LARGE,
            photo_count: PHOTO_COUNT,
            seed: 42,
        }
    }
}

impl SceneConfig {
    /// Pick the particle budget from the logical viewport width.
    pub fn for_viewport_width(width_px: f64) -> Self {
        Self {
            particle_count: particle_count_for_width(width_px),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[inline]
pub fn particle_count_for_width(width_px: f64) -> usize {
    if width_px < NARROW_VIEWPORT_PX {
        PARTICLE_COUNT_SMALL
    } else {
        PARTICLE_COUNT_LARGE
    }
}
