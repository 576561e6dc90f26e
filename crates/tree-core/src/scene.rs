//! Aggregate of every per-frame animator.

use crate::camera::CameraRig;
use crate::clock::AnimationClock;
use crate::config::SceneConfig;
use crate::formation::ParticleField;
use crate::lights::{LightRing, Star};
use crate::mode::SceneState;
use crate::photos::PhotoCarousel;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Scene {
    pub clock: AnimationClock,
    pub particles: ParticleField,
    pub lights: LightRing,
    pub star: Star,
    pub photos: PhotoCarousel,
    pub camera: CameraRig,
}

impl Scene {
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self {
            clock: AnimationClock::new(),
            particles: ParticleField::new(config.particle_count, &mut rng),
            lights: LightRing::default(),
            star: Star::default(),
            photos: PhotoCarousel::new(config.photo_count),
            camera: CameraRig::new(aspect),
        }
    }

    /// Advance one render tick from a snapshot of the shared state.
    ///
    /// Photos read the camera pose left by the previous tick; the camera moves
    /// last.
    pub fn tick(&mut self, state: SceneState, dt_sec: f32) {
        self.clock.advance(dt_sec);
        let time = self.clock.time();
        let mode = state.mode;

        self.particles.step(mode);
        self.photos.step(mode, state.focus, &self.camera, time);
        self.star.step(mode, time);
        self.lights.step(mode, time);
        self.camera.step(mode);
    }
}
