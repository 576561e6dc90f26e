//! Photo carousel: every photo eases toward either its slot on a slowly
//! turning orbit or, for the focused photo while scattered, a pose hovering in
//! front of the camera.

use crate::camera::{face_towards, CameraRig};
use crate::constants::*;
use crate::mode::AppMode;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub opacity: f32,
}

impl Default for PhotoPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: ORBIT_SCALE,
            opacity: 0.0,
        }
    }
}

impl PhotoPose {
    /// Move every component a fraction `rate` of the way toward `target`.
    pub fn blend_towards(&mut self, target: &PhotoPose, rate: f32) {
        self.position = self.position.lerp(target.position, rate);
        self.orientation = self.orientation.slerp(target.orientation, rate).normalize();
        self.scale += (target.scale - self.scale) * rate;
        self.opacity += (target.opacity - self.opacity) * rate;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale * PHOTO_QUAD_SIZE),
            self.orientation,
            self.position,
        )
    }
}

pub struct PhotoCarousel {
    poses: Vec<PhotoPose>,
}

impl PhotoCarousel {
    pub fn new(count: usize) -> Self {
        Self {
            poses: vec![PhotoPose::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn poses(&self) -> &[PhotoPose] {
        &self.poses
    }

    /// Orbit slot position for photo `i` of `n` at `time`.
    pub fn orbit_position(i: usize, n: usize, time: f32) -> Vec3 {
        let f = i as f32 / n as f32;
        let angle = f * std::f32::consts::TAU + time * ORBIT_ANGULAR_SPEED;
        Vec3::new(
            angle.cos() * ORBIT_RADIUS,
            f * ORBIT_HEIGHT_SPAN + ORBIT_BASE_Y,
            angle.sin() * ORBIT_RADIUS,
        )
    }

    /// Hovering pose in front of `camera`.
    pub fn focus_pose(camera: &CameraRig) -> PhotoPose {
        PhotoPose {
            position: camera.eye + camera.forward() * FOCUS_DISTANCE,
            orientation: camera.orientation,
            scale: FOCUS_SCALE,
            opacity: 1.0,
        }
    }

    fn orbit_pose(current: &PhotoPose, slot: Vec3) -> PhotoPose {
        // Heading is taken from where this frame's blend leaves the photo,
        // facing the trunk at that height. On the axis the old heading stays.
        let moved = current.position.lerp(slot, PHOTO_BLEND_RATE);
        let axis_point = Vec3::new(0.0, moved.y, 0.0);
        let orientation = face_towards(moved, axis_point, Vec3::Y).unwrap_or(current.orientation);
        PhotoPose {
            position: slot,
            orientation,
            scale: ORBIT_SCALE,
            opacity: 0.0,
        }
    }

    pub fn step(&mut self, mode: AppMode, focus: usize, camera: &CameraRig, time: f32) {
        let n = self.poses.len();
        let focused = (mode == AppMode::Scatter).then_some(focus);
        for (i, pose) in self.poses.iter_mut().enumerate() {
            let target = if focused == Some(i) {
                Self::focus_pose(camera)
            } else {
                Self::orbit_pose(pose, Self::orbit_position(i, n, time))
            };
            pose.blend_towards(&target, PHOTO_BLEND_RATE);
        }
    }
}
