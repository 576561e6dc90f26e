//! Camera rig: smoothed position, unsmoothed look-at orientation.
//!
//! The eye eases toward a mode-dependent anchor while the orientation is
//! rebuilt every frame to face [`CAMERA_LOOK_AT`] from wherever the eye
//! currently is. Blending the orientation as well would change the motion
//! visibly, so it stays a hard look-at.

use crate::constants::*;
use crate::mode::AppMode;
use glam::{Mat3, Mat4, Quat, Vec3};

/// Orientation whose local -Z points from `eye` to `target` (camera convention).
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    let z = (eye - target).normalize_or_zero();
    let x = up.cross(z).normalize_or_zero();
    if z == Vec3::ZERO || x == Vec3::ZERO {
        return None;
    }
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)))
}

/// Orientation whose local +Z points from `pos` to `target` (object convention).
pub fn face_towards(pos: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
    look_rotation(target, pos, up)
}

/// Right-handed perspective camera driven by the rig.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub eye: Vec3,
    pub orientation: Quat,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl CameraRig {
    pub fn new(aspect: f32) -> Self {
        let mut rig = Self {
            eye: CAMERA_START,
            orientation: Quat::IDENTITY,
            target: CAMERA_LOOK_AT,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        };
        rig.reorient();
        rig
    }

    pub fn anchor(mode: AppMode) -> Vec3 {
        match mode {
            AppMode::Tree => CAMERA_TREE_ANCHOR,
            _ => CAMERA_CLOSE_ANCHOR,
        }
    }

    pub fn step(&mut self, mode: AppMode) {
        self.eye = self.eye.lerp(Self::anchor(mode), CAMERA_BLEND_RATE);
        self.reorient();
    }

    fn reorient(&mut self) {
        if let Some(q) = look_rotation(self.eye, self.target, self.up) {
            self.orientation = q;
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn up_vector(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
