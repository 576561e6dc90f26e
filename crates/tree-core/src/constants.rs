use glam::Vec3;

// Shared visual and gesture tuning constants used by the core and the frontend.

// Scene sizing
pub const PARTICLE_COUNT_SMALL: usize = 5000; // narrow viewports
pub const PARTICLE_COUNT_LARGE: usize = 12000;
pub const NARROW_VIEWPORT_PX: f64 = 768.0; // logical px, below this the small count is used
pub const PHOTO_COUNT: usize = 10;
pub const MAX_PHOTO_COUNT: usize = 1 << 16; // focus is packed into 16 bits of the shared cell
pub const LANDMARK_COUNT: usize = 21;

// Hand landmark indices (MediaPipe hand topology)
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const PALM_CENTER: usize = 9;
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

// Gesture thresholds (normalized image units)
pub const SWIPE_THRESHOLD: f32 = 0.08;
pub const FIST_PALM_DIST_MAX: f32 = 0.15;
pub const FIST_THUMB_DIST_MAX: f32 = 0.18;
pub const OPEN_WRIST_DIST_MIN: f32 = 0.32;

// Formation morph
pub const TREE_APPROACH_RATE: f32 = 0.08; // per frame
pub const SCATTER_APPROACH_RATE: f32 = 0.04; // per frame
pub const FIELD_ROTATION_STEP: f32 = 0.001; // rad per frame
pub const TREE_TURNS: f32 = 12.0; // 24π of sweep
pub const TREE_HEIGHT: f32 = 12.0;
pub const TREE_RADIUS_TOP: f32 = 12.5;
pub const TREE_RADIUS_SCALE: f32 = 0.45;
pub const TREE_BASE_Y: f32 = -6.0;
pub const SCATTER_HALF_WIDTH: f32 = 30.0;
pub const SPAWN_HALF_WIDTH: f32 = 20.0;

// Light ring and star
pub const LIGHT_COUNT: usize = 150;
pub const LIGHT_TURNS: f32 = 9.0; // 18π of sweep
pub const LIGHT_HEIGHT: f32 = 11.8;
pub const LIGHT_RADIUS_TOP: f32 = 12.2;
pub const LIGHT_RADIUS_SCALE: f32 = 0.48;
pub const LIGHT_BASE_Y: f32 = -5.8;
pub const LIGHT_TWINKLE_SPEED: f32 = 4.0;
pub const LIGHT_TWINKLE_PHASE: f32 = 0.2; // per instance
pub const LIGHT_GAIN: f32 = 1.5;
pub const LIGHT_ROTATION_STEP: f32 = 0.004;
pub const LIGHT_MARKER_SIZE: f32 = 0.2;
pub const STAR_APEX: Vec3 = Vec3::new(0.0, 6.8, 0.0);
pub const STAR_ROTATION_STEP: f32 = 0.015;
pub const STAR_PULSE_SPEED: f32 = 3.0;
pub const STAR_PULSE_AMOUNT: f32 = 0.15;
pub const STAR_SIZE: f32 = 2.0;

// Photo carousel
pub const PHOTO_BLEND_RATE: f32 = 0.1;
pub const ORBIT_RADIUS: f32 = 8.0;
pub const ORBIT_HEIGHT_SPAN: f32 = 12.0;
pub const ORBIT_BASE_Y: f32 = -6.0;
pub const ORBIT_ANGULAR_SPEED: f32 = 0.2; // rad per second
pub const ORBIT_SCALE: f32 = 0.01;
pub const FOCUS_DISTANCE: f32 = 6.0; // in front of the camera
pub const FOCUS_SCALE: f32 = 1.8;
pub const PHOTO_QUAD_SIZE: f32 = 2.5;

// Camera rig
pub const CAMERA_BLEND_RATE: f32 = 0.05;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 5.0, 20.0);
pub const CAMERA_TREE_ANCHOR: Vec3 = Vec3::new(0.0, 4.0, 22.0);
pub const CAMERA_CLOSE_ANCHOR: Vec3 = Vec3::new(0.0, 1.0, 14.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 2.0, 0.0);
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Loading screen pacing
pub const LOADING_STEP_SEC: f32 = 0.03; // one percent per step
pub const LOADING_SETTLE_SEC: f32 = 0.5; // hold at 100% before completing

// Palette (sRGB, 0..1)
pub const GOLD: [f32; 3] = [1.0, 0.843, 0.0]; // #FFD700
pub const RED: [f32; 3] = [0.831, 0.141, 0.149]; // #D42426
pub const LIGHT_GREEN: [f32; 3] = [0.180, 0.545, 0.341]; // #2E8B57
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.0];
pub const PARTICLE_SIZE: f32 = 0.15;
pub const PARTICLE_OPACITY: f32 = 0.9;
