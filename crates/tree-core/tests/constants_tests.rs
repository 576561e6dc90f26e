// Relationships between tuning constants.

use tree_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn blend_rates_are_fractions() {
    for rate in [
        TREE_APPROACH_RATE,
        SCATTER_APPROACH_RATE,
        PHOTO_BLEND_RATE,
        CAMERA_BLEND_RATE,
    ] {
        assert!(rate > 0.0 && rate < 1.0);
    }
    // gathering is faster than dispersing
    assert!(TREE_APPROACH_RATE > SCATTER_APPROACH_RATE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn gesture_thresholds_are_ordered() {
    assert!(SWIPE_THRESHOLD > 0.0);
    assert!(FIST_PALM_DIST_MAX < OPEN_WRIST_DIST_MIN);
    assert!(FIST_THUMB_DIST_MAX < OPEN_WRIST_DIST_MIN);
    assert!(FINGERTIPS.iter().all(|&i| i < LANDMARK_COUNT));
    assert!(WRIST < LANDMARK_COUNT && THUMB_TIP < LANDMARK_COUNT && PALM_CENTER < LANDMARK_COUNT);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn decorations_sit_on_the_tree() {
    // star just above the top of the spiral
    assert!(STAR_APEX.y > TREE_BASE_Y + TREE_HEIGHT);
    // lights wrap just outside the particle spiral
    assert!(LIGHT_RADIUS_TOP * LIGHT_RADIUS_SCALE > 0.0);
    assert!(LIGHT_BASE_Y >= TREE_BASE_Y);
    assert!(SPAWN_HALF_WIDTH < SCATTER_HALF_WIDTH);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_anchors_frame_the_scene() {
    assert!(CAMERA_CLOSE_ANCHOR.z < CAMERA_TREE_ANCHOR.z);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(FOCUS_DISTANCE < CAMERA_CLOSE_ANCHOR.z);
    assert!(FOCUS_SCALE > ORBIT_SCALE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn particle_budgets() {
    assert!(PARTICLE_COUNT_SMALL < PARTICLE_COUNT_LARGE);
    assert!(PHOTO_COUNT > 0);
    assert!((LOADING_STEP_SEC * 100.0 - 3.0).abs() < 1e-4);
}
