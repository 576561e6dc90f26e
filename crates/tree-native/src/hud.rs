use tree_core::{AppMode, SceneState};

/// Window title doubling as the status overlay.
pub fn title(state: &SceneState, loading_percent: u32, muted: bool) -> String {
    let sound = if muted { "muted" } else { "sound on" };
    match state.mode {
        AppMode::Loading => format!("Particle Tree | loading {loading_percent}%"),
        mode => format!(
            "Particle Tree | {} | gesture {} | photo {} | {} | F fist, O open, R relax, H hide, arrows swipe, M sound",
            mode.label(),
            state.gesture.label(),
            state.focus + 1,
            sound
        ),
    }
}
