//! Application mode state machine and focus selection.

use crate::constants::MAX_PHOTO_COUNT;
use crate::gesture::GestureSymbol;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AppMode {
    #[default]
    Loading = 0,
    Tree = 1,
    Scatter = 2,
}

impl AppMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Tree,
            2 => Self::Scatter,
            _ => Self::Loading,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Tree => "TREE",
            Self::Scatter => "SCATTER",
        }
    }
}

/// Everything the renderer needs from the tracking side, as one value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneState {
    pub mode: AppMode,
    pub focus: usize,
    pub gesture: GestureSymbol,
}

impl SceneState {
    pub fn new(mode: AppMode, focus: usize) -> Self {
        Self {
            mode,
            focus,
            gesture: GestureSymbol::None,
        }
    }

    /// Apply one classified gesture.
    ///
    /// `candidate_focus` is the pre-drawn random index used when `Open` enters
    /// scatter from another mode; it is ignored otherwise. `photo_count` must
    /// be non-zero.
    pub fn apply(self, gesture: GestureSymbol, candidate_focus: usize, photo_count: usize) -> Self {
        let mut next = Self { gesture, ..self };
        match gesture {
            GestureSymbol::Open if self.mode != AppMode::Loading => {
                if self.mode != AppMode::Scatter {
                    next.focus = candidate_focus % photo_count;
                }
                next.mode = AppMode::Scatter;
            }
            GestureSymbol::Fist if self.mode != AppMode::Loading => {
                next.mode = AppMode::Tree;
            }
            GestureSymbol::SwipeLeft => {
                next.focus = (self.focus + 1) % photo_count;
            }
            GestureSymbol::SwipeRight => {
                next.focus = (self.focus + photo_count - 1) % photo_count;
            }
            _ => {}
        }
        next
    }

    /// External "loading finished" signal. Only leaves `Loading`.
    pub fn complete_loading(self) -> Self {
        match self.mode {
            AppMode::Loading => Self {
                mode: AppMode::Tree,
                ..self
            },
            _ => self,
        }
    }
}

/// Owns the randomness used for focus selection.
pub struct Orchestrator {
    rng: StdRng,
    photo_count: usize,
}

impl Orchestrator {
    /// `photo_count` is clamped to `1..=MAX_PHOTO_COUNT`.
    pub fn new(photo_count: usize, seed: u64) -> Self {
        let clamped = photo_count.clamp(1, MAX_PHOTO_COUNT);
        if clamped != photo_count {
            log::warn!("[orchestrator] photo count {photo_count} clamped to {clamped}");
        }
        Self {
            rng: StdRng::seed_from_u64(seed),
            photo_count: clamped,
        }
    }

    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    /// Draw a focus candidate and apply `gesture` to `state`.
    pub fn handle(&mut self, state: SceneState, gesture: GestureSymbol) -> SceneState {
        let candidate = self.draw_focus();
        state.apply(gesture, candidate, self.photo_count)
    }

    pub fn draw_focus(&mut self) -> usize {
        self.rng.gen_range(0..self.photo_count)
    }
}
