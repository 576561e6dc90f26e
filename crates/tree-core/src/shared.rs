//! Single-slot, last-write-wins cell shared between the tracking thread and
//! the render loop.
//!
//! The whole [`SceneState`] plus a generation counter is packed into one
//! `AtomicU64`, so readers always observe a consistent snapshot and writers
//! never wait on a lock. There is no queue: intermediate states that the
//! renderer never sampled are simply lost.

use crate::constants::MAX_PHOTO_COUNT;
use crate::gesture::GestureSymbol;
use crate::mode::{AppMode, Orchestrator, SceneState};
use std::sync::atomic::{AtomicU64, Ordering};

/// A state as read from the cell, tagged with how many writes preceded it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub state: SceneState,
    pub generation: u32,
}

#[derive(Debug)]
pub struct SceneCell {
    slot: AtomicU64,
}

fn pack(state: SceneState, generation: u32) -> u64 {
    debug_assert!(state.focus < MAX_PHOTO_COUNT, "focus {} does not fit", state.focus);
    (state.mode as u64)
        | ((state.gesture as u64) << 8)
        | (((state.focus as u64) & 0xFFFF) << 16)
        | ((generation as u64) << 32)
}

fn unpack(bits: u64) -> Snapshot {
    Snapshot {
        state: SceneState {
            mode: AppMode::from_u8((bits & 0xFF) as u8),
            gesture: GestureSymbol::from_u8(((bits >> 8) & 0xFF) as u8),
            focus: ((bits >> 16) & 0xFFFF) as usize,
        },
        generation: (bits >> 32) as u32,
    }
}

impl SceneCell {
    pub fn new(initial: SceneState) -> Self {
        Self {
            slot: AtomicU64::new(pack(initial, 0)),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        unpack(self.slot.load(Ordering::Acquire))
    }

    pub fn load(&self) -> SceneState {
        self.snapshot().state
    }

    /// Overwrite the slot unconditionally.
    pub fn publish(&self, state: SceneState) {
        self.update(|_| state);
    }

    /// Read-modify-write without locking. `f` may run more than once under
    /// contention, so it must be pure.
    pub fn update(&self, f: impl Fn(SceneState) -> SceneState) -> SceneState {
        let mut next = SceneState::default();
        // fetch_update only fails when the closure returns None, which ours never does
        _ = self
            .slot
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let cur = unpack(bits);
                next = f(cur.state);
                Some(pack(next, cur.generation.wrapping_add(1)))
            });
        next
    }

    /// Classify-side entry point: run the orchestrator for `gesture`.
    pub fn dispatch(&self, orchestrator: &mut Orchestrator, gesture: GestureSymbol) -> SceneState {
        let candidate = orchestrator.draw_focus();
        let n = orchestrator.photo_count();
        self.update(|s| s.apply(gesture, candidate, n))
    }

    /// Fire the external loading-complete signal.
    pub fn complete_loading(&self) -> SceneState {
        self.update(SceneState::complete_loading)
    }
}
