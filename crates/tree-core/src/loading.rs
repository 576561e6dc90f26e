use crate::constants::{LOADING_SETTLE_SEC, LOADING_STEP_SEC};

/// Paced progress counter standing in for asset loading.
///
/// Counts from 0 to 100 one percent per [`LOADING_STEP_SEC`], holds at 100
/// for [`LOADING_SETTLE_SEC`], then reports completion exactly once.
#[derive(Clone, Debug, Default)]
pub struct LoadingProgress {
    percent: u32,
    step_accum: f32,
    settle_accum: f32,
    fired: bool,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.fired
    }

    /// Returns `true` only on the call that completes loading.
    pub fn advance(&mut self, dt_sec: f32) -> bool {
        if self.fired || dt_sec.is_nan() || dt_sec <= 0.0 {
            return false;
        }
        let mut dt = dt_sec;
        if self.percent < 100 {
            self.step_accum += dt;
            while self.step_accum >= LOADING_STEP_SEC && self.percent < 100 {
                self.step_accum -= LOADING_STEP_SEC;
                self.percent += 1;
            }
            if self.percent < 100 {
                return false;
            }
            // leftover time spills into the settle phase
            dt = self.step_accum;
            self.step_accum = 0.0;
        }
        self.settle_accum += dt;
        if self.settle_accum >= LOADING_SETTLE_SEC {
            self.fired = true;
            return true;
        }
        false
    }
}
