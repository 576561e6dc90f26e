use instant::Instant;

/// Monotonic animation time, advanced only by the render driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationClock {
    elapsed: f32,
    frames: u64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the clock started.
    pub fn time(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by `dt_sec`; negative or NaN deltas are treated as zero.
    pub fn advance(&mut self, dt_sec: f32) {
        if dt_sec > 0.0 {
            self.elapsed += dt_sec;
        }
        self.frames += 1;
    }
}

/// Wall-clock delta source for the render loop.
pub struct FrameTimer {
    last: Instant,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call.
    pub fn lap(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt.as_secs_f32()
    }
}
