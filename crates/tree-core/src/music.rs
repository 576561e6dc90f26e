use rand::prelude::*;
use std::time::Duration;

/// One scheduled chime.
#[derive(Clone, Debug, Default)]
pub struct NoteEvent {
    pub frequency_hz: f32,
    pub velocity: f32,
    pub start_time_sec: f64,
    pub duration_sec: f32,
}

#[derive(Clone, Debug)]
pub struct ChimeParams {
    pub bpm: f32,
    pub scale: &'static [i32],
    pub root_midi: i32,
    /// Chance that an eighth-note step sounds.
    pub density: f32,
}

impl Default for ChimeParams {
    fn default() -> Self {
        Self {
            bpm: 96.0,
            scale: C_MAJOR_PENTATONIC,
            root_midi: 72,
            density: 0.35,
        }
    }
}

pub const C_MAJOR_PENTATONIC: &[i32] = &[0, 2, 4, 7, 9, 12];

/// Sparse, seeded bell melody for the background loop.
pub struct ChimeSequencer {
    pub params: ChimeParams,
    rng: StdRng,
    beat_accum: f64,
}

impl ChimeSequencer {
    pub fn new(params: ChimeParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
            beat_accum: 0.0,
        }
    }

    pub fn tick(&mut self, dt: Duration, now_sec: f64, out_events: &mut Vec<NoteEvent>) {
        let seconds_per_beat = 60.0 / self.params.bpm.max(1.0) as f64;
        self.beat_accum += dt.as_secs_f64();
        while self.beat_accum >= seconds_per_beat / 2.0 {
            // eighth notes grid
            self.beat_accum -= seconds_per_beat / 2.0;
            self.schedule_step(now_sec, out_events);
        }
    }

    fn schedule_step(&mut self, now_sec: f64, out_events: &mut Vec<NoteEvent>) {
        if self.rng.gen::<f32>() >= self.params.density {
            return;
        }
        let degree = *self.params.scale.choose(&mut self.rng).unwrap_or(&0);
        let midi = self.params.root_midi + degree;
        out_events.push(NoteEvent {
            frequency_hz: midi_to_hz(midi as f32),
            velocity: 0.2 + self.rng.gen::<f32>() * 0.3,
            start_time_sec: now_sec + 0.02,
            duration_sec: 0.8 + self.rng.gen::<f32>() * 0.6,
        });
    }
}

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Decoded mono track, resampled on the fly and looped forever.
#[derive(Clone, Debug)]
pub struct LoopingTrack {
    samples: Vec<f32>,
    sample_rate: u32,
    cursor: f64,
}

impl LoopingTrack {
    /// `None` when there is nothing to play.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Option<Self> {
        if samples.is_empty() || sample_rate == 0 {
            return None;
        }
        Some(Self {
            samples,
            sample_rate,
            cursor: 0.0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    pub fn duration_sec(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Next sample for a stream running at `output_rate`, linearly
    /// interpolated and wrapping at the end of the track.
    pub fn next_sample(&mut self, output_rate: f32) -> f32 {
        let n = self.samples.len();
        let i = (self.cursor as usize).min(n - 1);
        let frac = (self.cursor - i as f64) as f32;
        let a = self.samples[i];
        let b = self.samples[(i + 1) % n];
        self.cursor += self.sample_rate as f64 / output_rate.max(1.0) as f64;
        self.cursor = self.cursor.rem_euclid(n as f64);
        a + (b - a) * frac
    }
}
