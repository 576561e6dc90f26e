//! Background music on the default output device (cpal).
//!
//! Starts muted. Unmuting opens the device lazily and plays the configured
//! track in a loop; when that file is missing or undecodable a seeded chime
//! loop plays instead. If the platform refuses the device, the failure is
//! logged and the player stays muted.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tree_core::music::{ChimeParams, ChimeSequencer, LoopingTrack, NoteEvent};

use crate::assets;

#[derive(Clone)]
struct Bell {
    amplitude: f32,
    phase: f32,     // radians
    phase_inc: f32, // radians per sample
    total_samples: u32,
    samples_emitted: u32,
    attack_samples: u32,
}

const MASTER_GAIN: f32 = 0.25;
const TRACK_GAIN: f32 = 0.8;
const SCHEDULER_PERIOD: Duration = Duration::from_millis(15);

fn mix_bells(bells: &mut Vec<Bell>) -> f32 {
    let mut out = 0.0f32;
    let mut i = 0usize;
    while i < bells.len() {
        let bell = &mut bells[i];
        let n = bell.samples_emitted;
        // fast attack, exponential-ish ring out
        let env = if n < bell.attack_samples {
            n as f32 / bell.attack_samples.max(1) as f32
        } else {
            let t = (n - bell.attack_samples) as f32 / bell.total_samples.max(1) as f32;
            (1.0 - t).max(0.0).powi(3)
        };
        // fundamental plus a quiet octave partial
        let tone = bell.phase.sin() + 0.3 * (bell.phase * 2.0).sin();
        out += tone * bell.amplitude * env;
        bell.phase += bell.phase_inc;
        if bell.phase > 2.0 * std::f32::consts::PI {
            bell.phase -= 2.0 * std::f32::consts::PI;
        }
        bell.samples_emitted += 1;
        if bell.samples_emitted >= bell.total_samples {
            bells.swap_remove(i);
            continue;
        }
        i += 1;
    }
    (out * MASTER_GAIN).tanh()
}

/// Everything the output callback reads. A loaded track wins over chimes.
pub struct MixState {
    sample_rate: f32,
    bells: Vec<Bell>,
    track: Option<LoopingTrack>,
}

impl MixState {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            bells: Vec::new(),
            track: None,
        }
    }

    pub fn enqueue(&mut self, events: &[NoteEvent]) {
        let sr = self.sample_rate;
        for ev in events {
            let total = ((ev.duration_sec * sr) as u32).max(1);
            self.bells.push(Bell {
                amplitude: ev.velocity.min(1.0),
                phase: 0.0,
                phase_inc: 2.0 * std::f32::consts::PI * ev.frequency_hz / sr,
                total_samples: total,
                samples_emitted: 0,
                attack_samples: ((0.005 * sr) as u32).min(total),
            });
        }
    }

    pub fn set_track(&mut self, track: LoopingTrack) {
        self.bells.clear();
        self.track = Some(track);
    }

    /// Drop every ringing bell.
    pub fn silence(&mut self) {
        self.bells.clear();
    }

    pub fn voice_count(&self) -> usize {
        self.bells.len()
    }

    pub fn next_sample(&mut self) -> f32 {
        match self.track.as_mut() {
            Some(track) => (track.next_sample(self.sample_rate) * TRACK_GAIN).clamp(-1.0, 1.0),
            None => mix_bells(&mut self.bells),
        }
    }
}

/// One scheduler pass. Nothing is queued while muted, so a paused stream
/// never accumulates voices.
pub fn feed_chimes(
    seq: &mut ChimeSequencer,
    mix: &Mutex<MixState>,
    muted: &AtomicBool,
    dt: Duration,
    now_sec: f64,
    events: &mut Vec<NoteEvent>,
) {
    if muted.load(Ordering::Acquire) {
        return;
    }
    events.clear();
    seq.tick(dt, now_sec, events);
    if events.is_empty() {
        return;
    }
    if let Ok(mut guard) = mix.lock() {
        guard.enqueue(events);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    state: Arc<Mutex<MixState>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut guard) = state.lock() else {
                return;
            };
            for frame in data.chunks_mut(channels.max(1)) {
                let v = T::from_sample(guard.next_sample());
                for s in frame.iter_mut() {
                    *s = v;
                }
            }
        },
        |err| log::warn!("[audio] stream error: {err}"),
        None,
    )
}

/// Load the track, or fall back to chimes until `stop` is raised.
fn run_feed(
    music_path: &Path,
    seed: u64,
    state: &Mutex<MixState>,
    muted: &AtomicBool,
    stop: &AtomicBool,
) {
    match assets::load_track(music_path) {
        Ok(track) => {
            log::info!(
                "[audio] looping {} ({:.1}s at {} Hz)",
                music_path.display(),
                track.duration_sec(),
                track.sample_rate()
            );
            if let Ok(mut guard) = state.lock() {
                guard.set_track(track);
            }
            return;
        }
        Err(e) => log::warn!(
            "[audio] no music from {} ({e:#}); playing chimes instead",
            music_path.display()
        ),
    }

    let mut seq = ChimeSequencer::new(ChimeParams::default(), seed);
    let start = Instant::now();
    let mut last = start;
    let mut events = Vec::new();
    while !stop.load(Ordering::Acquire) {
        let now = Instant::now();
        let dt = now - last;
        last = now;
        feed_chimes(
            &mut seq,
            state,
            muted,
            dt,
            start.elapsed().as_secs_f64(),
            &mut events,
        );
        thread::sleep(SCHEDULER_PERIOD);
    }
}

/// Running output stream plus the thread feeding it.
struct Playback {
    stream: cpal::Stream,
    state: Arc<Mutex<MixState>>,
    stop: Arc<AtomicBool>,
    feeder: Option<thread::JoinHandle<()>>,
}

impl Drop for Playback {
    fn drop(&mut self) {
        _ = self.stream.pause();
        self.stop.store(true, Ordering::Release);
        if let Some(t) = self.feeder.take() {
            _ = t.join();
        }
    }
}

fn start_playback(
    music_path: PathBuf,
    seed: u64,
    muted: Arc<AtomicBool>,
) -> anyhow::Result<Playback> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("no output device"))?;
    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let state = Arc::new(Mutex::new(MixState::new(config.sample_rate.0 as f32)));

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&state))?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&state))?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&state))?,
        other => anyhow::bail!("unsupported sample format {other:?}"),
    };
    stream.play()?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let feed_state = Arc::clone(&state);
    // decoding happens off the render thread
    let feeder = thread::Builder::new()
        .name("music-feed".into())
        .spawn(move || run_feed(&music_path, seed, &feed_state, &muted, &stop_flag))?;

    Ok(Playback {
        stream,
        state,
        stop,
        feeder: Some(feeder),
    })
}

pub struct BackgroundMusic {
    playback: Option<Playback>,
    muted: Arc<AtomicBool>,
    music_path: PathBuf,
    seed: u64,
}

impl BackgroundMusic {
    pub fn new(music_path: PathBuf, seed: u64) -> Self {
        Self {
            playback: None,
            muted: Arc::new(AtomicBool::new(true)),
            music_path,
            seed,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    pub fn toggle(&mut self) {
        if self.is_muted() {
            self.unmute();
        } else {
            self.mute();
        }
    }

    fn unmute(&mut self) {
        if let Some(p) = &self.playback {
            if let Err(e) = p.stream.play() {
                log::warn!("[audio] resume rejected: {e}");
                return;
            }
        } else {
            let muted = Arc::clone(&self.muted);
            match start_playback(self.music_path.clone(), self.seed, muted) {
                Ok(p) => self.playback = Some(p),
                Err(e) => {
                    log::warn!("[audio] playback rejected: {e:#}");
                    return;
                }
            }
        }
        self.muted.store(false, Ordering::Release);
        log::info!("[audio] sound on");
    }

    fn mute(&mut self) {
        self.muted.store(true, Ordering::Release);
        if let Some(p) = &self.playback {
            _ = p.stream.pause();
            if let Ok(mut guard) = p.state.lock() {
                guard.silence();
            }
        }
        log::info!("[audio] muted");
    }

    /// Release the device and stop the feeding thread.
    pub fn shutdown(&mut self) {
        self.playback = None;
        self.muted.store(true, Ordering::Release);
    }
}
