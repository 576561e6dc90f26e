// Background music: track decoding, chime feeding and muting.
// The native crate is a binary, so the modules are compiled in directly.

#![allow(dead_code)]
#[path = "../src/assets.rs"]
mod assets;
#[path = "../src/audio.rs"]
mod audio;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use audio::{feed_chimes, MixState};
use tree_core::music::{ChimeParams, ChimeSequencer, LoopingTrack};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tree-audio-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 16-bit PCM WAV with interleaved `frames`.
fn wav_bytes(sample_rate: u32, channels: u16, frames: &[i16]) -> Vec<u8> {
    let data_len = (frames.len() * 2) as u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
    out.extend_from_slice(&(channels * 2).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in frames {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

fn always_chime() -> ChimeSequencer {
    let params = ChimeParams {
        density: 1.0,
        ..ChimeParams::default()
    };
    ChimeSequencer::new(params, 4)
}

#[test]
fn stereo_wav_decodes_to_mono_loop() {
    let dir = scratch_dir("wav");
    let path = dir.join("bgm.wav");
    let frames: Vec<i16> = (0..400).flat_map(|_| [16384i16, 8192]).collect();
    std::fs::write(&path, wav_bytes(8_000, 2, &frames)).unwrap();

    let mut track = assets::load_track(&path).unwrap();
    assert_eq!(track.sample_rate(), 8_000);
    assert_eq!(track.frame_count(), 400);
    assert!((track.next_sample(8_000.0) - 0.375).abs() < 1e-4);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_or_garbage_music_is_an_error() {
    let dir = scratch_dir("bad");
    assert!(assets::load_track(&dir.join("absent.mp3")).is_err());
    let junk = dir.join("junk.mp3");
    std::fs::write(&junk, b"definitely not audio").unwrap();
    assert!(assets::load_track(&junk).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn muted_scheduler_queues_nothing() {
    let mix = Mutex::new(MixState::new(48_000.0));
    let muted = AtomicBool::new(true);
    let mut seq = always_chime();
    let mut events = Vec::new();
    for step in 0..2000 {
        feed_chimes(
            &mut seq,
            &mix,
            &muted,
            Duration::from_millis(15),
            step as f64 * 0.015,
            &mut events,
        );
    }
    assert_eq!(mix.lock().unwrap().voice_count(), 0);

    muted.store(false, Ordering::Release);
    feed_chimes(&mut seq, &mix, &muted, Duration::from_secs(1), 30.0, &mut events);
    let queued = mix.lock().unwrap().voice_count();
    assert!(queued > 0 && queued <= 4, "queued {queued}");
}

#[test]
fn silence_drops_ringing_bells() {
    let mix = Mutex::new(MixState::new(48_000.0));
    let muted = AtomicBool::new(false);
    let mut seq = always_chime();
    let mut events = Vec::new();
    feed_chimes(&mut seq, &mix, &muted, Duration::from_secs(2), 0.0, &mut events);
    let mut guard = mix.lock().unwrap();
    assert!(guard.voice_count() > 0);
    assert!(guard.next_sample().abs() <= 1.0);
    guard.silence();
    assert_eq!(guard.voice_count(), 0);
    assert_eq!(guard.next_sample(), 0.0);
}

#[test]
fn loaded_track_replaces_chimes() {
    let mut mix = MixState::new(8_000.0);
    let mut seq = always_chime();
    let mut events = Vec::new();
    seq.tick(Duration::from_secs(1), 0.0, &mut events);
    mix.enqueue(&events);
    assert!(mix.voice_count() > 0);

    mix.set_track(LoopingTrack::new(vec![0.5, -0.5], 8_000).unwrap());
    assert_eq!(mix.voice_count(), 0);
    assert!((mix.next_sample() - 0.4).abs() < 1e-6);
    assert!((mix.next_sample() + 0.4).abs() < 1e-6);
    assert!((mix.next_sample() - 0.4).abs() < 1e-6);
}
