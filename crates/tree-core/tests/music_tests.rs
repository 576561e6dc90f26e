// Chime sequencer pacing and pitch helpers.

use std::time::Duration;
use tree_core::music::*;

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    let a4 = midi_to_hz(69.0);
    assert!((a4 - 440.0).abs() < 1e-4);
    let a5 = midi_to_hz(81.0);
    assert!((a5 - 880.0).abs() < 1e-3);
    assert!((a5 / a4 - 2.0).abs() < 1e-4);
}

#[test]
fn midi_to_hz_is_monotonic_over_range() {
    let mut prev = midi_to_hz(20.0);
    for m in 21..=100 {
        let f = midi_to_hz(m as f32);
        assert!(f > prev, "frequency not increasing at midi {m}");
        prev = f;
    }
}

#[test]
fn sequencer_emits_scale_notes_over_time() {
    let mut seq = ChimeSequencer::new(ChimeParams::default(), 42);
    let mut events = Vec::new();
    let eighth = 60.0 / seq.params.bpm as f64 / 2.0;
    for step in 0..400 {
        seq.tick(Duration::from_secs_f64(eighth), step as f64 * eighth, &mut events);
    }
    assert!(!events.is_empty(), "expected some scheduled chimes");
    assert!(events.len() < 400);
    let allowed: Vec<f32> = C_MAJOR_PENTATONIC
        .iter()
        .map(|d| midi_to_hz((72 + d) as f32))
        .collect();
    for ev in &events {
        assert!(allowed.iter().any(|f| (f - ev.frequency_hz).abs() < 1e-3));
        assert!(ev.velocity >= 0.2 && ev.velocity <= 0.5);
        assert!(ev.duration_sec > 0.0);
    }
}

#[test]
fn short_ticks_accumulate() {
    let params = ChimeParams {
        density: 1.0,
        ..ChimeParams::default()
    };
    let mut seq = ChimeSequencer::new(params, 1);
    let mut events = Vec::new();
    let eighth = 60.0 / 96.0 / 2.0;
    seq.tick(Duration::from_secs_f64(eighth * 0.6), 0.0, &mut events);
    assert!(events.is_empty());
    seq.tick(Duration::from_secs_f64(eighth * 0.6), 0.0, &mut events);
    assert_eq!(events.len(), 1);
}

#[test]
fn same_seed_same_melody() {
    let run = |seed| {
        let mut seq = ChimeSequencer::new(ChimeParams::default(), seed);
        let mut events = Vec::new();
        seq.tick(Duration::from_secs(30), 0.0, &mut events);
        events.iter().map(|e| e.frequency_hz).collect::<Vec<_>>()
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn empty_track_is_rejected() {
    assert!(LoopingTrack::new(Vec::new(), 44_100).is_none());
    assert!(LoopingTrack::new(vec![0.5], 0).is_none());
}

#[test]
fn track_loops_at_matching_rate() {
    let mut track = LoopingTrack::new(vec![0.1, 0.2, 0.3], 8_000).unwrap();
    assert_eq!(track.frame_count(), 3);
    let out: Vec<f32> = (0..7).map(|_| track.next_sample(8_000.0)).collect();
    let expected = [0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1];
    for (a, b) in out.iter().zip(expected) {
        assert!((a - b).abs() < 1e-6, "{out:?}");
    }
}

#[test]
fn track_interpolates_when_upsampling() {
    let mut track = LoopingTrack::new(vec![0.0, 1.0], 22_050).unwrap();
    let out: Vec<f32> = (0..5).map(|_| track.next_sample(44_100.0)).collect();
    let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
    for (a, b) in out.iter().zip(expected) {
        assert!((a - b).abs() < 1e-6, "{out:?}");
    }
    assert!((track.duration_sec() - 2.0 / 22_050.0).abs() < 1e-9);
}
