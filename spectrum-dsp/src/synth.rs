#[allow(unused_imports)]
use micromath::F32Ext;
use rand::Rng;

use crate::source::SampleSource;
use crate::SampleBuffer;

/// `(rate, amplitude)` of the tones summed into every sample, bass first.
pub const TONES: [(f32, f32); 6] = [
    (50.0, 0.3),
    (200.0, 0.4),
    (800.0, 0.5),
    (2000.0, 0.6),
    (5000.0, 0.7),
    (10000.0, 0.4),
];

/// Phase advance between consecutive samples of one buffer.
pub const PHASE_STEP: f32 = 0.01;
/// Noise is uniform in `[-NOISE_AMPLITUDE, NOISE_AMPLITUDE]`.
pub const NOISE_AMPLITUDE: f32 = 0.1;

pub const BEAT_PERIOD: f32 = 0.5;
pub const BEAT_WINDOW: f32 = 0.05;
pub const BEAT_RATE: f32 = 100.0;
pub const BEAT_AMPLITUDE: f32 = 0.8;

/// Generates a multi-tone test signal with noise and a periodic beat, standing
/// in for a microphone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalSynthesizer;

impl SignalSynthesizer {
    pub const fn new() -> Self {
        Self
    }

    /// Sum of the fixed tones at phase `t`.
    pub fn tones(t: f32) -> f32 {
        TONES
            .iter()
            .map(|&(rate, amplitude)| (t * rate).sin() * amplitude)
            .sum()
    }

    /// Drum-like pulse, non-zero only inside the first `BEAT_WINDOW` of every
    /// `BEAT_PERIOD`. `t` is never negative.
    pub fn beat(t: f32) -> f32 {
        if t % BEAT_PERIOD < BEAT_WINDOW {
            (t * BEAT_RATE).sin() * BEAT_AMPLITUDE
        } else {
            0.0
        }
    }

    /// Noise-free part of the sample at phase `t`.
    pub fn deterministic(t: f32) -> f32 {
        Self::tones(t) + Self::beat(t)
    }
}

impl SampleSource for SignalSynthesizer {
    fn fill<R: Rng>(&mut self, clock: f32, rng: &mut R, buffer: &mut SampleBuffer) {
        for (i, sample) in buffer.iter_mut().enumerate() {
            let t = clock + i as f32 * PHASE_STEP;
            let noise = rng.random_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
            *sample = Self::deterministic(t) + noise;
        }
    }
}
