use rand::Rng;

use crate::{SampleBuffer, SAMPLE_COUNT};

/// Anything that can produce one tick of samples.
///
/// The synthesizer is the default implementation; a capture driver can feed
/// real microphone frames through [`PcmSource`] without touching the rest of
/// the pipeline.
pub trait SampleSource {
    /// Overwrite `buffer` with the samples for the tick ending at `clock`.
    fn fill<R: Rng>(&mut self, clock: f32, rng: &mut R, buffer: &mut SampleBuffer);
}

/// Normalize a single sample from i16 to f32.
pub fn normalize_sample(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

/// Normalize a slice of i16 samples to a slice of f32 samples.
pub fn normalize_samples(samples: &[i16], normalized_samples: &mut [f32]) {
    for (normalized, &sample) in normalized_samples.iter_mut().zip(samples) {
        *normalized = normalize_sample(sample);
    }
}

/// Holds the most recent captured PCM frame and replays it every tick until a
/// newer one arrives.
#[derive(Debug, Clone)]
pub struct PcmSource {
    frame: [i16; SAMPLE_COUNT],
}

impl PcmSource {
    pub const fn new() -> Self {
        Self {
            frame: [0; SAMPLE_COUNT],
        }
    }

    /// Store a capture frame. The frame must hold exactly `SAMPLE_COUNT`
    /// samples.
    pub fn push_frame(&mut self, samples: &[i16]) -> Result<(), &'static str> {
        if samples.len() != SAMPLE_COUNT {
            return Err("Frame must contain exactly 32 samples");
        }
        self.frame.copy_from_slice(samples);
        Ok(())
    }

    pub fn frame(&self) -> &[i16; SAMPLE_COUNT] {
        &self.frame
    }
}

impl Default for PcmSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for PcmSource {
    fn fill<R: Rng>(&mut self, _clock: f32, _rng: &mut R, buffer: &mut SampleBuffer) {
        normalize_samples(&self.frame, buffer);
    }
}
