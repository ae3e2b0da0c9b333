use core::f32::consts::PI;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::dynamics::BandState;
use crate::{SampleBuffer, BAND_COUNT, SAMPLE_COUNT};

/// Centre frequency of every band, one octave apart from 400 Hz up.
pub const TARGET_FREQUENCIES_HZ: [f32; BAND_COUNT] =
    [50.0, 150.0, 400.0, 800.0, 1600.0, 3200.0, 6400.0, 12800.0];

/// DFT bin closest to `frequency` for an `n`-point window at `sample_rate`.
pub fn bin_index(frequency: f32, n: usize, sample_rate: f32) -> f32 {
    (frequency * n as f32 / sample_rate).round()
}

/// Precomputed coefficients for evaluating one DFT bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoertzelBin {
    pub k: f32,
    cosine: f32,
    sine: f32,
}

impl GoertzelBin {
    pub fn new(k: f32, n: usize) -> Self {
        let omega = 2.0 * PI * k / n as f32;
        Self {
            k,
            cosine: omega.cos(),
            sine: omega.sin(),
        }
    }

    /// Run the second-order recursion over `samples` and return the magnitude
    /// of this bin.
    pub fn magnitude(&self, samples: &[f32]) -> f32 {
        let coeff = 2.0 * self.cosine;
        let mut q1 = 0.0f32;
        let mut q2 = 0.0f32;

        for &sample in samples {
            let q0 = coeff * q1 - q2 + sample;
            q2 = q1;
            q1 = q0;
        }

        let real = q1 - q2 * self.cosine;
        let imag = q2 * self.sine;
        (real * real + imag * imag).max(0.0).sqrt()
    }
}

/// Single-bin magnitude of `samples` at bin `k`, window length taken from the
/// slice.
pub fn goertzel_magnitude(samples: &[f32], k: f32) -> f32 {
    GoertzelBin::new(k, samples.len()).magnitude(samples)
}

/// Eight Goertzel filters, one per band, evaluated over each sample buffer.
///
/// Only eight magnitudes are needed per frame, so this is cheaper than a full
/// FFT of the window.
#[derive(Debug, Clone)]
pub struct FilterBank {
    sample_rate: f32,
    bins: [GoertzelBin; BAND_COUNT],
}

impl FilterBank {
    pub fn new(sample_rate: f32) -> Self {
        let bins = core::array::from_fn(|band| {
            let k = bin_index(TARGET_FREQUENCIES_HZ[band], SAMPLE_COUNT, sample_rate);
            GoertzelBin::new(k, SAMPLE_COUNT)
        });
        Self { sample_rate, bins }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn bins(&self) -> &[GoertzelBin; BAND_COUNT] {
        &self.bins
    }

    /// Per-band magnitudes of `samples`, without touching any band state.
    pub fn magnitudes(&self, samples: &SampleBuffer) -> [f32; BAND_COUNT] {
        core::array::from_fn(|band| self.bins[band].magnitude(samples))
    }

    /// Blend this buffer's magnitudes into `bands`.
    pub fn process(&self, samples: &SampleBuffer, bands: &mut [BandState; BAND_COUNT]) {
        for (band, magnitude) in bands.iter_mut().zip(self.magnitudes(samples)) {
            band.blend_magnitude(magnitude);
        }
    }
}
