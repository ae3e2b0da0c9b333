#![no_std]

//! Signal side of the LED-matrix spectrum analyzer: a synthetic sample
//! source, an 8-band Goertzel filter bank and the per-band dynamics
//! (smoothing, peak hold and decay).

pub mod dynamics;
pub mod goertzel;
pub mod source;
pub mod synth;

pub use dynamics::*;
pub use goertzel::*;
pub use source::*;
pub use synth::*;

/// Samples analysed per tick.
pub const SAMPLE_COUNT: usize = 32;
/// Nominal sampling rate the filter bank bins are derived from.
pub const SAMPLE_RATE_HZ: f32 = 44_100.0;
/// Number of frequency bands, low to high.
pub const BAND_COUNT: usize = 8;

/// One tick worth of audio, regenerated every frame.
pub type SampleBuffer = [f32; SAMPLE_COUNT];
