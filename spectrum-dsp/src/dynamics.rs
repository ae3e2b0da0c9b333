use rand::Rng;

use crate::BAND_COUNT;

/// Peaks never fall below this, so the peak marker keeps a defined row.
pub const PEAK_FLOOR: f32 = 0.01;

pub const BASE_DECAY_RATE: f32 = 0.93;
pub const DECAY_RATE_STEP: f32 = 0.01;
/// Upper bound on any band's decay rate; a rate of 1.0 would hold a peak
/// forever.
pub const MAX_DECAY_RATE: f32 = 0.995;

/// Weight kept from the old energy when a new Goertzel magnitude arrives.
pub const MAGNITUDE_RETAIN: f32 = 0.7;
/// Weight kept from the current energy in the temporal low-pass.
pub const SMOOTHING_RETAIN: f32 = 0.7;

pub const PULSE_PROBABILITY: f64 = 0.2;
pub const PULSE_BOOST_MIN: f32 = 0.30;
pub const PULSE_BOOST_MAX: f32 = 0.80;

/// Cross-tick state of one frequency band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandState {
    /// Smoothed magnitude, never negative.
    pub energy: f32,
    /// Peak-hold value. Snaps up to `energy`, decays multiplicatively.
    pub peak: f32,
    /// Last tick's smoothed energy.
    pub previous_energy: f32,
    decay_rate: f32,
}

impl BandState {
    /// Zeroed state for band `index`. Decay rate grows by `DECAY_RATE_STEP`
    /// per band so the bands do not fall in lockstep.
    pub fn new(index: usize) -> Self {
        let decay_rate = (BASE_DECAY_RATE + DECAY_RATE_STEP * index as f32).min(MAX_DECAY_RATE);
        Self {
            energy: 0.0,
            peak: 0.0,
            previous_energy: 0.0,
            decay_rate,
        }
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// First IIR pass: fold a fresh filter magnitude into `energy`.
    pub fn blend_magnitude(&mut self, magnitude: f32) {
        self.energy = self.energy * MAGNITUDE_RETAIN + magnitude * (1.0 - MAGNITUDE_RETAIN);
    }

    /// Temporal low-pass against last tick's value.
    pub fn smooth(&mut self) {
        self.energy =
            self.energy * SMOOTHING_RETAIN + self.previous_energy * (1.0 - SMOOTHING_RETAIN);
        self.previous_energy = self.energy;
    }

    /// Instant attack, multiplicative release, floored at `PEAK_FLOOR`.
    pub fn track_peak(&mut self) {
        if self.energy > self.peak {
            self.peak = self.energy;
        } else {
            self.peak *= self.decay_rate;
        }
        self.peak = self.peak.max(PEAK_FLOOR);
    }

    /// Smoothing followed by peak tracking, once per tick.
    pub fn update(&mut self) {
        self.smooth();
        self.track_peak();
    }
}

/// Fresh state for all bands.
pub fn init_bands() -> [BandState; BAND_COUNT] {
    core::array::from_fn(BandState::new)
}

/// Run the per-tick dynamics on every band.
pub fn process_dynamics(bands: &mut [BandState]) {
    for band in bands.iter_mut() {
        band.update();
    }
}

/// With `PULSE_PROBABILITY`, boost one random band's energy by a factor in
/// `[1 + PULSE_BOOST_MIN, 1 + PULSE_BOOST_MAX]`. Returns the boosted band.
///
/// The peak is left alone; it catches up on the next tick.
pub fn apply_pulse<R: Rng>(bands: &mut [BandState], rng: &mut R) -> Option<usize> {
    if bands.is_empty() || !rng.random_bool(PULSE_PROBABILITY) {
        return None;
    }
    let index = rng.random_range(0..bands.len());
    let boost = rng.random_range(PULSE_BOOST_MIN..=PULSE_BOOST_MAX);
    bands[index].energy *= 1.0 + boost;
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_decay_rates_are_fixed_progression() {
        let bands = init_bands();
        for (i, band) in bands.iter().enumerate() {
            assert!(band.decay_rate() >= 0.93 && band.decay_rate() < 1.0);
            assert_eq!(band.energy, 0.0);
            assert_eq!(band.peak, 0.0);
            if i > 0 {
                assert!(band.decay_rate() > bands[i - 1].decay_rate());
            }
        }
        assert_abs_diff_eq!(bands[3].decay_rate(), 0.96, epsilon = 1e-6);
    }

    #[test]
    fn test_attack_snaps_peak_to_energy() {
        let mut band = BandState::new(2);
        band.peak = 0.5;
        band.energy = 2.0;
        band.update();
        assert!(band.energy > 0.5);
        assert_eq!(band.peak, band.energy);
    }

    #[test]
    fn test_release_is_multiplicative() {
        let mut band = BandState::new(0);
        band.peak = 4.0;
        band.energy = 1.0;
        band.previous_energy = 1.0;
        band.update();
        assert_abs_diff_eq!(band.peak, 4.0 * 0.93, epsilon = 1e-6);
    }

    #[test]
    fn test_peak_never_below_floor() {
        let mut band = BandState::new(7);
        band.peak = 0.0105;
        for _ in 0..100 {
            band.update();
            assert!(band.peak >= PEAK_FLOOR);
        }
        assert_eq!(band.peak, PEAK_FLOOR);
    }

    #[test]
    fn test_smoothing_tracks_previous_energy() {
        let mut band = BandState::new(0);
        band.energy = 1.0;
        band.previous_energy = 2.0;
        band.smooth();
        assert_abs_diff_eq!(band.energy, 1.3, epsilon = 1e-6);
        assert_eq!(band.previous_energy, band.energy);
    }

    #[test]
    fn test_dynamics_laws_over_random_input() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut bands = init_bands();

        for _ in 0..1_000 {
            let before = bands;
            for band in bands.iter_mut() {
                band.blend_magnitude(rng.random_range(0.0..8.0));
            }
            process_dynamics(&mut bands);

            for (old, new) in before.iter().zip(bands.iter()) {
                assert!(new.peak >= PEAK_FLOOR);
                if new.energy > old.peak {
                    assert_eq!(new.peak, new.energy);
                } else {
                    let decayed = old.peak * old.decay_rate();
                    assert_abs_diff_eq!(new.peak, decayed.max(PEAK_FLOOR), epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_pulse_boost_range_and_rate() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut pulses = 0;
        for _ in 0..2_000 {
            let mut bands = init_bands();
            for band in bands.iter_mut() {
                band.energy = 1.0;
            }
            if let Some(index) = apply_pulse(&mut bands, &mut rng) {
                pulses += 1;
                let boosted = bands[index].energy;
                assert!((1.3 - 1e-6..=1.8 + 1e-6).contains(&boosted));
                for (i, band) in bands.iter().enumerate() {
                    if i != index {
                        assert_eq!(band.energy, 1.0);
                    }
                    assert_eq!(band.peak, 0.0);
                }
            }
        }
        // 20% of 2000 draws, with plenty of slack.
        assert!((300..500).contains(&pulses), "pulses = {}", pulses);
    }

    #[test]
    fn test_pulse_on_empty_slice() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(apply_pulse(&mut [], &mut rng), None);
    }
}
