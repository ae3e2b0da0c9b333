use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb888};
use rand::Rng;
use spectrum_dsp::{
    apply_pulse, init_bands, process_dynamics, BandState, FilterBank, SampleBuffer, SampleSource,
    SignalSynthesizer, BAND_COUNT, SAMPLE_COUNT, SAMPLE_RATE_HZ,
};

#[cfg(feature = "logging")]
use defmt::info;
#[cfg(feature = "logging")]
use defmt_rtt as _;

use crate::config::*;
use crate::renderer::*;

/// Something the host can advance and draw once per animation tick.
pub trait Visualizer {
    /// Advance by `dt` seconds and draw exactly one frame into `target`.
    fn tick<D>(&mut self, target: &mut D, dt: f32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>;
}

/// The whole engine: sample source, filter bank, band dynamics and renderer,
/// plus the clock and band state that carry over between ticks.
///
/// Every tick runs source → filter bank → dynamics → pulse → render, with no
/// allocation.
pub struct SpectrumAnalyzer<R, S = SignalSynthesizer> {
    clock: f32,
    samples: SampleBuffer,
    bands: [BandState; BAND_COUNT],
    filter_bank: FilterBank,
    source: S,
    rng: R,
    renderer: SpectrumRenderer,
    step_counter: u32,
    log_counter: u8,
}

impl<R: Rng> SpectrumAnalyzer<R> {
    /// Analyzer on the default 32x8 layout, fed by the synthesizer.
    pub fn new(rng: R) -> Result<Self, LayoutError> {
        Self::with_source(SignalSynthesizer::new(), rng)
    }
}

impl<R: Rng, S: SampleSource> SpectrumAnalyzer<R, S> {
    pub fn with_source(source: S, rng: R) -> Result<Self, LayoutError> {
        Self::with_layout(Layout::default(), source, rng)
    }

    pub fn with_layout(layout: Layout, source: S, rng: R) -> Result<Self, LayoutError> {
        layout.validate()?;

        #[cfg(feature = "std")]
        std::println!(
            "SpectrumAnalyzer::new called with width: {}, height: {}, bands: {}",
            layout.width,
            layout.height,
            layout.band_count
        );
        #[cfg(feature = "logging")]
        info!(
            "SpectrumAnalyzer::new called with width: {}, height: {}, bands: {}",
            layout.width, layout.height, layout.band_count
        );

        Ok(Self {
            clock: 0.0,
            samples: [0.0; SAMPLE_COUNT],
            bands: init_bands(),
            filter_bank: FilterBank::new(SAMPLE_RATE_HZ),
            source,
            rng,
            renderer: SpectrumRenderer::new(layout),
            step_counter: 0,
            log_counter: 0,
        })
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn bands(&self) -> &[BandState; BAND_COUNT] {
        &self.bands
    }

    /// Samples analysed on the most recent tick.
    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn layout(&self) -> &Layout {
        self.renderer.layout()
    }

    pub fn step_counter(&self) -> u32 {
        self.step_counter
    }

    /// Access to the source, e.g. to push captured frames into a `PcmSource`.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Everything a tick does except drawing. Returns the band that received
    /// a random pulse, if any.
    pub fn advance(&mut self, dt: f32) -> Option<usize> {
        // The clock only moves forward.
        self.clock += dt.max(0.0);

        self.source.fill(self.clock, &mut self.rng, &mut self.samples);
        self.filter_bank.process(&self.samples, &mut self.bands);
        process_dynamics(&mut self.bands);
        let pulsed = apply_pulse(&mut self.bands, &mut self.rng);

        self.step_counter = self.step_counter.wrapping_add(1);
        self.log_counter = self.log_counter.wrapping_add(1);
        if self.log_counter >= LOG_INTERVAL_FRAMES {
            #[cfg(feature = "logging")]
            info!(
                "step {} clock {} low {} mid {} high {}",
                self.step_counter,
                self.clock,
                self.bands[0].energy,
                self.bands[BAND_COUNT / 2].energy,
                self.bands[BAND_COUNT - 1].energy
            );
            #[cfg(feature = "std")]
            std::println!(
                "step {} clock {:.3} energies {:?}",
                self.step_counter,
                self.clock,
                self.bands.map(|band| band.energy)
            );
            self.log_counter = 0;
        }

        pulsed
    }

    /// Draw the current state without advancing it.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        self.renderer.draw(target, &self.bands, self.clock)
    }
}

impl<R: Rng, S: SampleSource> Visualizer for SpectrumAnalyzer<R, S> {
    fn tick<D>(&mut self, target: &mut D, dt: f32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        self.advance(dt);
        self.render(target)
    }
}
