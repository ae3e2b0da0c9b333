#![no_std]

//! Picture side of the LED-matrix spectrum analyzer: colors, the 32x8
//! rasterizer and the per-tick orchestration on top of `spectrum-dsp`.

#[cfg(feature = "std")]
extern crate std;

pub mod color_strategy;
pub mod config;
pub mod renderer;
pub mod spectrum_analyzer;

pub use color_strategy::hsv_to_rgb;
pub use config::{Layout, LayoutError};
pub use renderer::{Renderer, SpectrumRenderer};
pub use spectrum_analyzer::{SpectrumAnalyzer, Visualizer};
