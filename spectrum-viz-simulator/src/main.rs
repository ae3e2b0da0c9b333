//! Host-side runner for the spectrum analyzer.
//!
//! Drives the engine on an in-memory 32x8 display at a fixed tick rate and
//! saves scaled PNG snapshots of the matrix.

use std::{fs, path::PathBuf, time::Instant};

use clap::Parser;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use rand::{rngs::SmallRng, SeedableRng};
use spectrum_viz::{
    config::{CANVAS_HEIGHT, CANVAS_WIDTH},
    renderer::bar_height,
    SpectrumAnalyzer, Visualizer,
};

#[derive(Parser, Debug)]
#[command(name = "spectrum-viz-simulator")]
#[command(about = "Render the LED-matrix spectrum analyzer to PNG frames")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Tick rate the host scheduler would run at
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Save every Nth frame
    #[arg(long, default_value_t = 10)]
    every: u32,

    /// RNG seed for noise and pulses
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Pixel scale of the saved images
    #[arg(long, default_value_t = 16)]
    scale: u32,

    /// Output directory
    #[arg(long, default_value = "frames")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let dt = 1.0 / args.fps.max(1.0);
    let every = args.every.max(1);

    println!("Spectrum Analyzer Simulator");
    println!("  Frames: {} at {} fps", args.frames, args.fps);
    println!("  Seed: {}", args.seed);
    println!("  Output: {}", args.output.display());

    fs::create_dir_all(&args.output)?;

    let mut display: SimulatorDisplay<Rgb888> =
        SimulatorDisplay::new(Size::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    let output_settings = OutputSettingsBuilder::new()
        .scale(args.scale.max(1))
        .pixel_spacing(1)
        .build();

    let mut analyzer = SpectrumAnalyzer::new(SmallRng::seed_from_u64(args.seed))?;
    let start = Instant::now();
    let mut saved = 0u32;

    for frame in 0..args.frames {
        analyzer.tick(&mut display, dt)?;

        if frame % every == 0 {
            let heights = analyzer
                .bands()
                .map(|band| bar_height(band.energy, CANVAS_HEIGHT));
            println!("frame {:>5}  clock {:>7.3}s  bars {:?}", frame, analyzer.clock(), heights);

            let path = args.output.join(format!("frame_{:05}.png", frame));
            display
                .to_rgb_output_image(&output_settings)
                .save_png(&path)?;
            saved += 1;
        }
    }

    let elapsed = start.elapsed();
    println!("  Saved: {} images", saved);
    println!(
        "  Time: {:.2}ms ({:.1}us per tick)",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1.0e6 / args.frames.max(1) as f64
    );

    Ok(())
}
