use core::cmp;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, Point, Size},
    pixelcolor::{Rgb888, RgbColor},
    primitives::{ContainsPoint, Rectangle},
    Drawable, Pixel,
};
#[allow(unused_imports)]
use micromath::F32Ext;
use spectrum_dsp::BandState;

use crate::color_strategy::*;
use crate::config::*;

pub trait Renderer {
    fn draw<D: DrawTarget<Color = Rgb888>>(
        &self,
        target: &mut D,
        bands: &[BandState],
        clock: f32,
    ) -> Result<(), D::Error>;
}

/// `value / divisor`, capped at 1.
pub fn normalize(value: f32, divisor: f32) -> f32 {
    (value / divisor).min(1.0)
}

/// Discretize a normalized level into `0..=rows` lit rows.
pub fn level_height(level: f32, rows: u32) -> u32 {
    let height = (level * rows as f32).floor() as i32;
    cmp::max(0, cmp::min(rows as i32, height)) as u32
}

/// Bar height for a raw band energy.
pub fn bar_height(energy: f32, rows: u32) -> u32 {
    level_height(normalize(energy, INTENSITY_DIVISOR), rows)
}

/// Mean band energy scaled to the meter, in `[0, 1]`.
pub fn overall_volume(bands: &[BandState]) -> f32 {
    if bands.is_empty() {
        return 0.0;
    }
    let sum: f32 = bands.iter().map(|band| band.energy).sum();
    normalize(sum / bands.len() as f32, VU_DIVISOR).max(0.0)
}

/// Write one pixel if it lies on the target, otherwise do nothing.
fn put_pixel<D>(target: &mut D, x: i32, y: i32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let point = Point::new(x, y);
    if target.bounding_box().contains(point) {
        Pixel(point, color).draw(target)?;
    }
    Ok(())
}

/// Horizontal run of `width` pixels starting at `(x, y)`, clipped to the
/// target.
fn fill_row<D>(target: &mut D, x: i32, y: i32, width: u32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let row = Rectangle::new(Point::new(x, y), Size::new(width, 1))
        .intersection(&target.bounding_box());
    if row.size.width == 0 || row.size.height == 0 {
        return Ok(());
    }
    target.fill_solid(&row, color)
}

/// Draws gradient bars with peak markers and glow for each band, then the VU
/// column.
pub struct SpectrumRenderer {
    layout: Layout,
    bar_color: BandHueColor,
    peak_color: PeakBlinkColor,
    vu_color: VuRampColor,
}

impl Renderer for SpectrumRenderer {
    fn draw<D>(&self, target: &mut D, bands: &[BandState], clock: f32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        target.clear(Rgb888::BLACK)?;

        for (index, band) in bands.iter().enumerate().take(self.layout.band_count) {
            self.draw_band(target, index, band, clock)?;
        }

        self.draw_vu_meter(target, overall_volume(bands))
    }
}

impl SpectrumRenderer {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            bar_color: BandHueColor,
            peak_color: PeakBlinkColor,
            vu_color: VuRampColor,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn bar_color(&self, band_index: usize, intensity: f32) -> Rgb888 {
        self.bar_color.get_color(&ColorContext {
            band_index,
            intensity,
            clock: 0.0,
        })
    }

    pub fn peak_color(&self, clock: f32) -> Rgb888 {
        self.peak_color.get_color(&ColorContext {
            band_index: 0,
            intensity: 1.0,
            clock,
        })
    }

    pub fn vu_color(&self, level: f32) -> Rgb888 {
        self.vu_color.get_color(&ColorContext {
            band_index: 0,
            intensity: level,
            clock: 0.0,
        })
    }

    /// Bar, peak marker with its glow, and bottom glow for one band. Later
    /// writes win where they overlap.
    pub fn draw_band<D>(
        &self,
        target: &mut D,
        index: usize,
        band: &BandState,
        clock: f32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let rows = self.layout.rows();
        let bottom = self.layout.bottom_row();
        let x = self.layout.band_origin(index);
        let width = self.layout.bar_width;

        let intensity = normalize(band.energy, INTENSITY_DIVISOR);
        let height = level_height(intensity, rows);
        let peak_height = bar_height(band.peak, rows);
        let base = self.bar_color(index, intensity);

        for y in 0..height {
            fill_row(target, x, bottom - y as i32, width, gradient_row(base, y, height))?;
        }

        if peak_height > 0 {
            let peak = self.peak_color(clock);
            // A full-height peak lands one row above the grid and is dropped.
            fill_row(target, x, bottom - peak_height as i32, width, peak)?;
            if peak_height < rows - 1 {
                let glow = dim(peak, PEAK_GLOW_DIVISOR);
                fill_row(target, x, bottom - (peak_height as i32 + 1), width, glow)?;
            }
        }

        if height > 0 {
            fill_row(target, x, bottom, width, dim(base, BOTTOM_GLOW_DIVISOR))?;
        }

        Ok(())
    }

    /// Single column meter; each row is colored by its level on the volume
    /// scale, so the top row sits at `volume`.
    pub fn draw_vu_meter<D>(&self, target: &mut D, volume: f32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let volume = volume.clamp(0.0, 1.0);
        let height = level_height(volume, self.layout.rows());
        let x = self.layout.vu_column as i32;
        let bottom = self.layout.bottom_row();

        for y in 0..height {
            let level = volume * ((y + 1) as f32 / height as f32);
            put_pixel(target, x, bottom - y as i32, self.vu_color(level))?;
        }
        Ok(())
    }
}
