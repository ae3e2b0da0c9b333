use spectrum_dsp::BAND_COUNT;
use thiserror::Error;

// --- Matrix Config ---
pub const CANVAS_WIDTH: u32 = 32;
pub const CANVAS_HEIGHT: u32 = 8;

// --- Bar Config ---
pub const BAND_STRIDE: u32 = 4; // Columns per band, gap included
pub const BAR_WIDTH: u32 = 3;
pub const INTENSITY_DIVISOR: f32 = 5.0; // Energy that fills a bar

// --- VU Meter Config ---
pub const VU_COLUMN: u32 = CANVAS_WIDTH - 1;
pub const VU_DIVISOR: f32 = 3.0; // Mean energy that fills the meter

// --- Logging ---
pub const LOG_INTERVAL_FRAMES: u8 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("layout has {got} bands but the analyzer produces {expected}")]
    BandCount { expected: usize, got: usize },
    #[error("bar width {bar_width} does not fit in a band stride of {band_stride}")]
    BarTooWide { bar_width: u32, band_stride: u32 },
    #[error("{band_count} bands of stride {band_stride} need {needed} columns, canvas has {width}")]
    BandsOverflow {
        band_count: usize,
        band_stride: u32,
        needed: u32,
        width: u32,
    },
    #[error("VU column {column} is outside a canvas {width} wide")]
    VuColumnOutOfRange { column: u32, width: u32 },
}

/// Geometry of the matrix and where bands and the VU meter go on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub band_count: usize,
    pub band_stride: u32,
    pub bar_width: u32,
    pub vu_column: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            band_count: BAND_COUNT,
            band_stride: BAND_STRIDE,
            bar_width: BAR_WIDTH,
            vu_column: VU_COLUMN,
        }
    }
}

impl Layout {
    /// Checked once when the analyzer is built; nothing is re-validated per
    /// frame.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.band_count != BAND_COUNT {
            return Err(LayoutError::BandCount {
                expected: BAND_COUNT,
                got: self.band_count,
            });
        }
        if self.bar_width == 0 || self.bar_width > self.band_stride {
            return Err(LayoutError::BarTooWide {
                bar_width: self.bar_width,
                band_stride: self.band_stride,
            });
        }
        // A product that does not fit in u32 cannot fit on the canvas either.
        let needed = (self.band_count as u32).checked_mul(self.band_stride);
        match needed {
            Some(needed) if needed <= self.width => {}
            _ => {
                return Err(LayoutError::BandsOverflow {
                    band_count: self.band_count,
                    band_stride: self.band_stride,
                    needed: needed.unwrap_or(u32::MAX),
                    width: self.width,
                })
            }
        }
        if self.vu_column >= self.width {
            return Err(LayoutError::VuColumnOutOfRange {
                column: self.vu_column,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Leftmost column of band `index`.
    pub fn band_origin(&self, index: usize) -> i32 {
        (index as u32 * self.band_stride) as i32
    }

    /// Grid row of the bottom of every bar.
    pub fn bottom_row(&self) -> i32 {
        self.height as i32 - 1
    }

    /// Number of discrete levels a bar or the meter can show.
    pub fn rows(&self) -> u32 {
        self.height
    }
}
