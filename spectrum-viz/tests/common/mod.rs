#![allow(dead_code)]

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

pub const WIDTH: usize = 32;
pub const HEIGHT: usize = 8;

/// 32x8 canvas that remembers what was written since the last clear and
/// counts writes that fall outside it.
pub struct RecordingCanvas {
    pixels: [[Option<Rgb888>; WIDTH]; HEIGHT],
    pub writes: usize,
    pub out_of_bounds: usize,
    pub clears: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            pixels: [[None; WIDTH]; HEIGHT],
            writes: 0,
            out_of_bounds: 0,
            clears: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        self.pixels[y][x]
    }

    pub fn written(&self) -> usize {
        self.pixels.iter().flatten().filter(|p| p.is_some()).count()
    }

    /// Written pixels in column `x`, top row first.
    pub fn column(&self, x: usize) -> [Option<Rgb888>; HEIGHT] {
        core::array::from_fn(|y| self.pixels[y][x])
    }
}

impl OriginDimensions for RecordingCanvas {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for RecordingCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= WIDTH as i32 || point.y >= HEIGHT as i32 {
                self.out_of_bounds += 1;
                continue;
            }
            self.pixels[point.y as usize][point.x as usize] = Some(color);
            self.writes += 1;
        }
        Ok(())
    }

    fn clear(&mut self, _color: Self::Color) -> Result<(), Self::Error> {
        self.pixels = [[None; WIDTH]; HEIGHT];
        self.clears += 1;
        Ok(())
    }
}
