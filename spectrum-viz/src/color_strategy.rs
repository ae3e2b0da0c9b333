use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
#[allow(unused_imports)]
use micromath::F32Ext;

pub const BAR_BASE_HUE: f32 = 210.0;
pub const BAR_HUE_STEP: f32 = 25.0;
pub const BAR_BASE_SATURATION: f32 = 0.8;

pub const PEAK_HUE: f32 = 60.0;
pub const BLINK_RATE: f32 = 20.0;
pub const BLINK_FLOOR: f32 = 0.7;

/// Meter level where the green→yellow segment hands over to yellow→red.
pub const VU_KNEE: f32 = 0.6;

pub const PEAK_GLOW_DIVISOR: u8 = 4;
pub const BOTTOM_GLOW_DIVISOR: u8 = 3;

/// Per-channel factors of the bar's vertical gradient at full row factor.
pub const GRADIENT_RED: f32 = 0.8;
pub const GRADIENT_GREEN: f32 = 1.0;
pub const GRADIENT_BLUE: f32 = 1.2;

pub struct ColorContext {
    pub band_index: usize,
    /// Normalized level in `[0, 1]`: bar intensity or meter height.
    pub intensity: f32,
    pub clock: f32,
}

pub trait ColorStrategy {
    fn get_color(&self, context: &ColorContext) -> Rgb888;
}

fn to_channel(component: f32) -> u8 {
    (component * 255.0).round().clamp(0.0, 255.0) as u8
}

/// HSV to 8-bit RGB. Hue wraps into `[0, 360)`, saturation and value are
/// clamped to `[0, 1]`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb888 {
    let mut h = h % 360.0;
    if h < 0.0 {
        h += 360.0;
    }
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let scaled = h / 60.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb888::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Scale each channel by its own factor, saturating at 255.
pub fn scale_channels(color: Rgb888, red: f32, green: f32, blue: f32) -> Rgb888 {
    Rgb888::new(
        (color.r() as f32 * red) as u8,
        (color.g() as f32 * green) as u8,
        (color.b() as f32 * blue) as u8,
    )
}

/// Bar color darkened for row `y` of a bar `height` rows tall; the top row
/// keeps the full color.
pub fn gradient_row(color: Rgb888, y: u32, height: u32) -> Rgb888 {
    let row_factor = (y + 1) as f32 / height as f32;
    scale_channels(
        color,
        row_factor * GRADIENT_RED,
        row_factor * GRADIENT_GREEN,
        row_factor * GRADIENT_BLUE,
    )
}

pub fn dim(color: Rgb888, divisor: u8) -> Rgb888 {
    Rgb888::new(color.r() / divisor, color.g() / divisor, color.b() / divisor)
}

/// Blue-leaning hue that shifts per band; louder bands are more saturated and
/// brighter.
pub struct BandHueColor;
impl ColorStrategy for BandHueColor {
    fn get_color(&self, context: &ColorContext) -> Rgb888 {
        let hue = BAR_BASE_HUE + context.band_index as f32 * BAR_HUE_STEP;
        let saturation = BAR_BASE_SATURATION + context.intensity * (1.0 - BAR_BASE_SATURATION);
        hsv_to_rgb(hue, saturation, context.intensity)
    }
}

/// Bright yellow whose green channel pulses with the clock.
pub struct PeakBlinkColor;
impl ColorStrategy for PeakBlinkColor {
    fn get_color(&self, context: &ColorContext) -> Rgb888 {
        let base = hsv_to_rgb(PEAK_HUE, 1.0, 1.0);
        let blink = ((context.clock * BLINK_RATE).sin() + 1.0) * 0.5;
        let green = base.g() as f32 * (BLINK_FLOOR + (1.0 - BLINK_FLOOR) * blink);
        Rgb888::new(base.r(), green as u8, base.b())
    }
}

/// Green→yellow up to `VU_KNEE` (inclusive), yellow→red above it.
pub struct VuRampColor;
impl ColorStrategy for VuRampColor {
    fn get_color(&self, context: &ColorContext) -> Rgb888 {
        let level = context.intensity.clamp(0.0, 1.0);
        if level <= VU_KNEE {
            let t = level / VU_KNEE;
            Rgb888::new((t * 255.0).round() as u8, 255, 0)
        } else {
            let t = (level - VU_KNEE) / (1.0 - VU_KNEE);
            Rgb888::new(255, ((1.0 - t) * 255.0).round() as u8, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vu(level: f32) -> Rgb888 {
        VuRampColor.get_color(&ColorContext {
            band_index: 0,
            intensity: level,
            clock: 0.0,
        })
    }

    #[test]
    fn test_hsv_primary_sectors() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb888::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(60.0, 1.0, 1.0), Rgb888::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb888::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb888::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(300.0, 1.0, 1.0), Rgb888::new(255, 0, 255));
    }

    #[test]
    fn test_hsv_hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(420.0, 1.0, 1.0), hsv_to_rgb(60.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-120.0, 1.0, 1.0), hsv_to_rgb(240.0, 1.0, 1.0));
    }

    #[test]
    fn test_hsv_zero_saturation_is_gray() {
        for h in [0.0, 45.0, 210.0, 385.0, -30.0] {
            for v in [0.0, 0.25, 0.5, 1.0] {
                let expected = (v * 255.0f32).round() as u8;
                assert_eq!(hsv_to_rgb(h, 0.0, v), Rgb888::new(expected, expected, expected));
            }
        }
    }

    #[test]
    fn test_hsv_zero_value_is_black() {
        for h in [0.0, 90.0, 285.0, 359.9] {
            for s in [0.0, 0.5, 1.0] {
                assert_eq!(hsv_to_rgb(h, s, 0.0), Rgb888::BLACK);
            }
        }
    }

    #[test]
    fn test_hsv_clamps_inputs() {
        assert_eq!(hsv_to_rgb(0.0, 2.0, 5.0), Rgb888::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(0.0, -1.0, 1.0), Rgb888::WHITE);
    }

    #[test]
    fn test_band_hue_full_intensity() {
        let color = BandHueColor.get_color(&ColorContext {
            band_index: 3,
            intensity: 1.0,
            clock: 0.0,
        });
        // Hue 285: sector 4 with f = 0.75.
        assert_eq!(color, Rgb888::new(191, 0, 255));
    }

    #[test]
    fn test_gradient_row_saturates_blue() {
        let color = gradient_row(Rgb888::new(191, 100, 255), 7, 8);
        assert_eq!(color, Rgb888::new(152, 100, 255));
    }

    #[test]
    fn test_dim() {
        assert_eq!(dim(Rgb888::new(191, 0, 255), 3), Rgb888::new(63, 0, 85));
    }

    #[test]
    fn test_peak_color_stays_yellow() {
        for clock in [0.0, 0.1, 0.2, 1.7] {
            let color = PeakBlinkColor.get_color(&ColorContext {
                band_index: 0,
                intensity: 1.0,
                clock,
            });
            assert_eq!(color.r(), 255);
            assert_eq!(color.b(), 0);
            assert!(color.g() >= 178, "green {} at clock {}", color.g(), clock);
        }
    }

    #[test]
    fn test_vu_ramp_segments() {
        assert_eq!(vu(0.0), Rgb888::new(0, 255, 0));
        assert_eq!(vu(0.15), Rgb888::new(64, 255, 0));
        // The knee belongs to the lower segment.
        assert_eq!(vu(VU_KNEE), Rgb888::new(255, 255, 0));
        assert_eq!(vu(0.9), Rgb888::new(255, 64, 0));
        assert_eq!(vu(1.0), Rgb888::new(255, 0, 0));
    }

    #[test]
    fn test_vu_knee_tolerates_float_error() {
        // A single band at 14.4 averaged over 8 bands, scaled by 3.
        assert_eq!(vu(14.4f32 / 8.0 / 3.0), Rgb888::new(255, 255, 0));
        assert_eq!(vu(0.59999996), Rgb888::new(255, 255, 0));
        assert_eq!(vu(0.60000004), Rgb888::new(255, 255, 0));
    }
}
