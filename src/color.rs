use image::Rgb;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Histogram styling
// ---------------------------------------------------------------------------

/// Colours used to draw a histogram panel.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub background: Rgb<u8>,
    pub bar_fill: Rgb<u8>,
    pub bar_edge: Rgb<u8>,
    pub axis: Rgb<u8>,
    pub grid: Rgb<u8>,
}

impl Default for Style {
    /// Sky-blue bars with black edges on white.
    fn default() -> Self {
        let sky_blue = Srgb::new(135u8, 206, 235);
        Style {
            background: Rgb([255, 255, 255]),
            bar_fill: to_rgb(sky_blue),
            bar_edge: Rgb([0, 0, 0]),
            axis: Rgb([0, 0, 0]),
            grid: to_rgb(tint(sky_blue, 0.94)),
        }
    }
}

/// Same hue and saturation as `color`, at the given HSL lightness.
pub fn tint(color: Srgb<u8>, lightness: f32) -> Srgb<u8> {
    let mut hsl: Hsl = color.into_format::<f32>().into_color();
    hsl.lightness = lightness.clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();
    rgb.into_format::<u8>()
}

fn to_rgb(color: Srgb<u8>) -> Rgb<u8> {
    Rgb([color.red, color.green, color.blue])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_keeps_hue_and_lightens() {
        let light = tint(Srgb::new(135u8, 206, 235), 0.94);
        assert!(light.red > 135 && light.green > 206 && light.blue > 235);
        assert!(light.blue >= light.green && light.green >= light.red);
    }

    #[test]
    fn default_style_is_sky_blue_on_white() {
        let style = Style::default();
        assert_eq!(style.bar_fill, Rgb([135, 206, 235]));
        assert_eq!(style.background, Rgb([255, 255, 255]));
        assert_eq!(style.bar_edge, Rgb([0, 0, 0]));
    }
}
