use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Sequential colormap for field intensity
// ---------------------------------------------------------------------------

/// Map a normalized intensity in `[0, 1]` to a colour on a blue→red ramp.
///
/// Low values sit at hue 240° (deep blue), high values at 0° (red), with
/// fixed saturation and lightness so adjacent contour bands stay distinct.
pub fn intensity_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0) as f32;
    let hsl = Hsl::new(240.0 * (1.0 - t), 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour for band `i` of `n` contour bands.
pub fn band_color(i: usize, n: usize) -> RGBColor {
    if n <= 1 {
        return intensity_color(0.0);
    }
    intensity_color(i as f64 / (n - 1) as f64)
}
