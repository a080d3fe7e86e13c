//! Value → colour mapping

use ratatui::style::Color;

/// Hue of the smallest transactions (cyan)
const BASE_HUE: f64 = 180.0;

/// Degrees of hue added per BTC
const HUE_PER_BTC: f64 = 4.0;

/// Largest hue shift; 45 BTC and above wrap round to red
const MAX_HUE_SHIFT: f64 = 180.0;

/// Hue in degrees for a transaction value
pub fn bubble_hue(value: f64) -> f64 {
    BASE_HUE + (value * HUE_PER_BTC).min(MAX_HUE_SHIFT)
}

/// Fill colour of a bubble: `hsl(180 + min(value × 4, 180), 100%, 50%)`
pub fn bubble_color(value: f64) -> Color {
    let (r, g, b) = hsl_to_rgb(bubble_hue(value), 1.0, 0.5);
    Color::Rgb(r, g, b)
}

/// Convert HSL (hue in degrees, saturation/lightness in `[0, 1]`) to RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
