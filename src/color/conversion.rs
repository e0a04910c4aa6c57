//! Color representation and conversion utilities
//!
//! Provides the conversions every extraction stage shares:
//! - Hex parsing (`#rrggbb` and `#rgb`) and formatting (`#RRGGBB`)
//! - sRGB to HSL with hue in degrees
//! - WCAG relative luminance from gamma-decoded channels
//! - Serde helpers that encode colors as hex strings

use palette::{FromColor, Hsl, LinSrgb, Srgb};
use crate::{ExtractionError, Result};

/// 8-bit sRGB color used throughout the crate
pub type Rgb = Srgb<u8>;

/// Hue, saturation, lightness triple
///
/// Hue is in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslTriple {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// Build an `Rgb` from a `[r, g, b]` array
pub fn rgb_from_array(channels: [u8; 3]) -> Rgb {
    Srgb::new(channels[0], channels[1], channels[2])
}

/// Format a color as an uppercase `#RRGGBB` string
///
/// # Examples
///
/// ```
/// use palette_picker::color::conversion::{rgb_to_hex, Rgb};
///
/// assert_eq!(rgb_to_hex(Rgb::new(255, 0, 128)), "#FF0080");
/// ```
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
}

/// Parse a hex color string
///
/// Accepts `#rrggbb` and the shorthand `#rgb`, case-insensitive. The leading
/// `#` is required.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidConfig` naming `parameter` if the string
/// is not a valid hex color.
pub fn hex_to_rgb(parameter: &str, hex: &str) -> Result<Rgb> {
    let invalid = || ExtractionError::invalid_config(parameter, hex);

    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid()),
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16).map_err(|_| invalid())
    };

    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Convert sRGB to HSL
///
/// Saturation is forced to zero for achromatic colors and at the lightness
/// extremes, where the chroma-over-range division is undefined.
pub fn rgb_to_hsl(rgb: Rgb) -> HslTriple {
    let hsl = Hsl::from_color(rgb.into_format::<f32>());

    let lightness = hsl.lightness.clamp(0.0, 1.0);
    let saturation = if lightness <= 0.0 || lightness >= 1.0 || !hsl.saturation.is_finite() {
        0.0
    } else {
        hsl.saturation.clamp(0.0, 1.0)
    };

    let hue = hsl.hue.into_positive_degrees();
    let hue = if hue.is_finite() && hue < 360.0 { hue } else { 0.0 };

    HslTriple {
        hue,
        saturation,
        lightness,
    }
}

/// Relative luminance of a color
///
/// Channels are linearized with the sRGB transfer function and weighted
/// with the Rec. 709 coefficients. Result is in `[0, 1]`.
pub fn relative_luminance(rgb: Rgb) -> f32 {
    let linear: LinSrgb<f32> = rgb.into_format::<f32>().into_linear();
    (0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue).clamp(0.0, 1.0)
}

/// Serde adapter storing an `Rgb` as a `#RRGGBB` string
pub mod hex_serde {
    use super::{hex_to_rgb, rgb_to_hex, Rgb};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(rgb: &Rgb, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&rgb_to_hex(*rgb))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Rgb, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        hex_to_rgb("color", &hex).map_err(serde::de::Error::custom)
    }
}
