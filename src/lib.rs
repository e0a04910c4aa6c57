//! # Palette Picker
//!
//! A Rust crate for extracting a semantically labeled color palette from
//! decoded images.
//!
//! This library derives, from raw RGBA pixels:
//! - The dominant color (largest population)
//! - Six accents: vibrant, dark vibrant, light vibrant, muted, dark muted, light muted
//! - Title and body text colors legible against the dominant color
//!
//! Fields that cannot be derived take the caller's fallback colors, so an
//! extraction never yields a partial palette.
//!
//! ## Example
//!
//! ```rust
//! use palette_picker::{extract_palette, Config, PixelBuffer};
//!
//! let buffer = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
//! let palette = extract_palette(&buffer, &Config::default())?;
//! assert_eq!(palette.hex().dominant, "#FF0000");
//! # Ok::<(), palette_picker::ExtractionError>(())
//! ```

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod error;
pub mod constants;
pub mod config;
pub mod color;
pub mod extraction;
pub mod image_loader;
pub mod orchestrator;

pub use color::{contrast_ratio, rgb_to_hex, Rgb};
pub use config::{Config, ExtractorOptions, ResolvedConfig};
pub use error::{ExtractionError, Result};
pub use extraction::{PixelBuffer, Swatch, Target};
pub use image_loader::ImageSource;
pub use orchestrator::PaletteExtractor;

use color::conversion::hex_serde;
use color::ContrastResolver;
use extraction::{swatches_from_population_with_cancel, MedianCutQuantizer, Sampler, SwatchSelector};

/// Complete palette extracted from one image
///
/// Serializes as a flat JSON object of `#RRGGBB` strings with camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteResult {
    /// Most populous color
    #[serde(with = "hex_serde")]
    pub dominant: Rgb,
    #[serde(with = "hex_serde")]
    pub vibrant: Rgb,
    #[serde(with = "hex_serde")]
    pub dark_vibrant: Rgb,
    #[serde(with = "hex_serde")]
    pub light_vibrant: Rgb,
    #[serde(with = "hex_serde")]
    pub muted: Rgb,
    #[serde(with = "hex_serde")]
    pub dark_muted: Rgb,
    #[serde(with = "hex_serde")]
    pub light_muted: Rgb,
    /// Same as `dominant`; kept for consumers of the older field name
    #[serde(with = "hex_serde")]
    pub rgb: Rgb,
    #[serde(with = "hex_serde")]
    pub title_text_color: Rgb,
    #[serde(with = "hex_serde")]
    pub body_text_color: Rgb,
}

/// String form of a [`PaletteResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteHex {
    pub dominant: String,
    pub vibrant: String,
    pub dark_vibrant: String,
    pub light_vibrant: String,
    pub muted: String,
    pub dark_muted: String,
    pub light_muted: String,
    pub rgb: String,
    pub title_text_color: String,
    pub body_text_color: String,
}

impl PaletteResult {
    /// Palette made only of fallback colors
    pub fn fallback(config: &ResolvedConfig) -> Self {
        let color = config.fallback;
        let text = config.fallback_text_color;
        Self {
            dominant: color,
            vibrant: color,
            dark_vibrant: color,
            light_vibrant: color,
            muted: color,
            dark_muted: color,
            light_muted: color,
            rgb: color,
            title_text_color: text,
            body_text_color: text,
        }
    }

    /// Color chosen for an accent target
    pub fn accent(&self, target: Target) -> Rgb {
        match target {
            Target::Vibrant => self.vibrant,
            Target::DarkVibrant => self.dark_vibrant,
            Target::LightVibrant => self.light_vibrant,
            Target::Muted => self.muted,
            Target::DarkMuted => self.dark_muted,
            Target::LightMuted => self.light_muted,
        }
    }

    fn accent_mut(&mut self, target: Target) -> &mut Rgb {
        match target {
            Target::Vibrant => &mut self.vibrant,
            Target::DarkVibrant => &mut self.dark_vibrant,
            Target::LightVibrant => &mut self.light_vibrant,
            Target::Muted => &mut self.muted,
            Target::DarkMuted => &mut self.dark_muted,
            Target::LightMuted => &mut self.light_muted,
        }
    }

    /// Every field formatted as `#RRGGBB`
    pub fn hex(&self) -> PaletteHex {
        PaletteHex {
            dominant: rgb_to_hex(self.dominant),
            vibrant: rgb_to_hex(self.vibrant),
            dark_vibrant: rgb_to_hex(self.dark_vibrant),
            light_vibrant: rgb_to_hex(self.light_vibrant),
            muted: rgb_to_hex(self.muted),
            dark_muted: rgb_to_hex(self.dark_muted),
            light_muted: rgb_to_hex(self.light_muted),
            rgb: rgb_to_hex(self.rgb),
            title_text_color: rgb_to_hex(self.title_text_color),
            body_text_color: rgb_to_hex(self.body_text_color),
        }
    }
}

/// Extract a palette with default options
///
/// This is the main entry point. It samples the buffer, quantizes the
/// samples with median cut, assigns swatches to the accent targets and
/// resolves text colors against the dominant color.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidConfig` if either fallback color is not a
/// valid hex color. A buffer without usable pixels is not an error: every
/// field then takes its fallback.
pub fn extract_palette(buffer: &PixelBuffer, config: &Config) -> Result<PaletteResult> {
    extract_palette_with_options(buffer, config, &ExtractorOptions::default())
}

/// Extract a palette with custom options
///
/// `options.timeout_ms` is ignored here; time limits are applied by
/// [`PaletteExtractor`].
pub fn extract_palette_with_options(
    buffer: &PixelBuffer,
    config: &Config,
    options: &ExtractorOptions,
) -> Result<PaletteResult> {
    extract_palette_with_cancel(buffer, config, options, &CancellationToken::new())
}

/// Extract a palette, stopping early once `cancel` fires
///
/// The token is checked between stages and before every median-cut split,
/// so abandoned work releases its thread quickly.
///
/// # Errors
///
/// Returns `ExtractionError::Cancelled` if the token fired before the palette
/// was complete, plus the errors of [`extract_palette_with_options`].
pub fn extract_palette_with_cancel(
    buffer: &PixelBuffer,
    config: &Config,
    options: &ExtractorOptions,
    cancel: &CancellationToken,
) -> Result<PaletteResult> {
    let resolved = config.resolve()?;
    options.validate()?;
    ensure_active(cancel)?;

    let sampler = Sampler::with_params(options.max_samples, options.min_alpha, options.exclude_extremes);
    let population = sampler.sample(buffer);
    ensure_active(cancel)?;

    let quantizer = MedianCutQuantizer::with_max_colors(options.max_colors);
    let swatches = match swatches_from_population_with_cancel(&population, &quantizer, cancel) {
        Ok(swatches) => swatches,
        Err(err) if err.is_recoverable() => {
            debug!(error = %err, "Using fallback palette");
            return Ok(PaletteResult::fallback(&resolved));
        }
        Err(err) => return Err(err),
    };

    ensure_active(cancel)?;
    let selection = SwatchSelector::new().select(&swatches);
    let dominant = selection.dominant.map(|index| swatches[index].rgb());
    let text = ContrastResolver::with_thresholds(options.contrast)
        .resolve(dominant, resolved.fallback_text_color);

    let mut palette = PaletteResult::fallback(&resolved);
    if let Some(dominant) = dominant {
        palette.dominant = dominant;
        palette.rgb = dominant;
    }
    for (target, index) in selection.iter() {
        if let Some(index) = index {
            *palette.accent_mut(target) = swatches[index].rgb();
        }
    }
    palette.title_text_color = text.title;
    palette.body_text_color = text.body;

    debug!(
        swatches = swatches.len(),
        dominant = %rgb_to_hex(palette.dominant),
        "Extracted palette"
    );

    Ok(palette)
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(ExtractionError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_result_serialization() {
        let resolved = Config::new("#102030", "#fff").resolve().unwrap();
        let mut result = PaletteResult::fallback(&resolved);
        result.vibrant = Rgb::new(255, 0, 0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["dominant"], "#102030");
        assert_eq!(json["vibrant"], "#FF0000");
        assert_eq!(json["darkVibrant"], "#102030");
        assert_eq!(json["titleTextColor"], "#FFFFFF");
        assert_eq!(json["bodyTextColor"], "#FFFFFF");
        assert_eq!(json.as_object().unwrap().len(), 10);

        let deserialized: PaletteResult = serde_json::from_value(json).unwrap();
        assert_eq!(result, deserialized);
    }

    #[test]
    fn test_accent_accessor_matches_fields() {
        let resolved = Config::default().resolve().unwrap();
        let mut result = PaletteResult::fallback(&resolved);
        *result.accent_mut(Target::LightMuted) = Rgb::new(1, 2, 3);
        assert_eq!(result.light_muted, Rgb::new(1, 2, 3));
        assert_eq!(result.accent(Target::LightMuted), Rgb::new(1, 2, 3));
        assert_eq!(result.accent(Target::Muted), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_cancelled_token_stops_extraction() {
        let buffer = PixelBuffer::filled(4, 4, [255, 0, 0, 255]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = extract_palette_with_cancel(&buffer, &Config::default(), &ExtractorOptions::default(), &cancel);
        assert!(matches!(result, Err(ExtractionError::Cancelled)));

        // A live token changes nothing
        let live = extract_palette_with_cancel(
            &buffer,
            &Config::default(),
            &ExtractorOptions::default(),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(live, extract_palette(&buffer, &Config::default()).unwrap());
    }

    #[test]
    fn test_invalid_config_rejected_before_sampling() {
        let buffer = PixelBuffer::filled(2, 2, [1, 2, 3, 255]);
        let result = extract_palette(&buffer, &Config::new("#zzzzzz", "#fff"));
        assert!(matches!(result, Err(ExtractionError::InvalidConfig { .. })));
    }
}
