//! Legible text color resolution
//!
//! Picks title and body text colors for a background by comparing the WCAG
//! contrast ratio of a canonical light and a canonical dark text color.
//!
//! Algorithm tag: `algo-wcag-text-contrast`

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::conversion::{relative_luminance, rgb_from_array, Rgb};
use crate::constants::contrast::{
    DARK_TEXT, LIGHT_TEXT, LUMINANCE_OFFSET, MAX_RATIO, MIN_BODY_CONTRAST, MIN_RATIO,
    MIN_TITLE_CONTRAST,
};
use crate::{ExtractionError, Result};

/// Minimum contrast ratios text colors must reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastThresholds {
    /// Minimum ratio for title text
    pub title: f32,
    /// Minimum ratio for body text
    pub body: f32,
}

impl Default for ContrastThresholds {
    fn default() -> Self {
        Self {
            title: MIN_TITLE_CONTRAST,
            body: MIN_BODY_CONTRAST,
        }
    }
}

impl ContrastThresholds {
    /// Reject ratios the contrast formula can never produce
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("contrast.title", self.title), ("contrast.body", self.body)] {
            if !(MIN_RATIO..=MAX_RATIO).contains(&value) {
                return Err(ExtractionError::invalid_config(name, value));
            }
        }
        Ok(())
    }
}

/// Title and body text colors for one background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub title: Rgb,
    pub body: Rgb,
}

/// WCAG contrast ratio between two colors, in `[1, 21]`
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + LUMINANCE_OFFSET) / (darker + LUMINANCE_OFFSET)
}

/// Text contrast resolver
#[derive(Debug, Clone)]
pub struct ContrastResolver {
    thresholds: ContrastThresholds,
    light: Rgb,
    dark: Rgb,
}

impl Default for ContrastResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastResolver {
    /// Create a resolver with the default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(ContrastThresholds::default())
    }

    /// Create a resolver with custom thresholds
    pub fn with_thresholds(thresholds: ContrastThresholds) -> Self {
        Self {
            thresholds,
            light: rgb_from_array(LIGHT_TEXT),
            dark: rgb_from_array(DARK_TEXT),
        }
    }

    /// Resolve title and body colors against `background`
    ///
    /// Without a background (no dominant swatch), both fields are
    /// `fallback_text`.
    pub fn resolve(&self, background: Option<Rgb>, fallback_text: Rgb) -> TextColors {
        let Some(background) = background else {
            return TextColors {
                title: fallback_text,
                body: fallback_text,
            };
        };

        let colors = TextColors {
            title: self.pick(background, self.thresholds.title, fallback_text),
            body: self.pick(background, self.thresholds.body, fallback_text),
        };
        debug!(
            background = ?background,
            title = ?colors.title,
            body = ?colors.body,
            "Resolved text colors"
        );
        colors
    }

    /// Best canonical color meeting `min_ratio`, light winning ties
    fn pick(&self, background: Rgb, min_ratio: f32, fallback_text: Rgb) -> Rgb {
        let light_ratio = contrast_ratio(self.light, background);
        let dark_ratio = contrast_ratio(self.dark, background);

        match (light_ratio >= min_ratio, dark_ratio >= min_ratio) {
            (true, true) if dark_ratio > light_ratio => self.dark,
            (true, _) => self.light,
            (false, true) => self.dark,
            (false, false) => fallback_text,
        }
    }
}
