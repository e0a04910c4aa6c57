//! Configuration structures for palette extraction.
//!
//! Two layers of configuration exist:
//!
//! - [`Config`]: caller-facing fallback colors, as hex strings. Validated
//!   eagerly by [`Config::resolve`] before any pixel is touched.
//! - [`ExtractorOptions`]: engine and orchestrator tunables (sample cap,
//!   cluster count, alpha threshold, contrast thresholds, timeout).
//!
//! Both serialize to JSON:
//!
//! ```no_run
//! use palette_picker::ExtractorOptions;
//! use std::path::Path;
//!
//! let options = ExtractorOptions::from_json_file(Path::new("extractor.json"))?;
//! options.to_json_file(Path::new("extractor.backup.json"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{hex_to_rgb, ContrastThresholds, Rgb};
use crate::constants::{defaults, performance, quantization, sampling};
use crate::{ExtractionError, Result};

/// Caller-supplied fallback colors.
///
/// Both values must be `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Color used for any palette field that cannot be derived
    pub fallback: String,

    /// Color used for title and body text when they cannot be derived
    pub fallback_text_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback: defaults::FALLBACK_COLOR.to_string(),
            fallback_text_color: defaults::FALLBACK_TEXT_COLOR.to_string(),
        }
    }
}

impl Config {
    pub fn new(fallback: impl Into<String>, fallback_text_color: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            fallback_text_color: fallback_text_color.into(),
        }
    }

    /// Parse both colors
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidConfig` naming the offending field.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        Ok(ResolvedConfig {
            fallback: hex_to_rgb("fallback", &self.fallback)?,
            fallback_text_color: hex_to_rgb("fallbackTextColor", &self.fallback_text_color)?,
        })
    }
}

/// Parsed form of [`Config`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub fallback: Rgb,
    pub fallback_text_color: Rgb,
}

/// Engine and orchestrator tunables.
///
/// Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    /// Upper bound on analyzed pixels; zero disables subsampling
    pub max_samples: usize,

    /// Maximum number of quantized clusters
    pub max_colors: usize,

    /// Pixels with lower alpha are ignored
    pub min_alpha: u8,

    /// Drop near-black and near-white pixels before quantization
    pub exclude_extremes: bool,

    /// Time budget for one extraction in milliseconds
    pub timeout_ms: u64,

    /// Minimum contrast ratios for text colors
    pub contrast: ContrastThresholds,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            max_samples: sampling::DEFAULT_MAX_SAMPLES,
            max_colors: quantization::DEFAULT_MAX_COLORS,
            min_alpha: sampling::DEFAULT_MIN_ALPHA,
            exclude_extremes: false,
            timeout_ms: performance::DEFAULT_TIMEOUT_MS,
            contrast: ContrastThresholds::default(),
        }
    }
}

impl ExtractorOptions {
    /// Check every tunable is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_colors == 0 {
            return Err(ExtractionError::invalid_config("max_colors", self.max_colors));
        }
        if self.timeout_ms == 0 {
            return Err(ExtractionError::invalid_config("timeout_ms", self.timeout_ms));
        }
        self.contrast.validate()
    }

    /// Time budget as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load options from JSON file
    pub fn from_json_file(path: &std::path::Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub fn to_json_file(&self, path: &std::path::Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
