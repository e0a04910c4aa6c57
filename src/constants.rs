//! Tuning constants and reference values for palette extraction
//!
//! Every empirically tuned number the engine relies on lives here, grouped
//! by the stage that consumes it, so the algorithms never embed magic values.

/// Pixel sampling limits
pub mod sampling {
    /// Default upper bound on analyzed pixels (a 112x112 thumbnail)
    pub const DEFAULT_MAX_SAMPLES: usize = 112 * 112;

    /// Pixels with alpha below this value are discarded
    pub const DEFAULT_MIN_ALPHA: u8 = 125;

    /// Lightness at or below which a sample counts as near-black
    pub const BLACK_MAX_LIGHTNESS: f32 = 0.05;

    /// Lightness at or above which a sample counts as near-white
    pub const WHITE_MIN_LIGHTNESS: f32 = 0.95;
}

/// Median-cut quantizer parameters
pub mod quantization {
    /// Default number of clusters to produce
    pub const DEFAULT_MAX_COLORS: usize = 16;

    /// A cluster is splittable only if some channel spans more than this
    pub const MIN_SPLIT_RANGE: u8 = 0;
}

/// Target profile table for swatch selection
///
/// Lightness bands are shared by the vibrant and muted families; saturation
/// bands distinguish the two families. Each band is `[min, target, max]`.
///
/// Neighbouring lightness bands overlap at their edges. A swatch in an
/// overlap goes to whichever target claims it first in priority order. The
/// saturation families never overlap: the muted maximum sits below the
/// vibrant minimum.
pub mod targets {
    /// Lightness band for the light variants
    pub const LIGHT_LIGHTNESS: [f32; 3] = [0.55, 0.74, 1.0];

    /// Lightness band for the normal variants
    pub const NORMAL_LIGHTNESS: [f32; 3] = [0.3, 0.5, 0.7];

    /// Lightness band for the dark variants
    pub const DARK_LIGHTNESS: [f32; 3] = [0.0, 0.26, 0.45];

    /// Saturation band for the vibrant family
    pub const VIBRANT_SATURATION: [f32; 3] = [0.35, 1.0, 1.0];

    /// Saturation band for the muted family
    ///
    /// The minimum sits above zero so achromatic swatches never qualify.
    pub const MUTED_SATURATION: [f32; 3] = [0.05, 0.3, 0.34];

    /// Score weights as `[saturation, lightness, population]`
    pub const DEFAULT_WEIGHTS: [f32; 3] = [0.24, 0.52, 0.24];

    pub const VIBRANT_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
    pub const DARK_VIBRANT_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
    pub const LIGHT_VIBRANT_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
    pub const MUTED_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
    pub const DARK_MUTED_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
    pub const LIGHT_MUTED_WEIGHTS: [f32; 3] = DEFAULT_WEIGHTS;
}

/// Text contrast parameters
pub mod contrast {
    /// Canonical light text color
    pub const LIGHT_TEXT: [u8; 3] = [0xFF, 0xFF, 0xFF];

    /// Canonical dark text color
    pub const DARK_TEXT: [u8; 3] = [0x00, 0x00, 0x00];

    /// Minimum contrast ratio for title text
    pub const MIN_TITLE_CONTRAST: f32 = 3.0;

    /// Minimum contrast ratio for body text
    pub const MIN_BODY_CONTRAST: f32 = 4.5;

    /// Offset added to both luminances in the contrast ratio
    pub const LUMINANCE_OFFSET: f32 = 0.05;

    /// Lowest contrast ratio the formula can produce
    pub const MIN_RATIO: f32 = 1.0;

    /// Highest contrast ratio the formula can produce (white on black)
    pub const MAX_RATIO: f32 = 21.0;
}

/// Orchestrator limits
pub mod performance {
    /// Default time budget for a single extraction
    pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
}

/// Default caller-facing colors
pub mod defaults {
    /// Color used when a palette field cannot be derived
    pub const FALLBACK_COLOR: &str = "#000000";

    /// Text color used when text colors cannot be derived
    pub const FALLBACK_TEXT_COLOR: &str = "#ffffff";
}
