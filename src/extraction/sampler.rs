//! Pixel sampling
//!
//! Reduces a decoded RGBA buffer to a bounded population of weighted samples:
//! - Deterministic stride subsampling when the buffer exceeds the sample cap
//! - Transparent pixels discarded below a minimum alpha
//! - Optional exclusion of near-black and near-white pixels
//! - Runs of identical adjacent pixels folded into one weighted sample
//!
//! Algorithm tag: `algo-stride-sampling`

use tracing::debug;

use crate::color::conversion::{rgb_from_array, rgb_to_hsl};
use crate::constants::sampling::{
    BLACK_MAX_LIGHTNESS, DEFAULT_MAX_SAMPLES, DEFAULT_MIN_ALPHA, WHITE_MIN_LIGHTNESS,
};
use crate::{ExtractionError, Result};

/// Decoded image pixels in row-major RGBA8 layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidBuffer` if `data` is not exactly
    /// `width * height * 4` bytes long.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ExtractionError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Buffer filled with a single RGBA color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the buffer
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Iterate pixels as `[r, g, b, a]`
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// One sampled color carrying the number of pixels it stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSample {
    pub rgb: [u8; 3],
    pub weight: u64,
}

impl PixelSample {
    pub fn new(rgb: [u8; 3], weight: u64) -> Self {
        Self { rgb, weight }
    }
}

/// Weighted samples kept after filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplePopulation {
    pub samples: Vec<PixelSample>,
    /// Sum of all sample weights
    pub total: u64,
}

impl SamplePopulation {
    /// Build a population from samples, computing the total weight
    pub fn from_samples(samples: Vec<PixelSample>) -> Self {
        let total = samples.iter().map(|s| s.weight).sum();
        Self { samples, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Pixel sampler
#[derive(Debug, Clone)]
pub struct Sampler {
    max_samples: usize,
    min_alpha: u8,
    exclude_extremes: bool,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Create a sampler with default parameters
    pub fn new() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            min_alpha: DEFAULT_MIN_ALPHA,
            exclude_extremes: false,
        }
    }

    /// Create a sampler with custom parameters
    ///
    /// A `max_samples` of zero disables subsampling.
    pub fn with_params(max_samples: usize, min_alpha: u8, exclude_extremes: bool) -> Self {
        Self {
            max_samples,
            min_alpha,
            exclude_extremes,
        }
    }

    /// Stride between visited pixels for a buffer of `pixel_count` pixels
    pub fn stride(&self, pixel_count: usize) -> usize {
        if self.max_samples == 0 || pixel_count <= self.max_samples {
            1
        } else {
            pixel_count.div_ceil(self.max_samples)
        }
    }

    /// Sample a pixel buffer
    ///
    /// Returns an empty population if the buffer has no pixels or every
    /// visited pixel was filtered out.
    pub fn sample(&self, buffer: &PixelBuffer) -> SamplePopulation {
        let pixel_count = buffer.pixel_count();
        if pixel_count == 0 {
            return SamplePopulation::default();
        }

        let stride = self.stride(pixel_count);
        let mut samples: Vec<PixelSample> = Vec::new();
        let mut total = 0u64;
        let mut visited = 0usize;

        for [r, g, b, a] in buffer.pixels().step_by(stride) {
            visited += 1;
            if a < self.min_alpha {
                continue;
            }
            let rgb = [r, g, b];
            if self.exclude_extremes && is_extreme(rgb) {
                continue;
            }

            match samples.last_mut() {
                Some(last) if last.rgb == rgb => last.weight += 1,
                _ => samples.push(PixelSample::new(rgb, 1)),
            }
            total += 1;
        }

        debug!(
            pixels = pixel_count,
            stride,
            visited,
            kept = total,
            runs = samples.len(),
            "Sampled pixel buffer"
        );

        SamplePopulation { samples, total }
    }
}

fn is_extreme(rgb: [u8; 3]) -> bool {
    let lightness = rgb_to_hsl(rgb_from_array(rgb)).lightness;
    lightness <= BLACK_MAX_LIGHTNESS || lightness >= WHITE_MIN_LIGHTNESS
}
