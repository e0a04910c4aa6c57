//! Palette extraction engine
//!
//! This module turns pixels into labeled swatches: sampling, median-cut
//! quantization, swatch construction and target selection. Every stage is a
//! pure function of its input.

pub mod sampler;
pub mod quantizer;
pub mod swatch;
pub mod selector;

pub use quantizer::{ColorCluster, MedianCutQuantizer};
pub use sampler::{PixelBuffer, PixelSample, SamplePopulation, Sampler};
pub use selector::{Band, ScoreWeights, Selection, SwatchSelector, Target, TargetProfile};
pub use swatch::{build_swatches, Swatch};

use tokio_util::sync::CancellationToken;

use crate::{ExtractionError, Result};

/// Quantize a population and build its swatches
///
/// # Errors
///
/// Returns `ExtractionError::EmptyInput` when the population carries no
/// weight, so callers fall back instead of quantizing nothing.
pub fn swatches_from_population(
    population: &SamplePopulation,
    quantizer: &MedianCutQuantizer,
) -> Result<Vec<Swatch>> {
    swatches_from_population_with_cancel(population, quantizer, &CancellationToken::new())
}

/// Same as [`swatches_from_population`], abandoning quantization once
/// `cancel` fires
pub fn swatches_from_population_with_cancel(
    population: &SamplePopulation,
    quantizer: &MedianCutQuantizer,
    cancel: &CancellationToken,
) -> Result<Vec<Swatch>> {
    if population.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }
    let clusters = quantizer.quantize_with_cancel(population, cancel)?;
    Ok(build_swatches(&clusters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_population_is_empty_input() {
        let result = swatches_from_population(&SamplePopulation::default(), &MedianCutQuantizer::new());
        assert!(matches!(result, Err(ExtractionError::EmptyInput)));
    }

    #[test]
    fn test_swatches_follow_cluster_order() {
        let population = SamplePopulation::from_samples(vec![
            PixelSample::new([0, 0, 255], 3),
            PixelSample::new([255, 0, 0], 7),
        ]);
        let swatches = swatches_from_population(&population, &MedianCutQuantizer::new()).unwrap();
        assert_eq!(swatches.len(), 2);
        assert_eq!(swatches[0].population(), 7);
        assert_eq!(swatches[1].population(), 3);
    }
}
