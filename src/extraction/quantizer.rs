//! Median-cut color quantization
//!
//! Clusters a weighted sample population into at most `max_colors`
//! representative colors:
//! - Identical colors are merged into a histogram first
//! - The most populous splittable box is cut along its longest channel
//! - Cuts land on the weighted median, not the midpoint
//! - Each cluster is represented by its population-weighted mean
//!
//! Algorithm tag: `algo-median-cut`

use std::cmp::Reverse;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::sampler::{PixelSample, SamplePopulation};
use crate::color::Rgb;
use crate::constants::quantization::{DEFAULT_MAX_COLORS, MIN_SPLIT_RANGE};
use crate::{ExtractionError, Result};

/// A quantized region of color space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCluster {
    /// Creation order; earlier clusters win population ties
    pub id: usize,
    /// Total weight of member samples
    pub population: u64,
    /// Per-channel lower bounds of member colors
    pub min: [u8; 3],
    /// Per-channel upper bounds of member colors
    pub max: [u8; 3],
    /// Population-weighted mean of member colors
    pub average: [u8; 3],
}

impl ColorCluster {
    /// Representative color
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.average[0], self.average[1], self.average[2])
    }
}

/// Box over a contiguous range of the shared histogram
#[derive(Debug, Clone)]
struct ColorBox {
    id: usize,
    lower: usize,
    upper: usize,
    population: u64,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn new(id: usize, colors: &[PixelSample], lower: usize, upper: usize) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        let mut population = 0u64;

        for sample in &colors[lower..upper] {
            for channel in 0..3 {
                min[channel] = min[channel].min(sample.rgb[channel]);
                max[channel] = max[channel].max(sample.rgb[channel]);
            }
            population += sample.weight;
        }

        Self {
            id,
            lower,
            upper,
            population,
            min,
            max,
        }
    }

    /// Channel with the widest range (red wins ties, then green)
    fn longest_axis(&self) -> (usize, u8) {
        (0..3)
            .map(|channel| (channel, self.max[channel] - self.min[channel]))
            .fold((0, 0), |best, current| if current.1 > best.1 { current } else { best })
    }

    fn is_splittable(&self, min_split_range: u8) -> bool {
        self.upper - self.lower >= 2 && self.longest_axis().1 > min_split_range
    }

    fn to_cluster(&self, colors: &[PixelSample]) -> ColorCluster {
        let mut sums = [0u64; 3];
        for sample in &colors[self.lower..self.upper] {
            for channel in 0..3 {
                sums[channel] += sample.rgb[channel] as u64 * sample.weight;
            }
        }

        let population = self.population.max(1);
        let average = sums.map(|sum| ((sum + population / 2) / population) as u8);

        ColorCluster {
            id: self.id,
            population: self.population,
            min: self.min,
            max: self.max,
            average,
        }
    }
}

/// Median-cut quantizer
#[derive(Debug, Clone)]
pub struct MedianCutQuantizer {
    max_colors: usize,
    min_split_range: u8,
}

impl Default for MedianCutQuantizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MedianCutQuantizer {
    /// Create a quantizer producing at most the default cluster count
    pub fn new() -> Self {
        Self::with_max_colors(DEFAULT_MAX_COLORS)
    }

    /// Create a quantizer producing at most `max_colors` clusters
    pub fn with_max_colors(max_colors: usize) -> Self {
        Self {
            max_colors,
            min_split_range: MIN_SPLIT_RANGE,
        }
    }

    /// Quantize a sample population
    ///
    /// # Returns
    ///
    /// Clusters with non-zero population, ordered by descending population
    /// and then by creation order. Empty input yields no clusters. Fewer
    /// than `max_colors` clusters are returned when the image lacks
    /// color diversity.
    pub fn quantize(&self, population: &SamplePopulation) -> Vec<ColorCluster> {
        // A token nobody holds never fires
        self.quantize_with_cancel(population, &CancellationToken::new())
            .unwrap_or_default()
    }

    /// Quantize, giving up as soon as `cancel` fires
    ///
    /// The token is checked before every split.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Cancelled` if the token fired.
    pub fn quantize_with_cancel(
        &self,
        population: &SamplePopulation,
        cancel: &CancellationToken,
    ) -> Result<Vec<ColorCluster>> {
        let mut colors = merge_identical(&population.samples);
        if colors.is_empty() || self.max_colors == 0 {
            return Ok(Vec::new());
        }

        let mut next_id = 0;
        let mut boxes = vec![ColorBox::new(next_id, &colors, 0, colors.len())];
        next_id += 1;

        while boxes.len() < self.max_colors {
            if cancel.is_cancelled() {
                debug!(boxes = boxes.len(), "Quantization cancelled");
                return Err(ExtractionError::Cancelled);
            }

            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_splittable(self.min_split_range))
                .max_by_key(|(_, b)| (b.population, Reverse(b.id)))
                .map(|(index, _)| index);

            let Some(index) = candidate else {
                break;
            };

            let parent = boxes.remove(index);
            let split = split_at_median(&mut colors, &parent);
            boxes.push(ColorBox::new(next_id, &colors, parent.lower, split));
            boxes.push(ColorBox::new(next_id + 1, &colors, split, parent.upper));
            next_id += 2;
        }

        let mut clusters: Vec<ColorCluster> = boxes
            .iter()
            .filter(|b| b.population > 0)
            .map(|b| b.to_cluster(&colors))
            .collect();
        clusters.sort_by_key(|c| (Reverse(c.population), c.id));

        debug!(
            distinct_colors = colors.len(),
            clusters = clusters.len(),
            max_colors = self.max_colors,
            "Quantized sample population"
        );

        Ok(clusters)
    }
}

/// Histogram of distinct colors, sorted by color for reproducible order
fn merge_identical(samples: &[PixelSample]) -> Vec<PixelSample> {
    let mut sorted: Vec<PixelSample> = samples.iter().copied().filter(|s| s.weight > 0).collect();
    sorted.sort_unstable_by_key(|s| s.rgb);

    let mut merged: Vec<PixelSample> = Vec::with_capacity(sorted.len());
    for sample in sorted {
        match merged.last_mut() {
            Some(last) if last.rgb == sample.rgb => last.weight += sample.weight,
            _ => merged.push(sample),
        }
    }
    merged
}

/// Sort the box's colors along its longest axis and return the cut index
///
/// The cut follows the first color at which the running weight reaches half
/// of the box population. Both halves always keep at least one color.
fn split_at_median(colors: &mut [PixelSample], vbox: &ColorBox) -> usize {
    let (axis, _) = vbox.longest_axis();
    let slice = &mut colors[vbox.lower..vbox.upper];
    slice.sort_unstable_by_key(|s| (s.rgb[axis], s.rgb));

    let mut cumulative = 0u64;
    let mut cut = slice.len() / 2;
    for (i, sample) in slice.iter().enumerate() {
        cumulative += sample.weight;
        if cumulative * 2 >= vbox.population {
            cut = i + 1;
            break;
        }
    }

    vbox.lower + cut.clamp(1, slice.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(samples: &[([u8; 3], u64)]) -> SamplePopulation {
        SamplePopulation::from_samples(
            samples
                .iter()
                .map(|&(rgb, weight)| PixelSample::new(rgb, weight))
                .collect(),
        )
    }

    #[test]
    fn test_empty_population() {
        let clusters = MedianCutQuantizer::new().quantize(&SamplePopulation::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_single_color_single_cluster() {
        let clusters = MedianCutQuantizer::new().quantize(&population(&[
            ([255, 0, 0], 40),
            ([255, 0, 0], 60),
        ]));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].population, 100);
        assert_eq!(clusters[0].average, [255, 0, 0]);
    }

    #[test]
    fn test_populations_sum_to_total() {
        let samples: Vec<([u8; 3], u64)> = (0..200u32)
            .map(|i| ([(i * 37 % 256) as u8, (i * 91 % 256) as u8, (i * 13 % 256) as u8], (i % 5 + 1) as u64))
            .collect();
        let input = population(&samples);

        let clusters = MedianCutQuantizer::new().quantize(&input);
        assert_eq!(clusters.len(), DEFAULT_MAX_COLORS);
        assert_eq!(clusters.iter().map(|c| c.population).sum::<u64>(), input.total);
        assert!(clusters.windows(2).all(|w| w[0].population >= w[1].population));
    }

    #[test]
    fn test_representative_is_weighted_mean_not_box_center() {
        let clusters = MedianCutQuantizer::with_max_colors(1).quantize(&population(&[
            ([0, 0, 0], 3),
            ([100, 0, 0], 1),
        ]));
        assert_eq!(clusters.len(), 1);
        // Box center would be 50; weighted mean is 25
        assert_eq!(clusters[0].average, [25, 0, 0]);
        assert_eq!(clusters[0].min, [0, 0, 0]);
        assert_eq!(clusters[0].max, [100, 0, 0]);
    }

    #[test]
    fn test_split_uses_weighted_median() {
        // Heavy weight on the dark end pushes the cut right after it
        let clusters = MedianCutQuantizer::with_max_colors(2).quantize(&population(&[
            ([0, 0, 0], 10),
            ([50, 0, 0], 1),
            ([100, 0, 0], 1),
            ([200, 0, 0], 1),
        ]));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].population, 10);
        assert_eq!(clusters[0].average, [0, 0, 0]);
        assert_eq!(clusters[1].population, 3);
        assert_eq!(clusters[1].average, [117, 0, 0]);
    }

    #[test]
    fn test_low_diversity_returns_fewer_clusters() {
        let clusters = MedianCutQuantizer::new().quantize(&population(&[
            ([10, 10, 10], 5),
            ([200, 30, 30], 5),
            ([30, 200, 30], 5),
        ]));
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn test_equal_populations_keep_creation_order() {
        let clusters = MedianCutQuantizer::new().quantize(&population(&[
            ([255, 255, 255], 50),
            ([0, 0, 0], 50),
        ]));
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].id < clusters[1].id);
        assert_eq!(clusters[0].average, [0, 0, 0]);
        assert_eq!(clusters[1].average, [255, 255, 255]);
    }

    #[test]
    fn test_quantization_is_deterministic() {
        let samples: Vec<([u8; 3], u64)> = (0..500u32)
            .map(|i| ([(i % 251) as u8, (i * 7 % 253) as u8, (i * 3 % 255) as u8], 1))
            .collect();
        let input = population(&samples);
        let quantizer = MedianCutQuantizer::with_max_colors(8);
        assert_eq!(quantizer.quantize(&input), quantizer.quantize(&input));
    }

    #[test]
    fn test_cancelled_token_stops_splitting() {
        let input = population(&[([0, 0, 0], 1), ([255, 255, 255], 1)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = MedianCutQuantizer::new().quantize_with_cancel(&input, &cancel);
        assert!(matches!(result, Err(ExtractionError::Cancelled)));

        // Nothing to split: a cancelled token is never consulted
        let single = population(&[([9, 9, 9], 4)]);
        let clusters = MedianCutQuantizer::with_max_colors(1)
            .quantize_with_cancel(&single, &cancel)
            .unwrap();
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn test_clusters_are_disjoint_boxes_of_members() {
        let input = population(&[
            ([10, 0, 0], 1),
            ([20, 0, 0], 1),
            ([200, 0, 0], 1),
            ([210, 0, 0], 1),
        ]);
        let clusters = MedianCutQuantizer::with_max_colors(2).quantize(&input);
        assert_eq!(clusters.len(), 2);
        let (a, b) = (&clusters[0], &clusters[1]);
        assert!(a.max[0] < b.min[0] || b.max[0] < a.min[0]);
    }
}
