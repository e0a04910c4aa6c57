//! Swatch records derived from quantized clusters

use super::quantizer::ColorCluster;
use crate::color::conversion::{rgb_to_hsl, HslTriple};
use crate::color::Rgb;

/// A representative color with its population and HSL coordinates
///
/// HSL values are computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    rgb: Rgb,
    population: u64,
    hsl: HslTriple,
}

impl Swatch {
    pub fn new(rgb: Rgb, population: u64) -> Self {
        Self {
            rgb,
            population,
            hsl: rgb_to_hsl(rgb),
        }
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    /// Hue in degrees, `[0, 360)`
    pub fn hue(&self) -> f32 {
        self.hsl.hue
    }

    pub fn saturation(&self) -> f32 {
        self.hsl.saturation
    }

    pub fn lightness(&self) -> f32 {
        self.hsl.lightness
    }

    pub fn hsl(&self) -> HslTriple {
        self.hsl
    }
}

impl From<&ColorCluster> for Swatch {
    fn from(cluster: &ColorCluster) -> Self {
        Swatch::new(cluster.rgb(), cluster.population)
    }
}

/// Convert clusters to swatches, preserving order
pub fn build_swatches(clusters: &[ColorCluster]) -> Vec<Swatch> {
    clusters.iter().map(Swatch::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_from_cluster() {
        let cluster = ColorCluster {
            id: 3,
            population: 42,
            min: [0, 0, 0],
            max: [255, 0, 0],
            average: [255, 0, 0],
        };
        let swatch = Swatch::from(&cluster);
        assert_eq!(swatch.rgb(), Rgb::new(255, 0, 0));
        assert_eq!(swatch.population(), 42);
        assert!((swatch.saturation() - 1.0).abs() < 0.001);
        assert!((swatch.lightness() - 0.5).abs() < 0.001);
        assert!(swatch.hue().abs() < 0.01);
    }

    #[test]
    fn test_achromatic_swatch() {
        let swatch = Swatch::new(Rgb::new(255, 255, 255), 1);
        assert_eq!(swatch.saturation(), 0.0);
        assert!((0.0..360.0).contains(&swatch.hue()));
    }
}
