//! Swatch selection against named target profiles
//!
//! Assigns swatches to the six accent targets:
//! - Swatches outside a profile's saturation or lightness band are ineligible
//! - Eligible swatches are scored on saturation fit, lightness fit, and
//!   population share
//! - Targets are filled in priority order and each swatch serves one target
//! - The dominant swatch is picked by population alone
//!
//! Algorithm tag: `algo-target-scoring`

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::swatch::Swatch;
use crate::constants::targets::{
    DARK_LIGHTNESS, DARK_MUTED_WEIGHTS, DARK_VIBRANT_WEIGHTS, DEFAULT_WEIGHTS, LIGHT_LIGHTNESS,
    LIGHT_MUTED_WEIGHTS, LIGHT_VIBRANT_WEIGHTS, MUTED_SATURATION, MUTED_WEIGHTS, NORMAL_LIGHTNESS,
    VIBRANT_SATURATION, VIBRANT_WEIGHTS,
};

/// Named accent targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Vibrant,
    DarkVibrant,
    LightVibrant,
    Muted,
    DarkMuted,
    LightMuted,
}

impl Target {
    /// Order in which targets claim swatches
    pub const PRIORITY: [Target; 6] = [
        Target::Vibrant,
        Target::DarkVibrant,
        Target::LightVibrant,
        Target::Muted,
        Target::DarkMuted,
        Target::LightMuted,
    ];

    /// Position of this target in [`Target::PRIORITY`]
    pub fn index(self) -> usize {
        match self {
            Target::Vibrant => 0,
            Target::DarkVibrant => 1,
            Target::LightVibrant => 2,
            Target::Muted => 3,
            Target::DarkMuted => 4,
            Target::LightMuted => 5,
        }
    }

    /// Externally visible field name
    pub fn name(self) -> &'static str {
        match self {
            Target::Vibrant => "vibrant",
            Target::DarkVibrant => "darkVibrant",
            Target::LightVibrant => "lightVibrant",
            Target::Muted => "muted",
            Target::DarkMuted => "darkMuted",
            Target::LightMuted => "lightMuted",
        }
    }

    /// Default profile for this target
    pub fn profile(self) -> TargetProfile {
        let (saturation, lightness, weights) = match self {
            Target::Vibrant => (VIBRANT_SATURATION, NORMAL_LIGHTNESS, VIBRANT_WEIGHTS),
            Target::DarkVibrant => (VIBRANT_SATURATION, DARK_LIGHTNESS, DARK_VIBRANT_WEIGHTS),
            Target::LightVibrant => (VIBRANT_SATURATION, LIGHT_LIGHTNESS, LIGHT_VIBRANT_WEIGHTS),
            Target::Muted => (MUTED_SATURATION, NORMAL_LIGHTNESS, MUTED_WEIGHTS),
            Target::DarkMuted => (MUTED_SATURATION, DARK_LIGHTNESS, DARK_MUTED_WEIGHTS),
            Target::LightMuted => (MUTED_SATURATION, LIGHT_LIGHTNESS, LIGHT_MUTED_WEIGHTS),
        };
        TargetProfile {
            target: self,
            saturation: Band::from(saturation),
            lightness: Band::from(lightness),
            weights: ScoreWeights::from(weights),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive acceptable range with a preferred value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub target: f32,
    pub max: f32,
}

impl Band {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Closeness to the preferred value, `1.0` on target
    pub fn closeness(&self, value: f32) -> f32 {
        (1.0 - (value - self.target).abs()).clamp(0.0, 1.0)
    }
}

impl From<[f32; 3]> for Band {
    fn from([min, target, max]: [f32; 3]) -> Self {
        Self { min, target, max }
    }
}

/// Relative importance of the three score terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub saturation: f32,
    pub lightness: f32,
    pub population: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::from(DEFAULT_WEIGHTS)
    }
}

impl From<[f32; 3]> for ScoreWeights {
    fn from([saturation, lightness, population]: [f32; 3]) -> Self {
        Self {
            saturation,
            lightness,
            population,
        }
    }
}

impl ScoreWeights {
    fn total(&self) -> f32 {
        self.saturation + self.lightness + self.population
    }
}

/// Saturation and lightness bands plus scoring weights for one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub target: Target,
    pub saturation: Band,
    pub lightness: Band,
    pub weights: ScoreWeights,
}

impl TargetProfile {
    /// Whether the swatch lies inside both bands
    pub fn accepts(&self, swatch: &Swatch) -> bool {
        self.saturation.contains(swatch.saturation()) && self.lightness.contains(swatch.lightness())
    }

    /// Weighted fit score in `[0, 1]`
    ///
    /// `total_population` is the population of all swatches combined.
    pub fn score(&self, swatch: &Swatch, total_population: u64) -> f32 {
        let share = if total_population == 0 {
            0.0
        } else {
            swatch.population() as f32 / total_population as f32
        };

        let weighted = self.weights.saturation * self.saturation.closeness(swatch.saturation())
            + self.weights.lightness * self.lightness.closeness(swatch.lightness())
            + self.weights.population * share;

        let total = self.weights.total();
        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }
}

/// Swatch indices chosen for the dominant color and each target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub dominant: Option<usize>,
    assignments: [Option<usize>; 6],
}

impl Selection {
    /// Index of the swatch assigned to `target`, if any
    pub fn get(&self, target: Target) -> Option<usize> {
        self.assignments[target.index()]
    }

    /// Iterate `(target, swatch index)` pairs in priority order
    pub fn iter(&self) -> impl Iterator<Item = (Target, Option<usize>)> + '_ {
        Target::PRIORITY.into_iter().map(move |t| (t, self.get(t)))
    }
}

/// Swatch selector
#[derive(Debug, Clone)]
pub struct SwatchSelector {
    profiles: Vec<TargetProfile>,
}

impl Default for SwatchSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SwatchSelector {
    /// Create a selector with the default profile table
    pub fn new() -> Self {
        Self {
            profiles: Target::PRIORITY.iter().map(|t| t.profile()).collect(),
        }
    }

    /// Create a selector with custom profiles
    ///
    /// Profiles are applied in [`Target::PRIORITY`] order regardless of the
    /// order given; targets without a profile are never assigned.
    pub fn with_profiles(mut profiles: Vec<TargetProfile>) -> Self {
        profiles.sort_by_key(|p| p.target.index());
        profiles.dedup_by_key(|p| p.target);
        Self { profiles }
    }

    pub fn profiles(&self) -> &[TargetProfile] {
        &self.profiles
    }

    /// Select the dominant swatch and one swatch per target
    ///
    /// On equal score or population the earlier swatch wins.
    pub fn select(&self, swatches: &[Swatch]) -> Selection {
        let total_population: u64 = swatches.iter().map(Swatch::population).sum();
        let mut selection = Selection {
            dominant: dominant_index(swatches),
            ..Selection::default()
        };
        let mut used = vec![false; swatches.len()];

        for profile in &self.profiles {
            let mut best: Option<(usize, f32)> = None;
            for (index, swatch) in swatches.iter().enumerate() {
                if used[index] || !profile.accepts(swatch) {
                    continue;
                }
                let score = profile.score(swatch, total_population);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((index, score));
                }
            }

            if let Some((index, score)) = best {
                used[index] = true;
                selection.assignments[profile.target.index()] = Some(index);
                debug!(profile = %profile.target, index, score, "Assigned swatch");
            } else {
                debug!(profile = %profile.target, "No eligible swatch");
            }
        }

        selection
    }
}

fn dominant_index(swatches: &[Swatch]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, swatch) in swatches.iter().enumerate() {
        if best.map_or(true, |b| swatch.population() > swatches[b].population()) {
            best = Some(index);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn swatch(r: u8, g: u8, b: u8, population: u64) -> Swatch {
        Swatch::new(Rgb::new(r, g, b), population)
    }

    #[test]
    fn test_default_profiles_in_priority_order() {
        let selector = SwatchSelector::new();
        let targets: Vec<Target> = selector.profiles().iter().map(|p| p.target).collect();
        assert_eq!(targets, Target::PRIORITY.to_vec());
    }

    #[test]
    fn test_pure_red_is_vibrant_only() {
        let red = swatch(255, 0, 0, 100);
        for target in Target::PRIORITY {
            assert_eq!(target.profile().accepts(&red), target == Target::Vibrant, "{}", target);
        }
    }

    #[test]
    fn test_boundary_saturation_fits_one_family() {
        // Saturation ~0.37 at lightness 0.5, just above the vibrant minimum
        let boundary = swatch(175, 80, 80, 10);
        let vibrant = Target::Vibrant.profile().accepts(&boundary);
        let muted = Target::Muted.profile().accepts(&boundary);
        assert!(vibrant);
        assert!(!muted);

        let selection = SwatchSelector::new().select(&[boundary]);
        assert_eq!(selection.get(Target::Vibrant), Some(0));
        assert_eq!(selection.get(Target::Muted), None);
    }

    #[test]
    fn test_no_swatch_fits_both_families() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(15) {
                let candidate = swatch(r, g, 128, 1);
                let families = [Target::Vibrant.profile(), Target::Muted.profile()]
                    .iter()
                    .filter(|p| p.saturation.contains(candidate.saturation()))
                    .count();
                assert!(families <= 1, "{:?} fits both families", (r, g, 128));
            }
        }
    }

    #[test]
    fn test_profiles_take_weights_from_table() {
        let profile = Target::DarkMuted.profile();
        assert_eq!(profile.weights, ScoreWeights::from(crate::constants::targets::DARK_MUTED_WEIGHTS));
        assert_eq!(ScoreWeights::default(), ScoreWeights::from(DEFAULT_WEIGHTS));
    }

    #[test]
    fn test_achromatic_swatches_never_qualify() {
        let selector = SwatchSelector::new();
        let selection = selector.select(&[swatch(0, 0, 0, 50), swatch(255, 255, 255, 50)]);
        assert_eq!(selection.dominant, Some(0));
        assert!(selection.iter().all(|(_, index)| index.is_none()));
    }

    #[test]
    fn test_dominant_ignores_eligibility() {
        let selection = SwatchSelector::new().select(&[
            swatch(128, 128, 128, 10),
            swatch(230, 30, 30, 90),
        ]);
        assert_eq!(selection.dominant, Some(1));
        assert_eq!(selection.get(Target::Vibrant), Some(1));
    }

    #[test]
    fn test_swatch_serves_one_target() {
        // Two vibrant mid-lightness reds: the second cannot fill dark/light targets
        let swatches = [swatch(220, 20, 20, 60), swatch(200, 40, 40, 40)];
        let selection = SwatchSelector::new().select(&swatches);
        assert_eq!(selection.get(Target::Vibrant), Some(0));
        assert_eq!(selection.get(Target::DarkVibrant), None);
        assert_eq!(selection.get(Target::LightVibrant), None);
    }

    #[test]
    fn test_six_distinct_swatches_fill_six_targets() {
        let swatches = [
            swatch(230, 25, 25, 10),   // vibrant
            swatch(120, 10, 10, 10),   // dark vibrant
            swatch(255, 150, 150, 10), // light vibrant
            swatch(150, 115, 105, 10), // muted
            swatch(70, 60, 55, 10),    // dark muted
            swatch(215, 200, 195, 10), // light muted
        ];
        let selection = SwatchSelector::new().select(&swatches);
        let mut assigned: Vec<usize> = selection.iter().filter_map(|(_, i)| i).collect();
        assert_eq!(assigned.len(), 6);
        assigned.sort_unstable();
        assigned.dedup();
        assert_eq!(assigned.len(), 6);

        assert_eq!(selection.get(Target::Vibrant), Some(0));
        assert_eq!(selection.get(Target::DarkVibrant), Some(1));
        assert_eq!(selection.get(Target::LightVibrant), Some(2));
        assert_eq!(selection.get(Target::Muted), Some(3));
        assert_eq!(selection.get(Target::DarkMuted), Some(4));
        assert_eq!(selection.get(Target::LightMuted), Some(5));
    }

    #[test]
    fn test_score_prefers_closer_fit() {
        let profile = Target::Vibrant.profile();
        let exact = swatch(255, 0, 0, 10);
        let weaker = swatch(180, 80, 80, 10);
        assert!(profile.score(&exact, 20) > profile.score(&weaker, 20));
        assert!(profile.score(&exact, 20) <= 1.0);
    }

    #[test]
    fn test_population_breaks_near_ties() {
        let profile = Target::Vibrant.profile();
        let small = swatch(255, 0, 0, 1);
        let large = swatch(255, 0, 0, 99);
        assert!(profile.score(&large, 100) > profile.score(&small, 100));
    }

    #[test]
    fn test_custom_profiles_are_sorted_and_deduplicated() {
        let selector = SwatchSelector::with_profiles(vec![
            Target::Muted.profile(),
            Target::Vibrant.profile(),
            Target::Muted.profile(),
        ]);
        let targets: Vec<Target> = selector.profiles().iter().map(|p| p.target).collect();
        assert_eq!(targets, vec![Target::Vibrant, Target::Muted]);
    }

    #[test]
    fn test_empty_swatches() {
        let selection = SwatchSelector::new().select(&[]);
        assert_eq!(selection, Selection::default());
    }
}
