//! The fixed preference features and their weight derivation.

use std::collections::HashMap;

use crate::config::GeneratorConfig;
use crate::generator::GenerateError;

/// The six preference dimensions of the scoring model.
///
/// The first five are scored per session; Busyness Level is applied during
/// selection, where day occupancy is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    IdealInstructor,
    UnitImportance,
    DaysOff,
    PreferredStartTime,
    PreferredEndTime,
    BusynessLevel,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::IdealInstructor,
        Feature::UnitImportance,
        Feature::DaysOff,
        Feature::PreferredStartTime,
        Feature::PreferredEndTime,
        Feature::BusynessLevel,
    ];

    /// Canonical name, as used in profile maps and contribution breakdowns.
    pub fn name(self) -> &'static str {
        match self {
            Feature::IdealInstructor => "Ideal Instructor",
            Feature::UnitImportance => "Unit Importance",
            Feature::DaysOff => "Days Off",
            Feature::PreferredStartTime => "Preferred Start Time",
            Feature::PreferredEndTime => "Preferred End Time",
            Feature::BusynessLevel => "Busyness Level",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-feature weights derived from one preference profile.
#[derive(Clone, Debug)]
pub struct FeatureWeights {
    weights: [f64; 6],
    critical: [bool; 6],
}

impl FeatureWeights {
    /// Derive weights from the profile's feature ranking.
    ///
    /// `weight(f) = (rank(f) / max_rank) * base_multiplier`, multiplied by
    /// `critical_multiplier` when the feature is marked critical. Every
    /// feature must appear in both profile maps, and at least one rank must
    /// be positive.
    pub fn derive(
        preference_order: &HashMap<String, i32>,
        critical_features: &HashMap<String, bool>,
        config: &GeneratorConfig,
    ) -> Result<Self, GenerateError> {
        let mut ranks = [0i32; 6];
        let mut critical = [false; 6];
        for feature in Feature::ALL {
            ranks[feature.index()] = *preference_order.get(feature.name()).ok_or(
                GenerateError::IncompleteProfile {
                    feature: feature.name(),
                    map: "preference_order",
                },
            )?;
            critical[feature.index()] = *critical_features.get(feature.name()).ok_or(
                GenerateError::IncompleteProfile {
                    feature: feature.name(),
                    map: "critical_features",
                },
            )?;
        }

        let max_rank = ranks.iter().copied().max().unwrap_or(0);
        if max_rank < 1 {
            return Err(GenerateError::InvalidProfile(
                "preference_order needs at least one positive rank".to_string(),
            ));
        }

        let mut weights = [0.0f64; 6];
        for feature in Feature::ALL {
            let mut weight =
                ranks[feature.index()] as f64 / max_rank as f64 * config.base_multiplier;
            if critical[feature.index()] {
                weight *= config.critical_multiplier;
            }
            weights[feature.index()] = weight;
        }

        Ok(Self { weights, critical })
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }

    pub fn is_critical(&self, feature: Feature) -> bool {
        self.critical[feature.index()]
    }
}
