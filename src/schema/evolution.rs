//! Evolution configuration types.
//!
//! This module provides the tunable knobs of the recipe search: fitness
//! weights, mutation probabilities, parent selection policy and run length.

use serde::{Deserialize, Serialize};

/// Top-level configuration for a recipe evolution run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Fitness term weights.
    #[serde(default)]
    pub fitness: FitnessWeights,
    /// Mutation probabilities and limits.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Parent selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Random seed for reproducibility. `None` seeds from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Population settings.
///
/// The population size is not configured: it equals the number of corpus
/// recipes the run is initialized from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of generations to run.
    #[serde(default = "default_generations")]
    pub generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            generations: default_generations(),
        }
    }
}

fn default_generations() -> usize {
    10
}

/// Weights of the composite fitness terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Weight of the mean pairwise embedding similarity.
    #[serde(default = "default_flavor_pairing_weight")]
    pub flavor_pairing: f64,
    /// Weight of the novelty against the reference corpus.
    #[serde(default = "default_dissimilarity_weight")]
    pub dissimilarity: f64,
    /// Weight of the mean emotion alignment.
    #[serde(default = "default_emotion_weight")]
    pub emotion: f64,
    /// Weight applied per flavor ingredient.
    #[serde(default = "default_flavor_count_weight")]
    pub flavor_count: f64,
    /// Pairing score assigned to a recipe with exactly one flavor.
    #[serde(default = "default_single_flavor_pairing")]
    pub single_flavor_pairing: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            flavor_pairing: default_flavor_pairing_weight(),
            dissimilarity: default_dissimilarity_weight(),
            emotion: default_emotion_weight(),
            flavor_count: default_flavor_count_weight(),
            single_flavor_pairing: default_single_flavor_pairing(),
        }
    }
}

fn default_flavor_pairing_weight() -> f64 {
    4.0
}
fn default_dissimilarity_weight() -> f64 {
    10.0
}
fn default_emotion_weight() -> f64 {
    200.0
}
fn default_flavor_count_weight() -> f64 {
    0.75
}
fn default_single_flavor_pairing() -> f64 {
    0.2
}

/// Mutation settings for the three gene groups.
///
/// The flavor group is always mutated; the base and bake groups are each
/// mutated with an independent draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability of also mutating the base composition.
    #[serde(default = "default_group_probability")]
    pub base_probability: f64,
    /// Probability of also mutating the bake parameters.
    #[serde(default = "default_group_probability")]
    pub bake_probability: f64,
    /// Upper bound on total mix-in mass, in grams.
    #[serde(default = "default_mix_in_cap")]
    pub mix_in_cap_grams: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            base_probability: default_group_probability(),
            bake_probability: default_group_probability(),
            mix_in_cap_grams: default_mix_in_cap(),
        }
    }
}

fn default_group_probability() -> f64 {
    0.3
}
fn default_mix_in_cap() -> f64 {
    250.0
}

/// Parent selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// What to do when fitness-proportionate weights are unusable.
    #[serde(default)]
    pub zero_sum_policy: ZeroFitnessPolicy,
}

/// Policy applied when the fitness sum is not positive or any fitness is
/// negative, which makes proportionate probabilities undefined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ZeroFitnessPolicy {
    /// Shift every score so the minimum becomes a small positive value.
    #[default]
    ShiftPositive,
    /// Ignore fitness and sample parents uniformly.
    Uniform,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Invalid fitness weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid probability: {0}")]
    InvalidProbability(String),
    #[error("Mix-in cap must be positive, got {0}")]
    InvalidMixInCap(f64),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let weights = [
            ("flavor_pairing", self.fitness.flavor_pairing),
            ("dissimilarity", self.fitness.dissimilarity),
            ("emotion", self.fitness.emotion),
            ("flavor_count", self.fitness.flavor_count),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EvolutionConfigError::InvalidWeight(format!(
                    "{} weight {} must be non-negative",
                    name, weight
                )));
            }
        }

        let check_probability = |p: f64, name: &str| {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(EvolutionConfigError::InvalidProbability(format!(
                    "{} ({}) must be within [0, 1]",
                    name, p
                )))
            }
        };
        check_probability(self.mutation.base_probability, "base_probability")?;
        check_probability(self.mutation.bake_probability, "bake_probability")?;

        let cap = self.mutation.mix_in_cap_grams;
        if cap.is_nan() || cap <= 0.0 {
            return Err(EvolutionConfigError::InvalidMixInCap(cap));
        }

        Ok(())
    }
}
