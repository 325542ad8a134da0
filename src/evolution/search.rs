//! Generational search: proportionate selection, structured crossover,
//! mutation and elitist truncation.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{info, warn};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::genome::{FlavorComposition, Recipe};
use crate::schema::{Emotion, EvolutionConfig, EvolutionConfigError, Lexicon, ZeroFitnessPolicy};

use super::corpus::{CorpusError, RecipeBatch};
use super::fitness::FitnessEvaluator;

/// Offset added to shifted weights so the worst individual stays selectable.
const SHIFT_EPSILON: f64 = 1e-6;

/// Engine misuse and population construction errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Population needs at least 2 recipes, got {0}")]
    PopulationTooSmall(usize),
    #[error("Evolution engine has no population; call initialize first")]
    NotInitialized,
    #[error(transparent)]
    Recipe(#[from] CorpusError),
    #[error("Invalid evolution config: {0}")]
    Config(#[from] EvolutionConfigError),
}

/// Per-generation statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    pub best_fitness: Vec<f64>,
    pub avg_fitness: Vec<f64>,
    pub fitness_std: Vec<f64>,
    /// Mean pairwise flavor-set distance.
    pub diversity: Vec<f64>,
}

/// Progress reported after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub generation: usize,
    pub total_generations: usize,
    pub population_size: usize,
    pub best_fitness: f64,
    pub avg_fitness: f64,
    pub diversity: f64,
    pub best_name: String,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Fittest individual of the final population.
    pub best: Recipe,
    /// Final population, fittest first.
    pub population: Vec<Recipe>,
    pub generations: usize,
    pub history: EvolutionHistory,
}

/// Sort fittest first. Unscored recipes count as 0.
fn sort_by_fitness(population: &mut [Recipe]) {
    population.sort_by(|a, b| b.get_fitness_val().total_cmp(&a.get_fitness_val()));
}

/// Keep the `k` fittest recipes, fittest first.
pub fn truncate_fittest(mut population: Vec<Recipe>, k: usize) -> Vec<Recipe> {
    sort_by_fitness(&mut population);
    population.truncate(k);
    population
}

/// Keep the fittest ⌈n/2⌉ recipes, fittest first.
pub fn fittest_half(population: Vec<Recipe>) -> Vec<Recipe> {
    let keep = population.len().div_ceil(2);
    truncate_fittest(population, keep)
}

/// Selection weights for fitness-proportionate sampling. The second value
/// is true when the fitness values could not be used directly and `policy`
/// was applied.
pub fn selection_weights(fitness: &[f64], policy: ZeroFitnessPolicy) -> (Vec<f64>, bool) {
    let sum: f64 = fitness.iter().sum();
    let usable = sum > 0.0 && sum.is_finite() && fitness.iter().all(|f| *f >= 0.0);
    if usable {
        return (fitness.to_vec(), false);
    }

    let weights = match policy {
        ZeroFitnessPolicy::Uniform => vec![1.0; fitness.len()],
        ZeroFitnessPolicy::ShiftPositive => {
            let min = fitness
                .iter()
                .copied()
                .filter(|f| f.is_finite())
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() {
                fitness
                    .iter()
                    .map(|f| if f.is_finite() { f - min + SHIFT_EPSILON } else { SHIFT_EPSILON })
                    .collect()
            } else {
                vec![1.0; fitness.len()]
            }
        }
    };
    (weights, true)
}

fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    WeightedIndex::new(weights.iter().copied())
        .ok()
        .map(|dist| dist.sample(rng))
}

/// Draw two distinct parent indices. The second draw excludes the first;
/// if the remaining weights are all zero it is uniform over the rest.
///
/// `weights` must hold at least two entries.
pub fn select_parents<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> (usize, usize) {
    let n = weights.len();
    let first = sample_index(weights, rng).unwrap_or_else(|| rng.gen_range(0..n));

    let mut rest = weights.to_vec();
    rest[first] = 0.0;
    let second = sample_index(&rest, rng).unwrap_or_else(|| {
        let pick = rng.gen_range(0..n - 1);
        if pick >= first { pick + 1 } else { pick }
    });
    (first, second)
}

/// Offspring of two parents: base and bake groups are each inherited whole
/// from an independently chosen parent; flavors are spliced at a pivot
/// drawn from `[0, min(len_a, len_b))`.
pub fn crossover<R: Rng + ?Sized>(
    first: &Recipe,
    second: &Recipe,
    lexicon: &Lexicon,
    rng: &mut R,
) -> Recipe {
    let base_parent = if rng.gen_bool(0.5) { first } else { second };
    let bake_parent = if rng.gen_bool(0.5) { first } else { second };

    let shortest = first.flavor().len().min(second.flavor().len());
    let pivot = if shortest == 0 {
        0
    } else {
        rng.gen_range(0..shortest)
    };
    let flavor = FlavorComposition::splice(first.flavor(), second.flavor(), pivot, lexicon);

    Recipe::from_parts(
        first.emotion(),
        base_parent.base().clone(),
        flavor,
        *bake_parent.bake(),
        lexicon,
        rng,
    )
}

/// Jaccard distance between the flavor-name sets of two recipes.
pub fn genome_distance(a: &Recipe, b: &Recipe) -> f64 {
    let names_a: BTreeSet<&str> = a.flavor().flavor_names().into_iter().collect();
    let names_b: BTreeSet<&str> = b.flavor().flavor_names().into_iter().collect();
    let union = names_a.union(&names_b).count();
    if union == 0 {
        return 0.0;
    }
    let shared = names_a.intersection(&names_b).count();
    1.0 - shared as f64 / union as f64
}

/// Evolution engine that owns the population and runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    lexicon: Arc<Lexicon>,
    evaluator: FitnessEvaluator,
    rng: StdRng,
    population: Vec<Recipe>,
    history: EvolutionHistory,
    generation: usize,
}

impl EvolutionEngine {
    /// Create an engine from a validated config. Seeds from
    /// `config.random_seed` when set, otherwise from entropy.
    pub fn new(
        config: EvolutionConfig,
        lexicon: Arc<Lexicon>,
        evaluator: FitnessEvaluator,
    ) -> Result<Self, EvolutionError> {
        config.validate()?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            lexicon,
            evaluator,
            rng,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
        })
    }

    /// Build one recipe per batch and score them.
    pub fn initialize(
        &mut self,
        batches: &[RecipeBatch],
        emotion: Emotion,
    ) -> Result<(), EvolutionError> {
        let mut recipes = Vec::with_capacity(batches.len());
        for batch in batches {
            recipes.push(batch.to_recipe(emotion, None, &self.lexicon, &mut self.rng)?);
        }
        self.set_population(recipes)
    }

    /// Replace the population with already-built recipes and score them.
    pub fn set_population(&mut self, recipes: Vec<Recipe>) -> Result<(), EvolutionError> {
        if recipes.len() < 2 {
            return Err(EvolutionError::PopulationTooSmall(recipes.len()));
        }
        self.population = recipes;
        self.generation = 0;
        self.history = EvolutionHistory::default();
        self.evaluate_population();
        self.record_history();
        info!(
            "Initialized population of {} for {}",
            self.population.len(),
            self.population[0].emotion()
        );
        Ok(())
    }

    /// Score every individual whose cached fitness is stale.
    pub fn evaluate_population(&mut self) {
        for recipe in &mut self.population {
            if recipe.fitness().is_none() {
                recipe.set_fitness_val(&self.evaluator);
            }
        }
    }

    /// Run one generation: select, cross over, mutate, score, truncate.
    pub fn run_generation(&mut self) -> Result<(), EvolutionError> {
        if self.population.is_empty() {
            return Err(EvolutionError::NotInitialized);
        }
        self.evaluate_population();

        let n = self.population.len();
        let fitness: Vec<f64> = self.population.iter().map(Recipe::get_fitness_val).collect();
        let (weights, fallback) =
            selection_weights(&fitness, self.config.selection.zero_sum_policy);
        if fallback {
            warn!(
                "Generation {}: fitness sum not positive, selecting with {:?}",
                self.generation + 1,
                self.config.selection.zero_sum_policy
            );
        }

        let mut offspring = Vec::with_capacity(n);
        for _ in 0..n {
            let (i, j) = select_parents(&weights, &mut self.rng);
            let mut child = crossover(
                &self.population[i],
                &self.population[j],
                &self.lexicon,
                &mut self.rng,
            );
            child.mutate(&self.config.mutation, &self.lexicon, &mut self.rng);
            child.set_fitness_val(&self.evaluator);
            offspring.push(child);
        }

        let current = std::mem::take(&mut self.population);
        let kept = n.div_ceil(2);
        let mut next = truncate_fittest(current, kept);
        next.extend(truncate_fittest(offspring, n - kept));
        sort_by_fitness(&mut next);
        self.population = next;
        self.generation += 1;
        self.record_history();

        info!(
            "Generation {}: best {:.3}, average {:.3}",
            self.generation,
            self.history.best_fitness.last().copied().unwrap_or(0.0),
            self.history.avg_fitness.last().copied().unwrap_or(0.0)
        );
        Ok(())
    }

    fn record_history(&mut self) {
        let n = self.population.len().max(1) as f64;
        let fitness: Vec<f64> = self.population.iter().map(Recipe::get_fitness_val).collect();
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = fitness.iter().sum::<f64>() / n;
        let variance = fitness.iter().map(|f| (f - avg).powi(2)).sum::<f64>() / n;

        self.history.best_fitness.push(best);
        self.history.avg_fitness.push(avg);
        self.history.fitness_std.push(variance.sqrt());
        self.history.diversity.push(self.compute_diversity());
    }

    fn compute_diversity(&self) -> f64 {
        let n = self.population.len();
        if n < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut count = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += genome_distance(&self.population[i], &self.population[j]);
                count += 1;
            }
        }
        total / count as f64
    }

    pub fn population(&self) -> &[Recipe] {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Fittest individual of the current population.
    pub fn fittest(&self) -> Option<&Recipe> {
        self.population
            .iter()
            .max_by(|a, b| a.get_fitness_val().total_cmp(&b.get_fitness_val()))
    }

    /// Current progress.
    pub fn progress(&self, total_generations: usize) -> EvolutionProgress {
        EvolutionProgress {
            generation: self.generation,
            total_generations,
            population_size: self.population.len(),
            best_fitness: self.history.best_fitness.last().copied().unwrap_or(0.0),
            avg_fitness: self.history.avg_fitness.last().copied().unwrap_or(0.0),
            diversity: self.history.diversity.last().copied().unwrap_or(0.0),
            best_name: self
                .fittest()
                .map(|r| r.name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Run `generations` generations, reporting progress after each.
    pub fn run_with_callback<F>(
        &mut self,
        generations: usize,
        mut callback: F,
    ) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&EvolutionProgress),
    {
        if self.population.is_empty() {
            return Err(EvolutionError::NotInitialized);
        }
        callback(&self.progress(generations));
        for _ in 0..generations {
            self.run_generation()?;
            callback(&self.progress(generations));
        }

        let mut population = self.population.clone();
        sort_by_fitness(&mut population);
        let best = population[0].clone();
        Ok(EvolutionResult {
            best,
            population,
            generations: self.generation,
            history: self.history.clone(),
        })
    }

    /// Run `generations` generations and return the fittest recipe.
    pub fn run_for_generations(
        &mut self,
        generations: usize,
    ) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(generations, |_| {})
    }

    /// Run the configured number of generations.
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_for_generations(self.config.population.generations)
    }
}
