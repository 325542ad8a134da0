//! Composite fitness: flavor pairing, novelty against the reference corpus,
//! emotion alignment and flavor count.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::genome::Recipe;
use crate::schema::{Emotion, FitnessWeights};

use super::corpus::ReferenceCorpus;
use super::tables::{AlignmentTable, EmbeddingTable};

/// Raw and combined scores of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub flavor_pairing: f64,
    pub dissimilarity: f64,
    pub emotion: f64,
    /// Number of flavor ingredients.
    pub flavor_count: usize,
    /// Weighted sum of the four terms.
    pub total: f64,
}

/// Scores recipes against shared, read-only tables.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    weights: FitnessWeights,
    embeddings: Arc<EmbeddingTable>,
    alignment: Arc<AlignmentTable>,
    corpus: Arc<ReferenceCorpus>,
}

impl FitnessEvaluator {
    pub fn new(
        weights: FitnessWeights,
        embeddings: Arc<EmbeddingTable>,
        alignment: Arc<AlignmentTable>,
        corpus: Arc<ReferenceCorpus>,
    ) -> Self {
        Self {
            weights,
            embeddings,
            alignment,
            corpus,
        }
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Score a recipe. Missing table entries only shrink the affected term.
    pub fn evaluate(&self, recipe: &Recipe) -> FitnessBreakdown {
        let names = recipe.flavor().flavor_names();
        let flavor_pairing = self.flavor_pairing(&names);
        let dissimilarity = self.dissimilarity(recipe);
        let emotion = self.emotion_score(&names, recipe.emotion());
        let flavor_count = names.len();

        let w = &self.weights;
        let total = w.flavor_pairing * flavor_pairing
            + w.dissimilarity * dissimilarity
            + w.emotion * emotion
            + w.flavor_count * flavor_count as f64;

        debug!(
            "Fitness of '{}': flavor {:.2}, dissimilarity {:.2}, emotion {:.2}, length {:.2} -> {:.3}",
            recipe.name(),
            w.flavor_pairing * flavor_pairing,
            w.dissimilarity * dissimilarity,
            w.emotion * emotion,
            w.flavor_count * flavor_count as f64,
            total
        );

        FitnessBreakdown {
            flavor_pairing,
            dissimilarity,
            emotion,
            flavor_count,
            total,
        }
    }

    /// Mean embedding dot product over unordered pairs of distinct flavor
    /// names. A single flavor scores the configured constant.
    pub fn flavor_pairing(&self, names: &[&str]) -> f64 {
        match names.len() {
            0 => 0.0,
            1 => self.weights.single_flavor_pairing,
            n => {
                let mut sum = 0.0;
                let mut pairs = 0usize;
                for i in 0..n {
                    for j in (i + 1)..n {
                        if let Some(s) = self.embeddings.similarity(names[i], names[j]) {
                            sum += s;
                            pairs += 1;
                        }
                    }
                }
                if pairs == 0 { 0.0 } else { sum / pairs as f64 }
            }
        }
    }

    /// Mean normalized Euclidean distance between the recipe's quantity
    /// vector and each reference recipe, over the alignment vocabulary.
    pub fn dissimilarity(&self, recipe: &Recipe) -> f64 {
        if self.corpus.is_empty() || self.alignment.is_empty() {
            return 0.0;
        }

        let own: Vec<f64> = self
            .alignment
            .vocabulary()
            .map(|name| recipe.quantity_of(name).unwrap_or(0.0))
            .collect();

        let distances: Vec<f64> = self
            .corpus
            .recipes()
            .iter()
            .map(|reference| {
                self.alignment
                    .vocabulary()
                    .zip(&own)
                    .map(|(name, x)| {
                        let y = reference.get(name).copied().unwrap_or(0.0);
                        (x - y).powi(2)
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let max = distances.iter().copied().fold(0.0, f64::max);
        if max <= 0.0 {
            return 0.0;
        }
        distances.iter().map(|d| d / max).sum::<f64>() / distances.len() as f64
    }

    /// Mean alignment of the flavor names with `emotion`, over the names the
    /// table knows.
    pub fn emotion_score(&self, names: &[&str], emotion: Emotion) -> f64 {
        let scores: Vec<f64> = names
            .iter()
            .filter_map(|name| self.alignment.score(name, emotion))
            .collect();
        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::AlignmentRow;
    use crate::schema::Lexicon;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn row(name: &str, happy: f64, sad: f64) -> AlignmentRow {
        AlignmentRow {
            name: name.to_string(),
            emotions: BTreeMap::from([("happy".to_string(), happy), ("sad".to_string(), sad)]),
        }
    }

    fn evaluator(corpus: ReferenceCorpus) -> FitnessEvaluator {
        let embeddings = EmbeddingTable::new([
            ("cinnamon", vec![1.0, 0.0]),
            ("chocolate", vec![0.5, 0.5]),
            ("vanilla", vec![0.0, 1.0]),
        ])
        .unwrap();
        let alignment = AlignmentTable::new([
            row("chocolate", 0.9, 0.5),
            row("cinnamon", 0.3, 0.1),
            row("vanilla", 0.6, 0.2),
        ]);
        FitnessEvaluator::new(
            FitnessWeights::default(),
            Arc::new(embeddings),
            Arc::new(alignment),
            Arc::new(corpus),
        )
    }

    fn recipe(lines: &[&str], emotion: Emotion) -> Recipe {
        let mut rng = StdRng::seed_from_u64(0);
        Recipe::from_lines(lines, emotion, None, &Lexicon::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_no_flavors_scores_zero() {
        let evaluator = evaluator(ReferenceCorpus::default());
        let plain = recipe(&["200 g flour", "100 g white sugar"], Emotion::Happy);
        let breakdown = evaluator.evaluate(&plain);
        assert_eq!(breakdown.flavor_pairing, 0.0);
        assert_eq!(breakdown.emotion, 0.0);
        assert_eq!(breakdown.flavor_count, 0);
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_single_flavor_pairing() {
        let evaluator = evaluator(ReferenceCorpus::default());
        let single = recipe(&["200 g flour", "1 tsp cinnamon"], Emotion::Happy);
        let breakdown = evaluator.evaluate(&single);
        assert_eq!(breakdown.flavor_pairing, 0.2);
        assert!((breakdown.emotion - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_pairing_skips_missing_embeddings() {
        let evaluator = evaluator(ReferenceCorpus::default());
        // cinnamon.chocolate = 0.5, cinnamon.vanilla = 0, chocolate.vanilla = 0.5
        assert!((evaluator.flavor_pairing(&["cinnamon", "chocolate", "vanilla"]) - 1.0 / 3.0).abs() < 1e-12);
        assert!((evaluator.flavor_pairing(&["cinnamon", "chocolate", "saffron"]) - 0.5).abs() < 1e-12);
        assert_eq!(evaluator.flavor_pairing(&["saffron", "sumac"]), 0.0);
    }

    #[test]
    fn test_emotion_uses_run_emotion_column() {
        let evaluator = evaluator(ReferenceCorpus::default());
        let names = ["chocolate", "vanilla", "saffron"];
        assert!((evaluator.emotion_score(&names, Emotion::Happy) - 0.75).abs() < 1e-12);
        assert!((evaluator.emotion_score(&names, Emotion::Sad) - 0.35).abs() < 1e-12);
        assert_eq!(evaluator.emotion_score(&names, Emotion::Angry), 0.0);
    }

    #[test]
    fn test_dissimilarity_normalized_by_max() {
        let corpus = ReferenceCorpus::new(vec![
            BTreeMap::from([("chocolate".to_string(), 100.0)]),
            BTreeMap::from([("cinnamon".to_string(), 1.0)]),
        ]);
        let evaluator = evaluator(corpus);
        let candidate = recipe(&["200 g flour", "100 g chocolate"], Emotion::Happy);
        assert!((evaluator.dissimilarity(&candidate) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dissimilarity_empty_corpus() {
        let evaluator = evaluator(ReferenceCorpus::default());
        let candidate = recipe(&["100 g chocolate"], Emotion::Happy);
        assert_eq!(evaluator.dissimilarity(&candidate), 0.0);
    }

    #[test]
    fn test_total_is_weighted_sum() {
        let corpus = ReferenceCorpus::new(vec![BTreeMap::from([("vanilla".to_string(), 3.0)])]);
        let evaluator = evaluator(corpus);
        let mut candidate = recipe(
            &["200 g flour", "1 tsp cinnamon", "2 tsp vanilla"],
            Emotion::Happy,
        );
        let breakdown = candidate.set_fitness_val(&evaluator);
        let w = FitnessWeights::default();
        let expected = w.flavor_pairing * breakdown.flavor_pairing
            + w.dissimilarity * breakdown.dissimilarity
            + w.emotion * breakdown.emotion
            + w.flavor_count * 2.0;
        assert!((breakdown.total - expected).abs() < 1e-9);
        assert_eq!(candidate.fitness(), Some(breakdown.total));
        // Single reference, so the normalized distance is exactly 1.
        assert_eq!(breakdown.dissimilarity, 1.0);
    }
}
