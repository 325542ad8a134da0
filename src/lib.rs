//! Cookie Evolution - Genetic search for cookie recipes that match a mood.
//!
//! Recipes are evolved from an inspiring-set corpus with fitness-proportionate
//! selection, structured crossover over three gene groups (base ratios,
//! flavor ingredients, bake parameters) and a composite fitness blending
//! flavor pairing, novelty against the corpus and emotion alignment.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration and injected resources (emotions, lexicon)
//! - `genome`: Ingredients, gene groups and the `Recipe` individual
//! - `evolution`: Fitness, scoring tables, the engine and result export
//!
//! # Example
//!
//! ```rust,no_run
//! use cookie_evolution::{
//!     genome::Recipe,
//!     schema::{Emotion, Lexicon, MutationConfig},
//! };
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let lexicon = Lexicon::default();
//! let mut rng = StdRng::seed_from_u64(1);
//! let lines = ["-Base Ingredients", "250 g all-purpose flour", "200 g white sugar",
//!              "-Flavor Ingredients", "1 tsp cinnamon"];
//! let mut recipe = Recipe::from_lines(&lines, Emotion::Happy, None, &lexicon, &mut rng).unwrap();
//!
//! recipe.mutate(&MutationConfig::default(), &lexicon, &mut rng);
//! println!("{}", recipe);
//! ```

pub mod evolution;
pub mod genome;
pub mod schema;

// Re-export commonly used types
pub use evolution::{EvolutionEngine, FitnessEvaluator};
pub use genome::Recipe;
pub use schema::{Emotion, EvolutionConfig, Lexicon};
