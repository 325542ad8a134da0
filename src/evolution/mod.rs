//! Evolutionary search over cookie recipes.
//!
//! # Overview
//!
//! The search system consists of:
//!
//! - **Scoring Tables** (`tables`): Ingredient embeddings and emotion alignment
//! - **Corpus** (`corpus`): Inspiring-set reader and reference quantities
//! - **Fitness** (`fitness`): Composite score blending flavor pairing, novelty,
//!   emotion alignment and flavor count
//! - **Search** (`search`): Proportionate selection, crossover and truncation
//! - **Result Archive** (`archive`): Export of the fittest recipes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cookie_evolution::evolution::{
//!     AlignmentTable, EmbeddingTable, EvolutionEngine, FitnessEvaluator, ReferenceCorpus,
//!     ResultArchive, load_corpus_dir,
//! };
//! use cookie_evolution::schema::{Emotion, EvolutionConfig, Lexicon};
//!
//! let config = EvolutionConfig::default();
//! let batches = load_corpus_dir("inspiring_set").unwrap();
//! let evaluator = FitnessEvaluator::new(
//!     config.fitness.clone(),
//!     Arc::new(EmbeddingTable::from_json_file("flavors/embeddings.json").unwrap()),
//!     Arc::new(AlignmentTable::from_json_file("flavors/alignment.json").unwrap()),
//!     Arc::new(ReferenceCorpus::from_batches(&batches).unwrap()),
//! );
//!
//! let mut engine = EvolutionEngine::new(config, Arc::new(Lexicon::default()), evaluator).unwrap();
//! engine.initialize(&batches, Emotion::Happy).unwrap();
//! let result = engine
//!     .run_with_callback(10, |progress| {
//!         println!("Generation {}: best fitness = {:.3}",
//!             progress.generation, progress.best_fitness);
//!     })
//!     .unwrap();
//!
//! println!("{}", result.best);
//! ResultArchive::new("fittest_recipes").unwrap().write_best(&result.best).unwrap();
//! ```

mod archive;
mod corpus;
mod fitness;
mod search;
mod tables;

pub use archive::ResultArchive;
pub use corpus::{CorpusError, RecipeBatch, ReferenceCorpus, load_corpus_dir};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
pub use search::{
    EvolutionEngine, EvolutionError, EvolutionHistory, EvolutionProgress, EvolutionResult,
    crossover, fittest_half, genome_distance, select_parents, selection_weights,
    truncate_fittest,
};
pub use tables::{AlignmentRow, AlignmentTable, EmbeddingTable, TableError};
