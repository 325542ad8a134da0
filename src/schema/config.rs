//! Run configuration: where the inputs live and where results go.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Emotion, EvolutionConfig, EvolutionConfigError};

fn default_output_dir() -> PathBuf {
    PathBuf::from("fittest_recipes")
}

fn default_top_k() -> usize {
    3
}

/// Top-level run configuration read by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding one recipe file per corpus entry.
    pub corpus_dir: PathBuf,
    /// JSON file of ingredient embedding vectors.
    pub embeddings: PathBuf,
    /// JSON file of ingredient-by-emotion alignment values.
    pub alignment: PathBuf,
    /// Optional JSON lexicon replacing the built-in word lists.
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
    /// Directory the ranked results are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Target emotion; may be overridden on the command line.
    #[serde(default)]
    pub emotion: Option<Emotion>,
    /// Number of ranked recipes written at the end of a run.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Evolution parameters.
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("inspiring_set"),
            embeddings: PathBuf::from("flavors/embeddings.json"),
            alignment: PathBuf::from("flavors/alignment.json"),
            lexicon: None,
            output_dir: default_output_dir(),
            emotion: Some(Emotion::Happy),
            top_k: default_top_k(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl RunConfig {
    /// Resolve relative paths against `base` (usually the config file's directory).
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.corpus_dir = resolve(self.corpus_dir);
        self.embeddings = resolve(self.embeddings);
        self.alignment = resolve(self.alignment);
        self.lexicon = self.lexicon.map(resolve);
        self.output_dir = resolve(self.output_dir);
        self
    }

    /// Validate the run configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        self.evolution.validate()?;
        Ok(())
    }
}

/// Run configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("top_k must be at least 1")]
    InvalidTopK,
    #[error("Evolution config validation failed: {0}")]
    Evolution(#[from] EvolutionConfigError),
}
