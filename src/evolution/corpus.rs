//! Inspiring-set corpus: raw line batches read from a directory, and the
//! parsed reference quantities used by the dissimilarity term.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rand::Rng;

use crate::genome::{BakeParameters, Recipe, RecipeError, parse_ingredient_lines};
use crate::schema::{Emotion, Lexicon};

/// Errors raised while reading or parsing the corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Failed to read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Recipe {
        path: String,
        #[source]
        source: RecipeError,
    },
    #[error("Corpus directory {0} contains no recipe files")]
    Empty(String),
}

/// The ordered lines of one corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBatch {
    pub source: PathBuf,
    pub lines: Vec<String>,
}

impl RecipeBatch {
    pub fn new(source: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            source: source.into(),
            lines,
        }
    }

    /// Build a recipe from this batch, attaching the file path to errors.
    pub fn to_recipe<R: Rng + ?Sized>(
        &self,
        emotion: Emotion,
        bake: Option<BakeParameters>,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> Result<Recipe, CorpusError> {
        Recipe::from_lines(&self.lines, emotion, bake, lexicon, rng).map_err(|source| {
            CorpusError::Recipe {
                path: self.source.display().to_string(),
                source,
            }
        })
    }
}

/// Read every regular, non-hidden file of `dir` in file-name order.
pub fn load_corpus_dir(dir: impl AsRef<Path>) -> Result<Vec<RecipeBatch>, CorpusError> {
    let dir = dir.as_ref();
    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source: std::io::Error| CorpusError::Io { path, source }
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(CorpusError::Empty(dir.display().to_string()));
    }

    let mut batches = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        let lines = text.lines().map(str::to_string).collect();
        debug!("Loaded corpus file {}", path.display());
        batches.push(RecipeBatch::new(path, lines));
    }
    Ok(batches)
}

/// Name to quantity maps of the reference recipes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    recipes: Vec<BTreeMap<String, f64>>,
}

impl ReferenceCorpus {
    pub fn new(recipes: Vec<BTreeMap<String, f64>>) -> Self {
        Self { recipes }
    }

    /// Parse batches into quantity maps. Every data line counts, whether or
    /// not the lexicon classifies it.
    pub fn from_batches(batches: &[RecipeBatch]) -> Result<Self, CorpusError> {
        let mut recipes = Vec::with_capacity(batches.len());
        for batch in batches {
            let ingredients =
                parse_ingredient_lines(&batch.lines).map_err(|source| CorpusError::Recipe {
                    path: batch.source.display().to_string(),
                    source,
                })?;
            let mut quantities = BTreeMap::new();
            for ingredient in ingredients {
                quantities.insert(ingredient.name().to_string(), ingredient.amount());
            }
            recipes.push(quantities);
        }
        Ok(Self { recipes })
    }

    pub fn recipes(&self) -> &[BTreeMap<String, f64>] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) {
        fs::write(dir.path().join(name), text).unwrap();
    }

    #[test]
    fn test_load_sorted_and_skips_hidden() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.txt", "-Base\n100 g flour\n");
        write(&dir, "a.txt", "-Base\n200 g flour\n1 tsp cinnamon\n");
        write(&dir, ".DS_Store", "junk");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let batches = load_corpus_dir(dir.path()).unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches[0].source.ends_with("a.txt"));
        assert_eq!(batches[0].lines, vec!["-Base", "200 g flour", "1 tsp cinnamon"]);
        assert!(batches[1].source.ends_with("b.txt"));
    }

    #[test]
    fn test_empty_dir_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_corpus_dir(dir.path()),
            Err(CorpusError::Empty(_))
        ));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        assert!(matches!(
            load_corpus_dir("/nonexistent/inspiring_set"),
            Err(CorpusError::Io { .. })
        ));
    }

    #[test]
    fn test_reference_quantities() {
        let batches = vec![RecipeBatch::new(
            "r1.txt",
            vec![
                "-Base Ingredients".to_string(),
                "2 tbsp butter".to_string(),
                "170 g chocolate".to_string(),
            ],
        )];
        let corpus = ReferenceCorpus::from_batches(&batches).unwrap();
        assert_eq!(corpus.len(), 1);
        let recipe = &corpus.recipes()[0];
        assert_eq!(recipe.get("chocolate"), Some(&170.0));
        assert!((recipe["butter"] - 28.4).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_line_names_file_and_line() {
        let batch = RecipeBatch::new("bad.txt", vec!["100 cups flour".to_string()]);
        let err = ReferenceCorpus::from_batches(&[batch.clone()]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad.txt"), "{}", message);
        assert!(message.contains("line 1"), "{}", message);

        let mut rng = rand::thread_rng();
        assert!(
            batch
                .to_recipe(Emotion::Happy, None, &Lexicon::default(), &mut rng)
                .is_err()
        );
    }
}
