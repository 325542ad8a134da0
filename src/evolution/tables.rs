//! Read-only scoring tables: ingredient embeddings and emotion alignment.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::schema::Emotion;

/// Errors raised while loading a scoring table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to read table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Embedding for '{name}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TableError> {
    let text = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| TableError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Per-ingredient embedding vectors, all of one dimension.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: BTreeMap<String, Vec<f64>>,
}

impl EmbeddingTable {
    /// Build a table, lowercasing names and checking dimensions.
    pub fn new<I, S>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: AsRef<str>,
    {
        let mut vectors = BTreeMap::new();
        let mut dimension = None;
        for (name, vector) in entries {
            let name = name.as_ref().trim().to_lowercase();
            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(TableError::DimensionMismatch {
                    name,
                    expected,
                    found: vector.len(),
                });
            }
            vectors.insert(name, vector);
        }
        Ok(Self { vectors })
    }

    /// Load `{ "name": [x, y, ...], ... }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let raw: BTreeMap<String, Vec<f64>> = read_json(path.as_ref())?;
        Self::new(raw)
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.vectors.get(name).map(Vec::as_slice)
    }

    /// Dot product of two embeddings, `None` if either is missing.
    pub fn similarity(&self, first: &str, second: &str) -> Option<f64> {
        let a = self.get(first)?;
        let b = self.get(second)?;
        Some(a.iter().zip(b).map(|(x, y)| x * y).sum())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// One row of the alignment table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub name: String,
    /// Scalar per lowercase emotion column.
    #[serde(default)]
    pub emotions: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct AlignmentFile {
    ingredients: Vec<AlignmentRow>,
}

/// Ingredient-by-emotion scalars. Row order is the vocabulary used to build
/// dissimilarity vectors.
#[derive(Debug, Clone, Default)]
pub struct AlignmentTable {
    rows: Vec<AlignmentRow>,
    index: HashMap<String, usize>,
}

impl AlignmentTable {
    /// Build from rows; names are lowercased and a repeated name keeps its
    /// first position with the last row's values.
    pub fn new(rows: impl IntoIterator<Item = AlignmentRow>) -> Self {
        let mut table = Self::default();
        for mut row in rows {
            row.name = row.name.trim().to_lowercase();
            row.emotions = row
                .emotions
                .into_iter()
                .map(|(column, value)| (column.to_lowercase(), value))
                .collect();
            match table.index.get(&row.name) {
                Some(&i) => table.rows[i] = row,
                None => {
                    table.index.insert(row.name.clone(), table.rows.len());
                    table.rows.push(row);
                }
            }
        }
        table
    }

    /// Load `{ "ingredients": [ { "name": ..., "emotions": { ... } } ] }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file: AlignmentFile = read_json(path.as_ref())?;
        Ok(Self::new(file.ingredients))
    }

    /// Alignment of an ingredient with an emotion, `None` if either the row
    /// or the column is absent.
    pub fn score(&self, name: &str, emotion: Emotion) -> Option<f64> {
        let row = &self.rows[*self.index.get(name)?];
        row.emotions.get(emotion.column_key()).copied()
    }

    /// Vocabulary in table order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
