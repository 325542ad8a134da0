//! Result archive for writing the fittest recipes to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::genome::Recipe;

/// Writes rendered recipes and their JSON snapshots to an output directory.
#[derive(Debug, Clone)]
pub struct ResultArchive {
    output_dir: PathBuf,
}

impl ResultArchive {
    /// Create the archive, creating `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let output_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the `k` fittest recipes as `rank_N.txt` and `rank_N.json`,
    /// N starting at 1. Returns the text file paths in rank order.
    pub fn write_ranked(&self, recipes: &[Recipe], k: usize) -> io::Result<Vec<PathBuf>> {
        let mut ranked: Vec<&Recipe> = recipes.iter().collect();
        ranked.sort_by(|a, b| b.get_fitness_val().total_cmp(&a.get_fitness_val()));

        let mut paths = Vec::new();
        for (i, recipe) in ranked.into_iter().take(k).enumerate() {
            let stem = format!("rank_{}", i + 1);
            paths.push(self.write_recipe(recipe, &stem)?);
        }
        Ok(paths)
    }

    /// Write a single recipe as `<stem>.txt` plus `<stem>.json`.
    pub fn write_recipe(&self, recipe: &Recipe, stem: &str) -> io::Result<PathBuf> {
        let text_path = self.output_dir.join(format!("{}.txt", stem));
        fs::write(&text_path, recipe.render())?;

        let json = serde_json::to_string_pretty(&recipe.snapshot())?;
        fs::write(self.output_dir.join(format!("{}.json", stem)), json)?;

        Ok(text_path)
    }

    /// Write the run's result artifact, `best.txt`.
    pub fn write_best(&self, recipe: &Recipe) -> io::Result<PathBuf> {
        self.write_recipe(recipe, "best")
    }
}
