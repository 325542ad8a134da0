//! A candidate recipe: three gene groups, a display name and cached fitness.

use std::fmt;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::evolution::{FitnessBreakdown, FitnessEvaluator};
use crate::schema::{Emotion, Lexicon, MutationConfig};

use super::bake::{BakeMutation, BakeParameters};
use super::base::{BaseComposition, BaseMutation};
use super::flavor::{FlavorComposition, FlavorMutation};
use super::ingredient::{Ingredient, RecipeError};
use super::instructions::render_instructions;

/// Parse a raw line batch into ingredients, skipping section markers.
/// Line numbers in errors are 1-based.
pub fn parse_ingredient_lines<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Ingredient>, RecipeError> {
    let mut ingredients = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if let Some(ingredient) = Ingredient::parse_line(line.as_ref(), i + 1)? {
            ingredients.push(ingredient);
        }
    }
    Ok(ingredients)
}

/// Draw a display name: a random synonym followed by "<Emotion> Cookies".
pub fn generate_name<R: Rng + ?Sized>(emotion: Emotion, lexicon: &Lexicon, rng: &mut R) -> String {
    match lexicon.synonyms_for(emotion).choose(rng) {
        Some(synonym) => format!("{} {} Cookies", synonym, emotion),
        None => format!("{} Cookies", emotion),
    }
}

/// Gene groups touched by one call to [`Recipe::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Always present: the flavor group mutates every time.
    pub flavor: FlavorMutation,
    pub base: Option<BaseMutation>,
    pub bake: Option<BakeMutation>,
}

/// One individual of the population.
#[derive(Debug, Clone)]
pub struct Recipe {
    emotion: Emotion,
    name: String,
    base: BaseComposition,
    flavor: FlavorComposition,
    bake: BakeParameters,
    fitness: Option<f64>,
}

impl Recipe {
    /// Build a recipe from a raw line batch. Bake parameters are inherited
    /// when given, otherwise defaults are used.
    pub fn from_lines<S, R>(
        lines: &[S],
        emotion: Emotion,
        bake: Option<BakeParameters>,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> Result<Self, RecipeError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let ingredients = parse_ingredient_lines(lines)?;
        let base = BaseComposition::from_ingredients(ingredients.iter().cloned(), lexicon);
        let flavor = FlavorComposition::from_ingredients(ingredients, lexicon);
        Ok(Self::from_parts(
            emotion,
            base,
            flavor,
            bake.unwrap_or_default(),
            lexicon,
            rng,
        ))
    }

    /// Assemble a recipe from already-built gene groups with a fresh name.
    pub fn from_parts<R: Rng + ?Sized>(
        emotion: Emotion,
        base: BaseComposition,
        flavor: FlavorComposition,
        bake: BakeParameters,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> Self {
        Self {
            emotion,
            name: generate_name(emotion, lexicon, rng),
            base,
            flavor,
            bake,
            fitness: None,
        }
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &BaseComposition {
        &self.base
    }

    pub fn flavor(&self) -> &FlavorComposition {
        &self.flavor
    }

    pub fn bake(&self) -> &BakeParameters {
        &self.bake
    }

    /// Mutate the flavor group, then the base and bake groups each with an
    /// independent draw. Clears the cached fitness.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        config: &MutationConfig,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> MutationReport {
        self.flavor.set_mix_in_cap(config.mix_in_cap_grams);
        let flavor = self.flavor.mutate(lexicon, rng);
        let base = if rng.gen_bool(config.base_probability) {
            Some(self.base.mutate(rng))
        } else {
            None
        };
        let bake = if rng.gen_bool(config.bake_probability) {
            Some(self.bake.mutate(rng))
        } else {
            None
        };
        self.fitness = None;

        let report = MutationReport { flavor, base, bake };
        debug!("Mutated '{}': {:?}", self.name, report);
        report
    }

    /// Cached fitness, `None` until scored or after a mutation.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Score the recipe and cache the result.
    pub fn set_fitness_val(&mut self, evaluator: &FitnessEvaluator) -> FitnessBreakdown {
        let breakdown = evaluator.evaluate(self);
        self.fitness = Some(breakdown.total);
        breakdown
    }

    pub fn set_fitness(&mut self, value: f64) {
        self.fitness = Some(value);
    }

    /// Cached fitness, or 0 when not yet scored.
    pub fn get_fitness_val(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    /// Drop the cached fitness.
    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    /// Quantity of any tracked ingredient (base or flavor) by name.
    pub fn quantity_of(&self, name: &str) -> Option<f64> {
        self.base
            .amount_of(name)
            .or_else(|| self.flavor.amount_of(name))
    }

    /// Rendered base ingredient lines.
    pub fn base_lines(&self) -> Vec<String> {
        self.base.ingredients().map(ToString::to_string).collect()
    }

    /// Rendered flavor ingredient lines, in genome order.
    pub fn flavor_lines(&self) -> Vec<String> {
        self.flavor.ingredients().map(ToString::to_string).collect()
    }

    /// Base then flavor lines; re-parseable with [`parse_ingredient_lines`].
    pub fn ingredient_lines(&self) -> Vec<String> {
        let mut lines = self.base_lines();
        lines.extend(self.flavor_lines());
        lines
    }

    /// Filled-in five-step instructions.
    pub fn instructions(&self) -> String {
        render_instructions(&self.base, &self.flavor, &self.bake)
    }

    /// Full text rendering: name, ingredient sections and instructions.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Serializable summary of the recipe.
    pub fn snapshot(&self) -> RecipeSnapshot {
        RecipeSnapshot {
            name: self.name.clone(),
            emotion: self.emotion,
            fitness: self.fitness,
            base: self.base_lines(),
            flavors: self.flavor_lines(),
            bake: self.bake,
            instructions: self.instructions(),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-{}:", self.name)?;
        writeln!(f, "-Base Ingredients")?;
        for line in self.base_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "-Flavor Ingredients")?;
        for line in self.flavor_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "---")?;
        writeln!(f, "Instructions")?;
        write!(f, "{}", self.instructions())
    }
}

/// Serializable view of a recipe for result files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSnapshot {
    pub name: String,
    pub emotion: Emotion,
    pub fitness: Option<f64>,
    pub base: Vec<String>,
    pub flavors: Vec<String>,
    pub bake: BakeParameters,
    pub instructions: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const CLASSIC: &[&str] = &[
        "-Base Ingredients",
        "280 g all-purpose flour",
        "200 g brown sugar",
        "100 g white sugar",
        "16 tbsp butter",
        "100 g eggs",
        "1 tsp baking soda",
        "-Flavor Ingredients",
        "1 tsp cinnamon",
        "170 g chocolate",
        "2 tsp vanilla",
    ];

    fn classic(rng: &mut StdRng) -> Recipe {
        Recipe::from_lines(CLASSIC, Emotion::Happy, None, &Lexicon::default(), rng).unwrap()
    }

    #[test]
    fn test_construction() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipe = classic(&mut rng);
        assert!(recipe.name().ends_with(" Happy Cookies"));
        assert_eq!(recipe.bake(), &BakeParameters::default());
        assert_eq!(recipe.flavor().flavor_names(), vec!["cinnamon", "chocolate", "vanilla"]);
        assert!((recipe.quantity_of("butter").unwrap() - 16.0 * 14.2).abs() < 1e-9);
        assert_eq!(recipe.quantity_of("chocolate"), Some(170.0));
        assert_eq!(recipe.fitness(), None);
        assert_eq!(recipe.get_fitness_val(), 0.0);
    }

    #[test]
    fn test_inherits_bake_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let bake = BakeParameters {
            temperature: 400,
            bake_minutes: 9,
            rest_hours: 0,
            dough_grams: 45,
        };
        let recipe =
            Recipe::from_lines(CLASSIC, Emotion::Sad, Some(bake), &Lexicon::default(), &mut rng)
                .unwrap();
        assert_eq!(recipe.bake(), &bake);
        assert!(recipe.name().ends_with(" Sad Cookies"));
    }

    #[test]
    fn test_malformed_line_aborts() {
        let mut rng = StdRng::seed_from_u64(1);
        let lines = ["-Base", "200 g flour", "a lot of sugar"];
        let err = Recipe::from_lines(&lines, Emotion::Happy, None, &Lexicon::default(), &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            RecipeError::InvalidAmount {
                line: 3,
                amount: "a".to_string()
            }
        );
    }

    #[test]
    fn test_ingredient_lines_roundtrip() {
        let mut rng = StdRng::seed_from_u64(4);
        let lexicon = Lexicon::default();
        let mut recipe = classic(&mut rng);
        for _ in 0..5 {
            recipe.mutate(&MutationConfig::default(), &lexicon, &mut rng);
        }

        let reparsed = parse_ingredient_lines(&recipe.ingredient_lines()).unwrap();
        let original: Vec<&Ingredient> = recipe
            .base()
            .ingredients()
            .chain(recipe.flavor().ingredients())
            .collect();
        assert_eq!(reparsed.len(), original.len());
        for (parsed, orig) in reparsed.iter().zip(original) {
            assert_eq!(parsed.name(), orig.name());
            assert_eq!(parsed.unit(), orig.unit());
            // Butter rounds to whole tablespoons, grams to integers.
            let tolerance = if orig.name().contains("butter") { 7.2 } else { 0.5 };
            assert!(
                (parsed.amount() - orig.amount()).abs() <= tolerance,
                "{}: {} vs {}",
                orig.name(),
                parsed.amount(),
                orig.amount()
            );
        }
    }

    #[test]
    fn test_mutation_always_touches_flavor_and_clears_fitness() {
        let mut rng = StdRng::seed_from_u64(12);
        let lexicon = Lexicon::default();
        let mut recipe = classic(&mut rng);
        let mut base_hits = 0;
        let mut bake_hits = 0;
        for _ in 0..300 {
            let report = recipe.mutate(&MutationConfig::default(), &lexicon, &mut rng);
            base_hits += report.base.is_some() as usize;
            bake_hits += report.bake.is_some() as usize;
            assert!(recipe.fitness().is_none());
            assert!(recipe.flavor().mix_in_mass() <= 250.0 + 1e-9);
            assert!(recipe.bake().is_within_bounds());
        }
        // Roughly 30% each; generous bounds.
        assert!((40..=140).contains(&base_hits), "base hits {}", base_hits);
        assert!((40..=140).contains(&bake_hits), "bake hits {}", bake_hits);
    }

    #[test]
    fn test_render_sections() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipe = classic(&mut rng);
        let text = recipe.render();
        assert!(text.starts_with(&format!("-{}:\n-Base Ingredients\n", recipe.name())));
        assert!(text.contains("16 tbsp butter"));
        assert!(text.contains("-Flavor Ingredients\n1 tsp cinnamon\n170 g chocolate\n2 tsp vanilla\n"));
        assert!(text.contains("---\nInstructions\nStep 1:"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipe = classic(&mut rng);
        let json = serde_json::to_string(&recipe.snapshot()).unwrap();
        let parsed: RecipeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, recipe.name());
        assert_eq!(parsed.flavors.len(), 3);
    }
}
