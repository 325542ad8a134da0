//! Flavor gene group: spices, mix-ins and extracts/oils.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::schema::{FlavorCategory, Lexicon};

use super::ingredient::{Ingredient, Unit};

/// Default cap on total mix-in mass, in grams.
pub const DEFAULT_MIX_IN_CAP: f64 = 250.0;

/// Amount given to a spice swapped in, in teaspoons.
const SWAP_SPICE_TSP: f64 = 0.5;
/// Amount given to a mix-in swapped in, in grams.
const SWAP_MIX_IN_GRAMS: f64 = 50.0;

/// Mutation operators of the flavor group, each drawn with probability 1/3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlavorMutation {
    Add,
    Delete,
    Swap,
}

impl FlavorMutation {
    pub const ALL: [FlavorMutation; 3] = [
        FlavorMutation::Add,
        FlavorMutation::Delete,
        FlavorMutation::Swap,
    ];
}

/// Classified flavor ingredients.
///
/// Invariant: total mix-in mass never exceeds `mix_in_cap` after an edit
/// made through this type.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorComposition {
    spices: Vec<Ingredient>,
    mix_ins: Vec<Ingredient>,
    oils: Vec<Ingredient>,
    mix_in_cap: f64,
}

impl FlavorComposition {
    /// Classify ingredients by the lexicon's flavor lists. Unknown names are
    /// not tracked. Corpus amounts are taken as-is; the mix-in cap applies
    /// to later edits.
    pub fn from_ingredients<I>(ingredients: I, lexicon: &Lexicon) -> Self
    where
        I: IntoIterator<Item = Ingredient>,
    {
        let mut flavor = Self {
            spices: Vec::new(),
            mix_ins: Vec::new(),
            oils: Vec::new(),
            mix_in_cap: DEFAULT_MIX_IN_CAP,
        };
        for ingredient in ingredients {
            if let Some(category) = lexicon.classify_flavor(ingredient.name()) {
                flavor.insert(category, ingredient);
            }
        }
        flavor
    }

    /// Set the mix-in cap and scale current mix-ins down to it.
    pub fn set_mix_in_cap(&mut self, cap: f64) {
        self.mix_in_cap = cap;
        self.enforce_mix_in_cap();
    }

    pub fn mix_in_cap(&self) -> f64 {
        self.mix_in_cap
    }

    /// Single-point crossover: the first `pivot` ingredients of `first`
    /// followed by the ingredients of `second` from `pivot` on, in genome
    /// order. A name in both halves appears once, with the amount from
    /// `second`. The result respects the mix-in cap of `first`.
    pub fn splice(first: &Self, second: &Self, pivot: usize, lexicon: &Lexicon) -> Self {
        let head = first.ingredients().take(pivot);
        let tail = second.ingredients().skip(pivot);
        let mut child = Self::from_ingredients(head.chain(tail).cloned(), lexicon);
        child.set_mix_in_cap(first.mix_in_cap);
        child
    }

    fn list(&self, category: FlavorCategory) -> &Vec<Ingredient> {
        match category {
            FlavorCategory::Spice => &self.spices,
            FlavorCategory::MixIn => &self.mix_ins,
            FlavorCategory::Oil => &self.oils,
        }
    }

    fn list_mut(&mut self, category: FlavorCategory) -> &mut Vec<Ingredient> {
        match category {
            FlavorCategory::Spice => &mut self.spices,
            FlavorCategory::MixIn => &mut self.mix_ins,
            FlavorCategory::Oil => &mut self.oils,
        }
    }

    /// Insert an ingredient, replacing any entry with the same name.
    fn insert(&mut self, category: FlavorCategory, ingredient: Ingredient) {
        if let Some(existing) = self
            .list_mut(category)
            .iter_mut()
            .find(|i| i.name() == ingredient.name())
        {
            *existing = ingredient;
            return;
        }
        for other in FlavorCategory::ALL {
            self.list_mut(other).retain(|i| i.name() != ingredient.name());
        }
        self.list_mut(category).push(ingredient);
    }

    /// Ingredients in genome order: spices, mix-ins, then oils.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.spices.iter().chain(&self.mix_ins).chain(&self.oils)
    }

    /// Flavor names in genome order. This order is what crossover pivots
    /// over and what the fitness terms iterate.
    pub fn flavor_names(&self) -> Vec<&str> {
        self.ingredients().map(Ingredient::name).collect()
    }

    /// Number of flavor ingredients.
    pub fn len(&self) -> usize {
        self.spices.len() + self.mix_ins.len() + self.oils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of one category, for the instruction template.
    pub fn names(&self, category: FlavorCategory) -> Vec<&str> {
        self.list(category).iter().map(Ingredient::name).collect()
    }

    /// Amount of a flavor ingredient by name.
    pub fn amount_of(&self, name: &str) -> Option<f64> {
        let name = name.trim().to_lowercase();
        self.ingredients()
            .find(|i| i.name() == name)
            .map(Ingredient::amount)
    }

    /// Total mix-in mass in grams.
    pub fn mix_in_mass(&self) -> f64 {
        self.mix_ins.iter().map(Ingredient::amount).sum()
    }

    /// Uniformly scale mix-ins down so their total fits the cap.
    fn enforce_mix_in_cap(&mut self) {
        let total = self.mix_in_mass();
        if total > self.mix_in_cap && total > 0.0 {
            let scale = self.mix_in_cap / total;
            for mix_in in &mut self.mix_ins {
                mix_in.set_amount(mix_in.amount() * scale);
            }
        }
    }

    /// Add a reference ingredient from a uniformly chosen category with a
    /// randomized amount: 0.5-2.0 tsp (step 0.5) for spices and oils,
    /// 50-200 g (step 50) for mix-ins. Returns the added name.
    pub fn add_ingredient<R: Rng + ?Sized>(
        &mut self,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> Option<String> {
        let category = *FlavorCategory::ALL.choose(rng)?;
        let name = lexicon.flavors(category).choose(rng)?.clone();
        let step = rng.gen_range(1..=4) as f64;
        let ingredient = match category {
            FlavorCategory::MixIn => Ingredient::grams(name.as_str(), 50.0 * step),
            FlavorCategory::Spice | FlavorCategory::Oil => {
                Ingredient::new(name.as_str(), 0.5 * step, Unit::Teaspoon)
            }
        };
        self.insert(category, ingredient);
        self.enforce_mix_in_cap();
        Some(name)
    }

    /// Pick spice or mix-in with equal probability, falling through to the
    /// other when the first is empty.
    fn pick_editable<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<FlavorCategory> {
        let (first, second) = if rng.gen_bool(0.5) {
            (FlavorCategory::Spice, FlavorCategory::MixIn)
        } else {
            (FlavorCategory::MixIn, FlavorCategory::Spice)
        };
        [first, second]
            .into_iter()
            .find(|&c| !self.list(c).is_empty())
    }

    /// Remove a random spice or mix-in. Returns the removed ingredient, or
    /// `None` when there are neither spices nor mix-ins.
    pub fn delete_ingredient<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Ingredient> {
        let category = self.pick_editable(rng)?;
        let list = self.list_mut(category);
        let index = rng.gen_range(0..list.len());
        Some(list.remove(index))
    }

    /// Replace a random spice or mix-in with a reference name of the same
    /// category that is not already present, at the default amount.
    /// Returns `(removed, added)`, or `None` with the composition untouched
    /// when no such name exists.
    pub fn swap_ingredient<R: Rng + ?Sized>(
        &mut self,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> Option<(String, String)> {
        let category = self.pick_editable(rng)?;
        let list = self.list_mut(category);
        let index = rng.gen_range(0..list.len());
        let removed = list.remove(index);

        let present: Vec<&str> = self.flavor_names();
        let candidates: Vec<&String> = lexicon
            .flavors(category)
            .iter()
            .filter(|n| n.as_str() != removed.name() && !present.contains(&n.as_str()))
            .collect();
        let Some(&name) = candidates.choose(rng) else {
            // Nothing to swap to; put the original back.
            self.list_mut(category).insert(index, removed);
            return None;
        };
        let ingredient = match category {
            FlavorCategory::MixIn => Ingredient::grams(name.as_str(), SWAP_MIX_IN_GRAMS),
            _ => Ingredient::new(name.as_str(), SWAP_SPICE_TSP, Unit::Teaspoon),
        };
        let added = ingredient.name().to_string();
        self.insert(category, ingredient);
        self.enforce_mix_in_cap();
        Some((removed.name().to_string(), added))
    }

    /// Apply one uniformly chosen operator. Returns the operator drawn.
    pub fn mutate<R: Rng + ?Sized>(&mut self, lexicon: &Lexicon, rng: &mut R) -> FlavorMutation {
        let operator = *FlavorMutation::ALL
            .choose(rng)
            .unwrap_or(&FlavorMutation::Add);
        match operator {
            FlavorMutation::Add => {
                self.add_ingredient(lexicon, rng);
            }
            FlavorMutation::Delete => {
                self.delete_ingredient(rng);
            }
            FlavorMutation::Swap => {
                self.swap_ingredient(lexicon, rng);
            }
        }
        operator
    }
}
