//! Base gene group: flour, sugar, fat, wet and dry ingredients.
//!
//! Sugar, flour and fat are the ratio-balanced macro categories. Their
//! per-category volumes and the derived `sugar:flour:fat` ratio (normalized
//! so sugar = 2) are recomputed after every edit.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::schema::{BaseCategory, Lexicon};

use super::ingredient::Ingredient;

/// Grams per egg.
pub const EGG_GRAMS: f64 = 50.0;

/// The three ratio-balanced categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroCategory {
    Sugar,
    Flour,
    Fat,
}

impl MacroCategory {
    pub const ALL: [MacroCategory; 3] = [
        MacroCategory::Sugar,
        MacroCategory::Flour,
        MacroCategory::Fat,
    ];

    fn base_category(self) -> BaseCategory {
        match self {
            MacroCategory::Sugar => BaseCategory::Sugar,
            MacroCategory::Flour => BaseCategory::Flour,
            MacroCategory::Fat => BaseCategory::Fat,
        }
    }
}

/// One value per macro category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTriple {
    pub sugar: f64,
    pub flour: f64,
    pub fat: f64,
}

impl MacroTriple {
    pub fn get(&self, category: MacroCategory) -> f64 {
        match category {
            MacroCategory::Sugar => self.sugar,
            MacroCategory::Flour => self.flour,
            MacroCategory::Fat => self.fat,
        }
    }

    fn set(&mut self, category: MacroCategory, value: f64) {
        match category {
            MacroCategory::Sugar => self.sugar = value,
            MacroCategory::Flour => self.flour = value,
            MacroCategory::Fat => self.fat = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.sugar + self.flour + self.fat
    }
}

/// Mutation operators of the base group, each drawn with probability 1/4.
///
/// Operators that cannot apply (a blend with fewer than two members, eggs
/// with no egg entry) fall back to [`BaseMutation::BaseRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseMutation {
    /// Rescale one macro category against the other two.
    BaseRatio,
    /// Shift mass between two sugars.
    SugarBlend,
    /// Shift mass between two fats.
    FatBlend,
    /// Reset the egg count to one or two.
    Eggs,
}

impl BaseMutation {
    pub const ALL: [BaseMutation; 4] = [
        BaseMutation::BaseRatio,
        BaseMutation::SugarBlend,
        BaseMutation::FatBlend,
        BaseMutation::Eggs,
    ];
}

/// Classified base ingredients with tracked macro volumes and ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseComposition {
    flour: Vec<Ingredient>,
    sugars: Vec<Ingredient>,
    fats: Vec<Ingredient>,
    wet: Vec<Ingredient>,
    dry: Vec<Ingredient>,
    volumes: MacroTriple,
    ratio: MacroTriple,
}

impl BaseComposition {
    /// Classify ingredients with the lexicon's rule table. Ingredients no
    /// rule matches are not tracked here.
    pub fn from_ingredients<I>(ingredients: I, lexicon: &Lexicon) -> Self
    where
        I: IntoIterator<Item = Ingredient>,
    {
        let mut base = Self {
            flour: Vec::new(),
            sugars: Vec::new(),
            fats: Vec::new(),
            wet: Vec::new(),
            dry: Vec::new(),
            volumes: MacroTriple::default(),
            ratio: MacroTriple::default(),
        };
        for ingredient in ingredients {
            if let Some(category) = lexicon.classify_base(ingredient.name()) {
                base.insert(category, ingredient);
            }
        }
        base.recompute();
        base
    }

    /// Insert or replace (by name) an ingredient in a category.
    fn insert(&mut self, category: BaseCategory, ingredient: Ingredient) {
        let members = self.members_mut(category);
        match members.iter_mut().find(|i| i.name() == ingredient.name()) {
            Some(existing) => *existing = ingredient,
            None => members.push(ingredient),
        }
    }

    /// Ingredients of one category, in insertion order.
    pub fn members(&self, category: BaseCategory) -> &[Ingredient] {
        match category {
            BaseCategory::Flour => &self.flour,
            BaseCategory::Sugar => &self.sugars,
            BaseCategory::Fat => &self.fats,
            BaseCategory::Wet => &self.wet,
            BaseCategory::Dry => &self.dry,
        }
    }

    fn members_mut(&mut self, category: BaseCategory) -> &mut Vec<Ingredient> {
        match category {
            BaseCategory::Flour => &mut self.flour,
            BaseCategory::Sugar => &mut self.sugars,
            BaseCategory::Fat => &mut self.fats,
            BaseCategory::Wet => &mut self.wet,
            BaseCategory::Dry => &mut self.dry,
        }
    }

    /// All tracked ingredients: flour, sugar, fat, dry, then wet.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.flour
            .iter()
            .chain(&self.sugars)
            .chain(&self.fats)
            .chain(&self.dry)
            .chain(&self.wet)
    }

    /// Names of one category, for the instruction template.
    pub fn names(&self, category: BaseCategory) -> Vec<&str> {
        self.members(category).iter().map(Ingredient::name).collect()
    }

    /// Amount of a tracked ingredient by name.
    pub fn amount_of(&self, name: &str) -> Option<f64> {
        let name = name.trim().to_lowercase();
        self.ingredients()
            .find(|i| i.name() == name)
            .map(Ingredient::amount)
    }

    /// Current volume of each macro category.
    pub fn volumes(&self) -> MacroTriple {
        self.volumes
    }

    /// Current `sugar:flour:fat` ratio with sugar normalized to 2.
    pub fn ratio(&self) -> MacroTriple {
        self.ratio
    }

    /// Recompute macro volumes from members, then the ratio.
    /// The ratio is left unchanged while there is no sugar.
    fn recompute(&mut self) {
        for category in MacroCategory::ALL {
            let volume = self
                .members(category.base_category())
                .iter()
                .map(Ingredient::amount)
                .sum();
            self.volumes.set(category, volume);
        }
        let sugar = self.volumes.sugar;
        if sugar > 0.0 {
            for category in MacroCategory::ALL {
                self.ratio
                    .set(category, 2.0 * self.volumes.get(category) / sugar);
            }
        }
    }

    /// Rescale one macro category by a multiplier in [0.5, 1.5) and offset
    /// the change evenly across the other macro categories with a positive
    /// volume, so the total macro volume is conserved.
    ///
    /// Reductions are taken only from members with a positive amount and
    /// clamped so none goes negative. Returns `false` if there was nothing
    /// to rebalance.
    pub fn adjust_base_ratio<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(&chosen) = MacroCategory::ALL.choose(rng) else {
            return false;
        };
        let others: Vec<MacroCategory> = MacroCategory::ALL
            .into_iter()
            .filter(|&c| c != chosen && self.volumes.get(c) > 0.0)
            .collect();
        if self.volumes.get(chosen) <= 0.0 || others.is_empty() {
            return false;
        }

        let multiplier = 1.0 + rng.gen_range(-0.5..0.5);
        let mut delta = (multiplier - 1.0) * self.volumes.get(chosen);
        let share = others.len() as f64;

        if delta < 0.0 {
            delta = delta.max(-self.reducible(chosen));
        } else {
            for &other in &others {
                delta = delta.min(share * self.reducible(other));
            }
        }

        self.spread(chosen, delta);
        for &other in &others {
            self.spread(other, -delta / share);
        }
        self.recompute();
        true
    }

    /// Largest reduction an even spread over the positive members allows.
    fn reducible(&self, category: MacroCategory) -> f64 {
        let positive = self
            .members(category.base_category())
            .iter()
            .map(Ingredient::amount)
            .filter(|&a| a > 0.0);
        let (count, min) = positive.fold((0usize, f64::INFINITY), |(n, m), a| (n + 1, m.min(a)));
        if count == 0 { 0.0 } else { count as f64 * min }
    }

    /// Distribute a volume change evenly across a category's members.
    /// Reductions skip members that are already empty.
    fn spread(&mut self, category: MacroCategory, change: f64) {
        let members = self.members_mut(category.base_category());
        let growing = change >= 0.0;
        let count = members
            .iter()
            .filter(|i| growing || i.amount() > 0.0)
            .count();
        if count == 0 {
            return;
        }
        let per_member = change / count as f64;
        for ingredient in members
            .iter_mut()
            .filter(|i| growing || i.amount() > 0.0)
        {
            ingredient.set_amount((ingredient.amount() + per_member).max(0.0));
        }
    }

    /// Move a random fraction of the smaller sugar's amount to it from a
    /// larger one. No-op with fewer than two sugars.
    pub fn adjust_sugar_ratio<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let applied = blend_pair(&mut self.sugars, rng);
        self.recompute();
        applied
    }

    /// Fat counterpart of [`Self::adjust_sugar_ratio`].
    pub fn adjust_fat_ratio<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let applied = blend_pair(&mut self.fats, rng);
        self.recompute();
        applied
    }

    /// Reset the egg entry, if any, to one or two eggs.
    pub fn adjust_eggs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let eggs = rng.gen_range(1..=2) as f64;
        match self
            .wet
            .iter_mut()
            .find(|i| i.name() == "egg" || i.name() == "eggs")
        {
            Some(egg) => {
                egg.set_amount(EGG_GRAMS * eggs);
                true
            }
            None => false,
        }
    }

    /// Apply one uniformly chosen operator, falling back to the base ratio
    /// adjustment when it cannot apply. Returns the operator that ran.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BaseMutation {
        let operator = *BaseMutation::ALL
            .choose(rng)
            .unwrap_or(&BaseMutation::BaseRatio);
        let applied = match operator {
            BaseMutation::BaseRatio => return self.apply_base_ratio(rng),
            BaseMutation::SugarBlend => self.sugars.len() > 1 && self.adjust_sugar_ratio(rng),
            BaseMutation::FatBlend => self.fats.len() > 1 && self.adjust_fat_ratio(rng),
            BaseMutation::Eggs => self.adjust_eggs(rng),
        };
        if applied {
            operator
        } else {
            self.apply_base_ratio(rng)
        }
    }

    fn apply_base_ratio<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BaseMutation {
        self.adjust_base_ratio(rng);
        BaseMutation::BaseRatio
    }
}

/// Pick two distinct members and move `fraction * smaller` from the larger
/// to the smaller.
fn blend_pair<R: Rng + ?Sized>(members: &mut [Ingredient], rng: &mut R) -> bool {
    if members.len() <= 1 {
        return false;
    }
    let picked = rand::seq::index::sample(rng, members.len(), 2);
    let (i, j) = (picked.index(0), picked.index(1));
    let fraction: f64 = rng.r#gen();
    let (small, large) = if members[i].amount() <= members[j].amount() {
        (i, j)
    } else {
        (j, i)
    };
    let transfer = fraction * members[small].amount();
    let large_amount = members[large].amount();
    let small_amount = members[small].amount();
    members[large].set_amount(large_amount - transfer);
    members[small].set_amount(small_amount + transfer);
    true
}
