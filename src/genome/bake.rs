//! Bake gene group: scalar oven and dough settings.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Mutation operators of the bake group, each drawn with probability 1/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BakeMutation {
    Temperature,
    BakeTime,
    RestTime,
    DoughSize,
}

impl BakeMutation {
    pub const ALL: [BakeMutation; 4] = [
        BakeMutation::Temperature,
        BakeMutation::BakeTime,
        BakeMutation::RestTime,
        BakeMutation::DoughSize,
    ];
}

/// Baking settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeParameters {
    /// Oven temperature in °F, 325-425 in steps of 25.
    pub temperature: u32,
    /// Bake time in minutes, 8-12.
    pub bake_minutes: u32,
    /// Refrigerated rest in hours, 0-12.
    pub rest_hours: u32,
    /// Dough per cookie in grams, 40-60 in steps of 5.
    pub dough_grams: u32,
}

impl Default for BakeParameters {
    fn default() -> Self {
        Self {
            temperature: 350,
            bake_minutes: 10,
            rest_hours: 2,
            dough_grams: 50,
        }
    }
}

impl BakeParameters {
    pub fn adjust_temperature<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.temperature = rng.gen_range(13..=17) * 25;
    }

    pub fn adjust_bake_time<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.bake_minutes = rng.gen_range(8..=12);
    }

    pub fn adjust_rest_time<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.rest_hours = rng.gen_range(0..=12);
    }

    pub fn adjust_dough_size<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.dough_grams = rng.gen_range(8..=12) * 5;
    }

    /// Apply one uniformly chosen operator. Returns the operator drawn.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BakeMutation {
        let operator = *BakeMutation::ALL
            .choose(rng)
            .unwrap_or(&BakeMutation::Temperature);
        match operator {
            BakeMutation::Temperature => self.adjust_temperature(rng),
            BakeMutation::BakeTime => self.adjust_bake_time(rng),
            BakeMutation::RestTime => self.adjust_rest_time(rng),
            BakeMutation::DoughSize => self.adjust_dough_size(rng),
        }
        operator
    }

    /// True when every field lies on its allowed grid.
    pub fn is_within_bounds(&self) -> bool {
        (325..=425).contains(&self.temperature)
            && self.temperature % 25 == 0
            && (8..=12).contains(&self.bake_minutes)
            && self.rest_hours <= 12
            && (40..=60).contains(&self.dough_grams)
            && self.dough_grams % 5 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_within_bounds() {
        assert!(BakeParameters::default().is_within_bounds());
    }

    #[test]
    fn test_mutation_stays_on_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut params = BakeParameters::default();
        let mut seen = Vec::new();
        for _ in 0..200 {
            let op = params.mutate(&mut rng);
            if !seen.contains(&op) {
                seen.push(op);
            }
            assert!(params.is_within_bounds(), "{:?}", params);
        }
        assert_eq!(seen.len(), BakeMutation::ALL.len());
    }

    #[test]
    fn test_temperature_hits_both_ends() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut params = BakeParameters::default();
        let mut temps = std::collections::HashSet::new();
        for _ in 0..200 {
            params.adjust_temperature(&mut rng);
            temps.insert(params.temperature);
        }
        assert!(temps.contains(&325));
        assert!(temps.contains(&425));
        assert_eq!(temps.len(), 5);
    }
}
