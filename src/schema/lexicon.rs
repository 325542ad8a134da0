//! Read-only word lists and classification rules shared by every recipe.
//!
//! A [`Lexicon`] is built once at startup (either the built-in default or a
//! JSON file) and handed out behind an `Arc` to the name generator, the
//! gene groups and the instruction template.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Emotion;

/// Macro category of a base ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseCategory {
    Flour,
    Sugar,
    Fat,
    Wet,
    Dry,
}

/// Category of a flavor ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlavorCategory {
    Spice,
    MixIn,
    Oil,
}

impl FlavorCategory {
    /// All categories in genome order.
    pub const ALL: [FlavorCategory; 3] = [
        FlavorCategory::Spice,
        FlavorCategory::MixIn,
        FlavorCategory::Oil,
    ];
}

/// How a rule matches a lowercased ingredient name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NameMatcher {
    /// Name equals one of the listed names.
    Exact { names: Vec<String> },
    /// Name contains `needle` and none of the `unless` fragments.
    Contains {
        needle: String,
        #[serde(default)]
        unless: Vec<String>,
    },
}

impl NameMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact { names } => names.iter().any(|n| n == name),
            NameMatcher::Contains { needle, unless } => {
                name.contains(needle.as_str()) && !unless.iter().any(|u| name.contains(u.as_str()))
            }
        }
    }
}

/// One entry of the ordered base classification table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: BaseCategory,
    pub matcher: NameMatcher,
}

/// Word lists, flavor vocabulary and base classification rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    /// Synonyms drawn by the name generator, per emotion.
    pub synonyms: BTreeMap<Emotion, Vec<String>>,
    /// Reference spice names.
    pub spices: Vec<String>,
    /// Reference mix-in names.
    pub mix_ins: Vec<String>,
    /// Reference extract/oil names.
    pub oils: Vec<String>,
    /// First-match-wins base classification rules.
    pub base_rules: Vec<ClassificationRule>,
}

/// Lexicon loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse lexicon {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Lexicon has no synonyms for {0}")]
    MissingSynonyms(Emotion),
    #[error("Lexicon flavor list '{0}' is empty")]
    EmptyFlavorList(&'static str),
}

impl Lexicon {
    /// Load a lexicon from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon: Lexicon = serde_json::from_str(&text).map_err(|source| LexiconError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Check that every emotion has synonyms and no flavor list is empty.
    pub fn validate(&self) -> Result<(), LexiconError> {
        for emotion in Emotion::ALL {
            if self.synonyms.get(&emotion).is_none_or(|s| s.is_empty()) {
                return Err(LexiconError::MissingSynonyms(emotion));
            }
        }
        if self.spices.is_empty() {
            return Err(LexiconError::EmptyFlavorList("spices"));
        }
        if self.mix_ins.is_empty() {
            return Err(LexiconError::EmptyFlavorList("mix_ins"));
        }
        if self.oils.is_empty() {
            return Err(LexiconError::EmptyFlavorList("oils"));
        }
        Ok(())
    }

    /// Classify a base ingredient. `None` means the ingredient is not tracked.
    pub fn classify_base(&self, name: &str) -> Option<BaseCategory> {
        let name = name.trim().to_lowercase();
        self.base_rules
            .iter()
            .find(|rule| rule.matcher.matches(&name))
            .map(|rule| rule.category)
    }

    /// Classify a flavor ingredient by exact list membership.
    ///
    /// Lists are checked in genome order, so a name present in both the
    /// spice and mix-in lists is a spice.
    pub fn classify_flavor(&self, name: &str) -> Option<FlavorCategory> {
        let name = name.trim().to_lowercase();
        FlavorCategory::ALL
            .into_iter()
            .find(|&category| self.flavors(category).iter().any(|n| *n == name))
    }

    /// Reference names for a flavor category.
    pub fn flavors(&self, category: FlavorCategory) -> &[String] {
        match category {
            FlavorCategory::Spice => &self.spices,
            FlavorCategory::MixIn => &self.mix_ins,
            FlavorCategory::Oil => &self.oils,
        }
    }

    /// Synonyms for an emotion (empty if the lexicon has none).
    pub fn synonyms_for(&self, emotion: Emotion) -> &[String] {
        self.synonyms.get(&emotion).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn exact(category: BaseCategory, names: &[&str]) -> ClassificationRule {
    ClassificationRule {
        category,
        matcher: NameMatcher::Exact {
            names: words(names),
        },
    }
}

fn contains(category: BaseCategory, needle: &str, unless: &[&str]) -> ClassificationRule {
    ClassificationRule {
        category,
        matcher: NameMatcher::Contains {
            needle: needle.to_string(),
            unless: words(unless),
        },
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let mut synonyms = BTreeMap::new();
        synonyms.insert(
            Emotion::Happy,
            words(&[
                "Happy", "Delighted", "Content", "Pleased", "Ecstatic", "Joyful", "Glad",
                "Jubilant", "Elated", "Merry", "Blissful", "Euphoric",
            ]),
        );
        synonyms.insert(
            Emotion::Sad,
            words(&[
                "Unhappy", "Melancholy", "Depressed", "Sorrowful", "Mournful", "Downcast", "Blue",
                "Woeful", "Gloomy", "Despondent", "Dejected", "Dismal",
            ]),
        );
        synonyms.insert(
            Emotion::Angry,
            words(&[
                "Furious", "Irritated", "Wrathful", "Enraged", "Indignant", "Irate", "Incensed",
                "Infuriated", "Agitated", "Outraged", "Fuming", "Vexed",
            ]),
        );
        synonyms.insert(
            Emotion::Excited,
            words(&[
                "Enthusiastic", "Eager", "Thrilled", "Animated", "Jubilant", "Ecstatic", "Elated",
                "Overjoyed", "Exhilarated", "Pumped", "Fired-up", "Anticipatory", "Exultant",
            ]),
        );
        synonyms.insert(
            Emotion::Tired,
            words(&[
                "Exhausted", "Fatigued", "Weary", "Drained", "Worn-out", "Burnt-out", "Depleted",
                "Lethargic", "Run-down", "Beat", "Jet-lagged",
            ]),
        );
        synonyms.insert(
            Emotion::Stressed,
            words(&[
                "Anxious", "Worried", "Tense", "Overwhelmed", "Strained", "Upset", "On-edge",
                "Frazzled", "Frantic", "Perturbed", "Exasperated", "Unsettled",
            ]),
        );

        let spices = words(&[
            "allspice", "cinnamon", "clove", "cardamom", "ginger", "nutmeg", "cayenne",
            "cayenne pepper", "black pepper", "cocoa", "basil", "mint", "rosemary", "fennel",
            "thyme", "coriander", "turmeric", "anise", "chamomile", "chive", "mustard",
            "peppermint", "spearmint", "black tea", "green tea", "tea", "sage", "parsley",
            "garlic", "flaxseed", "dill", "beetroot", "coffee", "cumin", "oregano",
        ]);

        let mix_ins = words(&[
            "apple", "apricot", "artichoke", "banana", "beetroot", "black raspberry",
            "blackberry", "blueberry", "brazil nut", "camembert cheese", "capers", "cashew nut",
            "cherry", "chestnut", "chocolate", "citrus", "citrus zest", "coconut",
            "comte cheese", "corn", "cottage cheese", "cranberry", "cream cheese", "cucumber",
            "currant", "dates", "elderberry", "fig", "garlic", "goat cheese", "grape",
            "grapefruit", "grapefruit zest", "gruyere cheese", "guava", "hazelnut", "kiwifruit",
            "lemon", "lemon balm", "lemon zest", "licorice", "lime", "lime zest",
            "macadamia nut", "mandarin orange", "mandarin orange zest", "mango", "melon", "nut",
            "oats", "olive", "onion", "orange", "papaya", "parmesan cheese", "passionfruit",
            "peach", "peanut", "peanut butter", "pear", "pecan", "persimmon", "pineapple",
            "pistachio", "plum", "pomegranate", "poppy seed", "pumpkin", "raisin", "raspberry",
            "rhubarb", "rose", "starfruit", "strawberry", "sunflower", "tamarind", "tangerine",
            "walnut", "wasabi", "zucchini",
        ]);

        let oils = words(&["lavender", "soy sauce", "vanilla", "almond"]);

        use BaseCategory::*;
        let base_rules = vec![
            exact(Sugar, &["white sugar", "brown sugar", "honey", "molasses"]),
            exact(Flour, &["all-purpose", "whole wheat"]),
            exact(Dry, &["salt", "baking powder", "baking soda", "cornstarch"]),
            exact(Wet, &["egg", "eggs", "milk", "buttermilk"]),
            exact(Fat, &["butter", "vegetable oil", "olive oil", "coconut oil"]),
            contains(Sugar, "sugar", &[]),
            contains(Flour, "flour", &[]),
            contains(Fat, "butter", &["peanut"]),
        ];

        Self {
            synonyms,
            spices,
            mix_ins,
            oils,
            base_rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_valid() {
        assert!(Lexicon::default().validate().is_ok());
    }

    #[test]
    fn test_base_classification_precedence() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.classify_base("Brown Sugar"), Some(BaseCategory::Sugar));
        assert_eq!(lexicon.classify_base("powdered sugar"), Some(BaseCategory::Sugar));
        assert_eq!(lexicon.classify_base("all-purpose flour"), Some(BaseCategory::Flour));
        assert_eq!(lexicon.classify_base("baking soda"), Some(BaseCategory::Dry));
        // Exact wet entry is checked before the butter substring rule.
        assert_eq!(lexicon.classify_base("buttermilk"), Some(BaseCategory::Wet));
        assert_eq!(lexicon.classify_base("unsalted butter"), Some(BaseCategory::Fat));
        assert_eq!(lexicon.classify_base("peanut butter"), None);
        assert_eq!(lexicon.classify_base("cinnamon"), None);
    }

    #[test]
    fn test_flavor_classification_prefers_spice() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.classify_flavor("garlic"), Some(FlavorCategory::Spice));
        assert_eq!(lexicon.classify_flavor("Walnut"), Some(FlavorCategory::MixIn));
        assert_eq!(lexicon.classify_flavor("vanilla"), Some(FlavorCategory::Oil));
        assert_eq!(lexicon.classify_flavor("butter"), None);
    }

    #[test]
    fn test_lexicon_json_roundtrip() {
        let lexicon = Lexicon::default();
        let json = serde_json::to_string(&lexicon).unwrap();
        let parsed: Lexicon = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.spices, lexicon.spices);
        assert_eq!(parsed.synonyms_for(Emotion::Sad).len(), 12);
        assert_eq!(parsed.classify_base("buttermilk"), Some(BaseCategory::Wet));
    }

    #[test]
    fn test_validate_rejects_missing_synonyms() {
        let mut lexicon = Lexicon::default();
        lexicon.synonyms.remove(&Emotion::Tired);
        assert!(matches!(
            lexicon.validate(),
            Err(LexiconError::MissingSynonyms(Emotion::Tired))
        ));
    }
}
