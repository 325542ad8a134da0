//! Ingredient values and the `<amount> <unit> <name>` line format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grams per tablespoon of butter.
pub const BUTTER_GRAMS_PER_TBSP: f64 = 14.2;

/// Unit of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Gram,
    Teaspoon,
    Tablespoon,
}

impl Unit {
    /// Abbreviation used in recipe lines.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Teaspoon => "tsp",
            Unit::Tablespoon => "tbsp",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Unit::Gram),
            "tsp" | "teaspoon" | "teaspoons" => Ok(Unit::Teaspoon),
            "tbsp" | "tablespoon" | "tablespoons" => Ok(Unit::Tablespoon),
            _ => Err(()),
        }
    }
}

/// Errors raised while reading recipe lines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecipeError {
    #[error("line {line}: expected '<amount> <unit> <name>', got '{text}'")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: invalid amount '{amount}'")]
    InvalidAmount { line: usize, amount: String },
    #[error("line {line}: unknown unit '{unit}'")]
    UnknownUnit { line: usize, unit: String },
}

/// True for butter-family names, which are tracked in grams.
pub fn is_butter(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("butter") && !name.contains("peanut")
}

/// A named quantity of one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    name: String,
    amount: f64,
    unit: Unit,
}

impl Ingredient {
    /// Create an ingredient. The name is normalized to lowercase and
    /// negative amounts are clamped to zero.
    pub fn new(name: impl Into<String>, amount: f64, unit: Unit) -> Self {
        Self {
            name: name.into().trim().to_lowercase(),
            amount: amount.max(0.0),
            unit,
        }
    }

    /// Shorthand for a gram-measured ingredient.
    pub fn grams(name: impl Into<String>, amount: f64) -> Self {
        Self::new(name, amount, Unit::Gram)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Set the amount, clamping at zero.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount.max(0.0);
    }

    /// Parse one recipe line.
    ///
    /// Returns `Ok(None)` for blank lines and section markers (lines
    /// starting with `-`). Butter given in tablespoons is converted to grams.
    pub fn parse_line(text: &str, line: usize) -> Result<Option<Self>, RecipeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            return Ok(None);
        }

        let mut parts = trimmed.split_whitespace();
        let (Some(amount_str), Some(unit_str)) = (parts.next(), parts.next()) else {
            return Err(RecipeError::MalformedLine {
                line,
                text: trimmed.to_string(),
            });
        };
        let name = parts.collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(RecipeError::MalformedLine {
                line,
                text: trimmed.to_string(),
            });
        }

        let amount: f64 = amount_str
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite() && *a >= 0.0)
            .ok_or_else(|| RecipeError::InvalidAmount {
                line,
                amount: amount_str.to_string(),
            })?;
        let unit: Unit = unit_str.parse().map_err(|_| RecipeError::UnknownUnit {
            line,
            unit: unit_str.to_string(),
        })?;

        if is_butter(&name) && unit == Unit::Tablespoon {
            return Ok(Some(Self::grams(name, amount * BUTTER_GRAMS_PER_TBSP)));
        }
        Ok(Some(Self::new(name, amount, unit)))
    }
}

impl fmt::Display for Ingredient {
    /// Butter renders in whole tablespoons, grams as integers, anything
    /// else with up to two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_butter(&self.name) && self.unit == Unit::Gram {
            let tbsp = (self.amount / BUTTER_GRAMS_PER_TBSP).round();
            return write!(f, "{} {} {}", tbsp, Unit::Tablespoon, self.name);
        }
        match self.unit {
            Unit::Gram => write!(f, "{} {} {}", self.amount.round(), self.unit, self.name),
            _ => write!(f, "{} {} {}", format_decimal(self.amount), self.unit, self.name),
        }
    }
}

/// Round to two decimals and drop trailing zeros ("0.50" -> "0.5").
fn format_decimal(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line() {
        let ing = Ingredient::parse_line("250 g All-Purpose Flour", 1)
            .unwrap()
            .unwrap();
        assert_eq!(ing.name(), "all-purpose flour");
        assert_eq!(ing.amount(), 250.0);
        assert_eq!(ing.unit(), Unit::Gram);
    }

    #[test]
    fn test_parse_skips_markers_and_blanks() {
        assert_eq!(Ingredient::parse_line("-Base Ingredients", 1).unwrap(), None);
        assert_eq!(Ingredient::parse_line("---", 2).unwrap(), None);
        assert_eq!(Ingredient::parse_line("   ", 3).unwrap(), None);
    }

    #[test]
    fn test_butter_tablespoons_become_grams() {
        let ing = Ingredient::parse_line("8 tbsp unsalted butter", 1)
            .unwrap()
            .unwrap();
        assert_eq!(ing.unit(), Unit::Gram);
        assert!((ing.amount() - 113.6).abs() < 1e-9);
        assert_eq!(ing.to_string(), "8 tbsp unsalted butter");

        let pb = Ingredient::parse_line("2 tbsp peanut butter", 1)
            .unwrap()
            .unwrap();
        assert_eq!(pb.unit(), Unit::Tablespoon);
        assert_eq!(pb.amount(), 2.0);
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        assert_eq!(
            Ingredient::parse_line("flour", 4),
            Err(RecipeError::MalformedLine {
                line: 4,
                text: "flour".to_string()
            })
        );
        assert!(matches!(
            Ingredient::parse_line("two g flour", 5),
            Err(RecipeError::InvalidAmount { line: 5, .. })
        ));
        assert!(matches!(
            Ingredient::parse_line("inf g flour", 6),
            Err(RecipeError::InvalidAmount { line: 6, .. })
        ));
        assert!(matches!(
            Ingredient::parse_line("2 cups flour", 7),
            Err(RecipeError::UnknownUnit { line: 7, .. })
        ));
        assert!(matches!(
            Ingredient::parse_line("2 g", 8),
            Err(RecipeError::MalformedLine { line: 8, .. })
        ));
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(Ingredient::grams("white sugar", 199.6).to_string(), "200 g white sugar");
        assert_eq!(
            Ingredient::new("cinnamon", 0.5, Unit::Teaspoon).to_string(),
            "0.5 tsp cinnamon"
        );
        assert_eq!(
            Ingredient::new("nutmeg", 1.256, Unit::Teaspoon).to_string(),
            "1.26 tsp nutmeg"
        );
        assert_eq!(
            Ingredient::new("vanilla", 2.0, Unit::Teaspoon).to_string(),
            "2 tsp vanilla"
        );
    }

    #[test]
    fn test_negative_amounts_clamped() {
        let mut ing = Ingredient::grams("salt", -4.0);
        assert_eq!(ing.amount(), 0.0);
        ing.set_amount(-1.0);
        assert_eq!(ing.amount(), 0.0);
    }
}
