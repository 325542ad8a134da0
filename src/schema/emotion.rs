//! The closed set of emotional states a run can target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Emotion a recipe is evolved toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Excited,
    Tired,
    Stressed,
}

impl Emotion {
    /// All emotions in menu order (1-6).
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Excited,
        Emotion::Tired,
        Emotion::Stressed,
    ];

    /// Display name, as used in recipe names.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Excited => "Excited",
            Emotion::Tired => "Tired",
            Emotion::Stressed => "Stressed",
        }
    }

    /// Lowercase key used for alignment table columns.
    pub fn column_key(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Excited => "excited",
            Emotion::Tired => "tired",
            Emotion::Stressed => "stressed",
        }
    }

    /// Look up an emotion by its 1-based menu number.
    pub fn from_menu_key(key: usize) -> Option<Self> {
        key.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known emotion.
#[derive(Debug, thiserror::Error)]
#[error("Unknown emotion '{0}' (expected a name or a number 1-6)")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(key) = trimmed.parse::<usize>() {
            return Self::from_menu_key(key).ok_or_else(|| UnknownEmotion(s.to_string()));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_menu_key() {
        assert_eq!("happy".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!(" Stressed ".parse::<Emotion>().unwrap(), Emotion::Stressed);
        assert_eq!("4".parse::<Emotion>().unwrap(), Emotion::Excited);
        assert!("0".parse::<Emotion>().is_err());
        assert!("7".parse::<Emotion>().is_err());
        assert!("grumpy".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_column_key_is_lowercase_name() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.column_key(), emotion.as_str().to_lowercase());
        }
    }
}
