//! Mood and desired-feeling catalogs.
//!
//! One canonical enum per catalog. Labels are the display form used
//! verbatim in prompts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::response::StructuredAdvice;
use crate::utilities::errors::CatalogError;

/// Fixed motivational message used by local advice.
pub const LOCAL_MOTIVATIONAL_MESSAGE: &str = "Believe in yourself and all that you are. Remember, there's something inside you that's greater than any obstacle!";

/// The user's current mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Excited,
    Joyful,
    Calm,
    Sad,
    Down,
    Depressed,
    Lonely,
    Tired,
    Anxious,
    Stressed,
    Angry,
    Bored,
    Confused,
}

/// Broad grouping used by local advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTone {
    Low,
    High,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 14] = [
        Mood::Happy,
        Mood::Excited,
        Mood::Joyful,
        Mood::Calm,
        Mood::Sad,
        Mood::Down,
        Mood::Depressed,
        Mood::Lonely,
        Mood::Tired,
        Mood::Anxious,
        Mood::Stressed,
        Mood::Angry,
        Mood::Bored,
        Mood::Confused,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Excited => "Excited",
            Mood::Joyful => "Joyful",
            Mood::Calm => "Calm",
            Mood::Sad => "Sad",
            Mood::Down => "Down",
            Mood::Depressed => "Depressed",
            Mood::Lonely => "Lonely",
            Mood::Tired => "Tired",
            Mood::Anxious => "Anxious",
            Mood::Stressed => "Stressed",
            Mood::Angry => "Angry",
            Mood::Bored => "Bored",
            Mood::Confused => "Confused",
        }
    }

    /// Resolve a label (case-insensitive, surrounding whitespace ignored).
    pub fn resolve(key: &str) -> Result<Mood, CatalogError> {
        let key = key.trim();
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(key))
            .ok_or_else(|| CatalogError::unknown("mood", key))
    }

    pub fn tone(&self) -> MoodTone {
        match self {
            Mood::Sad | Mood::Down | Mood::Depressed | Mood::Lonely | Mood::Tired => {
                MoodTone::Low
            }
            Mood::Happy | Mood::Excited | Mood::Joyful => MoodTone::High,
            _ => MoodTone::Neutral,
        }
    }

    /// Deterministic advice that needs no generation service.
    pub fn local_advice(&self) -> StructuredAdvice {
        let (suggestion, joke) = match self.tone() {
            MoodTone::Low => (
                "Maybe try watching a comedy show or go for a quick walk to clear your mind.",
                Some("Why don't scientists trust atoms? Because they make up everything!"),
            ),
            MoodTone::High => (
                "Keep shining! How about sharing your positivity with a friend or trying something creative?",
                None,
            ),
            MoodTone::Neutral => (
                "Consider some mindfulness exercises or meditation to enhance your well-being.",
                Some("Why did the tomato blush? Because it saw the salad dressing!"),
            ),
        };
        StructuredAdvice {
            suggestion: suggestion.to_string(),
            motivational_message: LOCAL_MOTIVATIONAL_MESSAGE.to_string(),
            joke: joke.map(str::to_string),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::resolve(s)
    }
}

/// The feeling the user would like to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesiredFeeling {
    Happy,
    Relaxed,
    Calm,
    Motivated,
    Confident,
    Energized,
    Hopeful,
    Loved,
    Focused,
}

impl DesiredFeeling {
    pub const ALL: [DesiredFeeling; 9] = [
        DesiredFeeling::Happy,
        DesiredFeeling::Relaxed,
        DesiredFeeling::Calm,
        DesiredFeeling::Motivated,
        DesiredFeeling::Confident,
        DesiredFeeling::Energized,
        DesiredFeeling::Hopeful,
        DesiredFeeling::Loved,
        DesiredFeeling::Focused,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DesiredFeeling::Happy => "Happy",
            DesiredFeeling::Relaxed => "Relaxed",
            DesiredFeeling::Calm => "Calm",
            DesiredFeeling::Motivated => "Motivated",
            DesiredFeeling::Confident => "Confident",
            DesiredFeeling::Energized => "Energized",
            DesiredFeeling::Hopeful => "Hopeful",
            DesiredFeeling::Loved => "Loved",
            DesiredFeeling::Focused => "Focused",
        }
    }

    /// Resolve a label (case-insensitive, surrounding whitespace ignored).
    pub fn resolve(key: &str) -> Result<DesiredFeeling, CatalogError> {
        let key = key.trim();
        DesiredFeeling::ALL
            .iter()
            .copied()
            .find(|f| f.label().eq_ignore_ascii_case(key))
            .ok_or_else(|| CatalogError::unknown("desired feeling", key))
    }
}

impl fmt::Display for DesiredFeeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DesiredFeeling {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DesiredFeeling::resolve(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_mood_label() {
        for mood in Mood::ALL {
            assert_eq!(Mood::resolve(mood.label()).unwrap(), mood);
        }
    }

    #[test]
    fn test_resolve_ignores_case_and_whitespace() {
        assert_eq!(Mood::resolve("  stressed ").unwrap(), Mood::Stressed);
        assert_eq!("relaxed".parse::<DesiredFeeling>().unwrap(), DesiredFeeling::Relaxed);
    }

    #[test]
    fn test_resolve_unknown_key() {
        let err = Mood::resolve("Hangry").unwrap_err();
        assert_eq!(err, CatalogError::unknown("mood", "Hangry"));
        assert!(DesiredFeeling::resolve("").is_err());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Mood::Sad.to_string(), "Sad");
        assert_eq!(DesiredFeeling::Relaxed.to_string(), "Relaxed");
    }

    #[test]
    fn test_local_advice_low_mood_has_joke() {
        let advice = Mood::Sad.local_advice();
        assert!(advice.suggestion.contains("comedy"));
        assert!(advice.joke.as_deref().unwrap().contains("atoms"));
        assert_eq!(advice.motivational_message, LOCAL_MOTIVATIONAL_MESSAGE);
    }

    #[test]
    fn test_local_advice_high_mood_has_no_joke() {
        let advice = Mood::Happy.local_advice();
        assert!(advice.suggestion.starts_with("Keep shining"));
        assert!(advice.joke.is_none());
    }

    #[test]
    fn test_local_advice_depressed_and_joyful() {
        assert_eq!(Mood::resolve("depressed").unwrap(), Mood::Depressed);
        assert_eq!(Mood::resolve(" JOYFUL ").unwrap(), Mood::Joyful);

        let low = Mood::Depressed.local_advice();
        assert_eq!(Mood::Depressed.tone(), MoodTone::Low);
        assert!(low.joke.as_deref().unwrap().contains("atoms"));

        let high = Mood::Joyful.local_advice();
        assert_eq!(Mood::Joyful.tone(), MoodTone::High);
        assert!(high.suggestion.starts_with("Keep shining"));
        assert!(high.joke.is_none());
    }

    #[test]
    fn test_local_advice_neutral_mood() {
        let advice = Mood::Stressed.local_advice();
        assert!(advice.suggestion.contains("mindfulness"));
        assert!(advice.joke.as_deref().unwrap().contains("tomato"));
    }
}
