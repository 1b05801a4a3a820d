//! Persona catalog.
//!
//! A persona is a named response style. Its tone text is embedded verbatim
//! in every prompt composed for it, and its name attributes generated
//! replies in the conversation history.

use serde::{Deserialize, Serialize};

use crate::history::USER_SPEAKER;
use crate::utilities::errors::CatalogError;

/// A named response style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique key; also the speaker name for this persona's turns.
    pub name: String,
    /// Free-text tone descriptor used verbatim in prompts.
    pub tone: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tone: tone.into(),
        }
    }
}

/// Built-in personas as `(name, tone)` pairs.
const BUILTIN_PERSONAS: &[(&str, &str)] = &[
    (
        "Therapist",
        "a calm, compassionate therapist who listens carefully, validates feelings and gently offers practical coping strategies",
    ),
    (
        "Friend",
        "a warm, supportive best friend who speaks casually, shows genuine care and keeps things light and encouraging",
    ),
    (
        "Coach",
        "an energetic motivational coach who is direct and upbeat and focuses on small, concrete next steps",
    ),
    (
        "Comedian",
        "a kind-hearted comedian who lifts spirits with gentle humor while still taking the user's feelings seriously",
    ),
    (
        "Philosopher",
        "a thoughtful philosopher who offers perspective with calm reflection and short, memorable insights",
    ),
];

/// Immutable lookup table of personas, keyed by name.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Build a catalog, rejecting duplicate names (case-insensitive) and the
    /// reserved speaker name [`USER_SPEAKER`].
    pub fn new(personas: Vec<Persona>) -> Result<Self, CatalogError> {
        for (i, persona) in personas.iter().enumerate() {
            if persona.name.trim().eq_ignore_ascii_case(USER_SPEAKER) {
                return Err(CatalogError::ReservedKey {
                    catalog: "persona",
                    key: persona.name.clone(),
                });
            }
            if personas[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&persona.name))
            {
                return Err(CatalogError::DuplicateKey {
                    catalog: "persona",
                    key: persona.name.clone(),
                });
            }
        }
        Ok(Self { personas })
    }

    pub fn builtin() -> Self {
        Self {
            personas: BUILTIN_PERSONAS
                .iter()
                .map(|(name, tone)| Persona::new(*name, *tone))
                .collect(),
        }
    }

    /// Look up a persona by name (case-insensitive).
    pub fn resolve(&self, key: &str) -> Result<&Persona, CatalogError> {
        let key = key.trim();
        self.personas
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| CatalogError::unknown("persona", key))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.personas.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_expected_personas() {
        let catalog = PersonaCatalog::builtin();
        let names: Vec<&str> = catalog.names().collect();
        assert!(names.contains(&"Therapist"));
        assert!(names.contains(&"Friend"));
        assert_eq!(catalog.len(), BUILTIN_PERSONAS.len());
    }

    #[test]
    fn test_resolve_returns_tone() {
        let catalog = PersonaCatalog::builtin();
        let friend = catalog.resolve("friend").unwrap();
        assert_eq!(friend.name, "Friend");
        assert!(friend.tone.contains("best friend"));
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(
            catalog.resolve("Wizard").unwrap_err(),
            CatalogError::unknown("persona", "Wizard")
        );
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = PersonaCatalog::new(vec![
            Persona::new("Buddy", "a"),
            Persona::new("buddy", "b"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateKey {
                catalog: "persona",
                key: "buddy".into(),
            }
        );
    }

    #[test]
    fn test_new_rejects_user_name_in_any_case() {
        for name in ["User", "user", " USER "] {
            let result = PersonaCatalog::new(vec![Persona::new(name, "sneaky")]);
            assert!(
                matches!(result, Err(CatalogError::ReservedKey { .. })),
                "{:?} accepted",
                name
            );
        }
    }
}
