//! Casual shortcut table.
//!
//! Exact-match canned replies for small talk. A hit bypasses the generation
//! call entirely. Matching folds case and trims surrounding whitespace, and
//! nothing else: no substring or fuzzy matching.

use std::collections::HashMap;

use crate::utilities::string_utils::normalize_utterance;

/// Built-in shortcuts as `(utterance, reply)` pairs.
const BUILTIN_SHORTCUTS: &[(&str, &str)] = &[
    ("hi", "Hi there! How are you feeling today?"),
    ("hello", "Hello! How are you feeling today?"),
    ("hey", "Hey! What's on your mind today?"),
    ("good morning", "Good morning! How are you feeling as the day starts?"),
    ("good evening", "Good evening! How was your day?"),
    ("thanks", "You're welcome! I'm always here if you want to talk."),
    ("thank you", "You're very welcome! I'm glad I could help."),
    ("bye", "Take care of yourself! Come back anytime."),
    ("goodbye", "Goodbye! Be kind to yourself today."),
];

/// Lookup table from normalized utterance to canned reply.
#[derive(Debug, Clone)]
pub struct ShortcutTable {
    entries: HashMap<String, String>,
}

impl ShortcutTable {
    /// Build a table; keys are normalized on insertion.
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize_utterance(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_SHORTCUTS.iter().copied())
    }

    /// Table with no entries; every utterance goes to generation.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the canned reply for `utterance`, if any.
    pub fn match_utterance(&self, utterance: &str) -> Option<&str> {
        self.entries
            .get(&normalize_utterance(utterance))
            .map(String::as_str)
    }

    /// Iterate over `(normalized utterance, reply)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_key_matches_in_any_case() {
        let table = ShortcutTable::builtin();
        for (key, reply) in BUILTIN_SHORTCUTS {
            assert_eq!(table.match_utterance(key), Some(*reply));
            assert_eq!(table.match_utterance(&key.to_uppercase()), Some(*reply));
            assert_eq!(table.match_utterance(&format!("  {}\t\n", key)), Some(*reply));
        }
    }

    #[test]
    fn test_no_partial_or_substring_match() {
        let table = ShortcutTable::builtin();
        assert_eq!(table.match_utterance("hi there"), None);
        assert_eq!(table.match_utterance("h"), None);
        assert_eq!(table.match_utterance("hello!"), None);
        assert_eq!(table.match_utterance("I had a rough day"), None);
        assert_eq!(table.match_utterance(""), None);
    }

    #[test]
    fn test_custom_keys_are_normalized() {
        let table = ShortcutTable::new([("  Yo  ", "Yo! What's up?")]);
        assert_eq!(table.match_utterance("YO"), Some("Yo! What's up?"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table = ShortcutTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.match_utterance("hi"), None);
    }
}
