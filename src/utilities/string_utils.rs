//! String utility functions.

/// Maximum number of characters kept by [`preview`].
const PREVIEW_LENGTH: usize = 80;

/// Normalize an utterance for exact-match lookups.
///
/// Trims surrounding whitespace and case-folds. Inner whitespace and
/// punctuation are left untouched so matching stays exact.
pub fn normalize_utterance(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Shorten text for log output, appending an ellipsis when cut.
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn preview(text: &str) -> String {
    let single_line = text.replace('\n', " ");
    match single_line.char_indices().nth(PREVIEW_LENGTH) {
        Some((idx, _)) => format!("{}...", &single_line[..idx]),
        None => single_line,
    }
}

/// Return `None` for empty or whitespace-only strings.
pub fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_utterance_folds_case_and_trims() {
        assert_eq!(normalize_utterance("  HeLLo \n"), "hello");
        assert_eq!(normalize_utterance("Thank   You"), "thank   you");
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_cuts_long_text() {
        let long = "é".repeat(200);
        let out = preview(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), PREVIEW_LENGTH + 3);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(" joke "), Some("joke"));
    }
}
