//! Export of final advice text as a downloadable artifact.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::utilities::errors::ExportError;
use crate::utilities::file_handler::FileHandler;
use crate::utilities::string_utils::non_blank;

/// Default export directory.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Turns final advice text into an artifact on disk.
pub trait DocumentExporter {
    /// Write `text` and return the artifact path.
    fn export(&self, text: &str) -> Result<PathBuf, ExportError>;
}

/// Writes each export as a new Markdown file in one directory.
#[derive(Debug, Clone)]
pub struct TextFileExporter {
    handler: FileHandler,
}

impl TextFileExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            handler: FileHandler::new(directory),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.handler.directory
    }

    /// `moodlift-<YYYYMMDD-HHMMSS>-<8 hex>.md`
    fn file_name() -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "moodlift-{}-{}.md",
            Utc::now().format("%Y%m%d-%H%M%S"),
            &id[..8]
        )
    }
}

impl Default for TextFileExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_DIR)
    }
}

impl DocumentExporter for TextFileExporter {
    fn export(&self, text: &str) -> Result<PathBuf, ExportError> {
        if non_blank(text).is_none() {
            return Err(ExportError::EmptyDocument);
        }
        let mut content = String::from("# Your Mood Lift\n\n");
        content.push_str(text.trim_end());
        content.push('\n');

        let path = self.handler.save_text(&Self::file_name(), &content)?;
        tracing::info!(path = %path.display(), "exported advice document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = TextFileExporter::new(dir.path().join("nested"));

        let path = exporter.export("## Your Suggestion\n\nTake a walk.").unwrap();
        assert!(path.starts_with(exporter.directory()));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("moodlift-"));
        assert!(name.ends_with(".md"));
        // moodlift- + 15 timestamp chars + - + 8 hex + .md
        assert_eq!(name.len(), 9 + 15 + 1 + 8 + 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Your Mood Lift"));
        assert!(content.contains("Take a walk."));
    }

    #[test]
    fn test_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = TextFileExporter::new(dir.path());
        let first = exporter.export("one").unwrap();
        let second = exporter.export("two").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = TextFileExporter::new(dir.path());
        assert!(matches!(exporter.export("  \n"), Err(ExportError::EmptyDocument)));
    }
}
