//! File handler for writing text artifacts into a directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes text files into a fixed directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct FileHandler {
    pub directory: PathBuf,
}

impl FileHandler {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Write `content` to `filename` inside the handler's directory.
    ///
    /// Returns the full path of the written file.
    pub fn save_text(&self, filename: &str, content: &str) -> std::io::Result<PathBuf> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(filename);
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn exists(&self, filename: &str) -> bool {
        Path::new(&self.directory).join(filename).exists()
    }
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_text_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(dir.path().join("nested").join("out"));
        let path = handler.save_text("note.md", "hello").unwrap();
        assert!(handler.exists("note.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
