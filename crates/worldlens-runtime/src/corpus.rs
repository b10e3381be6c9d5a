//! Corpus sources.
//!
//! A corpus source yields documents for one pipeline run. It may yield
//! zero documents; every downstream stage handles the empty corpus by
//! producing empty output.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use worldlens_core::{Document, Error, Result};

/// Supplies the documents for a pipeline run.
pub trait CorpusSource {
    fn load(&self) -> Result<Vec<Document>>;
}

/// Reads every `*.txt` file in a directory.
///
/// Files are processed in name order and the file stem becomes the
/// source id, so a directory loads identically run-to-run. Unreadable
/// files are skipped with a warning rather than failing the corpus.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CorpusSource for DirectorySource {
    fn load(&self) -> Result<Vec<Document>> {
        if !self.dir.is_dir() {
            return Err(Error::Corpus(format!(
                "not a directory: {}",
                self.dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(source = %stem, bytes = text.len(), "loaded transcript");
                    documents.push(Document::new(stem.clone(), text).with_title(stem));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable transcript");
                }
            }
        }
        Ok(documents)
    }
}

/// An explicit in-memory document list.
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl CorpusSource for MemorySource {
    fn load(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Load a corpus from a directory path.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>> {
    DirectorySource::new(dir).load()
}
