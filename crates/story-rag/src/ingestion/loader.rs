//! Corpus directory loading

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{CorpusConfig, ReadErrorPolicy};
use crate::error::{Error, Result};
use crate::types::Document;

/// Reads every recognized text file under a directory as one [`Document`]
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    config: CorpusConfig,
}

impl CorpusLoader {
    /// Create a loader
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    /// Load all documents, sorted by source identifier
    pub fn load(&self) -> Result<Vec<Document>> {
        let files = self.discover()?;
        tracing::info!(
            "Found {} corpus files under {}",
            files.len(),
            self.config.data_dir.display()
        );

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let source = self.source_id(&path);
            match read_document(&path, &source) {
                Ok(doc) => {
                    tracing::debug!("Loaded {} ({} bytes)", source, doc.text.len());
                    documents.push(doc);
                }
                Err(err) => match self.config.on_read_error {
                    ReadErrorPolicy::Skip => {
                        tracing::warn!("Skipping corpus file: {}", err);
                    }
                    ReadErrorPolicy::Abort => return Err(err),
                },
            }
        }

        Ok(documents)
    }

    /// List candidate files in a stable order
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.data_dir;
        if !root.is_dir() {
            return Err(Error::corpus_read(
                root.display().to_string(),
                "corpus directory does not exist",
            ));
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::corpus_read(root.display().to_string(), e.to_string())
            })?;
            if entry.file_type().is_file() && self.is_recognized(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    fn source_id(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.data_dir).unwrap_or(path);
        if self.config.recursive {
            relative.to_string_lossy().replace('\\', "/")
        } else {
            relative
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| relative.to_string_lossy().to_string())
        }
    }
}

/// Read one file strictly as UTF-8
fn read_document(path: &Path, source: &str) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|e| Error::corpus_read(source, e.to_string()))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::corpus_read(source, format!("invalid UTF-8: {}", e)))?;
    Ok(Document::new(source, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader(dir: &Path, policy: ReadErrorPolicy) -> CorpusLoader {
        CorpusLoader::new(CorpusConfig {
            data_dir: dir.to_path_buf(),
            on_read_error: policy,
            ..CorpusConfig::default()
        })
    }

    #[test]
    fn test_loads_txt_files_in_name_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "second").unwrap();
        fs::write(tmp.path().join("a.txt"), "first").unwrap();
        fs::write(tmp.path().join("notes.md"), "ignored").unwrap();

        let docs = loader(tmp.path(), ReadErrorPolicy::Skip).load().unwrap();
        let sources: Vec<&str> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].text, "first");
    }

    #[test]
    fn test_non_recursive_ignores_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/deep.txt"), "deep").unwrap();
        fs::write(tmp.path().join("top.txt"), "top").unwrap();

        let docs = loader(tmp.path(), ReadErrorPolicy::Skip).load().unwrap();
        assert_eq!(docs.len(), 1);

        let recursive = CorpusLoader::new(CorpusConfig {
            data_dir: tmp.path().to_path_buf(),
            recursive: true,
            ..CorpusConfig::default()
        });
        let sources: Vec<String> = recursive
            .load()
            .unwrap()
            .into_iter()
            .map(|d| d.source)
            .collect();
        assert_eq!(sources, vec!["nested/deep.txt", "top.txt"]);
    }

    #[test]
    fn test_invalid_utf8_skipped_or_aborted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        fs::write(tmp.path().join("good.txt"), "fine").unwrap();

        let docs = loader(tmp.path(), ReadErrorPolicy::Skip).load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "good.txt");

        let err = loader(tmp.path(), ReadErrorPolicy::Abort).load().unwrap_err();
        match err {
            Error::CorpusRead { source_id, .. } => assert_eq!(source_id, "bad.txt"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = loader(&missing, ReadErrorPolicy::Skip).load().unwrap_err();
        assert!(matches!(err, Error::CorpusRead { .. }));
    }
}
