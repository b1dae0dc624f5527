use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ClassifierError, Result};
use crate::tokenizer::{Tokenizer, TokenizerConfig};

/// Loads the token sequence of a referenced document.
pub trait TokenSource: Sync {
    fn tokens(&self, document: &str) -> Result<Vec<String>>;

    /// Tokenizer settings applied by `tokens`.
    fn config(&self) -> &TokenizerConfig;
}

/// Reads documents from disk, resolving relative references against a base directory.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    base_dir: PathBuf,
    tokenizer: Tokenizer,
}

impl FileTokenSource {
    pub fn new<P: AsRef<Path>>(base_dir: P, config: TokenizerConfig) -> Self {
        Self { base_dir: base_dir.as_ref().to_path_buf(), tokenizer: Tokenizer::new(config) }
    }

    pub fn resolve(&self, document: &str) -> PathBuf { self.base_dir.join(document) }
}

impl TokenSource for FileTokenSource {
    fn tokens(&self, document: &str) -> Result<Vec<String>> {
        let text = fs::read_to_string(self.resolve(document))
            .map_err(|e| ClassifierError::tokenization(document, e))?;
        Ok(self.tokenizer.tokenize(&text))
    }

    fn config(&self) -> &TokenizerConfig { self.tokenizer.config() }
}

/// Documents held in memory, keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: HashMap<String, String>,
    tokenizer: Tokenizer,
}

impl InMemorySource {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { documents: HashMap::new(), tokenizer: Tokenizer::new(config) }
    }

    pub fn with_document(mut self, reference: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(reference, content);
        self
    }

    pub fn insert(&mut self, reference: impl Into<String>, content: impl Into<String>) {
        self.documents.insert(reference.into(), content.into());
    }
}

impl TokenSource for InMemorySource {
    fn tokens(&self, document: &str) -> Result<Vec<String>> {
        match self.documents.get(document) {
            Some(content) => Ok(self.tokenizer.tokenize(content)),
            None => Err(ClassifierError::tokenization(
                document,
                io::Error::new(io::ErrorKind::NotFound, "no such document"),
            )),
        }
    }

    fn config(&self) -> &TokenizerConfig { self.tokenizer.config() }
}
