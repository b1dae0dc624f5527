//! Index snapshots and the on-disk index directory (`index.bin` + `meta.json`).

use crate::error::{ClassifierError, Result};
use crate::index::InvertedIndex;
use crate::tokenizer::TokenizerConfig;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"TCIX";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4;

const SNAPSHOT_FILE: &str = "index.bin";
const META_FILE: &str = "meta.json";

/// Human-readable summary written next to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u64,
    pub num_categories: usize,
    pub num_tokens: usize,
    pub created_at: String,
    pub version: u32,
    pub tokenizer: TokenizerConfig,
}

impl MetaFile {
    pub fn describe(index: &InvertedIndex, created_at: impl Into<String>) -> Self {
        Self {
            num_docs: index.total_documents(),
            num_categories: index.categories().count(),
            num_tokens: index.vocabulary_size(),
            created_at: created_at.into(),
            version: FORMAT_VERSION,
            tokenizer: *index.config(),
        }
    }
}

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding().reject_trailing_bytes()
}

fn encode(index: &InvertedIndex) -> Result<Vec<u8>> {
    let body = bincode_options()
        .serialize(index)
        .map_err(|e| ClassifierError::Format(e.to_string()))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

impl InvertedIndex {
    /// Encode the whole index, learned weights and tokenizer configuration included.
    /// An index whose counts contradict each other is refused.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.check_invariants().map_err(ClassifierError::Format)?;
        encode(self)
    }

    /// Restore an index produced by `serialize`. Anything else, including a well-formed
    /// encoding whose counts are inconsistent, is a `Format` error.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
            return Err(ClassifierError::Format("missing index header".into()));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[MAGIC.len()..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(ClassifierError::Format(format!("unsupported format version {version}")));
        }
        let index: InvertedIndex = bincode_options()
            .deserialize(&bytes[HEADER_LEN..])
            .map_err(|e| ClassifierError::Format(e.to_string()))?;
        index.check_invariants().map_err(ClassifierError::Format)?;
        Ok(index)
    }
}

/// Directory holding a trained index.
#[derive(Debug, Clone)]
pub struct IndexDir {
    root: PathBuf,
}

impl IndexDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn snapshot_path(&self) -> PathBuf { self.root.join(SNAPSHOT_FILE) }

    pub fn meta_path(&self) -> PathBuf { self.root.join(META_FILE) }

    /// Write the snapshot and its summary. Both are encoded before the directory is
    /// touched, so a refused index leaves nothing behind.
    pub fn save(&self, index: &InvertedIndex, created_at: impl Into<String>) -> Result<MetaFile> {
        let snapshot = index.serialize()?;
        let meta = MetaFile::describe(index, created_at);
        let summary = serde_json::to_string_pretty(&meta)?;

        fs::create_dir_all(&self.root)?;
        fs::write(self.snapshot_path(), snapshot)?;
        fs::write(self.meta_path(), summary)?;
        tracing::debug!(root = %self.root.display(), "index saved");
        Ok(meta)
    }

    pub fn load(&self) -> Result<InvertedIndex> {
        InvertedIndex::deserialize(&fs::read(self.snapshot_path())?)
    }

    pub fn load_meta(&self) -> Result<MetaFile> {
        Ok(serde_json::from_str(&fs::read_to_string(self.meta_path())?)?)
    }
}
