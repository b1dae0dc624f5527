use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Lifecycle violations on an `InvertedIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidState {
    #[error("index was built from an empty corpus")]
    EmptyCorpus,
    #[error("index has not been built")]
    NotBuilt,
    #[error("index has already been built")]
    AlreadyBuilt,
    #[error("weights have not been normalized")]
    NotNormalized,
    #[error("weights have already been normalized")]
    AlreadyNormalized,
    #[error("index has no categories")]
    NoCategories,
    #[error("token source tokenizer settings differ from the index")]
    TokenizerMismatch,
    #[error("no category produced a finite similarity score")]
    NonFiniteScores,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to tokenize document {document}: {source}")]
    Tokenization {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid index state: {0}")]
    InvalidState(#[from] InvalidState),

    #[error("malformed index snapshot: {0}")]
    Format(String),

    #[error("manifest line {line}: {reason}")]
    Manifest { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl ClassifierError {
    pub fn tokenization(document: impl Into<String>, source: std::io::Error) -> Self {
        ClassifierError::Tokenization { document: document.into(), source }
    }
}
