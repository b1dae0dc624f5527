//! TF-IDF category classifier: an inverted index of per-category token weights
//! built once from a labeled corpus and queried many times.

pub mod error;
pub mod index;
pub mod manifest;
pub mod persist;
pub mod scoring;
pub mod source;
pub mod stats;
pub mod tagger;
pub mod tokenizer;

pub use error::{ClassifierError, InvalidState, Result};
pub use index::{IndexState, InvertedIndex, NormalizationReport};
pub use manifest::{parse_query_manifest, parse_training_manifest, TrainingEntry};
pub use scoring::{Classification, ScoringStrategy};
pub use source::{FileTokenSource, InMemorySource, TokenSource};
pub use stats::{CategoryTerm, TokenStats};
pub use tokenizer::{Tokenizer, TokenizerConfig};
