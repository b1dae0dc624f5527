use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrences of a token within one category together with its weight.
/// The weight equals the raw count until the index is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTerm {
    pub count: u32,
    pub weight: f64,
}

/// Statistics of a single token across the training corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenStats {
    term_frequency: BTreeMap<String, CategoryTerm>,
    document_frequency: u32,
    idf: f64,
}

impl TokenStats {
    pub fn new() -> Self { Self::default() }

    /// Record `occurrences` of this token in one document of `category`.
    pub(crate) fn record_document(&mut self, category: &str, occurrences: u32) {
        match self.term_frequency.get_mut(category) {
            Some(term) => {
                term.count += occurrences;
                term.weight = term.count as f64;
            }
            None => {
                self.term_frequency.insert(
                    category.to_string(),
                    CategoryTerm { count: occurrences, weight: occurrences as f64 },
                );
            }
        }
        self.document_frequency += 1;
    }

    /// `idf = ln(N / df)`. Every stored token was seen in at least one document.
    pub(crate) fn set_idf(&mut self, total_documents: u64) {
        debug_assert!(self.document_frequency > 0);
        self.idf = (total_documents as f64 / self.document_frequency as f64).ln();
    }

    pub(crate) fn weights_mut(&mut self) -> impl Iterator<Item = (&String, &mut f64)> {
        self.term_frequency.iter_mut().map(|(cat, term)| (cat, &mut term.weight))
    }

    /// Raw occurrence count in `category`, `None` when the token never occurred there.
    pub fn term_frequency(&self, category: &str) -> Option<u32> {
        self.term_frequency.get(category).map(|t| t.count)
    }

    /// Current weight in `category`: the raw count before normalization and the
    /// unit-scaled weight after.
    pub fn weight(&self, category: &str) -> Option<f64> {
        self.term_frequency.get(category).map(|t| t.weight)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryTerm)> {
        self.term_frequency.iter().map(|(cat, term)| (cat.as_str(), term))
    }

    pub fn document_frequency(&self) -> u32 { self.document_frequency }

    pub fn idf(&self) -> f64 { self.idf }
}
