use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{InvalidState, Result};
use crate::manifest::TrainingEntry;
use crate::source::TokenSource;
use crate::stats::TokenStats;
use crate::tokenizer::TokenizerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexState {
    /// Freshly constructed, nothing ingested.
    Training,
    /// Counts and IDF computed, weights still raw.
    Built,
    /// Weights unit-scaled per category; read-only from here on.
    Normalized,
}

/// Outcome of `InvertedIndex::normalize_weights`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationReport {
    /// Euclidean norm of `count * idf` per category, before division.
    pub constants: BTreeMap<String, f64>,
    /// Categories whose norm was zero and were left unscaled.
    pub zero_weight_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub(crate) token_stats: HashMap<String, TokenStats>,
    pub(crate) category_document_count: BTreeMap<String, u64>,
    pub(crate) category_token_count: BTreeMap<String, u64>,
    pub(crate) total_documents: u64,
    pub(crate) config: TokenizerConfig,
    pub(crate) state: IndexState,
}

impl Default for InvertedIndex {
    fn default() -> Self { Self::new(TokenizerConfig::default()) }
}

/// Counts gathered during a build, committed to the index only when every document succeeded.
#[derive(Default)]
struct Accumulator {
    token_stats: HashMap<String, TokenStats>,
    category_document_count: BTreeMap<String, u64>,
    category_token_count: BTreeMap<String, u64>,
    total_documents: u64,
}

impl Accumulator {
    fn ingest(&mut self, category: &str, tokens: &[String]) {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        for (token, occurrences) in counts {
            match self.token_stats.get_mut(token) {
                Some(stats) => stats.record_document(category, occurrences),
                None => {
                    let mut stats = TokenStats::new();
                    stats.record_document(category, occurrences);
                    self.token_stats.insert(token.to_string(), stats);
                }
            }
        }
        *self.category_document_count.entry(category.to_string()).or_insert(0) += 1;
        *self.category_token_count.entry(category.to_string()).or_insert(0) += tokens.len() as u64;
        self.total_documents += 1;
    }
}

impl InvertedIndex {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            token_stats: HashMap::new(),
            category_document_count: BTreeMap::new(),
            category_token_count: BTreeMap::new(),
            total_documents: 0,
            config,
            state: IndexState::Training,
        }
    }

    /// Ingest every `(document, category)` pair in order, then compute IDF values.
    /// The first document that fails to tokenize aborts the build and leaves the index untouched.
    pub fn build_index<S: TokenSource + ?Sized>(&mut self, manifest: &[TrainingEntry], source: &S) -> Result<()> {
        self.ensure_training()?;
        self.ensure_same_tokenizer(source.config())?;
        let mut acc = Accumulator::default();
        for entry in manifest {
            let tokens = source.tokens(&entry.document)?;
            tracing::debug!(document = %entry.document, category = %entry.category, tokens = tokens.len(), "ingested document");
            acc.ingest(&entry.category, &tokens);
        }
        self.commit(acc);
        Ok(())
    }

    /// Same result as `build_index`; documents are tokenized on the rayon pool and
    /// aggregated in a single sequential pass.
    pub fn build_index_parallel<S: TokenSource + ?Sized>(&mut self, manifest: &[TrainingEntry], source: &S) -> Result<()> {
        self.ensure_training()?;
        self.ensure_same_tokenizer(source.config())?;
        let tokenized: Vec<Vec<String>> = manifest
            .par_iter()
            .map(|entry| source.tokens(&entry.document))
            .collect::<Result<_>>()?;
        let mut acc = Accumulator::default();
        for (entry, tokens) in manifest.iter().zip(&tokenized) {
            acc.ingest(&entry.category, tokens);
        }
        self.commit(acc);
        Ok(())
    }

    fn ensure_training(&self) -> Result<()> {
        match self.state {
            IndexState::Training => Ok(()),
            _ => Err(InvalidState::AlreadyBuilt.into()),
        }
    }

    /// Tokens must come from the settings recorded in the index, or stored keys and
    /// later queries would disagree.
    pub(crate) fn ensure_same_tokenizer(&self, config: &TokenizerConfig) -> Result<()> {
        if *config == self.config {
            Ok(())
        } else {
            Err(InvalidState::TokenizerMismatch.into())
        }
    }

    /// Structural invariants every index produced by this crate satisfies.
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        let counted: u64 = self.category_document_count.values().sum();
        if counted != self.total_documents {
            return Err(format!("category document counts sum to {counted}, total is {}", self.total_documents));
        }
        if let Some((category, _)) = self.category_document_count.iter().find(|(_, n)| **n == 0) {
            return Err(format!("category `{category}` has no documents"));
        }
        if !self.category_token_count.keys().eq(self.category_document_count.keys()) {
            return Err("category token totals do not cover the same categories".into());
        }
        match self.state {
            IndexState::Training if self.total_documents > 0 || !self.token_stats.is_empty() => {
                return Err("untrained index carries counts".into())
            }
            IndexState::Normalized if self.total_documents == 0 => {
                return Err("normalized index has no documents".into())
            }
            _ => {}
        }
        for (token, stats) in &self.token_stats {
            let df = stats.document_frequency() as u64;
            if df == 0 || df > self.total_documents {
                return Err(format!("token `{token}` has document frequency {df}"));
            }
            if !stats.idf().is_finite() {
                return Err(format!("token `{token}` has a non-finite idf"));
            }
            for (category, term) in stats.categories() {
                if !self.category_document_count.contains_key(category) {
                    return Err(format!("token `{token}` counted in unknown category `{category}`"));
                }
                if term.count == 0 || !term.weight.is_finite() {
                    return Err(format!("token `{token}` has an invalid entry for `{category}`"));
                }
            }
        }
        Ok(())
    }

    fn commit(&mut self, acc: Accumulator) {
        let Accumulator { mut token_stats, category_document_count, category_token_count, total_documents } = acc;
        for stats in token_stats.values_mut() {
            stats.set_idf(total_documents);
        }
        self.token_stats = token_stats;
        self.category_document_count = category_document_count;
        self.category_token_count = category_token_count;
        self.total_documents = total_documents;
        self.state = IndexState::Built;

        if total_documents == 0 {
            tracing::warn!("training manifest contained no documents");
        }
        tracing::info!(
            num_docs = total_documents,
            num_terms = self.token_stats.len(),
            num_categories = self.category_document_count.len(),
            "index built"
        );
    }

    /// Scale every category's `count * idf` vector to unit length.
    ///
    /// Runs exactly once per index: the division is destructive, so a second call is
    /// rejected with `InvalidState::AlreadyNormalized`. All norms are computed before
    /// any weight is divided. Categories with a zero norm keep their raw weights and
    /// are listed in the report.
    pub fn normalize_weights(&mut self) -> Result<NormalizationReport> {
        match self.state {
            IndexState::Training => return Err(InvalidState::NotBuilt.into()),
            IndexState::Normalized => return Err(InvalidState::AlreadyNormalized.into()),
            IndexState::Built => {}
        }
        if self.total_documents == 0 {
            return Err(InvalidState::EmptyCorpus.into());
        }

        let mut sums: BTreeMap<String, f64> =
            self.category_document_count.keys().map(|cat| (cat.clone(), 0.0)).collect();
        for stats in self.token_stats.values() {
            let idf = stats.idf();
            for (category, term) in stats.categories() {
                if let Some(sum) = sums.get_mut(category) {
                    let weight = term.weight * idf;
                    *sum += weight * weight;
                }
            }
        }
        let constants: BTreeMap<String, f64> = sums.into_iter().map(|(cat, sum)| (cat, sum.sqrt())).collect();

        let zero_weight_categories: Vec<String> =
            constants.iter().filter(|(_, norm)| **norm == 0.0).map(|(cat, _)| cat.clone()).collect();
        for category in &zero_weight_categories {
            tracing::warn!(%category, "category has zero total weight; leaving its weights unscaled");
        }

        for stats in self.token_stats.values_mut() {
            for (category, weight) in stats.weights_mut() {
                if let Some(&norm) = constants.get(category) {
                    if norm > 0.0 {
                        *weight /= norm;
                    }
                }
            }
        }
        self.state = IndexState::Normalized;
        tracing::info!(num_categories = constants.len(), zero_weight = zero_weight_categories.len(), "weights normalized");
        Ok(NormalizationReport { constants, zero_weight_categories })
    }

    /// Statistics for `token`, `None` when it never occurred in training.
    pub fn token(&self, token: &str) -> Option<&TokenStats> { self.token_stats.get(token) }

    pub fn tokens(&self) -> impl Iterator<Item = (&str, &TokenStats)> {
        self.token_stats.iter().map(|(t, s)| (t.as_str(), s))
    }

    /// Category labels in ascending order, the order used for scoring and tie-breaking.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_document_count.keys().map(String::as_str)
    }

    pub fn category_document_count(&self, category: &str) -> Option<u64> {
        self.category_document_count.get(category).copied()
    }

    pub fn category_document_counts(&self) -> &BTreeMap<String, u64> { &self.category_document_count }

    /// Total number of tokens (with repetition) ingested for `category`.
    pub fn category_token_count(&self, category: &str) -> Option<u64> {
        self.category_token_count.get(category).copied()
    }

    pub fn total_documents(&self) -> u64 { self.total_documents }

    pub fn vocabulary_size(&self) -> usize { self.token_stats.len() }

    pub fn config(&self) -> &TokenizerConfig { &self.config }

    pub fn state(&self) -> IndexState { self.state }
}
