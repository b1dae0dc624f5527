use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidState, Result};
use crate::index::{IndexState, InvertedIndex};
use crate::source::TokenSource;
use crate::stats::TokenStats;

/// How a query is scored against each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringStrategy {
    /// `Σ weight[cat][t] * tf[t] * idf[t]^2` over in-vocabulary tokens.
    #[default]
    CosineTfIdf,
    /// Multinomial log-likelihood with add-one smoothing plus the log category prior.
    BayesLike,
    /// `CosineTfIdf` scaled by the fraction of training documents in the category.
    PriorWeighted,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringStrategy::CosineTfIdf => "cosine-tfidf",
            ScoringStrategy::BayesLike => "bayes-like",
            ScoringStrategy::PriorWeighted => "prior-weighted",
        };
        f.write_str(name)
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cosine-tfidf" | "cosine" => Ok(ScoringStrategy::CosineTfIdf),
            "bayes-like" | "bayes" => Ok(ScoringStrategy::BayesLike),
            "prior-weighted" | "prior" => Ok(ScoringStrategy::PriorWeighted),
            other => Err(format!("unknown scoring strategy `{other}` (expected cosine-tfidf, bayes-like or prior-weighted)")),
        }
    }
}

/// Predicted label for one queried document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub document: String,
    pub label: String,
}

impl ScoringStrategy {
    fn score(self, index: &InvertedIndex, category: &str, category_docs: u64, query: &[(&TokenStats, u32)]) -> f64 {
        let prior = category_docs as f64 / index.total_documents as f64;
        match self {
            ScoringStrategy::CosineTfIdf => cosine(category, query),
            ScoringStrategy::PriorWeighted => cosine(category, query) * prior,
            ScoringStrategy::BayesLike => {
                let denominator =
                    (index.category_token_count(category).unwrap_or(0) + index.vocabulary_size() as u64) as f64;
                query.iter().fold(prior.ln(), |acc, (stats, tf)| {
                    let count = stats.term_frequency(category).unwrap_or(0) as f64;
                    acc + *tf as f64 * ((count + 1.0) / denominator).ln()
                })
            }
        }
    }
}

fn cosine(category: &str, query: &[(&TokenStats, u32)]) -> f64 {
    query
        .iter()
        .filter_map(|(stats, tf)| stats.weight(category).map(|w| w * *tf as f64 * stats.idf() * stats.idf()))
        .sum()
}

/// First category with a strictly greater score wins, so ties resolve to the
/// lexicographically smallest label. Non-finite scores never win.
fn arg_max<'a>(scores: &[(&'a str, f64)]) -> Option<&'a str> {
    let mut best: Option<(&'a str, f64)> = None;
    for &(category, score) in scores.iter().filter(|(_, score)| score.is_finite()) {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((category, score)),
        }
    }
    best.map(|(category, _)| category)
}

impl InvertedIndex {
    fn ensure_queryable(&self) -> Result<()> {
        match self.state {
            IndexState::Normalized if self.category_document_count.is_empty() => Err(InvalidState::NoCategories.into()),
            IndexState::Normalized => Ok(()),
            IndexState::Built if self.total_documents == 0 => Err(InvalidState::EmptyCorpus.into()),
            IndexState::Built => Err(InvalidState::NotNormalized.into()),
            IndexState::Training => Err(InvalidState::NotBuilt.into()),
        }
    }

    /// Score `tokens` against every category, in ascending category order.
    /// Tokens absent from the index contribute nothing.
    pub fn similarities(&self, tokens: &[String], strategy: ScoringStrategy) -> Result<Vec<(&str, f64)>> {
        self.ensure_queryable()?;
        let mut doc_tf: BTreeMap<&str, u32> = BTreeMap::new();
        for token in tokens {
            *doc_tf.entry(token.as_str()).or_insert(0) += 1;
        }
        let query: Vec<(&TokenStats, u32)> = doc_tf
            .into_iter()
            .filter_map(|(token, tf)| self.token(token).map(|stats| (stats, tf)))
            .collect();

        Ok(self
            .category_document_count
            .iter()
            .map(|(category, &docs)| (category.as_str(), strategy.score(self, category, docs, &query)))
            .collect())
    }

    pub fn classify_with(&self, tokens: &[String], strategy: ScoringStrategy) -> Result<String> {
        let scores = self.similarities(tokens, strategy)?;
        match arg_max(&scores) {
            Some(label) => Ok(label.to_string()),
            None if scores.is_empty() => Err(InvalidState::NoCategories.into()),
            None => Err(InvalidState::NonFiniteScores.into()),
        }
    }

    /// Label with the highest TF-IDF similarity to `tokens`.
    pub fn classify(&self, tokens: &[String]) -> Result<String> {
        self.classify_with(tokens, ScoringStrategy::CosineTfIdf)
    }

    /// Classify each referenced document on the rayon pool. Results keep the input
    /// order; the first document that fails to tokenize aborts the batch. The source
    /// must tokenize with the settings stored in the index.
    pub fn classify_batch<S: TokenSource + ?Sized>(
        &self,
        documents: &[String],
        source: &S,
        strategy: ScoringStrategy,
    ) -> Result<Vec<Classification>> {
        self.ensure_queryable()?;
        self.ensure_same_tokenizer(source.config())?;
        documents
            .par_iter()
            .map(|document| -> Result<Classification> {
                let tokens = source.tokens(document)?;
                let label = self.classify_with(&tokens, strategy)?;
                Ok(Classification { document: document.clone(), label })
            })
            .collect()
    }
}
