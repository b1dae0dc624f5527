use anyhow::{bail, Context, Result};
use classifier_core::manifest::read_manifest;
use classifier_core::persist::{IndexDir, MetaFile};
use classifier_core::{
    parse_query_manifest, parse_training_manifest, Classification, FileTokenSource, InvertedIndex, ScoringStrategy,
    TokenizerConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Build, normalize and persist an index from a labeled manifest.
pub fn train(manifest: &Path, output: &Path, config: TokenizerConfig, parallel: bool) -> Result<MetaFile> {
    let (text, base) = read_manifest(manifest).with_context(|| format!("reading {}", manifest.display()))?;
    let entries = parse_training_manifest(&text)?;
    if entries.is_empty() {
        bail!("training manifest {} lists no documents", manifest.display());
    }

    let source = FileTokenSource::new(&base, config);
    let mut index = InvertedIndex::new(config);
    if parallel {
        index.build_index_parallel(&entries, &source)?;
    } else {
        index.build_index(&entries, &source)?;
    }
    index.normalize_weights()?;

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    let meta = IndexDir::new(output)
        .save(&index, created_at)
        .with_context(|| format!("writing index to {}", output.display()))?;

    tracing::info!(output = %output.display(), num_docs = meta.num_docs, "training complete");
    Ok(meta)
}

fn load(index_dir: &Path) -> Result<InvertedIndex> {
    IndexDir::new(index_dir).load().with_context(|| format!("loading index from {}", index_dir.display()))
}

/// Classify every document of a query manifest and write `<document> <label>` lines.
pub fn classify(index_dir: &Path, manifest: &Path, output: &Path, strategy: ScoringStrategy) -> Result<Vec<Classification>> {
    let index = load(index_dir)?;
    let (text, base) = read_manifest(manifest).with_context(|| format!("reading {}", manifest.display()))?;
    let documents = parse_query_manifest(&text);
    let source = FileTokenSource::new(&base, *index.config());
    let results = index.classify_batch(&documents, &source, strategy)?;

    let mut out = BufWriter::new(File::create(output).with_context(|| format!("creating {}", output.display()))?);
    for c in &results {
        writeln!(out, "{} {}", c.document, c.label)?;
    }
    out.flush()?;
    tracing::info!(documents = results.len(), %strategy, "classification complete");
    Ok(results)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub total: usize,
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub strategy: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub per_category: BTreeMap<String, CategoryScore>,
}

/// Classify a labeled manifest and compare predictions with the gold labels.
pub fn evaluate(index_dir: &Path, manifest: &Path, strategy: ScoringStrategy) -> Result<EvaluationReport> {
    let index = load(index_dir)?;
    let (text, base) = read_manifest(manifest).with_context(|| format!("reading {}", manifest.display()))?;
    let entries = parse_training_manifest(&text)?;
    let documents: Vec<String> = entries.iter().map(|e| e.document.clone()).collect();
    let source = FileTokenSource::new(&base, *index.config());
    let predictions = index.classify_batch(&documents, &source, strategy)?;

    let mut per_category: BTreeMap<String, CategoryScore> = BTreeMap::new();
    let mut correct = 0;
    for (entry, predicted) in entries.iter().zip(&predictions) {
        let score = per_category.entry(entry.category.clone()).or_default();
        score.total += 1;
        if predicted.label == entry.category {
            score.correct += 1;
            correct += 1;
        }
    }
    let total = entries.len();
    let accuracy = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    tracing::info!(total, correct, accuracy, %strategy, "evaluation complete");
    Ok(EvaluationReport { strategy: strategy.to_string(), total, correct, accuracy, per_category })
}
