use anyhow::{anyhow, Result};
use categorizer::{classify, evaluate, train};
use clap::{Parser, Subcommand};
use classifier_core::{ScoringStrategy, TokenizerConfig};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "categorizer")]
#[command(about = "Train and apply a TF-IDF text categorizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a manifest of `<document> <category>` lines
    Train {
        /// Labeled training manifest; documents resolve relative to its directory
        #[arg(long)]
        manifest: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Compact tokenizer flags `<case-insensitive><stop-list><pos>`, e.g. 101
        #[arg(long)]
        flags: Option<String>,
        /// Fold case before indexing
        #[arg(long, default_value_t = false)]
        case_insensitive: bool,
        /// Drop common English stopwords
        #[arg(long, default_value_t = false)]
        stop_list: bool,
        /// Key tokens by part-of-speech tag
        #[arg(long, default_value_t = false)]
        pos: bool,
        /// Reduce tokens to their English stem
        #[arg(long, default_value_t = false)]
        stem: bool,
        /// Tokenize documents on all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Label every document of a query manifest
    Classify {
        /// Index directory produced by `train`
        #[arg(long)]
        index: PathBuf,
        /// Query manifest with one document per line
        #[arg(long)]
        manifest: PathBuf,
        /// Output file of `<document> <label>` lines
        #[arg(long)]
        output: PathBuf,
        /// cosine-tfidf, bayes-like or prior-weighted
        #[arg(long, default_value_t = ScoringStrategy::CosineTfIdf)]
        strategy: ScoringStrategy,
    },
    /// Measure accuracy against a labeled manifest
    Evaluate {
        #[arg(long)]
        index: PathBuf,
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long, default_value_t = ScoringStrategy::CosineTfIdf)]
        strategy: ScoringStrategy,
        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn tokenizer_config(flags: Option<&str>, case_insensitive: bool, stop_list: bool, pos: bool, stem: bool) -> Result<TokenizerConfig> {
    let mut config = match flags {
        Some(f) => TokenizerConfig::from_flags(f).ok_or_else(|| anyhow!("invalid tokenizer flags `{f}`, expected three 0/1 digits"))?,
        None => TokenizerConfig::default(),
    };
    config.case_insensitive |= case_insensitive;
    config.use_stop_list |= stop_list;
    config.use_pos |= pos;
    config.stem = stem;
    Ok(config)
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train { manifest, output, flags, case_insensitive, stop_list, pos, stem, parallel } => {
            let config = tokenizer_config(flags.as_deref(), case_insensitive, stop_list, pos, stem)?;
            let meta = train(&manifest, &output, config, parallel)?;
            println!("trained on {} documents, {} categories, {} tokens", meta.num_docs, meta.num_categories, meta.num_tokens);
            Ok(())
        }
        Commands::Classify { index, manifest, output, strategy } => {
            let results = classify(&index, &manifest, &output, strategy)?;
            println!("labeled {} documents into {}", results.len(), output.display());
            Ok(())
        }
        Commands::Evaluate { index, manifest, strategy, json } => {
            let report = evaluate(&index, &manifest, strategy)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}: {}/{} correct ({:.2}%)", report.strategy, report.correct, report.total, report.accuracy * 100.0);
                for (category, score) in &report.per_category {
                    println!("  {category}: {}/{}", score.correct, score.total);
                }
            }
            Ok(())
        }
    }
}
