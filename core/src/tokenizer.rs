use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

use crate::tagger;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","able","about","across","after","all","almost","also","am","among","an","and","any","are","as","at",
            "be","because","been","but","by",
            "can","cannot","could",
            "dear","did","do","does",
            "either","else","ever","every",
            "for","from",
            "get","got",
            "had","has","have","he","her","hers","him","his","how","however",
            "i","if","in","into","is","it","its",
            "just",
            "least","let","like","likely",
            "may","me","might","most","must","my",
            "neither","no","nor","not",
            "of","off","often","on","only","or","other","our","own",
            "rather",
            "said","say","says","she","should","since","so","some",
            "than","that","the","their","them","then","there","these","they","this","tis","to","too","twas",
            "us",
            "wants","was","we","were","what","when","where","which","while","who","whom","why","will","with","would",
            "yet","you","your"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token.to_lowercase().as_str()) }

/// Flags that decide how raw content becomes tokens. Stored inside the index so
/// that scoring uses the same settings as training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub case_insensitive: bool,
    pub use_stop_list: bool,
    pub use_pos: bool,
    pub stem: bool,
}

impl TokenizerConfig {
    /// Parse the compact `<case-insensitive><stop-list><pos>` form, e.g. `"101"`.
    pub fn from_flags(flags: &str) -> Option<Self> {
        let bits: Vec<bool> = flags
            .chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<_>>()?;
        match bits.as_slice() {
            [ci, stop, pos] => Some(Self { case_insensitive: *ci, use_stop_list: *stop, use_pos: *pos, stem: false }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self { Self { config } }

    pub fn config(&self) -> &TokenizerConfig { &self.config }

    /// Tokenize text using NFKC normalization followed by the optional case folding,
    /// stopword removal, stemming and part-of-speech tagging steps.
    /// Tagged tokens take the form `word/TAG`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut normalized = text.nfkc().collect::<String>();
        if self.config.case_insensitive {
            normalized = normalized.to_lowercase();
        }
        let words: Vec<&str> = RE
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|w| !(self.config.use_stop_list && is_stopword(w)))
            .collect();
        let tags = if self.config.use_pos { tagger::tag(&words) } else { Vec::new() };

        let mut tokens = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let mut token = if self.config.stem { STEMMER.stem(word).to_string() } else { word.to_string() };
            if let Some(tag) = tags.get(i) {
                token.push('/');
                token.push_str(tag);
            }
            tokens.push(token);
        }
        tokens
    }
}
