//! Line-oriented manifests: `<document> <category>` for training, `<document>` for queries.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ClassifierError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingEntry {
    pub document: String,
    pub category: String,
}

impl TrainingEntry {
    pub fn new(document: impl Into<String>, category: impl Into<String>) -> Self {
        Self { document: document.into(), category: category.into() }
    }
}

pub fn parse_training_manifest(text: &str) -> Result<Vec<TrainingEntry>> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [document, category] => entries.push(TrainingEntry::new(*document, *category)),
            _ => {
                return Err(ClassifierError::Manifest {
                    line: i + 1,
                    reason: format!("expected `<document> <category>`, found {} fields", fields.len()),
                })
            }
        }
    }
    Ok(entries)
}

/// Query manifests list one document per line; anything after the first field is ignored.
pub fn parse_query_manifest(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Read a manifest file, returning its text and the directory documents are resolved against.
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<(String, PathBuf)> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((text, base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_manifest_skips_blank_lines() {
        let entries = parse_training_manifest("a.txt sports\n\n  b.txt\tpolitics \n").unwrap();
        assert_eq!(entries, vec![TrainingEntry::new("a.txt", "sports"), TrainingEntry::new("b.txt", "politics")]);
    }

    #[test]
    fn training_manifest_rejects_malformed_line() {
        let err = parse_training_manifest("a.txt sports\nb.txt\n").unwrap_err();
        match err {
            ClassifierError::Manifest { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn query_manifest_takes_first_field() {
        let docs = parse_query_manifest("x.txt\n\ny.txt sports\n");
        assert_eq!(docs, vec!["x.txt", "y.txt"]);
    }
}
