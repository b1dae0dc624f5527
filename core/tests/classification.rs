use classifier_core::{
    ClassifierError, InMemorySource, InvalidState, InvertedIndex, ScoringStrategy, TokenizerConfig, TrainingEntry,
};

fn toks(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn corpus() -> (Vec<TrainingEntry>, InMemorySource) {
    let source = InMemorySource::new(TokenizerConfig::default())
        .with_document("docA", "ball game ball")
        .with_document("docB", "game score")
        .with_document("docC", "election vote election");
    let manifest = vec![
        TrainingEntry::new("docA", "sports"),
        TrainingEntry::new("docB", "sports"),
        TrainingEntry::new("docC", "politics"),
    ];
    (manifest, source)
}

fn trained() -> InvertedIndex {
    let (manifest, source) = corpus();
    let mut index = InvertedIndex::default();
    index.build_index(&manifest, &source).unwrap();
    index.normalize_weights().unwrap();
    index
}

#[test]
fn build_counts_match_hand_tally() {
    let (manifest, source) = corpus();
    let mut index = InvertedIndex::default();
    index.build_index(&manifest, &source).unwrap();

    let ball = index.token("ball").unwrap();
    assert_eq!(ball.term_frequency("sports"), Some(2));
    assert_eq!(ball.term_frequency("politics"), None);
    assert_eq!(ball.document_frequency(), 1);
    assert_eq!(index.token("game").unwrap().document_frequency(), 2);

    assert_eq!(index.category_document_count("sports"), Some(2));
    assert_eq!(index.category_document_count("politics"), Some(1));
    assert_eq!(index.total_documents(), 3);
    let sum: u64 = index.category_document_counts().values().sum();
    assert_eq!(sum, index.total_documents());
    assert!(index.token("missing").is_none());
}

#[test]
fn term_frequency_keys_are_known_categories() {
    let index = trained();
    for (_, stats) in index.tokens() {
        for (category, _) in stats.categories() {
            assert!(index.category_document_count(category).is_some());
        }
    }
}

#[test]
fn normalized_categories_have_unit_norm() {
    let index = trained();
    for category in index.categories() {
        let sq: f64 = index
            .tokens()
            .filter_map(|(_, s)| s.weight(category).map(|w| (w * s.idf()).powi(2)))
            .sum();
        assert!((sq.sqrt() - 1.0).abs() < 1e-9, "{category} norm {}", sq.sqrt());
    }
}

#[test]
fn query_is_classified_as_sports_with_expected_scores() {
    let index = trained();
    let l = 3f64.ln();
    let g = 1.5f64.ln();
    let sports_norm = (5.0 * l * l + 4.0 * g * g).sqrt();
    let politics_norm = 5f64.sqrt() * l;
    let expected_sports = (2.0 / sports_norm) * 2.0 * l * l;
    let expected_politics = (2.0 / politics_norm) * 1.0 * l * l;

    let query = toks(&["ball", "ball", "election"]);
    let scores = index.similarities(&query, ScoringStrategy::CosineTfIdf).unwrap();
    assert_eq!(scores.len(), 2);
    let (politics, sports) = (scores[0], scores[1]);
    assert_eq!(politics.0, "politics");
    assert_eq!(sports.0, "sports");
    assert!((sports.1 - expected_sports).abs() < 1e-9);
    assert!((politics.1 - expected_politics).abs() < 1e-9);
    assert!(sports.1 > politics.1);

    assert_eq!(index.classify(&query).unwrap(), "sports");
}

#[test]
fn universal_token_has_zero_idf_and_no_influence() {
    let source = InMemorySource::new(TokenizerConfig::default())
        .with_document("a", "news ball")
        .with_document("b", "news vote");
    let manifest = vec![TrainingEntry::new("a", "sports"), TrainingEntry::new("b", "politics")];
    let mut index = InvertedIndex::default();
    index.build_index(&manifest, &source).unwrap();
    index.normalize_weights().unwrap();

    assert_eq!(index.token("news").unwrap().idf(), 0.0);
    let scores = index.similarities(&toks(&["news", "news"]), ScoringStrategy::CosineTfIdf).unwrap();
    assert!(scores.iter().all(|(_, s)| *s == 0.0));
}

#[test]
fn out_of_vocabulary_query_falls_back_to_first_category() {
    let index = trained();
    let query = toks(&["quantum", "chromodynamics"]);
    let scores = index.similarities(&query, ScoringStrategy::CosineTfIdf).unwrap();
    assert!(scores.iter().all(|(_, s)| *s == 0.0));
    assert_eq!(index.classify(&query).unwrap(), "politics");
    assert_eq!(index.classify(&[]).unwrap(), "politics");
}

#[test]
fn tied_scores_return_one_of_the_maxima() {
    let source = InMemorySource::new(TokenizerConfig::default())
        .with_document("a", "alpha")
        .with_document("b", "beta");
    let manifest = vec![TrainingEntry::new("a", "left"), TrainingEntry::new("b", "right")];
    let mut index = InvertedIndex::default();
    index.build_index(&manifest, &source).unwrap();
    index.normalize_weights().unwrap();

    let query = toks(&["alpha", "beta"]);
    let scores = index.similarities(&query, ScoringStrategy::CosineTfIdf).unwrap();
    let top = scores.iter().map(|(_, s)| *s).fold(f64::MIN, f64::max);
    let label = index.classify(&query).unwrap();
    let winner = scores.iter().find(|(c, _)| *c == label).unwrap();
    assert_eq!(winner.1, top);
    assert_eq!(index.classify(&query).unwrap(), label);
}

#[test]
fn alternative_strategies_agree_on_clear_cases() {
    let index = trained();
    let query = toks(&["ball", "game", "score"]);
    for strategy in [ScoringStrategy::CosineTfIdf, ScoringStrategy::BayesLike, ScoringStrategy::PriorWeighted] {
        assert_eq!(index.classify_with(&query, strategy).unwrap(), "sports", "{strategy}");
    }
    let query = toks(&["election", "vote"]);
    for strategy in [ScoringStrategy::CosineTfIdf, ScoringStrategy::BayesLike, ScoringStrategy::PriorWeighted] {
        assert_eq!(index.classify_with(&query, strategy).unwrap(), "politics", "{strategy}");
    }
}

#[test]
fn bayes_like_matches_smoothed_log_likelihood() {
    let index = trained();
    let scores = index.similarities(&toks(&["ball"]), ScoringStrategy::BayesLike).unwrap();
    // vocabulary: ball game score election vote
    let sports = (2.0f64 / 3.0).ln() + (3.0f64 / (5.0 + 5.0)).ln();
    let politics = (1.0f64 / 3.0).ln() + (1.0f64 / (3.0 + 5.0)).ln();
    assert!((scores[0].1 - politics).abs() < 1e-12);
    assert!((scores[1].1 - sports).abs() < 1e-12);
}

#[test]
fn prior_weighted_scales_cosine_by_category_share() {
    let index = trained();
    let query = toks(&["ball", "election"]);
    let cosine = index.similarities(&query, ScoringStrategy::CosineTfIdf).unwrap();
    let prior = index.similarities(&query, ScoringStrategy::PriorWeighted).unwrap();
    assert!((prior[0].1 - cosine[0].1 / 3.0).abs() < 1e-12);
    assert!((prior[1].1 - cosine[1].1 * 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn batch_keeps_query_order() {
    let index = trained();
    let queries = InMemorySource::new(TokenizerConfig::default())
        .with_document("q1", "vote election")
        .with_document("q2", "ball score")
        .with_document("q3", "election");
    let docs: Vec<String> = ["q1", "q2", "q3"].iter().map(|s| s.to_string()).collect();
    let out = index.classify_batch(&docs, &queries, ScoringStrategy::default()).unwrap();
    let labels: Vec<(&str, &str)> = out.iter().map(|c| (c.document.as_str(), c.label.as_str())).collect();
    assert_eq!(labels, vec![("q1", "politics"), ("q2", "sports"), ("q3", "politics")]);
}

#[test]
fn batch_aborts_on_unreadable_document() {
    let index = trained();
    let queries = InMemorySource::new(TokenizerConfig::default()).with_document("q1", "vote");
    let docs = vec!["q1".to_string(), "gone".to_string()];
    let err = index.classify_batch(&docs, &queries, ScoringStrategy::default()).unwrap_err();
    assert!(matches!(err, ClassifierError::Tokenization { ref document, .. } if document == "gone"));
}

#[test]
fn classify_requires_normalized_index() {
    let (manifest, source) = corpus();
    let mut index = InvertedIndex::default();
    assert!(matches!(
        index.classify(&toks(&["ball"])),
        Err(ClassifierError::InvalidState(InvalidState::NotBuilt))
    ));
    index.build_index(&manifest, &source).unwrap();
    assert!(matches!(
        index.classify(&toks(&["ball"])),
        Err(ClassifierError::InvalidState(InvalidState::NotNormalized))
    ));
}

#[test]
fn batch_rejects_source_with_other_tokenizer_settings() {
    let index = trained();
    let folded = TokenizerConfig { case_insensitive: true, ..Default::default() };
    let source = InMemorySource::new(folded).with_document("q", "Ball game");
    let err = index.classify_batch(&toks(&["q"]), &source, ScoringStrategy::CosineTfIdf).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidState(InvalidState::TokenizerMismatch)));
}
