//! Rule-based part-of-speech tagger producing Penn Treebank style tags.
//!
//! The tagger is deterministic: a closed-class lexicon is consulted first,
//! then numeric and capitalization checks, then suffix rules. A single
//! contextual rule promotes a default noun to a base verb after a modal or
//! `to`.

fn closed_class(word: &str) -> Option<&'static str> {
    let tag = match word {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "every" | "each" | "some" | "any" | "no" => "DT",
        "in" | "on" | "at" | "of" | "for" | "with" | "by" | "from" | "into" | "about" | "over" | "under" | "after"
        | "before" | "between" | "during" | "through" | "against" | "among" | "since" | "across" => "IN",
        "to" => "TO",
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "us" | "them" => "PRP",
        "my" | "your" | "his" | "her" | "its" | "our" | "their" => "PRP$",
        "and" | "or" | "but" | "nor" | "yet" => "CC",
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must" => "MD",
        "is" | "has" | "does" => "VBZ",
        "are" | "am" | "have" | "do" => "VBP",
        "was" | "were" | "had" | "did" => "VBD",
        "be" => "VB",
        "been" => "VBN",
        "being" => "VBG",
        "not" | "very" | "too" | "also" | "often" | "never" | "always" => "RB",
        "who" | "what" | "whom" => "WP",
        "which" => "WDT",
        "when" | "where" | "why" | "how" => "WRB",
        _ => return None,
    };
    Some(tag)
}

const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ing", "VBG"),
    ("ed", "VBD"),
    ("ly", "RB"),
    ("est", "JJS"),
    ("ous", "JJ"),
    ("ful", "JJ"),
    ("able", "JJ"),
    ("ible", "JJ"),
    ("ive", "JJ"),
    ("less", "JJ"),
    ("ic", "JJ"),
    ("al", "JJ"),
    ("tion", "NN"),
    ("sion", "NN"),
    ("ment", "NN"),
    ("ness", "NN"),
    ("ity", "NN"),
    ("ism", "NN"),
];

/// Tag each word of a sentence-like sequence. The output has the same length as `words`.
pub fn tag(words: &[&str]) -> Vec<&'static str> {
    let mut tags = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        let prev = if i > 0 { Some(tags[i - 1]) } else { None };
        tags.push(tag_word(word, i, prev));
    }
    tags
}

fn tag_word(word: &str, position: usize, prev: Option<&'static str>) -> &'static str {
    let lower = word.to_lowercase();
    if let Some(tag) = closed_class(&lower) {
        return tag;
    }
    if word.chars().all(|c| c.is_numeric()) {
        return "CD";
    }
    if position > 0 && word.chars().next().map_or(false, char::is_uppercase) {
        return "NNP";
    }
    let suffixed = SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| lower.len() > suffix.len() + 1 && lower.ends_with(suffix))
        .map(|(_, tag)| *tag);
    match suffixed {
        Some(tag) => tag,
        None if matches!(prev, Some("MD") | Some("TO")) => "VB",
        None if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") => "NNS",
        None => "NN",
    }
}
