// File: src/core/relevance.rs
use crate::core::normalize::normalize;
use crate::core::types::Entry;
use std::collections::{HashMap, HashSet};

/// Single-shot TF-IDF scorer over word, meaning and tags.
///
/// A term "occurs" in an entry when it is a substring of any normalized field;
/// term frequency counts non-overlapping occurrences across all fields.
/// `idf(t) = ln((N + 1) / (max(df, 1) + 1)) + 1`.
///
/// Only entries scoring above zero are returned, best first, ties in corpus
/// order, at most `limit`.
pub fn rank<'a>(query: &str, corpus: impl IntoIterator<Item = &'a Entry>, limit: usize) -> Vec<&'a Entry> {
    if query.trim().is_empty() {
        return vec![];
    }
    let terms = tokenize(query);
    if terms.is_empty() {
        return vec![];
    }

    let docs: Vec<(&Entry, Vec<String>)> = corpus
        .into_iter()
        .map(|e| (e, normalized_fields(e)))
        .collect();
    let n = docs.len() as f64;

    let distinct: HashSet<&str> = terms.iter().map(String::as_str).collect();
    let mut idf: HashMap<&str, f64> = HashMap::with_capacity(distinct.len());
    for &t in &distinct {
        let df = docs
            .iter()
            .filter(|(_, fields)| term_frequency(fields, t) > 0)
            .count()
            .max(1) as f64;
        idf.insert(t, ((n + 1.0) / (df + 1.0)).ln() + 1.0);
    }

    let mut scored: Vec<(&Entry, f64)> = docs
        .iter()
        .map(|(e, fields)| {
            // Repeated query terms are summed again on purpose.
            let score = terms
                .iter()
                .map(|t| term_frequency(fields, t) as f64 * idf[t.as_str()])
                .sum::<f64>();
            (*e, score)
        })
        .filter(|&(_, score)| score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(limit).map(|(e, _)| e).collect()
}

/// Lowercase, split on runs of anything but ASCII letters and digits.
/// Duplicates are kept.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalized_fields(entry: &Entry) -> Vec<String> {
    std::iter::once(entry.word.as_str())
        .chain(std::iter::once(entry.meaning.as_str()))
        .chain(entry.tags.iter().map(String::as_str))
        .map(normalize)
        .collect()
}

fn term_frequency(fields: &[String], term: &str) -> usize {
    fields.iter().map(|f| f.matches(term).count()).sum()
}
