// File: src/fuzzy/levenshtein.rs
use crate::core::normalize::normalize;

/// Classic Levenshtein distance (unit-cost insert, delete, substitute) over
/// chars. Inputs are compared as given; normalize first for normalized-space
/// distances.
///
/// Two rolling rows of `len(b) + 1`: O(|a|·|b|) time, O(|b|) space.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1) // deletion
                .min(curr[j] + 1) // insertion
                .min(prev[j] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Words within `max_distance` of `query` in normalized space, closest first.
/// Ties keep corpus order. At most `limit` results.
pub fn filtered_fuzzy_match<'a>(
    query: &str,
    words: impl IntoIterator<Item = &'a str>,
    limit: usize,
    max_distance: usize,
) -> Vec<String> {
    let mut scored = score_words(query, words);
    scored.retain(|&(_, d)| d <= max_distance);
    take_closest(scored, limit)
}

/// Every word ranked by normalized distance to `query`, with no threshold.
pub fn nearest_words<'a>(
    query: &str,
    words: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    take_closest(score_words(query, words), limit)
}

fn score_words<'a>(query: &str, words: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let norm_query = normalize(query);
    words
        .into_iter()
        .map(|w| (w, distance(&norm_query, &normalize(w))))
        .collect()
}

fn take_closest(mut scored: Vec<(&str, usize)>, limit: usize) -> Vec<String> {
    // sort_by_key is stable, so equal distances keep input order.
    scored.sort_by_key(|&(_, d)| d);
    scored.into_iter().take(limit).map(|(w, _)| w.to_string()).collect()
}
