// src/core/types.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One dictionary entry. This is the persisted record; the field names are
/// the on-disk JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub word: String,
    pub meaning: String,
    pub frequency: u64,
    pub tags: Vec<String>,
}

impl Entry {
    pub fn new(
        word: impl Into<String>,
        meaning: impl Into<String>,
        frequency: u64,
        tags: Vec<String>,
    ) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            frequency,
            tags,
        }
    }

    /// Identity key: entries are the same logical entry when their words match
    /// ignoring case.
    pub fn key(&self) -> String {
        corpus_key(&self.word)
    }

    /// Replacement value with the frequency counter bumped by one.
    pub fn with_incremented_frequency(&self) -> Self {
        Self {
            frequency: self.frequency.saturating_add(1),
            ..self.clone()
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

pub fn corpus_key(word: &str) -> String {
    word.to_lowercase()
}

/// Ordered set of entries keyed by lowercase word. The single source of truth
/// the trie is derived from.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: IndexMap<String, Entry>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a corpus from store order. A later duplicate (same word ignoring
    /// case) replaces the earlier one and moves to the end, as an `add` would.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut corpus = Self::new();
        for entry in entries {
            corpus.append(entry);
        }
        corpus
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&Entry> {
        self.entries.get(&corpus_key(word))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&corpus_key(word))
    }

    /// Removes any entry with the same key, then appends at the end.
    /// Returns the displaced entry, if any.
    pub fn append(&mut self, entry: Entry) -> Option<Entry> {
        let key = entry.key();
        let previous = self.entries.shift_remove(&key);
        self.entries.insert(key, entry);
        previous
    }

    /// Replaces an existing entry where it stands, or appends when absent.
    pub fn upsert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key(), entry)
    }

    /// Removes the entry with this word, keeping the order of the rest.
    pub fn remove(&mut self, word: &str) -> Option<Entry> {
        self.entries.shift_remove(&corpus_key(word))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.word.as_str())
    }

    pub fn to_vec(&self) -> Vec<Entry> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> Entry {
        Entry::new(word, format!("meaning of {word}"), 0, vec![])
    }

    #[test]
    fn entries_compare_by_word_ignoring_case() {
        assert_eq!(entry("Apple"), entry("apple"));
        assert_ne!(entry("apple"), entry("apply"));
    }

    #[test]
    fn append_replaces_and_moves_to_end() {
        let mut corpus = Corpus::from_entries(vec![entry("a"), entry("b"), entry("c")]);
        let old = corpus.append(Entry::new("A", "new", 3, vec![]));
        assert_eq!(old.map(|e| e.meaning), Some("meaning of a".to_string()));
        let words: Vec<&str> = corpus.words().collect();
        assert_eq!(words, vec!["b", "c", "A"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut corpus = Corpus::from_entries(vec![entry("a"), entry("b"), entry("c")]);
        corpus.upsert(Entry::new("B", "new", 1, vec![]));
        let words: Vec<&str> = corpus.words().collect();
        assert_eq!(words, vec!["a", "B", "c"]);
        assert_eq!(corpus.get("b").map(|e| e.frequency), Some(1));

        corpus.upsert(entry("d"));
        assert_eq!(corpus.words().last(), Some("d"));
    }

    #[test]
    fn remove_keeps_order() {
        let mut corpus = Corpus::from_entries(vec![entry("a"), entry("b"), entry("c")]);
        assert!(corpus.remove("B").is_some());
        assert!(corpus.remove("zzz").is_none());
        let words: Vec<&str> = corpus.words().collect();
        assert_eq!(words, vec!["a", "c"]);
    }

    #[test]
    fn duplicate_store_rows_collapse() {
        let corpus = Corpus::from_entries(vec![entry("x"), entry("y"), entry("X")]);
        assert_eq!(corpus.len(), 2);
        let words: Vec<&str> = corpus.words().collect();
        assert_eq!(words, vec!["y", "X"]);
    }

    #[test]
    fn increment_keeps_other_fields() {
        let e = Entry::new("word", "m", 4, vec!["t".into()]);
        let bumped = e.with_incremented_frequency();
        assert_eq!(bumped.frequency, 5);
        assert_eq!(bumped.meaning, "m");
        assert_eq!(bumped.tags, vec!["t".to_string()]);
    }

    #[test]
    fn json_shape_matches_store_format() {
        let e = Entry::new("café", "coffee shop", 2, vec!["food".into()]);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "word": "café",
                "meaning": "coffee shop",
                "frequency": 2,
                "tags": ["food"]
            })
        );
    }
}
