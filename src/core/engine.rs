use crate::config::EngineConfig;
use crate::core::normalize::normalize;
use crate::core::relevance;
use crate::core::trie::{TraversalOrder, Trie};
use crate::core::types::{corpus_key, Corpus, Entry};
use crate::error::{Result, SuggestError};
use crate::fuzzy::levenshtein;
use crate::persistence::{seed_if_empty, DictionaryStore};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// A result together with how long it took to compute.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

fn timed<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    Timed { value, elapsed: start.elapsed() }
}

/// Elapsed time per stage of one `suggest` call. `None` means the stage was
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    pub prefix: Duration,
    pub fuzzy: Option<Duration>,
    pub relevance: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct Suggestions {
    pub words: Vec<String>,
    pub timings: StageTimings,
}

/// Corpus and the trie derived from it. Always locked as one unit.
struct EngineState {
    corpus: Corpus,
    trie: Trie,
}

impl EngineState {
    fn from_entries(entries: Vec<Entry>) -> Self {
        let corpus = Corpus::from_entries(entries);
        let trie = Trie::from_words(corpus.words());
        Self { corpus, trie }
    }

    fn rebuild_trie(&mut self) {
        self.trie = Trie::from_words(self.corpus.words());
    }
}

/// Suggestion list under construction; membership ignores case.
struct MergedList {
    words: Vec<String>,
    keys: HashSet<String>,
}

impl MergedList {
    fn new() -> Self {
        Self { words: Vec::new(), keys: HashSet::new() }
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn push(&mut self, word: String) {
        if self.keys.insert(corpus_key(&word)) {
            self.words.push(word);
        }
    }

    fn into_words(mut self, cap: usize) -> Vec<String> {
        self.words.truncate(cap);
        self.words
    }
}

/// Owns the in-memory corpus and its trie, answers suggestion queries and
/// applies CRUD operations through the backing store.
///
/// Reads share a lock; every mutation holds the exclusive lock across
/// mutate, persist and reindex.
pub struct SuggestionEngine<S: DictionaryStore> {
    store: S,
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl<S: DictionaryStore> SuggestionEngine<S> {
    /// Loads whatever the store holds.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let entries = store.load_all()?;
        info!(entries = entries.len(), "dictionary loaded");
        Ok(Self {
            store,
            config,
            state: RwLock::new(EngineState::from_entries(entries)),
        })
    }

    /// Seeds an empty store with the bundled dictionary, then loads it.
    pub fn open(store: S, config: EngineConfig) -> Result<Self> {
        seed_if_empty(&store)?;
        Self::new(store, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.state.read().corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().corpus.is_empty()
    }

    /// Ranked, deduplicated suggestions for `query`, at most `max_results`.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        self.suggest_with_timings(query).words
    }

    /// Runs the staged policy: prefix, then fuzzy and relevance fallbacks
    /// while the list is still sparse.
    pub fn suggest_with_timings(&self, query: &str) -> Suggestions {
        let query = query.trim();
        if query.is_empty() {
            return Suggestions::default();
        }
        let cfg = &self.config;
        let query_len = query.chars().count();
        let state = self.state.read();
        let mut merged = MergedList::new();
        let mut timings = StageTimings::default();

        let prefix = timed(|| state.trie.prefix_suggest(query, cfg.prefix_limit, cfg.traversal));
        timings.prefix = prefix.elapsed;
        for word in prefix.value {
            merged.push(word);
        }

        if query_len >= cfg.fuzzy_min_query_len && merged.len() < cfg.sparse_threshold {
            let fuzzy = timed(|| {
                let norm_query = normalize(query);
                let max_distance = cfg.max_distance_for(norm_query.chars().count());
                let anchor: String = norm_query.chars().take(cfg.fuzzy_anchor_len).collect();
                levenshtein::filtered_fuzzy_match(
                    query,
                    state.corpus.words(),
                    cfg.fuzzy_limit,
                    max_distance,
                )
                .into_iter()
                .filter(|w| normalize(w).starts_with(&anchor))
                .collect::<Vec<_>>()
            });
            timings.fuzzy = Some(fuzzy.elapsed);
            for word in fuzzy.value {
                merged.push(word);
            }
        }

        if query_len >= cfg.relevance_min_query_len && merged.len() < cfg.sparse_threshold {
            let ranked = timed(|| {
                relevance::rank(query, state.corpus.iter(), cfg.relevance_limit)
                    .into_iter()
                    .map(|e| e.word.clone())
                    .collect::<Vec<_>>()
            });
            timings.relevance = Some(ranked.elapsed);
            for word in ranked.value {
                merged.push(word);
            }
        }

        let words = merged.into_words(cfg.max_results);
        debug!(
            query,
            results = words.len(),
            prefix_us = timings.prefix.as_micros() as u64,
            fuzzy_us = timings.fuzzy.map(|d| d.as_micros() as u64),
            relevance_us = timings.relevance.map(|d| d.as_micros() as u64),
            "suggest"
        );
        Suggestions { words, timings }
    }

    /// Prefix completions only.
    pub fn suggest_by_prefix(&self, prefix: &str, limit: usize, order: TraversalOrder) -> Timed<Vec<String>> {
        let state = self.state.read();
        timed(|| state.trie.prefix_suggest(prefix, limit, order))
    }

    /// Every corpus word ordered by edit distance to `query`, no threshold.
    pub fn suggest_by_distance(&self, query: &str, limit: usize) -> Timed<Vec<String>> {
        let state = self.state.read();
        timed(|| levenshtein::nearest_words(query, state.corpus.words(), limit))
    }

    /// Corpus words within `max_distance` of `query`.
    pub fn suggest_by_fuzzy(&self, query: &str, limit: usize, max_distance: usize) -> Timed<Vec<String>> {
        let state = self.state.read();
        timed(|| levenshtein::filtered_fuzzy_match(query, state.corpus.words(), limit, max_distance))
    }

    /// Entries ranked by TF-IDF relevance to `query`.
    pub fn suggest_by_relevance(&self, query: &str, limit: usize) -> Timed<Vec<Entry>> {
        let state = self.state.read();
        timed(|| {
            relevance::rank(query, state.corpus.iter(), limit)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Snapshot of the corpus in order.
    pub fn list_entries(&self) -> Vec<Entry> {
        self.state.read().corpus.to_vec()
    }

    pub fn find_entry(&self, word: &str) -> Option<Entry> {
        self.state.read().corpus.get(word).cloned()
    }

    /// Whether the index knows this word (normalized comparison).
    pub fn contains_word(&self, word: &str) -> bool {
        self.state.read().trie.search(word)
    }

    /// Replaces any entry with the same word and moves it to the end.
    ///
    /// On a store failure the in-memory change stays applied and the error is
    /// returned; the persisted state is then unknown.
    pub fn add_entry(&self, entry: Entry) -> Result<()> {
        validate_entry(&entry)?;
        let mut state = self.state.write();
        let previous = state.corpus.append(entry.clone());
        let persisted = self.persist(&state.corpus);
        reindex_after_upsert(&mut state, previous.as_ref(), &entry);
        persisted?;
        info!(word = %entry.word, replaced = previous.is_some(), "entry added");
        Ok(())
    }

    /// Replaces the entry with the same word where it stands (or appends it)
    /// and persists once.
    pub fn edit_entry(&self, entry: Entry) -> Result<()> {
        validate_entry(&entry)?;
        let mut state = self.state.write();
        let previous = state.corpus.upsert(entry.clone());
        let persisted = self.persist(&state.corpus);
        reindex_after_upsert(&mut state, previous.as_ref(), &entry);
        persisted?;
        info!(word = %entry.word, existed = previous.is_some(), "entry edited");
        Ok(())
    }

    /// Removes the entry and rebuilds the trie.
    pub fn delete_entry(&self, word: &str) -> Result<Entry> {
        let mut state = self.state.write();
        let Some(removed) = state.corpus.remove(word) else {
            warn!(word, "delete of unknown word");
            return Err(SuggestError::NotFound(word.to_string()));
        };
        let persisted = self.persist(&state.corpus);
        state.rebuild_trie();
        persisted?;
        info!(word = %removed.word, "entry deleted");
        Ok(removed)
    }

    /// Bumps the entry's frequency by one. The word set is unchanged, so the
    /// trie is left alone.
    pub fn increment_frequency(&self, word: &str) -> Result<Entry> {
        let mut state = self.state.write();
        let Some(updated) = state.corpus.get(word).map(Entry::with_incremented_frequency) else {
            warn!(word, "frequency bump for unknown word");
            return Err(SuggestError::NotFound(word.to_string()));
        };
        state.corpus.upsert(updated.clone());
        self.persist(&state.corpus)?;
        debug!(word = %updated.word, frequency = updated.frequency, "frequency incremented");
        Ok(updated)
    }

    /// Replaces the corpus from the store and rebuilds the trie. On failure the
    /// current state is kept.
    pub fn reload(&self) -> Result<()> {
        let mut state = self.state.write();
        let entries = self.store.load_all()?;
        *state = EngineState::from_entries(entries);
        info!(entries = state.corpus.len(), "dictionary reloaded");
        Ok(())
    }

    fn persist(&self, corpus: &Corpus) -> Result<()> {
        self.store.save_all(&corpus.to_vec()).map_err(|e| {
            error!(error = %e, "failed to persist dictionary");
            SuggestError::from(e)
        })
    }
}

fn validate_entry(entry: &Entry) -> Result<()> {
    if entry.word.trim().is_empty() {
        return Err(SuggestError::InvalidEntry("word must not be empty".into()));
    }
    if normalize(&entry.word).trim().is_empty() {
        return Err(SuggestError::InvalidEntry(format!(
            "word '{}' has no letters once accents are removed",
            entry.word
        )));
    }
    Ok(())
}

/// A casing change rebuilds the trie so results show the corpus casing;
/// otherwise the word is inserted incrementally.
fn reindex_after_upsert(state: &mut EngineState, previous: Option<&Entry>, entry: &Entry) {
    match previous {
        Some(prev) if prev.word != entry.word => state.rebuild_trie(),
        _ => state.trie.insert(&entry.word),
    }
}
