use std::fs;
use std::sync::Arc;
use std::thread;

use suggest_core::{
    DictionaryStore, EngineConfig, Entry, JsonFileStore, SuggestError, SuggestionEngine,
    TraversalOrder,
};
use tempfile::TempDir;

fn entry(word: &str, meaning: &str, tags: &[&str]) -> Entry {
    Entry::new(word, meaning, 0, tags.iter().map(|t| t.to_string()).collect())
}

fn engine_in(dir: &TempDir, entries: &[Entry]) -> SuggestionEngine<JsonFileStore> {
    let store = JsonFileStore::new(dir.path().join("dictionary.json"));
    if !entries.is_empty() {
        store.save_all(entries).unwrap();
    }
    SuggestionEngine::open(store, EngineConfig::default()).unwrap()
}

#[test]
fn first_start_seeds_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[]);
    assert!(!engine.is_empty());

    let on_disk = JsonFileStore::new(dir.path().join("dictionary.json")).load_all().unwrap();
    assert_eq!(on_disk.len(), engine.len());
    assert!(engine.contains_word("apple"));
}

#[test]
fn existing_file_is_not_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[entry("zephyr", "a gentle breeze", &["weather"])]);
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.suggest("zep"), vec!["zephyr"]);
}

#[test]
fn mutations_are_persisted_as_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[entry("alpha", "first", &["greek"])]);
    engine.add_entry(entry("beta", "second", &["greek", "letter"])).unwrap();
    engine.increment_frequency("ALPHA").unwrap();
    engine.delete_entry("beta").unwrap();
    engine.add_entry(entry("gamma", "third", &[])).unwrap();

    let raw = fs::read_to_string(dir.path().join("dictionary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "word": "alpha", "meaning": "first", "frequency": 1, "tags": ["greek"] },
            { "word": "gamma", "meaning": "third", "frequency": 0, "tags": [] }
        ])
    );
}

#[test]
fn reload_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(
        &dir,
        &[
            entry("apple", "fruit", &["food"]),
            entry("apply", "use", &[]),
            entry("ape", "primate", &["animal"]),
            entry("Paris", "city", &["place"]),
        ],
    );
    let queries = ["ap", "aple", "par", "fruit", "primate", "xyz"];
    let before: Vec<Vec<String>> = queries.iter().map(|q| engine.suggest(q)).collect();
    let entries_before = engine.list_entries();

    engine.reload().unwrap();
    engine.reload().unwrap();

    let after: Vec<Vec<String>> = queries.iter().map(|q| engine.suggest(q)).collect();
    assert_eq!(before, after);
    assert_eq!(entries_before, engine.list_entries());
    assert!(engine.contains_word("paris"));
}

#[test]
fn reload_sees_external_edits() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[entry("old", "", &[])]);
    JsonFileStore::new(dir.path().join("dictionary.json"))
        .save_all(&[entry("new", "", &[])])
        .unwrap();

    engine.reload().unwrap();
    assert!(!engine.contains_word("old"));
    assert!(engine.contains_word("new"));
}

#[test]
fn corrupt_file_fails_reload_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[entry("keep", "", &[])]);
    fs::write(dir.path().join("dictionary.json"), "[{\"word\": 3}]").unwrap();

    let err = engine.reload().unwrap_err();
    assert!(matches!(err, SuggestError::Persistence(_)));
    assert!(engine.contains_word("keep"));
}

#[test]
fn staged_policy_on_seed_words() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(
        &dir,
        &[
            entry("kitten", "a young cat", &["animal"]),
            entry("sitting", "being seated", &[]),
            entry("book", "pages bound together", &["reading"]),
            entry("books", "more than one book", &["reading"]),
        ],
    );

    // Prefix hits first, then the fuzzy neighbour.
    assert_eq!(engine.suggest("boo"), vec!["book", "books"]);
    // Typo in a long word.
    assert_eq!(engine.suggest("kiten"), vec!["kitten"]);
    // No prefix or fuzzy hit, relevance over meanings and tags.
    assert_eq!(engine.suggest("reading"), vec!["book", "books"]);
}

#[test]
fn diacritics_do_not_matter_for_queries() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, &[entry("café", "coffee house", &[]), entry("façade", "front", &[])]);
    assert_eq!(engine.suggest("CAF"), vec!["café"]);
    assert_eq!(engine.suggest("facad"), vec!["façade"]);
}

#[test]
fn custom_traversal_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("dictionary.json"));
    store
        .save_all(&[entry("abc", "", &[]), entry("ab", "", &[]), entry("abd", "", &[])])
        .unwrap();
    let config = EngineConfig { traversal: TraversalOrder::DepthFirst, prefix_limit: 2, ..Default::default() };
    let engine = SuggestionEngine::new(store, config).unwrap();
    assert_eq!(
        engine.suggest_by_prefix("ab", 10, TraversalOrder::DepthFirst).value,
        vec!["ab", "abc", "abd"]
    );
    assert_eq!(engine.suggest("ab")[..2], ["ab".to_string(), "abc".to_string()]);
}

#[test]
fn readers_and_writers_can_share_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(engine_in(&dir, &[entry("seed", "", &[])]));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..10 {
                    engine.add_entry(entry(&format!("word{t}x{i}"), "", &[])).unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert!(engine.suggest("word").len() <= 10);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(engine.len(), 41);
    let on_disk = JsonFileStore::new(dir.path().join("dictionary.json")).load_all().unwrap();
    assert_eq!(on_disk.len(), 41);
}
