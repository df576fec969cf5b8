// File: src/persistence.rs
use crate::core::types::Entry;
use crate::error::PersistenceError;
use parking_lot::Mutex;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Default corpus written to an empty store on first start.
const SEED_JSON: &str = include_str!("../data/dictionary-seed.json");

/// The backing store the engine loads from and persists to.
pub trait DictionaryStore: Send + Sync {
    /// All entries in stored order; empty when nothing has been stored yet.
    fn load_all(&self) -> Result<Vec<Entry>, PersistenceError>;

    /// Replaces the stored corpus.
    fn save_all(&self, entries: &[Entry]) -> Result<(), PersistenceError>;
}

/// JSON array of `{word, meaning, frequency, tags}` objects on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io { path: self.path.clone(), source }
    }
}

impl DictionaryStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Entry>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "dictionary file absent");
                return Ok(vec![]);
            }
            Err(e) => return Err(self.io_error(e)),
        };
        // A zero-byte or blank file counts as an empty store, so it gets seeded.
        if raw.trim().is_empty() {
            debug!(path = %self.path.display(), "dictionary file blank");
            return Ok(vec![]);
        }
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save_all(&self, entries: &[Entry]) -> Result<(), PersistenceError> {
        let parent_dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(|e| self.io_error(e))?;

        // Write to a sibling temp file, then rename over the target.
        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, entries).map_err(|source| {
                PersistenceError::Malformed { path: self.path.clone(), source }
            })?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        temp_file.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), entries = entries.len(), "dictionary saved");
        Ok(())
    }
}

/// Store kept in memory. Writes can be made to fail for exercising error paths.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self { entries: Mutex::new(entries), fail_writes: Mutex::new(false) }
    }

    /// Makes every following `save_all` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    /// Replaces the stored content directly, bypassing the engine.
    pub fn replace(&self, entries: Vec<Entry>) {
        *self.entries.lock() = entries;
    }
}

impl DictionaryStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Entry>, PersistenceError> {
        Ok(self.entries.lock().clone())
    }

    fn save_all(&self, entries: &[Entry]) -> Result<(), PersistenceError> {
        if *self.fail_writes.lock() {
            return Err(PersistenceError::Rejected("writes disabled".into()));
        }
        *self.entries.lock() = entries.to_vec();
        Ok(())
    }
}

/// The bundled default corpus.
pub fn seed_entries() -> Result<Vec<Entry>, PersistenceError> {
    serde_json::from_str(SEED_JSON).map_err(PersistenceError::Seed)
}

/// Writes the bundled corpus when the store holds nothing.
/// Returns whether seeding happened.
pub fn seed_if_empty<S: DictionaryStore + ?Sized>(store: &S) -> Result<bool, PersistenceError> {
    if !store.load_all()?.is_empty() {
        return Ok(false);
    }
    let seed = seed_entries()?;
    if seed.is_empty() {
        warn!("bundled seed dictionary is empty");
        return Ok(false);
    }
    store.save_all(&seed)?;
    info!(entries = seed.len(), "seeded dictionary");
    Ok(true)
}
