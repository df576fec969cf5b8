// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod logging;
pub mod persistence;

pub use crate::config::EngineConfig;
pub use crate::core::engine::{StageTimings, SuggestionEngine, Suggestions, Timed};
pub use crate::core::normalize::normalize;
pub use crate::core::trie::{TraversalOrder, Trie};
pub use crate::core::types::Entry;
pub use crate::error::{PersistenceError, Result, SuggestError};
pub use crate::persistence::{DictionaryStore, JsonFileStore, MemoryStore};
