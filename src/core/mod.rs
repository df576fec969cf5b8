// src/core/mod.rs
pub mod engine;
pub mod normalize;
pub mod relevance;
pub mod trie;
pub mod types;
