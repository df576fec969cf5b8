//! Tuning knobs for the staged suggestion policy.
//!
//! Defaults reproduce the stock policy: 10 prefix hits, fuzzy fallback for
//! queries of 2+ chars while fewer than 5 suggestions are in hand, TF-IDF
//! fallback for 4+ chars under the same condition, 10 results total.

use crate::core::trie::TraversalOrder;
use crate::error::{Result, SuggestError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on the merged suggestion list.
    pub max_results: usize,

    /// Results requested from the trie.
    pub prefix_limit: usize,

    /// Trie walk used by the prefix stage.
    pub traversal: TraversalOrder,

    /// Results requested from the fuzzy matcher.
    pub fuzzy_limit: usize,

    /// Minimum query length (chars, trimmed) for the fuzzy stage.
    pub fuzzy_min_query_len: usize,

    /// Minimum query length (chars, trimmed) for the relevance stage.
    pub relevance_min_query_len: usize,

    /// Fallback stages run only while fewer suggestions than this are merged.
    pub sparse_threshold: usize,

    /// Normalized queries up to this length use `short_query_max_distance`.
    pub short_query_len: usize,

    pub short_query_max_distance: usize,

    pub long_query_max_distance: usize,

    /// Fuzzy candidates must share this many leading normalized chars with the query.
    pub fuzzy_anchor_len: usize,

    /// Results requested from the TF-IDF ranker.
    pub relevance_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            prefix_limit: 10,
            traversal: TraversalOrder::BreadthFirst,
            fuzzy_limit: 10,
            fuzzy_min_query_len: 2,
            relevance_min_query_len: 4,
            sparse_threshold: 5,
            short_query_len: 3,
            short_query_max_distance: 1,
            long_query_max_distance: 2,
            fuzzy_anchor_len: 2,
            relevance_limit: 5,
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SuggestError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| SuggestError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_results", self.max_results),
            ("prefix_limit", self.prefix_limit),
            ("fuzzy_limit", self.fuzzy_limit),
            ("relevance_limit", self.relevance_limit),
            ("sparse_threshold", self.sparse_threshold),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(SuggestError::Config(format!("{name} must be greater than 0")));
            }
        }
        if self.short_query_max_distance > self.long_query_max_distance {
            return Err(SuggestError::Config(
                "short_query_max_distance cannot exceed long_query_max_distance".into(),
            ));
        }
        Ok(())
    }

    /// Edit-distance budget for a normalized query of `normalized_len` chars.
    pub fn max_distance_for(&self, normalized_len: usize) -> usize {
        if normalized_len <= self.short_query_len {
            self.short_query_max_distance
        } else {
            self.long_query_max_distance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_results, 10);
        assert_eq!(config.traversal, TraversalOrder::BreadthFirst);
    }

    #[test]
    fn distance_budget_depends_on_length() {
        let config = EngineConfig::default();
        assert_eq!(config.max_distance_for(2), 1);
        assert_eq!(config.max_distance_for(3), 1);
        assert_eq!(config.max_distance_for(4), 2);
    }

    #[test]
    fn rejects_zero_limits() {
        let config = EngineConfig { prefix_limit: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(SuggestError::Config(_))));
    }

    #[test]
    fn rejects_inverted_distances() {
        let config = EngineConfig {
            short_query_max_distance: 3,
            long_query_max_distance: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_results": 7, "traversal": "depth_first" }}"#).unwrap();
        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_results, 7);
        assert_eq!(config.traversal, TraversalOrder::DepthFirst);
        assert_eq!(config.relevance_limit, 5);
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = EngineConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SuggestError::Config(_)));
    }
}
