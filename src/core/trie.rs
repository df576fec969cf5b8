// --- File: src/core/trie.rs
use crate::core::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

const ROOT: usize = 0;

/// How `prefix_suggest` walks the subtree under the prefix node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// Level order: shorter completions come first.
    #[default]
    BreadthFirst,
    /// Lexicographic by child character.
    DepthFirst,
}

#[derive(Clone, Debug)]
struct TrieNode {
    // Ordered so traversal is deterministic for the same content.
    children: BTreeMap<char, usize>,
    terminal: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: BTreeMap::new(), terminal: false }
    }
}

/// Prefix tree over normalized words, plus the normalized -> original casing
/// table used when rendering results. Both live and die together: there is no
/// removal, callers rebuild with [`Trie::from_words`].
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    display: HashMap<String, String>,
    word_count: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], display: HashMap::new(), word_count: 0 }
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word);
        }
        trie
    }

    /// Number of distinct normalized words stored.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Inserts a word. O(k) where k is the word length.
    /// The first casing seen for a normalized form is the one displayed.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        // A word of combining marks only normalizes to "" and marks the root.
        let norm = normalize(word);

        let mut node_idx = ROOT;
        for c in norm.chars() {
            node_idx = match self.nodes[node_idx].children.get(&c) {
                Some(&next) => next,
                None => {
                    let new_node_id = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[node_idx].children.insert(c, new_node_id);
                    new_node_id
                }
            };
        }

        if !self.nodes[node_idx].terminal {
            self.nodes[node_idx].terminal = true;
            self.word_count += 1;
        }
        self.display.entry(norm).or_insert_with(|| word.to_string());
    }

    /// True only if the normalized word was inserted.
    pub fn search(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.walk(&normalize(word))
            .map(|idx| self.nodes[idx].terminal)
            .unwrap_or(false)
    }

    /// Up to `limit` stored words starting with `prefix` (after normalization),
    /// in their display casing and without duplicates.
    pub fn prefix_suggest(&self, prefix: &str, limit: usize, order: TraversalOrder) -> Vec<String> {
        let norm_prefix = normalize(prefix);
        let Some(start) = self.walk(&norm_prefix) else {
            return vec![];
        };

        let matches = match order {
            TraversalOrder::BreadthFirst => self.collect_bfs(norm_prefix, start, limit),
            TraversalOrder::DepthFirst => self.collect_dfs(norm_prefix, start, limit),
        };

        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(matches.len());
        for norm in matches {
            let original = self.display.get(&norm).cloned().unwrap_or(norm);
            if seen.insert(original.clone()) {
                results.push(original);
            }
        }
        results
    }

    /// Original casing recorded for a normalized form.
    pub fn display_form(&self, normalized: &str) -> Option<&str> {
        self.display.get(normalized).map(String::as_str)
    }

    fn walk(&self, norm: &str) -> Option<usize> {
        let mut node_idx = ROOT;
        for c in norm.chars() {
            node_idx = *self.nodes[node_idx].children.get(&c)?;
        }
        Some(node_idx)
    }

    fn collect_bfs(&self, prefix: String, start: usize, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([(prefix, start)]);
        while out.len() < limit {
            let Some((path, idx)) = queue.pop_front() else { break };
            let node = &self.nodes[idx];
            for (&c, &child) in &node.children {
                let mut next = path.clone();
                next.push(c);
                queue.push_back((next, child));
            }
            if node.terminal {
                out.push(path);
            }
        }
        out
    }

    fn collect_dfs(&self, prefix: String, start: usize, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(prefix, start)];
        while out.len() < limit {
            let Some((path, idx)) = stack.pop() else { break };
            let node = &self.nodes[idx];
            // Reversed so the smallest child is popped first.
            for (&c, &child) in node.children.iter().rev() {
                let mut next = path.clone();
                next.push(c);
                stack.push((next, child));
            }
            if node.terminal {
                out.push(path);
            }
        }
        out
    }
}
