//! Compressed prefix (radix) trie
//!
//! Keys are arbitrary strings mapped to a list of values. Every edge carries a
//! string fragment rather than a single character, so a node only exists where
//! two keys branch or where a key ends. Nodes live in an arena owned by the
//! trie and refer to their children through [`NodeId`] handles.
//!
//! The trie is built once and then only read: all `insert` calls must happen
//! before lookups begin. A built trie is `Send + Sync` and can be shared behind
//! an `Arc` without locking.

mod dump;

pub use dump::TrieDump;

use serde::Serialize;
use std::collections::BTreeMap;

/// Handle to a node inside a [`PrefixTrie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
struct TrieNode<V> {
    /// Fragment of the key this node covers, relative to its parent
    key_suffix: String,
    /// Values attached to the complete key ending here
    values: Vec<V>,
    /// Children keyed by the first character of their `key_suffix`
    children: BTreeMap<char, NodeId>,
}

impl<V> TrieNode<V> {
    fn new(key_suffix: String, values: Vec<V>) -> Self {
        Self {
            key_suffix,
            values,
            children: BTreeMap::new(),
        }
    }
}

/// Structural statistics for a trie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrieStats {
    /// Number of nodes including the root
    pub node_count: usize,
    /// Number of nodes holding a non-empty value list
    pub key_count: usize,
    /// Longest root-to-leaf path, counted in edges
    pub max_depth: usize,
}

/// Radix trie mapping strings to value lists
#[derive(Debug, Clone)]
pub struct PrefixTrie<V> {
    nodes: Vec<TrieNode<V>>,
}

impl<V> Default for PrefixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PrefixTrie<V> {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(String::new(), Vec::new())],
        }
    }

    /// The root node (empty key suffix)
    pub fn root(&self) -> Node<'_, V> {
        self.node(ROOT)
    }

    /// View a node by handle.
    ///
    /// Panics if `id` was not produced by this trie.
    pub fn node(&self, id: NodeId) -> Node<'_, V> {
        assert!(id.0 < self.nodes.len(), "node id from another trie");
        Node { trie: self, id }
    }

    fn push(&mut self, node: TrieNode<V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Insert `key`, replacing any value list previously stored for it.
    ///
    /// Walks down while existing edges are prefixes of the remaining key.
    /// When an edge and the key diverge partway, the edge is split at the
    /// longest common prefix. At most one split happens per insertion.
    pub fn insert(&mut self, key: &str, values: Vec<V>) {
        let mut current = ROOT;
        let mut rest = key;

        loop {
            let Some(first) = rest.chars().next() else {
                // Only reachable for the empty key: the root is its terminus.
                self.nodes[current.0].values = values;
                return;
            };

            let Some(&child) = self.nodes[current.0].children.get(&first) else {
                let leaf = self.push(TrieNode::new(rest.to_string(), values));
                self.nodes[current.0].children.insert(first, leaf);
                return;
            };

            let edge_len = self.nodes[child.0].key_suffix.len();
            if rest.starts_with(self.nodes[child.0].key_suffix.as_str()) {
                if rest.len() == edge_len {
                    self.nodes[child.0].values = values;
                    return;
                }
                rest = &rest[edge_len..];
                current = child;
                continue;
            }

            let same = common_prefix_len(rest, &self.nodes[child.0].key_suffix);
            let common = rest[..same].to_string();
            let new_remainder = &rest[same..];
            let old_remainder = self.nodes[child.0].key_suffix[same..].to_string();

            // `same` stops short of the edge, so the old remainder is never empty
            let Some(old_first) = old_remainder.chars().next() else {
                unreachable!("edge fully matched but was not a prefix");
            };

            let (split_values, leaf_values) = if new_remainder.is_empty() {
                (values, None)
            } else {
                (Vec::new(), Some(values))
            };

            let intermediate = self.push(TrieNode::new(common, split_values));
            self.nodes[child.0].key_suffix = old_remainder;
            self.nodes[intermediate.0].children.insert(old_first, child);

            if let (Some(new_first), Some(leaf_values)) = (new_remainder.chars().next(), leaf_values)
            {
                let leaf = self.push(TrieNode::new(new_remainder.to_string(), leaf_values));
                self.nodes[intermediate.0].children.insert(new_first, leaf);
            }

            self.nodes[current.0].children.insert(first, intermediate);
            return;
        }
    }

    /// Find the node whose root path spells exactly `key`.
    ///
    /// Split nodes created only to share a prefix are returned too; check
    /// [`Node::values`] to tell whether the key itself was inserted.
    pub fn find_exact(&self, key: &str) -> Option<Node<'_, V>> {
        let mut current = self.root();
        let mut rest = key;

        while !rest.is_empty() {
            let child = current.find_partial(rest.chars().next()?)?;
            rest = rest.strip_prefix(child.key_suffix())?;
            current = child;
        }

        Some(current)
    }

    /// Child of the root whose edge starts with `first`
    pub fn find_partial(&self, first: char) -> Option<Node<'_, V>> {
        self.root().find_partial(first)
    }

    /// Values stored for exactly `key`, if any
    pub fn get(&self, key: &str) -> Option<&[V]> {
        self.find_exact(key)
            .map(|node| node.values())
            .filter(|values| !values.is_empty())
    }

    pub fn stats(&self) -> TrieStats {
        let key_count = self.nodes.iter().filter(|n| !n.values.is_empty()).count();

        let mut max_depth = 0;
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in self.nodes[id.0].children.values() {
                stack.push((child, depth + 1));
            }
        }

        TrieStats {
            node_count: self.nodes.len(),
            key_count,
            max_depth,
        }
    }

    /// Number of keys holding values
    pub fn len(&self) -> usize {
        self.stats().key_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.values.is_empty())
    }

    /// Indented textual rendering of the whole trie, for diagnostics
    pub fn dump(&self) -> String
    where
        V: std::fmt::Debug,
    {
        TrieDump::new(self).to_string()
    }
}

/// Borrowed view of one trie node
pub struct Node<'t, V> {
    trie: &'t PrefixTrie<V>,
    id: NodeId,
}

impl<V> Clone for Node<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Node<'_, V> {}

impl<V> std::fmt::Debug for Node<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("key_suffix", &self.key_suffix())
            .field("values", &self.values().len())
            .field("children", &self.raw().children.len())
            .finish()
    }
}

impl<'t, V> Node<'t, V> {
    fn raw(&self) -> &'t TrieNode<V> {
        &self.trie.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Key fragment relative to the parent node
    pub fn key_suffix(&self) -> &'t str {
        &self.raw().key_suffix
    }

    pub fn values(&self) -> &'t [V] {
        &self.raw().values
    }

    /// Direct child whose edge begins with `first`
    pub fn find_partial(&self, first: char) -> Option<Node<'t, V>> {
        self.raw()
            .children
            .get(&first)
            .map(|&id| Node { trie: self.trie, id })
    }

    /// A node with no children
    pub fn is_terminal(&self) -> bool {
        self.raw().children.is_empty()
    }

    /// Children in ascending order of their leading character
    pub fn children(&self) -> impl Iterator<Item = Node<'t, V>> + 't {
        let trie = self.trie;
        self.raw()
            .children
            .values()
            .map(move |&id| Node { trie, id })
    }
}

/// Byte length of the longest common prefix, cut at a char boundary
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}
