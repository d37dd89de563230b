//! In-memory ordered trie, used only as the LOUDS encoder's scratch structure.
//!
//! Nodes live in an arena (`Vec<TrieNode<Cu>>`) rather than behind owning pointers,
//! and each node's children are an [`IndexMap`] so iteration replays insertion
//! order deterministically — two builds over the same keys in the same order
//! produce byte-identical LOUDS output.

#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::codeunit::CodeUnit;

/// Index of a node within a [`Trie`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

struct TrieNode<Cu> {
    children: IndexMap<Cu, NodeId>,
    is_word: bool,
    term_id: i32,
}

impl<Cu> TrieNode<Cu> {
    fn new() -> Self {
        Self {
            children: IndexMap::new(),
            is_word: false,
            term_id: -1,
        }
    }
}

/// Builder-side trie. Insert keys, then hand the result to
/// [`crate::encoder::encode`] to produce the LOUDS arrays.
pub struct Trie<Cu> {
    nodes: Vec<TrieNode<Cu>>,
    next_term_id: i32,
}

impl<Cu: CodeUnit> Trie<Cu> {
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![TrieNode::new()],
            next_term_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (Cu, NodeId)> + '_ {
        self.nodes[node.idx()].children.iter().map(|(&c, &id)| (c, id))
    }

    pub fn is_word(&self, node: NodeId) -> bool {
        self.nodes[node.idx()].is_word
    }

    pub fn term_id(&self, node: NodeId) -> i32 {
        self.nodes[node.idx()].term_id
    }

    /// Insert `key`, assigning it the next term-id.
    ///
    /// Term-ids start at 1 and increment on every call, including duplicate
    /// keys: inserting the same key twice overwrites its stored term-id with
    /// the second call's value.
    pub fn insert(&mut self, key: &[Cu]) -> i32 {
        let mut cur = NodeId::ROOT;
        for &c in key {
            cur = match self.nodes[cur.idx()].children.get(&c) {
                Some(&child) => child,
                None => {
                    let new_id = NodeId(self.nodes.len() as u32);
                    self.nodes.push(TrieNode::new());
                    self.nodes[cur.idx()].children.insert(c, new_id);
                    new_id
                }
            };
        }
        let term_id = self.next_term_id;
        self.next_term_id += 1;
        let node = &mut self.nodes[cur.idx()];
        node.is_word = true;
        node.term_id = term_id;
        term_id
    }
}

impl<Cu: CodeUnit> Default for Trie<Cu> {
    fn default() -> Self {
        Self::new()
    }
}
