//! LOUDS dictionary reader: navigation primitives and the two public query types.
//!
//! [`LoudsCore`] holds the succinct indexes and implements every navigation
//! primitive and query algorithm; [`LoudsDict`] and [`LoudsDictWithTermIds`] are
//! thin wrappers composing over one `LoudsCore`, differing only in whether a
//! `termIds` side array and [`LoudsDictWithTermIds::term_id`] exist. Neither
//! inherits from the other.

#[cfg(not(any(test, feature = "std")))]
use alloc::{string::String, vec::Vec};

use crate::bits::{BitVec, RankSelect, SuccinctBitVector};
use crate::codeunit::{decode_units, CodeUnit};
use crate::encoder::Encoded;

/// The LBS position a query descent begins from.
///
/// `LBS[0] = 1, LBS[1] = 0` are the reserved sentinel bits recording that the
/// super-root has exactly one child (the real root); `first_child(ROOT)`
/// resolves to position 2, where the real root's own children begin.
const ROOT: usize = 0;

/// Shared navigation core for both dictionary variants.
#[derive(Debug)]
pub struct LoudsCore<Cu> {
    lbs: SuccinctBitVector,
    labels: Vec<Cu>,
    is_leaf: SuccinctBitVector,
}

impl<Cu: CodeUnit> LoudsCore<Cu> {
    pub fn new(lbs: BitVec, labels: Vec<Cu>, is_leaf: BitVec, sample_rate: u32) -> Self {
        debug_assert_eq!(lbs.len(), is_leaf.len());
        Self {
            lbs: SuccinctBitVector::new(lbs, sample_rate),
            labels,
            is_leaf: SuccinctBitVector::new(is_leaf, sample_rate),
        }
    }

    #[inline]
    pub fn is_leaf(&self, pos: usize) -> bool {
        self.is_leaf.get(pos)
    }

    /// Position of `pos`'s first child, or `None` if it has no children.
    pub fn first_child(&self, pos: usize) -> Option<usize> {
        let y = self.lbs.select0(self.lbs.rank1(pos))? + 1;
        if y >= self.lbs.len() || !self.lbs.get(y) {
            None
        } else {
            Some(y)
        }
    }

    /// Position of `pos`'s parent, or `None` if `pos` is the root.
    ///
    /// `rank0(pos)` counts how many nodes' children-runs have already closed
    /// before `pos`; the parent is the node owning the *previous* such run,
    /// hence the `- 1`. Only `pos == ROOT` has `rank0(pos) == 0`.
    pub fn parent(&self, pos: usize) -> Option<usize> {
        let r0 = self.lbs.rank0(pos);
        if r0 == 0 {
            None
        } else {
            self.lbs.select1(r0 - 1)
        }
    }

    /// The code unit labeling the edge entering the node at `pos`.
    #[inline]
    pub fn label_at(&self, pos: usize) -> Cu {
        self.labels[self.lbs.rank1(pos)]
    }

    /// Dense node identifier (distinct from LBS position).
    #[inline]
    pub fn node_id(&self, pos: usize) -> usize {
        self.lbs.rank0(pos)
    }

    /// Scan `pos`'s children for one labeled `c`, returning its position.
    pub fn traverse(&self, pos: usize, c: Cu) -> Option<usize> {
        let mut child = self.first_child(pos)?;
        while child < self.lbs.len() && self.lbs.get(child) {
            if self.label_at(child) == c {
                return Some(child);
            }
            child += 1;
        }
        None
    }

    /// Descend matching every code unit of `key`; `None` if any step fails or
    /// `key` is empty.
    pub fn node_index(&self, key: &[Cu]) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        let mut cursor = ROOT;
        for &c in key {
            cursor = self.traverse(cursor, c)?;
        }
        Some(cursor)
    }

    /// Reconstruct the key reaching `node_index` by walking to the root.
    pub fn label_path(&self, node_index: usize) -> Vec<Cu> {
        let mut out: Vec<Cu> = Vec::new();
        let mut current = node_index;
        loop {
            let node_id = self.lbs.rank1(current);
            if node_id >= self.labels.len() {
                break;
            }
            let ch = self.labels[node_id];
            if ch != Cu::SENTINEL {
                out.push(ch);
            }
            if node_id == 0 {
                break;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Every stored key that is a prefix of `query`, shortest first.
    pub fn common_prefix_search(&self, query: &[Cu]) -> Vec<Vec<Cu>> {
        let mut results = Vec::new();
        let mut path: Vec<Cu> = Vec::new();
        let mut cursor = ROOT;
        for &c in query {
            cursor = match self.traverse(cursor, c) {
                Some(p) => p,
                None => break,
            };
            path.push(c);
            if self.is_leaf(cursor) {
                results.push(path.clone());
            }
        }
        results
    }
}

/// A LOUDS dictionary answering `node_index`/`label_path`/`common_prefix_search`,
/// with no term-id storage.
#[derive(Debug)]
pub struct LoudsDict<Cu> {
    core: LoudsCore<Cu>,
}

impl<Cu: CodeUnit> LoudsDict<Cu> {
    pub fn from_encoded(enc: Encoded<Cu>, sample_rate: u32) -> Self {
        Self {
            core: LoudsCore::new(enc.lbs, enc.labels, enc.is_leaf, sample_rate),
        }
    }

    pub fn node_index(&self, key: &[Cu]) -> Option<usize> {
        self.core.node_index(key)
    }

    pub fn label_path(&self, node_index: usize) -> Vec<Cu> {
        self.core.label_path(node_index)
    }

    pub fn common_prefix_search(&self, query: &[Cu]) -> Vec<Vec<Cu>> {
        self.core.common_prefix_search(query)
    }

    /// `common_prefix_search` over a `&str` query, decoding results back to `String`.
    pub fn common_prefix_search_str(&self, query: &str) -> Vec<String> {
        let units = crate::codeunit::encode_str::<Cu>(query);
        self.core
            .common_prefix_search(&units)
            .into_iter()
            .map(|u| decode_units::<Cu>(&u))
            .collect()
    }

    pub(crate) fn core(&self) -> &LoudsCore<Cu> {
        &self.core
    }
}

/// A LOUDS dictionary that additionally stores one term-id per inserted key.
#[derive(Debug)]
pub struct LoudsDictWithTermIds<Cu> {
    core: LoudsCore<Cu>,
    term_ids: Vec<i32>,
}

impl<Cu: CodeUnit> LoudsDictWithTermIds<Cu> {
    pub fn from_encoded(enc: Encoded<Cu>, sample_rate: u32) -> Self {
        let term_ids = enc.term_ids.clone();
        Self {
            core: LoudsCore::new(enc.lbs, enc.labels, enc.is_leaf, sample_rate),
            term_ids,
        }
    }

    pub fn node_index(&self, key: &[Cu]) -> Option<usize> {
        self.core.node_index(key)
    }

    pub fn label_path(&self, node_index: usize) -> Vec<Cu> {
        self.core.label_path(node_index)
    }

    pub fn common_prefix_search(&self, query: &[Cu]) -> Vec<Vec<Cu>> {
        self.core.common_prefix_search(query)
    }

    pub fn common_prefix_search_str(&self, query: &str) -> Vec<String> {
        let units = crate::codeunit::encode_str::<Cu>(query);
        self.core
            .common_prefix_search(&units)
            .into_iter()
            .map(|u| decode_units::<Cu>(&u))
            .collect()
    }

    /// Term-id of the key ending at `node_index`, or `-1` if `node_index` is
    /// not a leaf.
    pub fn term_id(&self, node_index: usize) -> i32 {
        if !self.core.is_leaf(node_index) {
            return -1;
        }
        // `rank1` on the isLeaf vector is exclusive of `node_index`, so it
        // already counts the leaves encountered strictly before this one,
        // i.e. this leaf's 0-indexed position in encounter order.
        let leaf_index = self.core.is_leaf.rank1(node_index);
        match self.term_ids.get(leaf_index) {
            Some(&id) => id,
            None => -1,
        }
    }

    pub(crate) fn core(&self) -> &LoudsCore<Cu> {
        &self.core
    }

    pub(crate) fn term_ids(&self) -> &[i32] {
        &self.term_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeunit::encode_str;
    use crate::encoder::encode;
    use crate::trie::Trie;

    fn build_termid(keys: &[&str]) -> LoudsDictWithTermIds<u16> {
        let mut trie: Trie<u16> = Trie::new();
        for k in keys {
            trie.insert(&encode_str::<u16>(k));
        }
        let enc = encode(&trie);
        LoudsDictWithTermIds::from_encoded(enc, 256)
    }

    fn build_plain(keys: &[&str]) -> LoudsDict<u16> {
        let mut trie: Trie<u16> = Trie::new();
        for k in keys {
            trie.insert(&encode_str::<u16>(k));
        }
        let enc = encode(&trie);
        LoudsDict::from_encoded(enc, 256)
    }

    #[test]
    fn scenario_a_ab_abc() {
        let dict = build_termid(&["a", "ab", "abc"]);
        let hits = dict.common_prefix_search_str("abcd");
        assert_eq!(hits, vec!["a", "ab", "abc"]);

        for (key, expected_id) in [("a", 1), ("ab", 2), ("abc", 3)] {
            let units = encode_str::<u16>(key);
            let idx = dict.node_index(&units).unwrap();
            assert_eq!(dict.term_id(idx), expected_id);
        }
    }

    #[test]
    fn scenario_japanese() {
        let dict = build_termid(&["す", "すみ", "すみれ"]);
        let hits = dict.common_prefix_search_str("すみれいろ");
        assert_eq!(hits, vec!["す", "すみ", "すみれ"]);

        let units = encode_str::<u16>("すみれ");
        let idx = dict.node_index(&units).unwrap();
        assert_eq!(dict.term_id(idx), 3);
    }

    #[test]
    fn scenario_cat_car_cart_sibling_scan() {
        let dict = build_termid(&["cat", "car", "cart"]);
        let hits = dict.common_prefix_search_str("cart");
        assert_eq!(hits, vec!["car", "cart"]);

        let car_idx = dict.node_index(&encode_str::<u16>("car")).unwrap();
        let cart_idx = dict.node_index(&encode_str::<u16>("cart")).unwrap();
        assert_eq!(dict.term_id(car_idx), 2);
        assert_eq!(dict.term_id(cart_idx), 3);
    }

    #[test]
    fn duplicate_insert_overwrites_term_id() {
        let dict = build_termid(&["a", "a"]);
        let idx = dict.node_index(&encode_str::<u16>("a")).unwrap();
        assert_eq!(dict.term_id(idx), 2);
    }

    #[test]
    fn empty_query_and_missing_key() {
        let dict = build_termid(&["a", "ab"]);
        assert!(dict.common_prefix_search_str("").is_empty());
        assert!(dict.node_index(&[]).is_none());
        assert!(dict.common_prefix_search_str("xyz").is_empty());
        assert!(dict.node_index(&encode_str::<u16>("xyz")).is_none());
    }

    #[test]
    fn term_id_on_non_leaf_is_negative_one() {
        let dict = build_termid(&["ab"]);
        let a_idx = dict.node_index(&encode_str::<u16>("a")).unwrap();
        assert_eq!(dict.term_id(a_idx), -1);
    }

    #[test]
    fn label_path_round_trips() {
        let dict = build_termid(&["a", "ab", "abc", "abd"]);
        for key in ["a", "ab", "abc", "abd"] {
            let units = encode_str::<u16>(key);
            let idx = dict.node_index(&units).unwrap();
            let path = dict.label_path(idx);
            assert_eq!(decode_units::<u16>(&path), key);
        }
    }

    #[test]
    fn single_key_prefix_boundaries() {
        let dict = build_plain(&["K"]);
        assert_eq!(dict.common_prefix_search_str("K"), vec!["K"]);
        assert_eq!(dict.common_prefix_search_str("Kx"), vec!["K"]);
        assert!(dict.common_prefix_search_str("L").is_empty());
    }

    #[test]
    fn plain_dict_has_no_term_id_method() {
        // Compile-time assertion: LoudsDict has no `term_id`; this test just
        // exercises its actual surface.
        let dict = build_plain(&["a", "ab"]);
        assert_eq!(dict.common_prefix_search_str("ab"), vec!["a", "ab"]);
    }
}
