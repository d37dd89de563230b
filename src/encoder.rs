//! Breadth-first conversion of a [`Trie`] into its LOUDS arrays.

#[cfg(not(any(test, feature = "std")))]
use alloc::{collections::VecDeque, vec::Vec};
#[cfg(any(test, feature = "std"))]
use std::collections::VecDeque;

use crate::bits::BitVec;
use crate::codeunit::CodeUnit;
use crate::trie::{NodeId, Trie};

/// The flat LOUDS arrays produced by [`encode`].
///
/// `lbs[0..2]` are the reserved super-root sentinel bits (the super-root has
/// exactly one child, the real root); `labels[0]` is the matching sentinel
/// label. `labels` is indexed by `rank1(pos)` rather than by LBS position, so
/// it carries exactly one sentinel slot, not two.
pub struct Encoded<Cu> {
    pub lbs: BitVec,
    pub labels: Vec<Cu>,
    pub is_leaf: BitVec,
    pub term_ids: Vec<i32>,
}

/// BFS-encode `trie` into LOUDS form.
///
/// Children of each node are emitted in the trie's own iteration order
/// (insertion order, see [`crate::trie`]).
pub fn encode<Cu: CodeUnit>(trie: &Trie<Cu>) -> Encoded<Cu> {
    let mut lbs = BitVec::new();
    let mut labels: Vec<Cu> = Vec::new();
    let mut is_leaf = BitVec::new();
    let mut term_ids: Vec<i32> = Vec::new();

    // Reserved sentinel: the super-root has exactly one child, the real root.
    lbs.push(true);
    lbs.push(false);
    labels.push(Cu::SENTINEL);
    is_leaf.push(false);
    is_leaf.push(false);

    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(trie.root());

    while let Some(v) = queue.pop_front() {
        for (c, w) in trie.children(v) {
            lbs.push(true);
            labels.push(c);
            let leaf = trie.is_word(w);
            is_leaf.push(leaf);
            if leaf {
                term_ids.push(trie.term_id(w));
            }
            queue.push_back(w);
        }
        lbs.push(false);
        is_leaf.push(false);
    }

    Encoded { lbs, labels, is_leaf, term_ids }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeunit::encode_str;

    fn bits_to_string(bv: &BitVec) -> alloc::string::String {
        (0..bv.len()).map(|i| if bv.get(i) { '1' } else { '0' }).collect()
    }

    #[test]
    fn encodes_single_key() {
        let mut trie: Trie<u16> = Trie::new();
        trie.insert(&encode_str::<u16>("a"));
        let enc = encode(&trie);
        // super-root(1 child)0, root(1 child: 'a')0, 'a'(0 children)0
        assert_eq!(bits_to_string(&enc.lbs), "10100");
        assert_eq!(enc.labels.len(), 2); // 1 sentinel + 'a'
        assert!(enc.is_leaf.get(2));
    }

    #[test]
    fn prefix_chain_is_linear() {
        let mut trie: Trie<u16> = Trie::new();
        trie.insert(&encode_str::<u16>("a"));
        trie.insert(&encode_str::<u16>("ab"));
        trie.insert(&encode_str::<u16>("abc"));
        let enc = encode(&trie);
        assert_eq!(enc.term_ids, vec![1, 2, 3]);
        // every isLeaf bit past the sentinels is 1 except the terminal 0-children markers
        assert_eq!(enc.is_leaf.len(), enc.lbs.len());
    }

    #[test]
    fn sibling_order_matches_insertion() {
        let mut trie: Trie<u16> = Trie::new();
        trie.insert(&encode_str::<u16>("cart"));
        trie.insert(&encode_str::<u16>("cat"));
        trie.insert(&encode_str::<u16>("car"));
        let enc = encode(&trie);
        // 'c' -> 'a' -> {'r','t'} in that order (r from "cart", t from "cat", re-touching r via "car")
        let r = b'r' as u16;
        let t = b't' as u16;
        assert_eq!(enc.labels[3], r);
        assert_eq!(enc.labels[4], t);
    }
}
