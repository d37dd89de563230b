//! # louds-dict
//!
//! A compact, read-optimized trie dictionary for large vocabularies, built on a
//! LOUDS (Level-Order Unary Degree Sequence) succinct tree encoding.
//!
//! A dictionary is built once from a sequence of keys ([`trie::Trie`] +
//! [`encoder::encode`]), then served read-only via [`dict::LoudsDict`] (prefix lookups
//! only) or [`dict::LoudsDictWithTermIds`] (prefix lookups plus a dense integer id per
//! key). Both wrap the same rank/select-backed navigation core, so querying never
//! touches the build-time trie once encoding is done.
//!
//! ## Module Organization
//!
//! - [`bits`] - word-packed bit storage plus O(1)-amortized rank/select
//! - [`codeunit`] - the generic alphabet symbol (UTF-16 code unit or `char`/u32)
//! - [`trie`] - the build-time arena trie
//! - [`encoder`] - BFS trie → LOUDS array conversion
//! - [`dict`] - the read-only dictionary types and their query algorithms
//! - [`binary`] - on-disk serialization (header + body + CRC-32 trailer)
//! - [`config`] - tunables shared by the builder and the reader
//! - [`error`] - [`error::LoadError`], returned by [`binary::load_dict`] and friends
//!
//! ## Quick Start
//!
//! ```
//! use louds_dict::codeunit::encode_str;
//! use louds_dict::dict::LoudsDictWithTermIds;
//! use louds_dict::encoder::encode;
//! use louds_dict::trie::Trie;
//!
//! let mut trie: Trie<u16> = Trie::new();
//! trie.insert(&encode_str("a"));
//! trie.insert(&encode_str("ab"));
//! trie.insert(&encode_str("abc"));
//!
//! let dict = LoudsDictWithTermIds::from_encoded(encode(&trie), 256);
//! assert_eq!(dict.common_prefix_search_str("abcd"), vec!["a", "ab", "abc"]);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

pub mod bits;
pub mod binary;
pub mod codeunit;
pub mod config;
pub mod dict;
pub mod encoder;
pub mod error;
pub mod trie;

pub mod text;

pub use bits::{BitVec, RankSelect, SuccinctBitVector};
pub use codeunit::CodeUnit;
pub use config::Config;
pub use dict::{LoudsDict, LoudsDictWithTermIds};
pub use encoder::{encode, Encoded};
pub use error::LoadError;
pub use trie::{NodeId, Trie};
