//! Integration tests for binary serialization.

use louds_dict::binary::{
    bytes_to_words, bytes_to_words_vec, load_dict, load_dict_with_term_ids, save_dict,
    save_dict_with_term_ids, try_bytes_to_words, words_to_bytes,
};
use louds_dict::codeunit::encode_str;
use louds_dict::encoder::encode;
use louds_dict::trie::Trie;

// ============================================================================
// Basic word/byte conversion tests
// ============================================================================

#[test]
fn test_empty_roundtrip() {
    let words: Vec<u64> = vec![];
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_single_word_roundtrip() {
    let words = vec![0xDEAD_BEEF_CAFE_BABEu64];
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_multiple_words_roundtrip() {
    let words: Vec<u64> = (0..100).map(|i| i * 0x0123_4567_89AB_CDEF).collect();
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_all_zeros() {
    let words = vec![0u64; 1000];
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_all_ones() {
    let words = vec![u64::MAX; 1000];
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_alternating_pattern() {
    let words = vec![0xAAAA_AAAA_AAAA_AAAAu64, 0x5555_5555_5555_5555u64];
    let bytes = words_to_bytes(&words);
    let recovered = bytes_to_words_vec(&bytes);
    assert_eq!(words, recovered);
}

#[test]
fn test_try_bytes_valid() {
    let bytes = [0u8; 64];
    assert!(try_bytes_to_words(&bytes).is_some());
    assert_eq!(try_bytes_to_words(&bytes).unwrap().len(), 8);
}

#[test]
fn test_try_bytes_invalid() {
    let bytes = [0u8; 7];
    assert!(try_bytes_to_words(&bytes).is_none());
}

#[test]
#[should_panic(expected = "must be a multiple of 8")]
fn test_bytes_to_words_invalid_length() {
    let bytes = [0u8; 13];
    let _ = bytes_to_words(&bytes);
}

// ============================================================================
// Dictionary round-trip tests
// ============================================================================

fn build_keys<const N: usize>(keys: [&str; N]) -> louds_dict::encoder::Encoded<u16> {
    let mut trie: Trie<u16> = Trie::new();
    for k in keys {
        trie.insert(&encode_str::<u16>(k));
    }
    encode(&trie)
}

#[test]
fn test_plain_dictionary_roundtrip() {
    let encoded = build_keys(["cat", "car", "cart", "dog"]);
    let bytes = save_dict(&encoded);
    let dict = load_dict::<u16>(&bytes, 256).unwrap();

    assert_eq!(dict.common_prefix_search_str("cartoon"), vec!["car", "cart"]);
    assert!(dict.common_prefix_search_str("dogma").contains(&"dog".to_string()));
}

#[test]
fn test_term_id_dictionary_roundtrip() {
    let encoded = build_keys(["a", "ab", "abc"]);
    let bytes = save_dict_with_term_ids(&encoded);
    let dict = load_dict_with_term_ids::<u16>(&bytes, 256).unwrap();

    for (key, expected_id) in [("a", 1), ("ab", 2), ("abc", 3)] {
        let idx = dict.node_index(&encode_str::<u16>(key)).unwrap();
        assert_eq!(dict.term_id(idx), expected_id);
    }
}

#[test]
fn test_japanese_keys_roundtrip() {
    let encoded = build_keys(["す", "すみ", "すみれ"]);
    let bytes = save_dict_with_term_ids(&encoded);
    let dict = load_dict_with_term_ids::<u16>(&bytes, 256).unwrap();

    assert_eq!(dict.common_prefix_search_str("すみれいろ"), vec!["す", "すみ", "すみれ"]);
}

#[test]
fn test_write_read_file() {
    let encoded = build_keys(["hello", "help", "helper"]);
    let bytes = save_dict(&encoded);

    let dir = std::env::temp_dir();
    let path = dir.join("louds_dict_test_write_read_file.bin");
    std::fs::write(&path, &bytes).unwrap();

    let read_back = std::fs::read(&path).unwrap();
    let dict = load_dict::<u16>(&read_back, 256).unwrap();
    assert_eq!(dict.common_prefix_search_str("helpers"), vec!["help", "helper"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_variant_mismatch_is_rejected() {
    let encoded = build_keys(["a"]);
    let bytes = save_dict(&encoded);
    assert!(load_dict_with_term_ids::<u16>(&bytes, 256).is_err());

    let encoded_termid = build_keys(["a"]);
    let bytes_termid = save_dict_with_term_ids(&encoded_termid);
    assert!(load_dict::<u16>(&bytes_termid, 256).is_err());
}

// ============================================================================
// Memory-mapped tests (feature-gated)
// ============================================================================

#[cfg(feature = "mmap-tests")]
mod mmap_tests {
    use super::*;
    use louds_dict::binary::mmap::{load_dict_mmap, load_dict_with_term_ids_mmap};

    #[test]
    fn test_mmap_plain_dict() {
        let encoded = build_keys(["cat", "car", "cart"]);
        let bytes = save_dict(&encoded);

        let dir = std::env::temp_dir();
        let path = dir.join("louds_dict_test_mmap_plain.bin");
        std::fs::write(&path, &bytes).unwrap();

        let dict = load_dict_mmap::<u16>(&path, 256).unwrap();
        assert_eq!(dict.common_prefix_search_str("cartoon"), vec!["car", "cart"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_mmap_term_id_dict() {
        let encoded = build_keys(["a", "ab", "abc"]);
        let bytes = save_dict_with_term_ids(&encoded);

        let dir = std::env::temp_dir();
        let path = dir.join("louds_dict_test_mmap_termid.bin");
        std::fs::write(&path, &bytes).unwrap();

        let dict = load_dict_with_term_ids_mmap::<u16>(&path, 256).unwrap();
        let idx = dict.node_index(&encode_str::<u16>("ab")).unwrap();
        assert_eq!(dict.term_id(idx), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_mmap_invalid_size_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("louds_dict_test_mmap_invalid.bin");
        std::fs::write(&path, [0u8; 13]).unwrap();

        let result = load_dict_mmap::<u16>(&path, 256);
        assert!(result.is_err());

        let _ = std::fs::remove_file(&path);
    }
}
