//! Binary serialization: byte/word conversion helpers, plus the on-disk dictionary
//! format (header + body + trailing CRC-32).
//!
//! Layout, little-endian throughout:
//! `magic[8] = b"LOUDSv1\0"`, `u32 version`, `u32 flags` (bit0 = has term ids, bit1 =
//! code unit is u32), then for LBS and `isLeaf`: `u64 nbits, u64 n_words, n_words *
//! u64`, then `u64 n_labels, n_labels * W` (`W` = 2 or 4 bytes per [`CodeUnit::BYTE_WIDTH`]),
//! then if `has term ids`: `u64 n_termids, n_termids * i32`, and finally a trailing
//! `u32` CRC-32/ISO-HDLC over every preceding byte.

#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

use bytemuck::{cast_slice, cast_slice_mut, Pod};

use crate::bits::BitVec;
use crate::codeunit::CodeUnit;
use crate::dict::{LoudsDict, LoudsDictWithTermIds};
use crate::encoder::Encoded;
use crate::error::LoadError;

const MAGIC: [u8; 8] = *b"LOUDSv1\0";
const VERSION: u32 = 1;
const FLAG_HAS_TERM_IDS: u32 = 1 << 0;
const FLAG_CODE_UNIT_U32: u32 = 1 << 1;

/// Reinterpret a `&[u64]` as its little-endian byte representation.
///
/// Allocates a fresh little-endian `Vec<u8>` on big-endian targets; zero-copy on
/// little-endian ones.
pub fn words_to_bytes(words: &[u64]) -> Vec<u8> {
    le_bytes(words)
}

/// Reinterpret `bytes` as `&[u64]` without copying.
///
/// Panics if `bytes.len()` is not a multiple of 8.
pub fn bytes_to_words(bytes: &[u8]) -> &[u64] {
    assert!(bytes.len() % 8 == 0, "byte slice length must be a multiple of 8, got {}", bytes.len());
    cast_slice(bytes)
}

/// Like [`bytes_to_words`] but returns `None` instead of panicking on a bad length.
pub fn try_bytes_to_words(bytes: &[u8]) -> Option<&[u64]> {
    if bytes.len() % 8 == 0 {
        Some(cast_slice(bytes))
    } else {
        None
    }
}

/// Owned variant of [`bytes_to_words`]; copies into a little-endian-correct `Vec<u64>`.
pub fn bytes_to_words_vec(bytes: &[u8]) -> Vec<u64> {
    assert!(bytes.len() % 8 == 0, "byte slice length must be a multiple of 8, got {}", bytes.len());
    if cfg!(target_endian = "little") {
        bytes_to_words(bytes).to_vec()
    } else {
        bytes.chunks_exact(8).map(|c| u64::from_le_bytes(c.try_into().unwrap())).collect()
    }
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn word_vec(&mut self, words: &[u64]) {
        self.u64(words.len() as u64);
        self.bytes(&words_to_bytes(words));
    }

    fn bit_vec(&mut self, bv: &BitVec) {
        self.u64(bv.len() as u64);
        self.word_vec(bv.words());
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], LoadError> {
        if self.pos + n > self.buf.len() {
            return Err(LoadError::Truncated {
                expected_at_least: self.pos + n,
                found: self.buf.len(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, LoadError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64, LoadError> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn word_vec(&mut self) -> Result<Vec<u64>, LoadError> {
        let n = self.u64()? as usize;
        let bytes = self.take(n * 8)?;
        Ok(bytes_to_words_vec(bytes))
    }

    fn bit_vec(&mut self) -> Result<BitVec, LoadError> {
        let nbits = self.u64()? as usize;
        let words = self.word_vec()?;
        if words.len() != nbits.div_ceil(64) && !(words.is_empty() && nbits == 0) {
            return Err(LoadError::InconsistentCounts {
                what: "bit vector words vs nbits",
                a: words.len(),
                b: nbits.div_ceil(64),
            });
        }
        Ok(BitVec::from_words(words, nbits))
    }

    fn labels_u16(&mut self) -> Result<Vec<u16>, LoadError> {
        let n = self.u64()? as usize;
        let bytes = self.take(n * 2)?;
        let mut out = vec![0u16; n];
        cast_slice_mut::<u16, u8>(&mut out).copy_from_slice(bytes);
        if cfg!(not(target_endian = "little")) {
            for v in &mut out {
                *v = u16::from_le(*v);
            }
        }
        Ok(out)
    }

    fn labels_u32(&mut self) -> Result<Vec<u32>, LoadError> {
        let n = self.u64()? as usize;
        let bytes = self.take(n * 4)?;
        let mut out = vec![0u32; n];
        cast_slice_mut::<u32, u8>(&mut out).copy_from_slice(bytes);
        if cfg!(not(target_endian = "little")) {
            for v in &mut out {
                *v = u32::from_le(*v);
            }
        }
        Ok(out)
    }

    fn term_ids(&mut self) -> Result<Vec<i32>, LoadError> {
        let n = self.u64()? as usize;
        let bytes = self.take(n * 4)?;
        let mut out = vec![0i32; n];
        cast_slice_mut::<i32, u8>(&mut out).copy_from_slice(bytes);
        if cfg!(not(target_endian = "little")) {
            for v in &mut out {
                *v = i32::from_le(*v);
            }
        }
        Ok(out)
    }
}

fn write_labels<Cu: CodeUnit>(w: &mut Writer, labels: &[Cu]) {
    w.u64(labels.len() as u64);
    if Cu::BYTE_WIDTH == 2 {
        let raw: Vec<u16> = labels.iter().map(|&c| c.to_u32() as u16).collect();
        w.bytes(&le_bytes(&raw));
    } else {
        let raw: Vec<u32> = labels.iter().map(|&c| c.to_u32()).collect();
        w.bytes(&le_bytes(&raw));
    }
}

/// Byte-swap-safe little-endian encoding of a `Pod` slice.
///
/// `bytemuck::cast_slice` reinterprets bytes in native endianness, which is only
/// the on-disk little-endian format on little-endian hosts; the manual fallback
/// keeps big-endian hosts reading/writing the same bytes.
fn le_bytes<T: Pod + IntoLeBytes>(v: &[T]) -> Vec<u8> {
    if cfg!(target_endian = "little") {
        cast_slice::<T, u8>(v).to_vec()
    } else {
        let mut out = Vec::with_capacity(v.len() * core::mem::size_of::<T>());
        for x in v {
            out.extend_from_slice(x.to_le_bytes().as_ref());
        }
        out
    }
}

trait IntoLeBytes {
    type Bytes: AsRef<[u8]>;
    fn to_le_bytes(&self) -> Self::Bytes;
}

impl IntoLeBytes for u16 {
    type Bytes = [u8; 2];
    fn to_le_bytes(&self) -> Self::Bytes {
        u16::to_le_bytes(*self)
    }
}

impl IntoLeBytes for u32 {
    type Bytes = [u8; 4];
    fn to_le_bytes(&self) -> Self::Bytes {
        u32::to_le_bytes(*self)
    }
}

impl IntoLeBytes for i32 {
    type Bytes = [u8; 4];
    fn to_le_bytes(&self) -> Self::Bytes {
        i32::to_le_bytes(*self)
    }
}

impl IntoLeBytes for u64 {
    type Bytes = [u8; 8];
    fn to_le_bytes(&self) -> Self::Bytes {
        u64::to_le_bytes(*self)
    }
}

/// Serialize `encoded` plus its code-unit width and whether it carries term ids into
/// the on-disk dictionary format.
fn write_dictionary<Cu: CodeUnit>(encoded: &Encoded<Cu>, with_term_ids: bool) -> Vec<u8> {
    let mut w = Writer::new();
    w.bytes(&MAGIC);
    w.u32(VERSION);
    let mut flags = 0u32;
    if with_term_ids {
        flags |= FLAG_HAS_TERM_IDS;
    }
    if Cu::BYTE_WIDTH == 4 {
        flags |= FLAG_CODE_UNIT_U32;
    }
    w.u32(flags);
    w.bit_vec(&encoded.lbs);
    w.bit_vec(&encoded.is_leaf);
    write_labels(&mut w, &encoded.labels);
    if with_term_ids {
        w.u64(encoded.term_ids.len() as u64);
        w.bytes(&le_bytes(&encoded.term_ids));
    }
    let crc = crc32fast::hash(&w.buf);
    w.u32(crc);
    w.buf
}

struct ParsedHeader {
    with_term_ids: bool,
    code_unit_u32: bool,
}

fn read_header(r: &mut Reader<'_>) -> Result<ParsedHeader, LoadError> {
    let magic: [u8; 8] = r.take(8)?.try_into().unwrap();
    if magic != MAGIC {
        return Err(LoadError::BadMagic { found: magic });
    }
    let version = r.u32()?;
    if version != VERSION {
        return Err(LoadError::UnsupportedVersion { found: version });
    }
    let flags = r.u32()?;
    Ok(ParsedHeader {
        with_term_ids: flags & FLAG_HAS_TERM_IDS != 0,
        code_unit_u32: flags & FLAG_CODE_UNIT_U32 != 0,
    })
}

fn verify_trailer(whole: &[u8]) -> Result<(), LoadError> {
    if whole.len() < 4 {
        return Err(LoadError::Truncated { expected_at_least: 4, found: whole.len() });
    }
    let (body, trailer) = whole.split_at(whole.len() - 4);
    let expected = u32::from_le_bytes(trailer.try_into().unwrap());
    let found = crc32fast::hash(body);
    if expected != found {
        return Err(LoadError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

/// Serialize a plain dictionary (no term ids) to bytes.
pub fn save_dict<Cu: CodeUnit>(encoded: &Encoded<Cu>) -> Vec<u8> {
    write_dictionary(encoded, false)
}

/// Serialize a term-id dictionary to bytes.
pub fn save_dict_with_term_ids<Cu: CodeUnit>(encoded: &Encoded<Cu>) -> Vec<u8> {
    write_dictionary(encoded, true)
}

/// Load a plain [`LoudsDict`] previously written by [`save_dict`].
pub fn load_dict<Cu: CodeUnit>(bytes: &[u8], select_sample_rate: u32) -> Result<LoudsDict<Cu>, LoadError> {
    verify_trailer(bytes)?;
    let body = &bytes[..bytes.len() - 4];
    let mut r = Reader::new(body);
    let header = read_header(&mut r)?;
    if header.with_term_ids {
        return Err(LoadError::InconsistentCounts { what: "dictionary variant", a: 1, b: 0 });
    }
    check_code_unit_width::<Cu>(header.code_unit_u32)?;
    let lbs = r.bit_vec()?;
    let is_leaf = r.bit_vec()?;
    let labels = read_labels::<Cu>(&mut r, header.code_unit_u32)?;
    if lbs.len() != is_leaf.len() {
        return Err(LoadError::InconsistentCounts { what: "LBS vs isLeaf length", a: lbs.len(), b: is_leaf.len() });
    }
    let encoded = Encoded { lbs, labels, is_leaf, term_ids: Vec::new() };
    Ok(LoudsDict::from_encoded(encoded, select_sample_rate))
}

/// Load a [`LoudsDictWithTermIds`] previously written by [`save_dict_with_term_ids`].
pub fn load_dict_with_term_ids<Cu: CodeUnit>(
    bytes: &[u8],
    select_sample_rate: u32,
) -> Result<LoudsDictWithTermIds<Cu>, LoadError> {
    verify_trailer(bytes)?;
    let body = &bytes[..bytes.len() - 4];
    let mut r = Reader::new(body);
    let header = read_header(&mut r)?;
    if !header.with_term_ids {
        return Err(LoadError::InconsistentCounts { what: "dictionary variant", a: 0, b: 1 });
    }
    check_code_unit_width::<Cu>(header.code_unit_u32)?;
    let lbs = r.bit_vec()?;
    let is_leaf = r.bit_vec()?;
    let labels = read_labels::<Cu>(&mut r, header.code_unit_u32)?;
    if lbs.len() != is_leaf.len() {
        return Err(LoadError::InconsistentCounts { what: "LBS vs isLeaf length", a: lbs.len(), b: is_leaf.len() });
    }
    let term_ids = r.term_ids()?;
    let leaf_count = is_leaf_popcount(&is_leaf);
    if leaf_count != term_ids.len() {
        return Err(LoadError::InconsistentCounts { what: "isLeaf popcount vs termIds", a: leaf_count, b: term_ids.len() });
    }
    let encoded = Encoded { lbs, labels, is_leaf, term_ids };
    Ok(LoudsDictWithTermIds::from_encoded(encoded, select_sample_rate))
}

/// Count of set bits in `bv`. Safe to sum raw words directly: `BitVec` never sets a
/// bit past its own `len()`, so there is no padding to mask out.
fn is_leaf_popcount(bv: &BitVec) -> usize {
    bv.words().iter().map(|w| w.count_ones() as usize).sum()
}

fn check_code_unit_width<Cu: CodeUnit>(file_is_u32: bool) -> Result<(), LoadError> {
    let expected = Cu::BYTE_WIDTH == 4;
    if expected != file_is_u32 {
        return Err(LoadError::InconsistentCounts {
            what: "code unit width",
            a: Cu::BYTE_WIDTH,
            b: if file_is_u32 { 4 } else { 2 },
        });
    }
    Ok(())
}

fn read_labels<Cu: CodeUnit>(r: &mut Reader<'_>, is_u32: bool) -> Result<Vec<Cu>, LoadError> {
    if is_u32 {
        Ok(r.labels_u32()?.into_iter().map(Cu::from_u32).collect())
    } else {
        Ok(r.labels_u16()?.into_iter().map(|v| Cu::from_u32(v as u32)).collect())
    }
}

#[cfg(feature = "mmap")]
pub mod mmap {
    //! Memory-mapped, read-only loading: maps the file and parses the LOUDS arrays
    //! out of the mapping without copying `lbs`/`is_leaf`/`labels` into owned buffers
    //! for the backing words, beyond what [`super::load_dict`] already needs to do
    //! to byte-swap on big-endian hosts.
    use std::fs::File;
    use std::path::Path;

    use memmap2::Mmap;

    use crate::codeunit::CodeUnit;
    use crate::dict::{LoudsDict, LoudsDictWithTermIds};
    use crate::error::LoadError;

    /// Map `path` and load a plain dictionary from it.
    pub fn load_dict_mmap<Cu: CodeUnit>(path: &Path, select_sample_rate: u32) -> Result<LoudsDict<Cu>, LoadError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        super::load_dict::<Cu>(&mmap, select_sample_rate)
    }

    /// Map `path` and load a term-id dictionary from it.
    pub fn load_dict_with_term_ids_mmap<Cu: CodeUnit>(
        path: &Path,
        select_sample_rate: u32,
    ) -> Result<LoudsDictWithTermIds<Cu>, LoadError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        super::load_dict_with_term_ids::<Cu>(&mmap, select_sample_rate)
    }
}
