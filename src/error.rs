//! Error types for loading a serialized dictionary.

#[cfg(not(any(test, feature = "std")))]
use alloc::string::String;

/// Why a dictionary failed to load from its binary representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The 8-byte header magic did not match `LOUDSv1\0`.
    BadMagic { found: [u8; 8] },

    /// The header's version field is not one this build knows how to read.
    UnsupportedVersion { found: u32 },

    /// The stream ended before the full header/body/trailer could be read.
    Truncated { expected_at_least: usize, found: usize },

    /// Parallel arrays that must agree in length (e.g. LBS and `isLeaf`) did not.
    InconsistentCounts { what: &'static str, a: usize, b: usize },

    /// The trailing CRC-32 did not match the recomputed checksum.
    ChecksumMismatch { expected: u32, found: u32 },

    /// Underlying I/O failure while reading the file.
    #[cfg(feature = "std")]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoadError::BadMagic { found } => {
                write!(f, "bad magic bytes in dictionary header: {found:?}")
            }
            LoadError::UnsupportedVersion { found } => {
                write!(f, "unsupported dictionary format version {found}")
            }
            LoadError::Truncated { expected_at_least, found } => write!(
                f,
                "truncated dictionary file: expected at least {expected_at_least} bytes, found {found}"
            ),
            LoadError::InconsistentCounts { what, a, b } => {
                write!(f, "inconsistent {what} counts: {a} != {b}")
            }
            LoadError::ChecksumMismatch { expected, found } => write!(
                f,
                "checksum mismatch: expected {expected:#010x}, computed {found:#010x}"
            ),
            #[cfg(feature = "std")]
            LoadError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoadError {}
