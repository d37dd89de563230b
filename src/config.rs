//! Tunables for building and loading a dictionary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the trie builder and the dictionary reader.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Select sample rate for the succinct bit vector index (default: 256).
    ///
    /// Lower values speed up `select0`/`select1` at the cost of more index memory.
    pub select_sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            select_sample_rate: 256,
        }
    }
}

impl Config {
    /// Set the select sample rate.
    pub fn with_select_sample_rate(mut self, rate: u32) -> Self {
        self.select_sample_rate = rate;
        self
    }
}
