//! Simulator configuration.
//!
//! APEX has exactly one pipeline shape, so this is a handful of constants
//! rather than the cache-hierarchy/branch-predictor/SoC-memory-map surface
//! a configurable superscalar machine needs. `#[serde(default)]` on every
//! field means the common case — no `--config` file at all — runs with
//! in-spec defaults.

use serde::Deserialize;

fn default_data_memory_size() -> usize {
    4096
}

fn default_code_memory_base() -> i32 {
    4000
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Number of words in data memory.
    #[serde(default = "default_data_memory_size")]
    pub data_memory_size: usize,
    /// Program counter of the first instruction in code memory.
    #[serde(default = "default_code_memory_base")]
    pub code_memory_base: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_memory_size: default_data_memory_size(),
            code_memory_base: default_code_memory_base(),
        }
    }
}
