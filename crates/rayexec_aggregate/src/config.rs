use std::sync::Arc;

use rayexec_error::{Result, ResultExt};
use serde::{Deserialize, Serialize};

use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;

/// Configuration for the accumulators of a single hash aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Chunking of group slots. Must match the chunking of the hash table
    /// producing ordinals.
    #[serde(rename = "bits_in_chunk")]
    pub layout: ChunkLayout,

    /// Max bytes all accumulators may reserve for chunk memory. Unlimited if
    /// not set.
    pub memory_limit: Option<usize>,
}

impl AccumulatorConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Failed to parse accumulator config")
    }

    /// Create a memory tracker enforcing this config's limit.
    pub fn memory_tracker(&self) -> Arc<MemoryTracker> {
        Arc::new(MemoryTracker::new(self.memory_limit))
    }
}
