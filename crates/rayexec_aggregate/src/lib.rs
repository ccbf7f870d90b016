//! Grouped MIN/MAX accumulators for hash aggregates.
//!
//! Accumulators store one slot per group ordinal in chunks matching the hash
//! table's chunking, along with a bit per slot recording if any non-null value
//! has been seen.

pub mod chunked;
pub mod config;
pub mod kernel;
pub mod layout;
pub mod memory;
pub mod registry;
pub mod set;
pub mod validity;

pub use config::AccumulatorConfig;
pub use kernel::{ExtremumKind, GroupedAccumulator};
pub use layout::ChunkLayout;
pub use memory::MemoryTracker;
pub use registry::new_grouped_accumulator;
pub use set::{AccumulatorSet, AggregateSpec, OrdinalSource};
