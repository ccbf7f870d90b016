//! Accumulation kernels.
//!
//! Every kernel folds a batch of input values into per-group slots addressed
//! by ordinals from the hash table. Values live in a chunked value region and
//! per-slot null state lives in a chunked validity region with the same
//! chunking.

pub mod boolean;
pub mod interval;
pub mod numeric;
pub mod primitive;

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use rayexec_bullet::array::Array;
use rayexec_bullet::datatype::DataType;
use rayexec_bullet::scalar::ScalarValue;
use rayexec_error::{RayexecError, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chunked::ChunkedBuffer;
use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;
use crate::validity::ValidityTracker;

/// Which extreme value an accumulator keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremumKind {
    Min,
    Max,
}

impl ExtremumKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Compile-time selection of MIN or MAX for a kernel.
///
/// Kernels match on `KIND` in their inner loops. Since it's a constant the
/// match is resolved during monomorphization.
pub trait Extremum: Debug + Default + Clone + Copy + Send + Sync + 'static {
    const KIND: ExtremumKind;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Min;

impl Extremum for Min {
    const KIND: ExtremumKind = ExtremumKind::Min;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Max;

impl Extremum for Max {
    const KIND: ExtremumKind = ExtremumKind::Max;
}

/// A MIN or MAX accumulator over chunked group slots.
///
/// Accumulators are driven by a single owner. Parallel aggregation gives each
/// partition its own accumulator.
pub trait GroupedAccumulator: Debug + Send {
    /// Needed to allow downcasting to the concrete type for typed reads of the
    /// value region.
    fn as_any(&self) -> &dyn Any;

    /// Name of the accumulator, e.g. "min_int32".
    fn name(&self) -> String;

    /// Data type of the input column this accumulator folds.
    fn input_datatype(&self) -> DataType;

    fn layout(&self) -> ChunkLayout;

    /// Number of chunks currently allocated.
    fn num_chunks(&self) -> usize;

    /// Bytes allocated for both the value and validity regions.
    fn allocated_bytes(&self) -> usize;

    /// Ensure at least `num_chunks` chunks are allocated and initialized.
    ///
    /// Called when the ordinal source grows.
    fn resize(&mut self, num_chunks: usize) -> Result<()>;

    /// Fold a batch into the group slots.
    ///
    /// `ordinals[i]` is the group for row `i` of `input`. Chunks needed by any
    /// ordinal in the batch are allocated before the first row is applied.
    fn accumulate(&mut self, input: &Array, ordinals: &[u32]) -> Result<()>;

    /// Restore every allocated slot to the identity value and mark it invalid.
    ///
    /// Allocated chunks are kept.
    fn reset(&mut self);

    /// Get validity words for a chunk.
    fn validity_chunk(&self, chunk_idx: usize) -> Option<&[u32]>;

    /// Check if any non-null value has been folded into the slot for
    /// `ordinal`. Slots in unallocated chunks are never valid.
    fn is_valid(&self, ordinal: u32) -> bool;

    /// Read the slot for `ordinal` as a scalar, NULL if the slot is invalid.
    fn scalar(&self, ordinal: u32) -> Result<ScalarValue>;
}

/// Value and validity regions for a single accumulator.
#[derive(Debug)]
pub struct SlotRegions<T> {
    pub(crate) layout: ChunkLayout,
    pub(crate) identity: T,
    pub(crate) values: ChunkedBuffer<T>,
    pub(crate) validity: ValidityTracker,
}

impl<T: Copy + Debug> SlotRegions<T> {
    /// Create empty regions.
    ///
    /// `values_per_chunk` is the number of `T` elements per value chunk. This
    /// is the chunk capacity for one-slot-per-element types, and the number of
    /// words per chunk for bit-packed types.
    pub fn new(
        layout: ChunkLayout,
        values_per_chunk: usize,
        identity: T,
        memory: Arc<MemoryTracker>,
    ) -> Self {
        SlotRegions {
            layout,
            identity,
            values: ChunkedBuffer::new(values_per_chunk, memory.clone()),
            validity: ValidityTracker::new(layout, memory),
        }
    }

    pub fn num_chunks(&self) -> usize {
        self.values.num_chunks()
    }

    pub fn allocated_bytes(&self) -> usize {
        self.values.allocated_bytes() + self.validity.allocated_bytes()
    }

    /// Grow both regions to `num_chunks`, initializing new value chunks to the
    /// identity.
    ///
    /// On failure both regions are rolled back to their previous size.
    pub fn ensure_chunks(&mut self, num_chunks: usize) -> Result<()> {
        let current = self.values.num_chunks();
        if num_chunks <= current {
            return Ok(());
        }

        let grown = match self.values.try_grow(num_chunks, self.identity) {
            Ok(_) => self.validity.try_grow(num_chunks),
            Err(e) => Err(e),
        };

        if let Err(e) = grown {
            self.values.truncate(current);
            self.validity.truncate(current);
            return Err(e);
        }

        trace!(
            from = current,
            to = num_chunks,
            chunk_capacity = self.layout.chunk_capacity(),
            "grew accumulator chunks"
        );

        Ok(())
    }

    /// Grow so that every ordinal in `ordinals` is addressable.
    pub fn ensure_ordinals(&mut self, ordinals: &[u32]) -> Result<()> {
        match ordinals.iter().copied().max() {
            Some(max) => self.ensure_chunks(self.layout.chunks_for_ordinal(max)),
            None => Ok(()),
        }
    }

    pub fn reset(&mut self) {
        self.values.fill_all(self.identity);
        self.validity.clear();
        trace!(num_chunks = self.num_chunks(), "reset accumulator chunks");
    }

    pub fn is_valid(&self, ordinal: u32) -> bool {
        let addr = self.layout.address(ordinal);
        addr.chunk_idx < self.num_chunks() && self.validity.is_valid(addr)
    }

    /// Error if `ordinal` points into a chunk that hasn't been allocated.
    pub fn check_allocated(&self, ordinal: u32) -> Result<()> {
        let addr = self.layout.address(ordinal);
        if addr.chunk_idx >= self.num_chunks() {
            return Err(RayexecError::new(format!(
                "Ordinal {ordinal} is in chunk {}, but only {} chunks are allocated",
                addr.chunk_idx,
                self.num_chunks()
            )));
        }
        Ok(())
    }
}

/// Check that the input column covers every ordinal.
pub(crate) fn check_input_len(input: &Array, ordinals: &[u32]) -> Result<()> {
    if input.len() < ordinals.len() {
        return Err(RayexecError::new(format!(
            "Input has {} rows, but {} ordinals were provided",
            input.len(),
            ordinals.len()
        )));
    }
    Ok(())
}

/// Error for an input array that doesn't match the accumulator's type.
pub(crate) fn unexpected_input_error(name: &str, input: &Array) -> RayexecError {
    RayexecError::new(format!(
        "Unexpected input type for {name}: {}",
        input.datatype()
    ))
}
