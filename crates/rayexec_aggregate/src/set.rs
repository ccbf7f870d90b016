use std::sync::Arc;

use rayexec_bullet::batch::Batch;
use rayexec_bullet::datatype::DataType;
use rayexec_error::{OptionExt, RayexecError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AccumulatorConfig;
use crate::kernel::{ExtremumKind, GroupedAccumulator};
use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;
use crate::registry::new_grouped_accumulator;

/// The hash table handing out group ordinals.
///
/// Accumulators mirror the source's chunking so ordinals translate to slots
/// without division.
pub trait OrdinalSource {
    /// Chunking used when allocating ordinals.
    fn chunk_layout(&self) -> ChunkLayout;

    /// Number of ordinal chunks allocated so far.
    fn num_chunks(&self) -> usize;
}

/// A single MIN or MAX aggregate over one input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// Index of the input column in incoming batches.
    pub input: usize,
    pub kind: ExtremumKind,
    pub datatype: DataType,
}

/// Accumulators for every aggregate in one partition of a hash aggregate.
#[derive(Debug)]
pub struct AccumulatorSet {
    specs: Vec<AggregateSpec>,
    accumulators: Vec<Box<dyn GroupedAccumulator>>,
    memory: Arc<MemoryTracker>,
}

impl AccumulatorSet {
    /// Create accumulators for each aggregate.
    ///
    /// Errors if the config's layout doesn't match the ordinal source. New
    /// accumulators are grown to the source's current number of chunks.
    pub fn try_new(
        config: &AccumulatorConfig,
        source: &dyn OrdinalSource,
        specs: impl IntoIterator<Item = AggregateSpec>,
    ) -> Result<Self> {
        let source_layout = source.chunk_layout();
        if config.layout != source_layout {
            return Err(RayexecError::new(format!(
                "Accumulator chunk layout ({}) does not match ordinal source layout ({})",
                config.layout, source_layout
            )));
        }

        let memory = config.memory_tracker();
        let specs: Vec<_> = specs.into_iter().collect();

        let accumulators = specs
            .iter()
            .map(|spec| {
                let mut acc =
                    new_grouped_accumulator(spec.kind, spec.datatype, config.layout, &memory)?;
                acc.resize(source.num_chunks())?;
                Ok(acc)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            num_aggregates = accumulators.len(),
            layout = %config.layout,
            memory_limit = ?config.memory_limit,
            "created accumulator set"
        );

        Ok(AccumulatorSet {
            specs,
            accumulators,
            memory,
        })
    }

    pub fn specs(&self) -> &[AggregateSpec] {
        &self.specs
    }

    pub fn num_accumulators(&self) -> usize {
        self.accumulators.len()
    }

    pub fn accumulator(&self, idx: usize) -> Option<&dyn GroupedAccumulator> {
        self.accumulators.get(idx).map(|acc| &**acc)
    }

    /// Grow every accumulator after the ordinal source has grown to
    /// `num_chunks` chunks.
    pub fn resized(&mut self, num_chunks: usize) -> Result<()> {
        for acc in &mut self.accumulators {
            acc.resize(num_chunks)?;
        }
        Ok(())
    }

    /// Feed each accumulator its input column from the batch.
    pub fn accumulate(&mut self, batch: &Batch, ordinals: &[u32]) -> Result<()> {
        if batch.num_rows() != ordinals.len() {
            return Err(RayexecError::new(format!(
                "Batch has {} rows, but {} ordinals were provided",
                batch.num_rows(),
                ordinals.len()
            )));
        }

        for (spec, acc) in self.specs.iter().zip(self.accumulators.iter_mut()) {
            let input = batch
                .column(spec.input)
                .required("input column for aggregate")?;
            acc.accumulate(input, ordinals)?;
        }

        Ok(())
    }

    /// Reset every accumulator, keeping allocated chunks.
    pub fn reset(&mut self) {
        for acc in &mut self.accumulators {
            acc.reset();
        }
        debug!(num_aggregates = self.accumulators.len(), "reset accumulator set");
    }

    /// Bytes currently reserved for chunk memory across all accumulators.
    pub fn memory_usage(&self) -> usize {
        self.memory.reserved_bytes()
    }
}
