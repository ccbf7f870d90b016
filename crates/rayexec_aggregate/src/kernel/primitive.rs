use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use num_traits::Bounded;
use rayexec_bullet::array::Array;
use rayexec_bullet::bitmap::Bitmap;
use rayexec_bullet::datatype::DataType;
use rayexec_bullet::scalar::ScalarValue;
use rayexec_error::{RayexecError, Result};

use super::{
    check_input_len, unexpected_input_error, Extremum, ExtremumKind, GroupedAccumulator,
    SlotRegions,
};
use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;

/// Row-indexed access to input values in their slot representation.
pub trait SlotInput<V>: Copy {
    fn get(&self, row: usize) -> V;
}

impl<V: Copy> SlotInput<V> for &[V] {
    #[inline]
    fn get(&self, row: usize) -> V {
        self[row]
    }
}

/// Describes how a fixed-width type is stored in and folded into a slot.
pub trait PrimitiveSlot: Debug + Send + Sync + 'static {
    /// Slot representation of the value.
    type Value: Copy + Debug + PartialEq + Send + Sync + 'static;

    /// Borrowed view over an input array's values.
    type Input<'a>: SlotInput<Self::Value>;

    /// Short name used when naming accumulators.
    const NAME: &'static str;

    /// If an accumulator using this slot can be created for `datatype`.
    fn accepts(datatype: &DataType) -> bool;

    /// Get the input values and validity from an array, None if the array is
    /// the wrong type.
    fn input(array: &Array) -> Option<(Self::Input<'_>, Option<&Bitmap>)>;

    /// Value a slot holds before anything valid has been folded in.
    fn identity<E: Extremum>() -> Self::Value;

    /// Fold `incoming` into `current`.
    ///
    /// `valid` is 1 if the incoming row is non-null, 0 otherwise. A fold with
    /// `valid == 0` must return `current` unchanged.
    fn fold<E: Extremum>(current: Self::Value, incoming: Self::Value, valid: u32) -> Self::Value;

    fn to_scalar(value: Self::Value) -> ScalarValue;
}

/// Identity for types with a natural min and max.
///
/// MIN starts at the largest representable value, MAX at the smallest.
#[inline]
pub fn bounded_identity<T: Bounded, E: Extremum>() -> T {
    match E::KIND {
        ExtremumKind::Min => T::max_value(),
        ExtremumKind::Max => T::min_value(),
    }
}

/// MIN or MAX accumulator for a single fixed-width type.
#[derive(Debug)]
pub struct PrimitiveAccumulator<S: PrimitiveSlot, E: Extremum> {
    datatype: DataType,
    regions: SlotRegions<S::Value>,
    _extremum: PhantomData<E>,
}

impl<S: PrimitiveSlot, E: Extremum> PrimitiveAccumulator<S, E> {
    pub fn try_new(
        datatype: DataType,
        layout: ChunkLayout,
        memory: Arc<MemoryTracker>,
    ) -> Result<Self> {
        if !S::accepts(&datatype) {
            return Err(RayexecError::new(format!(
                "Cannot create {}_{} accumulator for {datatype}",
                E::KIND.name(),
                S::NAME,
            )));
        }

        Ok(PrimitiveAccumulator {
            datatype,
            regions: SlotRegions::new(layout, layout.chunk_capacity(), S::identity::<E>(), memory),
            _extremum: PhantomData,
        })
    }

    /// Get the slot values for a chunk.
    ///
    /// Slots that are invalid hold the identity value.
    pub fn value_chunk(&self, chunk_idx: usize) -> Option<&[S::Value]> {
        self.regions.values.chunk(chunk_idx)
    }

    fn fold_rows<'a, F>(&mut self, values: S::Input<'a>, ordinals: &[u32], valid_at: F)
    where
        F: Fn(usize) -> u32,
    {
        let layout = self.regions.layout;
        for (row, &ordinal) in ordinals.iter().enumerate() {
            let addr = layout.address(ordinal);
            let valid = valid_at(row);

            let slot = self.regions.values.get_mut(addr.chunk_idx, addr.chunk_offset);
            *slot = S::fold::<E>(*slot, values.get(row), valid);

            self.regions.validity.mark(addr, valid);
        }
    }
}

impl<S: PrimitiveSlot, E: Extremum> GroupedAccumulator for PrimitiveAccumulator<S, E> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> String {
        format!("{}_{}", E::KIND.name(), S::NAME)
    }

    fn input_datatype(&self) -> DataType {
        self.datatype
    }

    fn layout(&self) -> ChunkLayout {
        self.regions.layout
    }

    fn num_chunks(&self) -> usize {
        self.regions.num_chunks()
    }

    fn allocated_bytes(&self) -> usize {
        self.regions.allocated_bytes()
    }

    fn resize(&mut self, num_chunks: usize) -> Result<()> {
        self.regions.ensure_chunks(num_chunks)
    }

    fn accumulate(&mut self, input: &Array, ordinals: &[u32]) -> Result<()> {
        check_input_len(input, ordinals)?;
        self.regions.ensure_ordinals(ordinals)?;

        if let Array::Null(_) = input {
            // Every row is null, nothing to fold.
            return Ok(());
        }

        let (values, validity) =
            S::input(input).ok_or_else(|| unexpected_input_error(&self.name(), input))?;

        match validity {
            Some(validity) => {
                let bytes = validity.data();
                self.fold_rows(values, ordinals, |row| {
                    ((bytes[row >> 3] >> (row & 7)) & 1) as u32
                })
            }
            None => self.fold_rows(values, ordinals, |_| 1),
        }

        Ok(())
    }

    fn reset(&mut self) {
        self.regions.reset()
    }

    fn validity_chunk(&self, chunk_idx: usize) -> Option<&[u32]> {
        self.regions.validity.chunk(chunk_idx)
    }

    fn is_valid(&self, ordinal: u32) -> bool {
        self.regions.is_valid(ordinal)
    }

    fn scalar(&self, ordinal: u32) -> Result<ScalarValue> {
        self.regions.check_allocated(ordinal)?;
        if !self.regions.is_valid(ordinal) {
            return Ok(ScalarValue::Null);
        }

        let addr = self.regions.layout.address(ordinal);
        Ok(S::to_scalar(
            self.regions.values.get(addr.chunk_idx, addr.chunk_offset),
        ))
    }
}
