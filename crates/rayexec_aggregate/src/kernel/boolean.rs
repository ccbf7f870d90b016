//! Bit-packed boolean MIN and MAX.
//!
//! Slots are single bits packed 32 to a word, the same as validity. Input is
//! read 64 rows at a time from the value and validity bitmaps.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use rayexec_bullet::array::Array;
use rayexec_bullet::datatype::DataType;
use rayexec_bullet::scalar::ScalarValue;
use rayexec_error::{RayexecError, Result};

use super::{
    check_input_len, unexpected_input_error, Extremum, ExtremumKind, GroupedAccumulator, Max, Min,
    SlotRegions,
};
use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;

/// Mask to AND into an accumulator word for boolean MIN.
///
/// `valid` and `value` are single bits. The slot bit should become
/// `acc & (!valid | value)`, so a null row (valid = 0) or a true row leaves it
/// alone, and only a valid false clears it.
///
/// Shifting `!valid | value` left by `pos` puts that bit at `pos`. For a null
/// or true row the whole expression is all ones, so the shifted mask is ones
/// from `pos` upward. For a valid false it's ones everywhere except bit 0, so
/// the shifted mask is ones above `pos` and zero at `pos`. Either way the bits
/// below `pos` are zero after the shift and are filled back in with
/// `(1 << pos) - 1`, leaving every other slot in the word untouched.
#[inline]
pub const fn min_update_mask(valid: u32, value: u32, pos: u32) -> u32 {
    ((!valid | value) << pos) | ((1 << pos) - 1)
}

/// Bits to OR into an accumulator word for boolean MAX.
///
/// Only a valid true row sets the slot bit.
#[inline]
pub const fn max_update_bits(valid: u32, value: u32, pos: u32) -> u32 {
    (valid & value) << pos
}

#[derive(Debug)]
pub struct BooleanAccumulator<E: Extremum> {
    regions: SlotRegions<u32>,
    _extremum: PhantomData<E>,
}

pub type MinBooleanAccumulator = BooleanAccumulator<Min>;
pub type MaxBooleanAccumulator = BooleanAccumulator<Max>;

impl<E: Extremum> BooleanAccumulator<E> {
    /// Every slot of a fresh MIN word is true, every slot of a fresh MAX word
    /// is false.
    const IDENTITY_WORD: u32 = match E::KIND {
        ExtremumKind::Min => u32::MAX,
        ExtremumKind::Max => 0,
    };

    pub fn try_new(
        datatype: DataType,
        layout: ChunkLayout,
        memory: Arc<MemoryTracker>,
    ) -> Result<Self> {
        if datatype != DataType::Boolean {
            return Err(RayexecError::new(format!(
                "Cannot create {}_boolean accumulator for {datatype}",
                E::KIND.name()
            )));
        }

        Ok(BooleanAccumulator {
            regions: SlotRegions::new(
                layout,
                layout.words_per_chunk(),
                Self::IDENTITY_WORD,
                memory,
            ),
            _extremum: PhantomData,
        })
    }

    /// Get the bit-packed slot values for a chunk.
    pub fn value_chunk(&self, chunk_idx: usize) -> Option<&[u32]> {
        self.regions.values.chunk(chunk_idx)
    }
}

impl<E: Extremum> GroupedAccumulator for BooleanAccumulator<E> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> String {
        format!("{}_boolean", E::KIND.name())
    }

    fn input_datatype(&self) -> DataType {
        DataType::Boolean
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

        let input = match input {
            Array::Boolean(arr) => arr,
            Array::Null(_) => return Ok(()),
            other => return Err(unexpected_input_error(&self.name(), other)),
        };

        let values = input.values();
        let validity = input.validity();
        let layout = self.regions.layout;

        for (word_idx, ordinals) in ordinals.chunks(64).enumerate() {
            let value_word = values.word64(word_idx);
            let valid_word = match validity {
                Some(validity) => validity.word64(word_idx),
                None => u64::MAX,
            };

            for (bit, &ordinal) in ordinals.iter().enumerate() {
                let addr = layout.address(ordinal);
                let pos = addr.bit_pos();
                let value = ((value_word >> bit) & 1) as u32;
                let valid = ((valid_word >> bit) & 1) as u32;

                let acc = self.regions.values.get_mut(addr.chunk_idx, addr.word_idx());
                match E::KIND {
                    ExtremumKind::Min => *acc &= min_update_mask(valid, value, pos),
                    ExtremumKind::Max => *acc |= max_update_bits(valid, value, pos),
                }

                self.regions.validity.mark(addr, valid);
            }
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
        let word = self.regions.values.get(addr.chunk_idx, addr.word_idx());
        Ok(ScalarValue::Boolean((word >> addr.bit_pos()) & 1 == 1))
    }
}
