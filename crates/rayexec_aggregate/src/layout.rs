//! Ordinal to slot address translation.
//!
//! Group ordinals are handed out by the hash table in fixed-size chunks. An
//! accumulator mirrors that chunking exactly so that an ordinal can be turned
//! into a (chunk, offset) pair with a shift and a mask.

use std::fmt;

use rayexec_error::{RayexecError, Result};
use serde::{Deserialize, Serialize};

/// Default number of bits used for the in-chunk offset (4096 slots per chunk).
pub const DEFAULT_BITS_IN_CHUNK: u32 = 12;

/// Smallest supported chunk. A chunk must hold at least one full validity
/// word.
pub const MIN_BITS_IN_CHUNK: u32 = 5;

pub const MAX_BITS_IN_CHUNK: u32 = 24;

/// Number of slots tracked by a single 32-bit validity word.
pub const SLOTS_PER_WORD: usize = 32;

const WORD_SHIFT: u32 = 5;
const WORD_BIT_MASK: usize = SLOTS_PER_WORD - 1;

/// Physical location of a group slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    /// Index of the chunk holding the slot.
    pub chunk_idx: usize,
    /// Offset of the slot within the chunk.
    pub chunk_offset: usize,
}

impl SlotAddress {
    /// Index of the 32-bit word holding this slot's bit in a bit-packed
    /// region.
    #[inline]
    pub const fn word_idx(&self) -> usize {
        self.chunk_offset >> WORD_SHIFT
    }

    /// Position of this slot's bit within its 32-bit word.
    #[inline]
    pub const fn bit_pos(&self) -> u32 {
        (self.chunk_offset & WORD_BIT_MASK) as u32
    }
}

/// Chunking shared between the ordinal source and every accumulator reading
/// its ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ChunkLayout {
    bits_in_chunk: u32,
}

impl ChunkLayout {
    pub fn try_new(bits_in_chunk: u32) -> Result<Self> {
        if !(MIN_BITS_IN_CHUNK..=MAX_BITS_IN_CHUNK).contains(&bits_in_chunk) {
            return Err(RayexecError::new(format!(
                "Bits in chunk must be between {MIN_BITS_IN_CHUNK} and {MAX_BITS_IN_CHUNK}, got {bits_in_chunk}"
            )));
        }
        Ok(ChunkLayout { bits_in_chunk })
    }

    pub const fn bits_in_chunk(&self) -> u32 {
        self.bits_in_chunk
    }

    /// Number of slots in a single chunk.
    pub const fn chunk_capacity(&self) -> usize {
        1 << self.bits_in_chunk
    }

    pub const fn offset_mask(&self) -> u32 {
        (1 << self.bits_in_chunk) - 1
    }

    /// Number of 32-bit words needed to bit-pack a single chunk.
    pub const fn words_per_chunk(&self) -> usize {
        self.chunk_capacity() >> WORD_SHIFT
    }

    /// Translate an ordinal into its slot address.
    #[inline]
    pub const fn address(&self, ordinal: u32) -> SlotAddress {
        SlotAddress {
            chunk_idx: (ordinal >> self.bits_in_chunk) as usize,
            chunk_offset: (ordinal & self.offset_mask()) as usize,
        }
    }

    /// Number of chunks needed for `ordinal` to be addressable.
    pub const fn chunks_for_ordinal(&self, ordinal: u32) -> usize {
        (ordinal >> self.bits_in_chunk) as usize + 1
    }

    /// Number of chunks needed to hold `num_groups` groups.
    pub const fn chunks_for_groups(&self, num_groups: usize) -> usize {
        (num_groups + self.chunk_capacity() - 1) >> self.bits_in_chunk
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        ChunkLayout {
            bits_in_chunk: DEFAULT_BITS_IN_CHUNK,
        }
    }
}

impl TryFrom<u32> for ChunkLayout {
    type Error = RayexecError;

    fn try_from(value: u32) -> Result<Self> {
        Self::try_new(value)
    }
}

impl From<ChunkLayout> for u32 {
    fn from(value: ChunkLayout) -> Self {
        value.bits_in_chunk
    }
}

impl fmt::Display for ChunkLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} slots per chunk ({} bits)",
            self.chunk_capacity(),
            self.bits_in_chunk
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_shift_and_mask() {
        let layout = ChunkLayout::try_new(12).unwrap();

        assert_eq!(
            SlotAddress {
                chunk_idx: 0,
                chunk_offset: 4095
            },
            layout.address(4095)
        );
        assert_eq!(
            SlotAddress {
                chunk_idx: 1,
                chunk_offset: 0
            },
            layout.address(4096)
        );
        assert_eq!(
            SlotAddress {
                chunk_idx: 2,
                chunk_offset: 5
            },
            layout.address(2 * 4096 + 5)
        );
    }

    #[test]
    fn word_and_bit() {
        let layout = ChunkLayout::try_new(6).unwrap();
        let addr = layout.address(64 + 37);

        assert_eq!(1, addr.chunk_idx);
        assert_eq!(1, addr.word_idx());
        assert_eq!(5, addr.bit_pos());
    }

    #[test]
    fn chunk_counts() {
        let layout = ChunkLayout::try_new(5).unwrap();

        assert_eq!(32, layout.chunk_capacity());
        assert_eq!(1, layout.words_per_chunk());
        assert_eq!(1, layout.chunks_for_ordinal(31));
        assert_eq!(2, layout.chunks_for_ordinal(32));
        assert_eq!(0, layout.chunks_for_groups(0));
        assert_eq!(1, layout.chunks_for_groups(32));
        assert_eq!(2, layout.chunks_for_groups(33));
    }

    #[test]
    fn rejects_out_of_range_bits() {
        assert!(ChunkLayout::try_new(4).is_err());
        assert!(ChunkLayout::try_new(25).is_err());
        assert!(ChunkLayout::try_new(MIN_BITS_IN_CHUNK).is_ok());
    }

    #[test]
    fn serde_as_bits() {
        let layout: ChunkLayout = serde_json::from_str("10").unwrap();
        assert_eq!(1024, layout.chunk_capacity());
        assert_eq!("10", serde_json::to_string(&layout).unwrap());

        assert!(serde_json::from_str::<ChunkLayout>("2").is_err());
    }
}
