use std::sync::Arc;

use rayexec_error::Result;

use crate::chunked::ChunkedBuffer;
use crate::layout::{ChunkLayout, SlotAddress};
use crate::memory::MemoryTracker;

/// Per-slot "has seen a non-null value" bits, chunked the same way as the
/// value region they describe.
///
/// Bits are only ever OR-ed in during accumulation. Clearing happens through
/// `clear` alone.
#[derive(Debug)]
pub struct ValidityTracker {
    words: ChunkedBuffer<u32>,
}

impl ValidityTracker {
    pub fn new(layout: ChunkLayout, memory: Arc<MemoryTracker>) -> Self {
        ValidityTracker {
            words: ChunkedBuffer::new(layout.words_per_chunk(), memory),
        }
    }

    pub fn num_chunks(&self) -> usize {
        self.words.num_chunks()
    }

    pub fn allocated_bytes(&self) -> usize {
        self.words.allocated_bytes()
    }

    /// Grow to `num_chunks` chunks, new chunks start with every slot invalid.
    pub fn try_grow(&mut self, num_chunks: usize) -> Result<usize> {
        self.words.try_grow(num_chunks, 0)
    }

    pub fn truncate(&mut self, num_chunks: usize) {
        self.words.truncate(num_chunks)
    }

    /// OR `valid` (0 or 1) into the slot's bit.
    #[inline]
    pub fn mark(&mut self, addr: SlotAddress, valid: u32) {
        *self.words.get_mut(addr.chunk_idx, addr.word_idx()) |= valid << addr.bit_pos();
    }

    pub fn is_valid(&self, addr: SlotAddress) -> bool {
        (self.words.get(addr.chunk_idx, addr.word_idx()) >> addr.bit_pos()) & 1 == 1
    }

    /// Validity words for a single chunk.
    pub fn chunk(&self, chunk_idx: usize) -> Option<&[u32]> {
        self.words.chunk(chunk_idx)
    }

    /// Mark every slot in every chunk as invalid.
    pub fn clear(&mut self) {
        self.words.fill_all(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (ChunkLayout, ValidityTracker) {
        let layout = ChunkLayout::try_new(6).unwrap();
        let mut tracker = ValidityTracker::new(layout, MemoryTracker::new_unlimited());
        tracker.try_grow(2).unwrap();
        (layout, tracker)
    }

    #[test]
    fn mark_sets_single_bit() {
        let (layout, mut tracker) = tracker();

        tracker.mark(layout.address(64 + 33), 1);

        assert!(tracker.is_valid(layout.address(64 + 33)));
        assert!(!tracker.is_valid(layout.address(33)));
        assert_eq!(Some([0, 0b10].as_slice()), tracker.chunk(1));
    }

    #[test]
    fn mark_invalid_never_clears() {
        let (layout, mut tracker) = tracker();
        let addr = layout.address(5);

        tracker.mark(addr, 1);
        tracker.mark(addr, 0);
        assert!(tracker.is_valid(addr));

        tracker.clear();
        assert!(!tracker.is_valid(addr));
        assert_eq!(2, tracker.num_chunks());
    }
}
