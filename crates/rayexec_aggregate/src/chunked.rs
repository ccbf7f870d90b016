use std::sync::Arc;

use rayexec_error::Result;

use crate::memory::{MemoryReservation, MemoryTracker};

/// A growable list of fixed-length chunks.
///
/// Every chunk holds exactly `chunk_len` elements. Chunks are only ever
/// appended fully initialized, so a failed allocation never leaves a partial
/// chunk behind.
#[derive(Debug)]
pub struct ChunkedBuffer<T> {
    chunk_len: usize,
    chunks: Vec<Box<[T]>>,
    /// One reservation per chunk, released when the chunk is dropped.
    reservations: Vec<MemoryReservation>,
    memory: Arc<MemoryTracker>,
}

impl<T: Copy> ChunkedBuffer<T> {
    pub fn new(chunk_len: usize, memory: Arc<MemoryTracker>) -> Self {
        ChunkedBuffer {
            chunk_len,
            chunks: Vec::new(),
            reservations: Vec::new(),
            memory,
        }
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Bytes of element storage owned by this buffer.
    pub fn allocated_bytes(&self) -> usize {
        self.reservations.iter().map(|r| r.bytes()).sum()
    }

    pub fn chunk(&self, idx: usize) -> Option<&[T]> {
        self.chunks.get(idx).map(|c| c.as_ref())
    }

    pub fn chunks(&self) -> impl Iterator<Item = &[T]> {
        self.chunks.iter().map(|c| c.as_ref())
    }

    #[inline]
    pub fn get(&self, chunk_idx: usize, offset: usize) -> T {
        self.chunks[chunk_idx][offset]
    }

    #[inline]
    pub fn get_mut(&mut self, chunk_idx: usize, offset: usize) -> &mut T {
        &mut self.chunks[chunk_idx][offset]
    }

    /// Append chunks filled with `fill` until there are at least `num_chunks`
    /// chunks.
    ///
    /// Returns the number of chunks added.
    pub fn try_grow(&mut self, num_chunks: usize, fill: T) -> Result<usize> {
        let current = self.chunks.len();
        if num_chunks <= current {
            return Ok(0);
        }

        let additional = num_chunks - current;
        self.chunks.try_reserve_exact(additional)?;
        self.reservations.try_reserve_exact(additional)?;

        let chunk_bytes = self.chunk_len * std::mem::size_of::<T>();

        for _ in 0..additional {
            let reservation = self.memory.try_reserve(chunk_bytes)?;

            let mut chunk = Vec::new();
            chunk.try_reserve_exact(self.chunk_len)?;
            chunk.resize(self.chunk_len, fill);

            self.chunks.push(chunk.into_boxed_slice());
            self.reservations.push(reservation);
        }

        Ok(additional)
    }

    /// Drop chunks past `num_chunks`.
    pub fn truncate(&mut self, num_chunks: usize) {
        self.chunks.truncate(num_chunks);
        self.reservations.truncate(num_chunks);
    }

    /// Overwrite every element of every chunk with `value`.
    pub fn fill_all(&mut self, value: T) {
        for chunk in &mut self.chunks {
            chunk.fill(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_fills_new_chunks() {
        let mut buf = ChunkedBuffer::new(4, MemoryTracker::new_unlimited());

        assert_eq!(2, buf.try_grow(2, 7_i64).unwrap());
        assert_eq!(2, buf.num_chunks());
        assert_eq!(Some([7, 7, 7, 7].as_slice()), buf.chunk(1));

        // Already large enough.
        assert_eq!(0, buf.try_grow(1, 0).unwrap());
        assert_eq!(64, buf.allocated_bytes());
    }

    #[test]
    fn grow_respects_memory_limit() {
        let memory = Arc::new(MemoryTracker::new(Some(40)));
        let mut buf = ChunkedBuffer::new(4, memory.clone());

        // Each chunk is 16 bytes, the third does not fit.
        assert!(buf.try_grow(3, 0_u32).is_err());
        assert_eq!(2, buf.num_chunks());
        assert_eq!(32, memory.reserved_bytes());

        buf.truncate(0);
        assert_eq!(0, memory.reserved_bytes());
    }

    #[test]
    fn fill_all_overwrites() {
        let mut buf = ChunkedBuffer::new(2, MemoryTracker::new_unlimited());
        buf.try_grow(2, 1_u32).unwrap();
        *buf.get_mut(1, 1) = 9;

        buf.fill_all(3);

        let all: Vec<_> = buf.chunks().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(vec![3, 3, 3, 3], all);
    }
}
