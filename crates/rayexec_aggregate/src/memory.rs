use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayexec_error::{RayexecError, Result};

/// Byte budget shared by all accumulators belonging to one aggregate.
///
/// Chunk allocations reserve against the tracker before touching the
/// allocator. Reservations are released when the owning chunk is dropped.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    limit: Option<usize>,
    reserved: AtomicUsize,
}

impl MemoryTracker {
    pub fn new(limit: Option<usize>) -> Self {
        MemoryTracker {
            limit,
            reserved: AtomicUsize::new(0),
        }
    }

    pub fn new_unlimited() -> Arc<Self> {
        Arc::new(Self::new(None))
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Total number of bytes currently reserved.
    pub fn reserved_bytes(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }

    /// Reserve `bytes` from the budget.
    ///
    /// Errors if the reservation would exceed the limit. Nothing is reserved
    /// on error.
    pub fn try_reserve(self: &Arc<Self>, bytes: usize) -> Result<MemoryReservation> {
        let limit = self.limit;
        let res = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let updated = current.checked_add(bytes)?;
                match limit {
                    Some(limit) if updated > limit => None,
                    _ => Some(updated),
                }
            });

        match res {
            Ok(_) => Ok(MemoryReservation {
                tracker: self.clone(),
                bytes,
            }),
            Err(current) => Err(RayexecError::new(format!(
                "Resources exhausted: failed to reserve {bytes} bytes for accumulator chunk, {current} bytes reserved, limit {}",
                limit.map(|l| l.to_string()).unwrap_or_else(|| "none".to_string()),
            ))),
        }
    }
}

/// Bytes held against a `MemoryTracker`.
#[derive(Debug)]
pub struct MemoryReservation {
    tracker: Arc<MemoryTracker>,
    bytes: usize,
}

impl MemoryReservation {
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Drop for MemoryReservation {
    fn drop(&mut self) {
        self.tracker
            .reserved
            .fetch_sub(self.bytes, Ordering::AcqRel);
    }
}
