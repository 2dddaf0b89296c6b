//! Bounded-memory backpressure shared by the stdout/stderr drain loops.
//!
//! Both readers race against the same combined byte budget. A
//! compare-exchange loop avoids taking a lock per chunk; a reader that
//! would overflow the budget discards the chunk (never blocks, so the
//! child's pipe never backs up and deadlocks on a full OS pipe buffer).
//!
//! The reservation is a permanent retention cap, not a working-set limit:
//! `totalBytesRead` is never decremented once a chunk is kept (spec.md
//! §5, §8 property 3 / scenario S4). A child that writes more than
//! `2 * max_buffer_size` total has the surplus discarded for good, not
//! rotated out to make room for later bytes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counter capping combined *retained* bytes across both streams
/// at `2 * max_buffer_size`, for the lifetime of one `Run` call.
#[derive(Clone)]
pub struct BufferBudget {
    used: Arc<AtomicUsize>,
    cap: usize,
}

impl BufferBudget {
    pub fn new(max_buffer_size: usize) -> Self {
        Self {
            used: Arc::new(AtomicUsize::new(0)),
            cap: max_buffer_size.saturating_mul(2),
        }
    }

    /// Attempt to reserve `len` bytes permanently. Returns `true` if the
    /// chunk fits and should be kept; `false` if it must be discarded.
    /// Reservations are never released — once the cap is reached, every
    /// subsequent chunk on either stream is dropped for the rest of the run.
    pub fn try_reserve(&self, len: usize) -> bool {
        let mut current = self.used.load(Ordering::Acquire);
        loop {
            if current.saturating_add(len) > self.cap {
                return false;
            }
            match self.used.compare_exchange_weak(
                current,
                current + len,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }
}
