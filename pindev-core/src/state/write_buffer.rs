//! Echo buffer
//!
//! Holds the bytes of the last write. The content and its length live in
//! one `heapless::Vec` behind a critical-section mutex, so a reader always
//! gets a pair that was stored together.
//!
//! Callers copy user memory outside the lock and only hand finished
//! slices to [`WriteBuffer::store`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

/// Fixed-capacity buffer, overwritten wholesale on every store
pub struct WriteBuffer<const N: usize> {
    content: Mutex<CriticalSectionRawMutex, RefCell<Vec<u8, N>>>,
}

impl<const N: usize> Default for WriteBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> WriteBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            content: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Buffer capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Replace the content with `bytes`, truncated to capacity
    ///
    /// Returns the number of bytes stored.
    pub fn store(&self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(N);
        self.content.lock(|cell| {
            let mut content = cell.borrow_mut();
            content.clear();
            // n <= N, cannot overflow
            let stored = content.extend_from_slice(&bytes[..n]);
            debug_assert!(stored.is_ok());
        });
        n
    }

    /// Copy of the current content
    pub fn snapshot(&self) -> Vec<u8, N> {
        self.content.lock(|cell| cell.borrow().clone())
    }

    /// Length of the current content
    pub fn len(&self) -> usize {
        self.content.lock(|cell| cell.borrow().len())
    }

    /// Check if nothing has been stored yet (or an empty write was stored)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
