//! The process-wide heap.
//!
//! One [`FirstFitAllocator`] over the real program break, shared by the
//! whole process. Its chain head is empty until the first successful
//! allocation and is never reset afterwards.
//!
//! There is no locking. Calling [`allocate`] or [`deallocate`] from more
//! than one thread, or while other code moves the program break from
//! another thread, is undefined behaviour.

use std::cell::UnsafeCell;

use crate::{first_fit::FirstFitAllocator, grower::SbrkGrower};

struct ProcessHeap(UnsafeCell<FirstFitAllocator<SbrkGrower>>);

// Single-threaded use only, see the module docs.
unsafe impl Sync for ProcessHeap {}

static HEAP: ProcessHeap = ProcessHeap(UnsafeCell::new(FirstFitAllocator::sbrk()));

/// Allocates `size` bytes from the process heap. Returns null for a zero
/// size or when the program break cannot move.
///
/// # Safety
///
/// Must not run concurrently with any other call into this module.
pub unsafe fn allocate(size: usize) -> *mut u8 {
  unsafe { (*HEAP.0.get()).allocate(size) }
}

/// Returns `address` to the process heap. Null is ignored.
///
/// # Safety
///
/// `address` must be null or come from [`allocate`], and the call must not
/// run concurrently with any other call into this module.
pub unsafe fn deallocate(address: *mut u8) {
  unsafe { (*HEAP.0.get()).deallocate(address) }
}

/// Logs the process heap at debug level.
///
/// # Safety
///
/// Must not run concurrently with any other call into this module.
pub unsafe fn log_heap() {
  unsafe { (*HEAP.0.get()).log_heap() }
}
