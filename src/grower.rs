//! Sources of contiguous memory for the allocator.
//!
//! A grower behaves like a program break: it has a current boundary and can
//! push that boundary upward, handing back the address where the new region
//! starts. It never shrinks.

use std::{alloc, mem, ptr::NonNull};

use libc::{c_void, intptr_t, sbrk};
use log::trace;

/// A contiguous, upward-growing memory region.
pub trait HeapGrower {
  /// Current high-water mark of the region. Has no side effects.
  fn boundary(&self) -> *mut u8;

  /// Grows the region by `increment` bytes.
  ///
  /// Returns the boundary as it was before the call, which is where the new
  /// bytes start, or `None` when the region cannot grow.
  ///
  /// # Safety
  ///
  /// The implementation may move a process-wide boundary shared with other
  /// code, so callers must not race with other users of it.
  unsafe fn extend(
    &mut self,
    increment: usize,
  ) -> Option<*mut u8>;
}

/// Grows the real program break with `sbrk(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SbrkGrower;

impl SbrkGrower {
  pub const fn new() -> Self {
    Self
  }
}

impl HeapGrower for SbrkGrower {
  fn boundary(&self) -> *mut u8 {
    unsafe { sbrk(0) }.cast::<u8>()
  }

  unsafe fn extend(
    &mut self,
    increment: usize,
  ) -> Option<*mut u8> {
    let increment = intptr_t::try_from(increment).ok()?;
    let previous = unsafe { sbrk(increment) };

    if previous == usize::MAX as *mut c_void {
      trace!("sbrk({}) failed", increment);
      return None;
    }

    Some(previous.cast::<u8>())
  }
}

/// A private, fixed-capacity region that acts like a program break.
///
/// Each arena is independent, so several heaps can live side by side.
pub struct ArenaGrower {
  base: NonNull<u8>,
  used: usize,
  capacity: usize,
}

impl ArenaGrower {
  /// Reserves `capacity` bytes, rounded up to whole words.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` exceeds `isize::MAX`, and aborts through
  /// [`alloc::handle_alloc_error`] if the backing buffer cannot be obtained.
  pub fn with_capacity(capacity: usize) -> Self {
    let capacity = crate::align::checked_align(capacity.max(1)).expect("arena capacity overflow");
    let layout = Self::layout(capacity);

    let base = unsafe { alloc::alloc_zeroed(layout) };
    let Some(base) = NonNull::new(base) else {
      alloc::handle_alloc_error(layout);
    };

    Self { base, used: 0, capacity }
  }

  /// Total bytes the arena can hand out.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Bytes handed out so far.
  pub fn used(&self) -> usize {
    self.used
  }

  /// First address of the arena.
  pub fn base(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  fn layout(capacity: usize) -> alloc::Layout {
    alloc::Layout::from_size_align(capacity, mem::align_of::<usize>())
      .expect("arena capacity overflow")
  }
}

impl HeapGrower for ArenaGrower {
  fn boundary(&self) -> *mut u8 {
    unsafe { self.base.as_ptr().add(self.used) }
  }

  unsafe fn extend(
    &mut self,
    increment: usize,
  ) -> Option<*mut u8> {
    let remaining = self.capacity - self.used;

    if increment > remaining {
      trace!("arena exhausted: requested {} bytes, {} left", increment, remaining);
      return None;
    }

    let previous = self.boundary();
    self.used += increment;

    Some(previous)
  }
}

impl Drop for ArenaGrower {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.base.as_ptr(), Self::layout(self.capacity)) };
  }
}
