use std::{alloc::Layout, mem, ptr, ptr::NonNull};

use log::{debug, trace, warn};

use crate::{
  align::checked_align,
  block::{Block, HEADER_SIZE},
  error::{AllocError, ContractViolation, fatal},
  grower::{ArenaGrower, HeapGrower, SbrkGrower},
};

/// Snapshot of one block in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  pub header: *mut u8,
  pub payload: *mut u8,
  pub size: usize,
  pub free: bool,
}

/// Totals over the whole chain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
  pub blocks: usize,
  pub free_blocks: usize,
  pub payload_bytes: usize,
  pub free_bytes: usize,
}

/// Outcome of a first-fit scan.
enum Search {
  Found(*mut Block),
  /// No block fits; carries the tail to append after.
  Missed(*mut Block),
}

/// A first-fit allocator over a singly linked chain of blocks.
///
/// Every block ever created stays in the chain, in creation order. Freed
/// blocks are reused whole: they are never split, merged with neighbours or
/// handed back to the grower.
///
/// The allocator is not thread-safe. It is neither `Send` nor `Sync`, and
/// the process-wide instance in [`crate::global`] must only be used from
/// one thread.
pub struct FirstFitAllocator<G: HeapGrower> {
  grower: G,
  head: *mut Block,
}

impl FirstFitAllocator<SbrkGrower> {
  /// An allocator growing the real program break.
  pub const fn sbrk() -> Self {
    Self::new(SbrkGrower::new())
  }
}

impl FirstFitAllocator<ArenaGrower> {
  /// An allocator confined to a private arena of `capacity` bytes.
  pub fn with_capacity(capacity: usize) -> Self {
    Self::new(ArenaGrower::with_capacity(capacity))
  }
}

impl<G: HeapGrower> FirstFitAllocator<G> {
  pub const fn new(grower: G) -> Self {
    Self {
      grower,
      head: ptr::null_mut(),
    }
  }

  pub fn grower(&self) -> &G {
    &self.grower
  }

  /// First block of the chain, or null before the first allocation.
  pub fn head(&self) -> *mut u8 {
    self.head.cast::<u8>()
  }

  /// Allocates `size` bytes, returning null when nothing could be allocated.
  ///
  /// # Safety
  ///
  /// The grower may move the process break; no other thread may use the
  /// allocator or the break concurrently.
  pub unsafe fn allocate(
    &mut self,
    size: usize,
  ) -> *mut u8 {
    match unsafe { self.try_allocate(size) } {
      Ok(address) => address.as_ptr(),
      Err(_) => ptr::null_mut(),
    }
  }

  /// Allocates for `layout`.
  ///
  /// Payloads are only ever word-aligned, so layouts asking for more than
  /// the header alignment get null.
  ///
  /// # Safety
  ///
  /// Same as [`FirstFitAllocator::allocate`].
  pub unsafe fn allocate_layout(
    &mut self,
    layout: Layout,
  ) -> *mut u8 {
    if layout.align() > mem::align_of::<Block>() {
      trace!(
        "{}",
        AllocError::UnsupportedAlignment {
          align: layout.align()
        }
      );
      return ptr::null_mut();
    }

    unsafe { self.allocate(layout.size()) }
  }

  /// Allocates `size` bytes, reporting why when nothing could be allocated.
  ///
  /// # Safety
  ///
  /// Same as [`FirstFitAllocator::allocate`].
  pub unsafe fn try_allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::InvalidSize);
    }

    let block = if self.head.is_null() {
      let block = unsafe { self.request_space(ptr::null_mut(), size)? };
      self.head = block;
      block
    } else {
      match unsafe { self.find_free_block(size) } {
        Search::Found(block) => {
          unsafe { (*block).free = false };
          debug!(
            "reused block {:?} ({} bytes) for a {} byte request",
            block,
            unsafe { (*block).size },
            size
          );
          block
        }
        Search::Missed(last) => unsafe { self.request_space(last, size)? },
      }
    };

    let payload = unsafe { Block::payload_of(block) };
    Ok(unsafe { NonNull::new_unchecked(payload) })
  }

  /// Marks the block behind `address` free for reuse. Null is ignored.
  ///
  /// Freeing a block twice is a fatal contract violation.
  ///
  /// # Safety
  ///
  /// `address` must be null or a pointer returned by this allocator.
  /// Anything else is undefined behaviour.
  pub unsafe fn deallocate(
    &mut self,
    address: *mut u8,
  ) {
    if address.is_null() {
      return;
    }

    let block = unsafe { Block::header_of(address) };

    unsafe {
      if (*block).free {
        fatal(ContractViolation::DoubleFree { address });
      }

      (*block).free = true;
    }

    debug!("freed block {:?} ({} bytes)", block, unsafe { (*block).size });
  }

  /// Walks the chain in creation order.
  pub fn blocks(&self) -> Blocks<'_, G> {
    Blocks {
      current: self.head,
      _allocator: self,
    }
  }

  pub fn stats(&self) -> HeapStats {
    self.blocks().fold(HeapStats::default(), |mut stats, block| {
      stats.blocks += 1;
      stats.payload_bytes += block.size;

      if block.free {
        stats.free_blocks += 1;
        stats.free_bytes += block.size;
      }

      stats
    })
  }

  /// Dumps every block at debug level.
  pub fn log_heap(&self) {
    let stats = self.stats();

    debug!(
      "heap: {} blocks ({} free), {} payload bytes ({} free)",
      stats.blocks, stats.free_blocks, stats.payload_bytes, stats.free_bytes
    );

    for (index, block) in self.blocks().enumerate() {
      debug!(
        "  #{} header = {:?}, payload = {:?}, size = {}, {}",
        index,
        block.header,
        block.payload,
        block.size,
        if block.free { "free" } else { "in use" }
      );
    }
  }

  /// First block that is free and large enough, else the chain tail.
  unsafe fn find_free_block(
    &self,
    size: usize,
  ) -> Search {
    unsafe {
      let mut last = self.head;
      let mut current = self.head;

      while !current.is_null() {
        if (*current).free && (*current).size >= size {
          trace!("first fit for {} bytes at {:?}", size, current);
          return Search::Found(current);
        }

        last = current;
        current = (*current).next;
      }

      trace!("no free block holds {} bytes, tail is {:?}", size, last);
      Search::Missed(last)
    }
  }

  /// Grows the heap by one block of `size` bytes and links it after `last`.
  ///
  /// An unaligned boundary is padded so the header lands word-aligned.
  /// On failure nothing is written and `last` stays the tail.
  unsafe fn request_space(
    &mut self,
    last: *mut Block,
    size: usize,
  ) -> Result<*mut Block, AllocError> {
    let expected = self.grower.boundary();
    let padding = expected.align_offset(mem::align_of::<Block>());

    let increment = size
      .checked_add(HEADER_SIZE)
      .and_then(checked_align)
      .and_then(|bytes| bytes.checked_add(padding))
      .ok_or(AllocError::OutOfMemory)?;

    let Some(address) = (unsafe { self.grower.extend(increment) }) else {
      warn!("heap growth of {} bytes failed", increment);
      return Err(AllocError::OutOfMemory);
    };

    if address != expected {
      fatal(ContractViolation::NonContiguousGrowth {
        expected,
        actual: address,
      });
    }

    if padding != 0 {
      trace!("skipping {} bytes to align the header at {:?}", padding, address);
    }

    let block = unsafe { Block::init(address.add(padding), size) };

    if !last.is_null() {
      unsafe { (*last).next = block };
    }

    debug!("grew heap by {} bytes, new block {:?} ({} bytes)", increment, block, size);

    Ok(block)
  }
}

/// Iterator over the chain, see [`FirstFitAllocator::blocks`].
pub struct Blocks<'a, G: HeapGrower> {
  current: *mut Block,
  _allocator: &'a FirstFitAllocator<G>,
}

impl<G: HeapGrower> Iterator for Blocks<'_, G> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current.is_null() {
      return None;
    }

    let block = self.current;

    unsafe {
      self.current = (*block).next;

      Some(BlockInfo {
        header: block.cast::<u8>(),
        payload: Block::payload_of(block),
        size: (*block).size,
        free: (*block).free,
      })
    }
  }
}
