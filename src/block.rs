use std::{mem, ptr};

/// Size in bytes of the header placed in front of every payload.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

/// Metadata for one region handed out by the allocator.
///
/// Only `free` changes once a block has been written into the chain.
#[repr(C)]
pub struct Block {
  pub size: usize,
  pub next: *mut Block,
  pub free: bool,
}

impl Block {
  pub fn new(
    size: usize,
    next: *mut Block,
    free: bool,
  ) -> Self {
    Self { size, next, free }
  }

  /// Recovers the header of a payload pointer.
  ///
  /// # Safety
  ///
  /// `payload` must have been returned by the allocator that owns the block.
  /// Any other pointer yields a header address that does not point to a block.
  pub unsafe fn header_of(payload: *mut u8) -> *mut Block {
    unsafe { payload.sub(HEADER_SIZE) }.cast::<Block>()
  }

  /// Address handed to the caller for `block`.
  ///
  /// # Safety
  ///
  /// `block` must point to a header inside the region the allocator grew.
  pub unsafe fn payload_of(block: *mut Block) -> *mut u8 {
    unsafe { block.cast::<u8>().add(HEADER_SIZE) }
  }

  /// Writes a fresh, allocated, unlinked header at `address`.
  ///
  /// # Safety
  ///
  /// `address` must be word-aligned and valid for `HEADER_SIZE` bytes of writes.
  pub unsafe fn init(
    address: *mut u8,
    size: usize,
  ) -> *mut Block {
    let block = address.cast::<Block>();
    unsafe { ptr::write(block, Block::new(size, ptr::null_mut(), false)) };
    block
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_payload_conversion() {
    let mut storage = [0usize; 8];
    let base = storage.as_mut_ptr().cast::<u8>();

    unsafe {
      let block = Block::init(base, 16);
      let payload = Block::payload_of(block);

      assert_eq!(payload as usize - block as usize, HEADER_SIZE);
      assert_eq!(Block::header_of(payload), block);

      assert_eq!((*block).size, 16);
      assert!((*block).next.is_null());
      assert!(!(*block).free);
    }
  }

  #[test]
  fn test_header_keeps_word_alignment() {
    assert_eq!(HEADER_SIZE % mem::size_of::<usize>(), 0);
    assert!(mem::align_of::<Block>() <= mem::size_of::<usize>());
  }
}
