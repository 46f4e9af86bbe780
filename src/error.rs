use log::error;
use thiserror::Error;

/// Recoverable reasons for an allocation to produce nothing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  #[error("requested size must be greater than zero")]
  InvalidSize,
  #[error("the heap could not be extended")]
  OutOfMemory,
  #[error("alignment {align} exceeds the block header alignment")]
  UnsupportedAlignment { align: usize },
}

/// Broken allocator invariants. These are never returned, see [`fatal`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
  #[error("heap grew at {actual:?}, expected contiguous growth at {expected:?}")]
  NonContiguousGrowth { expected: *mut u8, actual: *mut u8 },
  #[error("block at {address:?} freed while already free")]
  DoubleFree { address: *mut u8 },
}

/// Stops on a broken invariant by aborting the process.
///
/// Unit tests panic instead so the path can be observed.
#[cold]
#[track_caller]
pub fn fatal(violation: ContractViolation) -> ! {
  error!("allocator contract violation: {}", violation);

  #[cfg(test)]
  panic!("allocator contract violation: {violation}");

  #[cfg(not(test))]
  std::process::abort();
}
