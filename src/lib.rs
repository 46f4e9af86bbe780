//! # rmalloc - A First-Fit Heap Allocator
//!
//! This crate provides a small **first-fit allocator** that carves blocks out
//! of a region growing like the program break (`sbrk(2)` by default).
//!
//! ## Overview
//!
//! Every block ever created is kept in one singly linked chain, in creation
//! order. An allocation first scans the chain for a free block that is large
//! enough, and only grows the heap when none is found:
//!
//! ```text
//!   First-Fit Search for 16 bytes:
//!
//!   head
//!    │
//!    ▼
//!   ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//!   │ size: 8  │───►│ size: 64 │───►│ size: 16 │───►│ size: 32 │───► null
//!   │ free     │    │ free     │    │ free     │    │ in use   │
//!   └──────────┘    └──────────┘    └──────────┘    └──────────┘
//!     too small       chosen          never reached
//!
//!   The first block that is free and large enough wins, even when a
//!   tighter fit follows it.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rmalloc
//!   ├── align      - Word alignment (align!, checked_align)
//!   ├── block      - Block header and header/payload conversion
//!   ├── error      - AllocError, ContractViolation and the fatal path
//!   ├── first_fit  - FirstFitAllocator
//!   ├── global     - The process-wide heap over sbrk
//!   └── grower     - HeapGrower, SbrkGrower, ArenaGrower
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rmalloc::FirstFitAllocator;
//!
//! fn main() {
//!     let mut allocator = FirstFitAllocator::with_capacity(4096);
//!
//!     unsafe {
//!         let ptr = allocator.allocate(8) as *mut u64;
//!
//!         *ptr = 42;
//!         println!("Value: {}", *ptr);
//!
//!         allocator.deallocate(ptr as *mut u8);
//!
//!         // Same size again: the freed block comes back.
//!         assert_eq!(allocator.allocate(8) as *mut u64, ptr);
//!     }
//! }
//! ```
//!
//! ## How It Works
//!
//! Each block starts with a header, and the caller gets the address right
//! after it:
//!
//! ```text
//!   Single Allocation:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ next: null/ptr  │  │  │                          │  │
//!   │  │ free: false     │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   │      24 bytes         │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! Growing the heap asks the grower for header plus payload, rounded up to a
//! whole word (plus padding when the boundary is unaligned), and requires
//! the new region to start exactly at the old boundary. Anything else means someone else moved the break in between,
//! which is treated as a fatal contract violation.
//!
//! Freeing a block only flips its `free` flag. Double frees are fatal.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: No synchronization primitives
//! - **No splitting**: A reused block keeps its original size
//! - **No coalescing**: Neighbouring free blocks stay separate
//! - **Never shrinks**: Memory is not handed back to the OS
//! - **Word alignment only**: Stricter layouts are refused
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory management.
//! All allocation and deallocation operations require `unsafe` blocks.

pub mod align;
mod block;
pub mod error;
mod first_fit;
pub mod global;
pub mod grower;

pub use block::HEADER_SIZE;
pub use error::{AllocError, ContractViolation};
pub use first_fit::{BlockInfo, Blocks, FirstFitAllocator, HeapStats};
pub use grower::{ArenaGrower, HeapGrower, SbrkGrower};
