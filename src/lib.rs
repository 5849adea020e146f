//! # rallocator — a first-fit `sbrk` allocator
//!
//! This crate provides a single-threaded, C-style heap allocator that
//! manages one process-wide contiguous region grown by moving the program
//! break via [`libc::sbrk`]. Unlike a pure bump allocator it keeps a free
//! list: freed blocks are reused by later allocations through a first-fit
//! search, and adjacent free blocks are coalesced back together.
//!
//! ## Overview
//!
//! ```text
//!   HEAP MEMORY (grows upward via sbrk)
//!
//!   ┌──────────┬──────────┬──────────┬───────────────────────────────┐
//!   │ Block 1  │ Block 2  │ Block 3  │         unreserved             │
//!   │  (busy)  │  (free)  │  (busy)  │                                │
//!   └──────────┴──────────┴──────────┴───────────────────────────────┘
//!              ▲                     ▲                                ▲
//!         first_block             now_ptr                         max_ptr
//! ```
//!
//! Each block is a fixed-size [`Header`](block::Header) immediately
//! followed by its payload, linked to its neighbours in address order.
//! `malloc` walks the list first-fit, splitting an oversized free block
//! when the remainder is worth keeping; `free` marks a block free and
//! coalesces it with any free neighbour, trimming the heap tail if the
//! freed block was the last one.
//!
//! ## Crate structure
//!
//! ```text
//!   rallocator
//!   ├── align   - the fixed 8-byte size alignment rule
//!   ├── block   - header layout, payload recovery, pointer validation
//!   └── heap    - growth, search/split/coalesce, the four public operations
//! ```
//!
//! ## Installing as the process allocator
//!
//! ```rust,ignore
//! use rallocator::Rallocator;
//!
//! #[global_allocator]
//! static ALLOCATOR: Rallocator = Rallocator;
//! ```
//!
//! ## Using the C-style entry points directly
//!
//! ```rust,ignore
//! use rallocator::{rmalloc, rfree};
//!
//! unsafe {
//!     let p = rmalloc(64);
//!     assert!(!p.is_null());
//!     rfree(p);
//! }
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: the three pieces of process-wide state
//!   (`first_block`, `now_ptr`, `max_ptr`) are not synchronized. A
//!   multi-threaded deployment must wrap every entry point in one
//!   exclusive lock, or use a per-thread arena; neither is provided here.
//! - **8-byte alignment ceiling**: requests for greater alignment are
//!   refused (null returned) rather than silently under-aligned.
//! - **No return-to-OS beyond tail trimming**: a freed block in the middle
//!   of the heap stays resident, coalesced with its neighbours but not
//!   handed back to the kernel.
//!
//! ## Safety
//!
//! Every public entry point deals in raw pointers and mutates process-wide
//! state behind an `unsafe` boundary. Passing a pointer not returned by
//! this allocator to `free`/`realloc` is documented as a silent no-op for
//! null and otherwise as undefined behavior, matching the traditional C
//! contract this crate replaces.

pub mod align;
pub mod block;
mod heap;

use std::alloc::{GlobalAlloc, Layout};
use std::ptr;

pub use align::align8;
pub use block::Header;

use heap::Heap;

static HEAP: Heap = Heap::new();

/// Allocates `size` bytes and returns a pointer to the start of the block,
/// or null on failure. The content is uninitialized.
///
/// Mirrors the conventional `malloc(3)` contract: a request of zero bytes
/// must not crash and may return either null or a pointer valid to pass to
/// [`rfree`].
pub fn rmalloc(size: usize) -> *mut u8 {
  HEAP.allocate(size)
}

/// Allocates space for `num` elements of `size` bytes each and zeroes it,
/// or returns null on failure (including on a `num * size` overflow).
pub fn rcalloc(
  num: usize,
  size: usize,
) -> *mut u8 {
  HEAP.zero_allocate(num, size)
}

/// Frees a block previously returned by [`rmalloc`]/[`rcalloc`]/[`rrealloc`].
///
/// A null pointer, or a pointer this allocator did not hand out, is
/// silently ignored.
pub fn rfree(p: *mut u8) {
  HEAP.free(p)
}

/// Resizes the block at `p` to `size` bytes, preserving its content up to
/// the lesser of the old and new sizes. Returns the (possibly moved)
/// pointer, or null if growth failed — in which case `p` is left
/// untouched. A null `p` behaves like [`rmalloc`].
pub fn rrealloc(
  p: *mut u8,
  size: usize,
) -> *mut u8 {
  HEAP.reallocate(p, size)
}

/// Installs [`HEAP`] as `#[global_allocator]`.
///
/// `Layout`s requesting more than 8-byte alignment are refused (null is
/// returned), since the allocator's own block layout only guarantees
/// 8-byte alignment and silently under-aligning would be worse than
/// refusing; supporting larger alignment is an explicit non-goal.
pub struct Rallocator;

unsafe impl GlobalAlloc for Rallocator {
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if layout.align() > 8 {
      return ptr::null_mut();
    }
    HEAP.allocate(layout.size())
  }

  unsafe fn alloc_zeroed(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if layout.align() > 8 {
      return ptr::null_mut();
    }
    HEAP.zero_allocate(1, layout.size())
  }

  unsafe fn dealloc(
    &self,
    ptr: *mut u8,
    _layout: Layout,
  ) {
    HEAP.free(ptr)
  }

  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    if layout.align() > 8 {
      return std::ptr::null_mut();
    }
    HEAP.reallocate(ptr, new_size)
  }
}

/// `HEAP` is one process-wide resource shared by every test in this binary,
/// and `sbrk` is a process-wide OS call on top of that — exactly the
/// single-thread precondition documented on [`Rallocator`]. Serialize
/// tests that touch it instead of letting cargo's default parallel test
/// harness race them.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
  static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
  LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
