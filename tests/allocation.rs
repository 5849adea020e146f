//! End-to-end exercise of the public `rmalloc`/`rcalloc`/`rfree`/`rrealloc`
//! surface, outside the crate's own unit tests.

use std::sync::{Mutex, OnceLock};

use rallocator::{rcalloc, rfree, rmalloc, rrealloc};

/// All tests in this binary share the process break via the crate's
/// static heap; serialize them so the default parallel test harness
/// doesn't interleave `sbrk` calls across threads.
fn lock() -> std::sync::MutexGuard<'static, ()> {
  static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
  LOCK
    .get_or_init(|| Mutex::new(()))
    .lock()
    .unwrap_or_else(|p| p.into_inner())
}

#[test]
fn malloc_then_free_is_reusable_by_a_later_allocation() {
  let _guard = lock();
  let a = rmalloc(32);
  assert!(!a.is_null());
  rfree(a);
  let b = rmalloc(32);
  assert!(!b.is_null());
  // Not guaranteed to be the exact same address (a neighbour could have
  // coalesced differently), but must be usable.
  unsafe {
    std::ptr::write_bytes(b, 0x42, 32);
  }
  rfree(b);
}

#[test]
fn two_adjacent_allocations_free_in_reverse_order() {
  let _guard = lock();
  let a = rmalloc(16);
  let b = rmalloc(16);
  assert!(!a.is_null() && !b.is_null());
  rfree(b);
  rfree(a);
}

#[test]
fn calloc_returns_zeroed_memory_of_the_right_size() {
  let _guard = lock();
  let p = rcalloc(16, 1) as *mut u8;
  assert!(!p.is_null());
  unsafe {
    for i in 0..16 {
      assert_eq!(p.add(i).read(), 0);
    }
  }
  rfree(p);
}

#[test]
fn calloc_overflow_returns_null() {
  let _guard = lock();
  let p = rcalloc(usize::MAX, 2);
  assert!(p.is_null());
}

#[test]
fn realloc_preserves_content_when_growing_into_a_new_block() {
  let _guard = lock();
  let p = rmalloc(16) as *mut u64;
  assert!(!p.is_null());
  unsafe { *p = 0xC0FFEE };
  let q = rrealloc(p as *mut u8, 512) as *mut u64;
  assert!(!q.is_null());
  unsafe { assert_eq!(*q, 0xC0FFEE) };
  rfree(q as *mut u8);
}

#[test]
fn realloc_to_zero_size_returns_a_usable_pointer() {
  let _guard = lock();
  let p = rmalloc(64);
  assert!(!p.is_null());
  let q = rrealloc(p, 0);
  assert!(!q.is_null());
  unsafe { std::ptr::write_bytes(q, 0x9, 8) };
  rfree(q);
}

#[test]
fn realloc_of_null_pointer_behaves_like_malloc() {
  let _guard = lock();
  let p = rrealloc(std::ptr::null_mut(), 16);
  assert!(!p.is_null());
  rfree(p);
}

#[test]
fn free_of_null_pointer_is_a_noop() {
  let _guard = lock();
  rfree(std::ptr::null_mut());
}

#[test]
fn free_of_foreign_pointer_is_a_noop() {
  let _guard = lock();
  let mut local = 0u64;
  rfree(&mut local as *mut u64 as *mut u8);
}

#[test]
fn many_small_allocations_are_individually_writable() {
  let _guard = lock();
  let mut ptrs = Vec::new();
  for i in 0..64usize {
    let p = rmalloc(8) as *mut usize;
    assert!(!p.is_null());
    unsafe { p.write(i) };
    ptrs.push(p);
  }
  for (i, p) in ptrs.iter().enumerate() {
    unsafe { assert_eq!(p.read(), i) };
  }
  for p in ptrs {
    rfree(p as *mut u8);
  }
}
