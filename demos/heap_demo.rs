//! Installs a `tracing_subscriber` so the `debug!`/`error!` events the
//! allocator emits on its slow paths (heap growth, tail trimming, OS
//! failures) print alongside this walkthrough's own narration.

use std::io::Read;

use libc::sbrk;
use rallocator::{rfree, rmalloc, rrealloc};

/// Waits until the user presses ENTER. Useful when you want to inspect
/// memory state with tools like `pmap`, `htop`, `gdb`, or just visually
/// track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  unsafe {
    print_program_break("start");
    block_until_enter_pressed();

    // 1) Allocate space for a u32.
    let first_block = rmalloc(4) as *mut u32;
    println!("\n[1] Allocate u32 at {:?}", first_block);
    first_block.write(0xDEADBEEF);
    println!("[1] Value written = 0x{:X}", first_block.read());
    block_until_enter_pressed();

    // 2) Allocate 12 odd-sized bytes.
    let second_block = rmalloc(12);
    println!("\n[2] Allocate [u8; 12] at {:?}", second_block);
    std::ptr::write_bytes(second_block, 0xAB, 12);
    block_until_enter_pressed();

    // 3) Free the first block, then allocate something smaller: unlike a
    //    pure bump allocator, this allocator reuses the freed block.
    rfree(first_block as *mut u8);
    println!("\n[3] Freed first_block");
    let reused = rmalloc(2);
    println!(
      "[3] reused == first_block? {}",
      reused == first_block as *mut u8
    );
    block_until_enter_pressed();

    // 4) Grow the second block in place via realloc.
    let grown = rrealloc(second_block, 64);
    println!("\n[4] Grew second_block to 64 bytes, new address {:?}", grown);

    print_program_break("before large alloc");
    let big_block = rmalloc(64 * 1024);
    println!("\n[5] Allocate large 64 KiB block at {:?}", big_block);
    print_program_break("after large alloc");

    println!("\n[6] End of demo. Process exit reclaims all memory.");
  }
}
