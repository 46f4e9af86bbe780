use std::{io::Read, ptr};

use libc::sbrk;
use log::info;
use rmalloc::global;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect the program break with tools like `pmap`
/// or `gdb` between steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Logs the current program break using `sbrk(0)`.
fn log_program_break(label: &str) {
  info!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn log_alloc(
  step: u32,
  size: usize,
  address: *mut u8,
) {
  info!(
    "[{}] Allocated {} bytes, address = {:?}, program break = {:?}",
    step,
    size,
    address,
    unsafe { sbrk(0) }
  );
}

fn main() {
  pretty_env_logger::init();

  unsafe {
    log_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) Zero bytes: nothing is allocated and the break does not move.
    // --------------------------------------------------------------------
    let nothing = global::allocate(0);
    info!("[1] allocate(0) = {:?}", nothing);
    log_program_break("after allocate(0)");

    // --------------------------------------------------------------------
    // 2) The first allocation creates the chain head.
    // --------------------------------------------------------------------
    let p1 = global::allocate(16);
    log_alloc(2, 16, p1);
    ptr::write_bytes(p1, 0xAB, 16);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) A larger block is appended after the first one.
    // --------------------------------------------------------------------
    let p2 = global::allocate(32);
    log_alloc(3, 32, p2);

    // --------------------------------------------------------------------
    // 4) Free the first block, then ask for more than it holds: it is
    //    skipped and the heap grows again.
    // --------------------------------------------------------------------
    global::deallocate(p1);
    let p3 = global::allocate(64);
    log_alloc(4, 64, p3);
    info!("[4] reused the 16 byte block? {}", p3 == p1);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) A small request reuses the freed block, whole.
    // --------------------------------------------------------------------
    let p4 = global::allocate(8);
    log_alloc(5, 8, p4);
    info!("[5] reused the 16 byte block? {}", p4 == p1);

    global::log_heap();
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Freeing null is allowed and changes nothing.
    // --------------------------------------------------------------------
    global::deallocate(ptr::null_mut());

    // --------------------------------------------------------------------
    // 7) A large block moves the break well past its old position.
    // --------------------------------------------------------------------
    log_program_break("before large alloc");
    let big = global::allocate(64 * 1024);
    log_alloc(7, 64 * 1024, big);
    log_program_break("after large alloc");

    global::deallocate(p2);
    global::deallocate(p3);
    global::deallocate(p4);
    global::deallocate(big);
    global::log_heap();

    info!("[8] End of example. The break never shrinks; the OS reclaims it at exit.");
  }
}
