//! Heap for the extended shell commands

use core::mem::MaybeUninit;

use embedded_alloc::Heap;

use crate::config::HEAP_SIZE;

#[global_allocator]
static ALLOCATOR: Heap = Heap::empty();

/// Hand the heap memory to the allocator.
///
/// # Safety
///
/// Must be called exactly once, before anything allocates.
pub unsafe fn init() {
    static mut HEAP: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    unsafe { ALLOCATOR.init(core::ptr::addr_of_mut!(HEAP) as usize, HEAP_SIZE) }
}

/// Bytes currently allocated
pub fn used() -> usize {
    ALLOCATOR.used()
}

/// Bytes still available
pub fn free() -> usize {
    ALLOCATOR.free()
}
