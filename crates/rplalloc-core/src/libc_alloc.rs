//! The platform allocator, reached through `libc`.

use core::ffi::c_void;

use crate::traits::RawAllocator;

/// `malloc` / `realloc` / `free` from the C library.
///
/// Zero-sized and stateless; every call goes straight to libc.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibcAllocator;

impl RawAllocator for LibcAllocator {
    #[allow(unsafe_code)]
    fn allocate(&self, size: usize) -> *mut u8 {
        // SAFETY: malloc accepts any size and reports failure with null.
        unsafe { libc::malloc(size) as *mut u8 }
    }

    #[allow(unsafe_code)]
    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        // SAFETY: ptr is null or came from malloc/realloc per caller contract.
        unsafe { libc::realloc(ptr as *mut c_void, size) as *mut u8 }
    }

    #[allow(unsafe_code)]
    unsafe fn release(&self, ptr: *mut u8) {
        // SAFETY: ptr is null or came from malloc/realloc per caller contract.
        unsafe { libc::free(ptr as *mut c_void) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(unsafe_code)]
    fn allocate_write_release() {
        let a = LibcAllocator;
        let p = a.allocate(64);
        assert!(!p.is_null());
        // SAFETY: p is a live 64-byte block.
        unsafe {
            core::ptr::write_bytes(p, 0xAB, 64);
            assert_eq!(*p.add(63), 0xAB);
            a.release(p);
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn resize_preserves_prefix() {
        let a = LibcAllocator;
        let p = a.allocate(8);
        assert!(!p.is_null());
        // SAFETY: p is a live 8-byte block; q replaces it on success.
        unsafe {
            for i in 0..8 {
                *p.add(i) = i as u8;
            }
            let q = a.resize(p, 4096);
            assert!(!q.is_null());
            for i in 0..8 {
                assert_eq!(*q.add(i), i as u8);
            }
            a.release(q);
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn resize_null_allocates() {
        let a = LibcAllocator;
        // SAFETY: null is a valid resize input.
        unsafe {
            let p = a.resize(core::ptr::null_mut(), 32);
            assert!(!p.is_null());
            a.release(p);
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn release_null_is_noop() {
        // SAFETY: free(NULL) is defined to do nothing.
        unsafe { LibcAllocator.release(core::ptr::null_mut()) };
    }
}
