//! `rpl_malloc` and `rpl_realloc`.
//!
//! Like `malloc` and `realloc`, except that a zero-size request returns a
//! valid pointer that can be passed to `free`. Null still means the system
//! is out of memory, exactly as with the native primitives.

#[cfg(not(all(
    feature = "native-malloc-compliant",
    feature = "native-realloc-compliant"
)))]
use rplalloc_core::{LibcAllocator, ZeroSizeShim};

#[cfg(not(all(
    feature = "native-malloc-compliant",
    feature = "native-realloc-compliant"
)))]
static SHIM: ZeroSizeShim<LibcAllocator> = ZeroSizeShim::new(LibcAllocator);

/// Like `malloc()`, but `rpl_malloc(0)` returns a valid pointer that can be
/// passed to `free()`.
#[cfg(not(feature = "native-malloc-compliant"))]
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn rpl_malloc(n: libc::size_t) -> *mut libc::c_void {
    ffi_guard!(std::ptr::null_mut(), {
        SHIM.allocate_raw(n).cast::<libc::c_void>()
    })
}

/// Like `realloc()`, but `rpl_realloc(mem, 0)` returns a valid pointer that
/// can be passed to `free()`.
///
/// `mem` must be null or a pointer obtained from `malloc`, `realloc`,
/// `rpl_malloc` or `rpl_realloc` that has not been freed. On failure `mem`
/// is left untouched.
#[cfg(not(feature = "native-realloc-compliant"))]
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn rpl_realloc(mem: *mut libc::c_void, n: libc::size_t) -> *mut libc::c_void {
    ffi_guard!(std::ptr::null_mut(), {
        // SAFETY: mem is null or a live libc block per caller contract.
        unsafe { SHIM.resize_raw(mem.cast::<u8>(), n) }.cast::<libc::c_void>()
    })
}

#[cfg(all(
    test,
    not(all(
        feature = "native-malloc-compliant",
        feature = "native-realloc-compliant"
    ))
))]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[cfg(not(feature = "native-malloc-compliant"))]
    #[test]
    fn rpl_malloc_is_exported_with_c_abi() {
        let f: extern "C" fn(libc::size_t) -> *mut libc::c_void = rpl_malloc;
        let p = f(0);
        assert!(!p.is_null());
        unsafe { libc::free(p) };
    }

    #[cfg(not(feature = "native-realloc-compliant"))]
    #[test]
    fn rpl_realloc_is_exported_with_c_abi() {
        let f: extern "C" fn(*mut libc::c_void, libc::size_t) -> *mut libc::c_void = rpl_realloc;
        let p = f(std::ptr::null_mut(), 0);
        assert!(!p.is_null());
        unsafe { libc::free(p) };
    }

    #[cfg(not(feature = "native-malloc-compliant"))]
    #[test]
    fn rpl_malloc_zero_is_freeable() {
        let p = rpl_malloc(0);
        assert!(!p.is_null());
        unsafe { libc::free(p) };
    }

    #[cfg(not(feature = "native-malloc-compliant"))]
    #[test]
    fn rpl_malloc_nonzero_is_writable() {
        let p = rpl_malloc(256).cast::<u8>();
        assert!(!p.is_null());
        unsafe {
            std::ptr::write_bytes(p, 0x5A, 256);
            assert_eq!(*p.add(255), 0x5A);
            libc::free(p.cast());
        }
    }

    #[cfg(not(feature = "native-realloc-compliant"))]
    #[test]
    fn rpl_realloc_null_zero_is_freeable() {
        let p = rpl_realloc(std::ptr::null_mut(), 0);
        assert!(!p.is_null());
        unsafe { libc::free(p) };
    }

    #[cfg(not(feature = "native-realloc-compliant"))]
    #[test]
    fn rpl_realloc_to_zero_keeps_a_block() {
        let p = unsafe { libc::malloc(32) };
        assert!(!p.is_null());
        let q = rpl_realloc(p, 0);
        assert!(!q.is_null());
        unsafe { libc::free(q) };
    }

    #[cfg(not(feature = "native-realloc-compliant"))]
    #[test]
    fn rpl_realloc_preserves_contents() {
        let p = unsafe { libc::malloc(4) }.cast::<u8>();
        assert!(!p.is_null());
        unsafe { p.copy_from(b"rpl!".as_ptr(), 4) };
        let q = rpl_realloc(p.cast(), 4096).cast::<u8>();
        assert!(!q.is_null());
        let bytes = unsafe { std::slice::from_raw_parts(q, 4) };
        assert_eq!(bytes, b"rpl!");
        unsafe { libc::free(q.cast()) };
    }

    #[cfg(all(
        not(miri),
        not(feature = "native-malloc-compliant"),
        not(feature = "native-realloc-compliant")
    ))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn malloc_then_realloc_round_trip(first in 0usize..2048, second in 0usize..2048) {
                let p = rpl_malloc(first);
                prop_assert!(!p.is_null());
                let q = rpl_realloc(p, second);
                prop_assert!(!q.is_null());
                unsafe { libc::free(q) };
            }
        }
    }
}
