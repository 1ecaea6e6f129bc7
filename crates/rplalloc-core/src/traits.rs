//! The allocator seam the shim delegates to.

/// A platform-style allocator: `malloc`, `realloc` and `free` semantics.
///
/// Null is the failure signal. Implementations are process-wide and must be
/// safe to call from any thread; they carry whatever concurrency guarantees
/// the allocator they wrap documents.
///
/// # Contract
///
/// - `allocate(n)` returns null or a block of at least `n` bytes, aligned for
///   any fundamental type.
/// - `resize(ptr, n)` with a null `ptr` behaves as `allocate(n)`. Otherwise it
///   returns a block of at least `n` bytes holding the first `min(old, n)`
///   bytes of the old block, or null with the old block left untouched.
///   Whether `resize(ptr, 0)` returns null is allocator-defined.
/// - `release(ptr)` accepts null and any block returned by this allocator.
#[allow(unsafe_code)]
pub trait RawAllocator: Send + Sync {
    /// Allocate `size` bytes of uninitialized memory.
    fn allocate(&self, size: usize) -> *mut u8;

    /// Resize a block previously returned by this allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block returned by this allocator's
    /// `allocate` or `resize`. On success `ptr` must no longer be used.
    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8;

    /// Return a block to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block returned by this allocator, and
    /// must not be used afterwards.
    unsafe fn release(&self, ptr: *mut u8);
}

impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    fn allocate(&self, size: usize) -> *mut u8 {
        (**self).allocate(size)
    }

    #[allow(unsafe_code)]
    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).resize(ptr, size) }
    }

    #[allow(unsafe_code)]
    unsafe fn release(&self, ptr: *mut u8) {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).release(ptr) }
    }
}
