//! The zero-size shim: `allocate` and `resize` that never fail because of a
//! zero-size request.
//!
//! A zero-size request is replaced by a [`MIN_REQUEST`]-byte request before it
//! reaches the allocator. Every other size passes through unchanged, and
//! every allocator failure passes straight back to the caller.

use core::ptr::NonNull;

use crate::error::{AllocError, AllocOp};
use crate::traits::RawAllocator;

/// Size requested from the allocator in place of a zero-size request.
pub const MIN_REQUEST: usize = 1;

/// Map a requested size to the size actually sent to the allocator.
#[inline]
pub const fn normalize(size: usize) -> usize {
    if size == 0 {
        MIN_REQUEST
    } else {
        size
    }
}

/// Zero-size-safe wrapper around a [`RawAllocator`].
///
/// Holds nothing but the allocator; each call is independent. Ownership of
/// a returned block passes to the caller exactly as with the wrapped
/// allocator, and [`deallocate`](Self::deallocate) or the allocator's own
/// `release` may free it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroSizeShim<A> {
    raw: A,
}

impl<A: RawAllocator> ZeroSizeShim<A> {
    /// Wrap an allocator.
    pub const fn new(raw: A) -> Self {
        Self { raw }
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.raw
    }

    /// Allocate at least `size` bytes of uninitialized memory.
    ///
    /// `size == 0` yields a freeable block of [`MIN_REQUEST`] bytes unless the
    /// allocator is out of memory.
    pub fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        NonNull::new(self.allocate_raw(size)).ok_or(AllocError::new(AllocOp::Allocate, size))
    }

    /// Resize `block` to at least `size` bytes.
    ///
    /// `None` allocates fresh. Contents up to `min(old, new)` are preserved.
    /// On `Err` the original block is untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `block` must be `None` or a live block from this shim or its allocator.
    /// On `Ok` the old block must no longer be used.
    #[allow(unsafe_code)]
    pub unsafe fn resize(
        &self,
        block: Option<NonNull<u8>>,
        size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let ptr = block.map_or(core::ptr::null_mut(), NonNull::as_ptr);
        // SAFETY: forwarded caller contract.
        let out = unsafe { self.resize_raw(ptr, size) };
        NonNull::new(out).ok_or(AllocError::new(AllocOp::Resize, size))
    }

    /// Return a block to the wrapped allocator.
    ///
    /// # Safety
    ///
    /// `block` must be a live block from this shim or its allocator, and must
    /// not be used afterwards.
    #[allow(unsafe_code)]
    pub unsafe fn deallocate(&self, block: NonNull<u8>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.raw.release(block.as_ptr()) }
    }

    /// [`allocate`](Self::allocate) with the allocator's null failure signal.
    #[inline]
    pub fn allocate_raw(&self, size: usize) -> *mut u8 {
        self.raw.allocate(normalize(size))
    }

    /// [`resize`](Self::resize) with raw pointers and the null failure signal.
    ///
    /// # Safety
    ///
    /// Same as [`RawAllocator::resize`].
    #[inline]
    #[allow(unsafe_code)]
    pub unsafe fn resize_raw(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        // SAFETY: forwarded caller contract.
        unsafe { self.raw.resize(ptr, normalize(size)) }
    }
}
