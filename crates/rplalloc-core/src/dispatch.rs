//! Entry-point selection: native primitive or shim, per entry point.

use core::ptr::NonNull;

use crate::config::ShimConfig;
use crate::error::{AllocError, AllocOp};
use crate::shim::ZeroSizeShim;
use crate::traits::RawAllocator;

/// Where an entry point sends its calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Straight to the native primitive.
    Native,
    /// Through the zero-size shim.
    Shim,
}

/// Routes `allocate` and `resize` independently according to a
/// [`ShimConfig`].
///
/// This is the only place configuration is consulted; the shim itself is
/// unconditional.
#[derive(Clone, Copy, Debug)]
pub struct Dispatch<A> {
    shim: ZeroSizeShim<A>,
    allocate: Selection,
    resize: Selection,
}

impl<A: RawAllocator> Dispatch<A> {
    /// Select entry points for `raw` from `config`.
    pub fn new(raw: A, config: ShimConfig) -> Self {
        Self {
            shim: ZeroSizeShim::new(raw),
            allocate: config.allocate.selection(),
            resize: config.resize.selection(),
        }
    }

    /// Selection for the allocate entry point.
    pub fn allocate_selection(&self) -> Selection {
        self.allocate
    }

    /// Selection for the resize entry point.
    pub fn resize_selection(&self) -> Selection {
        self.resize
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        self.shim.inner()
    }

    /// Allocate through the selected entry point.
    pub fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        NonNull::new(self.allocate_raw(size)).ok_or(AllocError::new(AllocOp::Allocate, size))
    }

    /// Resize through the selected entry point.
    ///
    /// # Safety
    ///
    /// Same as [`ZeroSizeShim::resize`].
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

    /// Release a block to the wrapped allocator.
    ///
    /// # Safety
    ///
    /// Same as [`ZeroSizeShim::deallocate`].
    #[allow(unsafe_code)]
    pub unsafe fn deallocate(&self, block: NonNull<u8>) {
        // SAFETY: forwarded caller contract.
        unsafe { self.shim.deallocate(block) }
    }

    /// [`allocate`](Self::allocate) with the null failure signal.
    #[inline]
    pub fn allocate_raw(&self, size: usize) -> *mut u8 {
        match self.allocate {
            Selection::Native => self.shim.inner().allocate(size),
            Selection::Shim => self.shim.allocate_raw(size),
        }
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
        unsafe {
            match self.resize {
                Selection::Native => self.shim.inner().resize(ptr, size),
                Selection::Shim => self.shim.resize_raw(ptr, size),
            }
        }
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::Compliance;
    use crate::libc_alloc::LibcAllocator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Null for zero-size requests, libc otherwise; counts calls.
    #[derive(Default)]
    struct Picky(AtomicUsize);

    impl RawAllocator for Picky {
        fn allocate(&self, size: usize) -> *mut u8 {
            self.0.fetch_add(1, Ordering::Relaxed);
            if size == 0 {
                core::ptr::null_mut()
            } else {
                LibcAllocator.allocate(size)
            }
        }

        unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
            self.0.fetch_add(1, Ordering::Relaxed);
            if size == 0 {
                unsafe { LibcAllocator.release(ptr) };
                core::ptr::null_mut()
            } else {
                unsafe { LibcAllocator.resize(ptr, size) }
            }
        }

        unsafe fn release(&self, ptr: *mut u8) {
            unsafe { LibcAllocator.release(ptr) }
        }
    }

    #[test]
    fn selection_follows_config_per_entry_point() {
        let d = Dispatch::new(
            LibcAllocator,
            ShimConfig {
                allocate: Compliance::Compliant,
                resize: Compliance::Unknown,
            },
        );
        assert_eq!(d.allocate_selection(), Selection::Native);
        assert_eq!(d.resize_selection(), Selection::Shim);
    }

    #[test]
    fn shimmed_entry_points_survive_zero_size() {
        let d = Dispatch::new(Picky::default(), ShimConfig::SHIM_ALL);
        let h = d.allocate(0).unwrap();
        let h2 = unsafe { d.resize(Some(h), 0) }.unwrap();
        unsafe { d.deallocate(h2) };
        assert_eq!(d.inner().0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn native_entry_points_see_raw_zero_size() {
        // Claiming a non-compliant allocator is compliant exposes its nulls.
        let d = Dispatch::new(Picky::default(), ShimConfig::NATIVE_ALL);
        assert_eq!(
            d.allocate(0),
            Err(AllocError::new(AllocOp::Allocate, 0))
        );
        assert_eq!(
            unsafe { d.resize(None, 0) },
            Err(AllocError::new(AllocOp::Resize, 0))
        );
    }

    #[test]
    fn nonzero_sizes_behave_the_same_either_way() {
        for config in [ShimConfig::SHIM_ALL, ShimConfig::NATIVE_ALL] {
            let d = Dispatch::new(LibcAllocator, config);
            let h = d.allocate(48).unwrap();
            let h = unsafe { d.resize(Some(h), 96) }.unwrap();
            unsafe { d.deallocate(h) };
        }
    }
}
