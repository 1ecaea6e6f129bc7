//! Runtime check of the native allocator's zero-size behaviour.
//!
//! Performs the same two checks a build-configuration tool runs when it
//! decides whether to substitute the allocation entry points: does
//! `malloc(0)` return non-null, and does `realloc(NULL, 0)`.

use crate::config::Compliance;
use crate::traits::RawAllocator;

/// Findings of [`probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    /// `allocate(0)` returned non-null.
    pub allocate: Compliance,
    /// `resize(null, 0)` returned non-null.
    pub resize: Compliance,
}

/// Probe `raw` directly. Any block obtained is released before returning.
///
/// A null answer is taken as non-compliance, even though a genuinely
/// exhausted allocator would give the same answer.
#[allow(unsafe_code)]
pub fn probe<A: RawAllocator + ?Sized>(raw: &A) -> ProbeReport {
    let allocate = verdict(raw, raw.allocate(0));
    // SAFETY: null is always a valid resize input.
    let resized = unsafe { raw.resize(core::ptr::null_mut(), 0) };
    let resize = verdict(raw, resized);

    let report = ProbeReport { allocate, resize };
    if report.allocate != Compliance::Compliant {
        log::warn!("native allocate(0) returned null; zero-size requests need the shim");
    }
    if report.resize != Compliance::Compliant {
        log::warn!("native resize(null, 0) returned null; zero-size requests need the shim");
    }
    report
}

#[allow(unsafe_code)]
fn verdict<A: RawAllocator + ?Sized>(raw: &A, ptr: *mut u8) -> Compliance {
    if ptr.is_null() {
        Compliance::NonCompliant
    } else {
        // SAFETY: ptr was just returned by raw and is not used again.
        unsafe { raw.release(ptr) };
        Compliance::Compliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libc_alloc::LibcAllocator;
    use crate::shim::ZeroSizeShim;

    #[test]
    fn shim_over_libc_is_always_compliant() {
        // Whatever libc does, the shim must look compliant to the probe.
        struct Shimmed(ZeroSizeShim<LibcAllocator>);
        impl RawAllocator for Shimmed {
            fn allocate(&self, size: usize) -> *mut u8 {
                self.0.allocate_raw(size)
            }
            #[allow(unsafe_code)]
            unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
                unsafe { self.0.resize_raw(ptr, size) }
            }
            #[allow(unsafe_code)]
            unsafe fn release(&self, ptr: *mut u8) {
                unsafe { self.0.inner().release(ptr) }
            }
        }

        let report = probe(&Shimmed(ZeroSizeShim::new(LibcAllocator)));
        assert_eq!(report.allocate, Compliance::Compliant);
        assert_eq!(report.resize, Compliance::Compliant);
    }

    #[test]
    fn probing_libc_terminates_with_a_verdict() {
        let report = probe(&LibcAllocator);
        assert_ne!(report.allocate, Compliance::Unknown);
        assert_ne!(report.resize, Compliance::Unknown);
    }
}
