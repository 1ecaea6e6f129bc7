//! Fault-injected and instrumented allocators for rplalloc development.
//!
//! Every type here implements [`RawAllocator`] and, where it hands out
//! memory at all, backs it with [`LibcAllocator`] so blocks can be freed
//! with the platform deallocation primitive.
//!
//! - [`FailingAllocator`] — always reports exhaustion.
//! - [`FailAfter`] — succeeds N times, then reports exhaustion.
//! - [`NullOnZeroAllocator`] — a non-compliant platform: null for size 0.
//! - [`RecordingAllocator`] — records every call it forwards.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(unsafe_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use rplalloc_core::{LibcAllocator, RawAllocator};

/// Reports exhaustion for every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingAllocator;

impl RawAllocator for FailingAllocator {
    fn allocate(&self, _size: usize) -> *mut u8 {
        std::ptr::null_mut()
    }

    unsafe fn resize(&self, _ptr: *mut u8, _size: usize) -> *mut u8 {
        std::ptr::null_mut()
    }

    unsafe fn release(&self, ptr: *mut u8) {
        // Blocks never come from here, but tests may hand over libc blocks.
        unsafe { LibcAllocator.release(ptr) }
    }
}

/// Succeeds for the first `budget` allocate/resize calls, then fails.
///
/// A failed resize leaves the original block alone, as a real allocator does.
#[derive(Debug)]
pub struct FailAfter {
    remaining: AtomicUsize,
}

impl FailAfter {
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(budget),
        }
    }

    /// Calls left before the allocator starts failing.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Relaxed)
    }

    fn take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl RawAllocator for FailAfter {
    fn allocate(&self, size: usize) -> *mut u8 {
        if self.take() {
            LibcAllocator.allocate(size)
        } else {
            std::ptr::null_mut()
        }
    }

    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        if self.take() {
            unsafe { LibcAllocator.resize(ptr, size) }
        } else {
            std::ptr::null_mut()
        }
    }

    unsafe fn release(&self, ptr: *mut u8) {
        unsafe { LibcAllocator.release(ptr) }
    }
}

/// Emulates a platform whose `malloc(0)` and `realloc(p, 0)` return null.
///
/// `resize(p, 0)` frees `p` before returning null, matching allocators that
/// treat a zero-size resize as a free.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullOnZeroAllocator;

impl RawAllocator for NullOnZeroAllocator {
    fn allocate(&self, size: usize) -> *mut u8 {
        if size == 0 {
            std::ptr::null_mut()
        } else {
            LibcAllocator.allocate(size)
        }
    }

    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        if size == 0 {
            unsafe { LibcAllocator.release(ptr) };
            std::ptr::null_mut()
        } else {
            unsafe { LibcAllocator.resize(ptr, size) }
        }
    }

    unsafe fn release(&self, ptr: *mut u8) {
        unsafe { LibcAllocator.release(ptr) }
    }
}

/// One call observed by a [`RecordingAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Allocate { size: usize },
    Resize { from_null: bool, size: usize },
    Release,
}

/// Forwards to an inner allocator and records each call.
#[derive(Debug, Default)]
pub struct RecordingAllocator<A = LibcAllocator> {
    inner: A,
    calls: Mutex<Vec<Call>>,
}

impl<A: RawAllocator> RecordingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call so far, oldest first.
    ///
    /// # Panics
    ///
    /// If a thread panicked while recording; the log may be incomplete.
    pub fn calls(&self) -> Vec<Call> {
        self.log().clone()
    }

    /// The most recent call.
    pub fn last(&self) -> Option<Call> {
        self.log().last().copied()
    }

    fn record(&self, call: Call) {
        self.log().push(call);
    }

    fn log(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().expect("recording allocator lock poisoned")
    }
}

impl<A: RawAllocator> RawAllocator for RecordingAllocator<A> {
    fn allocate(&self, size: usize) -> *mut u8 {
        self.record(Call::Allocate { size });
        self.inner.allocate(size)
    }

    unsafe fn resize(&self, ptr: *mut u8, size: usize) -> *mut u8 {
        self.record(Call::Resize {
            from_null: ptr.is_null(),
            size,
        });
        unsafe { self.inner.resize(ptr, size) }
    }

    unsafe fn release(&self, ptr: *mut u8) {
        self.record(Call::Release);
        unsafe { self.inner.release(ptr) }
    }
}
