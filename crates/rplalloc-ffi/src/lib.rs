//! C ABI replacements for `malloc` and `realloc` that honour zero-size
//! requests.
//!
//! When the build configuration finds that the native `malloc(0)` or
//! `realloc(NULL, 0)` returns null, it maps the call to `rpl_malloc` or
//! `rpl_realloc`. This crate provides those symbols. Each is compiled only
//! while its `native-*-compliant` feature is off; with the feature on the
//! native primitive is used directly and the symbol does not exist.
//!
//! All entry points run inside `ffi_guard!` so a panic never unwinds
//! into C.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run `$body` with panics caught at the boundary.
///
/// A caught panic is recorded for `rplalloc_last_panic_message` and the
/// guard evaluates to `$on_panic` (default: `RplStatus::Panicked`).
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard!($crate::status::RplStatus::Panicked as i32, $body)
    };
    ($on_panic:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload);
                $on_panic
            }
        }
    };
}

pub mod alloc;
pub mod probe;
pub mod status;

pub use status::RplStatus;

thread_local! {
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: Box<dyn Any + Send>) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    log::error!("panic caught at C boundary: {msg}");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the last panic message caught on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been caught. At most `cap - 1` bytes are copied and
/// the result is always NUL-terminated when `cap > 0`. Pass a null `buf` to
/// query the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn rplalloc_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    ffi_guard!({
        LAST_PANIC.with(|cell| {
            let msg = cell.borrow();
            let bytes = msg.as_bytes();
            if !buf.is_null() && cap > 0 {
                let n = bytes.len().min(cap - 1);
                // SAFETY: buf points to at least cap writable bytes per caller contract.
                unsafe {
                    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                    *buf.add(n) = 0;
                }
            }
            i32::try_from(bytes.len()).unwrap_or(i32::MAX)
        })
    })
}
