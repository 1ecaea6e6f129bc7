//! C-compatible status codes for the non-allocating entry points.
//!
//! The allocation entry points keep the platform convention: a pointer, null
//! on failure. Everything else returns an [`RplStatus`] as `int32_t`.

/// C-compatible status code.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RplStatus {
    /// Success.
    Ok = 0,
    /// An argument is null or otherwise invalid.
    InvalidArgument = -1,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}
