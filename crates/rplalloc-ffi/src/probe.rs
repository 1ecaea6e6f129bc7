//! Runtime probe of the native allocator, exposed to C.

use rplalloc_core::{probe, Compliance, LibcAllocator};

use crate::status::RplStatus;

/// Result of [`rplalloc_probe`]. Each field is 1 when the native primitive
/// returned non-null for a zero-size request, 0 otherwise.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RplProbeResult {
    /// Native `malloc(0)` returned a freeable pointer.
    pub malloc_compliant: u8,
    /// Native `realloc(NULL, 0)` returned a freeable pointer.
    pub realloc_compliant: u8,
    /// `rpl_malloc` is compiled into this library.
    pub rpl_malloc_built: u8,
    /// `rpl_realloc` is compiled into this library.
    pub rpl_realloc_built: u8,
}

fn flag(c: Compliance) -> u8 {
    u8::from(c == Compliance::Compliant)
}

/// Probe the native allocator and report which replacements are built.
///
/// Writes to `out` and returns `RPL_STATUS_OK`, or `RPL_STATUS_INVALID_ARGUMENT`
/// if `out` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn rplalloc_probe(out: *mut RplProbeResult) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return RplStatus::InvalidArgument as i32;
        }
        let report = probe(&LibcAllocator);
        let result = RplProbeResult {
            malloc_compliant: flag(report.allocate),
            realloc_compliant: flag(report.resize),
            rpl_malloc_built: u8::from(!cfg!(feature = "native-malloc-compliant")),
            rpl_realloc_built: u8::from(!cfg!(feature = "native-realloc-compliant")),
        };
        log::debug!("probe result: {result:?}");
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = result };
        RplStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_out_is_invalid_argument() {
        assert_eq!(
            rplalloc_probe(std::ptr::null_mut()),
            RplStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn probe_reports_built_symbols() {
        let mut out = RplProbeResult::default();
        assert_eq!(rplalloc_probe(&mut out), RplStatus::Ok as i32);
        assert!(out.malloc_compliant <= 1);
        assert!(out.realloc_compliant <= 1);
        assert_eq!(
            out.rpl_malloc_built == 1,
            cfg!(not(feature = "native-malloc-compliant"))
        );
        assert_eq!(
            out.rpl_realloc_built == 1,
            cfg!(not(feature = "native-realloc-compliant"))
        );
    }
}
