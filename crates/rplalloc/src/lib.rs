//! rplalloc: `malloc` and `realloc` that never fail because a request was
//! zero bytes.
//!
//! This is the top-level facade crate that re-exports the public API of
//! `rplalloc-core`. The C symbols `rpl_malloc` and `rpl_realloc` live in
//! `rplalloc-ffi`.
//!
//! # Quick start
//!
//! ```rust
//! use rplalloc::prelude::*;
//!
//! let shim = ZeroSizeShim::new(LibcAllocator);
//! let block = shim.allocate(0).unwrap();
//! // SAFETY: block came from this shim and is not used again.
//! let block = unsafe { shim.resize(Some(block), 0) }.unwrap();
//! unsafe { shim.deallocate(block) };
//! ```
//!
//! Choosing per entry point from the build configuration, the environment,
//! and a runtime probe:
//!
//! ```rust
//! use rplalloc::prelude::*;
//!
//! let config = ShimConfig::from_env()
//!     .unwrap_or_default()
//!     .resolve_unknown(&probe(&LibcAllocator));
//! let alloc = Dispatch::new(LibcAllocator, config);
//! let block = alloc.allocate(16).unwrap();
//! unsafe { alloc.deallocate(block) };
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: shim, allocator seam, configuration, probe (`rplalloc-core`).
pub use rplalloc_core as types;

/// Common imports for typical rplalloc usage.
pub mod prelude {
    pub use rplalloc_core::{
        probe, AllocError, AllocOp, Compliance, ConfigError, Dispatch, LibcAllocator,
        ProbeReport, RawAllocator, Selection, ShimConfig, ZeroSizeShim, MIN_REQUEST,
    };
}
