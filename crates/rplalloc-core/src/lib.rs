//! Zero-size allocation shim over the platform allocator.
//!
//! Some platform allocators return null for `malloc(0)` or
//! `realloc(NULL, 0)`. Build-configuration tooling that expects a freeable
//! pointer for a zero-size request then routes those calls through
//! replacements. This crate provides those replacements:
//!
//! ```text
//! caller
//!   └── Dispatch (per entry point: native or shim, from ShimConfig)
//!         ├── ZeroSizeShim  (0 → MIN_REQUEST, then delegate)
//!         └── RawAllocator  (LibcAllocator: malloc / realloc / free)
//! ```
//!
//! The shim is stateless. Selection lives in [`Dispatch`], never in the
//! shim itself. `unsafe` is denied crate-wide and allowed per function where
//! raw pointers cross the allocator seam.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod libc_alloc;
pub mod probe;
pub mod shim;
pub mod traits;

// Public re-exports for the primary API surface.
pub use config::{Compliance, ConfigError, ShimConfig};
pub use dispatch::{Dispatch, Selection};
pub use error::{AllocError, AllocOp};
pub use libc_alloc::LibcAllocator;
pub use probe::{probe, ProbeReport};
pub use shim::{normalize, ZeroSizeShim, MIN_REQUEST};
pub use traits::RawAllocator;
